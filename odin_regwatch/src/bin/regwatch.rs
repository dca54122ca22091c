/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::{path::Path, sync::Arc};
use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use odin_common::{check_cli, define_cli, config::{config_from_file, config_from_local_file}};
use odin_regwatch::{RegWatch, RegWatchConfig, AdsbxPoller, notifier::create_notifiers};

define_cli! { ARGS [about="watch aircraft registrations and notify on transponder-on and takeoff events"] =
    once: bool [help="run a single poll cycle (regardless of active hours) and exit", short, long],
    config: Option<String> [help="pathname of config file (default is $ODIN_LOCAL/config/regwatch.ron)", short, long]
}

#[tokio::main]
async fn main ()->Result<()> {
    check_cli!(ARGS);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let config: RegWatchConfig = match &ARGS.config {
        Some(path) => config_from_file( Path::new(path))?,
        None => config_from_local_file("regwatch")?
    };
    let config = Arc::new(config);

    let source = Box::new( AdsbxPoller::new( &config)?);
    let notifiers = create_notifiers( &config)?;
    let mut regwatch = RegWatch::new( config, source, notifiers)?;

    if ARGS.once {
        let stats = regwatch.run_cycle().await;
        println!("{stats}");
    } else {
        tokio::select! {
            _ = regwatch.run() => {}
            _ = tokio::signal::ctrl_c() => { info!("terminated by user") }
        }
    }

    Ok(())
}
