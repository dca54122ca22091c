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

//! RON config lookup.
//!
//! Configs are identified by a name (e.g. "regwatch") that is mapped to a «local-root»/config/«id».ron
//! pathname. «local-root» is taken from the `ODIN_LOCAL` env var, falling back to `./local`.
//! If `ODIN_LOCAL` ends with a path separator the name of the current working dir is appended, which
//! allows to keep the configs of several applications under a common root.
//!
//! Config files usually contain credentials and hence should never be checked into a repository.

use std::{fs, path::{Path,PathBuf}};
use serde::Deserialize;
use crate::define_error;

define_error!{ pub OdinConfigError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    RonError(#[from] ron::error::SpannedError) : "config RON error: {0}",
    FileNotFound(String) : "config file not found: {0}"
}

pub type Result<T> = std::result::Result<T,OdinConfigError>;

pub fn get_local_dir ()->PathBuf {
    match std::env::var("ODIN_LOCAL") {
        Ok(local_root) => {
            if local_root.ends_with(std::path::MAIN_SEPARATOR) {
                if let Ok(cwd) = std::env::current_dir() {
                    if let Some(dir) = cwd.file_name() {
                        return PathBuf::from( format!("{local_root}{}", dir.to_string_lossy()))
                    }
                }
            }
            PathBuf::from(local_root)
        }
        _ => PathBuf::from("./local")
    }
}

/// the pathname for a config id: «local-root»/config/«id».ron
pub fn local_config_path (id: &str)->PathBuf {
    get_local_dir().join("config").join( format!("{id}.ron"))
}

/// mandatory config - it is an error if there is no such file
pub fn config_from_local_file<C> (id: &str)->Result<C> where C: for <'a> Deserialize<'a> {
    config_from_file( &local_config_path(id))
}

pub fn config_from_file<C> (path: &Path)->Result<C> where C: for <'a> Deserialize<'a> {
    if !path.is_file() { return Err( OdinConfigError::FileNotFound( path.to_string_lossy().to_string())) }

    let data = fs::read(path)?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

pub fn config_from_str<C> (src: &str)->Result<C> where C: for <'a> Deserialize<'a> {
    Ok( ron::de::from_str( src)? )
}
