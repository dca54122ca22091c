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

use std::{fmt, time::Duration};
use async_trait::async_trait;
use reqwest::Client;
use odin_common::slack;

use crate::{
    SlackConfig, RegWatchConfig,
    aircraft::{AircraftState, EventCode},
    errors::Result
};

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(20);

/// all our notifiers have to return in bounded time
fn timeout_client ()->Result<Client> {
    Ok( Client::builder().timeout( NOTIFY_TIMEOUT).build()? )
}

/// abstract notification data
#[derive(Debug,Clone,PartialEq)]
pub struct Notification {
    pub registration: String,
    pub description: String,
    pub event: EventCode,
}

impl Notification {
    pub fn new (aircraft: &AircraftState, event: EventCode)->Self {
        Notification {
            registration: aircraft.registration().to_string(),
            description: aircraft.description().to_string(),
            event
        }
    }

    pub fn action (&self)->&'static str {
        match self.event {
            EventCode::TransponderOn => "turned its transponder on",
            EventCode::Takeoff => "taken off!",
            EventCode::None => "not changed its state",
        }
    }

    /// the human readable text we send out
    pub fn message (&self)->String {
        format!("The {} ({}) aircraft has {}", self.description, self.registration, self.action())
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}", self.message())
    }
}

/// abstract interface for notification channels (console, Slack, ..)
/// since this is a simple interface that is not called often we use `async_trait` to make it object-safe.
/// Failures are reported to the caller but do not affect aircraft states
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name (&self)->&str;

    /// impls have to make sure this returns in bounded time
    async fn notify (&self, notification: &Notification)->Result<()>;
}

/// a notifier that just prints to stdout
pub struct ConsoleNotifier {}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name (&self)->&str { "console" }

    async fn notify (&self, notification: &Notification)->Result<()> {
        println!("{}", notification.message());
        Ok(())
    }
}

/// Slack Web API (chat.postMessage) notifier
pub struct SlackNotifier {
    client: Client,
    config: SlackConfig,
}

impl SlackNotifier {
    pub fn new (config: SlackConfig)->Result<Self> {
        Ok( SlackNotifier { client: timeout_client()?, config } )
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name (&self)->&str { "slack" }

    async fn notify (&self, notification: &Notification)->Result<()> {
        let config = &self.config;
        let msg = notification.message();
        slack::send_msg( &self.client, &config.token, &config.channel_id, &msg, config.icon.as_deref()).await?;
        Ok(())
    }
}

/// Slack incoming webhook notifier
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new (url: impl ToString)->Result<Self> {
        Ok( WebhookNotifier { client: timeout_client()?, url: url.to_string() } )
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name (&self)->&str { "webhook" }

    async fn notify (&self, notification: &Notification)->Result<()> {
        let msg = notification.message();
        slack::send_webhook_msg( &self.client, &self.url, &msg).await?;
        Ok(())
    }
}

/// create the notifiers for all channels that are configured
pub fn create_notifiers (config: &RegWatchConfig)->Result<Vec<Box<dyn Notifier>>> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();

    if config.console {
        notifiers.push( Box::new( ConsoleNotifier{}));
    }
    if let Some(url) = &config.webhook_url {
        notifiers.push( Box::new( WebhookNotifier::new( url)?));
    }
    if let Some(slack_config) = &config.slack {
        notifiers.push( Box::new( SlackNotifier::new( slack_config.clone())?));
    }

    Ok(notifiers)
}
