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

//! odin_regwatch watches a fixed set of aircraft registrations through the ADS-B Exchange API and
//! notifies (once per re-arm window) when one of them turns on its transponder or takes off.

use std::{collections::HashSet, str::FromStr, time::Duration};
use serde::{Serialize,Deserialize};
use chrono_tz::Tz;
use odin_common::{
    datetime::{self, deserialize_duration, serialize_duration},
    schedule::ActiveHours
};

pub mod errors;
use errors::{parse_error, Result};

pub mod aircraft;
pub use aircraft::{AircraftState, DebouncePolicy, EventCode, PollSample, evaluate};

pub mod poller;
pub use poller::{SampleSource, PollOutcome, AdsbxPoller, RetryPolicy};

pub mod notifier;
pub use notifier::{Notification, Notifier, ConsoleNotifier, SlackNotifier, WebhookNotifier};

pub mod scheduler;
pub use scheduler::{RegWatch, CycleStats};

/// a registration we track, plus the description used in notifications
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct TrackedAircraft {
    pub registration: String,
    pub description: String,
}

/// Slack Web API parameters (the channel_id is not the channel name)
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct SlackConfig {
    pub token: String,
    pub channel_id: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// the application configuration, which is normally loaded from a `regwatch.ron` file.
/// Note this includes credentials
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct RegWatchConfig {
    /// base URL for registration queries. The registration is appended as the last path element
    pub api_url: String,
    pub api_host: String,
    pub api_key: String,

    #[serde(default="default_poll_interval", deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub poll_interval: Duration,

    #[serde(default="default_rearm_window", deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub rearm_window: Duration,

    /// groundspeed (knots) above which an aircraft is considered to be airborne
    #[serde(default="default_takeoff_speed")]
    pub takeoff_speed: f64,

    #[serde(default)]
    pub retry: RetryPolicy,

    #[serde(default)]
    pub active_hours: ActiveHours,

    /// IANA timezone name for active hours. Uses local time if not set
    #[serde(default)]
    pub timezone: Option<String>,

    pub aircraft: Vec<TrackedAircraft>,

    //--- notification channels

    #[serde(default="default_console")]
    pub console: bool,

    #[serde(default)]
    pub webhook_url: Option<String>,

    #[serde(default)]
    pub slack: Option<SlackConfig>,
}

fn default_poll_interval()->Duration { datetime::minutes(5) }
fn default_rearm_window()->Duration { aircraft::REARM_WINDOW }
fn default_takeoff_speed()->f64 { aircraft::TAKEOFF_SPEED }
fn default_console()->bool { true }

impl RegWatchConfig {
    pub fn policy (&self)->DebouncePolicy {
        DebouncePolicy { rearm_window: self.rearm_window, takeoff_speed: self.takeoff_speed }
    }

    /// the parsed timezone for active hour checks (None means local time)
    pub fn tz (&self)->Result<Option<Tz>> {
        match &self.timezone {
            Some(tz_name) => {
                let tz = Tz::from_str( tz_name).map_err(|e| parse_error!("invalid timezone {tz_name}: {e}"))?;
                Ok( Some(tz))
            }
            None => Ok(None)
        }
    }

    /// check consistency of the config values that are not enforced by types
    pub fn validate (&self)->Result<()> {
        if self.aircraft.is_empty() {
            return Err( parse_error!("no aircraft configured"))
        }

        let mut regs: HashSet<&str> = HashSet::with_capacity( self.aircraft.len());
        for ac in &self.aircraft {
            if ac.registration.trim().is_empty() {
                return Err( parse_error!("empty registration for {:?}", ac.description))
            }
            if !regs.insert( ac.registration.as_str()) {
                return Err( parse_error!("duplicated registration {}", ac.registration))
            }
        }

        if self.active_hours.start_hour > 24 || self.active_hours.end_hour > 24 {
            return Err( parse_error!("active hours out of range: {}..{}", self.active_hours.start_hour, self.active_hours.end_hour))
        }

        self.tz()?;
        Ok(())
    }

    /// create the (initial) debounce states for all configured aircraft
    pub fn create_aircraft_states (&self)->Vec<AircraftState> {
        let policy = self.policy();
        self.aircraft.iter()
            .map( |ac| AircraftState::with_policy( &ac.registration, &ac.description, policy))
            .collect()
    }
}
