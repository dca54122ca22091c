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

use std::{fmt, sync::Arc};
use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use tracing::{debug, error, info, warn};
use odin_common::datetime::utc_now;

use crate::{
    RegWatchConfig,
    aircraft::AircraftState,
    notifier::{Notification, Notifier},
    poller::{PollOutcome, SampleSource},
    errors::Result
};

/// what happened during a poll cycle
#[derive(Debug,Default,Clone,Copy,PartialEq,Eq)]
pub struct CycleStats {
    /// aircraft for which we got a sample that was evaluated
    pub polled: usize,
    /// aircraft with incomplete response data
    pub skipped: usize,
    /// aircraft we could not poll (after retries)
    pub failed: usize,
    /// successfully delivered notifications (per channel)
    pub notified: usize,
    pub notify_failures: usize,
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "polled: {}, skipped: {}, failed: {}, notified: {}", self.polled, self.skipped, self.failed, self.notified)?;
        if self.notify_failures > 0 { write!( f, ", notify failures: {}", self.notify_failures)?; }
        Ok(())
    }
}

/// the poll loop. This owns the debounce states of all tracked aircraft and processes them
/// sequentially in each cycle
pub struct RegWatch {
    config: Arc<RegWatchConfig>,
    tz: Option<Tz>,
    aircraft: Vec<AircraftState>,
    source: Box<dyn SampleSource>,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl RegWatch {
    pub fn new (config: Arc<RegWatchConfig>, source: Box<dyn SampleSource>, notifiers: Vec<Box<dyn Notifier>>)->Result<Self> {
        config.validate()?;

        let tz = config.tz()?;
        let aircraft = config.create_aircraft_states();

        Ok( RegWatch { config, tz, aircraft, source, notifiers } )
    }

    pub fn aircraft (&self)->&[AircraftState] { self.aircraft.as_slice() }

    pub fn aircraft_state (&self, registration: &str)->Option<&AircraftState> {
        self.aircraft.iter().find( |ac| ac.registration() == registration)
    }

    /// check if `date` is within the configured active hours (in the configured timezone)
    pub fn is_active_at (&self, date: DateTime<Utc>)->bool {
        let active_hours = &self.config.active_hours;
        match &self.tz {
            Some(tz) => active_hours.is_active_at( &date.with_timezone(tz)),
            None => active_hours.is_active_at( &date.with_timezone( &Local))
        }
    }

    /// poll all tracked aircraft once, update their states and send out notifications for new events.
    /// Failures are logged and only affect the aircraft (or notification channel) they occurred for
    pub async fn run_cycle (&mut self)->CycleStats {
        let mut stats = CycleStats::default();

        for ac in self.aircraft.iter_mut() {
            match self.source.poll( ac.registration()).await {
                Ok(PollOutcome::Sample(sample)) => {
                    stats.polled += 1;
                    let event = ac.evaluate( &sample);
                    debug!("{} [{sample}] -> {event}", ac.registration());

                    if event.is_notifiable() {
                        info!("{} event: {event}", ac.registration());
                        let notification = Notification::new( ac, event);
                        let (n_ok,n_failed) = notify_all( &self.notifiers, &notification).await;
                        stats.notified += n_ok;
                        stats.notify_failures += n_failed;
                    }
                }
                Ok(PollOutcome::Skip(reason)) => {
                    warn!("skipping {} this cycle: {reason}", ac.registration());
                    stats.skipped += 1;
                }
                Err(e) => {
                    warn!("failed to poll {}: {e}", ac.registration());
                    stats.failed += 1;
                }
            }
        }

        stats
    }

    /// run cycles within active hours, sleeping for the configured poll interval between checks.
    /// This never returns - callers have to drop the future to terminate (e.g. on Ctrl-C)
    pub async fn run (&mut self) {
        let poll_interval = self.config.poll_interval;
        info!("watching {} aircraft, poll interval {:?}", self.aircraft.len(), poll_interval);

        loop {
            if self.is_active_at( utc_now()) {
                let stats = self.run_cycle().await;
                info!("cycle done: {stats}");
            } else {
                debug!("outside of active hours");
            }

            tokio::time::sleep( poll_interval).await;
        }
    }
}

/// send notification through all channels, returning the number of (successful,failed) deliveries.
/// All channels are tried, regardless of failures in previous ones
async fn notify_all (notifiers: &[Box<dyn Notifier>], notification: &Notification)->(usize,usize) {
    let mut n_ok = 0;
    let mut n_failed = 0;

    for notifier in notifiers {
        match notifier.notify( notification).await {
            Ok(()) => n_ok += 1,
            Err(e) => {
                error!("{} notification failed for {}: {e}", notifier.name(), notification.registration);
                n_failed += 1;
            }
        }
    }

    (n_ok, n_failed)
}
