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

//! per-aircraft debounce state and the evaluation of poll samples against it.
//!
//! Each tracked aircraft has two latches: `pinged_recently` (transponder seen) and `taken_off_recently`
//! (groundspeed above takeoff threshold). A latch is set - and the respective event reported - only
//! when it was not set before. Latches are cleared once the transponder is off and the re-arm window
//! has passed since the latch was set:
//! ```text
//!           on, gs <= 40               on, gs > 40
//!   IDLE ─────────────────► PINGED ─────────────────► AIRBORNE
//!    ▲   (TransponderOn)              (Takeoff)          │
//!    └────────────── off, t > set_time + rearm_window ───┘
//! ```
//! This assumes there is at most one flight per re-arm window. If the transponder of an aircraft is not
//! off for longer than the re-arm window between two flights the second flight is not reported.

use std::{fmt, time::Duration};
use serde::{Serialize,Deserialize};
use odin_common::datetime::EpochMillis;

/// after which we consider a transponder-on or takeoff to be a new occurrence (8h)
pub const REARM_WINDOW: Duration = Duration::from_millis(28_800_000);

/// groundspeed in knots above which we consider the aircraft to be airborne (not taxiing)
pub const TAKEOFF_SPEED: f64 = 40.0;

/// the parameters of the evaluation
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct DebouncePolicy {
    pub rearm_window: Duration,
    pub takeoff_speed: f64,
}

impl Default for DebouncePolicy {
    fn default()->Self {
        DebouncePolicy { rearm_window: REARM_WINDOW, takeoff_speed: TAKEOFF_SPEED }
    }
}

/// the (ephemeral) result of polling a single aircraft
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct PollSample {
    pub transponder_on: bool,
    pub timestamp: EpochMillis,
    /// groundspeed in knots. Only meaningful if `transponder_on`
    pub airspeed: Option<f64>,
}

impl PollSample {
    pub fn on (timestamp: EpochMillis, airspeed: f64)->Self {
        PollSample { transponder_on: true, timestamp, airspeed: Some(airspeed) }
    }

    pub fn off (timestamp: EpochMillis)->Self {
        PollSample { transponder_on: false, timestamp, airspeed: None }
    }
}

impl fmt::Display for PollSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.transponder_on {
            write!( f, "on")?;
            if let Some(spd) = self.airspeed { write!( f, ", gs: {spd:.0}")?; }
        } else {
            write!( f, "off")?;
        }
        write!( f, ", time: {}", self.timestamp)
    }
}

/// what (if anything) has to be notified as the result of evaluating a sample
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum EventCode {
    None,
    TransponderOn,
    Takeoff,
}

impl EventCode {
    pub fn is_notifiable (&self)->bool { *self != EventCode::None }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventCode::None => write!(f, "none"),
            EventCode::TransponderOn => write!(f, "transponder-on"),
            EventCode::Takeoff => write!(f, "takeoff"),
        }
    }
}

/// the debounce state of a tracked aircraft. This is only mutated through [`AircraftState::evaluate`]
#[derive(Debug,Clone)]
pub struct AircraftState {
    registration: String,
    description: String,

    pinged_recently: bool,
    taken_off_recently: bool,

    first_ping_time: EpochMillis,
    first_takeoff_time: EpochMillis,

    policy: DebouncePolicy,
}

impl AircraftState {
    pub fn new (registration: impl ToString, description: impl ToString)->Self {
        Self::with_policy( registration, description, DebouncePolicy::default())
    }

    pub fn with_policy (registration: impl ToString, description: impl ToString, policy: DebouncePolicy)->Self {
        AircraftState {
            registration: registration.to_string(),
            description: description.to_string(),
            pinged_recently: false,
            taken_off_recently: false,
            first_ping_time: EpochMillis::new(0),
            first_takeoff_time: EpochMillis::new(0),
            policy
        }
    }

    pub fn registration (&self)->&str { self.registration.as_str() }
    pub fn description (&self)->&str { self.description.as_str() }
    pub fn pinged_recently (&self)->bool { self.pinged_recently }
    pub fn taken_off_recently (&self)->bool { self.taken_off_recently }
    pub fn first_ping_time (&self)->EpochMillis { self.first_ping_time }
    pub fn first_takeoff_time (&self)->EpochMillis { self.first_takeoff_time }
    pub fn policy (&self)->&DebouncePolicy { &self.policy }

    /// update the latches from a new sample and return the event to notify (if any).
    /// Samples for the same aircraft have to be supplied with non-decreasing timestamps
    pub fn evaluate (&mut self, sample: &PollSample)->EventCode {
        let now = sample.timestamp;

        if sample.transponder_on {
            if sample.airspeed.is_some_and( |spd| spd > self.policy.takeoff_speed) {
                if !self.taken_off_recently {
                    self.taken_off_recently = true;
                    self.pinged_recently = true;
                    self.first_takeoff_time = now;
                    self.first_ping_time = now;
                    return EventCode::Takeoff
                } else {
                    return EventCode::None
                }
            }

            if !self.pinged_recently {
                self.first_ping_time = now;
                self.pinged_recently = true;
                EventCode::TransponderOn
            } else {
                EventCode::None
            }

        } else { // airspeed is irrelevant if we don't get a transponder signal
            let rearm = self.policy.rearm_window;
            if now > self.first_ping_time + rearm {
                self.pinged_recently = false;
            }
            if now > self.first_takeoff_time + rearm {
                self.taken_off_recently = false;
            }
            EventCode::None
        }
    }
}

impl fmt::Display for AircraftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Aircraft( reg: {}, \"{}\"", self.registration, self.description)?;
        if self.pinged_recently { write!( f, ", pinged: {}", self.first_ping_time)?; }
        if self.taken_off_recently { write!( f, ", takeoff: {}", self.first_takeoff_time)?; }
        write!( f, ")")
    }
}

/// functional form of [`AircraftState::evaluate`]
#[inline]
pub fn evaluate (state: &mut AircraftState, sample: &PollSample)->EventCode {
    state.evaluate( sample)
}

