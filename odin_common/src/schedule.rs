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

//! support module for gating recurring activities by time of day and day of week

use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};
use serde::{Serialize,Deserialize};

/// daily hour range and weekdays within which recurring activities should run.
/// `start_hour` is inclusive, `end_hour` exclusive. If `end_hour < start_hour` the range spans midnight
/// (e.g. 22..6), in which case the weekday refers to the day on which the given time falls
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct ActiveHours {
    pub start_hour: u32,
    pub end_hour: u32,
    pub weekdays: Vec<Weekday>,
}

impl Default for ActiveHours {
    /// business hours: 08:00-16:00, Monday to Friday
    fn default()->Self {
        ActiveHours {
            start_hour: 8,
            end_hour: 16,
            weekdays: vec![ Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri ],
        }
    }
}

impl ActiveHours {
    pub fn new (start_hour: u32, end_hour: u32, weekdays: Vec<Weekday>)->Self {
        ActiveHours { start_hour, end_hour, weekdays }
    }

    /// around the clock, every day
    pub fn always ()->Self {
        ActiveHours {
            start_hour: 0,
            end_hour: 24,
            weekdays: vec![
                Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri, Weekday::Sat, Weekday::Sun
            ],
        }
    }

    /// is the given date within active hours. The check is done in the timezone of `dt`
    pub fn is_active_at<Tz: TimeZone> (&self, dt: &DateTime<Tz>)->bool {
        self.weekdays.contains( &dt.weekday()) && self.contains_hour( dt.hour())
    }

    pub fn contains_hour (&self, hour: u32)->bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}
