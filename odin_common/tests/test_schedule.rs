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
#![allow(unused)]

use chrono::{TimeZone, Utc, Weekday};
use chrono_tz::America::Los_Angeles;
use odin_common::{config::config_from_str, schedule::ActiveHours};

/// tests for active hours gating
/// run with "cargo test --test test_schedule -- --nocapture"

#[test]
fn test_business_hours () {
    let ah = ActiveHours::default();

    // 2025-01-13 is a Monday
    for (day, hour, expected) in [(13, 7, false), (13, 8, true), (14, 12, true), (17, 15, true), (17, 16, false), (18, 10, false), (19, 10, false)] {
        let dt = Los_Angeles.with_ymd_and_hms( 2025, 1, day, hour, 59, 0).unwrap();
        let active = ah.is_active_at( &dt);
        println!("  {dt} ({}) -> {active}", dt.format("%a"));
        assert_eq!( active, expected);
    }
}

#[test]
fn test_timezone_dependent () {
    let ah = ActiveHours::default();
    let dt = Utc.with_ymd_and_hms( 2025, 1, 15, 18, 30, 0).unwrap();

    assert!( !ah.is_active_at( &dt));                             // 18:30 UTC
    assert!( ah.is_active_at( &dt.with_timezone( &Los_Angeles))); // 10:30 PST
}

#[test]
fn test_wrap_around () {
    let ah = ActiveHours::new( 22, 6, vec![Weekday::Sat, Weekday::Sun]);
    assert!( ah.contains_hour(23));
    assert!( ah.contains_hour(0));
    assert!( ah.contains_hour(5));
    assert!( !ah.contains_hour(6));
    assert!( !ah.contains_hour(12));

    let sat_night = Utc.with_ymd_and_hms( 2025, 1, 18, 23, 0, 0).unwrap();
    let mon_early = Utc.with_ymd_and_hms( 2025, 1, 20, 1, 0, 0).unwrap();
    assert!( ah.is_active_at( &sat_night));
    assert!( !ah.is_active_at( &mon_early));
}

#[test]
fn test_always () {
    let ah = ActiveHours::always();
    for h in 0..24 { assert!( ah.contains_hour(h)); }
    assert!( ah.is_active_at( &Utc.with_ymd_and_hms( 2025, 1, 19, 3, 0, 0).unwrap()));
}

#[test]
fn test_ron () {
    let ah: ActiveHours = config_from_str( r#"( start_hour: 6, weekdays: ["Sat", "Sun"] )"#).unwrap();
    println!("{ah:?}");
    assert_eq!( ah.start_hour, 6);
    assert_eq!( ah.end_hour, 16);
    assert_eq!( ah.weekdays, vec![Weekday::Sat, Weekday::Sun]);
}
