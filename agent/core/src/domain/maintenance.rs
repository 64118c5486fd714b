// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Maintenance window
//!
//! Weekdays, a start/end time of day and a timezone. End before start means
//! the window crosses midnight, which is a normal window and not an error.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Day of week as written in configuration documents ("Monday".."Sunday")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Unrecognized(String),
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn parse(value: &str) -> Self {
        match value {
            "Monday" => Self::Monday,
            "Tuesday" => Self::Tuesday,
            "Wednesday" => Self::Wednesday,
            "Thursday" => Self::Thursday,
            "Friday" => Self::Friday,
            "Saturday" => Self::Saturday,
            "Sunday" => Self::Sunday,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl From<String> for Weekday {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Weekday> for String {
    fn from(value: Weekday) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a strict 24-hour `HH:MM` value in [00:00, 23:59].
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    if !bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 2 || b.is_ascii_digit())
    {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    /// Days the window opens on; ordered and deduplicated
    pub days: BTreeSet<Weekday>,

    /// `HH:MM`, 24-hour
    pub start_time: String,

    /// `HH:MM`, 24-hour; earlier than `start_time` for windows crossing midnight
    pub end_time: String,

    /// IANA timezone identifier the times are expressed in
    pub timezone: String,
}

impl Default for MaintenanceWindow {
    fn default() -> Self {
        Self {
            days: BTreeSet::new(),
            start_time: "00:00".to_string(),
            end_time: "00:00".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl MaintenanceWindow {
    pub fn crosses_midnight(&self) -> bool {
        match (
            parse_time_of_day(&self.start_time),
            parse_time_of_day(&self.end_time),
        ) {
            (Some(start), Some(end)) => end < start,
            _ => false,
        }
    }

    /// Whether a wall-clock instant, already expressed in the window's
    /// timezone, falls inside the window. Both bounds are inclusive at minute
    /// granularity and `start == end` opens the whole day. The part of a
    /// midnight-crossing window after 00:00 belongs to the day following a
    /// listed day.
    pub fn contains(&self, day: chrono::Weekday, time: NaiveTime) -> bool {
        let (Some(start), Some(end)) = (
            parse_time_of_day(&self.start_time),
            parse_time_of_day(&self.end_time),
        ) else {
            return false;
        };
        let now = time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time);
        let listed = |d: chrono::Weekday| self.days.contains(&Weekday::from(d));

        if start == end {
            listed(day)
        } else if start < end {
            listed(day) && start <= now && now <= end
        } else {
            (listed(day) && now >= start) || (listed(day.pred()) && now <= end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(days: &[Weekday], start: &str, end: &str) -> MaintenanceWindow {
        MaintenanceWindow {
            days: days.iter().cloned().collect(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            timezone: "UTC".to_string(),
        }
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("00:00"), Some(at(0, 0)));
        assert_eq!(parse_time_of_day("23:59"), Some(at(23, 59)));
        assert!(parse_time_of_day("24:00").is_none());
        assert!(parse_time_of_day("7:30").is_none());
        assert!(parse_time_of_day("07:60").is_none());
        assert!(parse_time_of_day("07:30:00").is_none());
        assert!(parse_time_of_day("ab:cd").is_none());
        assert!(parse_time_of_day("").is_none());
    }

    #[test]
    fn test_days_collapse_duplicates_and_sort() {
        let days: BTreeSet<Weekday> = ["Sunday", "Monday", "Sunday"]
            .into_iter()
            .map(Weekday::parse)
            .collect();
        assert_eq!(
            days.into_iter().collect::<Vec<_>>(),
            vec![Weekday::Monday, Weekday::Sunday]
        );
    }

    #[test]
    fn test_window_within_one_day() {
        let w = window(&[Weekday::Saturday], "01:00", "05:00");
        assert!(w.contains(chrono::Weekday::Sat, at(1, 0)));
        assert!(w.contains(chrono::Weekday::Sat, at(5, 0)));
        assert!(!w.contains(chrono::Weekday::Sat, at(5, 1)));
        assert!(!w.contains(chrono::Weekday::Sun, at(2, 0)));
        assert!(!w.crosses_midnight());
    }

    #[test]
    fn test_window_crossing_midnight() {
        let w = window(&[Weekday::Friday], "22:00", "02:00");
        assert!(w.crosses_midnight());
        assert!(w.contains(chrono::Weekday::Fri, at(22, 0)));
        assert!(w.contains(chrono::Weekday::Fri, at(23, 59)));
        assert!(w.contains(chrono::Weekday::Sat, at(0, 0)));
        assert!(w.contains(chrono::Weekday::Sat, at(2, 0)));
        assert!(!w.contains(chrono::Weekday::Sat, at(2, 1)));
        assert!(!w.contains(chrono::Weekday::Fri, at(1, 0)));
        assert!(!w.contains(chrono::Weekday::Fri, at(21, 59)));
    }

    #[test]
    fn test_equal_bounds_open_whole_day() {
        let w = window(&[Weekday::Sunday], "00:00", "00:00");
        assert!(w.contains(chrono::Weekday::Sun, at(13, 37)));
        assert!(!w.contains(chrono::Weekday::Mon, at(13, 37)));
    }

    #[test]
    fn test_invalid_times_contain_nothing() {
        let w = window(&Weekday::ALL, "25:00", "02:00");
        assert!(!w.contains(chrono::Weekday::Mon, at(1, 0)));
    }
}
