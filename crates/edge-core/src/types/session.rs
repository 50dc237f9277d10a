//! Exchange-local session clock, time windows and killzones.
//!
//! All time-based logic is driven by bar timestamps, never wall-clock time.
//! Timestamps are Unix milliseconds in UTC; a fixed offset turns them into
//! exchange-local time for day keys and session windows.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Converts bar timestamps into exchange-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionClock {
    utc_offset_minutes: i32,
}

impl SessionClock {
    /// Create a clock with a fixed offset from UTC.
    pub fn new(utc_offset_minutes: i32) -> Self {
        Self { utc_offset_minutes }
    }

    /// Offset from UTC in minutes.
    pub fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }

    /// Local date and time of a timestamp, or `None` when the timestamp
    /// (or the timestamp shifted by the offset) is outside chrono's range.
    pub fn local(&self, timestamp_ms: i64) -> Option<NaiveDateTime> {
        DateTime::from_timestamp_millis(timestamp_ms)?
            .naive_utc()
            .checked_add_signed(Duration::minutes(i64::from(self.utc_offset_minutes)))
    }

    /// Trading day key (local calendar date).
    pub fn day_key(&self, timestamp_ms: i64) -> Option<NaiveDate> {
        self.local(timestamp_ms).map(|local| local.date())
    }

    /// Minutes since local midnight.
    pub fn minute_of_day(&self, timestamp_ms: i64) -> Option<u32> {
        self.local(timestamp_ms)
            .map(|local| local.hour() * 60 + local.minute())
    }
}

/// A half-open intraday window `[start, end)` in local minutes since midnight.
///
/// Written as `"HHMM-HHMM"` (or `"HH:MM-HH:MM"`) in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionWindow {
    start: u32,
    end: u32,
}

impl SessionWindow {
    /// New York opening range, 09:30-09:45.
    pub const NY_OPENING_RANGE: SessionWindow = SessionWindow { start: 570, end: 585 };

    /// New York regular trading hours, 09:30-16:00.
    pub const NY_REGULAR_HOURS: SessionWindow = SessionWindow { start: 570, end: 960 };

    /// Create a window from minute offsets. `start` must precede `end`.
    pub fn new(start: u32, end: u32) -> Result<Self, String> {
        if end > MINUTES_PER_DAY {
            return Err(format!("window end {} is past midnight", end));
        }
        if start >= end {
            return Err(format!(
                "window start {} must be before end {}",
                format_clock(start),
                format_clock(end)
            ));
        }
        Ok(Self { start, end })
    }

    /// Start of the window (inclusive), minutes since midnight.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// End of the window (exclusive), minutes since midnight.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Check if a local minute falls inside the window.
    #[inline]
    pub fn contains(&self, minute_of_day: u32) -> bool {
        minute_of_day >= self.start && minute_of_day < self.end
    }

    /// Check if the window has already closed for the day.
    #[inline]
    pub fn has_closed(&self, minute_of_day: u32) -> bool {
        minute_of_day >= self.end
    }
}

fn parse_clock(s: &str) -> Result<u32, String> {
    let digits: String = s.trim().chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("Invalid clock time: {}", s));
    }
    let hours: u32 = digits[..2].parse().map_err(|_| format!("Invalid hour: {}", s))?;
    let minutes: u32 = digits[2..].parse().map_err(|_| format!("Invalid minute: {}", s))?;
    if minutes >= 60 || hours > 24 || (hours == 24 && minutes > 0) {
        return Err(format!("Invalid clock time: {}", s));
    }
    Ok(hours * 60 + minutes)
}

fn format_clock(minutes: u32) -> String {
    format!("{:02}{:02}", minutes / 60, minutes % 60)
}

impl fmt::Display for SessionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_clock(self.start), format_clock(self.end))
    }
}

impl FromStr for SessionWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid session window: {}", s))?;
        SessionWindow::new(parse_clock(start)?, parse_clock(end)?)
    }
}

impl TryFrom<String> for SessionWindow {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionWindow> for String {
    fn from(window: SessionWindow) -> Self {
        window.to_string()
    }
}

/// Institutional trading windows, in exchange-local (New York) hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Killzone {
    Asian,
    London,
    NewYorkAm,
    /// The 10-11 AM stretch of the New York morning.
    SilverBullet,
    NewYorkPm,
}

impl Killzone {
    /// Classify a local minute of day.
    pub fn at(minute_of_day: u32) -> Option<Killzone> {
        match minute_of_day / 60 {
            3..=6 => Some(Killzone::London),
            10..=11 => Some(Killzone::SilverBullet),
            8..=9 => Some(Killzone::NewYorkAm),
            13..=16 => Some(Killzone::NewYorkPm),
            19..=23 | 0..=2 => Some(Killzone::Asian),
            _ => None,
        }
    }
}

impl fmt::Display for Killzone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Killzone::Asian => "Asian",
            Killzone::London => "London",
            Killzone::NewYorkAm => "NY AM",
            Killzone::SilverBullet => "Silver Bullet",
            Killzone::NewYorkPm => "NY PM",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_parse() {
        let window: SessionWindow = "0930-0945".parse().unwrap();
        assert_eq!(window.start(), 570);
        assert_eq!(window.end(), 585);

        let colon: SessionWindow = "09:30-16:00".parse().unwrap();
        assert_eq!(colon.end(), 960);
        assert_eq!(colon.to_string(), "0930-1600");
    }

    #[test]
    fn test_window_rejects_bad_input() {
        assert!("0945-0930".parse::<SessionWindow>().is_err());
        assert!("0930".parse::<SessionWindow>().is_err());
        assert!("2561-2600".parse::<SessionWindow>().is_err());
        assert!("0930-0930".parse::<SessionWindow>().is_err());
    }

    #[test]
    fn test_window_bounds() {
        let window: SessionWindow = "0930-0945".parse().unwrap();
        assert!(!window.contains(569));
        assert!(window.contains(570));
        assert!(window.contains(584));
        assert!(!window.contains(585));
        assert!(window.has_closed(585));
        assert!(!window.has_closed(584));
    }

    #[test]
    fn test_clock_offset() {
        // 2024-01-02 14:30 UTC is 09:30 in New York (UTC-5)
        let ts = 1_704_205_800_000;
        let clock = SessionClock::new(-300);
        assert_eq!(clock.minute_of_day(ts), Some(570));
        assert_eq!(clock.day_key(ts), NaiveDate::from_ymd_opt(2024, 1, 2));

        // 03:00 UTC on Jan 3rd is still Jan 2nd locally
        let late = 1_704_250_800_000;
        assert_eq!(clock.day_key(late), NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn test_clock_out_of_range() {
        let min = DateTime::<chrono::Utc>::MIN_UTC.timestamp_millis();
        let max = DateTime::<chrono::Utc>::MAX_UTC.timestamp_millis();

        assert!(SessionClock::new(-300).local(min).is_none());
        assert!(SessionClock::new(-300).day_key(min).is_none());
        assert!(SessionClock::new(300).minute_of_day(max).is_none());

        // no shift, no overflow
        assert!(SessionClock::new(0).local(min).is_some());
        assert!(SessionClock::new(-300).local(max).is_some());
        assert!(SessionClock::new(0).local(i64::MAX).is_none());
    }

    #[test]
    fn test_killzones() {
        assert_eq!(Killzone::at(4 * 60), Some(Killzone::London));
        assert_eq!(Killzone::at(8 * 60 + 30), Some(Killzone::NewYorkAm));
        assert_eq!(Killzone::at(10 * 60 + 15), Some(Killzone::SilverBullet));
        assert_eq!(Killzone::at(14 * 60), Some(Killzone::NewYorkPm));
        assert_eq!(Killzone::at(20 * 60), Some(Killzone::Asian));
        assert_eq!(Killzone::at(12 * 60 + 30), None);
    }

    #[test]
    fn test_window_serde() {
        let window: SessionWindow = serde_json::from_str("\"0930-0945\"").unwrap();
        assert_eq!(window.start(), 570);
        assert_eq!(serde_json::to_string(&window).unwrap(), "\"0930-0945\"");
        assert!(serde_json::from_str::<SessionWindow>("\"bogus\"").is_err());
    }
}
