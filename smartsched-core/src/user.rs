//! User profile: hobbies and weekly free time.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::task::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hobby {
    pub name: String,
}

impl Hobby {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Case-insensitive match against a task category.
    pub fn matches(&self, category: &str) -> bool {
        !category.is_empty() && self.name.to_lowercase() == category.to_lowercase()
    }
}

/// A recurring weekly window, e.g. Monday 18:00-21:00.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeTimeInterval {
    #[serde(default)]
    pub id: u64,
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl FreeTimeInterval {
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        Self { id: 0, day, start, end }
    }

    /// Length in hours. An `end` of 00:00 is midnight at the close of `day`;
    /// any other empty or inverted window has zero hours.
    pub fn hours(&self) -> f64 {
        let mut secs = (self.end - self.start).num_seconds();
        if secs <= 0 && self.ends_at_midnight() {
            secs += 24 * 3600;
        }
        if secs <= 0 { 0.0 } else { secs as f64 / 3600.0 }
    }

    pub fn ends_at_midnight(&self) -> bool {
        self.end.num_seconds_from_midnight() == 0 && self.end.nanosecond() == 0
    }

    /// Whether the window covers any time at all.
    pub fn is_valid(&self) -> bool {
        self.hours() > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub hobbies: Vec<Hobby>,
    #[serde(default)]
    pub free_time: Vec<FreeTimeInterval>,
    /// Informational; the solvers take an explicit budget instead.
    #[serde(default)]
    pub free_hours_per_day: f64,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: String::new(),
            hobbies: Vec::new(),
            free_time: Vec::new(),
            free_hours_per_day: 0.0,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_hobby(mut self, name: impl Into<String>) -> Self {
        self.hobbies.push(Hobby::new(name));
        self
    }

    pub fn with_free_time(mut self, interval: FreeTimeInterval) -> Self {
        self.free_time.push(interval);
        self
    }

    pub fn has_hobby(&self, category: &str) -> bool {
        self.hobbies.iter().any(|h| h.matches(category))
    }

    /// Total free hours across all intervals on `day`.
    pub fn free_hours_on(&self, day: Weekday) -> f64 {
        self.free_time
            .iter()
            .filter(|i| i.day == day)
            .map(FreeTimeInterval::hours)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_hobby_match_is_case_insensitive() {
        let user = User::new(1, "ana").with_hobby("Reading");
        assert!(user.has_hobby("reading"));
        assert!(user.has_hobby("READING"));
        assert!(!user.has_hobby("read"));
        assert!(!user.has_hobby(""));
    }

    #[test]
    fn test_free_hours_on_sums_day_intervals() {
        let user = User::new(1, "ana")
            .with_free_time(FreeTimeInterval::new(Weekday::Mon, t(8, 0), t(10, 30)))
            .with_free_time(FreeTimeInterval::new(Weekday::Mon, t(18, 0), t(20, 0)))
            .with_free_time(FreeTimeInterval::new(Weekday::Tue, t(9, 0), t(12, 0)));

        assert!((user.free_hours_on(Weekday::Mon) - 4.5).abs() < 1e-9);
        assert!((user.free_hours_on(Weekday::Tue) - 3.0).abs() < 1e-9);
        assert_eq!(user.free_hours_on(Weekday::Sun), 0.0);
    }

    #[test]
    fn test_inverted_interval_has_no_hours() {
        let i = FreeTimeInterval::new(Weekday::Fri, t(20, 0), t(18, 0));
        assert_eq!(i.hours(), 0.0);
        assert!(!i.is_valid());
        assert!(!FreeTimeInterval::new(Weekday::Fri, t(9, 0), t(9, 0)).is_valid());
    }

    #[test]
    fn test_window_ending_at_midnight() {
        let late = FreeTimeInterval::new(Weekday::Sat, t(20, 0), t(0, 0));
        assert!(late.ends_at_midnight());
        assert!(late.is_valid());
        assert_eq!(late.hours(), 4.0);

        let whole_day = FreeTimeInterval::new(Weekday::Sun, t(0, 0), t(0, 0));
        assert_eq!(whole_day.hours(), 24.0);

        let user = User::new(1, "ana").with_free_time(late);
        assert_eq!(user.free_hours_on(Weekday::Sat), 4.0);
    }
}
