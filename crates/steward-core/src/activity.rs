//! Daily message-activity counter.
//!
//! Tracks per-user `(day, count)` pairs. A read against a stale day resets
//! the entry before the increment is applied, so the stored day always
//! equals "today" relative to the last write.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::types::UserId;

/// Result of recording one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTally {
    /// Count for the user's current day after the increment.
    pub count: u32,
    /// True exactly when the new count equals the threshold. One-shot: does
    /// not re-fire on later counts the same day.
    pub crossed_threshold: bool,
}

#[derive(Debug, Clone, Copy)]
struct DayCount {
    day: NaiveDate,
    count: u32,
}

/// Per-user daily activity state.
#[derive(Debug)]
pub struct DailyActivity {
    threshold: u32,
    entries: HashMap<UserId, DayCount>,
}

impl DailyActivity {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            entries: HashMap::new(),
        }
    }

    /// Record one qualifying message for `user` on `today`.
    pub fn record_message(&mut self, user: UserId, today: NaiveDate) -> MessageTally {
        let entry = self
            .entries
            .entry(user)
            .or_insert(DayCount { day: today, count: 0 });
        if entry.day != today {
            *entry = DayCount { day: today, count: 0 };
        }
        entry.count += 1;

        MessageTally {
            count: entry.count,
            crossed_threshold: entry.count == self.threshold,
        }
    }

    /// Unconditionally stamp every existing entry to `{today, 0}`. Does not
    /// create entries for users with no prior activity. Returns the number
    /// of entries stamped, for the sweep's summary record.
    pub fn reset_all(&mut self, today: NaiveDate) -> usize {
        for entry in self.entries.values_mut() {
            *entry = DayCount { day: today, count: 0 };
        }
        self.entries.len()
    }

    /// Current count for the user on `today` (0 if absent or stale).
    pub fn count(&self, user: UserId, today: NaiveDate) -> u32 {
        match self.entries.get(&user) {
            Some(entry) if entry.day == today => entry.count,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn test_threshold_fires_exactly_once() {
        let mut activity = DailyActivity::new(10);
        let user = UserId::new(1);
        let today = day(1);

        for i in 1..=9 {
            let tally = activity.record_message(user, today);
            assert_eq!(tally.count, i);
            assert!(!tally.crossed_threshold);
        }

        let tenth = activity.record_message(user, today);
        assert_eq!(tenth.count, 10);
        assert!(tenth.crossed_threshold);

        let eleventh = activity.record_message(user, today);
        assert_eq!(eleventh.count, 11);
        assert!(!eleventh.crossed_threshold);
    }

    #[test]
    fn test_stale_day_resets_before_increment() {
        let mut activity = DailyActivity::new(10);
        let user = UserId::new(1);

        for _ in 0..5 {
            activity.record_message(user, day(1));
        }
        assert_eq!(activity.count(user, day(1)), 5);

        let tally = activity.record_message(user, day(2));
        assert_eq!(tally.count, 1);
        assert_eq!(activity.count(user, day(2)), 1);
        assert_eq!(activity.count(user, day(1)), 0);
    }

    #[test]
    fn test_reset_all_stamps_every_entry() {
        let mut activity = DailyActivity::new(10);
        activity.record_message(UserId::new(1), day(1));
        activity.record_message(UserId::new(2), day(1));

        let stamped = activity.reset_all(day(2));
        assert_eq!(stamped, 2);
        assert_eq!(activity.count(UserId::new(1), day(2)), 0);

        // Threshold can fire again after the sweep.
        let tally = activity.record_message(UserId::new(1), day(2));
        assert_eq!(tally.count, 1);
    }

    #[test]
    fn test_reset_all_creates_no_entries() {
        let mut activity = DailyActivity::new(10);
        assert_eq!(activity.reset_all(day(1)), 0);
    }

    #[test]
    fn test_redundant_reset_on_current_day() {
        // The sweep stamps unconditionally, even entries already on "today".
        let mut activity = DailyActivity::new(10);
        let user = UserId::new(1);
        for _ in 0..3 {
            activity.record_message(user, day(1));
        }
        activity.reset_all(day(1));
        assert_eq!(activity.count(user, day(1)), 0);
    }
}
