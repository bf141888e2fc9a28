// travelcard/src/records/validity.rs

//! Validity windows and countdowns.

use chrono::{NaiveDate, TimeDelta};

use crate::protocol::bits::en1545_epoch;
use crate::utils::time::{next_midnight, LocalDateTime};

/// How much of a validity window is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Remaining {
    /// No usable window.
    #[default]
    Invalid,
    NotYetStarted,
    Ended,
    /// Whole units (seconds or days) left, rounded up.
    Left(u32),
}

impl Remaining {
    pub fn left(&self) -> Option<u32> {
        match *self {
            Remaining::Left(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Remaining::Left(_))
    }
}

/// Dates on or before the EN 1545 epoch mean "not set".
pub fn is_valid_date(date: NaiveDate) -> bool {
    date > en1545_epoch()
}

pub fn is_valid_period(start: NaiveDate, end: NaiveDate) -> bool {
    is_valid_date(start) && is_valid_date(end) && start <= end
}

pub fn is_valid_time_period(start: &LocalDateTime, end: &LocalDateTime) -> bool {
    is_valid_period(start.date_naive(), end.date_naive()) && start <= end
}

pub fn seconds_remaining(start: &LocalDateTime, end: &LocalDateTime, now: &LocalDateTime) -> Remaining {
    if !is_valid_time_period(start, end) {
        Remaining::Invalid
    } else if now < start {
        Remaining::NotYetStarted
    } else if now > end {
        Remaining::Ended
    } else {
        let msecs = (*end - *now).num_milliseconds();
        Remaining::Left((msecs / 1000 + 1) as u32)
    }
}

pub fn days_remaining(first: NaiveDate, last: NaiveDate, today: NaiveDate) -> Remaining {
    if !is_valid_period(first, last) {
        Remaining::Invalid
    } else if today < first {
        Remaining::NotYetStarted
    } else if today > last {
        Remaining::Ended
    } else {
        Remaining::Left((last - today).num_days() as u32 + 1)
    }
}

/// When a seconds countdown towards `end` next changes value.
pub fn next_second_tick(end: &LocalDateTime, now: &LocalDateTime) -> LocalDateTime {
    let msecs = (*end - *now).num_milliseconds();
    let interval = match msecs % 1000 {
        0 => 1000,
        ms => ms,
    };
    *now + TimeDelta::milliseconds(interval)
}

/// When a day countdown next changes value: just after local midnight.
pub fn next_day_tick(now: &LocalDateTime) -> LocalDateTime {
    next_midnight(now) + TimeDelta::seconds(1)
}
