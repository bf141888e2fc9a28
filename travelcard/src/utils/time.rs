// travelcard/src/utils/time.rs

//! Finnish local time helpers.
//!
//! Every timestamp stored on a card is Europe/Helsinki wall-clock time, so
//! the decoders build [`LocalDateTime`] values directly from naive fields.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Europe::Helsinki;
use chrono_tz::Tz;

/// A timestamp in the card's home time zone.
pub type LocalDateTime = DateTime<Tz>;

/// Current wall clock, in Europe/Helsinki.
pub fn now_in_finland() -> LocalDateTime {
    Utc::now().with_timezone(&Helsinki)
}

/// Interpret a naive wall-clock value as Helsinki local time.
///
/// Ambiguous times (autumn fallback) resolve to the earlier instant. Times
/// skipped by the spring-forward gap are taken as standard time (UTC+2).
pub fn helsinki_local(naive: NaiveDateTime) -> LocalDateTime {
    match Helsinki.from_local_datetime(&naive).earliest() {
        Some(dt) => dt,
        None => Helsinki.from_utc_datetime(&(naive - TimeDelta::hours(2))),
    }
}

/// Start of `date` in Helsinki.
pub fn start_of_day(date: NaiveDate) -> LocalDateTime {
    helsinki_local(date.and_time(NaiveTime::MIN))
}

/// Last millisecond of `date` in Helsinki.
pub fn end_of_day(date: NaiveDate) -> LocalDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    helsinki_local(date.and_time(last))
}

/// The next Helsinki midnight strictly after `now`.
pub fn next_midnight(now: &LocalDateTime) -> LocalDateTime {
    let today = now.date_naive();
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
    start_of_day(tomorrow)
}

/// `date + days`, saturating at the calendar end.
pub(crate) fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}
