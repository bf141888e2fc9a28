// travelcard/src/records/hsl/period_pass.rs

//! Season tickets.
//!
//! The file has room for two periods. A renewal is written to whichever
//! slot is free, so the slot order says nothing about which period is
//! current; the reconciled view in [`PeriodPass`] works that out from the
//! dates and today's date.

use chrono::NaiveDate;
use log::debug;

use crate::constants::HSL_PERIOD_PASS_LEN;
use crate::protocol::area::{decode_area_at, AreaCode};
use crate::protocol::bits::{read_bits_at, read_date_at};
use crate::records::hsl::stamp_at;
use crate::records::validity::{days_remaining, is_valid_period, next_day_tick, Remaining};
use crate::records::{check_len, diff, Record};
use crate::utils::time::{end_of_day, start_of_day, LocalDateTime};

/// One raw period slot as stored on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodSlot {
    pub area: AreaCode,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodSlot {
    pub fn is_valid(&self) -> bool {
        is_valid_period(self.start, self.end)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn length_days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1).max(0) as u32
    }
}

/// A reconciled period.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Period {
    pub valid: bool,
    pub area: AreaCode,
    pub start: Option<LocalDateTime>,
    pub end: Option<LocalDateTime>,
    /// Length of the period in days.
    pub period_days: u32,
    pub days_remaining: Remaining,
    /// Loading details; only the most recently loaded period carries them.
    pub loading_time: Option<LocalDateTime>,
    pub price: u32,
    pub loaded_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodField {
    Valid,
    Area,
    StartDate,
    EndDate,
    PeriodDays,
    DaysRemaining,
    LoadingTime,
    Price,
    LoadedDays,
}

impl Period {
    fn changed_fields(&self, p: &Self, wrap: fn(PeriodField) -> PeriodPassField, out: &mut Vec<PeriodPassField>) {
        use PeriodField::*;
        diff(out, &self.valid, &p.valid, wrap(Valid));
        diff(out, &self.area, &p.area, wrap(Area));
        diff(out, &self.start, &p.start, wrap(StartDate));
        diff(out, &self.end, &p.end, wrap(EndDate));
        diff(out, &self.period_days, &p.period_days, wrap(PeriodDays));
        diff(out, &self.days_remaining, &p.days_remaining, wrap(DaysRemaining));
        diff(out, &self.loading_time, &p.loading_time, wrap(LoadingTime));
        diff(out, &self.price, &p.price, wrap(Price));
        diff(out, &self.loaded_days, &p.loaded_days, wrap(LoadedDays));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PeriodPass {
    #[cfg_attr(feature = "serde", serde(skip))]
    slots: [PeriodSlot; 2],
    pub loading_time: Option<LocalDateTime>,
    pub loaded_period_days: u32,
    pub loaded_period_price: u32,
    /// The current (or next) period.
    pub period1: Period,
    /// The other period, if the card holds two.
    pub period2: Period,
    /// Days left counting a directly following second period.
    pub effective_days_remaining: Remaining,
    pub effective_end: Option<LocalDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodPassField {
    Period1(PeriodField),
    Period2(PeriodField),
    LoadingTime,
    LoadedPeriodDays,
    LoadedPeriodPrice,
    EffectiveDaysRemaining,
    EffectiveEndDate,
    Data,
}

impl PeriodPass {
    pub fn slots(&self) -> &[PeriodSlot; 2] {
        &self.slots
    }

    /// Slot indices as (current, other) for `today`.
    fn order(&self, today: NaiveDate) -> (Option<usize>, Option<usize>) {
        let [a, b] = &self.slots;
        match (a.is_valid(), b.is_valid()) {
            (true, true) => {
                let (later, other) = if a.end > b.end { (0, 1) } else { (1, 0) };
                let (l, o) = (&self.slots[later], &self.slots[other]);
                if o.contains(today) && !l.contains(today) {
                    (Some(other), Some(later))
                } else {
                    (Some(later), Some(other))
                }
            }
            (true, false) => (Some(0), None),
            (false, true) => (Some(1), None),
            (false, false) => (None, None),
        }
    }

    /// The slot holding the most recent load: the one ending last.
    fn loaded_slot(&self) -> Option<usize> {
        let [a, b] = &self.slots;
        match (a.is_valid(), b.is_valid()) {
            (true, true) if a.end > b.end => Some(0),
            (true, true) => Some(1),
            (true, false) => Some(0),
            (false, true) => Some(1),
            (false, false) => None,
        }
    }

    fn period(&self, index: Option<usize>, today: NaiveDate) -> Period {
        let Some(index) = index else {
            return Period::default();
        };
        let slot = &self.slots[index];
        let loaded = self.loaded_slot() == Some(index);
        Period {
            valid: true,
            area: slot.area,
            start: Some(start_of_day(slot.start)),
            end: Some(end_of_day(slot.end)),
            period_days: slot.length_days(),
            days_remaining: days_remaining(slot.start, slot.end, today),
            loading_time: if loaded { self.loading_time } else { None },
            price: if loaded { self.loaded_period_price } else { 0 },
            loaded_days: if loaded { self.loaded_period_days } else { 0 },
        }
    }
}

impl Record for PeriodPass {
    type Field = PeriodPassField;
    const DATA_FIELD: PeriodPassField = PeriodPassField::Data;
    const NAME: &'static str = "HSL period pass";

    fn decode(b: &[u8]) -> Option<Self> {
        if !check_len(Self::NAME, b, HSL_PERIOD_PASS_LEN) {
            return None;
        }
        let slots = [
            PeriodSlot {
                area: decode_area_at(b, 1, 7, 2, 1),
                start: read_date_at(b, 2, 7),
                end: read_date_at(b, 4, 5),
            },
            PeriodSlot {
                area: decode_area_at(b, 8, 7, 9, 1),
                start: read_date_at(b, 9, 7),
                end: read_date_at(b, 11, 5),
            },
        ];
        debug!("period slots {:?}", slots);
        Some(PeriodPass {
            slots,
            loading_time: stamp_at(b, (15, 7), (17, 5)),
            loaded_period_days: read_bits_at(b, 19, 0, 9),
            loaded_period_price: read_bits_at(b, 20, 1, 20),
            ..Default::default()
        })
    }

    fn refresh(&mut self, now: &LocalDateTime) {
        let today = now.date_naive();
        let (current, other) = self.order(today);
        self.period1 = self.period(current, today);
        self.period2 = self.period(other, today);

        let contiguous = match (current, other) {
            (Some(i), Some(j)) => self.slots[i].end.succ_opt() == Some(self.slots[j].start),
            _ => false,
        };
        if contiguous {
            self.effective_end = self.period2.end;
            self.effective_days_remaining = match self.period1.days_remaining {
                Remaining::Left(n) => Remaining::Left(n + self.period2.period_days),
                Remaining::Ended => self.period2.days_remaining,
                other => other,
            };
        } else {
            self.effective_end = self.period1.end;
            self.effective_days_remaining = self.period1.days_remaining;
        }
    }

    fn next_refresh(&self, now: &LocalDateTime) -> Option<LocalDateTime> {
        let ticking = |r: Remaining| matches!(r, Remaining::Left(_) | Remaining::NotYetStarted);
        if ticking(self.period1.days_remaining) || ticking(self.period2.days_remaining) {
            Some(next_day_tick(now))
        } else {
            None
        }
    }

    fn changed_fields(&self, p: &Self) -> Vec<PeriodPassField> {
        use PeriodPassField::*;
        let mut out = Vec::new();
        self.period1.changed_fields(&p.period1, Period1, &mut out);
        self.period2.changed_fields(&p.period2, Period2, &mut out);
        diff(&mut out, &self.loading_time, &p.loading_time, LoadingTime);
        diff(&mut out, &self.loaded_period_days, &p.loaded_period_days, LoadedPeriodDays);
        diff(&mut out, &self.loaded_period_price, &p.loaded_period_price, LoadedPeriodPrice);
        diff(&mut out, &self.effective_days_remaining, &p.effective_days_remaining, EffectiveDaysRemaining);
        diff(&mut out, &self.effective_end, &p.effective_end, EffectiveEndDate);
        out
    }
}
