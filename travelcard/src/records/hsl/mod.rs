// travelcard/src/records/hsl/mod.rs

use std::collections::BTreeMap;

use crate::constants::*;
use crate::protocol::bits::{read_date_at, read_time_at};
use crate::records::validity::is_valid_date;
use crate::records::{earliest, RecordView};
use crate::utils::time::{helsinki_local, LocalDateTime};

pub mod app_info;
pub mod eticket;
pub mod history;
pub mod period_pass;
pub mod stored_value;

pub use app_info::{AppInfo, AppInfoField};
pub use eticket::{Eticket, EticketField, Language, ValidityLengthType};
pub use history::HslHistory;
pub use period_pass::{Period, PeriodField, PeriodPass, PeriodPassField, PeriodSlot};
pub use stored_value::{StoredValue, StoredValueField};

/// Date and time fields at `(byte, bit)` positions, or `None` when the
/// date is unset.
pub(crate) fn stamp_at(buf: &[u8], date: (usize, usize), time: (usize, usize)) -> Option<LocalDateTime> {
    let day = read_date_at(buf, date.0, date.1);
    if !is_valid_date(day) {
        return None;
    }
    let time = read_time_at(buf, time.0, time.1);
    Some(helsinki_local(day.and_time(time)))
}

/// Every record of an HSL card.
#[derive(Debug, Clone, Default)]
pub struct HslCardInfo {
    pub app_info: RecordView<AppInfo>,
    pub period_pass: RecordView<PeriodPass>,
    pub stored_value: RecordView<StoredValue>,
    pub eticket: RecordView<Eticket>,
    pub history: RecordView<HslHistory>,
}

impl HslCardInfo {
    pub fn from_fields(fields: &BTreeMap<String, String>, now: &LocalDateTime) -> Self {
        let mut card = Self::default();
        card.update(fields, now);
        card
    }

    /// Apply a new field map. Missing keys clear the record.
    pub fn update(&mut self, fields: &BTreeMap<String, String>, now: &LocalDateTime) {
        let get = |key: &str| fields.get(key).map(String::as_str).unwrap_or("");
        self.app_info.set_data(get(HSL_APP_INFO_KEY), now);
        self.period_pass.set_data(get(HSL_PERIOD_PASS_KEY), now);
        self.stored_value.set_data(get(HSL_STORED_VALUE_KEY), now);
        self.eticket.set_data(get(HSL_ETICKET_KEY), now);
        self.history.set_data(get(HSL_HISTORY_KEY), now);
    }

    pub fn refresh(&mut self, now: &LocalDateTime) {
        self.period_pass.refresh(now);
        self.eticket.refresh(now);
    }

    pub fn next_refresh(&self, now: &LocalDateTime) -> Option<LocalDateTime> {
        earliest(self.period_pass.next_refresh(now), self.eticket.next_refresh(now))
    }
}
