// travelcard/src/records/nysse/mod.rs

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeDelta};

use crate::constants::*;
use crate::records::RecordView;
use crate::utils::time::{helsinki_local, LocalDateTime};

pub mod balance;
pub mod history;
pub mod owner_info;
pub mod season_pass;

pub use balance::{Balance, BalanceField};
pub use history::{transaction_type, NysseHistory};
pub use owner_info::{OwnerInfo, OwnerInfoField};
pub use season_pass::{SeasonPass, SeasonPassField};

/// Nysse timestamps: days since 1900-01-01 and half-minutes since
/// midnight, in Finnish local time.
pub fn nysse_date_time(days: u16, half_minutes: u16) -> LocalDateTime {
    let base = NaiveDate::from_ymd_opt(1900, 1, 1)
        .unwrap_or_default()
        .and_time(chrono::NaiveTime::MIN);
    let naive = base
        + TimeDelta::days(days as i64)
        + TimeDelta::seconds(half_minutes as i64 * 30);
    helsinki_local(naive)
}

pub(crate) fn le16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

pub(crate) fn be16(b: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([b[at], b[at + 1]])
}

/// Every record of a Nysse card.
#[derive(Debug, Clone, Default)]
pub struct NysseCardInfo {
    /// Application info is kept raw; its layout is not known.
    pub app_info: String,
    pub owner_info: RecordView<OwnerInfo>,
    pub balance: RecordView<Balance>,
    pub season_pass: RecordView<SeasonPass>,
    pub history: RecordView<NysseHistory>,
    /// Per-block PREPARE/READ status words, keyed like the field map.
    pub status: BTreeMap<String, String>,
}

impl NysseCardInfo {
    pub fn from_fields(fields: &BTreeMap<String, String>, now: &LocalDateTime) -> Self {
        let mut card = Self::default();
        card.update(fields, now);
        card
    }

    /// Apply a new field map. Missing keys clear the record.
    pub fn update(&mut self, fields: &BTreeMap<String, String>, now: &LocalDateTime) {
        let get = |key: &str| fields.get(key).map(String::as_str).unwrap_or("");
        self.app_info = get(NYSSE_APP_INFO_KEY).to_ascii_lowercase();
        self.owner_info.set_data(get(NYSSE_OWNER_INFO_KEY), now);
        self.balance.set_data(get(NYSSE_BALANCE_KEY), now);
        self.season_pass.set_data(get(NYSSE_SEASON_PASS_KEY), now);
        self.history.set_data(get(NYSSE_HISTORY_KEY), now);
        self.status = fields
            .iter()
            .filter(|(k, _)| k.ends_with(PREPARE_STATUS_SUFFIX) || k.ends_with(READ_STATUS_SUFFIX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
    }

    /// Whether the balance file could be read.
    pub fn has_balance(&self) -> bool {
        !self.balance.data().is_empty()
    }

    pub fn refresh(&mut self, now: &LocalDateTime) {
        self.season_pass.refresh(now);
    }

    pub fn next_refresh(&self, now: &LocalDateTime) -> Option<LocalDateTime> {
        self.season_pass.next_refresh(now)
    }
}
