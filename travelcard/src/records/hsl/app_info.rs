// travelcard/src/records/hsl/app_info.rs

use log::debug;

use crate::constants::HSL_APP_INFO_LEN;
use crate::protocol::bits::read_bits_at;
use crate::records::{check_len, diff, Record};
use crate::utils::bytes_to_hex;

/// Application information: version and the printed card number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AppInfo {
    pub app_version: u32,
    /// 18 BCD digits, as printed on the card.
    pub card_number: String,
    pub platform_type: u32,
    pub security_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppInfoField {
    AppVersion,
    CardNumber,
    PlatformType,
    SecurityLevel,
    Data,
}

impl AppInfo {
    /// Card number grouped the way it is printed: `924620 0012 3456 7890`.
    pub fn formatted_card_number(&self) -> String {
        let n = &self.card_number;
        if n.len() != 18 || !n.is_ascii() {
            return n.clone();
        }
        format!("{} {} {} {}", &n[..6], &n[6..10], &n[10..14], &n[14..])
    }
}

impl Record for AppInfo {
    type Field = AppInfoField;
    const DATA_FIELD: AppInfoField = AppInfoField::Data;
    const NAME: &'static str = "HSL app info";

    fn decode(bytes: &[u8]) -> Option<Self> {
        if !check_len(Self::NAME, bytes, HSL_APP_INFO_LEN) {
            return None;
        }
        let info = AppInfo {
            app_version: read_bits_at(bytes, 0, 0, 4),
            card_number: bytes_to_hex(&bytes[1..10]),
            platform_type: read_bits_at(bytes, 10, 0, 3),
            security_level: read_bits_at(bytes, 10, 3, 1),
        };
        debug!("{:?}", info);
        Some(info)
    }

    fn changed_fields(&self, previous: &Self) -> Vec<AppInfoField> {
        let mut out = Vec::new();
        diff(&mut out, &self.app_version, &previous.app_version, AppInfoField::AppVersion);
        diff(&mut out, &self.card_number, &previous.card_number, AppInfoField::CardNumber);
        diff(&mut out, &self.platform_type, &previous.platform_type, AppInfoField::PlatformType);
        diff(&mut out, &self.security_level, &previous.security_level, AppInfoField::SecurityLevel);
        out
    }
}
