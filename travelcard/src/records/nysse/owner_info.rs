// travelcard/src/records/nysse/owner_info.rs

use crate::constants::NYSSE_OWNER_INFO_LEN;
use crate::records::{check_len, diff, Record};

const NAME_RANGE: std::ops::Range<usize> = 6..28;

/// Card holder details.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OwnerInfo {
    pub owner_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerInfoField {
    OwnerName,
    Data,
}

/// Latin-1 up to the first NUL.
fn latin1(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

impl Record for OwnerInfo {
    type Field = OwnerInfoField;
    const DATA_FIELD: OwnerInfoField = OwnerInfoField::Data;
    const NAME: &'static str = "Nysse owner info";

    fn decode(bytes: &[u8]) -> Option<Self> {
        if !check_len(Self::NAME, bytes, NYSSE_OWNER_INFO_LEN) {
            return None;
        }
        let owner_name = bytes.get(NAME_RANGE).map(latin1).unwrap_or_default();
        Some(OwnerInfo { owner_name })
    }

    fn changed_fields(&self, previous: &Self) -> Vec<OwnerInfoField> {
        let mut out = Vec::new();
        diff(&mut out, &self.owner_name, &previous.owner_name, OwnerInfoField::OwnerName);
        out
    }
}
