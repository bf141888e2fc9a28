// travelcard/src/records/hsl/stored_value.rs

use crate::constants::HSL_STORED_VALUE_LEN;
use crate::protocol::bits::read_bits_at;
use crate::records::hsl::stamp_at;
use crate::records::{check_len, diff, Record};
use crate::utils::time::LocalDateTime;

/// Stored value (the card's purse).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StoredValue {
    /// Balance in cents.
    pub money_value: u32,
    pub loading_time: Option<LocalDateTime>,
    /// Amount of the last top-up, in cents.
    pub loaded_value: u32,
    pub loading_organisation: u32,
    pub loading_device: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoredValueField {
    MoneyValue,
    LoadingTime,
    LoadedValue,
    LoadingOrganisation,
    LoadingDevice,
    Data,
}

impl Record for StoredValue {
    type Field = StoredValueField;
    const DATA_FIELD: StoredValueField = StoredValueField::Data;
    const NAME: &'static str = "HSL stored value";

    fn decode(bytes: &[u8]) -> Option<Self> {
        if !check_len(Self::NAME, bytes, HSL_STORED_VALUE_LEN) {
            return None;
        }
        Some(StoredValue {
            money_value: read_bits_at(bytes, 0, 0, 20),
            loading_time: stamp_at(bytes, (2, 4), (4, 2)),
            loaded_value: read_bits_at(bytes, 5, 5, 20),
            loading_organisation: read_bits_at(bytes, 8, 1, 14),
            loading_device: read_bits_at(bytes, 9, 7, 14),
        })
    }

    fn changed_fields(&self, previous: &Self) -> Vec<StoredValueField> {
        use StoredValueField::*;
        let mut out = Vec::new();
        diff(&mut out, &self.money_value, &previous.money_value, MoneyValue);
        diff(&mut out, &self.loading_time, &previous.loading_time, LoadingTime);
        diff(&mut out, &self.loaded_value, &previous.loaded_value, LoadedValue);
        diff(&mut out, &self.loading_organisation, &previous.loading_organisation, LoadingOrganisation);
        diff(&mut out, &self.loading_device, &previous.loading_device, LoadingDevice);
        out
    }
}
