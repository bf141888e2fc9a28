// travelcard/src/records/nysse/balance.rs

use crate::constants::NYSSE_BALANCE_LEN;
use crate::records::{check_len, diff, Record};

/// Purse balance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Balance {
    /// Cents.
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceField {
    Value,
    Data,
}

impl Record for Balance {
    type Field = BalanceField;
    const DATA_FIELD: BalanceField = BalanceField::Data;
    const NAME: &'static str = "Nysse balance";

    fn decode(bytes: &[u8]) -> Option<Self> {
        if !check_len(Self::NAME, bytes, NYSSE_BALANCE_LEN) {
            return None;
        }
        let value = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Some(Balance { value })
    }

    fn changed_fields(&self, previous: &Self) -> Vec<BalanceField> {
        let mut out = Vec::new();
        diff(&mut out, &self.value, &previous.value, BalanceField::Value);
        out
    }
}
