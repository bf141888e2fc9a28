// travelcard/src/records/nysse/history.rs

use log::{debug, warn};

use crate::constants::NYSSE_HISTORY_ENTRY_LEN;
use crate::records::nysse::{le16, nysse_date_time};
use crate::records::{diff, HistoryField, Record, TransactionEntry, TransactionType};

/// Recent transactions, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NysseHistory {
    pub entries: Vec<TransactionEntry>,
}

/// Best-effort mapping of the transaction codes seen on cards.
pub fn transaction_type(code: u32) -> TransactionType {
    match code {
        0xd417 => TransactionType::Issue,
        0x1018 => TransactionType::Charge,
        0x4c04 => TransactionType::Deposit,
        0xbde07 => TransactionType::Boarding,
        0x548 | 0xb48 => TransactionType::Validation,
        _ => TransactionType::Unknown,
    }
}

fn decode_entry(e: &[u8]) -> TransactionEntry {
    let code = u32::from_be_bytes([e[2], e[3], e[4], e[5]]);
    TransactionEntry {
        kind: transaction_type(code),
        time: Some(nysse_date_time(le16(e, 0), le16(e, 6))),
        price: le16(e, 8) as u32,
        group_size: None,
        remaining_value: None,
    }
}

impl Record for NysseHistory {
    type Field = HistoryField;
    const DATA_FIELD: HistoryField = HistoryField::Data;
    const NAME: &'static str = "Nysse history";

    fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        let trailing = bytes.len() % NYSSE_HISTORY_ENTRY_LEN;
        if trailing != 0 {
            warn!("{}: ignoring {} trailing bytes", Self::NAME, trailing);
        }
        let entries: Vec<_> = bytes
            .chunks_exact(NYSSE_HISTORY_ENTRY_LEN)
            .rev()
            .map(decode_entry)
            .collect();
        debug!("{}: {} entries", Self::NAME, entries.len());
        Some(NysseHistory { entries })
    }

    fn changed_fields(&self, previous: &Self) -> Vec<HistoryField> {
        let mut out = Vec::new();
        diff(&mut out, &self.entries.len(), &previous.entries.len(), HistoryField::Count);
        diff(&mut out, &self.entries, &previous.entries, HistoryField::Entries);
        out
    }
}
