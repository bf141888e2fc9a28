// travelcard/src/records/hsl/history.rs

use log::{debug, warn};

use crate::constants::HSL_HISTORY_ENTRY_LEN;
use crate::protocol::bits::read_bits_at;
use crate::records::hsl::stamp_at;
use crate::records::{diff, HistoryField, Record, TransactionEntry, TransactionType};

/// Recent trips, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HslHistory {
    pub entries: Vec<TransactionEntry>,
}

fn decode_entry(e: &[u8]) -> TransactionEntry {
    let kind = match read_bits_at(e, 0, 0, 1) {
        0 => TransactionType::Boarding,
        _ => TransactionType::Purchase,
    };
    TransactionEntry {
        kind,
        time: stamp_at(e, (0, 1), (1, 7)),
        price: read_bits_at(e, 6, 3, 14),
        group_size: Some(read_bits_at(e, 8, 1, 6)),
        remaining_value: Some(read_bits_at(e, 8, 7, 20)),
    }
}

impl Record for HslHistory {
    type Field = HistoryField;
    const DATA_FIELD: HistoryField = HistoryField::Data;
    const NAME: &'static str = "HSL history";

    fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        let trailing = bytes.len() % HSL_HISTORY_ENTRY_LEN;
        if trailing != 0 {
            warn!("{}: ignoring {} trailing bytes", Self::NAME, trailing);
        }
        let entries: Vec<_> = bytes
            .chunks_exact(HSL_HISTORY_ENTRY_LEN)
            .rev()
            .map(decode_entry)
            .collect();
        debug!("{}: {} entries", Self::NAME, entries.len());
        Some(HslHistory { entries })
    }

    fn changed_fields(&self, previous: &Self) -> Vec<HistoryField> {
        let mut out = Vec::new();
        diff(&mut out, &self.entries.len(), &previous.entries.len(), HistoryField::Count);
        diff(&mut out, &self.entries, &previous.entries, HistoryField::Entries);
        out
    }
}
