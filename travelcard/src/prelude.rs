// travelcard/src/prelude.rs

pub use crate::card::{CardData, CardDriver, CardFamily, DriverOutcome, DriverState, FailureReason};
pub use crate::dispatch::{Changes, DispatchState, Dispatcher, DispatcherBuilder};
pub use crate::protocol::{Apdu, ApduResponse, AreaCode, AreaType, RawBlock};
pub use crate::records::{
    DecodedCard, HslCardInfo, NysseCardInfo, Record, RecordView, Remaining, TransactionEntry,
    TransactionType,
};
pub use crate::transport::{MockTransport, TagState, Transport, TransportEvent};
pub use crate::{Error, Result, StatusWord, TokenId};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, now_in_finland, parse_hex, LocalDateTime};
