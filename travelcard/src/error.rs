// travelcard/src/error.rs

use thiserror::Error;

use crate::types::StatusWord;

/// Common error type.
///
/// Driver-level errors are cloned into [`crate::card::DriverState::Failed`],
/// so every variant carries owned, cheaply clonable data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// APDU-level I/O failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request was cancelled before it completed.
    #[error("operation cancelled")]
    Cancelled,

    #[error("unexpected status {sw} for {step}")]
    UnexpectedStatus { step: String, sw: StatusWord },

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("{block}: {actual} bytes is not a multiple of {record_size}")]
    RecordSizeMismatch {
        block: &'static str,
        record_size: usize,
        actual: usize,
    },

    /// The tag is present but does not speak the required protocol.
    #[error("unsupported card")]
    UnsupportedCard,

    #[error("failed to lock the tag: {0}")]
    LockFailure(String),

    #[error("malformed {record} record: {reason}")]
    MalformedRecord { record: &'static str, reason: String },

    #[error("invalid hex: {0}")]
    HexDecode(String),

    #[error("unknown card type: {0}")]
    UnknownCardType(String),
}

impl Error {
    /// Classify the error the way a card driver reports its failure.
    pub fn failure_reason(&self) -> crate::card::FailureReason {
        use crate::card::FailureReason;
        match self {
            Error::UnsupportedCard => FailureReason::UnsupportedCard,
            Error::LockFailure(_) => FailureReason::LockFailure,
            _ => FailureReason::IoError,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
