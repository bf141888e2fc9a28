// travelcard/src/protocol/block.rs

use crate::types::StatusWord;
use crate::utils::bytes_to_hex;
use crate::{Error, Result};

/// Length rule a block must satisfy once its final status word arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeConstraint {
    /// Exactly this many bytes.
    Exact(usize),
    /// Any whole number of records of this size, including none.
    RecordMultiple(usize),
}

impl SizeConstraint {
    pub fn check(&self, block: &'static str, actual: usize) -> Result<()> {
        match *self {
            SizeConstraint::Exact(expected) if actual != expected => {
                Err(Error::InvalidLength { expected, actual })
            }
            SizeConstraint::RecordMultiple(record_size)
                if record_size == 0 || actual % record_size != 0 =>
            {
                Err(Error::RecordSizeMismatch {
                    block,
                    record_size,
                    actual,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Bytes of one logical card file, accumulated across continuation frames,
/// together with the status words the card answered with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBlock {
    key: &'static str,
    bytes: Vec<u8>,
    prepare_status: Option<StatusWord>,
    read_status: Option<StatusWord>,
}

impl RawBlock {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            ..Default::default()
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn append(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    /// Drop collected bytes but keep the recorded status words.
    pub fn discard_data(&mut self) {
        self.bytes.clear();
    }

    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.bytes)
    }

    pub fn prepare_status(&self) -> Option<StatusWord> {
        self.prepare_status
    }

    pub fn read_status(&self) -> Option<StatusWord> {
        self.read_status
    }

    pub fn set_prepare_status(&mut self, sw: StatusWord) {
        self.prepare_status = Some(sw);
    }

    pub fn set_read_status(&mut self, sw: StatusWord) {
        self.read_status = Some(sw);
    }
}
