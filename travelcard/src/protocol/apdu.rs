// travelcard/src/protocol/apdu.rs

use crate::types::StatusWord;
use crate::utils::bytes_to_hex_spaced;
use crate::{Error, Result};
use std::fmt;

/// A command APDU.
///
/// Every command the drivers issue is a fixed byte sequence, so the payload
/// borrows static data and the whole struct stays `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Apdu {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: &'static [u8],
    /// Expected response length. 0 means no Le field; 256 is encoded as `00`.
    pub le: u32,
}

impl Apdu {
    /// Default Le used by every DESFire native command wrapped in ISO 7816.
    pub const LE_MAX: u32 = 0x100;

    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8, data: &'static [u8]) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data,
            le: Self::LE_MAX,
        }
    }

    pub const fn with_le(mut self, le: u32) -> Self {
        self.le = le;
        self
    }

    /// Serialise as a short (or, for Le > 256, extended) ISO 7816-4 command.
    pub fn to_bytes(&self) -> Vec<u8> {
        let extended = self.data.len() > 255 || self.le > 0x100;
        let mut out = Vec::with_capacity(4 + 3 + self.data.len() + 3);
        out.extend_from_slice(&[self.cla, self.ins, self.p1, self.p2]);
        if extended {
            out.push(0x00);
            if !self.data.is_empty() {
                out.extend_from_slice(&(self.data.len() as u16).to_be_bytes());
                out.extend_from_slice(self.data);
            }
            if self.le > 0 {
                out.extend_from_slice(&((self.le & 0xffff) as u16).to_be_bytes());
            }
        } else {
            if !self.data.is_empty() {
                out.push(self.data.len() as u8);
                out.extend_from_slice(self.data);
            }
            if self.le > 0 {
                out.push((self.le & 0xff) as u8);
            }
        }
        out
    }
}

impl fmt::Display for Apdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bytes_to_hex_spaced(&self.to_bytes()))
    }
}

/// A response APDU: payload plus trailing status word.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApduResponse {
    pub data: Vec<u8>,
    pub sw: StatusWord,
}

impl ApduResponse {
    pub fn new(data: impl Into<Vec<u8>>, sw: StatusWord) -> Self {
        Self {
            data: data.into(),
            sw,
        }
    }

    /// Split a raw response into payload and the trailing SW1 SW2.
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        if raw.len() < 2 {
            return Err(Error::InvalidLength {
                expected: 2,
                actual: raw.len(),
            });
        }
        let (data, sw) = raw.split_at(raw.len() - 2);
        Ok(Self {
            data: data.to_vec(),
            sw: StatusWord::from_parts(sw[0], sw[1]),
        })
    }
}
