// travelcard/src/types.rs

use derive_more::{Display, From};
use std::sync::atomic::{AtomicU64, Ordering};

/// ISO 7816 status word (SW1 << 8 | SW2).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[display(fmt = "{:04x}", _0)]
pub struct StatusWord(u16);

impl StatusWord {
    /// Plain ISO 7816 success.
    pub const SUCCESS: StatusWord = StatusWord(0x9000);
    /// DESFire native "operation ok".
    pub const DESFIRE_OK: StatusWord = StatusWord(0x9100);
    /// DESFire native "additional frame".
    pub const DESFIRE_MORE: StatusWord = StatusWord(0x91af);

    pub const fn new(sw: u16) -> Self {
        Self(sw)
    }

    pub const fn from_parts(sw1: u8, sw2: u8) -> Self {
        Self(((sw1 as u16) << 8) | sw2 as u16)
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    pub const fn sw1(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn sw2(self) -> u8 {
        self.0 as u8
    }
}

/// Identifier of a cancellable transport request.
///
/// Every completion delivered by a transport carries the id of the token it
/// was submitted with, so a driver can recognise (and ignore) completions
/// that belong to an earlier session.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display(fmt = "#{}", _0)]
pub struct TokenId(u64);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

impl TokenId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}
