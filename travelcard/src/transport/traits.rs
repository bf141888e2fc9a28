// travelcard/src/transport/traits.rs

use crate::protocol::apdu::{Apdu, ApduResponse};
use crate::transport::{CancelToken, TagLock};
use crate::types::TokenId;
use crate::Result;

/// Presence and validity of the tag and of its ISO-DEP interface.
///
/// "Valid" means the platform has finished probing the object; "present"
/// means it is still in the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagState {
    pub tag_valid: bool,
    pub tag_present: bool,
    pub iso_dep_valid: bool,
    pub iso_dep_present: bool,
}

impl TagState {
    /// An ISO-DEP tag sitting in the field.
    pub const fn iso_dep() -> Self {
        Self {
            tag_valid: true,
            tag_present: true,
            iso_dep_valid: true,
            iso_dep_present: true,
        }
    }

    /// A probed tag without an ISO-DEP interface.
    pub const fn without_iso_dep() -> Self {
        Self {
            tag_valid: true,
            tag_present: true,
            iso_dep_valid: true,
            iso_dep_present: false,
        }
    }

    /// A probed tag that has left the field.
    pub const fn removed() -> Self {
        Self {
            tag_valid: true,
            tag_present: false,
            iso_dep_valid: true,
            iso_dep_present: false,
        }
    }

    pub fn is_probed(&self) -> bool {
        self.tag_valid && self.iso_dep_valid
    }

    pub fn is_ready(&self) -> bool {
        self.is_probed() && self.tag_present && self.iso_dep_present
    }
}

/// Completion or notification delivered by a transport.
#[derive(Debug)]
pub enum TransportEvent {
    TagChanged(TagState),
    LockResult {
        token: TokenId,
        result: Result<TagLock>,
    },
    Response {
        token: TokenId,
        result: Result<ApduResponse>,
    },
}

impl TransportEvent {
    /// The request this event answers, if any.
    pub fn token(&self) -> Option<TokenId> {
        match self {
            TransportEvent::TagChanged(_) => None,
            TransportEvent::LockResult { token, .. } | TransportEvent::Response { token, .. } => {
                Some(*token)
            }
        }
    }
}

/// Transport trait abstracts the NFC stack away from card logic.
///
/// Requests are submitted without blocking; their completions are later
/// returned by [`Transport::next_event`] on the caller's thread. A request
/// whose token is cancelled before it completes must still produce exactly
/// one completion, carrying `Error::Cancelled`.
pub trait Transport {
    /// Bind to the tag at `path`. Transports with a single fixed target can
    /// keep the default.
    fn attach(&mut self, _path: &str) -> Result<()> {
        Ok(())
    }

    /// Current tag and ISO-DEP state.
    fn tag_state(&self) -> TagState;

    /// Submit an APDU exchange.
    fn transmit(&mut self, apdu: &Apdu, cancel: &CancelToken) -> Result<()>;

    /// Ask for a tag lock.
    fn acquire_lock(&mut self, exclusive: bool, cancel: &CancelToken) -> Result<()>;

    /// Next pending completion or notification, if any.
    fn next_event(&mut self) -> Option<TransportEvent>;
}
