// travelcard/src/card/mod.rs

//! Card drivers.
//!
//! A driver runs one read transaction against a tag: wait until the tag is
//! probed, take a lock, SELECT the application and read every block of its
//! [`CardProfile`]. Drivers never block; they advance on
//! [`TransportEvent`]s handed to them by the owner.

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{CARD_TYPE_KEY, PREPARE_STATUS_SUFFIX, READ_STATUS_SUFFIX};
use crate::protocol::block::RawBlock;
use crate::transport::{Transport, TransportEvent};
use crate::{Error, Result};

pub mod driver;
pub mod hsl;
pub mod nysse;
pub mod profile;
pub mod session;

pub use driver::IsoDepDriver;
pub use profile::{BlockSpec, CardProfile};
pub use session::Session;

/// Position inside a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Select,
    /// PREPARE for the block at this index of the profile.
    Prepare(usize),
    /// READ (or continuation) for the block at this index.
    Read(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Select => f.write_str("SELECT"),
            Step::Prepare(i) => write!(f, "PREPARE[{}]", i),
            Step::Read(i) => write!(f, "READ[{}]", i),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DriverState {
    #[default]
    Idle,
    AwaitingTag,
    AwaitingLock,
    Transacting(Step),
    Succeeded,
    Failed(Error),
}

impl DriverState {
    pub fn is_finished(&self) -> bool {
        matches!(self, DriverState::Succeeded | DriverState::Failed(_))
    }
}

/// Coarse classification of a failed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailureReason {
    UnsupportedCard,
    LockFailure,
    IoError,
}

/// Everything a successful read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardData {
    pub card_type: &'static str,
    pub page_url: &'static str,
    pub blocks: Vec<RawBlock>,
    /// Whether per-block status words are exported with the data.
    pub export_status: bool,
}

impl CardData {
    /// Flatten into the string map handed to the presentation layer.
    pub fn fields(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        out.insert(CARD_TYPE_KEY.to_string(), self.card_type.to_string());
        for block in &self.blocks {
            out.insert(block.key().to_string(), block.to_hex());
            if self.export_status {
                out.insert(
                    format!("{}{}", block.key(), PREPARE_STATUS_SUFFIX),
                    status_hex(block.prepare_status()),
                );
                out.insert(
                    format!("{}{}", block.key(), READ_STATUS_SUFFIX),
                    status_hex(block.read_status()),
                );
            }
        }
        out
    }

    pub fn block(&self, key: &str) -> Option<&RawBlock> {
        self.blocks.iter().find(|b| b.key() == key)
    }
}

fn status_hex(sw: Option<crate::types::StatusWord>) -> String {
    sw.map(|sw| sw.to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverOutcome {
    Succeeded(CardData),
    Failed(Error),
}

/// One card family's read transaction.
pub trait CardDriver {
    /// Family name, as exported under `cardType`.
    fn card_type(&self) -> &'static str;

    fn state(&self) -> &DriverState;

    /// Begin the transaction. Returns an outcome if it finished immediately.
    fn start(&mut self, transport: &mut dyn Transport) -> Option<DriverOutcome>;

    /// Advance on a transport event. Events for other sessions are ignored.
    fn handle_event(
        &mut self,
        event: TransportEvent,
        transport: &mut dyn Transport,
    ) -> Option<DriverOutcome>;

    /// Abandon an unfinished transaction: cancel its token and release the
    /// lock now. Returns `Failed(Cancelled)` if it was still running.
    fn abort(&mut self) -> Option<DriverOutcome>;

    /// True while the driver holds a session (token and possibly a lock).
    fn has_session(&self) -> bool;
}

/// A registered card family: its name and how to build its driver.
#[derive(Clone, Copy)]
pub struct CardFamily {
    pub name: &'static str,
    pub new_driver: fn() -> Box<dyn CardDriver>,
}

impl fmt::Debug for CardFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardFamily").field("name", &self.name).finish()
    }
}

/// The built-in families in probing order.
pub fn default_families() -> Vec<CardFamily> {
    vec![hsl::FAMILY, nysse::FAMILY]
}

/// Factory to create a driver by family name.
pub fn create_driver_for(card_type: &str) -> Result<Box<dyn CardDriver>> {
    default_families()
        .into_iter()
        .find(|f| f.name == card_type)
        .map(|f| (f.new_driver)())
        .ok_or_else(|| Error::UnknownCardType(card_type.to_string()))
}
