// travelcard/src/card/profile.rs

use crate::protocol::apdu::Apdu;
use crate::protocol::block::SizeConstraint;
use crate::types::StatusWord;

/// One logical file on the card and how to fetch it.
#[derive(Debug, Clone, Copy)]
pub struct BlockSpec {
    /// Name used in logs and errors.
    pub name: &'static str,
    /// Field-map key.
    pub key: &'static str,
    pub prepare: Option<Apdu>,
    pub read: Apdu,
    pub size: SizeConstraint,
    /// A failing optional block is left empty instead of failing the read.
    pub optional: bool,
}

/// Everything that distinguishes one card family's transaction.
#[derive(Debug, Clone, Copy)]
pub struct CardProfile {
    pub name: &'static str,
    pub page_url: &'static str,
    pub select: Apdu,
    /// Sent after a MORE status to fetch the next frame.
    pub continue_read: Apdu,
    pub sw_ok: StatusWord,
    pub sw_more: StatusWord,
    pub blocks: &'static [BlockSpec],
    /// Export per-block status words with the data.
    pub export_status: bool,
}

impl CardProfile {
    pub fn block(&self, key: &str) -> Option<&BlockSpec> {
        self.blocks.iter().find(|b| b.key == key)
    }
}
