// travelcard/src/transport/cancel.rs

use std::cell::Cell;
use std::rc::Rc;

use crate::types::TokenId;

/// Cancellation handle for one session's transport requests.
///
/// Clones share the flag, so a transport can keep a clone alongside a queued
/// request and check it before completing.
#[derive(Debug, Clone)]
pub struct CancelToken {
    id: TokenId,
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            id: TokenId::next(),
            cancelled: Rc::new(Cell::new(false)),
        }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
