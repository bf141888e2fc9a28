// travelcard/src/card/session.rs

use crate::transport::{CancelToken, TagLock};
use crate::types::TokenId;

/// Transport resources owned by one running transaction.
///
/// Dropping the session cancels its token and releases the lock.
#[derive(Debug)]
pub struct Session {
    token: CancelToken,
    lock: Option<TagLock>,
}

impl Session {
    pub fn open() -> Self {
        Self {
            token: CancelToken::new(),
            lock: None,
        }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn owns(&self, token: TokenId) -> bool {
        self.token.id() == token
    }

    pub fn hold(&mut self, lock: TagLock) {
        self.lock = Some(lock);
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
