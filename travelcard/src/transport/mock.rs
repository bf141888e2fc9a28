// travelcard/src/transport/mock.rs

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::protocol::apdu::{Apdu, ApduResponse};
use crate::transport::traits::{TagState, Transport, TransportEvent};
use crate::transport::{CancelToken, TagLock};
use crate::types::StatusWord;
use crate::{Error, Result};

#[derive(Debug)]
enum Pending {
    Tag(TagState),
    Lock(CancelToken, bool),
    Exchange(CancelToken),
}

/// Mock transport for tests and demos.
///
/// It records submitted APDUs, answers them from a queue of scripted
/// responses in submission order, grants or denies locks, and counts how
/// many locks are held at any moment.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub sent: Vec<Apdu>,
    pub responses: VecDeque<Result<ApduResponse>>,
    pub tag: TagState,
    /// Paths passed to `attach`.
    pub attached: Vec<String>,
    /// When set, every lock request is denied with this message.
    pub lock_denial: Option<String>,
    pub lock_requests: usize,
    /// Requests completed with `Error::Cancelled`.
    pub cancelled: usize,
    /// Highest number of locks ever held at once.
    pub max_locks_held: usize,
    locks_held: Rc<Cell<usize>>,
    pending: VecDeque<Pending>,
}

impl MockTransport {
    pub fn new(tag: TagState) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    pub fn push_response(&mut self, data: impl Into<Vec<u8>>, sw: StatusWord) {
        self.responses.push_back(Ok(ApduResponse::new(data, sw)));
    }

    /// Queue a transport-level I/O failure.
    pub fn push_error(&mut self, message: &str) {
        self.responses
            .push_back(Err(Error::Transport(message.to_string())));
    }

    /// Change the tag state. The notification overtakes outstanding
    /// requests, the way a removal interrupts a transfer in flight.
    pub fn set_tag(&mut self, tag: TagState) {
        self.tag = tag;
        self.pending.push_front(Pending::Tag(tag));
    }

    pub fn locks_held(&self) -> usize {
        self.locks_held.get()
    }

    /// Number of submitted requests not yet completed.
    pub fn in_flight(&self) -> usize {
        self.pending
            .iter()
            .filter(|p| !matches!(p, Pending::Tag(_)))
            .count()
    }

    pub fn pop_sent(&mut self) -> Option<Apdu> {
        self.sent.pop()
    }

    fn grant_lock(&mut self, exclusive: bool) -> TagLock {
        let held = self.locks_held.clone();
        held.set(held.get() + 1);
        self.max_locks_held = self.max_locks_held.max(held.get());
        TagLock::new(exclusive, move || held.set(held.get().saturating_sub(1)))
    }
}

impl Transport for MockTransport {
    fn attach(&mut self, path: &str) -> Result<()> {
        self.attached.push(path.to_string());
        Ok(())
    }

    fn tag_state(&self) -> TagState {
        self.tag
    }

    fn transmit(&mut self, apdu: &Apdu, cancel: &CancelToken) -> Result<()> {
        self.sent.push(*apdu);
        self.pending.push_back(Pending::Exchange(cancel.clone()));
        Ok(())
    }

    fn acquire_lock(&mut self, exclusive: bool, cancel: &CancelToken) -> Result<()> {
        self.lock_requests += 1;
        self.pending
            .push_back(Pending::Lock(cancel.clone(), exclusive));
        Ok(())
    }

    fn next_event(&mut self) -> Option<TransportEvent> {
        let event = match self.pending.pop_front()? {
            Pending::Tag(tag) => TransportEvent::TagChanged(tag),
            Pending::Lock(cancel, exclusive) => {
                let result = if cancel.is_cancelled() {
                    self.cancelled += 1;
                    Err(Error::Cancelled)
                } else if let Some(reason) = &self.lock_denial {
                    Err(Error::LockFailure(reason.clone()))
                } else {
                    Ok(self.grant_lock(exclusive))
                };
                TransportEvent::LockResult {
                    token: cancel.id(),
                    result,
                }
            }
            Pending::Exchange(cancel) => {
                let result = if cancel.is_cancelled() {
                    self.cancelled += 1;
                    Err(Error::Cancelled)
                } else {
                    self.responses
                        .pop_front()
                        .unwrap_or_else(|| Err(Error::Transport("no scripted response".into())))
                };
                TransportEvent::Response {
                    token: cancel.id(),
                    result,
                }
            }
        };
        Some(event)
    }
}
