// travelcard/src/card/driver.rs

use log::{debug, warn};

use crate::card::profile::{BlockSpec, CardProfile};
use crate::card::{CardData, CardDriver, DriverOutcome, DriverState, Session, Step};
use crate::protocol::apdu::{Apdu, ApduResponse};
use crate::protocol::block::RawBlock;
use crate::transport::{TagState, Transport, TransportEvent};
use crate::types::TokenId;
use crate::{Error, Result};

/// Table-driven ISO-DEP read transaction.
///
/// SELECT, then for each block an optional PREPARE followed by READ and as
/// many continuation frames as the card asks for. Exactly one request is
/// outstanding at any time.
#[derive(Debug)]
pub struct IsoDepDriver {
    profile: &'static CardProfile,
    state: DriverState,
    session: Option<Session>,
    blocks: Vec<RawBlock>,
}

impl IsoDepDriver {
    pub fn new(profile: &'static CardProfile) -> Self {
        Self {
            profile,
            state: DriverState::Idle,
            session: None,
            blocks: Vec::new(),
        }
    }

    pub fn profile(&self) -> &'static CardProfile {
        self.profile
    }

    fn owns(&self, token: TokenId) -> bool {
        self.session.as_ref().is_some_and(|s| s.owns(token))
    }

    fn on_tag_state(
        &mut self,
        tag: TagState,
        transport: &mut dyn Transport,
    ) -> Option<DriverOutcome> {
        if self.session.is_some() {
            if !tag.is_ready() {
                debug!("{}: tag went away", self.profile.name);
                return Some(self.fail(Error::Cancelled));
            }
            return None;
        }
        if self.state != DriverState::AwaitingTag || !tag.is_probed() {
            return None;
        }
        if tag.is_ready() {
            self.blocks = self.profile.blocks.iter().map(|b| RawBlock::new(b.key)).collect();
            let session = Session::open();
            let submitted = transport.acquire_lock(true, session.token());
            self.session = Some(session);
            self.state = DriverState::AwaitingLock;
            if let Err(e) = submitted {
                warn!("{}: failed to lock the tag: {}", self.profile.name, e);
                return self.select(transport);
            }
            None
        } else if !tag.iso_dep_present {
            debug!("{}: not an ISO-DEP tag", self.profile.name);
            Some(self.fail(Error::UnsupportedCard))
        } else {
            None
        }
    }

    fn select(&mut self, transport: &mut dyn Transport) -> Option<DriverOutcome> {
        let apdu = self.profile.select;
        self.submit(Step::Select, &apdu, transport)
    }

    fn submit(
        &mut self,
        step: Step,
        apdu: &Apdu,
        transport: &mut dyn Transport,
    ) -> Option<DriverOutcome> {
        let submitted = match &self.session {
            Some(session) => {
                debug!("{}: {} > {}", self.profile.name, step, apdu);
                transport.transmit(apdu, session.token())
            }
            None => Err(Error::Cancelled),
        };
        match submitted {
            Ok(()) => {
                self.state = DriverState::Transacting(step);
                None
            }
            Err(e) => Some(self.fail(e)),
        }
    }

    fn on_response(
        &mut self,
        result: Result<ApduResponse>,
        transport: &mut dyn Transport,
    ) -> Option<DriverOutcome> {
        let step = match self.state {
            DriverState::Transacting(step) => step,
            _ => return None,
        };
        let profile = self.profile;
        match step {
            Step::Select => match result {
                Ok(resp) if resp.sw == profile.sw_ok => {
                    debug!("{}: application selected", profile.name);
                    self.start_block(0, transport)
                }
                Ok(resp) => Some(self.fail(Error::UnexpectedStatus {
                    step: "SELECT".into(),
                    sw: resp.sw,
                })),
                Err(e) => Some(self.fail(e)),
            },
            Step::Prepare(index) => {
                let spec = &profile.blocks[index];
                match result {
                    Ok(resp) => {
                        self.blocks[index].set_prepare_status(resp.sw);
                        if resp.sw == profile.sw_ok {
                            self.submit(Step::Read(index), &spec.read, transport)
                        } else {
                            let err = Error::UnexpectedStatus {
                                step: format!("PREPARE {}", spec.name),
                                sw: resp.sw,
                            };
                            self.block_failed(index, err, transport)
                        }
                    }
                    Err(e) => self.block_failed(index, e, transport),
                }
            }
            Step::Read(index) => {
                let spec = &profile.blocks[index];
                let resp = match result {
                    Ok(resp) => resp,
                    Err(e) => return self.block_failed(index, e, transport),
                };
                self.blocks[index].append(&resp.data);
                if resp.sw == profile.sw_more {
                    debug!("{}: {} has more data", profile.name, spec.name);
                    let apdu = profile.continue_read;
                    return self.submit(Step::Read(index), &apdu, transport);
                }
                self.blocks[index].set_read_status(resp.sw);
                if resp.sw != profile.sw_ok {
                    let err = Error::UnexpectedStatus {
                        step: format!("READ {}", spec.name),
                        sw: resp.sw,
                    };
                    return self.block_failed(index, err, transport);
                }
                match spec.size.check(spec.name, self.blocks[index].len()) {
                    Ok(()) => {
                        debug!(
                            "{}: {} = {}",
                            profile.name,
                            spec.name,
                            self.blocks[index].to_hex()
                        );
                        self.start_block(index + 1, transport)
                    }
                    Err(e) => self.block_failed(index, e, transport),
                }
            }
        }
    }

    fn start_block(&mut self, index: usize, transport: &mut dyn Transport) -> Option<DriverOutcome> {
        let Some(spec) = self.profile.blocks.get(index) else {
            return Some(self.succeed());
        };
        match &spec.prepare {
            Some(prepare) => self.submit(Step::Prepare(index), prepare, transport),
            None => self.submit(Step::Read(index), &spec.read, transport),
        }
    }

    fn block_failed(
        &mut self,
        index: usize,
        err: Error,
        transport: &mut dyn Transport,
    ) -> Option<DriverOutcome> {
        let profile = self.profile;
        let spec: &BlockSpec = &profile.blocks[index];
        if spec.optional && err != Error::Cancelled {
            debug!("{}: skipping {}: {}", profile.name, spec.name, err);
            self.blocks[index].discard_data();
            return self.start_block(index + 1, transport);
        }
        Some(self.fail(err))
    }

    fn succeed(&mut self) -> DriverOutcome {
        debug!("{}: read done", self.profile.name);
        self.session = None;
        self.state = DriverState::Succeeded;
        DriverOutcome::Succeeded(CardData {
            card_type: self.profile.name,
            page_url: self.profile.page_url,
            blocks: std::mem::take(&mut self.blocks),
            export_status: self.profile.export_status,
        })
    }

    fn fail(&mut self, err: Error) -> DriverOutcome {
        debug!("{}: read failed: {}", self.profile.name, err);
        self.session = None;
        self.blocks.clear();
        self.state = DriverState::Failed(err.clone());
        DriverOutcome::Failed(err)
    }
}

impl CardDriver for IsoDepDriver {
    fn card_type(&self) -> &'static str {
        self.profile.name
    }

    fn state(&self) -> &DriverState {
        &self.state
    }

    fn start(&mut self, transport: &mut dyn Transport) -> Option<DriverOutcome> {
        if self.state != DriverState::Idle {
            return None;
        }
        self.state = DriverState::AwaitingTag;
        let tag = transport.tag_state();
        self.on_tag_state(tag, transport)
    }

    fn handle_event(
        &mut self,
        event: TransportEvent,
        transport: &mut dyn Transport,
    ) -> Option<DriverOutcome> {
        match event {
            TransportEvent::TagChanged(tag) => self.on_tag_state(tag, transport),
            TransportEvent::LockResult { token, result } => {
                if !self.owns(token) || self.state != DriverState::AwaitingLock {
                    return None;
                }
                match result {
                    Ok(lock) => {
                        if let Some(session) = self.session.as_mut() {
                            session.hold(lock);
                        }
                    }
                    Err(e) => warn!("{}: failed to lock the tag: {}", self.profile.name, e),
                }
                self.select(transport)
            }
            TransportEvent::Response { token, result } => {
                if !self.owns(token) {
                    debug!("{}: ignoring stale response {}", self.profile.name, token);
                    return None;
                }
                self.on_response(result, transport)
            }
        }
    }

    fn abort(&mut self) -> Option<DriverOutcome> {
        if self.state.is_finished() {
            return None;
        }
        Some(self.fail(Error::Cancelled))
    }

    fn has_session(&self) -> bool {
        self.session.is_some()
    }
}
