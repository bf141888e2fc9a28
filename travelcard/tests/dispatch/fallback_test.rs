use std::cell::RefCell;

use travelcard::card::hsl::HSL_PROFILE;
use travelcard::card::nysse::NYSSE_PROFILE;
use travelcard::card::{
    BlockSpec, CardDriver, CardFamily, CardProfile, DriverOutcome, DriverState, IsoDepDriver,
};
use travelcard::constants::*;
use travelcard::dispatch::{DispatchState, Dispatcher};
use travelcard::protocol::{Apdu, SizeConstraint};
use travelcard::test_support::{blank_nysse_blocks, mock_nysse_card, script_read};
use travelcard::transport::{MockTransport, TagState, Transport, TransportEvent};
use travelcard::{Error, StatusWord};

use crate::common;

/// Handle events one at a time, checking resource bounds after each.
fn drive(d: &mut Dispatcher, mock: &mut MockTransport) {
    while let Some(event) = mock.next_event() {
        d.handle_event(event, mock);
        assert!(d.live_drivers() <= 1);
        assert!(mock.locks_held() <= 1);
    }
}

#[test]
fn nysse_card_found_after_hsl_fails() {
    common::init_logger();
    let mut mock = MockTransport::new(TagState::iso_dep());
    mock.push_response(vec![], StatusWord::new(0x91a0));
    script_read(&mut mock, &NYSSE_PROFILE, &blank_nysse_blocks());

    let mut d = Dispatcher::new();
    d.set_target("/tag0", &mut mock);
    drive(&mut d, &mut mock);

    match d.state() {
        DispatchState::Recognized { card_type, fields } => {
            assert_eq!(card_type, NYSSE_CARD_TYPE);
            assert_eq!(fields[CARD_TYPE_KEY], NYSSE_CARD_TYPE);
            assert_eq!(fields[NYSSE_BALANCE_KEY], "00000000");
            assert_eq!(fields["balanceReadStatus"], "9100");
        }
        other => panic!("expected a recognized card, got: {:?}", other),
    }
    assert_eq!(d.page_url(), NYSSE_PAGE_URL);
    assert_eq!(mock.lock_requests, 2);
    assert_eq!(mock.max_locks_held, 1);
    assert_eq!(mock.locks_held(), 0);
    assert_eq!(d.live_drivers(), 0);
}

#[test]
fn preferred_family_goes_first() {
    let mut mock = mock_nysse_card(&blank_nysse_blocks());
    let mut d = Dispatcher::builder().preferred(NYSSE_CARD_TYPE).build().unwrap();
    d.set_target("/tag0", &mut mock);
    drive(&mut d, &mut mock);
    assert_eq!(d.fields().map(|f| f[CARD_TYPE_KEY].as_str()), Some(NYSSE_CARD_TYPE));
    assert_eq!(mock.lock_requests, 1);
}

#[test]
fn rotation_wraps_from_preferred() {
    // Nysse is tried first and fails, then HSL gets its turn
    let mut mock = MockTransport::new(TagState::iso_dep());
    mock.push_response(vec![], StatusWord::new(0x91a0));
    script_read(&mut mock, &HSL_PROFILE, &travelcard::test_support::blank_hsl_blocks());
    let mut d = Dispatcher::new();
    assert!(d.set_preferred_card_type(NYSSE_CARD_TYPE));
    d.set_target("/tag0", &mut mock);
    drive(&mut d, &mut mock);
    assert_eq!(d.page_url(), HSL_PAGE_URL);
}

#[test]
fn every_family_fails() {
    let mut mock = MockTransport::new(TagState::iso_dep());
    mock.push_response(vec![], StatusWord::new(0x91a0));
    mock.push_response(vec![], StatusWord::new(0x91a0));

    let mut d = Dispatcher::new();
    let changes = d.set_target("/tag0", &mut mock);
    assert!(changes.state);
    assert_eq!(d.state(), &DispatchState::Reading(0));

    let changes = d.pump(&mut mock);
    assert!(changes.state);
    assert!(!changes.fields);
    assert_eq!(d.state(), &DispatchState::None);
    assert_eq!(d.fields(), None);
    assert_eq!(d.page_url(), "");
    assert_eq!(mock.lock_requests, 2);
    assert_eq!(mock.max_locks_held, 1);
}

thread_local! {
    static STARTED: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

/// Rejects every tag as soon as it starts.
struct AlphaDriver {
    state: DriverState,
}

impl CardDriver for AlphaDriver {
    fn card_type(&self) -> &'static str {
        "Alpha"
    }

    fn state(&self) -> &DriverState {
        &self.state
    }

    fn start(&mut self, _transport: &mut dyn Transport) -> Option<DriverOutcome> {
        self.state = DriverState::Failed(Error::UnsupportedCard);
        Some(DriverOutcome::Failed(Error::UnsupportedCard))
    }

    fn handle_event(
        &mut self,
        _event: TransportEvent,
        _transport: &mut dyn Transport,
    ) -> Option<DriverOutcome> {
        None
    }

    fn abort(&mut self) -> Option<DriverOutcome> {
        None
    }

    fn has_session(&self) -> bool {
        false
    }
}

fn new_alpha() -> Box<dyn CardDriver> {
    STARTED.with(|s| s.borrow_mut().push("Alpha"));
    Box::new(AlphaDriver {
        state: DriverState::Idle,
    })
}

static BETA_BLOCKS: &[BlockSpec] = &[BlockSpec {
    name: "application info",
    key: "appInfo",
    prepare: None,
    read: Apdu::new(0x90, 0xbd, 0x00, 0x00, &[0x01, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00]),
    size: SizeConstraint::Exact(4),
    optional: false,
}];

static BETA_PROFILE: CardProfile = CardProfile {
    name: "Beta",
    page_url: "qrc:/Beta.qml",
    select: Apdu::new(0x90, 0x5a, 0x00, 0x00, &[0x01, 0x02, 0x03]),
    continue_read: Apdu::new(0x90, 0xaf, 0x00, 0x00, &[]),
    sw_ok: StatusWord::DESFIRE_OK,
    sw_more: StatusWord::DESFIRE_MORE,
    blocks: BETA_BLOCKS,
    export_status: false,
};

fn new_beta() -> Box<dyn CardDriver> {
    STARTED.with(|s| s.borrow_mut().push("Beta"));
    Box::new(IsoDepDriver::new(&BETA_PROFILE))
}

#[test]
fn unsupported_family_hands_over_to_next() {
    common::init_logger();
    STARTED.with(|s| s.borrow_mut().clear());
    let mut mock = MockTransport::new(TagState::iso_dep());
    script_read(&mut mock, &BETA_PROFILE, &[("appInfo", vec![0xde, 0xad, 0xbe, 0xef])]);

    let mut d = Dispatcher::builder()
        .with_family(CardFamily {
            name: "Alpha",
            new_driver: new_alpha,
        })
        .with_family(CardFamily {
            name: "Beta",
            new_driver: new_beta,
        })
        .build()
        .unwrap();
    d.set_target("/tag0", &mut mock);
    assert_eq!(d.state(), &DispatchState::Reading(1));
    drive(&mut d, &mut mock);

    assert_eq!(STARTED.with(|s| s.borrow().clone()), vec!["Alpha", "Beta"]);
    match d.state() {
        DispatchState::Recognized { card_type, fields } => {
            assert_eq!(card_type, "Beta");
            assert_eq!(fields["appInfo"], "deadbeef");
        }
        other => panic!("expected a recognized card, got: {:?}", other),
    }
    assert_eq!(d.page_url(), "qrc:/Beta.qml");
    assert_eq!(mock.lock_requests, 1);
    assert_eq!(mock.max_locks_held, 1);
    assert_eq!(d.live_drivers(), 0);
}
