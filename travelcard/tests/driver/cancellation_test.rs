use travelcard::card::hsl::HSL_PROFILE;
use travelcard::card::{CardDriver, DriverOutcome, DriverState, IsoDepDriver, Step};
use travelcard::test_support::{blank_hsl_blocks, mock_hsl_card};
use travelcard::transport::{MockTransport, TagState, Transport, TransportEvent};
use travelcard::{Error, StatusWord};

use crate::continuation_test::run;

#[test]
fn removal_mid_read_cancels_and_unlocks() {
    let mut mock = MockTransport::new(TagState::iso_dep());
    mock.push_response(vec![], StatusWord::DESFIRE_OK);
    mock.push_response(vec![0u8; 11], StatusWord::DESFIRE_OK);

    let mut driver = IsoDepDriver::new(&HSL_PROFILE);
    assert!(driver.start(&mut mock).is_none());
    // lock granted, SELECT answered
    for _ in 0..2 {
        let event = mock.next_event().unwrap();
        assert!(driver.handle_event(event, &mut mock).is_none());
    }
    assert_eq!(driver.state(), &DriverState::Transacting(Step::Read(0)));
    assert_eq!(mock.locks_held(), 1);

    mock.set_tag(TagState::removed());
    let event = mock.next_event().unwrap();
    assert!(matches!(event, TransportEvent::TagChanged(_)));
    assert_eq!(
        driver.handle_event(event, &mut mock),
        Some(DriverOutcome::Failed(Error::Cancelled))
    );
    assert_eq!(mock.locks_held(), 0);
    assert!(!driver.has_session());

    // the outstanding READ completes as cancelled and is ignored
    let late = mock.next_event().unwrap();
    assert!(driver.handle_event(late, &mut mock).is_none());
    assert_eq!(mock.cancelled, 1);
    assert_eq!(mock.responses.len(), 1);
}

#[test]
fn denied_lock_still_reads() {
    let mut mock = mock_hsl_card(&blank_hsl_blocks());
    mock.lock_denial = Some("tag busy".into());
    let mut driver = IsoDepDriver::new(&HSL_PROFILE);
    assert!(matches!(
        run(&mut driver, &mut mock),
        Some(DriverOutcome::Succeeded(_))
    ));
    assert_eq!(mock.lock_requests, 1);
    assert_eq!(mock.max_locks_held, 0);
}

#[test]
fn probed_tag_without_iso_dep_is_unsupported() {
    let mut mock = MockTransport::new(TagState::default());
    let mut driver = IsoDepDriver::new(&HSL_PROFILE);
    assert!(driver.start(&mut mock).is_none());
    mock.set_tag(TagState::removed());
    let event = mock.next_event().unwrap();
    assert_eq!(
        driver.handle_event(event, &mut mock),
        Some(DriverOutcome::Failed(Error::UnsupportedCard))
    );
}
