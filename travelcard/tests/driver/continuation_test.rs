use travelcard::card::hsl::HSL_PROFILE;
use travelcard::card::nysse::NYSSE_PROFILE;
use travelcard::card::{CardDriver, DriverOutcome, IsoDepDriver};
use travelcard::constants::*;
use travelcard::test_support::{script_block, script_select};
use travelcard::transport::{MockTransport, TagState, Transport};
use travelcard::Error;

use crate::common;

pub fn run(driver: &mut IsoDepDriver, mock: &mut MockTransport) -> Option<DriverOutcome> {
    if let Some(outcome) = driver.start(mock) {
        return Some(outcome);
    }
    while let Some(event) = mock.next_event() {
        if let Some(outcome) = driver.handle_event(event, mock) {
            return Some(outcome);
        }
    }
    None
}

#[test]
fn history_in_four_frames_is_prepared_once() {
    common::init_logger();
    let mut mock = MockTransport::new(TagState::iso_dep());
    script_select(&mut mock, &NYSSE_PROFILE);
    script_block(&mut mock, &NYSSE_PROFILE, NYSSE_APP_INFO_KEY, &[&[0x11; NYSSE_APP_INFO_LEN]]);
    script_block(&mut mock, &NYSSE_PROFILE, NYSSE_OWNER_INFO_KEY, &[&[0u8; NYSSE_OWNER_INFO_LEN]]);
    script_block(&mut mock, &NYSSE_PROFILE, NYSSE_SEASON_PASS_KEY, &[&[0u8; NYSSE_SEASON_PASS_LEN]]);
    let frames = [[1u8; 16], [2u8; 16], [3u8; 16], [4u8; 16]];
    let chunks: Vec<&[u8]> = frames.iter().map(|f| f.as_slice()).collect();
    script_block(&mut mock, &NYSSE_PROFILE, NYSSE_HISTORY_KEY, &chunks);
    script_block(&mut mock, &NYSSE_PROFILE, NYSSE_BALANCE_KEY, &[&[0xe8, 0x03, 0, 0]]);

    let mut driver = IsoDepDriver::new(&NYSSE_PROFILE);
    let data = match run(&mut driver, &mut mock) {
        Some(DriverOutcome::Succeeded(data)) => data,
        other => panic!("expected success, got: {:?}", other),
    };
    let history = data.block(NYSSE_HISTORY_KEY).unwrap();
    assert_eq!(history.len(), 64);
    assert_eq!(&history.bytes()[16..32], &[2u8; 16]);
    assert_eq!(history.read_status(), Some(NYSSE_PROFILE.sw_ok));

    let continuations = mock.sent.iter().filter(|a| a.ins == 0xaf).count();
    let prepares = mock.sent.iter().filter(|a| a.ins == 0xf5).count();
    assert_eq!(continuations, 3);
    assert_eq!(prepares, NYSSE_PROFILE.blocks.len());
    assert!(mock.responses.is_empty());
    assert_eq!(mock.locks_held(), 0);
}

#[test]
fn split_hsl_block_is_concatenated() {
    let mut mock = MockTransport::new(TagState::iso_dep());
    script_select(&mut mock, &HSL_PROFILE);
    script_block(&mut mock, &HSL_PROFILE, HSL_APP_INFO_KEY, &[&[0xaa; 6], &[0xbb; 5]]);
    script_block(&mut mock, &HSL_PROFILE, HSL_PERIOD_PASS_KEY, &[&[0u8; HSL_PERIOD_PASS_LEN]]);
    script_block(&mut mock, &HSL_PROFILE, HSL_STORED_VALUE_KEY, &[&[0u8; HSL_STORED_VALUE_LEN]]);
    script_block(&mut mock, &HSL_PROFILE, HSL_ETICKET_KEY, &[&[0u8; HSL_ETICKET_LEN]]);
    script_block(&mut mock, &HSL_PROFILE, HSL_HISTORY_KEY, &[]);

    let mut driver = IsoDepDriver::new(&HSL_PROFILE);
    match run(&mut driver, &mut mock) {
        Some(DriverOutcome::Succeeded(data)) => {
            assert_eq!(data.card_type, HSL_CARD_TYPE);
            let fields = data.fields();
            assert_eq!(fields[HSL_APP_INFO_KEY], "aaaaaaaaaaaabbbbbbbbbb");
            assert_eq!(fields[HSL_HISTORY_KEY], "");
        }
        other => panic!("expected success, got: {:?}", other),
    }
}

#[test]
fn accumulated_length_is_checked_after_last_frame() {
    let mut mock = MockTransport::new(TagState::iso_dep());
    script_select(&mut mock, &HSL_PROFILE);
    script_block(&mut mock, &HSL_PROFILE, HSL_APP_INFO_KEY, &[&[0; 6], &[0; 6]]);

    let mut driver = IsoDepDriver::new(&HSL_PROFILE);
    assert_eq!(
        run(&mut driver, &mut mock),
        Some(DriverOutcome::Failed(Error::InvalidLength {
            expected: HSL_APP_INFO_LEN,
            actual: 12
        }))
    );
    assert!(!driver.has_session());
}
