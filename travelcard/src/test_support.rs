//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers script complete card reads onto a [`MockTransport`] so
//! tests across the crate and the tests/ directory share one picture of
//! what a card answers.
#![allow(dead_code)]

use crate::card::hsl::HSL_PROFILE;
use crate::card::nysse::NYSSE_PROFILE;
use crate::card::CardProfile;
use crate::constants::*;
use crate::dispatch::Dispatcher;
use crate::transport::{MockTransport, TagState};

/// Queue the answer to SELECT.
#[doc(hidden)]
pub fn script_select(mock: &mut MockTransport, profile: &CardProfile) {
    mock.push_response(Vec::new(), profile.sw_ok);
}

/// Queue the answers for one block. Every chunk but the last is sent with
/// the "more data" status word.
#[doc(hidden)]
pub fn script_block(mock: &mut MockTransport, profile: &CardProfile, key: &str, chunks: &[&[u8]]) {
    if profile.block(key).is_some_and(|b| b.prepare.is_some()) {
        mock.push_response(Vec::new(), profile.sw_ok);
    }
    match chunks.split_last() {
        Some((last, rest)) => {
            for chunk in rest {
                mock.push_response(chunk.to_vec(), profile.sw_more);
            }
            mock.push_response(last.to_vec(), profile.sw_ok);
        }
        None => mock.push_response(Vec::new(), profile.sw_ok),
    }
}

/// Queue a whole read: SELECT, then each `(key, payload)` in profile order.
#[doc(hidden)]
pub fn script_read(mock: &mut MockTransport, profile: &CardProfile, blocks: &[(&str, Vec<u8>)]) {
    script_select(mock, profile);
    for (key, payload) in blocks {
        script_block(mock, profile, key, &[payload.as_slice()]);
    }
}

/// Zeroed HSL blocks of valid sizes, with a one-entry history.
#[doc(hidden)]
pub fn blank_hsl_blocks() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        (HSL_APP_INFO_KEY, vec![0; HSL_APP_INFO_LEN]),
        (HSL_PERIOD_PASS_KEY, vec![0; HSL_PERIOD_PASS_LEN]),
        (HSL_STORED_VALUE_KEY, vec![0; HSL_STORED_VALUE_LEN]),
        (HSL_ETICKET_KEY, vec![0; HSL_ETICKET_LEN]),
        (HSL_HISTORY_KEY, vec![0; HSL_HISTORY_ENTRY_LEN]),
    ]
}

/// Zeroed Nysse blocks of valid sizes, balance included.
#[doc(hidden)]
pub fn blank_nysse_blocks() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        (NYSSE_APP_INFO_KEY, vec![0; NYSSE_APP_INFO_LEN]),
        (NYSSE_OWNER_INFO_KEY, vec![0; NYSSE_OWNER_INFO_LEN]),
        (NYSSE_SEASON_PASS_KEY, vec![0; NYSSE_SEASON_PASS_LEN]),
        (NYSSE_HISTORY_KEY, vec![0; NYSSE_HISTORY_ENTRY_LEN]),
        (NYSSE_BALANCE_KEY, vec![0; NYSSE_BALANCE_LEN]),
    ]
}

/// A mock with an ISO-DEP tag and a full HSL read scripted.
#[doc(hidden)]
pub fn mock_hsl_card(blocks: &[(&str, Vec<u8>)]) -> MockTransport {
    let mut mock = MockTransport::new(TagState::iso_dep());
    script_read(&mut mock, &HSL_PROFILE, blocks);
    mock
}

/// A mock with an ISO-DEP tag and a full Nysse read scripted.
#[doc(hidden)]
pub fn mock_nysse_card(blocks: &[(&str, Vec<u8>)]) -> MockTransport {
    let mut mock = MockTransport::new(TagState::iso_dep());
    script_read(&mut mock, &NYSSE_PROFILE, blocks);
    mock
}

/// Point `dispatcher` at `path` and run it until the mock goes quiet.
#[doc(hidden)]
pub fn read_to_end(dispatcher: &mut Dispatcher, mock: &mut MockTransport, path: &str) {
    dispatcher.set_target(path, mock);
    dispatcher.pump(mock);
}
