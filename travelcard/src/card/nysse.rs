// travelcard/src/card/nysse.rs

//! Nysse (Tampere region) card: application `01 21 ef`. Every file is
//! announced with a PREPARE (`f5`) before it can be read; the balance
//! value file is optional because older cards refuse it.

use crate::card::profile::{BlockSpec, CardProfile};
use crate::card::{CardDriver, CardFamily, IsoDepDriver};
use crate::constants::*;
use crate::protocol::apdu::Apdu;
use crate::protocol::block::SizeConstraint;
use crate::types::StatusWord;

const SELECT: Apdu = Apdu::new(0x90, 0x5a, 0x00, 0x00, &[0x01, 0x21, 0xef]);
const READ_MORE: Apdu = Apdu::new(0x90, 0xaf, 0x00, 0x00, &[]);

const fn prepare(id: &'static [u8; 1]) -> Apdu {
    Apdu::new(0x90, 0xf5, 0x00, 0x00, id)
}

const fn file(
    name: &'static str,
    key: &'static str,
    id: &'static [u8; 1],
    read: &'static [u8; 7],
    ins: u8,
    size: SizeConstraint,
) -> BlockSpec {
    BlockSpec {
        name,
        key,
        prepare: Some(prepare(id)),
        read: Apdu::new(0x90, ins, 0x00, 0x00, read),
        size,
        optional: false,
    }
}

const BLOCKS: &[BlockSpec] = &[
    file(
        "APP_INFO",
        NYSSE_APP_INFO_KEY,
        &[0x07],
        &[0x07, 0, 0, 0, 0, 0, 0],
        0xbd,
        SizeConstraint::Exact(NYSSE_APP_INFO_LEN),
    ),
    file(
        "OWNER_INFO",
        NYSSE_OWNER_INFO_KEY,
        &[0x04],
        &[0x04, 0, 0, 0, 0, 0, 0],
        0xbd,
        SizeConstraint::Exact(NYSSE_OWNER_INFO_LEN),
    ),
    file(
        "SEASON_PASS",
        NYSSE_SEASON_PASS_KEY,
        &[0x02],
        &[0x02, 0, 0, 0, 0, 0, 0],
        0xbd,
        SizeConstraint::Exact(NYSSE_SEASON_PASS_LEN),
    ),
    file(
        "HISTORY",
        NYSSE_HISTORY_KEY,
        &[0x03],
        &[0x03, 0, 0, 0, 0, 0, 0],
        0xbb,
        SizeConstraint::RecordMultiple(NYSSE_HISTORY_ENTRY_LEN),
    ),
    BlockSpec {
        name: "BALANCE",
        key: NYSSE_BALANCE_KEY,
        prepare: Some(prepare(&[0x01])),
        read: Apdu::new(0x90, 0x6c, 0x00, 0x00, &[0x01]),
        size: SizeConstraint::Exact(NYSSE_BALANCE_LEN),
        optional: true,
    },
];

pub static NYSSE_PROFILE: CardProfile = CardProfile {
    name: NYSSE_CARD_TYPE,
    page_url: NYSSE_PAGE_URL,
    select: SELECT,
    continue_read: READ_MORE,
    sw_ok: StatusWord::DESFIRE_OK,
    sw_more: StatusWord::DESFIRE_MORE,
    blocks: BLOCKS,
    export_status: true,
};

pub fn new_driver() -> Box<dyn CardDriver> {
    Box::new(IsoDepDriver::new(&NYSSE_PROFILE))
}

pub const FAMILY: CardFamily = CardFamily {
    name: NYSSE_CARD_TYPE,
    new_driver,
};
