// travelcard/src/card/hsl.rs

//! HSL (Helsinki region) card: DESFire application `14 20 ef`, five plain
//! files read without preparation.

use crate::card::profile::{BlockSpec, CardProfile};
use crate::card::{CardDriver, CardFamily, IsoDepDriver};
use crate::constants::*;
use crate::protocol::apdu::Apdu;
use crate::protocol::block::SizeConstraint;
use crate::types::StatusWord;

const SELECT: Apdu = Apdu::new(0x90, 0x5a, 0x00, 0x00, &[0x14, 0x20, 0xef]);
const READ_MORE: Apdu = Apdu::new(0x90, 0xaf, 0x00, 0x00, &[]);

const READ_APP_INFO: Apdu = Apdu::new(0x90, 0xbd, 0x00, 0x00, &[0x08, 0x00, 0x00, 0x00, 0x0b, 0x00, 0x00]);
const READ_PERIOD_PASS: Apdu = Apdu::new(0x90, 0xbd, 0x00, 0x00, &[0x01, 0x00, 0x00, 0x00, 0x23, 0x00, 0x00]);
const READ_STORED_VALUE: Apdu = Apdu::new(0x90, 0xbd, 0x00, 0x00, &[0x02, 0x00, 0x00, 0x00, 0x0d, 0x00, 0x00]);
const READ_ETICKET: Apdu = Apdu::new(0x90, 0xbd, 0x00, 0x00, &[0x03, 0x00, 0x00, 0x00, 0x2d, 0x00, 0x00]);
const READ_HISTORY: Apdu = Apdu::new(0x90, 0xbb, 0x00, 0x00, &[0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

const fn plain(name: &'static str, key: &'static str, read: Apdu, size: SizeConstraint) -> BlockSpec {
    BlockSpec {
        name,
        key,
        prepare: None,
        read,
        size,
        optional: false,
    }
}

const BLOCKS: &[BlockSpec] = &[
    plain("APP_INFO", HSL_APP_INFO_KEY, READ_APP_INFO, SizeConstraint::Exact(HSL_APP_INFO_LEN)),
    plain("PERIOD_PASS", HSL_PERIOD_PASS_KEY, READ_PERIOD_PASS, SizeConstraint::Exact(HSL_PERIOD_PASS_LEN)),
    plain("STORED_VALUE", HSL_STORED_VALUE_KEY, READ_STORED_VALUE, SizeConstraint::Exact(HSL_STORED_VALUE_LEN)),
    plain("ETICKET", HSL_ETICKET_KEY, READ_ETICKET, SizeConstraint::Exact(HSL_ETICKET_LEN)),
    plain("HISTORY", HSL_HISTORY_KEY, READ_HISTORY, SizeConstraint::RecordMultiple(HSL_HISTORY_ENTRY_LEN)),
];

pub static HSL_PROFILE: CardProfile = CardProfile {
    name: HSL_CARD_TYPE,
    page_url: HSL_PAGE_URL,
    select: SELECT,
    continue_read: READ_MORE,
    sw_ok: StatusWord::DESFIRE_OK,
    sw_more: StatusWord::DESFIRE_MORE,
    blocks: BLOCKS,
    export_status: cfg!(feature = "diagnostics"),
};

pub fn new_driver() -> Box<dyn CardDriver> {
    Box::new(IsoDepDriver::new(&HSL_PROFILE))
}

pub const FAMILY: CardFamily = CardFamily {
    name: HSL_CARD_TYPE,
    new_driver,
};
