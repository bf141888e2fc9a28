use chrono::{Datelike, Timelike};
use travelcard::constants::*;
use travelcard::dispatch::Dispatcher;
use travelcard::records::{DecodedCard, NysseCardInfo, Remaining, TransactionType};
use travelcard::test_support::{mock_nysse_card, read_to_end};

use crate::common::fixtures::*;

fn nysse_blocks(balance: Option<u32>) -> Vec<(&'static str, Vec<u8>)> {
    let mut history = nysse_history_entry(day(2024, 1, 12), 0x1018, 7 * 60, 3000);
    history.extend(nysse_history_entry(day(2024, 1, 15), 0xbde07, 7 * 60 + 45, 230));
    let mut blocks = vec![
        (NYSSE_APP_INFO_KEY, vec![0x5a; NYSSE_APP_INFO_LEN]),
        (NYSSE_OWNER_INFO_KEY, nysse_owner(b"Virtanen Matti")),
        (NYSSE_SEASON_PASS_KEY, nysse_season_pass(day(2024, 1, 31))),
        (NYSSE_HISTORY_KEY, history),
    ];
    if let Some(cents) = balance {
        blocks.push((NYSSE_BALANCE_KEY, nysse_balance(cents)));
    }
    blocks
}

fn decode(balance: Option<u32>) -> NysseCardInfo {
    let mut mock = mock_nysse_card(&nysse_blocks(balance));
    if balance.is_none() {
        // card refuses the balance file
        mock.push_response(vec![], travelcard::StatusWord::new(0x919d));
    }
    let mut d = Dispatcher::builder().preferred(NYSSE_CARD_TYPE).build().unwrap();
    read_to_end(&mut d, &mut mock, "/tag0");
    match DecodedCard::from_fields(d.fields().unwrap(), &noon(day(2024, 1, 15))).unwrap() {
        DecodedCard::Nysse(card) => card,
        other => panic!("expected a Nysse card, got: {:?}", other),
    }
}

#[test]
fn full_card() {
    let card = decode(Some(1250));
    assert_eq!(card.owner_info.record().owner_name, "Virtanen Matti");
    assert_eq!(card.balance.record().value, 1250);
    assert_eq!(card.app_info, "5a".repeat(NYSSE_APP_INFO_LEN));

    let pass = card.season_pass.record();
    assert!(pass.valid);
    assert_eq!(pass.days_remaining, Remaining::Left(17));

    let entries = &card.history.record().entries;
    assert_eq!(entries[0].kind, TransactionType::Boarding);
    let t = entries[0].time.unwrap();
    assert_eq!((t.day(), t.hour(), t.minute()), (15, 7, 45));
    assert_eq!(entries[1].kind, TransactionType::Charge);
    assert_eq!(entries[1].price, 3000);
}

#[test]
fn missing_balance_keeps_diagnostics() {
    let card = decode(None);
    assert!(!card.has_balance());
    assert_eq!(card.status["balancePrepareStatus"], "919d");
    assert_eq!(card.status["balanceReadStatus"], "");
    assert_eq!(card.status["ownerInfoReadStatus"], "9100");
}
