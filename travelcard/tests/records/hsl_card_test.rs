use chrono::{Datelike, Timelike};
use travelcard::constants::*;
use travelcard::dispatch::Dispatcher;
use travelcard::protocol::AreaCode;
use travelcard::records::{DecodedCard, Remaining, TransactionType};
use travelcard::test_support::{mock_hsl_card, read_to_end};

use crate::common::fixtures::*;

fn hsl_blocks() -> Vec<(&'static str, Vec<u8>)> {
    let mut history = hsl_history_entry(false, day(2024, 1, 14), 17 * 60, 280, 720);
    history.extend(hsl_history_entry(true, day(2024, 1, 15), 8 * 60, 530, 190));
    vec![
        (HSL_APP_INFO_KEY, hsl_app_info()),
        (
            HSL_PERIOD_PASS_KEY,
            hsl_period_pass((day(2024, 1, 1), day(2024, 1, 31)), (day(2024, 2, 1), day(2024, 2, 29))),
        ),
        (HSL_STORED_VALUE_KEY, hsl_stored_value(190)),
        (HSL_ETICKET_KEY, hsl_eticket()),
        (HSL_HISTORY_KEY, history),
    ]
}

fn decoded_at(now: &travelcard::utils::time::LocalDateTime) -> travelcard::records::HslCardInfo {
    let mut mock = mock_hsl_card(&hsl_blocks());
    let mut d = Dispatcher::new();
    read_to_end(&mut d, &mut mock, "/tag0");
    match DecodedCard::from_fields(d.fields().unwrap(), now).unwrap() {
        DecodedCard::Hsl(card) => card,
        other => panic!("expected an HSL card, got: {:?}", other),
    }
}

#[test]
fn period_pass_reconciliation() {
    let card = decoded_at(&noon(day(2024, 1, 15)));
    let pass = card.period_pass.record();
    assert_eq!(pass.period1.area, AreaCode::MultiZone(5));
    assert_eq!(pass.period1.days_remaining, Remaining::Left(17));
    assert_eq!(pass.period2.days_remaining, Remaining::NotYetStarted);
    assert_eq!(pass.effective_days_remaining, Remaining::Left(46));
    let end = pass.effective_end.unwrap();
    assert_eq!((end.month(), end.day()), (2, 29));
}

#[test]
fn card_number_and_purse() {
    let card = decoded_at(&noon(day(2024, 1, 15)));
    assert_eq!(card.app_info.record().formatted_card_number(), "924620 0012 3456 7890");
    assert_eq!(card.stored_value.record().money_value, 190);
}

#[test]
fn group_ticket_countdown() {
    let now = helsinki(2024, 1, 15, 9, 0);
    let card = decoded_at(&now);
    let ticket = card.eticket.record();
    assert_eq!(ticket.group_size, 2);
    assert_eq!(ticket.ticket_price, 530);
    assert_eq!(ticket.validity_area.name(), "AB");
    assert_eq!(ticket.seconds_remaining, Remaining::Left(20 * 60 + 1));
    let tick = card.next_refresh(&now).unwrap();
    assert_eq!((tick.hour(), tick.minute(), tick.second()), (9, 0, 1));
}

#[test]
fn history_newest_first() {
    let card = decoded_at(&noon(day(2024, 1, 15)));
    let entries = &card.history.record().entries;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, TransactionType::Purchase);
    assert_eq!(entries[0].remaining_value, Some(190));
    assert_eq!(entries[1].kind, TransactionType::Boarding);
    assert_eq!(entries[1].time.map(|t| t.hour()), Some(17));
}

#[test]
fn day_change_refresh() {
    let now = noon(day(2024, 1, 15));
    let mut card = decoded_at(&now);
    // the ticket has expired, so only the period pass is scheduled
    let tick = card.next_refresh(&now).unwrap();
    assert_eq!(tick.date_naive(), day(2024, 1, 16));
    card.refresh(&tick);
    assert_eq!(card.period_pass.record().effective_days_remaining, Remaining::Left(45));
}

fn helsinki(y: i32, m: u32, d: u32, h: u32, min: u32) -> travelcard::utils::time::LocalDateTime {
    travelcard::utils::time::helsinki_local(day(y, m, d).and_hms_opt(h, min, 0).unwrap())
}

#[test]
fn decode_partial_field_map() -> anyhow::Result<()> {
    let mut fields = std::collections::BTreeMap::new();
    fields.insert(CARD_TYPE_KEY.to_string(), HSL_CARD_TYPE.to_string());
    fields.insert(
        HSL_STORED_VALUE_KEY.to_string(),
        travelcard::utils::bytes_to_hex(&hsl_stored_value(2500)),
    );
    let DecodedCard::Hsl(card) = DecodedCard::from_fields(&fields, &noon(day(2024, 1, 15)))? else {
        anyhow::bail!("not an HSL card");
    };
    assert_eq!(card.stored_value.record().money_value, 2500);
    assert!(card.period_pass.data().is_empty());
    assert_eq!(card.period_pass.record().effective_days_remaining, Remaining::Invalid);
    Ok(())
}
