use travelcard::constants::*;
use travelcard::dispatch::{DispatchState, Dispatcher};
use travelcard::test_support::{blank_hsl_blocks, mock_hsl_card, read_to_end};
use travelcard::transport::{TagState, Transport};

#[test]
fn recognition_reports_every_change() {
    let mut mock = mock_hsl_card(&blank_hsl_blocks());
    let mut d = Dispatcher::new();
    d.set_target("/tag0", &mut mock);
    let changes = d.pump(&mut mock);
    assert!(changes.state && changes.fields && changes.page_url);
    assert!(!changes.path);
    assert_eq!(d.page_url(), HSL_PAGE_URL);
    assert_eq!(d.path(), "/tag0");
}

#[test]
fn clearing_target_keeps_recognized_card() {
    let mut mock = mock_hsl_card(&blank_hsl_blocks());
    let mut d = Dispatcher::new();
    read_to_end(&mut d, &mut mock, "/tag0");
    let fields = d.fields().cloned();
    assert!(fields.is_some());

    let changes = d.set_target("", &mut mock);
    assert!(changes.path);
    assert!(!changes.state && !changes.fields && !changes.page_url);
    assert!(matches!(d.state(), DispatchState::Recognized { card_type, .. } if card_type == "HSL"));
    assert_eq!(d.fields().cloned(), fields);
    assert_eq!(d.page_url(), HSL_PAGE_URL);
    assert_eq!(d.path(), "");
}

#[test]
fn new_target_abandons_running_read() {
    let mut mock = mock_hsl_card(&blank_hsl_blocks());
    let mut d = Dispatcher::new();
    d.set_target("/tag0", &mut mock);
    // lock granted, SELECT in flight
    let event = mock.next_event().unwrap();
    d.handle_event(event, &mut mock);
    assert_eq!(mock.locks_held(), 1);

    d.set_target("/tag1", &mut mock);
    assert_eq!(mock.attached, vec!["/tag0".to_string(), "/tag1".to_string()]);
    assert_eq!(d.state(), &DispatchState::Reading(0));
    // old lock gone before the new one is granted
    assert_eq!(mock.locks_held(), 0);
    assert_eq!(d.live_drivers(), 1);

    d.pump(&mut mock);
    assert!(matches!(d.state(), DispatchState::Recognized { .. }));
    // only the stale SELECT completes as cancelled
    assert_eq!(mock.cancelled, 1);
    assert_eq!(mock.max_locks_held, 1);
}

#[test]
fn non_iso_dep_tag_is_not_recognized() {
    let mut mock = travelcard::transport::MockTransport::new(TagState::without_iso_dep());
    let mut d = Dispatcher::new();
    let changes = d.set_target("/tag0", &mut mock);
    assert!(changes.path);
    assert_eq!(d.state(), &DispatchState::None);
    assert_eq!(mock.lock_requests, 0);
}
