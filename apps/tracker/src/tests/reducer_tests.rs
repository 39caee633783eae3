use super::*;
use chrono::{TimeZone, Utc};
use shared::{
    domain::{Status, TrackingHistoryEntry},
    error::{ErrorCode, ErrorReport},
};

fn number(raw: &str) -> TrackingNumber {
    TrackingNumber(raw.to_string())
}

fn record(raw: &str) -> TrackingRecord {
    TrackingRecord {
        tracking_number: number(raw),
        history: vec![TrackingHistoryEntry {
            timestamp: Utc.with_ymd_and_hms(2021, 3, 1, 9, 15, 0).unwrap(),
            status_code: "delivered".into(),
            status: Status {
                code: "delivered".into(),
                title: "Dostarczona".into(),
                description: String::new(),
            },
        }],
    }
}

fn loaded_with(raw: &[&str]) -> SessionState {
    let mut state = SessionState::new();
    state.fold(AppMessage::ListUpdated(
        raw.iter().map(|n| number(n)).collect(),
    ));
    state
}

fn press(state: &mut SessionState, event: InputEvent) -> Option<BackendCommand> {
    match state.handle_input(event) {
        Transition::Continue(cmd) => cmd,
        Transition::Quit => panic!("unexpected quit on {event:?}"),
    }
}

fn type_text(state: &mut SessionState, text: &str) {
    for c in text.chars() {
        assert_eq!(press(state, InputEvent::Char(c)), None);
    }
}

fn fetch_failure(raw: &str) -> UiError {
    UiError::new(
        UiErrorContext::FetchHistory,
        ErrorReport::new(ErrorCode::NotFound, format!("package with number {raw} not found")),
    )
    .with_tracking_number(number(raw))
}

#[test]
fn starts_browsing_at_add_line_and_requests_load() {
    let state = SessionState::new();
    assert_eq!(state.mode(), Mode::Browsing);
    assert_eq!(state.cursor(), 0);
    assert!(!state.is_loaded());
    assert_eq!(state.startup_command(), BackendCommand::LoadTrackingNumbers);
}

#[test]
fn cursor_is_clamped_to_list_bounds() {
    let mut state = loaded_with(&["A", "B"]);

    press(&mut state, InputEvent::Up);
    assert_eq!(state.cursor(), 0);

    for _ in 0..5 {
        press(&mut state, InputEvent::Down);
    }
    assert_eq!(state.cursor(), 2);
}

#[test]
fn activate_on_add_line_enters_adding_with_focus() {
    let mut state = loaded_with(&[]);

    assert_eq!(press(&mut state, InputEvent::Activate), None);

    assert_eq!(state.mode(), Mode::Adding);
    assert!(state.input().is_focused());
}

#[test]
fn confirm_appends_trimmed_text_and_returns_to_browsing() {
    let mut state = loaded_with(&[]);
    press(&mut state, InputEvent::Activate);
    type_text(&mut state, " 600012345678x");
    press(&mut state, InputEvent::Backspace);

    let cmd = press(&mut state, InputEvent::Activate);

    assert_eq!(
        cmd,
        Some(BackendCommand::AppendTrackingNumber {
            number: number("600012345678")
        })
    );
    assert_eq!(state.mode(), Mode::Browsing);
    assert_eq!(state.input().value(), "");
    assert!(!state.input().is_focused());
}

#[test]
fn confirm_with_blank_text_issues_nothing() {
    let mut state = loaded_with(&[]);
    press(&mut state, InputEvent::Activate);
    type_text(&mut state, "   ");

    assert_eq!(press(&mut state, InputEvent::Activate), None);
    assert_eq!(state.mode(), Mode::Browsing);
}

#[test]
fn cancel_discards_pending_text() {
    let mut state = loaded_with(&[]);
    press(&mut state, InputEvent::Activate);
    type_text(&mut state, "123");

    assert_eq!(press(&mut state, InputEvent::Cancel), None);

    assert_eq!(state.mode(), Mode::Browsing);
    assert_eq!(state.input().value(), "");
}

#[test]
fn adding_mode_treats_navigation_keys_as_inert() {
    let mut state = loaded_with(&["A"]);
    press(&mut state, InputEvent::Activate);

    press(&mut state, InputEvent::Down);
    press(&mut state, InputEvent::ToggleDelete);

    assert_eq!(state.mode(), Mode::Adding);
    assert_eq!(state.cursor(), 0);
}

#[test]
fn activate_uncached_number_requests_fetch() {
    let mut state = loaded_with(&["A", "B"]);
    press(&mut state, InputEvent::Down);
    press(&mut state, InputEvent::Down);

    let cmd = press(&mut state, InputEvent::Activate);

    assert_eq!(cmd, Some(BackendCommand::FetchHistory { number: number("B") }));
    assert!(state.is_fetching(&number("B")));
}

#[test]
fn cached_number_only_toggles_visibility() {
    let mut state = loaded_with(&["A"]);
    press(&mut state, InputEvent::Down);
    press(&mut state, InputEvent::Activate);
    state.fold(AppMessage::HistoryFetched(record("A")));
    assert!(state.visible_history(&number("A")).is_some());

    assert_eq!(press(&mut state, InputEvent::Activate), None);
    assert!(state.visible_history(&number("A")).is_none());

    assert_eq!(press(&mut state, InputEvent::Activate), None);
    assert!(state.visible_history(&number("A")).is_some());
}

#[test]
fn delete_mode_removes_selected_entry_and_moves_cursor_up() {
    let mut state = loaded_with(&["A", "B", "C"]);
    press(&mut state, InputEvent::Down);
    press(&mut state, InputEvent::Down);
    press(&mut state, InputEvent::ToggleDelete);
    assert_eq!(state.mode(), Mode::Deleting);

    let cmd = press(&mut state, InputEvent::Activate);

    assert_eq!(cmd, Some(BackendCommand::RemoveTrackingNumber { index: 1 }));
    assert_eq!(state.cursor(), 1);
    assert_eq!(state.mode(), Mode::Browsing);
}

#[test]
fn toggle_delete_twice_disarms() {
    let mut state = loaded_with(&["A"]);
    press(&mut state, InputEvent::ToggleDelete);
    press(&mut state, InputEvent::ToggleDelete);
    assert_eq!(state.mode(), Mode::Browsing);

    press(&mut state, InputEvent::ToggleDelete);
    press(&mut state, InputEvent::Cancel);
    assert_eq!(state.mode(), Mode::Browsing);
}

#[test]
fn activate_add_line_while_deleting_enters_adding() {
    let mut state = loaded_with(&["A"]);
    press(&mut state, InputEvent::ToggleDelete);

    assert_eq!(press(&mut state, InputEvent::Activate), None);
    assert_eq!(state.mode(), Mode::Adding);
}

#[test]
fn list_update_replaces_numbers_and_keeps_cursor_in_bounds() {
    let mut state = loaded_with(&["A", "B", "C"]);
    for _ in 0..3 {
        press(&mut state, InputEvent::Down);
    }

    state.fold(AppMessage::ListUpdated(vec![number("A")]));
    assert_eq!(state.tracking_numbers(), &[number("A")]);
    assert_eq!(state.cursor(), 1);

    state.fold(AppMessage::ListUpdated(vec![number("A"), number("Z")]));
    assert_eq!(state.cursor(), 1, "growing the list does not move the cursor");
}

#[test]
fn history_result_is_applied_even_after_navigating_away() {
    let mut state = loaded_with(&["A", "B"]);
    press(&mut state, InputEvent::Down);
    press(&mut state, InputEvent::Activate);
    press(&mut state, InputEvent::Up);
    press(&mut state, InputEvent::Activate);
    assert_eq!(state.mode(), Mode::Adding);

    state.fold(AppMessage::HistoryFetched(record("A")));

    assert!(!state.is_fetching(&number("A")));
    assert_eq!(state.cached_history(&number("A")), Some(&record("A")));
    assert!(state.visible_history(&number("A")).is_some());
    assert_eq!(state.mode(), Mode::Adding);
}

#[test]
fn failed_fetch_records_error_without_touching_list_or_cache() {
    let mut state = loaded_with(&["X"]);
    press(&mut state, InputEvent::Down);
    press(&mut state, InputEvent::Activate);

    state.fold(AppMessage::Failed(fetch_failure("X")));

    let error = state.last_error().expect("error recorded");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.tracking_number(), Some(&number("X")));
    assert_eq!(state.tracking_numbers(), &[number("X")]);
    assert!(state.cached_history(&number("X")).is_none());
    assert!(!state.is_fetching(&number("X")));
}

#[test]
fn failed_fetch_is_retried_on_next_selection() {
    let mut state = loaded_with(&["X"]);
    press(&mut state, InputEvent::Down);
    press(&mut state, InputEvent::Activate);
    state.fold(AppMessage::Failed(fetch_failure("X")));

    assert_eq!(press(&mut state, InputEvent::Activate), None, "dismisses error");
    assert!(state.last_error().is_none());

    assert_eq!(
        press(&mut state, InputEvent::Activate),
        Some(BackendCommand::FetchHistory { number: number("X") })
    );
}

#[test]
fn failed_startup_load_still_marks_session_loaded() {
    let mut state = SessionState::new();
    state.fold(AppMessage::Failed(UiError::new(
        UiErrorContext::LoadList,
        ErrorReport::new(ErrorCode::Decode, "tracking store is not valid JSON"),
    )));

    assert!(state.is_loaded());
    assert!(state.tracking_numbers().is_empty());
}

#[test]
fn quit_is_global() {
    let mut state = loaded_with(&["A"]);
    assert_eq!(state.handle_input(InputEvent::Quit), Transition::Quit);

    press(&mut state, InputEvent::Activate);
    assert_eq!(state.mode(), Mode::Adding);
    assert_eq!(state.handle_input(InputEvent::Quit), Transition::Quit);

    state.fold(AppMessage::Failed(fetch_failure("A")));
    assert_eq!(state.handle_input(InputEvent::Quit), Transition::Quit);
}
