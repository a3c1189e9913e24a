//! State machine tests for the TUI App.
//!
//! Each test spawns a test server on a separate thread (to avoid nested tokio runtime panics),
//! logs in with the demo account, builds an App, and simulates key events to test mode transitions.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use workorder_core::form::FormField;
use workorder_core::screen::{EditWorkScreen, Phase, CLOSED_MESSAGE, SAVED_MESSAGE};
use workorder_core::store::Store;
use workorder_server::test_helpers::demo_credentials;
use workorder_service::BlockingHttpService;
use workorder_tui::app::{App, Focus, Mode};

/// Spawn the test server on a separate thread, return the base URL.
/// BlockingHttpService creates its own tokio Runtime, so the server
/// must live in a separate thread's Runtime to avoid nesting.
fn spawn_server() -> String {
    let (tx, rx) = std::sync::mpsc::sync_channel(1);
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let server = workorder_server::test_helpers::spawn_test_server().await;
            tx.send(server.base_url.clone()).unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        app.handle_key(char_key(c));
    }
}

fn make_app(screen: EditWorkScreen) -> App {
    let url = spawn_server();
    let svc = BlockingHttpService::new(&url);
    let session = svc.login(&demo_credentials()).unwrap();
    App::new(svc, Store::new(Some(session)), screen)
}

/// Open work order 1 and switch it to edit mode.
fn editing_app() -> App {
    let mut app = make_app(EditWorkScreen::new_edit("1"));
    app.handle_key(char_key('e'));
    assert_eq!(app.screen().phase(), Phase::Editing);
    app
}

fn focus_on(app: &mut App, target: Focus) {
    for _ in 0..app.focus_targets().len() {
        app.handle_key(char_key('k'));
    }
    while app.focused() != target {
        app.handle_key(char_key('j'));
    }
}

// ---- State transition tests ----

#[test]
fn app_starts_read_only() {
    let app = make_app(EditWorkScreen::new_edit("1"));
    assert!(matches!(app.mode(), Mode::Browse));
    assert_eq!(app.screen().phase(), Phase::ReadOnly);
    assert_eq!(app.screen().form().values().client, "Acme Farms");
    assert!(!app.is_input_mode());
}

#[test]
fn missing_work_shows_error() {
    let app = make_app(EditWorkScreen::new_edit("999"));
    assert_eq!(app.screen().phase(), Phase::Error);
}

#[test]
fn enter_needs_edit_mode() {
    let mut app = make_app(EditWorkScreen::new_edit("1"));
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Browse));
    assert_eq!(app.status_message(), Some("Press e to edit"));
}

#[test]
fn closed_work_cannot_be_edited() {
    let mut app = make_app(EditWorkScreen::new_edit("2"));
    app.handle_key(char_key('e'));
    assert_eq!(app.screen().phase(), Phase::ReadOnly);
    assert_eq!(app.status_message(), Some("Work order is closed"));
}

#[test]
fn client_picker_opens_and_cancels() {
    let mut app = editing_app();
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Pick { .. }));
    assert!(app.is_input_mode());
    app.handle_key(key(KeyCode::Esc));
    assert!(matches!(app.mode(), Mode::Browse));
    assert_eq!(app.screen().form().values().client, "Acme Farms");
}

#[test]
fn picking_a_client_updates_the_form() {
    let mut app = editing_app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('j'));
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Browse));
    assert_eq!(app.screen().form().values().client, "Northside Quarry");
}

#[test]
fn hours_accept_only_numbers() {
    let mut app = editing_app();
    focus_on(&mut app, Focus::Field(FormField::Hours));
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::EditText { .. }));
    for _ in 0..5 {
        app.handle_key(key(KeyCode::Backspace));
    }
    type_str(&mut app, "7h");
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.screen().form().values().hours, "7");
}

#[test]
fn date_is_typed_day_first() {
    let mut app = editing_app();
    focus_on(&mut app, Focus::Field(FormField::Date));
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::EditDate { .. }));
    for _ in 0..10 {
        app.handle_key(key(KeyCode::Backspace));
    }
    type_str(&mut app, "05/06/2024");
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Browse));
    assert_eq!(
        app.screen().form().values().date,
        NaiveDate::from_ymd_opt(2024, 6, 5)
    );
}

#[test]
fn add_part_focuses_new_row() {
    let mut app = editing_app();
    let before = app.screen().rechanges().len();
    app.handle_key(char_key('a'));
    assert_eq!(app.screen().rechanges().len(), before + 1);
    assert_eq!(app.focused(), Focus::RechangeTitle(before));

    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Pick { .. }));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.screen().rechanges().rows()[before].title, "Oil filter");
}

#[test]
fn invalid_save_opens_modal() {
    let mut app = editing_app();
    focus_on(&mut app, Focus::Field(FormField::Works));
    app.handle_key(key(KeyCode::Enter));
    for _ in 0..40 {
        app.handle_key(key(KeyCode::Backspace));
    }
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('s'));
    assert!(app.store().modal.is_open);
    assert!(app.screen().form().errors().works);

    app.handle_key(char_key('n'));
    assert!(!app.store().modal.is_open);
    assert_eq!(app.screen().phase(), Phase::Editing);
}

#[test]
fn modal_retry_after_fix_saves() {
    let mut app = editing_app();
    app.handle_key(char_key('a'));
    focus_on(&mut app, Focus::RechangeNumber(2));
    app.handle_key(key(KeyCode::Enter));
    type_str(&mut app, "3");
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('s'));
    assert!(app.store().modal.is_open);
    assert!(app.screen().rechanges().errors()[2].title);

    app.handle_key(char_key('n'));
    focus_on(&mut app, Focus::RechangeTitle(2));
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('s'));
    match app.mode() {
        Mode::Done { navigation } => assert_eq!(navigation.message, SAVED_MESSAGE),
        other => panic!("expected Done, got {other:?}"),
    }
}

#[test]
fn valid_save_shows_confirmation() {
    let mut app = editing_app();
    app.handle_key(char_key('s'));
    match app.mode() {
        Mode::Done { navigation } => assert_eq!(navigation.message, SAVED_MESSAGE),
        other => panic!("expected Done, got {other:?}"),
    }
    assert_eq!(app.screen().phase(), Phase::ReadOnly);
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Browse));
}

#[test]
fn finish_closes_the_work_order() {
    let mut app = make_app(EditWorkScreen::new_edit("1"));
    app.handle_key(char_key('f'));
    match app.mode() {
        Mode::Done { navigation } => assert_eq!(navigation.message, CLOSED_MESSAGE),
        other => panic!("expected Done, got {other:?}"),
    }
    assert!(app.screen().is_finished());
}

#[test]
fn finish_refused_while_editing() {
    let mut app = editing_app();
    app.handle_key(char_key('f'));
    assert!(matches!(app.mode(), Mode::Browse));
    assert!(!app.screen().is_finished());
}

#[test]
fn new_work_order_starts_editing() {
    let app = make_app(EditWorkScreen::new_create());
    assert_eq!(app.screen().phase(), Phase::Editing);
    assert_eq!(app.store().references.clients.len(), 3);
}

// ---- Rendering ----

fn rendered(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn renders_hydrated_names() {
    let app = make_app(EditWorkScreen::new_edit("1"));
    let screen = rendered(&app);
    assert!(screen.contains("Acme Farms"));
    assert!(screen.contains("Tractor JD 6120"));
    assert!(screen.contains("Oil filter"));
    assert!(screen.contains("04/03/2024"));
}

#[test]
fn renders_error_state() {
    let app = make_app(EditWorkScreen::new_edit("999"));
    assert!(rendered(&app).contains("Could not load the work order."));
}
