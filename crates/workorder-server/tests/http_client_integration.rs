//! Integration tests for HttpService + BlockingHttpService against a real server.
//!
//! Each test spawns an in-process axum server on 127.0.0.1:0 over the demo
//! seed, then drives the client layer through the full request/response cycle.

use workorder_core::form::{FieldValue, FormField};
use workorder_core::screen::{EditWorkScreen, Navigation, Phase, Submission, SAVED_MESSAGE};
use workorder_core::store::Store;
use workorder_core::work::{MechanicRechange, WorkInput, WorkPayload};
use workorder_server::test_helpers::demo_credentials;
use workorder_service::{sync, HttpService, ServiceError, WorkOrderService};

async fn spawn_server() -> String {
    let server = workorder_server::test_helpers::spawn_test_server().await;
    server.base_url
}

async fn logged_in() -> (HttpService, String) {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);
    let session = svc.login(&demo_credentials()).await.unwrap();
    (svc, session.token)
}

fn payload(works: &str) -> WorkPayload {
    WorkPayload {
        work: WorkInput {
            mechanic_work_client_id: "3".into(),
            mechanic_work_machine_id: "2".into(),
            mechanic_work_date: "2024-05-01".into(),
            mechanic_work_hours: "1.5".into(),
            mechanic_work_works: works.into(),
        },
        rechanges: vec![MechanicRechange {
            mechanic_rechange_id: None,
            mechanic_rechange_number: "4".into(),
            mechanic_rechange_work_id: None,
            rechange_id: "4".into(),
        }],
    }
}

// ---- Async HttpService tests ----

#[tokio::test]
async fn health_check_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);
    svc.health_check().await.unwrap();
}

#[tokio::test]
async fn login_rejects_bad_password() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);
    let mut creds = demo_credentials();
    creds.password = "wrong".into();
    let err = svc.login(&creds).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)), "{err:?}");
}

#[tokio::test]
async fn unknown_token_is_unauthorized() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);
    let err = svc.list_clients("wo_not_issued").await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)), "{err:?}");
}

#[tokio::test]
async fn reference_lists_via_http() {
    let (svc, token) = logged_in().await;
    assert_eq!(svc.list_clients(&token).await.unwrap().len(), 3);
    assert_eq!(svc.list_machines(&token).await.unwrap().len(), 3);
    assert_eq!(svc.list_parts(&token).await.unwrap().len(), 4);
}

#[tokio::test]
async fn missing_work_is_not_found() {
    let (svc, token) = logged_in().await;
    let err = svc.get_mechanic_work(&token, "999").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn create_then_fetch_via_http() {
    let (svc, token) = logged_in().await;
    let created = svc
        .create_mechanic_work(&token, &payload("Brake service"))
        .await
        .unwrap();
    let id = created.work.mechanic_work_id;

    let fetched = svc.get_mechanic_work(&token, &id).await.unwrap();
    assert_eq!(fetched.mechanic_work_works, "Brake service");
    assert!(!fetched.mechanic_work_finished);

    let rows = svc.list_mechanic_rechanges(&token, &id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].mechanic_rechange_work_id.as_deref(), Some(id.as_str()));
}

#[tokio::test]
async fn invalid_payload_is_bad_request() {
    let (svc, token) = logged_in().await;
    let mut body = payload("x");
    body.work.mechanic_work_client_id = "99".into();
    let err = svc.update_mechanic_work(&token, "1", &body).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)), "{err:?}");
}

#[tokio::test]
async fn closed_work_rejects_update() {
    let (svc, token) = logged_in().await;
    svc.finish_mechanic_work(&token, "1").await.unwrap();
    let work = svc.get_mechanic_work(&token, "1").await.unwrap();
    assert!(work.mechanic_work_finished);
    assert!(svc
        .update_mechanic_work(&token, "1", &payload("late"))
        .await
        .is_err());
}

// ---- Screen driven through the sync layer ----

#[tokio::test]
async fn edit_screen_round_trip_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);
    let session = svc.login(&demo_credentials()).await.unwrap();
    let mut store = Store::new(Some(session.clone()));
    let mut screen = EditWorkScreen::new_edit("1");

    assert!(sync::load_screen(&svc, &mut store, &mut screen).await);
    assert_eq!(screen.phase(), Phase::ReadOnly);
    assert_eq!(screen.form().values().client, "Acme Farms");
    assert_eq!(screen.rechanges().len(), 2);

    assert!(screen.enable_edit());
    screen
        .set_field(FormField::Hours, FieldValue::Text("4".into()))
        .unwrap();
    let submission = sync::submit_screen(&svc, &mut store, &mut screen).await;
    assert!(matches!(submission, Submission::Update { .. }));
    assert_eq!(
        screen.take_navigation(),
        Some(Navigation::finish_step(SAVED_MESSAGE))
    );

    let stored = svc.get_mechanic_work(&session.token, "1").await.unwrap();
    assert_eq!(stored.mechanic_work_hours, "4");
    assert_eq!(stored.mechanic_work_client_id, "1");
}

#[tokio::test]
async fn finished_work_loads_read_only() {
    let (svc, token) = logged_in().await;
    let mut store = Store::new(Some(workorder_core::session::Session {
        token,
        email: demo_credentials().email,
    }));
    let mut screen = EditWorkScreen::new_edit("2");
    sync::load_screen(&svc, &mut store, &mut screen).await;
    assert!(screen.is_finished());
    assert!(!screen.enable_edit());
    assert!(!sync::finish_screen(&svc, &mut store, &mut screen).await);
}

// ---- Blocking HttpService tests ----

// BlockingHttpService creates its own tokio runtime, so we must
// spawn the server on a separate thread to avoid nested runtime panics.

fn spawn_blocking_server() -> String {
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

#[test]
fn blocking_load_and_finish() {
    let url = spawn_blocking_server();
    let svc = workorder_service::BlockingHttpService::new(&url);
    svc.health_check().unwrap();

    let session = svc.login(&demo_credentials()).unwrap();
    let mut store = Store::new(Some(session));
    let mut screen = EditWorkScreen::new_edit("1");
    assert!(svc.load_screen(&mut store, &mut screen));
    assert_eq!(screen.phase(), Phase::ReadOnly);

    assert!(svc.finish_screen(&mut store, &mut screen));
    assert!(screen.is_finished());
}

#[test]
fn blocking_load_without_login_errors() {
    let url = spawn_blocking_server();
    let svc = workorder_service::BlockingHttpService::new(&url);
    let mut store = Store::default();
    let mut screen = EditWorkScreen::new_edit("1");
    svc.load_screen(&mut store, &mut screen);
    assert_eq!(screen.phase(), Phase::Error);
}
