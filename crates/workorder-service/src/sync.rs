//! Glue between the screen state machine and a [`WorkOrderService`].
//!
//! Every function takes the store and the screen explicitly, performs the
//! remote calls the screen asked for and reports the outcome back to it.

use tracing::{debug, info, warn};
use workorder_core::reference::ReferenceLists;
use workorder_core::screen::{EditWorkScreen, LoadedWork, SubmitReceipt, Submission};
use workorder_core::store::Store;

use crate::{ServiceError, WorkOrderService};

/// Fetch the three reference lists concurrently.
pub async fn fetch_references<S>(service: &S, token: &str) -> Result<ReferenceLists, ServiceError>
where
    S: WorkOrderService + ?Sized,
{
    let (clients, machines, parts) = tokio::try_join!(
        service.list_clients(token),
        service.list_machines(token),
        service.list_parts(token),
    )?;
    Ok(ReferenceLists::new(clients, machines, parts))
}

/// Fetch a work order, its rows and every reference list.
///
/// Completes only once all of them are in; the first failure wins.
pub async fn fetch_work_order<S>(
    service: &S,
    token: &str,
    work_id: &str,
) -> Result<LoadedWork, ServiceError>
where
    S: WorkOrderService + ?Sized,
{
    let (record, rechanges, references) = tokio::try_join!(
        service.get_mechanic_work(token, work_id),
        service.list_mechanic_rechanges(token, work_id),
        fetch_references(service, token),
    )?;
    Ok(LoadedWork {
        record: Some(record),
        rechanges,
        references,
    })
}

fn session_token(store: &Store) -> Result<String, ServiceError> {
    store
        .token()
        .map(str::to_owned)
        .ok_or_else(|| ServiceError::Unauthorized("not logged in".into()))
}

/// Load whatever the screen's flow needs and hand it to the screen.
///
/// Returns whether the screen accepted the result.
pub async fn load_screen<S>(service: &S, store: &mut Store, screen: &mut EditWorkScreen) -> bool
where
    S: WorkOrderService + ?Sized,
{
    let ticket = screen.begin_load(store);
    let work_id = screen.work_id().map(str::to_owned);
    let result = match session_token(store) {
        Ok(token) => match work_id {
            Some(work_id) => fetch_work_order(service, &token, &work_id).await,
            None => fetch_references(service, &token)
                .await
                .map(|references| LoadedWork {
                    references,
                    ..Default::default()
                }),
        },
        Err(e) => Err(e),
    };
    match &result {
        Ok(_) => debug!("loaded {}", screen.title()),
        Err(e) => warn!("loading {} failed: {e}", screen.title()),
    }
    screen.apply_load(ticket, result.map_err(|e| e.to_string()), store)
}

/// Validate and, when valid, send exactly one create or update call.
pub async fn submit_screen<S>(
    service: &S,
    store: &mut Store,
    screen: &mut EditWorkScreen,
) -> Submission
where
    S: WorkOrderService + ?Sized,
{
    let submission = screen.submit(store);
    send_submission(service, store, screen, &submission).await;
    submission
}

/// Run the error modal's accept action, which goes through the submit path.
pub async fn accept_modal<S>(
    service: &S,
    store: &mut Store,
    screen: &mut EditWorkScreen,
) -> Submission
where
    S: WorkOrderService + ?Sized,
{
    let submission = screen.accept_modal(store);
    send_submission(service, store, screen, &submission).await;
    submission
}

async fn send_submission<S>(
    service: &S,
    store: &mut Store,
    screen: &mut EditWorkScreen,
    submission: &Submission,
) where
    S: WorkOrderService + ?Sized,
{
    let result = match submission {
        Submission::Ignored | Submission::Invalid => return,
        Submission::Create(payload) => match session_token(store) {
            Ok(token) => service
                .create_mechanic_work(&token, payload)
                .await
                .map(|created| {
                    info!("created work order {}", created.work.mechanic_work_id);
                    SubmitReceipt::Created {
                        work_id: created.work.mechanic_work_id,
                    }
                }),
            Err(e) => Err(e),
        },
        Submission::Update { work_id, payload } => match session_token(store) {
            Ok(token) => service
                .update_mechanic_work(&token, work_id, payload)
                .await
                .map(|_| {
                    info!("updated work order {work_id}");
                    SubmitReceipt::Updated
                }),
            Err(e) => Err(e),
        },
    };
    if let Err(e) = &result {
        warn!("submit failed: {e}");
    }
    screen.complete_submit(result.map_err(|e| e.message().to_string()), store);
}

/// Close the work order. Returns `false` if the screen could not finish.
pub async fn finish_screen<S>(service: &S, store: &mut Store, screen: &mut EditWorkScreen) -> bool
where
    S: WorkOrderService + ?Sized,
{
    let Some(work_id) = screen.begin_finish(store) else {
        return false;
    };
    let result = match session_token(store) {
        Ok(token) => service.finish_mechanic_work(&token, &work_id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => {
            info!("closed work order {work_id}");
            screen.complete_finish(Ok(()), store);
            true
        }
        Err(e) => {
            warn!("closing work order {work_id} failed: {e}");
            screen.complete_finish(Err(e.to_string()), store);
            false
        }
    }
}
