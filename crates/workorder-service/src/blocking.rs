use tokio::runtime::Runtime;
use workorder_core::screen::{EditWorkScreen, Submission};
use workorder_core::session::{Credentials, Session};
use workorder_core::store::Store;

use crate::{sync, HttpService, ServiceError};

/// Blocking wrapper around the async `HttpService`.
///
/// Creates an internal tokio runtime and uses `block_on()` for each call.
/// Designed for sync callers like the TUI.
pub struct BlockingHttpService {
    inner: HttpService,
    rt: Runtime,
}

impl BlockingHttpService {
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: HttpService::new(base_url),
            rt: Runtime::new().expect("failed to create tokio runtime"),
        }
    }

    pub fn health_check(&self) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.health_check())
    }

    pub fn login(&self, credentials: &Credentials) -> Result<Session, ServiceError> {
        self.rt.block_on(self.inner.login(credentials))
    }

    // -- Screen operations --

    pub fn load_screen(&self, store: &mut Store, screen: &mut EditWorkScreen) -> bool {
        self.rt
            .block_on(sync::load_screen(&self.inner, store, screen))
    }

    pub fn submit_screen(&self, store: &mut Store, screen: &mut EditWorkScreen) -> Submission {
        self.rt
            .block_on(sync::submit_screen(&self.inner, store, screen))
    }

    pub fn accept_modal(&self, store: &mut Store, screen: &mut EditWorkScreen) -> Submission {
        self.rt
            .block_on(sync::accept_modal(&self.inner, store, screen))
    }

    pub fn finish_screen(&self, store: &mut Store, screen: &mut EditWorkScreen) -> bool {
        self.rt
            .block_on(sync::finish_screen(&self.inner, store, screen))
    }
}
