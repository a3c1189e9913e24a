use async_trait::async_trait;
use thiserror::Error;
use workorder_core::reference::{Client, Machine, Part};
use workorder_core::work::{CreatedWork, MechanicRechange, MechanicWork, WorkMessage, WorkPayload};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// The bare message, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            ServiceError::NotFound(m)
            | ServiceError::InvalidInput(m)
            | ServiceError::Unauthorized(m)
            | ServiceError::Internal(m) => m,
        }
    }
}

/// Remote operations behind the work order screens.
///
/// `HttpService` talks to a running workorder-server.
/// `MemoryService` keeps everything in process and backs the server;
/// it trusts the token, authentication happens in front of it.
#[async_trait]
pub trait WorkOrderService: Send + Sync {
    // -- Mechanic works --
    async fn get_mechanic_work(&self, token: &str, id: &str) -> Result<MechanicWork, ServiceError>;
    async fn create_mechanic_work(
        &self,
        token: &str,
        payload: &WorkPayload,
    ) -> Result<CreatedWork, ServiceError>;
    async fn update_mechanic_work(
        &self,
        token: &str,
        id: &str,
        payload: &WorkPayload,
    ) -> Result<WorkMessage, ServiceError>;
    async fn finish_mechanic_work(&self, token: &str, id: &str) -> Result<WorkMessage, ServiceError>;
    async fn list_mechanic_rechanges(
        &self,
        token: &str,
        work_id: &str,
    ) -> Result<Vec<MechanicRechange>, ServiceError>;

    // -- Reference lists --
    async fn list_clients(&self, token: &str) -> Result<Vec<Client>, ServiceError>;
    async fn list_machines(&self, token: &str) -> Result<Vec<Machine>, ServiceError>;
    async fn list_parts(&self, token: &str) -> Result<Vec<Part>, ServiceError>;
}
