use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use workorder_core::reference::{Client, Machine, Part};
use workorder_core::session::{Credentials, Session};
use workorder_core::work::{CreatedWork, MechanicRechange, MechanicWork, WorkMessage, WorkPayload};

use crate::{ServiceError, WorkOrderService};

/// Async HTTP client implementation of WorkOrderService.
/// Connects to a running workorder-server.
pub struct HttpService {
    base_url: String,
    client: HttpClient,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: HttpClient::new(),
        }
    }

    fn with_token(builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {token}"))
    }

    /// Check if the server is reachable.
    /// Health endpoint is NOT authenticated.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "health check failed: {}",
                resp.status()
            )))
        }
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ServiceError> {
        let resp = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(credentials)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> Result<T, ServiceError> {
        let builder = self.client.get(format!("{}{path}", self.base_url));
        let resp = Self::with_token(builder, token)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let builder = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body);
        let resp = Self::with_token(builder, token)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn put_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let builder = self
            .client
            .put(format!("{}{path}", self.base_url))
            .json(body);
        let resp = Self::with_token(builder, token)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn post_empty<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> Result<T, ServiceError> {
        let builder = self.client.post(format!("{}{path}", self.base_url));
        let resp = Self::with_token(builder, token)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);

    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(msg),
        StatusCode::BAD_REQUEST => ServiceError::InvalidInput(msg),
        StatusCode::UNAUTHORIZED => ServiceError::Unauthorized(msg),
        _ => ServiceError::Internal(msg),
    }
}

#[async_trait]
impl WorkOrderService for HttpService {
    async fn get_mechanic_work(&self, token: &str, id: &str) -> Result<MechanicWork, ServiceError> {
        self.get_json(token, &format!("/api/mechanic-works/{id}"))
            .await
    }

    async fn create_mechanic_work(
        &self,
        token: &str,
        payload: &WorkPayload,
    ) -> Result<CreatedWork, ServiceError> {
        self.post_json(token, "/api/mechanic-works", payload).await
    }

    async fn update_mechanic_work(
        &self,
        token: &str,
        id: &str,
        payload: &WorkPayload,
    ) -> Result<WorkMessage, ServiceError> {
        self.put_json(token, &format!("/api/mechanic-works/{id}"), payload)
            .await
    }

    async fn finish_mechanic_work(&self, token: &str, id: &str) -> Result<WorkMessage, ServiceError> {
        self.post_empty(token, &format!("/api/mechanic-works/{id}/finish"))
            .await
    }

    async fn list_mechanic_rechanges(
        &self,
        token: &str,
        work_id: &str,
    ) -> Result<Vec<MechanicRechange>, ServiceError> {
        self.get_json(token, &format!("/api/mechanic-works/{work_id}/rechanges"))
            .await
    }

    async fn list_clients(&self, token: &str) -> Result<Vec<Client>, ServiceError> {
        self.get_json(token, "/api/clients").await
    }

    async fn list_machines(&self, token: &str) -> Result<Vec<Machine>, ServiceError> {
        self.get_json(token, "/api/machines").await
    }

    async fn list_parts(&self, token: &str) -> Result<Vec<Part>, ServiceError> {
        self.get_json(token, "/api/rechanges").await
    }
}
