use std::collections::HashMap;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;
use workorder_core::session::{Credentials, Session};

use crate::routes::AppState;

/// Bearer token of the current request, inserted by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

/// Accounts allowed to log in plus the tokens handed out so far.
///
/// Only SHA-256 hashes of passwords and tokens are kept.
pub struct AuthConfig {
    /// email -> password hash
    accounts: HashMap<String, String>,
    /// token hash -> email
    tokens: RwLock<HashMap<String, String>>,
}

impl AuthConfig {
    /// Build from `(email, password)` pairs.
    pub fn new<I, E, P>(accounts: I) -> Self
    where
        I: IntoIterator<Item = (E, P)>,
        E: Into<String>,
        P: AsRef<str>,
    {
        Self {
            accounts: accounts
                .into_iter()
                .map(|(email, password)| (email.into(), sha256_hex(password.as_ref())))
                .collect(),
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Check credentials and issue a fresh token.
    pub async fn login(&self, credentials: &Credentials) -> Option<Session> {
        let stored = self.accounts.get(&credentials.email)?;
        if !constant_time_eq(stored, &sha256_hex(&credentials.password)) {
            return None;
        }
        let token = generate_token();
        self.tokens
            .write()
            .await
            .insert(sha256_hex(&token), credentials.email.clone());
        Some(Session {
            token,
            email: credentials.email.clone(),
        })
    }

    /// The email a token was issued to.
    pub async fn authenticate(&self, token: &str) -> Option<String> {
        self.tokens.read().await.get(&sha256_hex(token)).cloned()
    }
}

/// SHA-256 hash a raw value, returning the hex-encoded digest.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generate a session token: `wo_` + 43 chars of base62-encoded random bytes.
pub fn generate_token() -> String {
    use rand::Rng;
    const BASE62: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let random_part: String = (0..43)
        .map(|_| {
            let idx = rng.gen_range(0..BASE62.len());
            BASE62[idx] as char
        })
        .collect();
    format!("wo_{random_part}")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "missing or invalid token" })),
    )
        .into_response()
}

/// Axum middleware that requires `Authorization: Bearer <token>` with a
/// token issued by [`AuthConfig::login`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned);

    let Some(token) = token else {
        return unauthorized();
    };
    match state.auth.authenticate(&token).await {
        Some(email) => {
            debug!("request from {email}");
            request.extensions_mut().insert(AuthToken(token));
            next.run(request).await
        }
        None => unauthorized(),
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
