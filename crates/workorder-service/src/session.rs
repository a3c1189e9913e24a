use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use workorder_core::session::Session;

use crate::ServiceError;

/// Persists the logged-in session as a small JSON file.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_DATA_HOME/workorder/session.json`, falling back to
    /// `~/.local/share/workorder/session.json`.
    pub fn default_path() -> PathBuf {
        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share"))
            })
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("workorder").join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nobody is logged in.
    pub fn load(&self) -> Result<Option<Session>, ServiceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ServiceError::Internal(format!("read session: {e}"))),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| ServiceError::Internal(format!("corrupt session file: {e}")))
    }

    pub fn save(&self, session: &Session) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ServiceError::Internal(format!("create session dir: {e}")))?;
        }
        let body = serde_json::to_string_pretty(session)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        fs::write(&self.path, body)
            .map_err(|e| ServiceError::Internal(format!("write session: {e}")))?;
        debug!("saved session for {} to {}", session.email, self.path.display());
        Ok(())
    }

    /// Forget the session. Clearing when nothing is stored is fine.
    pub fn clear(&self) -> Result<(), ServiceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ServiceError::Internal(format!("remove session: {e}"))),
        }
    }
}
