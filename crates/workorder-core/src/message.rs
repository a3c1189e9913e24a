use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Success,
    Danger,
    Info,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Success => "Success",
            MessageKind::Danger => "Danger",
            MessageKind::Info => "Info",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The app-wide banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalMessage {
    pub message: String,
    pub show: bool,
    pub kind: MessageKind,
}

impl Default for GlobalMessage {
    fn default() -> Self {
        Self {
            message: "Default message".into(),
            show: false,
            kind: MessageKind::Danger,
        }
    }
}
