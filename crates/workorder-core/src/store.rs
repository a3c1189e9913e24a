use crate::message::{GlobalMessage, MessageKind};
use crate::reference::ReferenceLists;
use crate::session::Session;

/// What the modal's accept button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Run the submit path again.
    Submit,
    /// Just close the modal.
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
    pub is_open: bool,
    pub accept: ModalAction,
    pub decline: ModalAction,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            is_open: false,
            accept: ModalAction::Dismiss,
            decline: ModalAction::Dismiss,
        }
    }
}

/// Session and reference state shared by screens.
///
/// Handed to every screen operation explicitly; nothing reads it from
/// a global.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub session: Option<Session>,
    pub references: ReferenceLists,
    pub loader: bool,
    pub message: GlobalMessage,
    pub modal: ModalState,
}

impl Store {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session,
            ..Default::default()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn set_references(&mut self, references: ReferenceLists) {
        self.references = references;
    }

    pub fn enable_loader(&mut self) {
        self.loader = true;
    }

    pub fn disable_loader(&mut self) {
        self.loader = false;
    }

    pub fn show_message(&mut self, kind: MessageKind, message: impl Into<String>) {
        self.message = GlobalMessage {
            message: message.into(),
            show: true,
            kind,
        };
    }

    pub fn hide_message(&mut self) {
        self.message = GlobalMessage {
            message: String::new(),
            show: false,
            kind: MessageKind::Danger,
        };
    }

    pub fn show_modal(&mut self, accept: ModalAction) {
        self.modal = ModalState {
            is_open: true,
            accept,
            decline: ModalAction::Dismiss,
        };
    }

    pub fn hide_modal(&mut self) {
        self.modal.is_open = false;
    }
}
