//! State machine for the work order edit screen.
//!
//! The screen never talks to the network itself. Operations that need a
//! remote call return what to send (a [`Submission`], a work id to
//! finish, a [`LoadTicket`]) and the caller reports the outcome back.

use crate::error::WorkOrderError;
use crate::form::{FieldErrors, FieldValue, FormField, FormState};
use crate::hydrate::hydrate;
use crate::message::MessageKind;
use crate::rechange::{RechangeList, RowErrors};
use crate::reference::ReferenceLists;
use crate::store::{ModalAction, Store};
use crate::work::{MechanicRechange, MechanicWork, WorkPayload};

/// Screen shown after a successful save or close.
pub const FINISH_STEP: &str = "FinishStep";
pub const SAVED_MESSAGE: &str = "Work order saved successfully";
pub const CREATED_MESSAGE: &str = "Work order created successfully";
pub const CLOSED_MESSAGE: &str = "Work order closed successfully";
pub const CLOSE_FAILED_MESSAGE: &str = "Could not close the work order, try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Create,
    Edit { work_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    /// Load failed. Nothing useful to render and no retry.
    Error,
    ReadOnly,
    Editing,
    Submitting,
}

/// Request to move to another screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub screen: String,
    pub message: String,
}

impl Navigation {
    pub fn finish_step(message: &str) -> Self {
        Self {
            screen: FINISH_STEP.to_string(),
            message: message.to_string(),
        }
    }
}

/// Identifies one load. Responses for a stale ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Everything a load fetches. `record` is `None` for the create flow.
#[derive(Debug, Clone, Default)]
pub struct LoadedWork {
    pub record: Option<MechanicWork>,
    pub rechanges: Vec<MechanicRechange>,
    pub references: ReferenceLists,
}

/// What [`EditWorkScreen::submit`] asks the caller to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Screen was not in a state that accepts a submit.
    Ignored,
    /// Validation failed; the error modal is open. Send nothing.
    Invalid,
    Create(WorkPayload),
    Update { work_id: String, payload: WorkPayload },
}

/// Successful outcome of a create or update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReceipt {
    Updated,
    Created { work_id: String },
}

#[derive(Debug, Clone)]
pub struct EditWorkScreen {
    flow: Flow,
    phase: Phase,
    form: FormState,
    rechanges: RechangeList,
    finished: bool,
    mounted: bool,
    generation: u64,
    navigation: Option<Navigation>,
}

impl EditWorkScreen {
    pub fn new_edit(work_id: impl Into<String>) -> Self {
        Self::with_flow(Flow::Edit {
            work_id: work_id.into(),
        })
    }

    pub fn new_create() -> Self {
        Self::with_flow(Flow::Create)
    }

    fn with_flow(flow: Flow) -> Self {
        Self {
            flow,
            phase: Phase::Loading,
            form: FormState::new(),
            rechanges: RechangeList::new(),
            finished: false,
            mounted: true,
            generation: 0,
            navigation: None,
        }
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn work_id(&self) -> Option<&str> {
        match &self.flow {
            Flow::Edit { work_id } => Some(work_id.as_str()),
            Flow::Create => None,
        }
    }

    pub fn title(&self) -> String {
        match &self.flow {
            Flow::Edit { work_id } => format!("Work order #{work_id}"),
            Flow::Create => "New work order".to_string(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn rechanges(&self) -> &RechangeList {
        &self.rechanges
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the form has anything to show.
    pub fn is_renderable(&self, store: &Store) -> bool {
        !store.loader && !matches!(self.phase, Phase::Loading | Phase::Error)
    }

    pub fn take_navigation(&mut self) -> Option<Navigation> {
        self.navigation.take()
    }

    // -- Loading --

    pub fn begin_load(&mut self, store: &mut Store) -> LoadTicket {
        self.generation += 1;
        self.phase = Phase::Loading;
        store.enable_loader();
        LoadTicket(self.generation)
    }

    /// Apply a load result. Returns `false` when the response was dropped
    /// because the screen is gone or a newer load was issued.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<LoadedWork, String>,
        store: &mut Store,
    ) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        store.disable_loader();
        if !self.mounted {
            return false;
        }
        match result {
            Ok(loaded) => {
                match (&self.flow, loaded.record) {
                    (Flow::Edit { .. }, Some(record)) => {
                        let (values, rows) =
                            hydrate(&record, &loaded.rechanges, &loaded.references);
                        self.form = FormState::with_values(values);
                        self.rechanges = rows;
                        self.finished = record.mechanic_work_finished;
                        self.phase = Phase::ReadOnly;
                    }
                    (Flow::Edit { .. }, None) => {
                        self.phase = Phase::Error;
                        return true;
                    }
                    (Flow::Create, _) => {
                        self.form = FormState::new();
                        self.rechanges = RechangeList::new();
                        self.phase = Phase::Editing;
                    }
                }
                store.set_references(loaded.references);
            }
            Err(_) => self.phase = Phase::Error,
        }
        true
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    // -- Editing --

    /// Switch a loaded, still open work order into edit mode.
    pub fn enable_edit(&mut self) -> bool {
        if self.phase == Phase::ReadOnly && !self.finished {
            self.phase = Phase::Editing;
            true
        } else {
            false
        }
    }

    fn ensure_editing(&self) -> Result<(), WorkOrderError> {
        if self.phase == Phase::Editing {
            Ok(())
        } else {
            Err(WorkOrderError::InvalidInput(
                "work order is not in edit mode".into(),
            ))
        }
    }

    pub fn set_field(&mut self, field: FormField, value: FieldValue) -> Result<(), WorkOrderError> {
        self.ensure_editing()?;
        self.form.set_field(field, value)
    }

    pub fn add_rechange(&mut self) -> Result<usize, WorkOrderError> {
        self.ensure_editing()?;
        Ok(self.rechanges.add_row())
    }

    pub fn edit_rechange_number(&mut self, index: usize, value: String) -> Result<(), WorkOrderError> {
        self.ensure_editing()?;
        self.rechanges.edit_number(index, value)
    }

    pub fn select_rechange_title(
        &mut self,
        index: usize,
        title: String,
        store: &Store,
    ) -> Result<(), WorkOrderError> {
        self.ensure_editing()?;
        self.rechanges
            .select_title(index, title, &store.references.parts)
    }

    // -- Submitting --

    /// Validate and, if everything resolves, move to `Submitting` and
    /// hand back the payload to send.
    pub fn submit(&mut self, store: &mut Store) -> Submission {
        if self.phase != Phase::Editing {
            return Submission::Ignored;
        }
        store.enable_loader();

        let fields = self.form.check(&store.references);
        let rows = self.rechanges.validate(&store.references.parts);
        let rows_invalid = rows.iter().any(RowErrors::any);
        self.rechanges.apply_errors(rows);

        let work = match fields {
            Ok(work) => {
                self.form.apply_errors(FieldErrors::default());
                work
            }
            Err(errors) => {
                self.form.apply_errors(errors);
                return self.reject(store);
            }
        };
        if rows_invalid {
            return self.reject(store);
        }
        let rechanges = match self.rechanges.to_wire() {
            Ok(rows) => rows,
            Err(_) => return self.reject(store),
        };

        self.phase = Phase::Submitting;
        let payload = WorkPayload { work, rechanges };
        match &self.flow {
            Flow::Create => Submission::Create(payload),
            Flow::Edit { work_id } => Submission::Update {
                work_id: work_id.clone(),
                payload,
            },
        }
    }

    fn reject(&mut self, store: &mut Store) -> Submission {
        store.show_modal(ModalAction::Submit);
        store.disable_loader();
        Submission::Invalid
    }

    pub fn complete_submit(&mut self, result: Result<SubmitReceipt, String>, store: &mut Store) {
        if self.phase != Phase::Submitting {
            return;
        }
        store.disable_loader();
        match result {
            Ok(receipt) => {
                let message = match receipt {
                    SubmitReceipt::Updated => SAVED_MESSAGE,
                    SubmitReceipt::Created { work_id } => {
                        self.flow = Flow::Edit { work_id };
                        CREATED_MESSAGE
                    }
                };
                store.hide_message();
                store.hide_modal();
                self.phase = Phase::ReadOnly;
                self.navigation = Some(Navigation::finish_step(message));
            }
            Err(message) => {
                store.show_message(MessageKind::Danger, message);
                self.phase = Phase::Editing;
            }
        }
    }

    /// Run the modal's accept action. Does nothing once the modal is closed.
    pub fn accept_modal(&mut self, store: &mut Store) -> Submission {
        if !store.modal.is_open {
            return Submission::Ignored;
        }
        store.hide_modal();
        match store.modal.accept {
            ModalAction::Submit => self.submit(store),
            ModalAction::Dismiss => Submission::Ignored,
        }
    }

    pub fn decline_modal(&mut self, store: &mut Store) {
        store.hide_modal();
    }

    // -- Finishing --

    /// Returns the id to close, if closing is possible right now.
    pub fn begin_finish(&mut self, store: &mut Store) -> Option<String> {
        if self.phase != Phase::ReadOnly || self.finished {
            return None;
        }
        let work_id = self.work_id()?.to_string();
        store.enable_loader();
        Some(work_id)
    }

    pub fn complete_finish(&mut self, result: Result<(), String>, store: &mut Store) {
        store.disable_loader();
        match result {
            Ok(()) => {
                self.finished = true;
                self.navigation = Some(Navigation::finish_step(CLOSED_MESSAGE));
            }
            Err(_) => store.show_message(MessageKind::Danger, CLOSE_FAILED_MESSAGE),
        }
    }
}
