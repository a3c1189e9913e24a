use std::fmt;

use chrono::NaiveDate;

use crate::error::WorkOrderError;
use crate::reference::ReferenceLists;
use crate::work::{format_wire_date, parse_wire_date, MechanicWork, WorkInput};

/// Date format shown in form widgets.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Client,
    Machine,
    Date,
    Hours,
    Works,
}

impl FormField {
    pub const ALL: &[FormField] = &[
        FormField::Client,
        FormField::Machine,
        FormField::Date,
        FormField::Hours,
        FormField::Works,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Client => "client",
            FormField::Machine => "machine",
            FormField::Date => "date",
            FormField::Hours => "hours",
            FormField::Works => "works",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Client => "Client",
            FormField::Machine => "Machine",
            FormField::Date => "Date",
            FormField::Hours => "Hours",
            FormField::Works => "Works",
        }
    }

    /// Wire key the field is loaded from.
    pub fn wire_key(&self) -> &'static str {
        match self {
            FormField::Client => "mechanic_work_client_id",
            FormField::Machine => "mechanic_work_machine_id",
            FormField::Date => "mechanic_work_date",
            FormField::Hours => "mechanic_work_hours",
            FormField::Works => "mechanic_work_works",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A value reported by a field widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
}

/// The in-progress work order as the form shows it.
///
/// `client` and `machine` hold display names once hydrated; they only
/// become ids again when the form is resolved for submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkOrderForm {
    pub client: String,
    pub machine: String,
    pub date: Option<NaiveDate>,
    pub hours: String,
    pub works: String,
}

impl WorkOrderForm {
    /// Map a wire record onto the form shape, keeping ids as they are.
    pub fn from_record(record: &MechanicWork) -> Self {
        Self {
            client: record.mechanic_work_client_id.clone(),
            machine: record.mechanic_work_machine_id.clone(),
            date: record
                .mechanic_work_date
                .as_deref()
                .and_then(parse_wire_date),
            hours: record.mechanic_work_hours.clone(),
            works: record.mechanic_work_works.clone(),
        }
    }

    pub fn display(&self, field: FormField) -> String {
        match field {
            FormField::Client => self.client.clone(),
            FormField::Machine => self.machine.clone(),
            FormField::Date => self
                .date
                .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            FormField::Hours => self.hours.clone(),
            FormField::Works => self.works.clone(),
        }
    }

    fn is_empty(&self, field: FormField) -> bool {
        match field {
            FormField::Client => self.client.trim().is_empty(),
            FormField::Machine => self.machine.trim().is_empty(),
            FormField::Date => self.date.is_none(),
            FormField::Hours => self.hours.trim().is_empty(),
            FormField::Works => self.works.trim().is_empty(),
        }
    }
}

/// Per-field "invalid" flags. Shares its key set with [`WorkOrderForm`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub client: bool,
    pub machine: bool,
    pub date: bool,
    pub hours: bool,
    pub works: bool,
}

impl FieldErrors {
    pub fn get(&self, field: FormField) -> bool {
        match field {
            FormField::Client => self.client,
            FormField::Machine => self.machine,
            FormField::Date => self.date,
            FormField::Hours => self.hours,
            FormField::Works => self.works,
        }
    }

    pub fn set(&mut self, field: FormField, invalid: bool) {
        match field {
            FormField::Client => self.client = invalid,
            FormField::Machine => self.machine = invalid,
            FormField::Date => self.date = invalid,
            FormField::Hours => self.hours = invalid,
            FormField::Works => self.works = invalid,
        }
    }

    pub fn any(&self) -> bool {
        FormField::ALL.iter().any(|f| self.get(*f))
    }

    pub fn flagged(&self) -> Vec<FormField> {
        FormField::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f))
            .collect()
    }
}

/// Form values plus the validity map shown next to each field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: WorkOrderForm,
    errors: FieldErrors,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: WorkOrderForm) -> Self {
        Self {
            values,
            errors: FieldErrors::default(),
        }
    }

    pub fn values(&self) -> &WorkOrderForm {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Replace the whole form from a wire record and reset the validity map.
    pub fn load(&mut self, record: &MechanicWork) {
        self.values = WorkOrderForm::from_record(record);
        self.errors = FieldErrors::default();
    }

    /// Replace one field and clear its validity flag.
    pub fn set_field(&mut self, field: FormField, value: FieldValue) -> Result<(), WorkOrderError> {
        match (field, value) {
            (FormField::Date, FieldValue::Date(date)) => self.values.date = Some(date),
            (FormField::Date, FieldValue::Text(text)) => {
                return Err(WorkOrderError::InvalidInput(format!(
                    "date field expects a date, got text {text:?}"
                )));
            }
            (field, FieldValue::Date(_)) => {
                return Err(WorkOrderError::InvalidInput(format!(
                    "{} expects text, got a date",
                    field.as_str()
                )));
            }
            (FormField::Client, FieldValue::Text(t)) => self.values.client = t,
            (FormField::Machine, FieldValue::Text(t)) => self.values.machine = t,
            (FormField::Hours, FieldValue::Text(t)) => self.values.hours = t,
            (FormField::Works, FieldValue::Text(t)) => self.values.works = t,
        }
        self.errors.set(field, false);
        Ok(())
    }

    /// Presence check over every field. Does not touch the stored map.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for &field in FormField::ALL {
            errors.set(field, self.values.is_empty(field));
        }
        if !errors.hours && !hours_are_valid(&self.values.hours) {
            errors.hours = true;
        }
        errors
    }

    pub fn apply_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    /// Validate and resolve display names back to ids.
    ///
    /// Names missing from the reference lists are reported on their
    /// field alongside the presence errors.
    pub fn check(&self, refs: &ReferenceLists) -> Result<WorkInput, FieldErrors> {
        let mut errors = self.validate();

        let client = if errors.client {
            None
        } else {
            refs.resolve_client(&self.values.client).ok()
        };
        errors.client |= client.is_none();

        let machine = if errors.machine {
            None
        } else {
            refs.resolve_machine(&self.values.machine).ok()
        };
        errors.machine |= machine.is_none();

        match (client, machine, self.values.date) {
            (Some(client), Some(machine), Some(date)) if !errors.any() => Ok(WorkInput {
                mechanic_work_client_id: client.to_string(),
                mechanic_work_machine_id: machine.to_string(),
                mechanic_work_date: format_wire_date(date),
                mechanic_work_hours: self.values.hours.trim().to_string(),
                mechanic_work_works: self.values.works.clone(),
            }),
            _ => Err(errors),
        }
    }
}

fn hours_are_valid(hours: &str) -> bool {
    hours
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .is_ok_and(|h| h.is_finite() && h > 0.0)
}
