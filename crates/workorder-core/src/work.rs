use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Date format used on the wire for `mechanic_work_date`.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A mechanic work order as the API returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicWork {
    pub mechanic_work_id: String,
    pub mechanic_work_client_id: String,
    pub mechanic_work_machine_id: String,
    #[serde(default)]
    pub mechanic_work_date: Option<String>,
    #[serde(default)]
    pub mechanic_work_hours: String,
    #[serde(default)]
    pub mechanic_work_works: String,
    #[serde(default)]
    pub mechanic_work_finished: bool,
}

/// A part used on a work order, in wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicRechange {
    #[serde(default)]
    pub mechanic_rechange_id: Option<String>,
    pub mechanic_rechange_number: String,
    #[serde(default)]
    pub mechanic_rechange_work_id: Option<String>,
    pub rechange_id: String,
}

/// Resolved work values sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkInput {
    pub mechanic_work_client_id: String,
    pub mechanic_work_machine_id: String,
    pub mechanic_work_date: String,
    pub mechanic_work_hours: String,
    pub mechanic_work_works: String,
}

/// Body of the create and update calls: the work plus its rechange rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPayload {
    pub work: WorkInput,
    #[serde(default)]
    pub rechanges: Vec<MechanicRechange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkMessage {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedWork {
    pub message: String,
    pub work: MechanicWork,
}

/// Parse a wire date. Accepts plain dates and RFC 3339 timestamps, the
/// latter truncated to their UTC calendar day.
pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, WIRE_DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}
