use crate::error::{ResolveError, WorkOrderError};
use crate::reference::{resolve_part, Part};
use crate::work::MechanicRechange;

/// One part-usage row as the form edits it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RechangeRow {
    /// `mechanic_rechange_id`, set for rows that came from the server.
    pub id: Option<String>,
    pub work_id: Option<String>,
    pub title: String,
    pub number: String,
    /// Catalog id resolved from `title` at selection time.
    pub rechange_id: Option<String>,
}

impl RechangeRow {
    fn from_record(record: &MechanicRechange, parts: &[Part]) -> Self {
        let title = parts
            .iter()
            .find(|p| p.id == record.rechange_id)
            .map(|p| p.title.clone())
            .unwrap_or_default();
        Self {
            id: record.mechanic_rechange_id.clone(),
            work_id: record.mechanic_rechange_work_id.clone(),
            title,
            number: record.mechanic_rechange_number.clone(),
            rechange_id: Some(record.rechange_id.clone()),
        }
    }

    /// Untouched rows are neither validated nor sent.
    pub fn is_blank(&self) -> bool {
        self.id.is_none()
            && self.rechange_id.is_none()
            && self.title.trim().is_empty()
            && self.number.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowErrors {
    pub index: usize,
    pub title: bool,
    pub number: bool,
}

impl RowErrors {
    pub fn clean(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn any(&self) -> bool {
        self.title || self.number
    }
}

/// The variable-length list of rechange rows and their validity flags.
///
/// Never empty: it starts with (and falls back to) a single blank row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RechangeList {
    rows: Vec<RechangeRow>,
    errors: Vec<RowErrors>,
}

impl Default for RechangeList {
    fn default() -> Self {
        Self::new()
    }
}

impl RechangeList {
    pub fn new() -> Self {
        Self {
            rows: vec![RechangeRow::default()],
            errors: vec![RowErrors::clean(0)],
        }
    }

    /// Build rows from wire records, filling display titles from the catalog.
    pub fn from_records(records: &[MechanicRechange], parts: &[Part]) -> Self {
        if records.is_empty() {
            return Self::new();
        }
        let rows: Vec<RechangeRow> = records
            .iter()
            .map(|r| RechangeRow::from_record(r, parts))
            .collect();
        let errors = (0..rows.len()).map(RowErrors::clean).collect();
        Self { rows, errors }
    }

    pub fn rows(&self) -> &[RechangeRow] {
        &self.rows
    }

    pub fn errors(&self) -> &[RowErrors] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a blank row. Returns the new row's index.
    pub fn add_row(&mut self) -> usize {
        let index = self.rows.len();
        self.rows.push(RechangeRow::default());
        self.errors.push(RowErrors::clean(index));
        index
    }

    /// Only the last row carries the "add" affordance.
    pub fn shows_add(&self, index: usize) -> bool {
        index + 1 == self.rows.len()
    }

    pub fn edit_number(&mut self, index: usize, value: String) -> Result<(), WorkOrderError> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(WorkOrderError::RowOutOfRange(index))?;
        row.number = value;
        if let Some(err) = self.errors.get_mut(index) {
            err.number = false;
        }
        Ok(())
    }

    /// Set a row's title and resolve its catalog id.
    ///
    /// On a catalog miss the title still changes but the previous id is
    /// kept, and the miss is returned so the caller can report it.
    /// [`RechangeList::validate`] flags such a row.
    pub fn select_title(
        &mut self,
        index: usize,
        title: String,
        parts: &[Part],
    ) -> Result<(), WorkOrderError> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(WorkOrderError::RowOutOfRange(index))?;
        let resolved = resolve_part(parts, &title).map(|p| p.id.clone());
        row.title = title;
        if let Some(err) = self.errors.get_mut(index) {
            err.title = false;
        }
        row.rechange_id = Some(resolved?);
        Ok(())
    }

    /// Per-row checks. Does not touch the stored flags.
    pub fn validate(&self, parts: &[Part]) -> Vec<RowErrors> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                if row.is_blank() {
                    return RowErrors::clean(index);
                }
                let resolved = row
                    .rechange_id
                    .as_deref()
                    .is_some_and(|id| parts.iter().any(|p| p.id == id && p.title == row.title));
                RowErrors {
                    index,
                    title: row.title.trim().is_empty() || !resolved,
                    number: row.number.trim().is_empty(),
                }
            })
            .collect()
    }

    pub fn apply_errors(&mut self, errors: Vec<RowErrors>) {
        self.errors = errors;
    }

    /// Wire rows for the create/update payload. Blank rows are skipped.
    pub fn to_wire(&self) -> Result<Vec<MechanicRechange>, ResolveError> {
        self.rows
            .iter()
            .filter(|row| !row.is_blank())
            .map(|row| {
                let rechange_id = row
                    .rechange_id
                    .clone()
                    .ok_or_else(|| ResolveError::UnknownPart(row.title.clone()))?;
                Ok(MechanicRechange {
                    mechanic_rechange_id: row.id.clone(),
                    mechanic_rechange_number: row.number.trim().to_string(),
                    mechanic_rechange_work_id: row.work_id.clone(),
                    rechange_id,
                })
            })
            .collect()
    }
}
