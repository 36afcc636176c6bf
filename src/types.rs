use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One data line of the export, keyed by trimmed header name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based position among the data rows (blank lines are not counted)
    pub index: usize,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(index: usize, fields: HashMap<String, String>) -> Self {
        Self { index, fields }
    }

    /// Raw value for a column, `None` when the row is short or the header is missing
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// A pantry item with every field typed and defaulted, ready for storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    pub name: String,
    pub expiration_date: Option<NaiveDate>,
    pub quantity: u32,
    pub keywords: Vec<String>,
    pub placement: String,
    pub hidden: bool,
    /// Exports carry no image data, so this is always `None`
    pub image_url: Option<String>,
}

/// Item as returned by the storage collaborator after a successful create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredItem {
    pub id: Uuid,
    #[serde(flatten)]
    pub item: NormalizedItem,
    pub created_at: DateTime<Utc>,
}

impl StoredItem {
    pub fn name(&self) -> &str {
        &self.item.name
    }
}

/// A row left out of the batch before any write was attempted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

/// Diagnostic for a field that could not be read and fell back to its default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNotice {
    pub row: usize,
    pub field: &'static str,
    pub raw: String,
    pub fallback: String,
}

impl std::fmt::Display for FieldNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} \"{}\", using {}",
            self.field, self.raw, self.fallback
        )
    }
}

/// What happened to a single row during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Created { row: usize, id: Uuid, name: String },
    Failed { row: usize, name: String, message: String },
    Skipped(SkippedRow),
}

/// Run-scoped counters plus the per-row records behind them
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub skipped: Vec<SkippedRow>,
    pub notices: Vec<FieldNotice>,
    pub created: Vec<Uuid>,
}

impl BatchOutcome {
    /// Rows that were neither written nor failed
    pub fn skip_count(&self) -> usize {
        self.total_rows
            .saturating_sub(self.success_count)
            .saturating_sub(self.error_count)
    }
}
