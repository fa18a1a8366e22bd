//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot Result - The rectangular summary produced by an aggregation pass.
//!
//! One bucket per distinct row key, each holding one cell per
//! (column bucket x value field) pair. The result can be flattened into
//! records and column definitions so it feeds straight into an exporter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use dataset::{ColumnDef, Record};

use crate::definition::{AggregationType, PivotRequest, TOTAL_COLUMN_KEY};

// ============================================================================
// STATUS
// ============================================================================

/// Whether the request carried enough configuration to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PivotStatus {
    /// Aggregation ran (possibly over zero records).
    Ready,
    /// Row fields or value fields were missing; nothing was computed.
    InsufficientConfiguration,
}

// ============================================================================
// CELLS & BUCKETS
// ============================================================================

/// One computed value within a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCell {
    /// `{column_key}_{field}_{aggregation}`.
    pub key: String,
    pub column_key: String,
    pub field: String,
    pub aggregation: AggregationType,
    pub value: f64,
}

/// A group of records sharing the same row key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationBucket {
    /// Row-field key texts joined with `|`.
    pub key: String,

    /// (row field, value) pairs taken from the first record of the bucket.
    /// Missing fields are recorded as null.
    pub row_values: Vec<(String, Value)>,

    /// Indices of the contributing records in the input slice.
    pub record_indices: Vec<usize>,

    /// Cells ordered by column bucket, then by value field.
    pub cells: Vec<AggregateCell>,
}

impl AggregationBucket {
    /// Looks up a cell value by its key (`Total_salary_sum`).
    pub fn value(&self, cell_key: &str) -> Option<f64> {
        self.cells
            .iter()
            .find(|cell| cell.key == cell_key)
            .map(|cell| cell.value)
    }

    /// Looks up the attached value of a row field.
    pub fn row_value(&self, field: &str) -> Option<&Value> {
        self.row_values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn record_count(&self) -> usize {
        self.record_indices.len()
    }

    /// Flattens the bucket into a record: row fields first, then cells.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        for (field, value) in &self.row_values {
            record.insert(field.clone(), value.clone());
        }
        for cell in &self.cells {
            record.insert(cell.key.clone(), number_value(cell.value));
        }
        record
    }
}

fn number_value(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

// ============================================================================
// RESULT
// ============================================================================

/// Output of [`crate::aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotResult {
    pub status: PivotStatus,

    /// Row buckets in first-seen order.
    pub buckets: Vec<AggregationBucket>,

    /// Column bucket keys in first-seen order (`["Total"]` without column fields).
    pub column_keys: Vec<String>,

    /// Reductions over every record, one cell per (column key, value field).
    pub grand_totals: Vec<AggregateCell>,

    /// Copy of the request, used to lay out columns when flattening.
    pub request: PivotRequest,
}

impl PivotResult {
    /// The idle result returned when the request is not configured.
    pub fn insufficient(request: &PivotRequest) -> Self {
        PivotResult {
            status: PivotStatus::InsufficientConfiguration,
            buckets: Vec::new(),
            column_keys: Vec::new(),
            grand_totals: Vec::new(),
            request: request.clone(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == PivotStatus::Ready
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Finds a bucket by its row key text.
    pub fn bucket(&self, key: &str) -> Option<&AggregationBucket> {
        self.buckets.iter().find(|bucket| bucket.key == key)
    }

    /// Looks up a grand-total cell by key.
    pub fn grand_total(&self, cell_key: &str) -> Option<f64> {
        self.grand_totals
            .iter()
            .find(|cell| cell.key == cell_key)
            .map(|cell| cell.value)
    }

    /// One record per bucket (see [`AggregationBucket::to_record`]).
    pub fn to_records(&self) -> Vec<Record> {
        self.buckets.iter().map(AggregationBucket::to_record).collect()
    }

    /// Column definitions matching [`PivotResult::to_records`]: row fields,
    /// then one column per (column key, value field).
    pub fn columns(&self) -> Vec<ColumnDef> {
        if !self.is_ready() {
            return Vec::new();
        }

        let mut columns: Vec<ColumnDef> = self
            .request
            .row_fields
            .iter()
            .map(|field| ColumnDef::new(field.clone()))
            .collect();

        for column_key in &self.column_keys {
            for value_field in &self.request.value_fields {
                let header = if column_key == TOTAL_COLUMN_KEY && !self.request.is_cross_tab() {
                    value_field.display_name()
                } else {
                    format!("{} / {}", column_key, value_field.display_name())
                };
                columns.push(ColumnDef::new(value_field.cell_key(column_key)).with_header(header));
            }
        }

        columns
    }
}
