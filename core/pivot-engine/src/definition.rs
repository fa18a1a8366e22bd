//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Request - The serializable configuration.
//!
//! This module contains the types needed to DESCRIBE an aggregation pass.
//! These structures are designed to be:
//! - Serializable (loadable from JSON configuration)
//! - Immutable snapshots of user intent
//! - Independent of any table or UI state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator placed between field values when building a bucket key.
pub const KEY_SEPARATOR: &str = "|";

/// The single column bucket used when no column fields are configured.
pub const TOTAL_COLUMN_KEY: &str = "Total";

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for value fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    #[default]
    Sum,
    Average,
    Count,
    Min,
    Max,
}

impl AggregationType {
    /// Lowercase tag used in output cell keys (`Total_salary_sum`).
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationType::Sum => "sum",
            AggregationType::Average => "average",
            AggregationType::Count => "count",
            AggregationType::Min => "min",
            AggregationType::Max => "max",
        }
    }

    /// Human-readable label used in generated column headers.
    pub fn label(&self) -> &'static str {
        match self {
            AggregationType::Sum => "Sum",
            AggregationType::Average => "Average",
            AggregationType::Count => "Count",
            AggregationType::Min => "Min",
            AggregationType::Max => "Max",
        }
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FIELD DEFINITIONS
// ============================================================================

/// A field selected for numeric reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueField {
    /// Name of the record field to reduce.
    pub field: String,

    /// The aggregation function to apply.
    #[serde(default)]
    pub aggregation: AggregationType,
}

impl ValueField {
    pub fn new(field: impl Into<String>, aggregation: AggregationType) -> Self {
        ValueField {
            field: field.into(),
            aggregation,
        }
    }

    /// Output cell key for this value field within a column bucket.
    pub fn cell_key(&self, column_key: &str) -> String {
        format!("{}_{}_{}", column_key, self.field, self.aggregation.as_str())
    }

    /// Display name, e.g. "Sum of salary".
    pub fn display_name(&self) -> String {
        format!("{} of {}", self.aggregation.label(), self.field)
    }
}

// ============================================================================
// REQUEST
// ============================================================================

/// The complete configuration of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotRequest {
    /// Fields whose values form the row buckets, outermost first.
    #[serde(default)]
    pub row_fields: Vec<String>,

    /// Fields whose values form the column buckets. May be empty.
    #[serde(default)]
    pub column_fields: Vec<String>,

    /// Fields to reduce within every (row, column) bucket.
    #[serde(default)]
    pub value_fields: Vec<ValueField>,
}

impl PivotRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregation only runs with at least one row field and one value field.
    pub fn is_configured(&self) -> bool {
        !self.row_fields.is_empty() && !self.value_fields.is_empty()
    }

    /// Whether values are cross-tabulated by column fields.
    pub fn is_cross_tab(&self) -> bool {
        !self.column_fields.is_empty()
    }
}
