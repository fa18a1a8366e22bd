//! FILENAME: core/dataset/src/lib.rs
//! PURPOSE: Shared data model for the aggregation and export crates.
//! CONTEXT: Re-exports the record type, value conversions and column metadata.

pub mod column;
pub mod value;

pub use column::{Accessor, ColumnDef};
pub use value::{
    as_number, display_text, format_number, key_text, lookup, Record, MISSING_KEY_TEXT,
};

/// Builds a [`Record`] from a JSON object literal. Non-objects yield an empty record.
pub fn record_from_json(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Record::new(),
    }
}
