//! FILENAME: core/table-export/src/json.rs
//! Structured-data (JSON) rendering.

use dataset::Record;
use serde_json::Value;

use crate::error::ExportError;
use crate::pipeline::PreparedTable;

/// Projects a record onto the surviving columns, keyed by column id.
/// Unresolved cells become an empty string.
fn project(record: &Record, table: &PreparedTable) -> Record {
    table
        .columns
        .iter()
        .map(|column| {
            let value = column
                .resolve(record)
                .map(|v| v.into_owned())
                .unwrap_or_else(|| Value::String(String::new()));
            (column.id.clone(), value)
        })
        .collect()
}

/// Serializes the prepared records as two-space indented JSON.
///
/// Records are written as-is unless an include/exclude list narrowed the
/// columns, in which case each record is projected onto those columns first.
pub fn write_json(table: &PreparedTable) -> Result<String, ExportError> {
    if table.columns_filtered {
        let projected: Vec<Record> = table
            .records
            .iter()
            .map(|record| project(record, table))
            .collect();
        Ok(serde_json::to_string_pretty(&projected)?)
    } else {
        Ok(serde_json::to_string_pretty(&table.records)?)
    }
}
