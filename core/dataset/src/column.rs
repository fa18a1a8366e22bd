//! FILENAME: core/dataset/src/column.rs
//! PURPOSE: Column metadata shared by exporters and pivot results.
//! CONTEXT: A column says how to pull one cell out of a record and what
//! label to show above it. Accessor functions are not serializable, so they
//! are skipped by serde and supplied in code.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::{display_text, lookup, Record};

/// Computes a cell value from a whole record.
#[derive(Clone)]
pub struct Accessor(Arc<dyn Fn(&Record) -> Value + Send + Sync>);

impl Accessor {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Accessor(Arc::new(f))
    }

    pub fn call(&self, record: &Record) -> Value {
        (self.0)(record)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

/// Describes one column of a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Unique column identifier. Also the fallback field name and header.
    pub id: String,

    /// Display label shown in the header row.
    #[serde(default)]
    pub header: Option<String>,

    /// Field name (or dotted path) to read the cell from.
    #[serde(default)]
    pub accessor_key: Option<String>,

    /// Function computing the cell; takes precedence over `accessor_key`.
    #[serde(skip)]
    pub accessor: Option<Accessor>,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>) -> Self {
        ColumnDef {
            id: id.into(),
            header: None,
            accessor_key: None,
            accessor: None,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_accessor_key(mut self, key: impl Into<String>) -> Self {
        self.accessor_key = Some(key.into());
        self
    }

    pub fn with_accessor<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.accessor = Some(Accessor::new(f));
        self
    }

    /// The declared display label, falling back to the id.
    pub fn display_header(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.id)
    }

    /// Resolves this column's value in `record`.
    ///
    /// Resolution order: accessor function, field named by `accessor_key`,
    /// field named by `id`. Returns `None` when nothing resolves.
    pub fn resolve<'r>(&self, record: &'r Record) -> Option<Cow<'r, Value>> {
        if let Some(accessor) = &self.accessor {
            return Some(Cow::Owned(accessor.call(record)));
        }

        if let Some(key) = &self.accessor_key {
            if let Some(value) = lookup(record, key) {
                return Some(Cow::Borrowed(value));
            }
        }

        record.get(&self.id).map(Cow::Borrowed)
    }

    /// Resolves this column's value as display text (empty when unresolved).
    pub fn cell_text(&self, record: &Record) -> String {
        display_text(self.resolve(record).as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn resolution_order() {
        let r = record(json!({ "id": "by-id", "key": "by-key" }));

        let by_fn = ColumnDef::new("id")
            .with_accessor_key("key")
            .with_accessor(|_| json!("by-fn"));
        assert_eq!(by_fn.cell_text(&r), "by-fn");

        let by_key = ColumnDef::new("id").with_accessor_key("key");
        assert_eq!(by_key.cell_text(&r), "by-key");

        let missing_key = ColumnDef::new("id").with_accessor_key("nope");
        assert_eq!(missing_key.cell_text(&r), "by-id");

        let nothing = ColumnDef::new("other");
        assert_eq!(nothing.cell_text(&r), "");
        assert!(nothing.resolve(&r).is_none());
    }

    #[test]
    fn header_falls_back_to_id() {
        assert_eq!(ColumnDef::new("name").display_header(), "name");
        assert_eq!(ColumnDef::new("name").with_header("Name").display_header(), "Name");
    }

    #[test]
    fn deserializes_without_accessor() {
        let col: ColumnDef = serde_json::from_str(r#"{"id":"salary","header":"Salary"}"#)
            .expect("column json");
        assert_eq!(col.id, "salary");
        assert_eq!(col.header.as_deref(), Some("Salary"));
        assert!(col.accessor_key.is_none());
        assert!(col.accessor.is_none());
    }
}
