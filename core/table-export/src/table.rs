//! FILENAME: core/table-export/src/table.rs
//! The table-instance collaborator exported by [`crate::export_table`].

use dataset::{ColumnDef, Record};

/// Anything that can hand over its current rows and visible columns.
pub trait TableSource {
    /// Rows in display order (already sorted/filtered by the table).
    fn rows(&self) -> Vec<Record>;

    /// Visible columns in display order.
    fn columns(&self) -> Vec<ColumnDef>;
}

/// A fixed set of rows and columns.
#[derive(Debug, Clone, Default)]
pub struct StaticTable {
    pub rows: Vec<Record>,
    pub columns: Vec<ColumnDef>,
}

impl StaticTable {
    pub fn new(rows: Vec<Record>, columns: Vec<ColumnDef>) -> Self {
        StaticTable { rows, columns }
    }
}

impl TableSource for StaticTable {
    fn rows(&self) -> Vec<Record> {
        self.rows.clone()
    }

    fn columns(&self) -> Vec<ColumnDef> {
        self.columns.clone()
    }
}
