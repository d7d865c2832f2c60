//! Resolved table descriptors.

use serde::{Deserialize, Serialize};

use super::column::ColumnDescriptor;

/// A discovered table: name, resolved columns, and the server's row
/// estimate.
///
/// Built by schema discovery, replaced wholesale on refresh, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name.
    pub name: String,

    /// Columns in schema order.
    pub columns: Vec<ColumnDescriptor>,

    /// Server-reported row estimate (may lag the live count).
    #[serde(default)]
    pub estimated_row_count: u64,
}

impl TableDescriptor {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<ColumnDescriptor>,
        estimated_row_count: u64,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            estimated_row_count,
        }
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            names.push(column.name.clone());
        }
        names
    }
}
