//! Raw schema document and SQL request/response models.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::algebraic_type::{AlgebraicType, ProductElement, Typespace};
use super::column::ColumnDescriptor;

/// The schema document the server returns from one discovery call.
///
/// Per-table and per-reducer descriptors are projected from it; the
/// typespace is shared by every `Ref` in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Tables, each pointing at its row product type in the typespace.
    #[serde(default)]
    pub tables: Vec<TableEntry>,

    /// The ordered type table `Ref` indices resolve against.
    #[serde(default)]
    pub typespace: Typespace,

    /// Reducers (remote stored procedures) with typed parameters.
    #[serde(default)]
    pub reducers: Vec<ReducerEntry>,
}

/// One table's entry in the schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Table name.
    pub name: String,

    /// Index of the table's row product type in the typespace.
    pub product_type_ref: usize,

    /// Server-reported row estimate.
    #[serde(default)]
    pub estimated_row_count: u64,
}

/// One reducer's entry in the schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducerEntry {
    /// Reducer name.
    pub name: String,

    /// Parameters, in call order. Same wire shape as product elements.
    #[serde(default)]
    pub params: Vec<ProductElement>,
}

/// A reducer with resolved parameter types, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducerDescriptor {
    pub name: String,
    pub params: Vec<ColumnDescriptor>,
}

/// Request body for SQL execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlRequest {
    pub query: String,
}

/// One executed statement's result: a schema fragment describing the row
/// shape, plus positional value arrays ordered like that shape.
///
/// # Example (JSON representation)
///
/// ```json
/// {
///   "schema": {"Product": {"elements": [{"name": {"some": "id"}, "algebraic_type": "U32"}]}},
///   "rows": [[7], [8]]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Product type describing the row shape.
    pub schema: AlgebraicType,

    /// The result rows as arrays of wire values (ordered by schema
    /// element index).
    #[serde(default)]
    pub rows: Vec<Vec<JsonValue>>,
}
