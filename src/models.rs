//! Data models for the meridian-link client library.
//!
//! Defines the wire-level schema descriptors (algebraic types and the
//! typespace they reference), the resolved column/table descriptors the
//! rest of the portal consumes, and the request/response structures for
//! SQL execution.

pub mod algebraic_type;
pub mod column;
pub mod schema;
pub mod table;

pub use algebraic_type::{
    AlgebraicType, OptionalName, PrimitiveType, ProductElement, SumVariant, Typespace,
};
pub use column::{ColumnDescriptor, ColumnType};
pub use schema::{
    QueryResult, ReducerDescriptor, ReducerEntry, SchemaDocument, SqlRequest, TableEntry,
};
pub use table::TableDescriptor;
