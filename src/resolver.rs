//! Type descriptor resolution.
//!
//! Turns algebraic type descriptors into the canonical display tags the
//! portal renders, resolving `Ref` indirections against the schema
//! document's typespace and recognizing the built-in composite types
//! (timestamp, identity, duration) that the wire encodes as single-field
//! products with reserved names.

use log::warn;

use crate::error::TypeResolutionError;
use crate::models::algebraic_type::{
    AlgebraicType, OptionalName, Typespace, DURATION_SENTINEL, IDENTITY_SENTINEL,
    TIMESTAMP_SENTINEL,
};
use crate::models::column::{ColumnDescriptor, ColumnType};
use crate::models::schema::{ReducerDescriptor, SchemaDocument, TableEntry};
use crate::models::table::TableDescriptor;

/// Resolve a descriptor to its canonical type tag.
///
/// Primitives map to their lowercase tags (total over the closed set).
/// `Ref` indirections recurse through the typespace; an out-of-bounds
/// index is an error, never a default tag. A product with exactly one
/// element named with a reserved sentinel resolves to the corresponding
/// built-in tag; other products are `struct`, sums are `enum` (variant
/// detail is not surfaced), and opaque shapes are `unknown`.
///
/// The typespace must not contain `Ref` cycles; that is the caller's
/// guarantee, not checked here.
pub fn resolve_type(
    descriptor: &AlgebraicType,
    typespace: &Typespace,
) -> Result<ColumnType, TypeResolutionError> {
    match descriptor {
        AlgebraicType::Primitive(primitive) => Ok(primitive.column_type()),
        AlgebraicType::Ref(index) => {
            let resolved =
                typespace
                    .get(*index)
                    .ok_or_else(|| TypeResolutionError::RefOutOfBounds {
                        index: *index,
                        len: typespace.len(),
                    })?;
            resolve_type(resolved, typespace)
        }
        AlgebraicType::Product { elements } => {
            if elements.len() == 1 {
                match elements[0].name.engaged() {
                    Some(TIMESTAMP_SENTINEL) => return Ok(ColumnType::Timestamp),
                    Some(IDENTITY_SENTINEL) => return Ok(ColumnType::Identity),
                    Some(DURATION_SENTINEL) => return Ok(ColumnType::Duration),
                    _ => {}
                }
            }
            Ok(ColumnType::Struct)
        }
        AlgebraicType::Sum { .. } => Ok(ColumnType::Enum),
        AlgebraicType::Opaque(_) => Ok(ColumnType::Unknown),
    }
}

/// Display name for a positional element: the engaged name verbatim, or
/// `col_<index>` (0-based) when disengaged.
pub fn element_name(name: &OptionalName, index: usize) -> String {
    match name.engaged() {
        Some(engaged) => engaged.to_string(),
        None => format!("col_{index}"),
    }
}

/// Project a column list from a product type.
///
/// Strict: a non-product descriptor or any per-column resolution failure
/// fails the whole projection. Callers that prefer degradation (the
/// schema cache, reducer projection) decide at their own level.
pub fn columns_from_product(
    product: &AlgebraicType,
    typespace: &Typespace,
) -> Result<Vec<ColumnDescriptor>, TypeResolutionError> {
    let AlgebraicType::Product { elements } = product else {
        return Err(TypeResolutionError::NotAProduct);
    };
    let mut columns = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        columns.push(ColumnDescriptor::new(
            element_name(&element.name, index),
            resolve_type(&element.algebraic_type, typespace)?,
        ));
    }
    Ok(columns)
}

/// Project one table's columns from the schema document.
pub fn table_columns(
    doc: &SchemaDocument,
    entry: &TableEntry,
) -> Result<Vec<ColumnDescriptor>, TypeResolutionError> {
    let row_type = doc.typespace.get(entry.product_type_ref).ok_or_else(|| {
        TypeResolutionError::RefOutOfBounds {
            index: entry.product_type_ref,
            len: doc.typespace.len(),
        }
    })?;
    columns_from_product(row_type, &doc.typespace)
}

/// Project one table's full descriptor from the schema document.
pub fn table_descriptor(
    doc: &SchemaDocument,
    entry: &TableEntry,
) -> Result<TableDescriptor, TypeResolutionError> {
    Ok(TableDescriptor::new(
        entry.name.clone(),
        table_columns(doc, entry)?,
        entry.estimated_row_count,
    ))
}

/// Project reducer descriptors from the schema document.
///
/// A reducer whose parameters fail to resolve is skipped with a warning;
/// one broken reducer must not hide the rest.
pub fn reducer_descriptors(doc: &SchemaDocument) -> Vec<ReducerDescriptor> {
    let mut reducers = Vec::with_capacity(doc.reducers.len());
    for entry in &doc.reducers {
        let mut params = Vec::with_capacity(entry.params.len());
        let mut failed = None;
        for (index, param) in entry.params.iter().enumerate() {
            match resolve_type(&param.algebraic_type, &doc.typespace) {
                Ok(column_type) => params.push(ColumnDescriptor::new(
                    element_name(&param.name, index),
                    column_type,
                )),
                Err(err) => {
                    failed = Some(err);
                    break;
                }
            }
        }
        match failed {
            Some(err) => warn!("[SCHEMA] skipping reducer '{}': {}", entry.name, err),
            None => reducers.push(ReducerDescriptor {
                name: entry.name.clone(),
                params,
            }),
        }
    }
    reducers
}
