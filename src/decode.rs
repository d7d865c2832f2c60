//! Wire-value decoding.
//!
//! The server returns rows as positional arrays of self-describing JSON
//! values. Composite and option values are wrapped in single-element
//! arrays (identity, timestamp, duration, engaged options all arrive as
//! `[inner]`), so the decoder always unwraps a one-element array of a
//! scalar. That normalization is lossy on purpose: at the value level a
//! wrapped composite and a genuine one-element scalar array are
//! indistinguishable, and the portal prefers readable cells over
//! preserving the wrapper.
//!
//! Decoding is structural only. A column's resolved type tag never
//! changes what [`decode_value`] produces; semantic interpretation
//! (rendering a `Timestamp` integer as a date, etc.) belongs to the
//! presentation layer.

use serde_json::{Map, Value as JsonValue};

use crate::error::{MeridianLinkError, RowShapeError};
use crate::models::algebraic_type::Typespace;
use crate::models::column::ColumnDescriptor;
use crate::models::schema::QueryResult;
use crate::resolver::columns_from_product;

/// A decoded row: column name to decoded value, in schema order.
pub type DecodedRow = Map<String, JsonValue>;

/// A fully decoded result set: resolved columns plus decoded rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedResult {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<DecodedRow>,
}

fn is_scalar(value: &JsonValue) -> bool {
    matches!(
        value,
        JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::String(_)
    )
}

/// Decode one wire value, independent of any declared column type.
///
/// Nulls and scalars pass through verbatim; a single-element array
/// wrapping a scalar unwraps to that scalar; other arrays and objects
/// decode element-wise, preserving order and keys.
pub fn decode_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::String(_) => {
            value.clone()
        }
        JsonValue::Array(items) => {
            if items.len() == 1 && is_scalar(&items[0]) {
                items[0].clone()
            } else {
                JsonValue::Array(items.iter().map(decode_value).collect())
            }
        }
        JsonValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(key, inner)| (key.clone(), decode_value(inner)))
                .collect(),
        ),
    }
}

/// Decode one positional wire row against its column list.
///
/// Column identity is purely positional, so the lengths must match
/// exactly; a mismatch in either direction is a [`RowShapeError`] rather
/// than silent truncation or padding. Whether a bad row aborts the whole
/// result set or just gets skipped is the caller's call.
pub fn decode_row(
    columns: &[ColumnDescriptor],
    raw_row: &[JsonValue],
) -> Result<DecodedRow, RowShapeError> {
    if raw_row.len() != columns.len() {
        return Err(RowShapeError {
            expected: columns.len(),
            actual: raw_row.len(),
        });
    }
    let mut decoded = DecodedRow::new();
    for (column, value) in columns.iter().zip(raw_row) {
        decoded.insert(column.name.clone(), decode_value(value));
    }
    Ok(decoded)
}

/// Decode a whole result set, aborting on the first malformed row.
pub fn decode_rows(
    columns: &[ColumnDescriptor],
    raw_rows: &[Vec<JsonValue>],
) -> Result<Vec<DecodedRow>, RowShapeError> {
    let mut rows = Vec::with_capacity(raw_rows.len());
    for raw_row in raw_rows {
        rows.push(decode_row(columns, raw_row)?);
    }
    Ok(rows)
}

/// Resolve a query result's schema fragment and decode its rows.
///
/// The fragment's product type may carry `Ref` indirections into the
/// supplied typespace (pass [`Typespace::empty`] for ref-free fragments).
pub fn decode_query_result(
    result: &QueryResult,
    typespace: &Typespace,
) -> Result<DecodedResult, MeridianLinkError> {
    let columns = columns_from_product(&result.schema, typespace)?;
    let rows = decode_rows(&columns, &result.rows)?;
    Ok(DecodedResult { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::column::ColumnType;
    use serde_json::json;

    #[test]
    fn test_scalars_pass_through_verbatim() {
        for value in [json!(null), json!(true), json!(42), json!(1.5), json!("hi")] {
            assert_eq!(decode_value(&value), value);
        }
    }

    #[test]
    fn test_decode_is_idempotent_on_scalars() {
        for value in [json!(7), json!("x"), json!(false)] {
            let once = decode_value(&value);
            assert_eq!(decode_value(&once), once);
        }
    }

    #[test]
    fn test_single_element_scalar_array_unwraps() {
        assert_eq!(decode_value(&json!([42])), json!(42));
        assert_eq!(decode_value(&json!(["identity-bytes"])), json!("identity-bytes"));
        assert_eq!(decode_value(&json!([true])), json!(true));
    }

    #[test]
    fn test_multi_element_array_is_preserved() {
        assert_eq!(decode_value(&json!([1, 2, 3])), json!([1, 2, 3]));
        assert_eq!(decode_value(&json!([])), json!([]));
    }

    #[test]
    fn test_single_element_composite_array_decodes_elementwise() {
        // The unwrap rule only applies to scalar payloads; a nested
        // wrapper decodes recursively instead.
        assert_eq!(decode_value(&json!([[7]])), json!([7]));
        assert_eq!(decode_value(&json!([null])), json!([null]));
    }

    #[test]
    fn test_objects_decode_values_and_preserve_keys() {
        let value = json!({ "wrapped": [9], "plain": "x" });
        assert_eq!(
            decode_value(&value),
            json!({ "wrapped": 9, "plain": "x" })
        );
    }

    #[test]
    fn test_decode_row_zips_positionally() {
        let columns = vec![
            ColumnDescriptor::new("id", ColumnType::U32),
            ColumnDescriptor::new("joined", ColumnType::Timestamp),
        ];
        let row = decode_row(&columns, &[json!(7), json!([1_700_000_000_000_000_i64])]).unwrap();
        assert_eq!(row.get("id"), Some(&json!(7)));
        assert_eq!(row.get("joined"), Some(&json!(1_700_000_000_000_000_i64)));
    }

    #[test]
    fn test_decode_row_rejects_mismatch_in_both_directions() {
        let columns = vec![ColumnDescriptor::new("id", ColumnType::U32)];

        let too_many = decode_row(&columns, &[json!(1), json!(2)]).unwrap_err();
        assert_eq!(
            too_many,
            RowShapeError {
                expected: 1,
                actual: 2
            }
        );

        let too_few = decode_row(&columns, &[]).unwrap_err();
        assert_eq!(
            too_few,
            RowShapeError {
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn test_decode_rows_aborts_on_first_bad_row() {
        let columns = vec![ColumnDescriptor::new("id", ColumnType::U32)];
        let raw = vec![vec![json!(1)], vec![json!(2), json!(3)], vec![json!(4)]];
        assert!(decode_rows(&columns, &raw).is_err());
    }

    #[test]
    fn test_decode_query_result_end_to_end() {
        let result: QueryResult = serde_json::from_value(json!({
            "schema": { "Product": { "elements": [
                { "name": { "some": "id" }, "algebraic_type": "U32" },
                { "name": { "some": "joined" }, "algebraic_type": { "Product": { "elements": [
                    { "name": { "some": "__timestamp_micros_since_unix_epoch__" },
                      "algebraic_type": "I64" }
                ] } } }
            ] } },
            "rows": [[7, [1_700_000_000_000_000_i64]]]
        }))
        .unwrap();

        let decoded = decode_query_result(&result, &Typespace::empty()).unwrap();
        assert_eq!(
            decoded.columns,
            vec![
                ColumnDescriptor::new("id", ColumnType::U32),
                ColumnDescriptor::new("joined", ColumnType::Timestamp),
            ]
        );
        assert_eq!(decoded.rows.len(), 1);
        assert_eq!(decoded.rows[0].get("id"), Some(&json!(7)));
        assert_eq!(
            decoded.rows[0].get("joined"),
            Some(&json!(1_700_000_000_000_000_i64))
        );
    }
}
