//! End-to-end decoding of raw query results.

use meridian_link::{decode, ColumnDescriptor, ColumnType, QueryResult, Typespace};
use serde_json::json;

#[test]
fn test_players_row_decodes_end_to_end() {
    // One table `players` with a u32 id and a built-in timestamp column;
    // the raw row wraps the timestamp micros in the wire's single-element
    // array form.
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

    let decoded = decode::decode_query_result(&result, &Typespace::empty()).unwrap();

    let tags: Vec<&str> = decoded
        .columns
        .iter()
        .map(|c| c.column_type.as_str())
        .collect();
    assert_eq!(tags, vec!["u32", "Timestamp"]);

    assert_eq!(
        serde_json::to_value(&decoded.rows[0]).unwrap(),
        json!({ "id": 7, "joined": 1_700_000_000_000_000_i64 })
    );
}

#[test]
fn test_option_wrappers_and_nested_arrays() {
    let columns = vec![
        ColumnDescriptor::new("nickname", ColumnType::String),
        ColumnDescriptor::new("scores", ColumnType::Struct),
        ColumnDescriptor::new("missing", ColumnType::String),
    ];

    // Engaged option arrives as a one-element wrapper, the score list is
    // a genuine multi-element array, and the absent value is null.
    let raw = vec![json!(["benny"]), json!([10, 20, 30]), json!(null)];
    let row = decode::decode_row(&columns, &raw).unwrap();

    assert_eq!(
        serde_json::to_value(&row).unwrap(),
        json!({ "nickname": "benny", "scores": [10, 20, 30], "missing": null })
    );
}

#[test]
fn test_shape_mismatch_is_rejected_per_row() {
    let columns = vec![
        ColumnDescriptor::new("a", ColumnType::U8),
        ColumnDescriptor::new("b", ColumnType::U8),
    ];

    let err = decode::decode_row(&columns, &[json!(1)]).unwrap_err();
    assert_eq!(err.expected, 2);
    assert_eq!(err.actual, 1);
}

#[test]
fn test_result_with_ref_into_supplied_typespace() {
    let typespace: Typespace = serde_json::from_value(json!([
        { "Product": { "elements": [
            { "name": { "some": "__time_duration_micros__" }, "algebraic_type": "I64" }
        ] } }
    ]))
    .unwrap();

    let result: QueryResult = serde_json::from_value(json!({
        "schema": { "Product": { "elements": [
            { "name": { "some": "uptime" }, "algebraic_type": { "Ref": 0 } }
        ] } },
        "rows": [[[86_400_000_000_i64]]]
    }))
    .unwrap();

    let decoded = decode::decode_query_result(&result, &typespace).unwrap();
    assert_eq!(
        decoded.columns,
        vec![ColumnDescriptor::new("uptime", ColumnType::Duration)]
    );
    assert_eq!(
        serde_json::to_value(&decoded.rows[0]).unwrap(),
        json!({ "uptime": 86_400_000_000_i64 })
    );
}
