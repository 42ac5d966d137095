//! Result materialization tests.

use cass_connector::db::{NativeColumn, NativeType, ResultSet};
use cass_connector::query::{RowCursor, TypeTag};
use cass_connector::{CassError, Record, RecordShape, Value};
use pretty_assertions::assert_eq;
use scylla::value::CqlValue;

fn joined_result() -> ResultSet {
    ResultSet::new(
        vec![
            NativeColumn::new("id", NativeType::Int, "a"),
            NativeColumn::new("name", NativeType::Varchar, "a"),
            NativeColumn::new("id", NativeType::BigInt, "b"),
            NativeColumn::new("score", NativeType::Double, "b"),
        ],
        vec![
            vec![
                Some(CqlValue::Int(1)),
                Some(CqlValue::Text("Jack".to_string())),
                Some(CqlValue::BigInt(10)),
                Some(CqlValue::Double(0.5)),
            ],
            vec![
                Some(CqlValue::Int(2)),
                Some(CqlValue::Text("Jill".to_string())),
                Some(CqlValue::BigInt(20)),
                None,
            ],
        ],
    )
}

#[test]
fn test_collision_schema() {
    let cursor = RowCursor::new(joined_result());
    let names: Vec<&str> = cursor
        .column_definitions()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["id", "name", "B.id", "score"]);

    let tags: Vec<TypeTag> = cursor
        .column_definitions()
        .iter()
        .map(|c| c.type_tag)
        .collect();
    assert_eq!(
        tags,
        vec![TypeTag::Int, TypeTag::String, TypeTag::Int, TypeTag::Float]
    );
}

#[test]
fn test_cursor_discipline() {
    let mut cursor = RowCursor::new(joined_result());
    assert!(matches!(cursor.get_int(1), Err(CassError::InvalidCursorPosition)));

    assert!(cursor.next());
    assert_eq!(cursor.get_int(3).unwrap(), Some(10));
    assert!(cursor.next());
    assert_eq!(cursor.get_float(4).unwrap(), None);
    assert!(!cursor.next());

    assert!(matches!(cursor.get_int(1), Err(CassError::InvalidCursorPosition)));
    assert!(matches!(
        cursor.generate_next(&RecordShape::new(["a", "b", "c", "d"])),
        Err(CassError::InvalidCursorPosition)
    ));
}

#[test]
fn test_records_follow_column_order() {
    let shape = RecordShape::new(["leftId", "leftName", "rightId", "rightScore"]);
    let mut cursor = RowCursor::with_shape(joined_result(), shape);

    let records: Vec<Record> = cursor
        .records()
        .collect::<cass_connector::Result<_>>()
        .unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].get("rightId"), Some(&Value::Int(10)));
    assert_eq!(records[0].get("rightScore"), Some(&Value::Float(0.5)));
    assert_eq!(records[1].get("leftName"), Some(&Value::from("Jill")));
    assert_eq!(records[1].get("rightScore"), Some(&Value::Null));

    let json = records[0].to_json();
    assert_eq!(json["leftName"], "Jack");
}

#[test]
fn test_decode_failure_stops_iteration() {
    let result = ResultSet::new(
        vec![NativeColumn::new("id", NativeType::Int, "t")],
        vec![
            vec![Some(CqlValue::Text("not an int".to_string()))],
            vec![Some(CqlValue::Int(2))],
        ],
    );
    let mut cursor = RowCursor::new(result);
    let mut records = cursor.records();

    assert!(matches!(
        records.next(),
        Some(Err(CassError::ValueDecode { .. }))
    ));
    assert!(records.next().is_none());
}

#[test]
fn test_unmapped_native_types_read_as_strings() {
    let result = ResultSet::new(
        vec![NativeColumn::new(
            "tags",
            NativeType::Other("list<text>".to_string()),
            "t",
        )],
        vec![vec![Some(CqlValue::List(vec![
            CqlValue::Text("a".to_string()),
            CqlValue::Text("b".to_string()),
        ]))]],
    );
    let mut cursor = RowCursor::new(result);
    assert!(cursor.next());
    assert_eq!(cursor.get_value(1).unwrap(), Value::from("[a, b]"));
}
