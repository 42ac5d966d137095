//! Query rewriting and binding tests.

use cass_connector::config::BindingOptions;
use cass_connector::query::{count_placeholders, uniform_parameters, Argument, Parameter, QueryBinder};
use cass_connector::{CassError, Value};
use pretty_assertions::assert_eq;
use scylla::value::CqlValue;

#[test]
fn test_scalar_parameters_bind_one_value_per_placeholder() {
    let query = "SELECT * FROM person WHERE id = ? AND name = ? AND married = ?";
    let params = vec![
        Parameter::new("INT", 1i64),
        Parameter::new("TEXT", "Jack"),
        Parameter::new("BOOLEAN", true),
    ];

    let binder = QueryBinder::default();
    let rewritten = binder.expand_placeholders(query, &params).unwrap();
    let values = binder.bind_values(&params).unwrap();

    assert_eq!(rewritten, query);
    assert_eq!(values.len(), count_placeholders(query));
}

#[test]
fn test_expanded_query_has_one_placeholder_per_value() {
    let query = "SELECT * FROM person WHERE id IN (?) AND name IN (?) AND note = '?'";
    let params = vec![
        Parameter::new("BIGINT", vec![1i64, 2, 3, 4]),
        Parameter::new("TEXT", vec!["a", "b"]),
    ];

    let binder = QueryBinder::default();
    let rewritten = binder.expand_placeholders(query, &params).unwrap();
    let values = binder.bind_values(&params).unwrap();

    assert_eq!(
        rewritten,
        "SELECT * FROM person WHERE id IN (?,?,?,?) AND name IN (?,?) AND note = '?'"
    );
    assert_eq!(count_placeholders(&rewritten), values.len());
    assert_eq!(values[3], Some(CqlValue::BigInt(4)));
    assert_eq!(values[5], Some(CqlValue::Text("b".to_string())));
}

#[test]
fn test_double_quoted_identifier_marks_are_not_placeholders() {
    let query = r#"SELECT "why?" FROM t WHERE id IN (?)"#;
    let params = vec![Parameter::new("INT", vec![7i64, 8])];

    let rewritten = QueryBinder::default()
        .expand_placeholders(query, &params)
        .unwrap();
    assert_eq!(rewritten, r#"SELECT "why?" FROM t WHERE id IN (?,?)"#);
}

#[test]
fn test_list_and_expanded_array_in_one_statement() {
    let query = "UPDATE person SET tags = ? WHERE id IN (?)";
    let params = vec![
        Parameter::new("LIST", vec!["x", "y"]),
        Parameter::new("INT", vec![1i64, 2]),
    ];

    let binder = QueryBinder::default();
    assert_eq!(
        binder.expand_placeholders(query, &params).unwrap(),
        "UPDATE person SET tags = ? WHERE id IN (?,?)"
    );
    assert_eq!(binder.bind_values(&params).unwrap().len(), 3);
}

#[test]
fn test_coercion_failure_references_parameter_index() {
    let params = vec![
        Parameter::new("TEXT", "Jack"),
        Parameter::new("DOUBLE", 1.5),
        Parameter::new("INT", "notanumber"),
    ];

    let err = QueryBinder::default().bind_values(&params).unwrap_err();
    assert!(matches!(err, CassError::ParameterCoercion { index: 2, .. }));
    assert!(err.to_string().contains("index 2"));
}

#[test]
fn test_lenient_mode_keeps_legacy_behaviour() {
    let binder = QueryBinder::new(BindingOptions {
        strict_cql_types: false,
        strict_placeholders: false,
    });

    let query = "SELECT * FROM t WHERE a = ?";
    let params = vec![
        Parameter::new("INT", 1i64),
        Parameter::new("INT", vec![2i64, 3]),
        Parameter::new("UUID", "x"),
    ];

    assert_eq!(binder.expand_placeholders(query, &params).unwrap(), query);
    assert_eq!(
        binder.bind_values(&params).unwrap(),
        vec![
            Some(CqlValue::Int(1)),
            Some(CqlValue::Int(2)),
            Some(CqlValue::Int(3)),
        ]
    );
}

#[test]
fn test_strict_mode_rejects_missing_placeholders() {
    let err = QueryBinder::default()
        .expand_placeholders(
            "SELECT * FROM t",
            &[Parameter::new("INT", vec![1i64, 2])],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        CassError::PlaceholderMismatch {
            placeholders: 0,
            parameters: 1
        }
    ));
}

#[test]
fn test_plain_values_get_inferred_types() {
    let args: Vec<Argument> = vec![
        Value::Int(1).into(),
        Value::from("Jack").into(),
        Value::Float(100.2).into(),
        Value::Bool(true).into(),
    ];

    let params = uniform_parameters(&args).unwrap();
    let types: Vec<&str> = params.iter().map(|p| p.cql_type.as_str()).collect();
    assert_eq!(types, vec!["INT", "TEXT", "FLOAT", "BOOLEAN"]);

    let err = uniform_parameters(&[Value::Null.into()]).unwrap_err();
    assert!(matches!(err, CassError::UnsupportedParameterType { index: 0, .. }));
}
