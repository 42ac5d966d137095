//! Client tests against the mock driver.

use cass_connector::db::{NativeColumn, NativeType, ResultSet};
use cass_connector::{
    BindingOptions, CassError, CassandraClient, ClientOptions, ConnectionConfig, MockDriver,
    Parameter, RecordShape, Value,
};
use scylla::value::CqlValue;

fn person_row() -> ResultSet {
    ResultSet::new(
        vec![
            NativeColumn::new("id", NativeType::Int, "person"),
            NativeColumn::new("name", NativeType::Text, "person"),
            NativeColumn::new("salary", NativeType::Float, "person"),
            NativeColumn::new("married", NativeType::Boolean, "person"),
        ],
        vec![vec![
            Some(CqlValue::Int(1)),
            Some(CqlValue::Text("Jack".to_string())),
            Some(CqlValue::Float(100.2)),
            Some(CqlValue::Boolean(true)),
        ]],
    )
}

#[tokio::test]
async fn test_insert_then_select_round_trip() {
    let driver = MockDriver::new().with_result(ResultSet::empty());
    driver.push_result(person_row());
    let client = CassandraClient::new(driver, BindingOptions::default());

    client
        .update(
            "INSERT INTO person (id, name, salary, married) VALUES (?, ?, ?, ?)",
            &[
                Parameter::new("INT", 1i64).into(),
                Parameter::new("TEXT", "Jack").into(),
                Parameter::new("FLOAT", 100.2).into(),
                Parameter::new("BOOLEAN", true).into(),
            ],
        )
        .await
        .unwrap();

    let shape = RecordShape::new(["id", "name", "salary", "married"]);
    let mut cursor = client
        .select(
            "SELECT id, name, salary, married FROM person WHERE id = ?",
            &[Parameter::new("INT", 1i64).into()],
            &shape,
        )
        .await
        .unwrap();

    let record = cursor.records().next().unwrap().unwrap();
    assert_eq!(record.get("id"), Some(&Value::Int(1)));
    assert_eq!(record.get("name"), Some(&Value::from("Jack")));
    match record.get("salary") {
        Some(Value::Float(salary)) => assert!((salary - 100.2).abs() < 1e-4),
        other => panic!("Expected Float for salary, got {:?}", other),
    }
    assert_eq!(record.get("married"), Some(&Value::Bool(true)));
    assert!(cursor.records().next().is_none());

    let executions = client.driver().executions();
    assert_eq!(executions.len(), 2);
    assert_eq!(
        executions[0].1,
        vec![
            Some(CqlValue::Int(1)),
            Some(CqlValue::Text("Jack".to_string())),
            Some(CqlValue::Float(100.2)),
            Some(CqlValue::Boolean(true)),
        ]
    );
}

#[tokio::test]
async fn test_select_with_in_clause() {
    let client = CassandraClient::new(MockDriver::new(), BindingOptions::default());

    let mut cursor = client
        .select(
            "SELECT * FROM person WHERE id IN (?) AND married = ?",
            &[
                Parameter::new("INT", vec![1i64, 2, 3]).into(),
                Value::Bool(false).into(),
            ],
            &RecordShape::default(),
        )
        .await
        .unwrap();
    assert!(!cursor.next());

    assert_eq!(
        client.driver().prepared_queries(),
        vec!["SELECT * FROM person WHERE id IN (?,?,?) AND married = ?".to_string()]
    );
}

#[tokio::test]
async fn test_prepare_failure_is_wrapped_for_select() {
    let client = CassandraClient::new(
        MockDriver::new().failing_prepare("line 1:0 no viable alternative at input 'SELEC'"),
        BindingOptions::default(),
    );

    let err = client
        .select("SELEC * FROM person", &[], &RecordShape::default())
        .await
        .unwrap_err();
    assert_eq!(err.category(), "Operation Failed");
    assert!(err
        .to_string()
        .starts_with("Error occurred while executing the select statement"));
}

#[tokio::test]
async fn test_unknown_policy_fails_before_connecting() {
    let config = ConnectionConfig {
        contact_points: Some("127.0.0.1".to_string()),
        port: 9042,
        options: ClientOptions {
            load_balancing_policy: Some("NotARealPolicy".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let result =
        CassandraClient::<MockDriver>::connect(&config, BindingOptions::default()).await;
    match result {
        Err(CassError::InvalidPolicyName { kind, name }) => {
            assert_eq!(kind, "load balancing");
            assert_eq!(name, "NotARealPolicy");
        }
        Err(other) => panic!("Expected InvalidPolicyName, got {:?}", other),
        Ok(_) => panic!("Expected InvalidPolicyName, got a connection"),
    }
}

#[tokio::test]
async fn test_unsupported_policy_fails_before_connecting() {
    let config = ConnectionConfig {
        contact_points: Some("127.0.0.1".to_string()),
        options: ClientOptions {
            load_balancing_policy: Some("ErrorAwarePolicy".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let result =
        CassandraClient::<MockDriver>::connect(&config, BindingOptions::default()).await;
    assert!(matches!(result, Err(CassError::UnsupportedPolicy { .. })));
}
