//! Tests against a running cluster.
//!
//! Set CASSANDRA_CONTACT_POINTS (and optionally CASSANDRA_PORT,
//! CASSANDRA_USERNAME, CASSANDRA_PASSWORD) to run them.

use cass_connector::{
    BindingOptions, CassError, ConnectionConfig, Parameter, RecordShape, ScyllaClient, Value,
};

const KEYSPACE: &str = "cass_connector_test";

/// Helper to create a test client, or None when no cluster is configured.
async fn get_test_client() -> Option<ScyllaClient> {
    std::env::var("CASSANDRA_CONTACT_POINTS").ok()?;

    let mut config = ConnectionConfig {
        port: 9042,
        ..Default::default()
    };
    config.apply_env_defaults();
    config.keyspace = None;

    ScyllaClient::connect(&config, BindingOptions::default())
        .await
        .ok()
}

async fn setup_schema(client: &ScyllaClient) {
    client
        .update(
            &format!(
                "CREATE KEYSPACE IF NOT EXISTS {KEYSPACE} WITH replication = \
                 {{'class': 'SimpleStrategy', 'replication_factor': 1}}"
            ),
            &[],
        )
        .await
        .unwrap();
    client
        .update(
            &format!(
                "CREATE TABLE IF NOT EXISTS {KEYSPACE}.person \
                 (id int PRIMARY KEY, name text, salary float, married boolean)"
            ),
            &[],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_live_round_trip() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: CASSANDRA_CONTACT_POINTS not set");
        return;
    };
    setup_schema(&client).await;

    client
        .update(
            &format!("INSERT INTO {KEYSPACE}.person (id, name, salary, married) VALUES (?, ?, ?, ?)"),
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
            &format!("SELECT id, name, salary, married FROM {KEYSPACE}.person WHERE id IN (?)"),
            &[Parameter::new("INT", vec![1i64]).into()],
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

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_live_syntax_error_is_wrapped() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: CASSANDRA_CONTACT_POINTS not set");
        return;
    };

    let err = client
        .select("SELEC * FROM system.local", &[], &RecordShape::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CassError::OperationFailed { operation: "select", .. }));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_live_calls_fail_after_close() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: CASSANDRA_CONTACT_POINTS not set");
        return;
    };

    client.close().await.unwrap();
    assert!(client.driver().is_closed().await);

    let err = client
        .select("SELECT release_version FROM system.local", &[], &RecordShape::default())
        .await
        .unwrap_err();
    match err {
        CassError::OperationFailed { operation, source } => {
            assert_eq!(operation, "select");
            assert!(matches!(*source, CassError::Connection(_)));
        }
        other => panic!("Expected OperationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_live_int_list_column() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: CASSANDRA_CONTACT_POINTS not set");
        return;
    };
    setup_schema(&client).await;
    client
        .update(
            &format!("CREATE TABLE IF NOT EXISTS {KEYSPACE}.scores (id int PRIMARY KEY, points list<int>)"),
            &[],
        )
        .await
        .unwrap();

    client
        .update(
            &format!("INSERT INTO {KEYSPACE}.scores (id, points) VALUES (?, ?)"),
            &[
                Parameter::new("INT", 1i64).into(),
                Parameter::new("LIST", vec![3i64, 5]).into(),
            ],
        )
        .await
        .unwrap();

    let mut cursor = client
        .select(
            &format!("SELECT points FROM {KEYSPACE}.scores WHERE id = ?"),
            &[Parameter::new("INT", 1i64).into()],
            &RecordShape::new(["points"]),
        )
        .await
        .unwrap();
    assert!(cursor.next());
    assert_eq!(cursor.get_value(1).unwrap(), Value::from("[3, 5]"));

    client.close().await.unwrap();
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_with_unreachable_host() {
    let config = ConnectionConfig {
        contact_points: Some("127.0.0.1".to_string()),
        port: 1,
        ..Default::default()
    };

    let result = ScyllaClient::connect(&config, BindingOptions::default()).await;
    match result {
        Err(err) => assert!(matches!(err, CassError::Connection(_)), "{err}"),
        Ok(_) => panic!("Expected a connection error"),
    }
}
