//! Scylla driver adapter.
//!
//! Provides `ScyllaDriver`, which implements `CqlDriver` on top of a
//! `scylla` session. Works against Apache Cassandra and ScyllaDB.

use crate::config::{ConnectionConfig, ResolvedOptions};
use crate::db::{BoundStatement, CqlDriver, NativeColumn, NativeType, ResultSet};
use crate::error::{CassError, Result};
use crate::policy::{
    CompressionKind, ConsistencyLevel, LoadBalancingPolicy, RetryPolicy as RetryChoice,
    SerialConsistencyLevel,
};
use async_trait::async_trait;
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::client::{Compression, PoolSize};
use scylla::cluster::metadata::{CollectionType, ColumnType, NativeType as CqlNativeType};
use scylla::errors::NewSessionError;
use scylla::policies::load_balancing::{
    DefaultPolicy, LatencyAwarenessBuilder, LoadBalancingPolicy as ScyllaLoadBalancing,
};
use scylla::policies::retry::{
    DefaultRetryPolicy, DowngradingConsistencyRetryPolicy, FallthroughRetryPolicy, RetryPolicy,
};
use scylla::response::query_result::QueryResult;
use scylla::statement::prepared::PreparedStatement;
use scylla::statement::{Consistency, SerialConsistency};
use scylla::value::{CqlValue, Row};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// CQL session backed by the scylla driver.
///
/// The session is dropped on `close`; later calls fail with a connection
/// error.
pub struct ScyllaDriver {
    session: RwLock<Option<Session>>,
    default_idempotence: bool,
}

impl ScyllaDriver {
    /// Wraps an existing session.
    pub fn from_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
            default_idempotence: false,
        }
    }

    /// Returns true once `close` has released the session.
    pub async fn is_closed(&self) -> bool {
        self.session.read().await.is_none()
    }
}

fn session_closed() -> CassError {
    CassError::connection("session is closed")
}

#[async_trait]
impl CqlDriver for ScyllaDriver {
    type Prepared = PreparedStatement;

    async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options = config.options.resolve()?;
        let nodes = config.known_nodes()?;

        let mut builder = SessionBuilder::new()
            .known_nodes(&nodes)
            .default_execution_profile_handle(execution_profile(&options).into_handle());

        if let Some(username) = &config.username {
            builder = builder.user(username, config.password.as_deref().unwrap_or_default());
        }
        if let Some(keyspace) = &config.keyspace {
            builder = builder.use_keyspace(keyspace, false);
        }
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connection_timeout(timeout);
        }
        if let Some(per_host) = options.connections_per_host {
            builder = builder.pool_size(PoolSize::PerHost(per_host));
        }
        if let Some(nodelay) = options.tcp_nodelay {
            builder = builder.tcp_nodelay(nodelay);
        }
        if let Some(interval) = options.keepalive {
            builder = builder.tcp_keepalive_interval(interval);
        }
        if let Some(timeout) = options.schema_agreement_timeout {
            builder = builder.schema_agreement_timeout(timeout);
        }
        builder = builder.compression(match options.compression {
            Some(CompressionKind::Lz4) => Some(Compression::Lz4),
            Some(CompressionKind::Snappy) => Some(Compression::Snappy),
            Some(CompressionKind::None) | None => None,
        });
        if let Some(schedule) = options.reconnection {
            // The driver reconnects on its own schedule
            debug!("Reconnection policy {} accepted", schedule.policy());
        }

        info!(
            "Connecting to {}{}",
            config.display_string(),
            options
                .cluster_name
                .as_deref()
                .map(|name| format!(" (cluster {name})"))
                .unwrap_or_default()
        );

        let session = builder
            .build()
            .await
            .map_err(|e| map_connection_error(e, config))?;

        debug!("Successfully connected to cluster");
        Ok(Self {
            session: RwLock::new(Some(session)),
            default_idempotence: options.default_idempotence,
        })
    }

    async fn prepare(&self, cql: &str) -> Result<PreparedStatement> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or_else(session_closed)?;

        let mut prepared = session
            .prepare(cql)
            .await
            .map_err(|e| CassError::query(e.to_string()))?;
        prepared.set_is_idempotent(self.default_idempotence);
        Ok(prepared)
    }

    async fn execute(&self, statement: &BoundStatement<PreparedStatement>) -> Result<ResultSet> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or_else(session_closed)?;

        let types: Vec<ColumnType<'_>> = statement
            .prepared
            .get_variable_col_specs()
            .iter()
            .map(|spec| spec.typ().clone())
            .collect();
        let values = fit_to_bind_types(&statement.values, &types)?;

        let result = session
            .execute_unpaged(&statement.prepared, &values)
            .await
            .map_err(|e| CassError::query(e.to_string()))?;

        into_result_set(result)
    }

    async fn close(&self) -> Result<()> {
        // Dropping the session shuts down its connection pools
        if self.session.write().await.take().is_some() {
            debug!("Session closed");
        }
        Ok(())
    }
}

/// Narrows collection elements to the element type declared at each bind
/// site.
///
/// The binder passes LIST elements through at their widest native type
/// (bigint, double, text). Integer elements bound to `list<int>`,
/// `list<smallint>` or `list<tinyint>` are range-checked and narrowed, doubles
/// become floats for `list<float>`, and text becomes ascii for `list<ascii>`.
/// A list bound to a `set<..>` column is sent as a set.
fn fit_to_bind_types(
    values: &[Option<CqlValue>],
    types: &[ColumnType<'_>],
) -> Result<Vec<Option<CqlValue>>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| match (value, types.get(index)) {
            (Some(CqlValue::List(items)), Some(ColumnType::Collection { typ, .. })) => {
                let (element, as_set) = match typ {
                    CollectionType::List(element) => (element.as_ref(), false),
                    CollectionType::Set(element) => (element.as_ref(), true),
                    _ => return Ok(value.clone()),
                };
                let items = items
                    .iter()
                    .map(|item| fit_element(index, item, element))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(if as_set {
                    CqlValue::Set(items)
                } else {
                    CqlValue::List(items)
                }))
            }
            _ => Ok(value.clone()),
        })
        .collect()
}

fn fit_element(index: usize, item: &CqlValue, element: &ColumnType<'_>) -> Result<CqlValue> {
    let ColumnType::Native(native) = element else {
        return Ok(item.clone());
    };
    let fail = || {
        CassError::coercion(
            index,
            format!("LIST<{:?}>", native).to_uppercase(),
            format!("{:?}", item),
        )
    };

    let fitted = match (item, native) {
        (CqlValue::BigInt(i), CqlNativeType::Int) => {
            CqlValue::Int(i32::try_from(*i).map_err(|_| fail())?)
        }
        (CqlValue::BigInt(i), CqlNativeType::SmallInt) => {
            CqlValue::SmallInt(i16::try_from(*i).map_err(|_| fail())?)
        }
        (CqlValue::BigInt(i), CqlNativeType::TinyInt) => {
            CqlValue::TinyInt(i8::try_from(*i).map_err(|_| fail())?)
        }
        (CqlValue::Double(d), CqlNativeType::Float) => {
            let narrowed = *d as f32;
            if d.is_finite() && !narrowed.is_finite() {
                return Err(fail());
            }
            CqlValue::Float(narrowed)
        }
        (CqlValue::Text(s), CqlNativeType::Ascii) if s.is_ascii() => CqlValue::Ascii(s.clone()),
        (CqlValue::Text(_), CqlNativeType::Ascii) => return Err(fail()),
        (other, _) => other.clone(),
    };

    Ok(fitted)
}

fn execution_profile(options: &ResolvedOptions) -> ExecutionProfile {
    let mut profile = ExecutionProfile::builder();

    if let Some(level) = options.consistency {
        profile = profile.consistency(consistency(level));
    }
    if let Some(level) = options.serial_consistency {
        profile = profile.serial_consistency(Some(serial_consistency(level)));
    }
    if let Some(timeout) = options.request_timeout {
        profile = profile.request_timeout(Some(timeout));
    }
    if let Some(policy) = options.load_balancing {
        profile = profile.load_balancing_policy(load_balancing(policy, options));
    }
    if let Some(policy) = options.retry {
        if policy.is_logging() {
            debug!("{} defers to {}", policy, policy.inner());
        }
        profile = profile.retry_policy(retry(policy));
    }

    profile.build()
}

fn load_balancing(
    policy: LoadBalancingPolicy,
    options: &ResolvedOptions,
) -> Arc<dyn ScyllaLoadBalancing> {
    let mut builder = DefaultPolicy::builder().token_aware(false);

    if let Some(dc) = &options.data_center {
        builder = builder
            .prefer_datacenter(dc.clone())
            .permit_dc_failover(options.allow_remote_dcs);
    }

    builder = match policy {
        LoadBalancingPolicy::TokenAware => builder.token_aware(true),
        LoadBalancingPolicy::LatencyAware => {
            builder.latency_awareness(LatencyAwarenessBuilder::new())
        }
        LoadBalancingPolicy::DcAwareRoundRobin
        | LoadBalancingPolicy::RoundRobin
        | LoadBalancingPolicy::HostFilter
        | LoadBalancingPolicy::ErrorAware => builder,
    };

    builder.build()
}

fn retry(policy: RetryChoice) -> Arc<dyn RetryPolicy> {
    match policy.inner() {
        RetryChoice::DowngradingConsistency => Arc::new(DowngradingConsistencyRetryPolicy::new()),
        RetryChoice::Fallthrough => Arc::new(FallthroughRetryPolicy::new()),
        _ => Arc::new(DefaultRetryPolicy::new()),
    }
}

fn consistency(level: ConsistencyLevel) -> Consistency {
    match level {
        ConsistencyLevel::Any => Consistency::Any,
        ConsistencyLevel::One => Consistency::One,
        ConsistencyLevel::Two => Consistency::Two,
        ConsistencyLevel::Three => Consistency::Three,
        ConsistencyLevel::Quorum => Consistency::Quorum,
        ConsistencyLevel::All => Consistency::All,
        ConsistencyLevel::LocalQuorum => Consistency::LocalQuorum,
        ConsistencyLevel::EachQuorum => Consistency::EachQuorum,
        ConsistencyLevel::Serial => Consistency::Serial,
        ConsistencyLevel::LocalSerial => Consistency::LocalSerial,
        ConsistencyLevel::LocalOne => Consistency::LocalOne,
    }
}

fn serial_consistency(level: SerialConsistencyLevel) -> SerialConsistency {
    match level {
        SerialConsistencyLevel::Serial => SerialConsistency::Serial,
        SerialConsistencyLevel::LocalSerial => SerialConsistency::LocalSerial,
    }
}

/// Converts a driver response into column metadata plus native rows.
///
/// Responses without rows (writes, schema changes) become an empty result.
fn into_result_set(result: QueryResult) -> Result<ResultSet> {
    if !result.is_rows() {
        return Ok(ResultSet::empty());
    }

    let rows_result = result
        .into_rows_result()
        .map_err(|e| CassError::query(e.to_string()))?;

    let columns = rows_result
        .column_specs()
        .iter()
        .map(|spec| {
            NativeColumn::new(
                spec.name(),
                native_type(spec.typ()),
                spec.table_spec().table_name(),
            )
        })
        .collect();

    let rows = rows_result
        .rows::<Row>()
        .map_err(|e| CassError::query(e.to_string()))?
        .map(|row| {
            row.map(|r| r.columns)
                .map_err(|e| CassError::query(e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ResultSet::new(columns, rows))
}

/// Maps a driver column type onto the connector's native type set.
fn native_type(typ: &ColumnType<'_>) -> NativeType {
    match typ {
        ColumnType::Native(native) => match native {
            CqlNativeType::Ascii => NativeType::Ascii,
            CqlNativeType::Text => NativeType::Text,
            CqlNativeType::Uuid => NativeType::Uuid,
            CqlNativeType::BigInt => NativeType::BigInt,
            CqlNativeType::Int => NativeType::Int,
            CqlNativeType::Counter => NativeType::Counter,
            CqlNativeType::Date => NativeType::Date,
            CqlNativeType::SmallInt => NativeType::SmallInt,
            CqlNativeType::Time => NativeType::Time,
            CqlNativeType::Timestamp => NativeType::Timestamp,
            CqlNativeType::TinyInt => NativeType::TinyInt,
            CqlNativeType::Varint => NativeType::Varint,
            CqlNativeType::Decimal => NativeType::Decimal,
            CqlNativeType::Double => NativeType::Double,
            CqlNativeType::Float => NativeType::Float,
            CqlNativeType::Boolean => NativeType::Boolean,
            CqlNativeType::Blob => NativeType::Blob,
            other => NativeType::Other(format!("{:?}", other).to_lowercase()),
        },
        other => NativeType::Other(format!("{:?}", other)),
    }
}

/// Maps session errors to user-friendly messages.
fn map_connection_error(error: NewSessionError, config: &ConnectionConfig) -> CassError {
    let hosts = config.contact_points.as_deref().unwrap_or("localhost");
    let user = config.username.as_deref().unwrap_or("unknown");
    let keyspace = config.keyspace.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        CassError::connection(format!(
            "Cannot connect to {hosts}:{}. Check that the cluster is running.",
            config.port
        ))
    } else if error_str.contains("authentication") || error_str.contains("bad credentials") {
        CassError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("keyspace") {
        CassError::connection(format!("Keyspace '{keyspace}' is not available: {error}"))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        CassError::connection(format!(
            "Connection to {hosts}:{} timed out. The cluster may be overloaded or unreachable.",
            config.port
        ))
    } else {
        CassError::connection(error.to_string())
    }
}
