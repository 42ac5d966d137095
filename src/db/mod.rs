//! Driver abstraction layer.
//!
//! The binder and the cursor never talk to a cluster directly. They go
//! through `CqlDriver`, which the scylla adapter implements for real
//! clusters and `MockDriver` implements for tests.

mod mock;
mod scylla;
mod types;

pub use self::scylla::ScyllaDriver;
pub use mock::MockDriver;
pub use types::{
    NativeColumn, NativeRow, NativeType, Record, RecordShape, ResultSet, Value, ValueTag,
};

use crate::config::ConnectionConfig;
use crate::error::Result;
use ::scylla::value::CqlValue;
use async_trait::async_trait;

/// A prepared statement with its positional values attached.
#[derive(Debug, Clone)]
pub struct BoundStatement<P> {
    pub prepared: P,
    pub values: Vec<Option<CqlValue>>,
}

impl<P> BoundStatement<P> {
    pub fn new(prepared: P, values: Vec<Option<CqlValue>>) -> Self {
        Self { prepared, values }
    }
}

/// Interface to a CQL session.
///
/// All operations are async and return driver failures as
/// `CassError::Connection` or `CassError::Query`.
#[async_trait]
pub trait CqlDriver: Send + Sync {
    /// Driver-side handle of a prepared statement.
    type Prepared: Send + Sync;

    /// Opens a session using an already validated configuration.
    async fn connect(config: &ConnectionConfig) -> Result<Self>
    where
        Self: Sized;

    /// Prepares a statement on the cluster.
    async fn prepare(&self, cql: &str) -> Result<Self::Prepared>;

    /// Executes a bound statement and returns its rows, if any.
    async fn execute(&self, statement: &BoundStatement<Self::Prepared>) -> Result<ResultSet>;

    /// Closes the session.
    async fn close(&self) -> Result<()>;
}
