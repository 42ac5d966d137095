//! cass-connector: parameter binding and typed row materialization for
//! Cassandra queries.
//!
//! The crate rewrites CQL for array parameters, binds dynamically typed
//! values to prepared statements, and decodes result rows into ordered
//! records through a forward-only cursor.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod policy;
pub mod query;

pub use client::{CassandraClient, ScyllaClient};
pub use config::{BindingOptions, ClientOptions, Config, ConnectionConfig};
pub use db::{CqlDriver, MockDriver, Record, RecordShape, Value};
pub use error::{CassError, Result};
pub use query::{Argument, Parameter, QueryBinder, RowCursor};
