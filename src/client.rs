//! Cassandra client: select, update and close over a `CqlDriver`.
//!
//! Each call rewrites the query for array parameters, prepares it, binds the
//! flattened values and executes it. Calls are awaited one after another and
//! never retried here; retries belong to the driver's retry policy.

use crate::config::{BindingOptions, ConnectionConfig};
use crate::db::{CqlDriver, RecordShape, ResultSet, ScyllaDriver};
use crate::error::Result;
use crate::query::{uniform_parameters, Argument, QueryBinder, RowCursor};
use tracing::{debug, info};

/// Client over the scylla driver.
pub type ScyllaClient = CassandraClient<ScyllaDriver>;

/// A connected client.
pub struct CassandraClient<D: CqlDriver> {
    driver: D,
    binder: QueryBinder,
}

impl<D: CqlDriver> CassandraClient<D> {
    /// Wraps an already connected driver.
    pub fn new(driver: D, binding: BindingOptions) -> Self {
        Self {
            driver,
            binder: QueryBinder::new(binding),
        }
    }

    /// Validates the configured policies, then opens a session.
    ///
    /// An unknown policy name fails here, before any connection attempt.
    pub async fn connect(config: &ConnectionConfig, binding: BindingOptions) -> Result<Self> {
        config.options.resolve()?;
        let driver = D::connect(config).await?;
        info!("Connected to {}", config.display_string());
        Ok(Self::new(driver, binding))
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn binder(&self) -> &QueryBinder {
        &self.binder
    }

    /// Runs a query and returns a cursor that materializes rows into `shape`.
    pub async fn select(
        &self,
        query: &str,
        params: &[Argument],
        shape: &RecordShape,
    ) -> Result<RowCursor> {
        let result = self
            .run(query, params)
            .await
            .map_err(|e| e.during("select"))?;
        debug!(
            "Select returned {} rows with {} columns",
            result.rows.len(),
            result.columns.len()
        );
        Ok(RowCursor::with_shape(result, shape.clone()))
    }

    /// Runs a statement that returns no rows.
    pub async fn update(&self, query: &str, params: &[Argument]) -> Result<()> {
        self.run(query, params)
            .await
            .map_err(|e| e.during("update"))?;
        Ok(())
    }

    /// Closes the underlying session.
    pub async fn close(&self) -> Result<()> {
        self.driver.close().await?;
        info!("Connection closed");
        Ok(())
    }

    async fn run(&self, query: &str, params: &[Argument]) -> Result<ResultSet> {
        let params = uniform_parameters(params)?;
        let cql = self.binder.expand_placeholders(query, &params)?;
        let prepared = self.driver.prepare(&cql).await?;
        let statement = self.binder.bind(prepared, &params)?;
        debug!("Executing with {} bound values", statement.values.len());
        self.driver.execute(&statement).await
    }
}
