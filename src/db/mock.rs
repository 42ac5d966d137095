//! Mock driver for testing.
//!
//! Records every prepared statement and bound value list, and replays
//! scripted result sets in order.

use super::{BoundStatement, CqlDriver, ResultSet};
use crate::config::ConnectionConfig;
use crate::error::{CassError, Result};
use async_trait::async_trait;
use scylla::value::CqlValue;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    prepared: Vec<String>,
    executed: Vec<(String, Vec<Option<CqlValue>>)>,
    results: VecDeque<ResultSet>,
    prepare_error: Option<String>,
    execute_error: Option<String>,
    closed: bool,
}

/// A driver that returns predefined results instead of talking to a cluster.
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Creates a mock driver with no scripted results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a result set for the next execution.
    pub fn with_result(self, result: ResultSet) -> Self {
        self.push_result(result);
        self
    }

    /// Makes every `prepare` call fail with a query error.
    pub fn failing_prepare(self, message: impl Into<String>) -> Self {
        self.lock().prepare_error = Some(message.into());
        self
    }

    /// Makes every `execute` call fail with a query error.
    pub fn failing_execute(self, message: impl Into<String>) -> Self {
        self.lock().execute_error = Some(message.into());
        self
    }

    /// Queues a result set. Executions with nothing queued return no rows.
    pub fn push_result(&self, result: ResultSet) {
        self.lock().results.push_back(result);
    }

    /// Returns every CQL string passed to `prepare`, in order.
    pub fn prepared_queries(&self) -> Vec<String> {
        self.lock().prepared.clone()
    }

    /// Returns the executed CQL and its bound values, in order.
    pub fn executions(&self) -> Vec<(String, Vec<Option<CqlValue>>)> {
        self.lock().executed.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded calls from others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CqlDriver for MockDriver {
    type Prepared = String;

    async fn connect(_config: &ConnectionConfig) -> Result<Self>
    where
        Self: Sized,
    {
        Ok(Self::new())
    }

    async fn prepare(&self, cql: &str) -> Result<String> {
        let mut state = self.lock();
        if state.closed {
            return Err(CassError::connection("session is closed"));
        }
        if let Some(message) = &state.prepare_error {
            return Err(CassError::query(message.clone()));
        }
        state.prepared.push(cql.to_string());
        Ok(cql.to_string())
    }

    async fn execute(&self, statement: &BoundStatement<String>) -> Result<ResultSet> {
        let mut state = self.lock();
        if state.closed {
            return Err(CassError::connection("session is closed"));
        }
        if let Some(message) = &state.execute_error {
            return Err(CassError::query(message.clone()));
        }
        state
            .executed
            .push((statement.prepared.clone(), statement.values.clone()));
        Ok(state.results.pop_front().unwrap_or_default())
    }

    async fn close(&self) -> Result<()> {
        self.lock().closed = true;
        Ok(())
    }
}
