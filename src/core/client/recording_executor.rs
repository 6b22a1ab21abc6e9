//! In-memory `CqlExecutor` for tests: returns canned rows and records every statement.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::client::cql_connector::CqlConnector;
use crate::core::client::cql_executor::{CqlExecutor, CqlRow, CqlStatement};
use crate::core::client::scylla_executor::ClusterEndpoint;
use crate::errors::{AppError, AppResult};

#[derive(Default)]
pub struct RecordingExecutor {
    responses: Mutex<VecDeque<AppResult<Vec<CqlRow>>>>,
    executed: Mutex<Vec<CqlStatement>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next `execute` call.
    pub fn respond(self, rows: Vec<CqlRow>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(rows));
        self
    }

    pub fn fail(self, err: AppError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn executed(&self) -> Vec<CqlStatement> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl CqlExecutor for RecordingExecutor {
    async fn execute(&self, statement: &CqlStatement) -> AppResult<Vec<CqlRow>> {
        self.executed.lock().unwrap().push(statement.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn endpoint(&self) -> String {
        "recording:9042".to_string()
    }
}

/// Hands out one pre-built executor per `connect`, or fails when none is left.
#[derive(Default)]
pub struct RecordingConnector {
    executors: Mutex<VecDeque<Arc<RecordingExecutor>>>,
}

impl RecordingConnector {
    pub fn with(executor: Arc<RecordingExecutor>) -> Self {
        let connector = Self::default();
        connector.executors.lock().unwrap().push_back(executor);
        connector
    }
}

#[async_trait]
impl CqlConnector for RecordingConnector {
    async fn connect(&self, endpoint: &ClusterEndpoint) -> AppResult<Arc<dyn CqlExecutor>> {
        match self.executors.lock().unwrap().pop_front() {
            Some(executor) => Ok(executor as Arc<dyn CqlExecutor>),
            None => Err(AppError::ConnectionError(format!(
                "Connection refused: {}",
                endpoint.address()
            ))),
        }
    }
}
