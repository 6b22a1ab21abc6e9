use std::sync::Arc;

use async_trait::async_trait;

use crate::config::CqlConfig;
use crate::core::client::cql_executor::CqlExecutor;
use crate::core::client::scylla_executor::{ClusterEndpoint, ScyllaExecutor};
use crate::errors::AppResult;

/// Opens executors for a cluster endpoint. Swapped for an in-memory fake in tests.
#[async_trait]
pub trait CqlConnector: Send + Sync {
    async fn connect(&self, endpoint: &ClusterEndpoint) -> AppResult<Arc<dyn CqlExecutor>>;
}

pub struct ScyllaConnector {
    cfg: CqlConfig,
}

impl ScyllaConnector {
    pub fn new(cfg: CqlConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl CqlConnector for ScyllaConnector {
    async fn connect(&self, endpoint: &ClusterEndpoint) -> AppResult<Arc<dyn CqlExecutor>> {
        let executor = ScyllaExecutor::connect(endpoint, &self.cfg).await?;
        Ok(Arc::new(executor))
    }
}
