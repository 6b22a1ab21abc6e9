use std::time::Duration;

use async_trait::async_trait;
use scylla::frame::response::result::CqlValue;
use scylla::frame::value::CqlTimeuuid;
use scylla::query::Query;
use scylla::transport::errors::{NewSessionError, QueryError};
use scylla::{Session, SessionBuilder};
use tracing::{debug, info};

use crate::config::CqlConfig;
use crate::core::client::cql_executor::{BindValue, CqlCell, CqlExecutor, CqlRow, CqlStatement};
use crate::errors::{AppError, AppResult};

/// Connection parameters supplied by the caller. The password only reaches the driver.
#[derive(Clone)]
pub struct ClusterEndpoint {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ClusterEndpoint {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Debug for ClusterEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterEndpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// `CqlExecutor` backed by a scylla driver session (works against Cassandra too).
pub struct ScyllaExecutor {
    session: Session,
    address: String,
    request_timeout: Duration,
}

impl ScyllaExecutor {
    pub async fn connect(endpoint: &ClusterEndpoint, cfg: &CqlConfig) -> AppResult<Self> {
        let address = endpoint.address();
        info!(%address, "connecting to cluster");

        let mut builder = SessionBuilder::new()
            .known_node(&address)
            .connection_timeout(cfg.connect_timeout());

        if let Some(user) = endpoint.username.as_deref().filter(|u| !u.is_empty()) {
            let pass = endpoint.password.clone().unwrap_or_default();
            builder = builder.user(user, pass);
        }

        let session = tokio::time::timeout(cfg.connect_timeout(), builder.build())
            .await
            .map_err(|_| {
                AppError::ConnectionError(format!(
                    "timed out after {} ms connecting to {}",
                    cfg.connect_timeout_ms, address
                ))
            })?
            .map_err(map_new_session_error)?;

        debug!(%address, "cluster session established");
        Ok(Self {
            session,
            address,
            request_timeout: cfg.request_timeout(),
        })
    }
}

#[async_trait]
impl CqlExecutor for ScyllaExecutor {
    async fn execute(&self, statement: &CqlStatement) -> AppResult<Vec<CqlRow>> {
        let mut query = Query::new(statement.cql.clone());
        query.set_request_timeout(Some(self.request_timeout));

        let values: Vec<CqlValue> = statement.values.iter().map(to_cql_value).collect();

        debug!(cql = %statement.cql, binds = values.len(), "executing statement");
        let result = self
            .session
            .query_unpaged(query, values)
            .await
            .map_err(map_query_error)?;

        let rows = result
            .rows_or_empty()
            .into_iter()
            .map(|row| {
                row.columns
                    .into_iter()
                    .map(|cell| cell.map(from_cql_value))
                    .collect()
            })
            .collect();

        Ok(rows)
    }

    fn endpoint(&self) -> String {
        self.address.clone()
    }
}

fn to_cql_value(value: &BindValue) -> CqlValue {
    match value {
        BindValue::Text(s) => CqlValue::Text(s.clone()),
        BindValue::Int(i) => CqlValue::Int(*i),
        BindValue::BigInt(i) => CqlValue::BigInt(*i),
        BindValue::Uuid(u) => CqlValue::Uuid(*u),
        BindValue::Timeuuid(u) => CqlValue::Timeuuid(CqlTimeuuid::from(*u)),
    }
}

fn from_cql_value(value: CqlValue) -> CqlCell {
    match value {
        CqlValue::Int(i) => CqlCell::Int(i64::from(i)),
        CqlValue::BigInt(i) => CqlCell::Int(i),
        CqlValue::SmallInt(i) => CqlCell::Int(i64::from(i)),
        CqlValue::TinyInt(i) => CqlCell::Int(i64::from(i)),
        CqlValue::Ascii(s) | CqlValue::Text(s) => CqlCell::Text(s),
        other => CqlCell::Other(format!("{:?}", other)),
    }
}

fn map_new_session_error(err: NewSessionError) -> AppError {
    AppError::ConnectionError(err.to_string())
}

/// Transport and stream exhaustion failures are connection-level; everything the
/// coordinator rejects or times out stays a query failure.
fn map_query_error(err: QueryError) -> AppError {
    match err {
        QueryError::IoError(_)
        | QueryError::TooManyOrphanedStreamIds(_)
        | QueryError::UnableToAllocStreamId => AppError::ConnectionError(err.to_string()),
        other => AppError::QueryError(other.to_string()),
    }
}
