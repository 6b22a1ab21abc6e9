use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;

/// A single cell as returned by the cluster, reduced to what the TTL engine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CqlCell {
    Int(i64),
    Text(String),
    /// Any other CQL type, kept as its debug rendering for diagnostics.
    Other(String),
}

impl CqlCell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CqlCell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            CqlCell::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// One result row; `None` is a null cell.
pub type CqlRow = Vec<Option<CqlCell>>;

/// Values bound to `?` markers. Never spliced into statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Int(i32),
    BigInt(i64),
    Uuid(Uuid),
    /// Version-1 UUID bound as `timeuuid`.
    Timeuuid(Uuid),
}

impl fmt::Display for BindValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindValue::Text(s) => write!(f, "'{}'", s),
            BindValue::Int(i) => write!(f, "{}", i),
            BindValue::BigInt(i) => write!(f, "{}", i),
            BindValue::Uuid(u) | BindValue::Timeuuid(u) => write!(f, "{}", u),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CqlStatement {
    pub cql: String,
    pub values: Vec<BindValue>,
}

impl CqlStatement {
    pub fn new(cql: impl Into<String>) -> Self {
        Self {
            cql: cql.into(),
            values: Vec::new(),
        }
    }

    pub fn bind(mut self, value: BindValue) -> Self {
        self.values.push(value);
        self
    }
}

/// Executes one read statement against a live cluster and returns every row.
///
/// Implementations map connectivity failures to `AppError::ConnectionError` and
/// rejected or timed-out statements to `AppError::QueryError`. They never retry.
#[async_trait]
pub trait CqlExecutor: Send + Sync {
    async fn execute(&self, statement: &CqlStatement) -> AppResult<Vec<CqlRow>>;

    /// Human-readable endpoint, for logs and session info.
    fn endpoint(&self) -> String;
}
