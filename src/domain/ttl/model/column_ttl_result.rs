use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Remaining TTL of one probed column on the fetched row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTtlResult {
    pub column: String,
    /// `None` when the cell is null or was written without a TTL.
    pub ttl_remaining_seconds: Option<u64>,
}

impl ColumnTtlResult {
    pub fn new(column: impl Into<String>, ttl_remaining_seconds: Option<u64>) -> Self {
        Self {
            column: column.into(),
            ttl_remaining_seconds,
        }
    }

    pub fn is_expiring(&self) -> bool {
        self.ttl_remaining_seconds.is_some()
    }
}

// `is_expiring` is derived, so it is emitted here rather than stored.
impl Serialize for ColumnTtlResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ColumnTtlResult", 3)?;
        s.serialize_field("column", &self.column)?;
        s.serialize_field("ttl_remaining_seconds", &self.ttl_remaining_seconds)?;
        s.serialize_field("is_expiring", &self.is_expiring())?;
        s.end()
    }
}

/// Result of a single-row TTL probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtlScanOutcome {
    /// A row matched; one result per requested column, in request order.
    Matched(Vec<ColumnTtlResult>),
    /// No row exists for the partition key.
    NoMatchingRow,
}
