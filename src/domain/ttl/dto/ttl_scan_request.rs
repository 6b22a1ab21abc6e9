use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

/// Payload for a single-row, multi-column TTL probe.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TtlScanRequest {
    #[validate(length(min = 1, max = 48))]
    pub keyspace: String,
    #[validate(length(min = 1, max = 48))]
    pub table: String,
    #[validate(length(min = 1, max = 48))]
    pub partition_key_column: String,
    /// String or number; coerced to the key column's CQL type.
    pub partition_key_value: Value,
    #[validate(length(max = 256))]
    #[serde(default)]
    pub columns: Vec<String>,
}
