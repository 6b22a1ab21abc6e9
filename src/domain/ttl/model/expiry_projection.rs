use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiryBucket {
    pub time_bucket: String,
    pub projected_expiring_records: u64,
}

/// Placeholder expiry timeline. `simulated` is always true until a decay model exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiryProjection {
    pub title: String,
    pub simulated: bool,
    pub notice: String,
    pub buckets: Vec<ExpiryBucket>,
}
