use crate::domain::ttl::model::expiry_projection::{ExpiryBucket, ExpiryProjection};

const SIMULATED_BUCKETS: [(&str, u64); 6] = [
    ("1h", 5_000),
    ("6h", 30_000),
    ("12h", 70_000),
    ("24h", 100_000),
    ("3d", 400_000),
    ("7d", 700_000),
];

pub const SIMULATED_NOTICE: &str =
    "Simulated: illustrative figures, not derived from histogram or TTL data";

/// Fixed illustrative expiry timeline. Always flagged as simulated.
pub fn simulate_expiry_projection(title: &str) -> ExpiryProjection {
    ExpiryProjection {
        title: format!("{} (Simulated)", title.trim()),
        simulated: true,
        notice: SIMULATED_NOTICE.to_string(),
        buckets: SIMULATED_BUCKETS
            .iter()
            .map(|(label, count)| ExpiryBucket {
                time_bucket: label.to_string(),
                projected_expiring_records: *count,
            })
            .collect(),
    }
}
