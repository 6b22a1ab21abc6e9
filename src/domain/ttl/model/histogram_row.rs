use serde::Serialize;

/// One percentile line of a table histogram report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramRow {
    pub percentile_label: String,
    pub write_latency_micros: i64,
    pub read_latency_micros: i64,
    pub partition_size_bytes: i64,
    pub cell_count: Option<i64>,
}
