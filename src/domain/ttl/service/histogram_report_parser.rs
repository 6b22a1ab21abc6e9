//! Parser for `nodetool tablehistograms`-style reports.
//!
//! ```text
//! Percentile  SSTables     Write Latency      Read Latency    Partition Size        Cell Count
//! p50         -            1200               1500            2048                  10
//! ```
//!
//! Columns are separated by wide gaps; single spaces belong to a field.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::ttl::model::histogram_row::HistogramRow;

static FIELD_GAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

const MIN_FIELDS: usize = 5;

/// Parse every data line below the header. Lines that do not fit are skipped.
///
/// A report without a recognizable header yields an empty result.
pub fn parse_histogram_report(text: &str) -> Vec<HistogramRow> {
    let mut lines = text.lines();

    if !lines.by_ref().any(is_header_line) {
        debug!("No histogram header found");
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (offset, line) in lines.enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_data_line(trimmed) {
            Some(row) => rows.push(row),
            None => {
                skipped += 1;
                debug!("Skipping histogram line {} after header: '{}'", offset + 1, trimmed);
            }
        }
    }

    debug!("Parsed {} histogram row(s), skipped {}", rows.len(), skipped);
    rows
}

fn is_header_line(line: &str) -> bool {
    let normalized = line
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    normalized.contains("percentile") && normalized.contains("partition size")
}

fn parse_data_line(line: &str) -> Option<HistogramRow> {
    let fields: Vec<&str> = FIELD_GAP_RE.split(line).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    Some(HistogramRow {
        percentile_label: fields[0].to_string(),
        write_latency_micros: fields[2].parse().ok()?,
        read_latency_micros: fields[3].parse().ok()?,
        partition_size_bytes: fields[4].parse().ok()?,
        cell_count: fields.get(5).and_then(|v| v.parse().ok()),
    })
}
