use serde::{Deserialize, Serialize};

/// Where a TTL declaration was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TtlSource {
    /// Table-level `default_time_to_live`.
    DefaultTtl,
    /// Per-write `USING TTL` override.
    ColumnLevel,
}

/// A table with a positive TTL. Zero or missing TTLs never become entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlTableEntry {
    pub keyspace: String,
    pub table: String,
    pub ttl_seconds: u64,
    pub source: TtlSource,
}

impl TtlTableEntry {
    pub fn default_ttl(keyspace: impl Into<String>, table: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            keyspace: keyspace.into(),
            table: table.into(),
            ttl_seconds,
            source: TtlSource::DefaultTtl,
        }
    }

    pub fn column_level(keyspace: impl Into<String>, table: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            keyspace: keyspace.into(),
            table: table.into(),
            ttl_seconds,
            source: TtlSource::ColumnLevel,
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.keyspace, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_serializes_in_upper_snake_case() {
        let entry = TtlTableEntry::default_ttl("ks1", "t1", 3600);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["source"], "DEFAULT_TTL");
        assert_eq!(json["ttl_seconds"], 3600);
        assert_eq!(entry.qualified_name(), "ks1.t1");

        let write = TtlTableEntry::column_level("ks1", "t1", 60);
        assert_eq!(serde_json::to_value(&write).unwrap()["source"], "COLUMN_LEVEL");
    }
}
