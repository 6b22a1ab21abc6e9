use serde::Serialize;

use super::ttl_table_entry::TtlTableEntry;

/// TTLs found in one schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaTtlReport {
    /// `DEFAULT_TTL` entries, in discovery order.
    pub tables: Vec<TtlTableEntry>,
    /// `COLUMN_LEVEL` entries from `USING TTL` writes, in discovery order.
    pub write_overrides: Vec<TtlTableEntry>,
}

impl SchemaTtlReport {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.write_overrides.is_empty()
    }
}
