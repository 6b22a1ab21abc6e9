use tracing::debug;

use crate::core::client::cql_executor::{CqlExecutor, CqlRow, CqlStatement};
use crate::domain::ttl::model::ttl_table_entry::TtlTableEntry;
use crate::errors::{AppError, AppResult};

pub const LIVE_TTL_TABLES_CQL: &str = "SELECT keyspace_name, table_name, default_time_to_live \
     FROM system_schema.tables WHERE default_time_to_live > 0 ALLOW FILTERING";

/// List every table whose default TTL is positive, in result-set order.
///
/// Issues exactly one read against the catalog. A malformed row fails the whole call.
pub async fn fetch_live_ttl_tables(executor: &dyn CqlExecutor) -> AppResult<Vec<TtlTableEntry>> {
    let rows = executor
        .execute(&CqlStatement::new(LIVE_TTL_TABLES_CQL))
        .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        if let Some(entry) = row_to_entry(idx, row)? {
            entries.push(entry);
        }
    }

    debug!(
        "Fetched {} TTL table(s) from {}",
        entries.len(),
        executor.endpoint()
    );
    Ok(entries)
}

fn row_to_entry(idx: usize, row: &CqlRow) -> AppResult<Option<TtlTableEntry>> {
    let text_at = |pos: usize, name: &str| -> AppResult<String> {
        row.get(pos)
            .and_then(|c| c.as_ref())
            .and_then(|c| c.as_text())
            .map(str::to_string)
            .ok_or_else(|| unexpected_shape(idx, name))
    };

    let keyspace = text_at(0, "keyspace_name")?;
    let table = text_at(1, "table_name")?;
    let ttl = row
        .get(2)
        .and_then(|c| c.as_ref())
        .and_then(|c| c.as_int())
        .ok_or_else(|| unexpected_shape(idx, "default_time_to_live"))?;

    // The catalog filter already excludes these; keep the invariant locally too.
    if ttl <= 0 {
        return Ok(None);
    }

    Ok(Some(TtlTableEntry::default_ttl(keyspace, table, ttl as u64)))
}

fn unexpected_shape(idx: usize, column: &str) -> AppError {
    AppError::QueryError(format!(
        "unexpected catalog row {}: missing or mistyped '{}'",
        idx, column
    ))
}
