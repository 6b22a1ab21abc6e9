use tracing::{debug, info};

use crate::core::client::cql_executor::{BindValue, CqlCell, CqlExecutor, CqlStatement};
use crate::domain::ttl::model::column_ttl_result::{ColumnTtlResult, TtlScanOutcome};
use crate::domain::ttl::service::identifier_guard::CqlIdentifier;
use crate::errors::{AppError, AppResult};

/// A validated single-row TTL probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlProbeTarget {
    pub keyspace: CqlIdentifier,
    pub table: CqlIdentifier,
    pub partition_key_column: CqlIdentifier,
    pub partition_key_value: BindValue,
    pub columns: Vec<CqlIdentifier>,
}

impl TtlProbeTarget {
    pub fn new(
        keyspace: &str,
        table: &str,
        partition_key_column: &str,
        partition_key_value: BindValue,
        columns: &[String],
    ) -> AppResult<Self> {
        Ok(Self {
            keyspace: CqlIdentifier::parse(keyspace, "keyspace")?,
            table: CqlIdentifier::parse(table, "table")?,
            partition_key_column: CqlIdentifier::parse(partition_key_column, "partition key column")?,
            partition_key_value,
            columns: columns
                .iter()
                .map(|c| CqlIdentifier::parse(c, "column"))
                .collect::<AppResult<Vec<_>>>()?,
        })
    }

    /// The one statement a probe issues. The key value is always bound, never inlined.
    pub fn statement(&self) -> CqlStatement {
        let projection = if self.columns.is_empty() {
            self.partition_key_column.quoted()
        } else {
            self.columns
                .iter()
                .map(|c| format!("TTL({})", c.quoted()))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let cql = format!(
            "SELECT {} FROM {}.{} WHERE {} = ? LIMIT 1",
            projection,
            self.keyspace.quoted(),
            self.table.quoted(),
            self.partition_key_column.quoted()
        );

        CqlStatement::new(cql).bind(self.partition_key_value.clone())
    }
}

/// Probe the remaining TTL of each requested column on the first row of a partition.
///
/// All-or-nothing: a failed query yields an error and no partial results.
pub async fn scan_column_ttls(
    executor: &dyn CqlExecutor,
    target: &TtlProbeTarget,
) -> AppResult<TtlScanOutcome> {
    let statement = target.statement();
    debug!(cql = %statement.cql, "probing column TTLs");

    let rows = executor.execute(&statement).await?;

    let row = match rows.into_iter().next() {
        Some(row) => row,
        None => {
            info!(
                "No row in {}.{} for {} = {}",
                target.keyspace, target.table, target.partition_key_column, target.partition_key_value
            );
            return Ok(TtlScanOutcome::NoMatchingRow);
        }
    };

    if target.columns.is_empty() {
        return Ok(TtlScanOutcome::Matched(Vec::new()));
    }

    if row.len() < target.columns.len() {
        return Err(AppError::QueryError(format!(
            "probe returned {} column(s), expected {}",
            row.len(),
            target.columns.len()
        )));
    }

    let results = target
        .columns
        .iter()
        .zip(row)
        .map(|(column, cell)| {
            let ttl = remaining_ttl(column, cell)?;
            Ok(ColumnTtlResult::new(column.as_str(), ttl))
        })
        .collect::<AppResult<Vec<_>>>()?;

    let expiring = results.iter().filter(|r| r.is_expiring()).count();
    info!(
        "Probed {} column(s) of {}.{}: {} expiring",
        results.len(),
        target.keyspace,
        target.table,
        expiring
    );
    Ok(TtlScanOutcome::Matched(results))
}

/// Null cells and non-positive values mean the column does not expire.
fn remaining_ttl(column: &CqlIdentifier, cell: Option<CqlCell>) -> AppResult<Option<u64>> {
    match cell {
        None => Ok(None),
        Some(CqlCell::Int(n)) if n > 0 => Ok(Some(n as u64)),
        Some(CqlCell::Int(_)) => Ok(None),
        Some(other) => Err(AppError::QueryError(format!(
            "TTL of column '{}' has unexpected type: {:?}",
            column, other
        ))),
    }
}
