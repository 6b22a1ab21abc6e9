//! Allow-lists a probe request against `system_schema.columns` before it is run.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::core::client::cql_executor::{BindValue, CqlExecutor, CqlStatement};
use crate::domain::ttl::dto::ttl_scan_request::TtlScanRequest;
use crate::domain::ttl::service::identifier_guard::CqlIdentifier;
use crate::domain::ttl::service::multi_column_ttl_scanner::TtlProbeTarget;
use crate::errors::{AppError, AppResult};

pub const TABLE_COLUMNS_CQL: &str = "SELECT column_name, kind, type FROM system_schema.columns \
     WHERE keyspace_name = ? AND table_name = ?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    PartitionKey,
    Clustering,
    Regular,
    Static,
}

impl ColumnKind {
    fn from_catalog(kind: &str) -> Option<Self> {
        match kind {
            "partition_key" => Some(ColumnKind::PartitionKey),
            "clustering" => Some(ColumnKind::Clustering),
            "regular" => Some(ColumnKind::Regular),
            "static" => Some(ColumnKind::Static),
            _ => None,
        }
    }

    /// Only non-key cells carry their own write TTL.
    fn has_cell_ttl(self) -> bool {
        matches!(self, ColumnKind::Regular | ColumnKind::Static)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub cql_type: String,
}

/// Read the column catalog of one table. Unknown tables are `NotFound`.
pub async fn load_table_columns(
    executor: &dyn CqlExecutor,
    keyspace: &CqlIdentifier,
    table: &CqlIdentifier,
) -> AppResult<Vec<CatalogColumn>> {
    let statement = CqlStatement::new(TABLE_COLUMNS_CQL)
        .bind(BindValue::Text(keyspace.as_str().to_string()))
        .bind(BindValue::Text(table.as_str().to_string()));

    let rows = executor.execute(&statement).await?;

    let columns = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let text_at = |pos: usize| {
                row.get(pos)
                    .and_then(|c| c.as_ref())
                    .and_then(|c| c.as_text())
                    .map(str::to_string)
            };
            let name = text_at(0);
            let kind = text_at(1).as_deref().and_then(ColumnKind::from_catalog);
            let cql_type = text_at(2);
            match (name, kind, cql_type) {
                (Some(name), Some(kind), Some(cql_type)) => Ok(CatalogColumn { name, kind, cql_type }),
                _ => Err(AppError::QueryError(format!(
                    "unexpected column catalog row {} for {}.{}",
                    idx, keyspace, table
                ))),
            }
        })
        .collect::<AppResult<Vec<_>>>()?;

    if columns.is_empty() {
        return Err(AppError::NotFound(format!(
            "table {}.{} does not exist",
            keyspace, table
        )));
    }

    debug!("Loaded {} catalog column(s) for {}.{}", columns.len(), keyspace, table);
    Ok(columns)
}

/// Build a probe whose every identifier is known to the catalog.
///
/// Names are resolved exactly first, then case-insensitively when that is unambiguous.
/// The key value is coerced to the key column's CQL type.
pub fn resolve_probe_target(
    catalog: &[CatalogColumn],
    request: &TtlScanRequest,
) -> AppResult<TtlProbeTarget> {
    let keyspace = CqlIdentifier::parse(&request.keyspace, "keyspace")?;
    let table = CqlIdentifier::parse(&request.table, "table")?;

    let partition_keys: Vec<&CatalogColumn> = catalog
        .iter()
        .filter(|c| c.kind == ColumnKind::PartitionKey)
        .collect();
    if partition_keys.len() != 1 {
        return Err(AppError::InvalidRequest(format!(
            "{}.{} has a composite partition key ({} columns); only single-column keys can be probed",
            keyspace,
            table,
            partition_keys.len()
        )));
    }

    let key_column = lookup(catalog, &request.partition_key_column, "partition key column")?;
    if key_column.kind != ColumnKind::PartitionKey {
        return Err(AppError::InvalidRequest(format!(
            "'{}' is not the partition key of {}.{}",
            key_column.name, keyspace, table
        )));
    }

    let mut columns = Vec::with_capacity(request.columns.len());
    for requested in &request.columns {
        let column = lookup(catalog, requested, "column")?;
        if !column.kind.has_cell_ttl() {
            return Err(AppError::InvalidRequest(format!(
                "'{}' is a primary key column and carries no TTL",
                column.name
            )));
        }
        columns.push(column.name.clone());
    }

    let value = coerce_key_value(&request.partition_key_value, key_column)?;

    TtlProbeTarget::new(
        keyspace.as_str(),
        table.as_str(),
        &key_column.name,
        value,
        &columns,
    )
}

fn lookup<'a>(catalog: &'a [CatalogColumn], raw: &str, role: &str) -> AppResult<&'a CatalogColumn> {
    let wanted = CqlIdentifier::parse(raw, role)?;

    if let Some(exact) = catalog.iter().find(|c| c.name == wanted.as_str()) {
        return Ok(exact);
    }

    let folded: Vec<&CatalogColumn> = catalog
        .iter()
        .filter(|c| c.name.eq_ignore_ascii_case(wanted.as_str()))
        .collect();

    match folded.as_slice() {
        [single] => Ok(*single),
        [] => Err(AppError::InvalidRequest(format!("unknown {} '{}'", role, wanted))),
        _ => Err(AppError::InvalidRequest(format!(
            "{} '{}' is ambiguous; use the exact catalog name",
            role, wanted
        ))),
    }
}

fn coerce_key_value(raw: &Value, column: &CatalogColumn) -> AppResult<BindValue> {
    let as_text = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(AppError::InvalidRequest(format!(
                "partition key value must be a string or number, got {}",
                other
            )))
        }
    };

    let mismatch = |e: String| {
        AppError::InvalidRequest(format!(
            "partition key value '{}' is not a valid {} for '{}': {}",
            as_text, column.cql_type, column.name, e
        ))
    };

    match column.cql_type.as_str() {
        "text" | "varchar" | "ascii" => Ok(BindValue::Text(as_text)),
        "int" => as_text
            .parse::<i32>()
            .map(BindValue::Int)
            .map_err(|e| mismatch(e.to_string())),
        "bigint" => as_text
            .parse::<i64>()
            .map(BindValue::BigInt)
            .map_err(|e| mismatch(e.to_string())),
        "uuid" => Uuid::parse_str(&as_text)
            .map(BindValue::Uuid)
            .map_err(|e| mismatch(e.to_string())),
        "timeuuid" => {
            let id = Uuid::parse_str(&as_text).map_err(|e| mismatch(e.to_string()))?;
            if id.get_version_num() != 1 {
                return Err(mismatch(format!(
                    "version {} UUID, timeuuid needs version 1",
                    id.get_version_num()
                )));
            }
            Ok(BindValue::Timeuuid(id))
        }
        other => Err(AppError::InvalidRequest(format!(
            "partition key type '{}' is not supported for probing",
            other
        ))),
    }
}
