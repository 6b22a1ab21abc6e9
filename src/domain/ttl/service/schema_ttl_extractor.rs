//! Default-TTL discovery in CQL schema exports (`DESCRIBE SCHEMA` output, `.cql` files).

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::ttl::model::ttl_table_entry::TtlTableEntry;

/// Single cross-block pattern: a table name is paired with the first TTL that follows it,
/// even when that TTL belongs to a later table.
static GREEDY_TABLE_TTL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)CREATE TABLE (\w+)\.(\w+).*?WITH.*?default_time_to_live\s*=\s*(\d+)")
        .expect("valid regex")
});

static TABLE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\bCREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:"([^"]+)"|(\w+))\s*\.\s*(?:"([^"]+)"|(\w+))"#,
    )
    .expect("valid regex")
});

static NEXT_CREATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bCREATE\s+").expect("valid regex"));

static WITH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bWITH\b").expect("valid regex"));

static DEFAULT_TTL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bdefault_time_to_live\s*=\s*(\d+)").expect("valid regex")
});

static WRITE_TTL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)\b(?:INSERT\s+INTO|UPDATE)\s+(\w+)\.(\w+)\b(?:[^;']|'(?:[^']|'')*')*?\bUSING\s+(?:TIMESTAMP\s+\d+\s+AND\s+)?TTL\s+(\d+)",
    )
    .expect("valid regex")
});

/// How table declarations are paired with their `default_time_to_live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMatchMode {
    /// Each `CREATE TABLE` statement is cut out first; its TTL is searched only inside it.
    #[default]
    Scoped,
    /// One multi-line pattern over the whole text (legacy pairing).
    Greedy,
}

impl FromStr for SchemaMatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scoped" | "block" => Ok(SchemaMatchMode::Scoped),
            "greedy" | "legacy" => Ok(SchemaMatchMode::Greedy),
            other => Err(format!("unknown schema match mode '{}'", other)),
        }
    }
}

/// Extract `DEFAULT_TTL` entries in discovery order. An empty result is valid.
pub fn extract_schema_ttls(text: &str, mode: SchemaMatchMode) -> Vec<TtlTableEntry> {
    let entries = match mode {
        SchemaMatchMode::Greedy => extract_greedy(text),
        SchemaMatchMode::Scoped => extract_scoped(text),
    };

    debug!("Extracted {} default TTL table(s) ({:?} mode)", entries.len(), mode);
    entries
}

/// Extract `COLUMN_LEVEL` entries from `INSERT ... USING TTL n` / `UPDATE ... USING TTL n`.
pub fn extract_write_ttls(text: &str) -> Vec<TtlTableEntry> {
    WRITE_TTL_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let ttl = positive_ttl(&caps[3], &caps[1], &caps[2])?;
            Some(TtlTableEntry::column_level(&caps[1], &caps[2], ttl))
        })
        .collect()
}

fn extract_greedy(text: &str) -> Vec<TtlTableEntry> {
    GREEDY_TABLE_TTL_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let ttl = positive_ttl(&caps[3], &caps[1], &caps[2])?;
            Some(TtlTableEntry::default_ttl(&caps[1], &caps[2], ttl))
        })
        .collect()
}

fn extract_scoped(text: &str) -> Vec<TtlTableEntry> {
    let headers: Vec<Captures> = TABLE_HEADER_RE.captures_iter(text).collect();
    let mut entries = Vec::new();

    for caps in headers {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        let keyspace = identifier(&caps, 1, 2);
        let table = identifier(&caps, 3, 4);
        let (keyspace, table) = match (keyspace, table) {
            (Some(k), Some(t)) => (k, t),
            _ => continue,
        };

        let block = &text[whole.end()..block_end(text, whole.end())];

        let ttl = WITH_RE
            .find(block)
            .and_then(|with| DEFAULT_TTL_RE.captures(&block[with.end()..]))
            .and_then(|ttl_caps| positive_ttl(&ttl_caps[1], keyspace, table));

        if let Some(ttl) = ttl {
            entries.push(TtlTableEntry::default_ttl(keyspace, table, ttl));
        }
    }

    entries
}

fn identifier<'t>(caps: &Captures<'t>, quoted: usize, bare: usize) -> Option<&'t str> {
    caps.get(quoted).or_else(|| caps.get(bare)).map(|m| m.as_str())
}

/// End of the statement starting at `from`: the first `;` or `CREATE` keyword outside
/// single-quoted literals and double-quoted names, or the end of the text.
fn block_end(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    let mut creates = NEXT_CREATE_RE.find_iter(rest).map(|m| m.start()).peekable();
    let mut in_literal = false;
    let mut in_name = false;

    for (idx, ch) in rest.char_indices() {
        while creates.next_if(|&start| start < idx).is_some() {}
        let quoted = in_literal || in_name;
        if !quoted && creates.peek() == Some(&idx) {
            return from + idx;
        }
        match ch {
            '\'' if !in_name => in_literal = !in_literal,
            '"' if !in_literal => in_name = !in_name,
            ';' if !quoted => return from + idx,
            _ => {}
        }
    }

    text.len()
}

/// Parse a captured TTL. Zero means "no expiry" and overflow is dropped, both as `None`.
fn positive_ttl(raw: &str, keyspace: &str, table: &str) -> Option<u64> {
    match raw.parse::<u64>() {
        Ok(0) => None,
        Ok(ttl) => Some(ttl),
        Err(e) => {
            warn!("Skipping TTL '{}' on {}.{}: {}", raw, keyspace, table, e);
            None
        }
    }
}
