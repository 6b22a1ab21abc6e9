use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, AppResult};

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]{0,47}$").expect("valid regex"));

/// A keyspace, table or column name that is safe to place in statement text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CqlIdentifier(String);

impl CqlIdentifier {
    pub fn parse(raw: &str, role: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if IDENTIFIER_RE.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(AppError::InvalidIdentifier(format!(
                "{} '{}' must start with a letter and contain only letters, digits or _ (max 48 chars)",
                role, raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form, so the name is matched exactly as the catalog stores it.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for CqlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        for name in ["events", "user_sessions", "tmp_", "T1", "a"] {
            assert!(CqlIdentifier::parse(name, "table").is_ok(), "{}", name);
        }
        assert_eq!(CqlIdentifier::parse(" ks1 ", "keyspace").unwrap().as_str(), "ks1");
    }

    #[test]
    fn rejects_injection_shaped_input() {
        let too_long = "x".repeat(49);
        let attempts = [
            "",
            "t; DROP TABLE ks.t",
            "col) FROM ks.t --",
            "\"quoted\"",
            "a.b",
            "1col",
            "_tmp",
            "name with space",
            too_long.as_str(),
        ];
        for raw in attempts {
            let err = CqlIdentifier::parse(raw, "column").unwrap_err();
            assert!(matches!(err, AppError::InvalidIdentifier(_)), "{}", raw);
        }
    }

    #[test]
    fn quoting_preserves_case() {
        let id = CqlIdentifier::parse("lastSeen", "column").unwrap();
        assert_eq!(id.quoted(), "\"lastSeen\"");
        assert_eq!(id.to_string(), "lastSeen");
    }
}
