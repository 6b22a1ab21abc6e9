//! Delimited-text export of probe results: `column,ttl_remaining_seconds,is_expiring`.

use crate::domain::ttl::model::column_ttl_result::ColumnTtlResult;
use crate::errors::{AppError, AppResult};

pub const EXPORT_HEADER: &str = "column,ttl_remaining_seconds,is_expiring";

pub fn export_scan_results(results: &[ColumnTtlResult]) -> String {
    let mut out = String::with_capacity(EXPORT_HEADER.len() + 1 + results.len() * 32);
    out.push_str(EXPORT_HEADER);
    out.push('\n');

    for r in results {
        out.push_str(&escape_field(&r.column));
        out.push(',');
        if let Some(ttl) = r.ttl_remaining_seconds {
            out.push_str(&ttl.to_string());
        }
        out.push(',');
        out.push_str(if r.is_expiring() { "true" } else { "false" });
        out.push('\n');
    }

    out
}

/// Read an export back. The expiring flag must agree with the TTL field.
pub fn import_scan_results(text: &str) -> AppResult<Vec<ColumnTtlResult>> {
    let mut lines = text.lines().enumerate();

    match lines.next() {
        Some((_, header)) if header.trim() == EXPORT_HEADER => {}
        _ => {
            return Err(AppError::DecodeError(format!(
                "export must start with header '{}'",
                EXPORT_HEADER
            )))
        }
    }

    let mut results = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields = split_fields(line)
            .ok_or_else(|| decode_err(line_no, "unterminated quoted field"))?;

        let [column, ttl, expiring] = <[String; 3]>::try_from(fields)
            .map_err(|f| decode_err(line_no, &format!("expected 3 fields, found {}", f.len())))?;

        let ttl = if ttl.is_empty() {
            None
        } else {
            let value = ttl
                .parse::<u64>()
                .map_err(|e| decode_err(line_no, &format!("bad TTL '{}': {}", ttl, e)))?;
            Some(value).filter(|v| *v > 0)
        };

        let flag = match expiring.as_str() {
            "true" => true,
            "false" => false,
            other => return Err(decode_err(line_no, &format!("bad flag '{}'", other))),
        };

        let result = ColumnTtlResult::new(column, ttl);
        if result.is_expiring() != flag {
            return Err(decode_err(line_no, "expiring flag disagrees with TTL"));
        }
        results.push(result);
    }

    Ok(results)
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn split_fields(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut quoted = false;

    while let Some(ch) = chars.next() {
        match (ch, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => quoted = false,
            ('"', false) if current.is_empty() => quoted = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            (c, _) => current.push(c),
        }
    }

    if quoted {
        return None;
    }
    fields.push(current);
    Some(fields)
}

fn decode_err(line_no: usize, msg: &str) -> AppError {
    AppError::DecodeError(format!("export line {}: {}", line_no, msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ColumnTtlResult> {
        vec![
            ColumnTtlResult::new("items", Some(3500)),
            ColumnTtlResult::new("owner", None),
            ColumnTtlResult::new("coupon", Some(12)),
        ]
    }

    #[test]
    fn export_has_header_and_one_line_per_column() {
        let text = export_scan_results(&sample());
        assert_eq!(
            text,
            "column,ttl_remaining_seconds,is_expiring\nitems,3500,true\nowner,,false\ncoupon,12,true\n"
        );
    }

    #[test]
    fn export_then_import_reproduces_tuples() {
        let original = sample();
        let parsed = import_scan_results(&export_scan_results(&original)).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn odd_column_names_are_quoted() {
        let results = vec![ColumnTtlResult::new("a,\"b\"", Some(1))];
        let text = export_scan_results(&results);
        assert!(text.contains("\"a,\"\"b\"\"\",1,true"));
        assert_eq!(import_scan_results(&text).unwrap(), results);
    }

    #[test]
    fn header_only_is_an_empty_export() {
        let text = export_scan_results(&[]);
        assert!(import_scan_results(&text).unwrap().is_empty());
    }

    #[test]
    fn malformed_lines_are_decode_errors() {
        let cases = [
            "wrong,header\nitems,1,true\n",
            "column,ttl_remaining_seconds,is_expiring\nitems,1\n",
            "column,ttl_remaining_seconds,is_expiring\nitems,soon,true\n",
            "column,ttl_remaining_seconds,is_expiring\nitems,,true\n",
            "column,ttl_remaining_seconds,is_expiring\n\"items,1,true\n",
        ];
        for text in cases {
            let err = import_scan_results(text).unwrap_err();
            assert!(matches!(err, AppError::DecodeError(_)), "{}", text);
        }
    }
}
