use crate::errors::{AppError, AppResult};

/// Decode an uploaded document as UTF-8 text. Binary input (NUL bytes) is rejected too.
pub fn decode_text<'a>(bytes: &'a [u8], what: &str) -> AppResult<&'a str> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        AppError::DecodeError(format!("{} is not valid UTF-8 text: {}", what, e))
    })?;

    if let Some(pos) = text.find('\0') {
        return Err(AppError::DecodeError(format!(
            "{} looks binary (NUL byte at offset {})",
            what, pos
        )));
    }

    // A leading BOM is common in exports produced on Windows.
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}
