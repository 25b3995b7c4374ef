// ==========================================
// Translator Docs - header (schema) validation
// ==========================================
// The first line must carry exactly the expected columns, in order.
// Matching is case-sensitive after trimming each token.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};

/// Field delimiter of document files
pub const DELIMITER: u8 = b';';

/// Expected header, in order
pub const EXPECTED_HEADERS: [&str; 5] = ["subject", "content", "location", "author", "translator_email"];

const UTF8_BOM: char = '\u{feff}';

/// Split raw input into the header line and the remaining body
///
/// # Returns
/// - Ok((header, body)): header without line terminator or BOM
/// - Err(EmptyFile): zero bytes
/// - Err(ReadFailure): the header line is not valid UTF-8
pub fn split_header_line(bytes: &[u8]) -> ImportResult<(&str, &[u8])> {
    if bytes.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let (line, body) = match bytes.iter().position(|b| *b == b'\n') {
        Some(pos) => (&bytes[..pos], &bytes[pos + 1..]),
        None => (bytes, &bytes[bytes.len()..]),
    };

    let line = std::str::from_utf8(line)
        .map_err(|e| ImportError::ReadFailure(format!("header line is not valid UTF-8: {}", e)))?;
    let line = line.strip_suffix('\r').unwrap_or(line);
    let line = line.strip_prefix(UTF8_BOM).unwrap_or(line);

    Ok((line, body))
}

/// Check a header line against EXPECTED_HEADERS
pub fn validate_header(line: &str) -> ImportResult<()> {
    let delimiter = char::from(DELIMITER);
    let tokens: Vec<&str> = line
        .split(delimiter)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err(ImportError::HeaderInvalid("header line is blank".to_string()));
    }

    if tokens != EXPECTED_HEADERS {
        return Err(ImportError::HeaderInvalid(format!(
            "expected [{}], found [{}]",
            EXPECTED_HEADERS.join(", "),
            tokens.join(", ")
        )));
    }

    Ok(())
}
