//! Comma-separated text parsing with double-quote escaping.
//!
//! Deliberately small: one record per line, quotes only protect commas and
//! quotes within that line.

use crate::domain::model::ParsedTable;

/// Parses `text` into a header and data rows.
///
/// Never fails. Blank input gives an empty table. Data lines that yield a
/// single field (no delimiter) are dropped.
pub fn parse(text: &str) -> ParsedTable {
    // Spreadsheet exports often start with a byte order mark.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return ParsedTable::default();
    }

    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = normalized.split('\n').filter(|line| !line.is_empty());

    let header = match lines.next() {
        Some(line) => split_line(line),
        None => return ParsedTable::default(),
    };

    let rows = lines
        .map(split_line)
        .filter(|fields| fields.len() > 1)
        .collect();

    ParsedTable { header, rows }
}

/// Splits one line into fields.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);

    fields
}
