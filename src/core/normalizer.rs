use crate::domain::model::Record;
use serde_json::{Map, Value};

/// Collapses every whitespace run to one space and trims the ends.
///
/// A zero-width no-break space (U+FEFF, the BOM) counts as whitespace.
pub fn normalize_key(key: &str) -> String {
    key.split(|c: char| c.is_whitespace() || c == '\u{feff}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pairs each row with the normalized header.
///
/// Short rows leave trailing columns absent, long rows lose their excess
/// cells. When two header cells normalize to the same name the later cell
/// wins.
pub fn to_records(header: &[String], rows: &[Vec<String>]) -> Vec<Record> {
    let keys: Vec<String> = header.iter().map(|h| normalize_key(h)).collect();

    rows.iter()
        .map(|row| {
            keys.iter()
                .zip(row.iter())
                .map(|(key, cell)| (key.clone(), cell.clone()))
                .collect::<Record>()
        })
        .collect()
}

/// Normalized header names in first-seen order, without duplicates.
pub fn column_names(header: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(header.len());
    for key in header.iter().map(|h| normalize_key(h)) {
        if !columns.contains(&key) {
            columns.push(key);
        }
    }
    columns
}

/// Converts flat JSON objects into records.
///
/// Returns the records together with the union of their normalized keys in
/// first-seen order. `null` becomes an absent value; numbers and booleans keep
/// their textual form.
pub fn records_from_json(objects: &[Map<String, Value>]) -> (Vec<String>, Vec<Record>) {
    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(objects.len());

    for object in objects {
        let mut record = Record::default();
        for (key, value) in object {
            let key = normalize_key(key);
            if !columns.contains(&key) {
                columns.push(key.clone());
            }
            match json_cell(value) {
                Some(cell) => {
                    record.data.insert(key, cell);
                }
                None => {
                    record.data.remove(&key);
                }
            }
        }
        records.push(record);
    }

    (columns, records)
}

fn json_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
