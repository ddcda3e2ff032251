use crate::domain::model::ColumnPair;

pub const IMPORTANCE_PREFIX: &str = "Importância - ";
pub const SATISFACTION_PREFIX: &str = "Satisfação - ";
/// Misspelling found in real survey exports; treated as equivalent.
pub const SATISFACTION_TYPO_PREFIX: &str = "Satistação - ";

const SATISFACTION_PREFIXES: [&str; 2] = [SATISFACTION_PREFIX, SATISFACTION_TYPO_PREFIX];

/// Matches every importance column with its satisfaction counterpart.
///
/// Output follows the order of importance columns in `columns`. Importance
/// columns without a counterpart are skipped.
///
/// Exact `Satisfação - <label>` and `Satistação - <label>` names win. Failing
/// that, any column starting with `Satisfação -` or `Satistação -` (the
/// trailing space is not required) matches when the text after its first
/// hyphen, trimmed, equals the label.
pub fn detect_pairs(columns: &[String]) -> Vec<ColumnPair> {
    columns
        .iter()
        .filter_map(|column| {
            let label = column.strip_prefix(IMPORTANCE_PREFIX)?.trim();
            let satisfaction = find_satisfaction_column(columns, label)?;
            Some(ColumnPair {
                label: label.to_string(),
                importance_column: column.clone(),
                satisfaction_column: satisfaction.clone(),
            })
        })
        .collect()
}

fn find_satisfaction_column<'a>(columns: &'a [String], label: &str) -> Option<&'a String> {
    for prefix in SATISFACTION_PREFIXES {
        let candidate = format!("{}{}", prefix, label);
        if let Some(found) = columns.iter().find(|c| **c == candidate) {
            return Some(found);
        }
    }

    // Spacing around the hyphen may differ from the importance column.
    columns.iter().find(|c| {
        SATISFACTION_PREFIXES
            .iter()
            .any(|p| c.starts_with(p.trim_end()))
            && c.split_once('-').map(|(_, rest)| rest.trim()) == Some(label)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detects_canonical_pair() {
        let cols = columns(&["Importância - X", "Satisfação - X"]);
        let pairs = detect_pairs(&cols);
        assert_eq!(
            pairs,
            vec![ColumnPair {
                label: "X".to_string(),
                importance_column: "Importância - X".to_string(),
                satisfaction_column: "Satisfação - X".to_string(),
            }]
        );
    }

    #[test]
    fn test_detects_misspelled_satisfaction() {
        let cols = columns(&["Importância - Y", "Satistação - Y"]);
        let pairs = detect_pairs(&cols);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].satisfaction_column, "Satistação - Y");
    }

    #[test]
    fn test_prefers_correct_spelling() {
        let cols = columns(&["Satistação - Z", "Importância - Z", "Satisfação - Z"]);
        let pairs = detect_pairs(&cols);
        assert_eq!(pairs[0].satisfaction_column, "Satisfação - Z");
    }

    #[test]
    fn test_fallback_scan_tolerates_spacing() {
        let cols = columns(&["Importância - Reduzir custos", "Satisfação -Reduzir custos"]);
        let pairs = detect_pairs(&cols);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].satisfaction_column, "Satisfação -Reduzir custos");
    }

    #[test]
    fn test_drops_unmatched_importance() {
        let cols = columns(&["Importância - A", "Satisfação - B", "Importância - B"]);
        let pairs = detect_pairs(&cols);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].label, "B");
    }

    #[test]
    fn test_order_follows_importance_columns_and_is_idempotent() {
        let cols = columns(&[
            "Satisfação - A",
            "Importância - C",
            "Importância - A",
            "Satistação - C",
            "Outra coluna",
        ]);
        let first = detect_pairs(&cols);
        let second = detect_pairs(&cols);
        assert_eq!(first, second);
        let labels: Vec<&str> = first.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["C", "A"]);
    }

    #[test]
    fn test_no_columns() {
        assert!(detect_pairs(&[]).is_empty());
    }
}
