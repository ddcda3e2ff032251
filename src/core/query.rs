use crate::domain::model::{
    FilterState, Record, ScoredOutcome, SortDirection, SortKey, SurveyColumns,
};
use std::cmp::Ordering;

/// Keeps the records matching both categorical filters, in input order.
pub fn apply_filters<'a>(
    records: &'a [Record],
    state: &FilterState,
    columns: &SurveyColumns,
) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|r| state.volume_filter.matches(r.get(&columns.volume)))
        .filter(|r| state.channel_filter.matches(r.get(&columns.channel)))
        .collect()
}

/// Case-insensitive substring search on the outcome label.
pub fn apply_search(outcomes: Vec<ScoredOutcome>, query: &str) -> Vec<ScoredOutcome> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return outcomes;
    }
    outcomes
        .into_iter()
        .filter(|o| o.outcome.to_lowercase().contains(&query))
        .collect()
}

/// Stable sort by one column.
pub fn sort_results(
    mut outcomes: Vec<ScoredOutcome>,
    key: SortKey,
    direction: SortDirection,
) -> Vec<ScoredOutcome> {
    outcomes.sort_by(|a, b| {
        let ordering = compare_by(a, b, key);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    outcomes
}

fn compare_by(a: &ScoredOutcome, b: &ScoredOutcome, key: SortKey) -> Ordering {
    let numeric = |x: f64, y: f64| x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    match key {
        SortKey::Outcome => a.outcome.to_lowercase().cmp(&b.outcome.to_lowercase()),
        SortKey::Segment => a
            .segment
            .as_str()
            .to_lowercase()
            .cmp(&b.segment.as_str().to_lowercase()),
        SortKey::Importance => numeric(a.importance, b.importance),
        SortKey::Satisfaction => numeric(a.satisfaction, b.satisfaction),
        SortKey::OpportunityScore => numeric(a.opportunity_score, b.opportunity_score),
    }
}

/// Distinct non-blank values of `column`, in collation order.
pub fn distinct_sorted_values(records: &[Record], column: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for value in records.iter().filter_map(|r| r.get(column)) {
        if !value.trim().is_empty() && !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values.sort_by(|a, b| collate(a, b));
    values
}

/// Approximates a natural-language collation for Latin text.
///
/// Letters compare without accents or case first, then accented after plain,
/// then lowercase before uppercase.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = |s: &str| -> String { s.chars().map(fold_char).collect() };
    primary(a)
        .cmp(&primary(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn fold_char(ch: char) -> char {
    let lower = ch.to_lowercase().next().unwrap_or(ch);
    match lower {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FilterValue, Segment};

    fn survey_columns() -> SurveyColumns {
        SurveyColumns {
            volume: "Volume".to_string(),
            channel: "Canal".to_string(),
        }
    }

    fn response(volume: &str, channel: &str) -> Record {
        [("Volume", volume), ("Canal", channel)].into_iter().collect()
    }

    fn outcome(label: &str, importance: f64, satisfaction: f64, segment: Segment) -> ScoredOutcome {
        ScoredOutcome {
            outcome: label.to_string(),
            importance,
            satisfaction,
            opportunity_score: 2.0 * importance - satisfaction,
            segment,
        }
    }

    #[test]
    fn test_all_filters_are_identity() {
        let records = vec![response("Até 200", "Online"), response("Mais de 2.000", "Ambos")];
        let filtered = apply_filters(&records, &FilterState::default(), &survey_columns());
        assert_eq!(filtered.len(), 2);
        assert!(std::ptr::eq(filtered[0], &records[0]));
        assert!(std::ptr::eq(filtered[1], &records[1]));
    }

    #[test]
    fn test_filters_combine_exactly() {
        let records = vec![
            response("Até 200", "Online"),
            response("Até 200", "Ambos"),
            response("até 200", "Online"),
            Record::default(),
        ];
        let state = FilterState {
            volume_filter: FilterValue::Only("Até 200".to_string()),
            channel_filter: FilterValue::Only("Online".to_string()),
            search_text: String::new(),
        };

        let filtered = apply_filters(&records, &state, &survey_columns());
        assert_eq!(filtered.len(), 1);
        assert!(std::ptr::eq(filtered[0], &records[0]));
    }

    #[test]
    fn test_search_is_case_insensitive_and_blank_is_noop() {
        let outcomes = vec![
            outcome("Minimizar erros", 8.0, 5.0, Segment::UnderServed),
            outcome("Reduzir custos", 6.0, 6.0, Segment::AppropriatelyServed),
        ];

        let found = apply_search(outcomes.clone(), "  ERROS ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].outcome, "Minimizar erros");

        assert_eq!(apply_search(outcomes.clone(), "   "), outcomes);
    }

    #[test]
    fn test_sort_by_outcome_ignores_case() {
        let outcomes = vec![
            outcome("beta", 1.0, 1.0, Segment::AppropriatelyServed),
            outcome("Alpha", 1.0, 1.0, Segment::AppropriatelyServed),
            outcome("gamma", 1.0, 1.0, Segment::AppropriatelyServed),
        ];
        let sorted = sort_results(outcomes, SortKey::Outcome, SortDirection::Ascending);
        let labels: Vec<&str> = sorted.iter().map(|o| o.outcome.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let outcomes = vec![
            outcome("a", 5.0, 4.0, Segment::AppropriatelyServed),
            outcome("b", 9.0, 2.0, Segment::UnderServed),
            outcome("c", 5.0, 1.0, Segment::AppropriatelyServed),
        ];

        let asc = sort_results(outcomes.clone(), SortKey::Importance, SortDirection::Ascending);
        let labels: Vec<&str> = asc.iter().map(|o| o.outcome.as_str()).collect();
        assert_eq!(labels, vec!["a", "c", "b"]);

        let desc = sort_results(outcomes, SortKey::Importance, SortDirection::Descending);
        let labels: Vec<&str> = desc.iter().map(|o| o.outcome.as_str()).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_by_segment() {
        let outcomes = vec![
            outcome("a", 5.0, 9.0, Segment::OverServed),
            outcome("b", 9.0, 2.0, Segment::UnderServed),
            outcome("c", 5.0, 5.0, Segment::AppropriatelyServed),
        ];
        let sorted = sort_results(outcomes, SortKey::Segment, SortDirection::Ascending);
        let segments: Vec<Segment> = sorted.iter().map(|o| o.segment).collect();
        assert_eq!(
            segments,
            vec![Segment::AppropriatelyServed, Segment::OverServed, Segment::UnderServed]
        );
    }

    #[test]
    fn test_distinct_sorted_values() {
        let records = vec![
            response("Entre 200 e 2.000", "x"),
            response("Até 200 pedidos", "x"),
            response("  ", "x"),
            response("Entre 200 e 2.000", "x"),
            response("acima de 2.000", "x"),
            Record::default(),
        ];
        assert_eq!(
            distinct_sorted_values(&records, "Volume"),
            vec!["acima de 2.000", "Até 200 pedidos", "Entre 200 e 2.000"]
        );
        assert!(distinct_sorted_values(&records, "Missing").is_empty());
    }

    #[test]
    fn test_collate_orders_accents_and_case() {
        assert_eq!(collate("Ambos", "apenas"), Ordering::Less);
        assert_eq!(collate("e", "é"), Ordering::Less);
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("Órgão", "Outro"), Ordering::Less);
    }
}
