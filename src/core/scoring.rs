//! Opportunity Score aggregation.
//!
//! Ratings are on a fixed 0–10 scale. `OS = 2·I − S`; an outcome is
//! over-served when `S > I` and under-served when `S < 2·I − 10`.

use crate::domain::model::{ColumnPair, Record, ScoredOutcome, Segment};

/// Upper bound of the rating scale the under-served boundary is derived from.
const SCALE_MAX: f64 = 10.0;

/// Scores every pair over `records`, highest opportunity first.
///
/// Pairs with no numeric value on either side are omitted. Ties keep the
/// order of `pairs`.
pub fn compute<R: AsRef<Record>>(pairs: &[ColumnPair], records: &[R]) -> Vec<ScoredOutcome> {
    let mut outcomes: Vec<ScoredOutcome> = pairs
        .iter()
        .filter_map(|pair| score_pair(pair, records))
        .collect();

    outcomes.sort_by(|a, b| {
        b.opportunity_score
            .partial_cmp(&a.opportunity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    outcomes
}

fn score_pair<R: AsRef<Record>>(pair: &ColumnPair, records: &[R]) -> Option<ScoredOutcome> {
    let importance_values = column_values(records, &pair.importance_column);
    let satisfaction_values = column_values(records, &pair.satisfaction_column);

    if importance_values.is_empty() && satisfaction_values.is_empty() {
        return None;
    }

    // One side may still be empty; its mean is 0.
    let importance = mean(&importance_values);
    let satisfaction = mean(&satisfaction_values);

    Some(ScoredOutcome {
        outcome: pair.label.clone(),
        importance,
        satisfaction,
        opportunity_score: opportunity_score(importance, satisfaction),
        segment: classify(importance, satisfaction),
    })
}

pub fn opportunity_score(importance: f64, satisfaction: f64) -> f64 {
    2.0 * importance - satisfaction
}

pub fn classify(importance: f64, satisfaction: f64) -> Segment {
    let underserved_boundary = 2.0 * importance - SCALE_MAX;
    if satisfaction > importance {
        Segment::OverServed
    } else if satisfaction < underserved_boundary {
        Segment::UnderServed
    } else {
        Segment::AppropriatelyServed
    }
}

fn column_values<R: AsRef<Record>>(records: &[R], column: &str) -> Vec<f64> {
    records
        .iter()
        .filter_map(|r| to_number(r.as_ref().get(column)))
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len().max(1) as f64
}

/// Reads a rating cell.
///
/// Trims, accepts one comma as decimal separator and parses the longest
/// leading float literal, so `"9 (muito)"` reads as 9. Absent, blank,
/// non-numeric and non-finite cells give `None`.
pub fn to_number(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let text = trimmed.replacen(',', ".", 1);
    let literal = leading_float_literal(&text)?;
    literal.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn leading_float_literal(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&text[..end])
}
