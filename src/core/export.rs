use crate::domain::model::{AnalysisResult, FilterState, ScoredOutcome};
use crate::utils::error::{OdiError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const EXPORT_HEADER: [&str; 5] = [
    "Outcome",
    "Importância",
    "Satisfação",
    "Opportunity_Score",
    "Segment",
];

pub const CSV_FILENAME: &str = "odi_opportunity_scores.csv";
pub const JSON_FILENAME: &str = "odi_opportunity_scores.json";
pub const ZIP_FILENAME: &str = "odi_export.zip";

/// Formats with two decimals, rounding ties away from zero (`8.125` → `8.13`).
pub fn fixed2(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let value = if rounded.is_finite() { rounded } else { value };
    format!("{:.2}", value)
}

/// Serializes outcomes with two-decimal numbers, quoting only where needed.
pub fn to_csv(outcomes: &[ScoredOutcome]) -> Result<String> {
    if outcomes.is_empty() {
        return Err(OdiError::NothingToExport);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for o in outcomes {
        writer.write_record([
            o.outcome.clone(),
            fixed2(o.importance),
            fixed2(o.satisfaction),
            fixed2(o.opportunity_score),
            o.segment.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| OdiError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| OdiError::ProcessingError {
        message: format!("CSV export is not valid UTF-8: {}", e),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub filters: &'a FilterState,
    pub filtered_responses: usize,
    pub outcomes: &'a [ScoredOutcome],
}

impl<'a> ExportReport<'a> {
    pub fn new(result: &'a AnalysisResult) -> Self {
        Self {
            generated_at: Utc::now(),
            filters: &result.filter_state,
            filtered_responses: result.filtered_count,
            outcomes: &result.outcomes,
        }
    }
}

pub fn to_json_report(report: &ExportReport<'_>) -> Result<String> {
    if report.outcomes.is_empty() {
        return Err(OdiError::NothingToExport);
    }
    Ok(serde_json::to_string_pretty(report)?)
}

/// Plain-text table for terminals, one outcome per line.
pub fn to_table(outcomes: &[ScoredOutcome]) -> String {
    let width = outcomes
        .iter()
        .map(|o| o.outcome.chars().count())
        .chain(std::iter::once(EXPORT_HEADER[0].len()))
        .max()
        .unwrap_or_default();

    let mut out = format!(
        "{:<width$}  {:>11}  {:>11}  {:>17}  {}\n",
        EXPORT_HEADER[0],
        EXPORT_HEADER[1],
        EXPORT_HEADER[2],
        EXPORT_HEADER[3],
        EXPORT_HEADER[4],
    );
    for o in outcomes {
        out.push_str(&format!(
            "{:<width$}  {:>11}  {:>11}  {:>17}  {}\n",
            o.outcome,
            fixed2(o.importance),
            fixed2(o.satisfaction),
            fixed2(o.opportunity_score),
            o.segment,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse;
    use crate::domain::model::Segment;

    fn sample() -> Vec<ScoredOutcome> {
        vec![
            ScoredOutcome {
                outcome: "Minimizar custos, \"prazo\"".to_string(),
                importance: 29.0 / 3.0,
                satisfaction: 16.0 / 3.0,
                opportunity_score: 14.0,
                segment: Segment::UnderServed,
            },
            ScoredOutcome {
                outcome: "Minimizar erros".to_string(),
                importance: 8.0,
                satisfaction: 6.0,
                opportunity_score: 10.0,
                segment: Segment::AppropriatelyServed,
            },
        ]
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Outcome,Importância,Satisfação,Opportunity_Score,Segment");
        assert_eq!(lines[1], r#""Minimizar custos, ""prazo""",9.67,5.33,14.00,UNDER-SERVED"#);
        assert_eq!(lines[2], "Minimizar erros,8.00,6.00,10.00,APPROPRIATELY-SERVED");
    }

    #[test]
    fn test_csv_round_trip_through_parser() {
        let outcomes = sample();
        let table = parse(&to_csv(&outcomes).unwrap());

        assert_eq!(table.header, EXPORT_HEADER.to_vec());
        assert_eq!(table.rows.len(), outcomes.len());
        for (row, o) in table.rows.iter().zip(&outcomes) {
            assert_eq!(row[0], o.outcome);
            let importance: f64 = row[1].parse().unwrap();
            let satisfaction: f64 = row[2].parse().unwrap();
            let score: f64 = row[3].parse().unwrap();
            assert!((importance - o.importance).abs() <= 0.005);
            assert!((satisfaction - o.satisfaction).abs() <= 0.005);
            assert!((score - o.opportunity_score).abs() <= 0.005);
            assert_eq!(row[4], o.segment.as_str());
        }
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(fixed2(8.125), "8.13");
        assert_eq!(fixed2(0.625), "0.63");
        assert_eq!(fixed2(-8.125), "-8.13");
        assert_eq!(fixed2(10.0), "10.00");

        let outcomes = vec![ScoredOutcome {
            outcome: "X".to_string(),
            importance: 8.125,
            satisfaction: 0.625,
            opportunity_score: 15.625,
            segment: Segment::UnderServed,
        }];
        let csv = to_csv(&outcomes).unwrap();
        assert_eq!(csv.lines().nth(1), Some("X,8.13,0.63,15.63,UNDER-SERVED"));
        assert!(to_table(&outcomes).contains("15.63"));
    }

    #[test]
    fn test_empty_export_is_refused() {
        assert!(matches!(to_csv(&[]), Err(OdiError::NothingToExport)));
    }

    #[test]
    fn test_json_report() {
        let result = AnalysisResult {
            filtered_count: 3,
            outcomes: sample(),
            ..Default::default()
        };
        let json = to_json_report(&ExportReport::new(&result)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["filteredResponses"], 3);
        assert_eq!(value["filters"]["volumeFilter"], "__ALL__");
        assert_eq!(value["outcomes"][0]["segment"], "UNDER-SERVED");
        assert!(value["generatedAt"].is_string());
    }

    #[test]
    fn test_table_aligns_columns() {
        let table = to_table(&sample());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Outcome "));
        assert!(lines[1].ends_with("14.00  UNDER-SERVED"));
        assert!(lines[2].ends_with("10.00  APPROPRIATELY-SERVED"));
        let segment_at = |line: &str, segment: &str| {
            line.find(segment).map(|i| line[..i].chars().count())
        };
        assert_eq!(
            segment_at(lines[1], "UNDER-SERVED"),
            segment_at(lines[2], "APPROPRIATELY-SERVED")
        );
    }
}
