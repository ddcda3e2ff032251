use crate::core::normalizer::{column_names, records_from_json, to_records};
use crate::core::pairs::detect_pairs;
use crate::core::parser::parse;
use crate::core::query::{apply_filters, apply_search, distinct_sorted_values};
use crate::core::scoring::compute;
use crate::domain::model::{
    AnalysisResult, Dataset, DatasetWarning, FilterOptions, FilterState, FilterValue, Record,
    ScoredOutcome, SurveyColumns,
};
use crate::utils::error::{OdiError, Result};
use serde_json::{Map, Value};

const DEMO_ROWS: [[&str; 14]; 4] = [
    [
        "Submission ID",
        "Respondent ID",
        "Submitted at",
        "idEmpresa",
        "idUsuario",
        "Qual é a sua função na empresa?",
        "Qual o volume de pedidos mensal da sua empresa?",
        "Como a sua empresa realiza vendas atualmente??",
        "Importância - Minimizar erros",
        "Satisfação - Minimizar erros",
        "Importância - Minimizar tempo",
        "Satistação - Minimizar tempo",
        "Importância - Minimizar custos",
        "Satisfação - Minimizar custos",
    ],
    [
        "1",
        "A",
        "2025-10-01",
        "x",
        "y",
        "Resp. Financeiro",
        "Até 200 pedidos",
        "Ambos os canais (online e offline)",
        "9",
        "6",
        "8",
        "7",
        "10",
        "6",
    ],
    [
        "2",
        "B",
        "2025-10-02",
        "x",
        "y",
        "Sócio",
        "Entre 200 e 2.000",
        "Apenas online (e-commerce, redes sociais, marketplaces etc.)",
        "8",
        "7",
        "9",
        "6",
        "10",
        "5",
    ],
    [
        "3",
        "C",
        "2025-10-03",
        "x",
        "y",
        "Resp. Financeiro",
        "Entre 200 e 2.000",
        "Ambos os canais (online e offline)",
        "7",
        "5",
        "9",
        "6",
        "9",
        "5",
    ],
];

impl Dataset {
    /// Builds a dataset from comma-separated text. Blank or header-less text
    /// gives an empty dataset.
    pub fn from_csv_text(text: &str) -> Self {
        let table = parse(text);
        Self {
            columns: column_names(&table.header),
            records: to_records(&table.header, &table.rows),
        }
    }

    /// Accepts either a JSON array of flat records or `{ "rows": [...] }`.
    ///
    /// Array items that are not objects are skipped.
    pub fn from_json_text(text: &str, source_name: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut object) => match object.remove("rows") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        let objects: Vec<Map<String, Value>> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(object) => Some(object),
                _ => None,
            })
            .collect();

        if objects.is_empty() {
            return Err(OdiError::EmptyDataset {
                source_name: source_name.to_string(),
            });
        }

        let (columns, records) = records_from_json(&objects);
        Ok(Self { columns, records })
    }

    /// Three-respondent sample survey used when no data source is given.
    pub fn demo() -> Self {
        let to_strings = |row: &[&str; 14]| row.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        let header = to_strings(&DEMO_ROWS[0]);
        let rows: Vec<Vec<String>> = DEMO_ROWS[1..].iter().map(to_strings).collect();
        Self {
            columns: column_names(&header),
            records: to_records(&header, &rows),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Well-known columns that the dataset lacks.
    pub fn missing_columns(&self, survey_columns: &SurveyColumns) -> Vec<DatasetWarning> {
        [&survey_columns.volume, &survey_columns.channel]
            .into_iter()
            .filter(|column| !self.columns.contains(column))
            .map(|column| DatasetWarning::MissingExpectedColumn {
                column: column.clone(),
            })
            .collect()
    }

    pub fn filter_options(&self, survey_columns: &SurveyColumns) -> FilterOptions {
        let options = |column: &str| -> Vec<FilterValue> {
            std::iter::once(FilterValue::All)
                .chain(
                    distinct_sorted_values(&self.records, column)
                        .into_iter()
                        .map(FilterValue::Only),
                )
                .collect()
        };
        FilterOptions {
            volume: options(&survey_columns.volume),
            channel: options(&survey_columns.channel),
        }
    }

    pub fn recompute(&self, state: &FilterState, survey_columns: &SurveyColumns) -> Vec<ScoredOutcome> {
        recompute(&self.columns, &self.records, state, survey_columns)
    }

    /// Full pass used by hosts: options, warnings, filtered count and the
    /// searched outcomes in canonical order.
    pub fn analyze(&self, state: FilterState, survey_columns: &SurveyColumns) -> AnalysisResult {
        let options = self.filter_options(survey_columns);
        let state = state.sanitize(&options);
        let filtered_count = apply_filters(&self.records, &state, survey_columns).len();
        let outcomes = self.recompute(&state, survey_columns);

        AnalysisResult {
            warnings: self.missing_columns(survey_columns),
            filter_state: state,
            filtered_count,
            outcomes,
            options,
        }
    }
}

impl FilterState {
    /// Resets filter values that are not among the available options.
    pub fn sanitize(mut self, options: &FilterOptions) -> Self {
        if !options.volume.contains(&self.volume_filter) {
            self.volume_filter = FilterValue::All;
        }
        if !options.channel.contains(&self.channel_filter) {
            self.channel_filter = FilterValue::All;
        }
        self
    }
}

/// Filter, pair, score and search in one pure pass.
///
/// Output is in the engine's canonical order (opportunity score descending);
/// any other ordering is a view concern.
pub fn recompute(
    columns: &[String],
    records: &[Record],
    state: &FilterState,
    survey_columns: &SurveyColumns,
) -> Vec<ScoredOutcome> {
    let filtered = apply_filters(records, state, survey_columns);
    let pairs = detect_pairs(columns);
    let outcomes = compute(&pairs, &filtered);
    apply_search(outcomes, &state.search_text)
}
