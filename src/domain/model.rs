use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Snapshot encoding of the "no filter" choice.
pub const ALL_SENTINEL: &str = "__ALL__";

pub const DEFAULT_VOLUME_COLUMN: &str = "Qual o volume de pedidos mensal da sua empresa?";
pub const DEFAULT_CHANNEL_COLUMN: &str = "Como a sua empresa realiza vendas atualmente??";

/// One survey response keyed by normalized column name.
///
/// A column missing from `data` is an absent value, which is distinct from
/// an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, String>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.data.get(column).map(String::as_str)
    }
}

impl AsRef<Record> for Record {
    fn as_ref(&self) -> &Record {
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Loaded survey responses plus the ordered, de-duplicated column list.
///
/// Constructors live in `core::analysis`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

/// Header plus data rows as produced by the delimited-text parser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPair {
    pub label: String,
    pub importance_column: String,
    pub satisfaction_column: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Segment {
    OverServed,
    UnderServed,
    AppropriatelyServed,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::OverServed => "OVER-SERVED",
            Segment::UnderServed => "UNDER-SERVED",
            Segment::AppropriatelyServed => "APPROPRIATELY-SERVED",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredOutcome {
    pub outcome: String,
    pub importance: f64,
    pub satisfaction: f64,
    pub opportunity_score: f64,
    pub segment: Segment,
}

/// A categorical filter selection: everything, or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterValue {
    #[default]
    All,
    Only(String),
}

impl FilterValue {
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::Only(expected) => value == Some(expected.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        if value.is_empty() || value == ALL_SENTINEL {
            FilterValue::All
        } else {
            FilterValue::Only(value)
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::from(value.to_string())
    }
}

impl From<FilterValue> for String {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::All => ALL_SENTINEL.to_string(),
            FilterValue::Only(v) => v,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::All => f.write_str("Todos"),
            FilterValue::Only(v) => f.write_str(v),
        }
    }
}

/// User-facing selections read on every recomputation.
///
/// Serializes to the `{ volumeFilter, channelFilter, searchText }` snapshot
/// kept by whatever store the host provides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub volume_filter: FilterValue,
    pub channel_filter: FilterValue,
    pub search_text: String,
}

/// Selections given explicitly by the host; each one replaces the restored
/// value when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOverrides {
    pub volume: Option<String>,
    pub channel: Option<String>,
    pub search: Option<String>,
}

impl FilterOverrides {
    pub fn apply_to(&self, mut state: FilterState) -> FilterState {
        if let Some(volume) = &self.volume {
            state.volume_filter = FilterValue::from(volume.as_str());
        }
        if let Some(channel) = &self.channel {
            state.channel_filter = FilterValue::from(channel.as_str());
        }
        if let Some(search) = &self.search {
            state.search_text = search.clone();
        }
        state
    }
}

/// Names of the two well-known categorical columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyColumns {
    pub volume: String,
    pub channel: String,
}

impl Default for SurveyColumns {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME_COLUMN.to_string(),
            channel: DEFAULT_CHANNEL_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Outcome,
    Importance,
    Satisfaction,
    #[default]
    #[serde(alias = "os")]
    OpportunityScore,
    Segment,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outcome" => Ok(SortKey::Outcome),
            "importance" | "importancia" => Ok(SortKey::Importance),
            "satisfaction" | "satisfacao" => Ok(SortKey::Satisfaction),
            "opportunity_score" | "os" => Ok(SortKey::OpportunityScore),
            "segment" => Ok(SortKey::Segment),
            other => Err(format!(
                "unknown sort key '{}' (expected outcome, importance, satisfaction, opportunity_score or segment)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[default]
    #[serde(alias = "desc")]
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction '{}' (expected asc or desc)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(default)]
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    #[default]
    Auto,
    Csv,
    Json,
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SourceFormat::Auto),
            "csv" => Ok(SourceFormat::Csv),
            "json" => Ok(SourceFormat::Json),
            other => Err(format!("unknown format '{}' (expected auto, csv or json)", other)),
        }
    }
}

/// Non-fatal conditions noticed while loading a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DatasetWarning {
    MissingExpectedColumn { column: String },
}

impl fmt::Display for DatasetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetWarning::MissingExpectedColumn { column } => {
                write!(f, "Column not found: \"{}\"", column)
            }
        }
    }
}

/// Option sets for the categorical filters, `FilterValue::All` first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub volume: Vec<FilterValue>,
    pub channel: Vec<FilterValue>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    pub filter_state: FilterState,
    pub filtered_count: usize,
    pub outcomes: Vec<ScoredOutcome>,
    pub options: FilterOptions,
    pub warnings: Vec<DatasetWarning>,
}
