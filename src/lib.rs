pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{
    etl::{EtlEngine, RunReport},
    pipeline::SurveyPipeline,
};
pub use domain::model::{
    AnalysisResult, Dataset, FilterState, FilterValue, ScoredOutcome, Segment, SortDirection,
    SortKey,
};
pub use utils::error::{OdiError, Result};
