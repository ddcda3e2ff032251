pub mod analysis;
pub mod etl;
pub mod export;
pub mod normalizer;
pub mod pairs;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod scoring;

pub use crate::domain::model::{AnalysisResult, Dataset, Record, ScoredOutcome};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
