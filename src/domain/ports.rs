use crate::domain::model::{
    AnalysisResult, Dataset, FilterOverrides, FilterState, SortSpec, SourceFormat, SurveyColumns,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Local path or http(s) URL; `None` means the demo dataset.
    fn input(&self) -> Option<&str>;
    fn source_format(&self) -> SourceFormat;
    fn fallback_to_demo(&self) -> bool;
    fn survey_columns(&self) -> SurveyColumns;
    fn filter_overrides(&self) -> FilterOverrides;
    fn sort_spec(&self) -> SortSpec;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn zip_output(&self) -> bool;
    /// JSON file holding the persisted `FilterState` snapshot.
    fn state_file(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn restore_state(&self) -> Result<FilterState>;
    async fn transform(&self, dataset: Dataset, state: FilterState) -> Result<AnalysisResult>;
    async fn load(&self, result: AnalysisResult) -> Result<String>;
}
