use crate::core::Pipeline;
use crate::domain::model::AnalysisResult;
use crate::utils::error::Result;

/// Outcome of a full run: the analysis and where it was written.
#[derive(Debug)]
pub struct RunReport {
    pub result: AnalysisResult,
    pub output_path: String,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Extract, restore filters, analyze. Nothing is written.
    pub async fn analyze(&self) -> Result<AnalysisResult> {
        tracing::info!("Loading survey responses...");
        let dataset = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} responses ({} columns)",
            dataset.records.len(),
            dataset.columns.len()
        );

        let state = self.pipeline.restore_state().await?;
        tracing::debug!("Active filters: {:?}", state);

        let result = self.pipeline.transform(dataset, state).await?;
        tracing::info!(
            "Scored {} outcomes over {} filtered responses",
            result.outcomes.len(),
            result.filtered_count
        );
        Ok(result)
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting opportunity analysis...");

        let result = self.analyze().await?;

        tracing::info!("Exporting results...");
        let output_path = self.pipeline.load(result.clone()).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunReport {
            result,
            output_path,
        })
    }
}
