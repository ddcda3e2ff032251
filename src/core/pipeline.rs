use crate::core::export::{self, ExportReport, CSV_FILENAME, JSON_FILENAME, ZIP_FILENAME};
use crate::core::query::sort_results;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{AnalysisResult, Dataset, FilterState, FilterValue, SourceFormat};
use crate::utils::error::{OdiError, Result};
use crate::utils::validation::is_remote;
use reqwest::Client;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub struct SurveyPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> SurveyPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        tracing::debug!("Fetching survey data from: {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("HTTP response status: {}", response.status());

        if !response.status().is_success() {
            return Err(OdiError::HttpStatusError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    async fn read_text(&self, path: &str) -> Result<String> {
        let bytes = self.storage.read_file(path).await?;
        String::from_utf8(bytes).map_err(|e| OdiError::ProcessingError {
            message: format!("{} is not valid UTF-8: {}", path, e),
        })
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }

    async fn save_state(&self, state: &FilterState) -> Result<()> {
        if let Some(path) = self.config.state_file() {
            let json = serde_json::to_string_pretty(state)?;
            self.storage.write_file(path, json.as_bytes()).await?;
            tracing::debug!("Filter state saved to {}", path);
        }
        Ok(())
    }
}

/// Picks the parser for a source. `Auto` looks at the extension, then at the
/// first non-blank character.
pub fn resolve_format(format: SourceFormat, source_name: &str, text: &str) -> SourceFormat {
    match format {
        SourceFormat::Auto => {
            let path = source_name.split(['?', '#']).next().unwrap_or(source_name);
            let extension = Path::new(path)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase());
            match extension.as_deref() {
                Some("json") => SourceFormat::Json,
                Some("csv") => SourceFormat::Csv,
                _ if text.trim_start().starts_with(['[', '{']) => SourceFormat::Json,
                _ => SourceFormat::Csv,
            }
        }
        explicit => explicit,
    }
}

pub fn dataset_from_text(format: SourceFormat, source_name: &str, text: &str) -> Result<Dataset> {
    match resolve_format(format, source_name, text) {
        SourceFormat::Json => Dataset::from_json_text(text, source_name),
        _ => Ok(Dataset::from_csv_text(text)),
    }
}

/// Filter selections that were reset to "all" because no response carries them.
pub fn dropped_filters<'a>(
    requested: &'a FilterState,
    applied: &FilterState,
) -> Vec<(&'static str, &'a str)> {
    [
        ("Volume", &requested.volume_filter, &applied.volume_filter),
        ("Channel", &requested.channel_filter, &applied.channel_filter),
    ]
    .into_iter()
    .filter_map(|(filter, before, after)| match before {
        FilterValue::Only(value) if before != after => Some((filter, value.as_str())),
        _ => None,
    })
    .collect()
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SurveyPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        let Some(input) = self.config.input() else {
            tracing::info!("No input given, using the demonstration survey");
            return Ok(Dataset::demo());
        };

        let dataset = if is_remote(input) {
            let fetched = self.fetch_text(input).await.and_then(|text| {
                dataset_from_text(self.config.source_format(), input, &text)
            });
            match fetched {
                Ok(dataset) => dataset,
                Err(e) if self.config.fallback_to_demo() => {
                    tracing::warn!("Could not load {} ({}), using demonstration data", input, e);
                    return Ok(Dataset::demo());
                }
                Err(e) => return Err(e),
            }
        } else {
            let text = self.read_text(input).await?;
            dataset_from_text(self.config.source_format(), input, &text)?
        };

        if dataset.columns.is_empty() {
            tracing::warn!("No header found in {}", input);
        }
        tracing::debug!(
            "Loaded {} responses with {} columns from {}",
            dataset.records.len(),
            dataset.columns.len(),
            input
        );
        Ok(dataset)
    }

    async fn restore_state(&self) -> Result<FilterState> {
        let mut state = FilterState::default();

        if let Some(path) = self.config.state_file() {
            if self.storage.exists(path).await {
                let bytes = self.storage.read_file(path).await?;
                match serde_json::from_slice::<FilterState>(&bytes) {
                    Ok(restored) => {
                        tracing::debug!("Restored filter state from {}", path);
                        state = restored;
                    }
                    // A corrupt snapshot is ignored, like an empty store.
                    Err(e) => tracing::warn!("Ignoring unreadable filter state {}: {}", path, e),
                }
            }
        }

        Ok(self.config.filter_overrides().apply_to(state))
    }

    async fn transform(&self, dataset: Dataset, state: FilterState) -> Result<AnalysisResult> {
        let survey_columns = self.config.survey_columns();
        let requested = state.clone();
        let mut result = dataset.analyze(state, &survey_columns);

        for (filter, value) in dropped_filters(&requested, &result.filter_state) {
            tracing::warn!(
                "{} filter value {:?} not found in the data, showing all responses",
                filter,
                value
            );
        }

        for warning in &result.warnings {
            tracing::warn!("{}", warning);
        }

        let sort = self.config.sort_spec();
        result.outcomes = sort_results(result.outcomes, sort.key, sort.direction);

        tracing::debug!(
            "{} filtered responses, {} scored outcomes",
            result.filtered_count,
            result.outcomes.len()
        );
        Ok(result)
    }

    async fn load(&self, result: AnalysisResult) -> Result<String> {
        self.save_state(&result.filter_state).await?;

        let mut files: Vec<(&str, String)> = Vec::new();
        if self.wants("csv") {
            files.push((CSV_FILENAME, export::to_csv(&result.outcomes)?));
        }
        if self.wants("json") {
            let report = ExportReport::new(&result);
            files.push((JSON_FILENAME, export::to_json_report(&report)?));
        }

        if self.config.zip_output() {
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, content) in &files {
                    zip.start_file::<_, ()>(*name, FileOptions::default())?;
                    zip.write_all(content.as_bytes())?;
                }
                zip.finish()?.into_inner()
            };

            let output_path = self.output_file(ZIP_FILENAME);
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&output_path, &zip_data).await?;
            return Ok(output_path);
        }

        let mut written = Vec::with_capacity(files.len());
        for (name, content) in &files {
            let output_path = self.output_file(name);
            self.storage
                .write_file(&output_path, content.as_bytes())
                .await?;
            written.push(output_path);
        }
        Ok(written.join(", "))
    }
}
