pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{
    FilterOverrides, SortDirection, SortKey, SortSpec, SourceFormat, SurveyColumns,
};
#[cfg(feature = "cli")]
use crate::utils::error::{OdiError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "odi-map")]
#[command(about = "Opportunity scores for Outcome-Driven Innovation surveys")]
pub struct CliConfig {
    /// Survey CSV/JSON file or http(s) URL
    #[arg(short, long)]
    pub input: Option<String>,

    /// Use the built-in demonstration survey
    #[arg(long, conflicts_with = "input")]
    pub demo: bool,

    /// Input format: auto, csv or json
    #[arg(long, default_value = "auto")]
    pub format: SourceFormat,

    /// Keep only responses with this order volume ("__ALL__" clears it)
    #[arg(long)]
    pub volume: Option<String>,

    /// Keep only responses with this sales channel ("__ALL__" clears it)
    #[arg(long)]
    pub channel: Option<String>,

    /// Case-insensitive search on outcome labels
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long, default_value = "opportunity_score")]
    pub sort_key: SortKey,

    #[arg(long, default_value = "desc")]
    pub sort_dir: SortDirection,

    /// Override the name of the order volume column
    #[arg(long)]
    pub volume_column: Option<String>,

    /// Override the name of the sales channel column
    #[arg(long)]
    pub channel_column: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub output_formats: Vec<String>,

    /// Bundle the exported files into a ZIP archive
    #[arg(long)]
    pub zip: bool,

    /// JSON file used to restore and save the filter selections
    #[arg(long)]
    pub state_file: Option<String>,

    /// Use the demo survey when a URL source cannot be fetched
    #[arg(long)]
    pub fallback_to_demo: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    fn source_format(&self) -> SourceFormat {
        self.format
    }

    fn fallback_to_demo(&self) -> bool {
        self.fallback_to_demo
    }

    fn survey_columns(&self) -> SurveyColumns {
        let defaults = SurveyColumns::default();
        SurveyColumns {
            volume: self.volume_column.clone().unwrap_or(defaults.volume),
            channel: self.channel_column.clone().unwrap_or(defaults.channel),
        }
    }

    fn filter_overrides(&self) -> FilterOverrides {
        FilterOverrides {
            volume: self.volume.clone(),
            channel: self.channel.clone(),
            search: self.search.clone(),
        }
    }

    fn sort_spec(&self) -> SortSpec {
        SortSpec {
            key: self.sort_key,
            direction: self.sort_dir,
        }
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn zip_output(&self) -> bool {
        self.zip
    }

    fn state_file(&self) -> Option<&str> {
        self.state_file.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.input {
            Some(input) => validation::validate_input("input", input)?,
            None if !self.demo => {
                return Err(OdiError::MissingConfigError {
                    field: "input (or --demo)".to_string(),
                })
            }
            None => {}
        }

        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;

        if let Some(state_file) = &self.state_file {
            validation::validate_path("state_file", state_file)?;
        }
        if let Some(column) = &self.volume_column {
            validation::validate_non_empty_string("volume_column", column)?;
        }
        if let Some(column) = &self.channel_column {
            validation::validate_non_empty_string("channel_column", column)?;
        }
        Ok(())
    }
}
