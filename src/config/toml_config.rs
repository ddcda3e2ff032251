use crate::core::ConfigProvider;
use crate::domain::model::{FilterOverrides, SortSpec, SourceFormat, SurveyColumns};
use crate::utils::error::{OdiError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub analysis: AnalysisInfo,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub filters: FilterOverrides,
    pub columns: Option<ColumnsConfig>,
    #[serde(default)]
    pub sort: SortSpec,
    pub load: LoadConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Local file or http(s) URL; absent means the demo survey.
    pub input: Option<String>,
    #[serde(default)]
    pub format: SourceFormat,
    pub fallback_to_demo: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsConfig {
    pub volume: Option<String>,
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub zip: Option<bool>,
    pub state_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OdiError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| OdiError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SURVEY_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| OdiError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("analysis.name", &self.analysis.name)?;

        if let Some(input) = &self.source.input {
            validation::validate_input("source.input", input)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(state_file) = &self.load.state_file {
            validation::validate_path("load.state_file", state_file)?;
        }

        if let Some(columns) = &self.columns {
            if let Some(volume) = &columns.volume {
                validation::validate_non_empty_string("columns.volume", volume)?;
            }
            if let Some(channel) = &columns.channel {
                validation::validate_non_empty_string("columns.channel", channel)?;
            }
        }

        Ok(())
    }

    pub fn is_demo(&self) -> bool {
        self.source.input.is_none()
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input(&self) -> Option<&str> {
        self.source.input.as_deref()
    }

    fn source_format(&self) -> SourceFormat {
        self.source.format
    }

    fn fallback_to_demo(&self) -> bool {
        self.source.fallback_to_demo.unwrap_or(false)
    }

    fn survey_columns(&self) -> SurveyColumns {
        let defaults = SurveyColumns::default();
        match &self.columns {
            Some(columns) => SurveyColumns {
                volume: columns.volume.clone().unwrap_or(defaults.volume),
                channel: columns.channel.clone().unwrap_or(defaults.channel),
            },
            None => defaults,
        }
    }

    fn filter_overrides(&self) -> FilterOverrides {
        self.filters.clone()
    }

    fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn zip_output(&self) -> bool {
        self.load.zip.unwrap_or(false)
    }

    fn state_file(&self) -> Option<&str> {
        self.load.state_file.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{SortDirection, SortKey};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[analysis]
name = "pesquisa-2025"
description = "ODI survey, October wave"

[source]
input = "respostas.csv"
format = "csv"

[filters]
channel = "Apenas online"
search = "erros"

[columns]
volume = "Volume mensal"

[sort]
key = "os"
direction = "asc"

[load]
output_path = "./odi-output"
output_formats = ["csv", "json"]
zip = true
state_file = "./odi-output/filters.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.name, "pesquisa-2025");
        assert_eq!(config.input(), Some("respostas.csv"));
        assert_eq!(config.source_format(), SourceFormat::Csv);
        assert_eq!(config.sort_spec().key, SortKey::OpportunityScore);
        assert_eq!(config.sort_spec().direction, SortDirection::Ascending);
        assert_eq!(config.survey_columns().volume, "Volume mensal");
        assert_eq!(
            config.survey_columns().channel,
            SurveyColumns::default().channel
        );
        assert_eq!(config.filter_overrides().search.as_deref(), Some("erros"));
        assert!(config.filter_overrides().volume.is_none());
        assert!(config.zip_output());
        assert!(!config.is_demo());
    }

    #[test]
    fn test_minimal_config_uses_demo() {
        let toml_content = r#"
[analysis]
name = "demo"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.is_demo());
        assert_eq!(config.sort_spec(), SortSpec::default());
        assert!(!config.verbose());
        assert!(config.state_file().is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ODI_TEST_SURVEY_URL", "https://surveys.example.com/export.csv");

        let toml_content = r#"
[analysis]
name = "remote"

[source]
input = "${ODI_TEST_SURVEY_URL}"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.input(),
            Some("https://surveys.example.com/export.csv")
        );

        std::env::remove_var("ODI_TEST_SURVEY_URL");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[analysis]
name = "bad"

[source]
input = "respostas.xlsx"

[load]
output_path = "./output"
output_formats = ["tsv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[analysis\nname=").unwrap_err();
        assert!(matches!(err, OdiError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[analysis]
name = "file-test"

[load]
output_path = "./output"
output_formats = ["json"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.analysis.name, "file-test");
    }
}
