//! Configuration management for the resume analyzer

use crate::error::{Result, ResumeAnalyzerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "RESUME_ANALYZER_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the analysis backend; `/analyze` is appended per request.
    pub base_url: String,
    /// Request timeout. Unset means the transport waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Per-run override from the environment. Never written back to disk.
    #[serde(skip)]
    pub url_override: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    /// Directory that receives `resume_match_report.pdf`.
    pub export_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000".to_string(),
                timeout_secs: None,
                url_override: None,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                export_dir: PathBuf::from("."),
            },
        }
    }
}

impl Config {
    /// Load the file at `config_path`, creating it with defaults on first use.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            toml::from_str::<Config>(&content)
                .map_err(|e| ResumeAnalyzerError::Configuration(format!("Failed to parse config: {}", e)))?
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            config
        };

        Ok(config.with_url_override(std::env::var(API_URL_ENV).ok()))
    }

    /// Attach a per-run API URL. Blank values are ignored.
    pub fn with_url_override(mut self, url: Option<String>) -> Self {
        self.api.url_override = url.filter(|url| !url.trim().is_empty());
        self
    }

    /// Base URL for this run: the override if present, else the stored value.
    pub fn effective_base_url(&self) -> &str {
        self.api.url_override.as_deref().unwrap_or(&self.api.base_url)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeAnalyzerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-analyzer")
            .join("config.toml")
    }

    /// Set a single value by dotted key, e.g. `api.base_url`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                if value.trim().is_empty() {
                    return Err(ResumeAnalyzerError::InvalidInput("api.base_url cannot be empty".to_string()));
                }
                self.api.base_url = value.trim_end_matches('/').to_string();
            }
            "api.timeout_secs" => {
                self.api.timeout_secs = match value {
                    "" | "none" => None,
                    secs => Some(secs.parse().map_err(|_| {
                        ResumeAnalyzerError::InvalidInput(format!("Invalid timeout: {}", secs))
                    })?),
                };
            }
            "output.format" => {
                self.output.format = crate::cli::parse_output_format(value)
                    .map_err(ResumeAnalyzerError::InvalidInput)?;
            }
            "output.color_output" => {
                self.output.color_output = value.parse().map_err(|_| {
                    ResumeAnalyzerError::InvalidInput(format!("Expected true or false, got: {}", value))
                })?;
            }
            "output.export_dir" => {
                self.output.export_dir = PathBuf::from(value);
            }
            _ => {
                return Err(ResumeAnalyzerError::Configuration(format!(
                    "Unknown configuration key: {}. Supported: api.base_url, api.timeout_secs, output.format, output.color_output, output.export_dir",
                    key
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.api.timeout_secs.map(std::time::Duration::from_secs)
    }
}
