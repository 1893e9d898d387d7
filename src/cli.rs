//! CLI interface for the resume analyzer

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-analyzer")]
#[command(about = "Resume and job description match analysis client")]
#[command(long_about = "Upload a resume and a job description to the analysis API, then view or export the match report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a resume and job description to the analysis API
    Analyze(AnalyzeArgs),

    /// Render a markdown-like narrative analysis text file
    Narrative {
        /// Path to the narrative text file
        file: PathBuf,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to resume file (PDF or DOCX)
    #[arg(short, long)]
    pub resume: Option<PathBuf>,

    /// Job description text
    #[arg(short, long, conflicts_with = "job_file")]
    pub job: Option<String>,

    /// Path to job description file (TXT, MD)
    #[arg(long)]
    pub job_file: Option<PathBuf>,

    /// Output format: console, json, markdown, html
    #[arg(short, long)]
    pub output: Option<String>,

    /// Save formatted output to file
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Export the rendered report as resume_match_report.pdf
    #[arg(short, long)]
    pub export: bool,

    /// Directory for the exported PDF (defaults to output.export_dir)
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Override the analysis API base URL
    #[arg(long)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "api.base_url")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "html" => Ok(crate::config::OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
