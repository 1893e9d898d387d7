//! Error handling for the resume analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeAnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status}\n{body}")]
    Api { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The upload form is incomplete; nothing was sent.
    #[error("Please upload a resume and provide a job description ({0})")]
    MissingInput(String),

    /// A newer request already settled the displayed state.
    #[error("Response for request #{sequence} discarded: request #{current} is newer")]
    Superseded { sequence: u64, current: u64 },

    #[error("PDF export error: {0}")]
    PdfExport(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl ResumeAnalyzerError {
    /// User-input errors are reported as a notice, not as a failure of the run.
    pub fn is_user_input(&self) -> bool {
        matches!(self, ResumeAnalyzerError::MissingInput(_))
    }
}

pub type Result<T> = std::result::Result<T, ResumeAnalyzerError>;

impl From<printpdf::Error> for ResumeAnalyzerError {
    fn from(err: printpdf::Error) -> Self {
        ResumeAnalyzerError::PdfExport(format!("{:?}", err))
    }
}
