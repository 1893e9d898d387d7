//! Upload form state

use crate::client::transport::AnalysisRequest;
use crate::error::{Result, ResumeAnalyzerError};
use crate::input::file_detector::FileType;

/// Upload limit quoted in the picker copy. Only warned about, never enforced.
pub const ADVISORY_MAX_BYTES: usize = 10 * 1024 * 1024;

/// A resume as picked by the user: name, MIME type and raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = FileType::from_file_name(&name).mime_type().to_string();
        Self { name, mime_type, bytes }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Human-readable reasons this file falls outside the advisory picker filter.
    pub fn advisory_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !FileType::from_file_name(&self.name).is_accepted_resume() {
            warnings.push(format!("{} is not a PDF or DOCX file", self.name));
        }
        if self.size() > ADVISORY_MAX_BYTES {
            warnings.push(format!("{} is larger than 10MB ({} bytes)", self.name, self.size()));
        }
        warnings
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub file: Option<ResumeFile>,
    pub job_description: String,
}

impl UploadState {
    /// Package the form for submission; fails when either field is missing.
    pub fn to_request(&self) -> Result<AnalysisRequest> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| ResumeAnalyzerError::MissingInput("no resume selected".to_string()))?;

        if self.job_description.is_empty() {
            return Err(ResumeAnalyzerError::MissingInput("job description is empty".to_string()));
        }

        Ok(AnalysisRequest {
            resume: file.clone(),
            job_description: self.job_description.clone(),
        })
    }
}
