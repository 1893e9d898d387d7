//! HTTP transport for the analysis backend

use crate::client::analysis::AnalysisResult;
use crate::client::upload::ResumeFile;
use crate::error::{Result, ResumeAnalyzerError};
use log::{debug, error, info};
use reqwest::multipart::{Form, Part};
use std::future::Future;
use std::time::Duration;

const ANALYZE_ENDPOINT: &str = "/analyze";

/// Multipart payload for one analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub resume: ResumeFile,
    pub job_description: String,
}

/// Sends an analysis request and decodes the verdict.
pub trait AnalysisTransport: Send + Sync {
    fn submit(&self, request: AnalysisRequest) -> impl Future<Output = Result<AnalysisResult>> + Send;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Without a timeout the request may wait indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ANALYZE_ENDPOINT)
    }

    fn build_form(request: AnalysisRequest) -> Result<Form> {
        let AnalysisRequest { resume, job_description } = request;
        let part = Part::bytes(resume.bytes)
            .file_name(resume.name)
            .mime_str(&resume.mime_type)?;

        Ok(Form::new()
            .part("resume", part)
            .text("jobDescription", job_description))
    }
}

impl AnalysisTransport for HttpTransport {
    async fn submit(&self, request: AnalysisRequest) -> Result<AnalysisResult> {
        let url = self.endpoint();
        let form = Self::build_form(request)?;

        info!("Calling analysis API: {}", url);

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Analysis API error {}: {}", status, error_text);
            return Err(ResumeAnalyzerError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let response_text = response.text().await?;
        debug!("Raw API response: {}", response_text);

        let result: AnalysisResult = serde_json::from_str(&response_text)?;
        Ok(result)
    }
}
