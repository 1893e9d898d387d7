//! Analysis API client
//! Owns the upload form, the request lifecycle, and the last analysis result

pub mod analysis;
pub mod transport;
pub mod upload;

pub use analysis::{AnalysisClient, AnalysisResult, RequestStatus};
pub use transport::{AnalysisRequest, AnalysisTransport, HttpTransport};
pub use upload::{ResumeFile, UploadState};
