//! Analysis client: request lifecycle and result ownership

use crate::client::transport::AnalysisTransport;
use crate::client::upload::{ResumeFile, UploadState};
use crate::error::{Result, ResumeAnalyzerError};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// Verdict returned by the analysis backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Match percentage, 0-100.
    pub similarity_score: f64,
    pub missing_keywords: Vec<String>,
    pub summary: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Default)]
struct ClientState {
    upload: UploadState,
    in_flight: usize,
    result: Option<AnalysisResult>,
    last_failure: Option<String>,
    /// Last sequence number handed out.
    issued: u64,
    /// Sequence number of the request that produced the displayed state.
    settled: u64,
}

pub struct AnalysisClient<T> {
    transport: T,
    state: Mutex<ClientState>,
}

/// Decrements the in-flight count however the request ends.
struct InFlight<'a> {
    state: &'a Mutex<ClientState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

impl<T: AnalysisTransport> AnalysisClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: Mutex::new(ClientState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn select_file(&self, file: ResumeFile) {
        for warning in file.advisory_warnings() {
            warn!("{}", warning);
        }
        debug!("Selected resume: {} ({} bytes, {})", file.name, file.size(), file.mime_type);
        self.lock().upload.file = Some(file);
    }

    pub fn set_job_description(&self, text: impl Into<String>) {
        self.lock().upload.job_description = text.into();
    }

    pub fn upload(&self) -> UploadState {
        self.lock().upload.clone()
    }

    pub fn result(&self) -> Option<AnalysisResult> {
        self.lock().result.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }

    pub fn last_failure(&self) -> Option<String> {
        self.lock().last_failure.clone()
    }

    pub fn status(&self) -> RequestStatus {
        let state = self.lock();
        if state.in_flight > 0 {
            RequestStatus::Loading
        } else if state.result.is_some() {
            RequestStatus::Succeeded
        } else if state.last_failure.is_some() {
            RequestStatus::Failed
        } else {
            RequestStatus::Idle
        }
    }

    /// Submit the current form.
    ///
    /// Incomplete forms fail with `MissingInput` before anything is sent. A
    /// response is applied only if no newer request has settled first;
    /// otherwise it is dropped with `Superseded`.
    pub async fn analyze(&self) -> Result<AnalysisResult> {
        let (sequence, request) = {
            let mut state = self.lock();
            let request = state.upload.to_request()?;
            state.issued += 1;
            state.in_flight += 1;
            state.last_failure = None;
            (state.issued, request)
        };
        let in_flight = InFlight { state: &self.state };

        info!("Submitting analysis request #{} for {}", sequence, request.resume.name);
        let outcome = self.transport.submit(request).await;
        let settled = self.settle(sequence, outcome);
        drop(in_flight);
        settled
    }

    /// Apply a response unless a newer request already settled the state.
    fn settle(&self, sequence: u64, outcome: Result<AnalysisResult>) -> Result<AnalysisResult> {
        let mut state = self.lock();
        if sequence < state.settled {
            warn!("Discarding response for request #{} (request #{} is newer)", sequence, state.settled);
            return Err(ResumeAnalyzerError::Superseded {
                sequence,
                current: state.settled,
            });
        }
        state.settled = sequence;

        match outcome {
            Ok(result) => {
                if !(0.0..=100.0).contains(&result.similarity_score) {
                    warn!("Similarity score out of range: {}", result.similarity_score);
                }
                state.result = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                error!("Error: {}", e);
                state.result = None;
                state.last_failure = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::AnalysisRequest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::oneshot;

    fn sample_result(score: f64) -> AnalysisResult {
        AnalysisResult {
            similarity_score: score,
            missing_keywords: vec!["aws".to_string(), "kubernetes".to_string()],
            summary: format!("Resume matches {}% with job description.", score),
            suggestion: "Consider including: aws, kubernetes".to_string(),
        }
    }

    enum Reply {
        Ok(AnalysisResult),
        Status(u16, &'static str),
    }

    struct StubTransport {
        reply: Reply,
        calls: AtomicUsize,
        seen: Mutex<Vec<AnalysisRequest>>,
    }

    impl StubTransport {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl AnalysisTransport for StubTransport {
        async fn submit(&self, request: AnalysisRequest) -> Result<AnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Reply::Ok(result) => Ok(result.clone()),
                Reply::Status(status, body) => Err(ResumeAnalyzerError::Api {
                    status: *status,
                    body: body.to_string(),
                }),
            }
        }
    }

    /// Holds every request open until the test releases it.
    #[derive(Default)]
    struct GatedTransport {
        waiting: Mutex<Vec<oneshot::Sender<Result<AnalysisResult>>>>,
    }

    impl GatedTransport {
        fn pending(&self) -> usize {
            self.waiting.lock().unwrap().len()
        }

        fn take(&self) -> Vec<oneshot::Sender<Result<AnalysisResult>>> {
            std::mem::take(&mut *self.waiting.lock().unwrap())
        }
    }

    impl AnalysisTransport for Arc<GatedTransport> {
        async fn submit(&self, _request: AnalysisRequest) -> Result<AnalysisResult> {
            let (tx, rx) = oneshot::channel();
            self.waiting.lock().unwrap().push(tx);
            rx.await
                .unwrap_or_else(|_| Err(ResumeAnalyzerError::InvalidInput("gate dropped".to_string())))
        }
    }

    fn filled_client<T: AnalysisTransport>(transport: T) -> AnalysisClient<T> {
        let client = AnalysisClient::new(transport);
        client.select_file(ResumeFile::new("resume.pdf", b"%PDF-1.7 fake".to_vec()));
        client.set_job_description("Senior Rust engineer with AWS and Kubernetes");
        client
    }

    async fn wait_for_pending(gate: &GatedTransport, count: usize) {
        while gate.pending() < count {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_missing_file_sends_nothing() {
        let client = AnalysisClient::new(StubTransport::new(Reply::Ok(sample_result(80.0))));
        client.set_job_description("Backend developer");

        let err = client.analyze().await.unwrap_err();

        assert!(err.is_user_input());
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 0);
        assert!(client.result().is_none());
        assert!(!client.is_loading());
        assert_eq!(client.status(), RequestStatus::Idle);
    }

    #[tokio::test]
    async fn test_missing_job_description_sends_nothing() {
        let client = AnalysisClient::new(StubTransport::new(Reply::Ok(sample_result(80.0))));
        client.select_file(ResumeFile::new("resume.docx", vec![0x50, 0x4b]));

        let err = client.analyze().await.unwrap_err();

        assert!(matches!(err, ResumeAnalyzerError::MissingInput(_)));
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 0);
        assert!(client.result().is_none());
    }

    #[tokio::test]
    async fn test_success_stores_result() {
        let client = filled_client(StubTransport::new(Reply::Ok(sample_result(80.0))));

        let result = client.analyze().await.unwrap();

        assert_eq!(result.similarity_score, 80.0);
        assert_eq!(client.result(), Some(result));
        assert!(!client.is_loading());
        assert_eq!(client.status(), RequestStatus::Succeeded);

        let seen = client.transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].resume.name, "resume.pdf");
        assert_eq!(seen[0].job_description, "Senior Rust engineer with AWS and Kubernetes");
    }

    #[tokio::test]
    async fn test_http_500_clears_result_and_loading() {
        let client = filled_client(StubTransport::new(Reply::Status(500, "internal error")));

        let err = client.analyze().await.unwrap_err();

        match err {
            ResumeAnalyzerError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal error");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(client.result().is_none());
        assert!(!client.is_loading());
        assert_eq!(client.status(), RequestStatus::Failed);
        assert!(client.last_failure().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_failure_discards_previous_result() {
        let gate = Arc::new(GatedTransport::default());
        let client = Arc::new(filled_client(gate.clone()));

        let first = tokio::spawn({
            let client = client.clone();
            async move { client.analyze().await }
        });
        wait_for_pending(&gate, 1).await;
        for tx in gate.take() {
            let _ = tx.send(Ok(sample_result(62.5)));
        }
        first.await.unwrap().unwrap();
        assert!(client.result().is_some());

        let second = tokio::spawn({
            let client = client.clone();
            async move { client.analyze().await }
        });
        wait_for_pending(&gate, 1).await;
        for tx in gate.take() {
            let _ = tx.send(Err(ResumeAnalyzerError::Api { status: 502, body: "bad gateway".to_string() }));
        }
        assert!(second.await.unwrap().is_err());

        assert!(client.result().is_none());
        assert_eq!(client.status(), RequestStatus::Failed);
    }

    #[tokio::test]
    async fn test_loading_while_in_flight() {
        let gate = Arc::new(GatedTransport::default());
        let client = Arc::new(filled_client(gate.clone()));

        let handle = tokio::spawn({
            let client = client.clone();
            async move { client.analyze().await }
        });
        wait_for_pending(&gate, 1).await;

        assert!(client.is_loading());
        assert_eq!(client.status(), RequestStatus::Loading);

        for tx in gate.take() {
            let _ = tx.send(Ok(sample_result(41.0)));
        }
        handle.await.unwrap().unwrap();
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn test_stale_response_does_not_overwrite_newer_result() {
        let gate = Arc::new(GatedTransport::default());
        let client = Arc::new(filled_client(gate.clone()));

        let older = tokio::spawn({
            let client = client.clone();
            async move { client.analyze().await }
        });
        wait_for_pending(&gate, 1).await;
        let newer = tokio::spawn({
            let client = client.clone();
            async move { client.analyze().await }
        });
        wait_for_pending(&gate, 2).await;

        let mut senders = gate.take();
        let older_tx = senders.remove(0);
        let newer_tx = senders.remove(0);

        let _ = newer_tx.send(Ok(sample_result(90.0)));
        assert_eq!(newer.await.unwrap().unwrap().similarity_score, 90.0);
        assert!(client.is_loading());

        let _ = older_tx.send(Ok(sample_result(10.0)));
        let stale = older.await.unwrap().unwrap_err();

        assert!(matches!(stale, ResumeAnalyzerError::Superseded { sequence: 1, current: 2 }));
        assert_eq!(client.result().unwrap().similarity_score, 90.0);
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_clear_newer_result() {
        let gate = Arc::new(GatedTransport::default());
        let client = Arc::new(filled_client(gate.clone()));

        let older = tokio::spawn({
            let client = client.clone();
            async move { client.analyze().await }
        });
        wait_for_pending(&gate, 1).await;
        let newer = tokio::spawn({
            let client = client.clone();
            async move { client.analyze().await }
        });
        wait_for_pending(&gate, 2).await;

        let mut senders = gate.take();
        let older_tx = senders.remove(0);
        let _ = senders.remove(0).send(Ok(sample_result(77.0)));
        newer.await.unwrap().unwrap();

        let _ = older_tx.send(Err(ResumeAnalyzerError::Api { status: 500, body: String::new() }));
        assert!(older.await.unwrap().is_err());

        assert_eq!(client.result().unwrap().similarity_score, 77.0);
        assert_eq!(client.status(), RequestStatus::Succeeded);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_loading_clears_only_after_result_is_stored() {
        let gate = Arc::new(GatedTransport::default());
        let client = Arc::new(filled_client(gate.clone()));

        let handle = tokio::spawn({
            let client = client.clone();
            async move { client.analyze().await }
        });
        wait_for_pending(&gate, 1).await;

        let watcher = std::thread::spawn({
            let client = client.clone();
            move || {
                let mut observed = Vec::new();
                loop {
                    let status = client.status();
                    observed.push(status);
                    if status == RequestStatus::Succeeded {
                        return observed;
                    }
                }
            }
        });

        for tx in gate.take() {
            let _ = tx.send(Ok(sample_result(55.0)));
        }
        handle.await.unwrap().unwrap();

        let observed = watcher.join().unwrap();
        assert!(observed
            .iter()
            .all(|status| matches!(status, RequestStatus::Loading | RequestStatus::Succeeded)));
    }
}
