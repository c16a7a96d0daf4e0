//! Wire types for the analyze job-status endpoint.
//!
//! These types mirror the JSON payload returned by
//! `GET /text/analytics/{version}/analyze/jobs/{jobId}`: job metadata, one
//! raw result set per submitted task, and the continuation link to the next
//! page of results. They are deserialized as-is and then collated into the
//! caller-facing types in [`crate::results`].

use serde::Deserialize;

use crate::results::{
    AnalyzeSentimentResult, ExtractKeyPhrasesResult, RecognizeEntitiesResult,
    RecognizeLinkedEntitiesResult, RecognizePiiEntitiesResult,
};

/// The status of an analysis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobStatus {
    /// The job has been accepted but no task has started.
    NotStarted,
    /// At least one task is still running.
    Running,
    /// All tasks completed successfully.
    Succeeded,
    /// Some tasks completed and some failed.
    PartiallyCompleted,
    /// The job failed.
    Failed,
    /// The job was rejected by the service.
    Rejected,
    /// A cancellation request is being processed.
    Cancelling,
    /// The job was cancelled.
    Cancelled,
}

impl JobStatus {
    /// Returns `true` if the status is terminal and polling should stop.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded
                | Self::PartiallyCompleted
                | Self::Failed
                | Self::Rejected
                | Self::Cancelled
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "notStarted",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::PartiallyCompleted => "partiallyCompleted",
            Self::Failed => "failed",
            Self::Rejected => "rejected",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A service error object, as embedded in job states and per-document
/// errors.
///
/// When `innererror` is present it carries the more specific code and
/// message (e.g. `InvalidDocument` inside an outer `InvalidArgument`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub innererror: Option<InnerError>,
}

/// The inner, more specific error of an [`ErrorInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InnerError {
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    /// The most specific `(code, message)` pair, preferring `innererror`.
    pub fn detail(&self) -> (&str, &str) {
        match &self.innererror {
            Some(inner) => (&inner.code, &inner.message),
            None => (&self.code, &self.message),
        }
    }
}

/// A per-document error entry in a raw task result set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawDocumentError {
    pub id: String,
    pub error: ErrorInfo,
}

/// Batch-level statistics for one task result set.
///
/// Returned by the service when statistics were requested; the counts are
/// carried through to [`crate::results::TaskResult`] verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RequestStatistics {
    #[serde(rename = "documentsCount")]
    pub document_count: u32,
    #[serde(rename = "validDocumentsCount")]
    pub valid_document_count: u32,
    #[serde(rename = "erroneousDocumentsCount")]
    pub erroneous_document_count: u32,
    #[serde(rename = "transactionsCount")]
    pub transaction_count: u64,
}

/// Per-document statistics, present when statistics were requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TextDocumentStatistics {
    #[serde(rename = "charactersCount")]
    pub character_count: u32,
    #[serde(rename = "transactionsCount")]
    pub transaction_count: u32,
}

/// A non-fatal warning attached to a per-document result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextAnalyticsWarning {
    pub code: String,
    pub message: String,
}

/// One raw task entry in a job state: the task's reported name, its state,
/// and its result set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTaskResult<T> {
    pub name: Option<String>,
    pub state: Option<String>,
    pub last_update_date_time: Option<String>,
    pub results: RawTaskPayload<T>,
}

/// The raw result set of one task: successful documents and errored
/// documents in unspecified server order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct RawTaskPayload<T> {
    #[serde(default)]
    pub documents: Vec<T>,
    #[serde(default)]
    pub errors: Vec<RawDocumentError>,
    #[serde(default)]
    pub model_version: String,
    #[serde(default)]
    pub statistics: Option<RequestStatistics>,
}

/// The per-kind task result sets bundled in one job state.
///
/// A kind the caller did not request simply deserializes to an empty list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTasks {
    pub completed: Option<u32>,
    pub failed: Option<u32>,
    pub in_progress: Option<u32>,
    pub total: Option<u32>,
    #[serde(default)]
    pub entity_recognition_tasks: Vec<RawTaskResult<RecognizeEntitiesResult>>,
    #[serde(default)]
    pub entity_recognition_pii_tasks: Vec<RawTaskResult<RecognizePiiEntitiesResult>>,
    #[serde(default)]
    pub key_phrase_extraction_tasks: Vec<RawTaskResult<ExtractKeyPhrasesResult>>,
    #[serde(default)]
    pub sentiment_analysis_tasks: Vec<RawTaskResult<AnalyzeSentimentResult>>,
    #[serde(default)]
    pub entity_linking_tasks: Vec<RawTaskResult<RecognizeLinkedEntitiesResult>>,
}

/// One polling snapshot of an analysis job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJobState {
    pub job_id: Option<String>,
    pub display_name: Option<String>,
    pub status: JobStatus,
    pub created_date_time: Option<String>,
    pub last_update_date_time: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorInfo>,
    /// Continuation link to the next page of results; absent on the last
    /// page.
    pub next_link: Option<String>,
    #[serde(default)]
    pub tasks: JobTasks,
}
