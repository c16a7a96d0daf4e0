//! Submission and polling of batch analysis jobs.
//!
//! The analyze API is asynchronous: a submit request returns
//! `202 Accepted` with an `Operation-Location` header whose trailing path
//! segment is the job id, and the client polls the job-status endpoint
//! until the job reaches a terminal state. A terminal job may still span
//! multiple result pages; see [`crate::paging`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_text_analytics_core::client::TextAnalyticsClient;
//! use azure_text_analytics_core::auth::TextAnalyticsCredential;
//! use azure_text_analytics_batch::analyze;
//! use azure_text_analytics_batch::input::TextDocumentInput;
//! use azure_text_analytics_batch::tasks::{AnalyzeBatchRequest, EntitiesRecognitionTask, KeyPhraseExtractionTask};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TextAnalyticsClient::builder()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .credential(TextAnalyticsCredential::api_key("your-key"))
//!     .build()?;
//!
//! let request = AnalyzeBatchRequest::builder()
//!     .documents(vec![
//!         TextDocumentInput::new("1", "I had a wonderful trip to Seattle last week."),
//!         TextDocumentInput::new("2", "I'm flying to NYC tomorrow. See you there."),
//!     ])
//!     .entities_recognition_tasks(vec![EntitiesRecognitionTask::new()])
//!     .key_phrase_extraction_tasks(vec![KeyPhraseExtractionTask::new()])
//!     .build()?;
//!
//! let job = analyze::begin_analyze(&client, &request).await?;
//! let mut pager = job
//!     .wait_until_complete(std::time::Duration::from_secs(5), 60)
//!     .await?;
//!
//! while let Some(page) = pager.next_page().await? {
//!     for task in &page.key_phrase_extraction_results {
//!         for result in &task.results {
//!             if !result.is_error() {
//!                 println!("{}: {:?}", result.id(), result.key_phrases()?);
//!             }
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use azure_text_analytics_core::client::TextAnalyticsClient;
use azure_text_analytics_core::error::{TextAnalyticsError, TextAnalyticsResult};

use crate::continuation::ContinuationToken;
use crate::models::{AnalyzeJobState, JobStatus};
use crate::paging::AnalyzeResultPager;
use crate::tasks::AnalyzeBatchRequest;

/// Submit a batch of documents for analysis.
///
/// Returns an [`AnalyzeJobHandle`] capturing the job id and the submitted
/// document order, which every later page is reordered against.
///
/// # Errors
///
/// Returns [`TextAnalyticsError::Api`] if the response carries no
/// `Operation-Location` header, or any transport/service error from the
/// submit call.
///
/// # Tracing
///
/// Emits a span named `textanalytics::analyze::begin` with field
/// `document_count`.
#[tracing::instrument(
    name = "textanalytics::analyze::begin",
    skip(client, request),
    fields(document_count = request.documents.len())
)]
pub async fn begin_analyze(
    client: &TextAnalyticsClient,
    request: &AnalyzeBatchRequest,
) -> TextAnalyticsResult<AnalyzeJobHandle> {
    tracing::debug!("submitting analysis job");

    let response = client.post("/analyze", &request.body()).await?;

    let operation_location = response
        .headers()
        .get("Operation-Location")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| TextAnalyticsError::Api {
            code: "MissingHeader".into(),
            message: "Operation-Location header missing from response".into(),
        })?;

    // The Operation-Location has the same shape as a continuation link:
    // job id in the trailing path segment.
    let token = ContinuationToken::parse(&operation_location)?;

    tracing::debug!(job_id = %token.job_id, "analysis job submitted");

    Ok(AnalyzeJobHandle {
        client: client.clone(),
        job_id: token.job_id,
        doc_id_order: request.document_ids(),
        show_stats: request.show_stats,
        top: request.top,
        skip: request.skip,
    })
}

/// Fetch one job-state snapshot.
///
/// Idempotent and safe to call repeatedly. `show_stats`, `top`, and `skip`
/// are forwarded as the `showStats`, `$top`, and `$skip` query parameters.
///
/// # Tracing
///
/// Emits a span named `textanalytics::analyze::status` with field `job_id`.
#[tracing::instrument(
    name = "textanalytics::analyze::status",
    skip(client),
    fields(job_id = %job_id)
)]
pub async fn analyze_status(
    client: &TextAnalyticsClient,
    job_id: &str,
    show_stats: bool,
    top: Option<i32>,
    skip: Option<i32>,
) -> TextAnalyticsResult<AnalyzeJobState> {
    let mut path = format!("analyze/jobs/{job_id}?showStats={show_stats}");
    if let Some(top) = top {
        path.push_str(&format!("&$top={top}"));
    }
    if let Some(skip) = skip {
        path.push_str(&format!("&$skip={skip}"));
    }

    let response = client.get(&path).await?;
    let state = response.json::<AnalyzeJobState>().await?;

    tracing::debug!(status = %state.status, "job state fetched");
    Ok(state)
}

/// A handle to a submitted analysis job.
///
/// Carries the submitted document-id order so that results can be restored
/// to submission order on every page, including continuation pages where
/// the original request body is no longer available.
#[derive(Debug, Clone)]
pub struct AnalyzeJobHandle {
    pub(crate) client: TextAnalyticsClient,
    pub(crate) job_id: String,
    pub(crate) doc_id_order: Vec<String>,
    pub(crate) show_stats: bool,
    pub(crate) top: Option<i32>,
    pub(crate) skip: Option<i32>,
}

impl AnalyzeJobHandle {
    /// The server-assigned job id.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// The submitted document ids, in submission order.
    pub fn document_ids(&self) -> &[String] {
        &self.doc_id_order
    }

    /// Fetch the current job state.
    pub async fn status(&self) -> TextAnalyticsResult<AnalyzeJobState> {
        analyze_status(
            &self.client,
            &self.job_id,
            self.show_stats,
            self.top,
            self.skip,
        )
        .await
    }

    /// Poll until the job reaches a terminal status, then return a pager
    /// over the result pages.
    ///
    /// # Arguments
    ///
    /// * `poll_interval` - How often to check the job status.
    /// * `max_attempts` - Maximum number of polls before giving up. Set to
    ///   `0` to disable the limit (not recommended for production).
    ///
    /// # Errors
    ///
    /// * [`TextAnalyticsError::Api`] with code `PollTimeout` if
    ///   `max_attempts` is exceeded.
    /// * [`TextAnalyticsError::Api`] carrying the job's error detail when
    ///   the job ends `failed` or `rejected`, or with code `JobCancelled`
    ///   when it was cancelled.
    ///
    /// # Tracing
    ///
    /// Emits a span named `textanalytics::analyze::wait` with field
    /// `job_id`.
    #[tracing::instrument(
        name = "textanalytics::analyze::wait",
        skip(self),
        fields(job_id = %self.job_id)
    )]
    pub async fn wait_until_complete(
        &self,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> TextAnalyticsResult<AnalyzeResultPager> {
        tracing::debug!("waiting for job to reach a terminal status");

        let mut attempts = 0u32;

        loop {
            if max_attempts > 0 {
                attempts += 1;
                if attempts > max_attempts {
                    return Err(TextAnalyticsError::Api {
                        code: "PollTimeout".into(),
                        message: format!(
                            "job `{}` did not reach a terminal status within \
                             {max_attempts} polls",
                            self.job_id
                        ),
                    });
                }
            }

            let state = self.status().await?;

            if state.status.is_terminal() {
                tracing::debug!(status = %state.status, "job reached terminal status");
                return self.pager_for(state);
            }

            tracing::trace!(
                status = %state.status,
                attempt = attempts,
                "job still in progress, waiting",
            );
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Turn a terminal job state into a result pager, surfacing job-level
    /// failures.
    fn pager_for(&self, state: AnalyzeJobState) -> TextAnalyticsResult<AnalyzeResultPager> {
        match state.status {
            JobStatus::Succeeded | JobStatus::PartiallyCompleted => {
                Ok(AnalyzeResultPager::new(self, state))
            }
            JobStatus::Failed | JobStatus::Rejected => match state.errors.first() {
                Some(error) => {
                    let (code, message) = error.detail();
                    Err(TextAnalyticsError::Api {
                        code: code.to_string(),
                        message: message.to_string(),
                    })
                }
                None => Err(TextAnalyticsError::Api {
                    code: "JobFailed".into(),
                    message: format!("analysis job `{}` failed without error detail", self.job_id),
                }),
            },
            JobStatus::Cancelled => Err(TextAnalyticsError::Api {
                code: "JobCancelled".into(),
                message: format!("analysis job `{}` was cancelled", self.job_id),
            }),
            JobStatus::NotStarted | JobStatus::Running | JobStatus::Cancelling => {
                unreachable!("pager_for is only called with terminal statuses")
            }
        }
    }
}
