//! Blocking execution mode.
//!
//! The async pager in [`crate::paging`] is the single core; this module
//! wraps it with a private current-thread runtime so synchronous callers
//! can drive the same submit → poll → page sequence without an async
//! context. No ordering, partitioning, or continuation logic is duplicated
//! here.
//!
//! Must not be called from within an async runtime; use
//! [`crate::analyze::begin_analyze`] directly there instead.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_text_analytics_core::client::TextAnalyticsClient;
//! use azure_text_analytics_core::auth::TextAnalyticsCredential;
//! use azure_text_analytics_batch::blocking;
//! use azure_text_analytics_batch::tasks::{AnalyzeBatchRequest, KeyPhraseExtractionTask};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TextAnalyticsClient::builder()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .credential(TextAnalyticsCredential::api_key("your-key"))
//!     .build()?;
//!
//! let request = AnalyzeBatchRequest::builder()
//!     .texts(["I had a wonderful trip to Seattle last week."])
//!     .key_phrase_extraction_tasks(vec![KeyPhraseExtractionTask::new()])
//!     .build()?;
//!
//! for page in blocking::analyze(&client, &request, Duration::from_secs(5), 60)? {
//!     let page = page?;
//!     for task in &page.key_phrase_extraction_results {
//!         for result in &task.results {
//!             println!("{}: error={}", result.id(), result.is_error());
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use azure_text_analytics_core::client::TextAnalyticsClient;
use azure_text_analytics_core::error::TextAnalyticsResult;

use crate::analyze::begin_analyze;
use crate::paging::AnalyzeResultPager;
use crate::results::AnalyzeResultPage;
use crate::tasks::AnalyzeBatchRequest;

/// A blocking iterator over the result pages of one analysis job.
///
/// Each call to `next` performs at most one poll round-trip on the wrapped
/// runtime. The sequence is finite and forward-only.
#[derive(Debug)]
pub struct AnalyzePages {
    runtime: tokio::runtime::Runtime,
    pager: AnalyzeResultPager,
}

impl Iterator for AnalyzePages {
    type Item = TextAnalyticsResult<AnalyzeResultPage>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runtime.block_on(self.pager.next_page()).transpose()
    }
}

/// Submit a batch, block until the job completes, and return an iterator
/// over its result pages.
///
/// # Arguments
///
/// * `poll_interval` - How often to check the job status.
/// * `max_attempts` - Maximum number of polls before giving up; `0`
///   disables the limit.
///
/// # Errors
///
/// Same contract as [`begin_analyze`] and
/// [`crate::analyze::AnalyzeJobHandle::wait_until_complete`].
pub fn analyze(
    client: &TextAnalyticsClient,
    request: &AnalyzeBatchRequest,
    poll_interval: Duration,
    max_attempts: u32,
) -> TextAnalyticsResult<AnalyzePages> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build blocking runtime");

    let job = runtime.block_on(begin_analyze(client, request))?;
    let pager = runtime.block_on(job.wait_until_complete(poll_interval, max_attempts))?;

    Ok(AnalyzePages { runtime, pager })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_mock_client, simple_request};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const JOBS_PATH: &str = "/text/analytics/v3.1-preview.4/analyze/jobs/job-123";

    /// The mock server needs live worker threads because this test drives
    /// the client from a separate, blocking runtime.
    fn server_runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("failed to build server runtime")
    }

    #[test]
    fn blocking_analyze_iterates_all_pages() {
        let server_rt = server_runtime();
        let server = server_rt.block_on(MockServer::start());

        server_rt.block_on(async {
            Mock::given(method("POST"))
                .and(path("/text/analytics/v3.1-preview.4/analyze"))
                .respond_with(ResponseTemplate::new(202).append_header(
                    "Operation-Location",
                    format!("{}{JOBS_PATH}", server.uri()).as_str(),
                ))
                .mount(&server)
                .await;

            let next = format!("{}{JOBS_PATH}?$skip=1&$top=1", server.uri());
            Mock::given(method("GET"))
                .and(path(JOBS_PATH))
                .and(query_param("showStats", "false"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "jobId": "job-123",
                    "status": "succeeded",
                    "nextLink": next,
                    "tasks": {
                        "keyPhraseExtractionTasks": [{
                            "results": {
                                "modelVersion": "latest",
                                "documents": [{"id": "1", "keyPhrases": [], "warnings": []}],
                                "errors": []
                            }
                        }]
                    }
                })))
                .up_to_n_times(1)
                .mount(&server)
                .await;

            Mock::given(method("GET"))
                .and(path(JOBS_PATH))
                .and(query_param("$skip", "1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "jobId": "job-123",
                    "status": "succeeded",
                    "tasks": {
                        "keyPhraseExtractionTasks": [{
                            "results": {
                                "modelVersion": "latest",
                                "documents": [{"id": "2", "keyPhrases": [], "warnings": []}],
                                "errors": []
                            }
                        }]
                    }
                })))
                .mount(&server)
                .await;
        });

        let client = server_rt.block_on(setup_mock_client(&server));
        let request = simple_request(&["1", "2"]);

        let pages: Vec<AnalyzeResultPage> =
            analyze(&client, &request, Duration::from_millis(10), 10)
                .expect("job should complete")
                .collect::<TextAnalyticsResult<_>>()
                .expect("pages should assemble");

        assert_eq!(pages.len(), 2);
        assert_eq!(
            pages[0].key_phrase_extraction_results[0].results[0].id(),
            "1"
        );
        assert_eq!(
            pages[1].key_phrase_extraction_results[0].results[0].id(),
            "2"
        );

        drop(server_rt);
    }

    #[test]
    fn blocking_analyze_surfaces_submit_errors() {
        let server_rt = server_runtime();
        let server = server_rt.block_on(MockServer::start());

        server_rt.block_on(async {
            Mock::given(method("POST"))
                .and(path("/text/analytics/v3.1-preview.4/analyze"))
                .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                    "error": {"code": "InvalidRequest", "message": "Bad body."}
                })))
                .mount(&server)
                .await;
        });

        let client = server_rt.block_on(setup_mock_client(&server));
        let request = simple_request(&["1"]);

        let err = analyze(&client, &request, Duration::from_millis(10), 10)
            .expect_err("submit failure must surface");
        assert!(err.to_string().contains("InvalidRequest"));
    }
}
