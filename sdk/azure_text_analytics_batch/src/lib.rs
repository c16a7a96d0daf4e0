//! # Azure Text Analytics — batch analysis
//!
//! Client for the Text Analytics `analyze` API: submit a collection of
//! documents with one or more analysis tasks (entity recognition, PII
//! recognition, key phrase extraction, sentiment analysis, entity
//! linking), poll the long-running job, and consume its results as a lazy,
//! finite sequence of pages.
//!
//! The service returns per-document results in unspecified order, with
//! errored documents split into a separate list and large jobs spread over
//! multiple pages. This crate restores the caller's submission order on
//! every page, merges successes and errors into one typed
//! [`DocumentResult`](results::DocumentResult) sequence per task, and
//! follows continuation links until the sequence is exhausted.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use azure_text_analytics_core::client::TextAnalyticsClient;
//! use azure_text_analytics_core::auth::TextAnalyticsCredential;
//! use azure_text_analytics_batch::analyze;
//! use azure_text_analytics_batch::tasks::{AnalyzeBatchRequest, EntitiesRecognitionTask};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TextAnalyticsClient::builder()
//!         .endpoint("https://your-resource.cognitiveservices.azure.com")
//!         .credential(TextAnalyticsCredential::api_key("your-key"))
//!         .build()?;
//!
//!     let request = AnalyzeBatchRequest::builder()
//!         .texts(["Microsoft was founded by Bill Gates and Paul Allen."])
//!         .entities_recognition_tasks(vec![EntitiesRecognitionTask::new()])
//!         .build()?;
//!
//!     let job = analyze::begin_analyze(&client, &request).await?;
//!     let mut pager = job
//!         .wait_until_complete(std::time::Duration::from_secs(5), 60)
//!         .await?;
//!
//!     while let Some(page) = pager.next_page().await? {
//!         for task in &page.entities_recognition_results {
//!             for result in &task.results {
//!                 match result.entities() {
//!                     Ok(entities) => println!("{}: {} entities", result.id(), entities.len()),
//!                     Err(err) => println!("{err}"),
//!                 }
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Core concepts
//!
//! - **Document**: a caller-constructed, immutable unit of work with a
//!   caller-assigned id ([`input::TextDocumentInput`]).
//! - **Task**: one analysis directive; a batch may run several
//!   concurrently, each with its own model-version override ([`tasks`]).
//! - **DocumentResult**: the per-document outcome of one task — a typed
//!   success payload or a typed error, never both ([`results`]).
//! - **Page**: one immutable snapshot of results, one task-result group per
//!   requested kind ([`results::AnalyzeResultPage`]).
//! - **Continuation**: pages after the first are fetched lazily by
//!   following the job's continuation link ([`continuation`], [`paging`]).
//!
//! ## Modules
//!
//! - [`analyze`] - Submit batches and poll jobs to completion
//! - [`blocking`] - Synchronous adapter over the async core
//! - [`continuation`] - Continuation-token decoding
//! - [`input`] - Document inputs and batch validation
//! - [`models`] - Wire types for the job-status endpoint
//! - [`paging`] - Lazy page sequence over a terminal job
//! - [`results`] - Typed per-document, per-task, and per-page results
//! - [`tasks`] - Analysis task directives and the request builder

pub mod analyze;
pub mod blocking;
mod collate;
pub mod continuation;
pub mod input;
pub mod models;
pub mod paging;
pub mod results;
pub mod tasks;

pub use analyze::{begin_analyze, AnalyzeJobHandle};
pub use continuation::ContinuationToken;
pub use input::TextDocumentInput;
pub use paging::AnalyzeResultPager;
pub use results::{AnalyzeResultPage, DocumentError, DocumentResult, TaskResult};
