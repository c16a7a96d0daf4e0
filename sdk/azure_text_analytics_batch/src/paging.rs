//! Lazy paging over the result pages of a terminal analysis job.
//!
//! A succeeded job may still span multiple pages (the service caps a page
//! at 20 documents by default). [`AnalyzeResultPager`] is the single
//! continuation core: each call to [`next_page`](AnalyzeResultPager::next_page)
//! converts the job state in hand into an [`AnalyzeResultPage`] and
//! records the `nextLink` for the following poll. The sequence is finite
//! and forward-only; it is not restartable without resubmitting the batch.
//!
//! The async surface is the core; [`crate::blocking`] wraps the same pager
//! for synchronous callers, and [`into_stream`](AnalyzeResultPager::into_stream)
//! adapts it to a [`futures::Stream`].

use futures::Stream;

use azure_text_analytics_core::client::TextAnalyticsClient;
use azure_text_analytics_core::error::TextAnalyticsResult;

use crate::analyze::{analyze_status, AnalyzeJobHandle};
use crate::collate::assemble_page;
use crate::continuation::ContinuationToken;
use crate::models::AnalyzeJobState;
use crate::results::AnalyzeResultPage;

/// Lazily produces the result pages of one analysis job.
///
/// Obtained from [`AnalyzeJobHandle::wait_until_complete`]. No state is
/// shared between pages; each page is an independent, immutable snapshot
/// built from one job-state response.
#[derive(Debug)]
pub struct AnalyzeResultPager {
    client: TextAnalyticsClient,
    doc_id_order: Vec<String>,
    show_stats: bool,
    top: Option<i32>,
    skip: Option<i32>,
    state: PagerState,
}

#[derive(Debug)]
enum PagerState {
    /// A fetched job state not yet converted into a page.
    Current(Box<AnalyzeJobState>),
    /// The raw continuation link for the next page.
    Next(String),
    /// No further pages.
    Exhausted,
}

impl AnalyzeResultPager {
    pub(crate) fn new(job: &AnalyzeJobHandle, first: AnalyzeJobState) -> Self {
        Self {
            client: job.client.clone(),
            doc_id_order: job.doc_id_order.clone(),
            show_stats: job.show_stats,
            top: job.top,
            skip: job.skip,
            state: PagerState::Current(Box::new(first)),
        }
    }

    /// Produce the next result page, or `None` once the sequence is
    /// exhausted.
    ///
    /// Suspends only at the job-status network call. After an error the
    /// pager is exhausted: continuation faults are fatal and not retried.
    ///
    /// # Errors
    ///
    /// * [`azure_text_analytics_core::TextAnalyticsError::InvalidContinuationToken`]
    ///   if the page's `nextLink` cannot be decoded.
    /// * Collation faults (`MissingDocument`, `DuplicateDocument`,
    ///   `UnknownDocument`) if the page is inconsistent with the submitted
    ///   batch.
    /// * Transport or service errors from the poll call.
    ///
    /// # Tracing
    ///
    /// Emits a span named `textanalytics::analyze::next_page`.
    #[tracing::instrument(name = "textanalytics::analyze::next_page", skip(self))]
    pub async fn next_page(&mut self) -> TextAnalyticsResult<Option<AnalyzeResultPage>> {
        let state = match std::mem::replace(&mut self.state, PagerState::Exhausted) {
            PagerState::Current(state) => *state,
            PagerState::Next(link) => {
                let token = ContinuationToken::parse(&link)?;
                // The initiating call's show_stats always applies; explicit
                // top/skip overrides win over the token's.
                let top = self.top.or(token.top);
                let skip = self.skip.or(token.skip);
                analyze_status(&self.client, &token.job_id, self.show_stats, top, skip).await?
            }
            PagerState::Exhausted => return Ok(None),
        };

        let next_link = state.next_link.clone();
        let page = assemble_page(&self.doc_id_order, state, self.show_stats)?;

        match next_link {
            Some(link) => {
                tracing::trace!("page assembled, continuation link present");
                self.state = PagerState::Next(link);
            }
            None => tracing::trace!("page assembled, sequence exhausted"),
        }

        Ok(Some(page))
    }

    /// Adapt the pager into a [`futures::Stream`] of pages.
    pub fn into_stream(self) -> impl Stream<Item = TextAnalyticsResult<AnalyzeResultPage>> {
        futures::stream::try_unfold(self, |mut pager| async move {
            Ok(pager.next_page().await?.map(|page| (page, pager)))
        })
    }
}
