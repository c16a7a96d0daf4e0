//! Continuation tokens for paged job results.
//!
//! The service exposes continuation as a `nextLink` URL: the trailing path
//! segment is the job id and the query string carries the paging
//! parameters (`$skip`, `$top`, `showStats`). The same shape is used by
//! the `Operation-Location` header returned on submission. The token is
//! opaque to callers — they receive it from one response and echo it back —
//! so no URL structure beyond that is assumed here.

use std::str::FromStr;

use url::Url;

use azure_text_analytics_core::error::{TextAnalyticsError, TextAnalyticsResult};

/// A decoded continuation token: the job id plus the paging parameters to
/// forward into the next poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken {
    /// Id of the job to poll.
    pub job_id: String,
    /// Whether the next page should include statistics.
    pub show_stats: Option<bool>,
    /// Number of documents to skip.
    pub skip: Option<i32>,
    /// Maximum number of documents in the next page.
    pub top: Option<i32>,
}

impl ContinuationToken {
    /// Decode a token from its textual (URL) form.
    ///
    /// # Errors
    ///
    /// Returns [`TextAnalyticsError::InvalidContinuationToken`] if the
    /// value is not an absolute URL, has no job id in its trailing path
    /// segment, or carries non-integer `$skip`/`$top` values. This is a
    /// fatal client-side fault and is never retried.
    pub fn parse(raw: &str) -> TextAnalyticsResult<Self> {
        let url = Url::parse(raw).map_err(|e| {
            TextAnalyticsError::InvalidContinuationToken(format!("not a valid URL: {e}"))
        })?;

        let job_id = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| {
                TextAnalyticsError::InvalidContinuationToken(
                    "no job id in trailing path segment".into(),
                )
            })?
            .to_string();

        let mut token = Self {
            job_id,
            show_stats: None,
            skip: None,
            top: None,
        };

        for (key, value) in url.query_pairs() {
            // Paging parameters arrive OData-style ($skip/$top).
            match key.trim_start_matches('$') {
                "skip" => token.skip = Some(parse_count("$skip", &value)?),
                "top" => token.top = Some(parse_count("$top", &value)?),
                "showStats" => token.show_stats = Some(value.eq_ignore_ascii_case("true")),
                _ => {}
            }
        }

        Ok(token)
    }

    /// Decode a token that arrived as raw bytes.
    ///
    /// Depending on the transport, a stored token may round-trip as bytes
    /// rather than text; both forms are accepted. The bytes must be valid
    /// UTF-8.
    pub fn from_bytes(raw: &[u8]) -> TextAnalyticsResult<Self> {
        let text = std::str::from_utf8(raw).map_err(|_| {
            TextAnalyticsError::InvalidContinuationToken("token bytes are not valid UTF-8".into())
        })?;
        Self::parse(text)
    }
}

impl FromStr for ContinuationToken {
    type Err = TextAnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_count(name: &str, value: &str) -> TextAnalyticsResult<i32> {
    value.parse().map_err(|_| {
        TextAnalyticsError::InvalidContinuationToken(format!(
            "`{name}` is not an integer: `{value}`"
        ))
    })
}
