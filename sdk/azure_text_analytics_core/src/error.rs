use thiserror::Error;

/// Errors that can occur when interacting with the Text Analytics API.
#[derive(Error, Debug)]
pub enum TextAnalyticsError {
    /// The request failed due to an HTTP error.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Authentication failed (HTTP 401 or missing credentials).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// The API returned an error response.
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// A request builder was given invalid or incomplete values.
    #[error("Builder error: {0}")]
    Builder(String),

    /// The submitted document batch is invalid. Detected before any
    /// network call is made.
    #[error("Invalid document batch: {0}")]
    InvalidDocumentBatch(String),

    /// A submitted document id is absent from the service response.
    ///
    /// The service contract guarantees one result per submitted document
    /// within a page window; a gap means the response is inconsistent
    /// with the request, not that the document merely failed.
    #[error("document `{id}` is missing from the service response")]
    MissingDocument { id: String },

    /// The service returned more than one result for the same document id.
    #[error("document `{id}` was returned more than once by the service")]
    DuplicateDocument { id: String },

    /// The service returned a result for an id that was never submitted.
    #[error("document `{id}` was returned by the service but never submitted")]
    UnknownDocument { id: String },

    /// A continuation token (next-page link) could not be decoded.
    #[error("invalid continuation token: {0}")]
    InvalidContinuationToken(String),

    /// A result field was read on a document the service failed to process.
    ///
    /// Carries the attribute that was requested plus the originating
    /// per-document error so the caller gets actionable context.
    #[error(
        "`{attribute}` is not available: the service was unable to process \
         document `{id}`: {code} - {message}"
    )]
    DocumentFailed {
        attribute: &'static str,
        id: String,
        code: String,
        message: String,
    },
}

impl TextAnalyticsError {
    /// Build an [`TextAnalyticsError::InvalidEndpoint`] that records the
    /// underlying parse failure.
    pub fn invalid_endpoint_with_source(
        message: &str,
        source: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidEndpoint(format!("{message}: {source}"))
    }

    /// Returns `true` for the client-side consistency faults that indicate
    /// a contract violation between client and service rather than a data
    /// problem or a service failure.
    pub fn is_consistency_fault(&self) -> bool {
        matches!(
            self,
            Self::MissingDocument { .. }
                | Self::DuplicateDocument { .. }
                | Self::UnknownDocument { .. }
                | Self::InvalidContinuationToken(_)
        )
    }
}

/// Result type alias for Text Analytics operations.
pub type TextAnalyticsResult<T> = std::result::Result<T, TextAnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_failed_message_names_attribute_id_and_code() {
        let err = TextAnalyticsError::DocumentFailed {
            attribute: "entities",
            id: "1".into(),
            code: "InvalidDocument".into(),
            message: "Document text is empty.".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("entities"), "message: {msg}");
        assert!(msg.contains("document `1`"), "message: {msg}");
        assert!(msg.contains("InvalidDocument"), "message: {msg}");
        assert!(msg.contains("Document text is empty."), "message: {msg}");
    }

    #[test]
    fn consistency_faults_are_flagged() {
        assert!(TextAnalyticsError::MissingDocument { id: "2".into() }.is_consistency_fault());
        assert!(TextAnalyticsError::DuplicateDocument { id: "2".into() }.is_consistency_fault());
        assert!(TextAnalyticsError::UnknownDocument { id: "9".into() }.is_consistency_fault());
        assert!(
            TextAnalyticsError::InvalidContinuationToken("not a url".into())
                .is_consistency_fault()
        );
        assert!(!TextAnalyticsError::Api {
            code: "InvalidRequest".into(),
            message: "bad model".into()
        }
        .is_consistency_fault());
        assert!(!TextAnalyticsError::InvalidDocumentBatch("empty".into()).is_consistency_fault());
    }
}
