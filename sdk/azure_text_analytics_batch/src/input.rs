//! Document inputs for batch analysis.

use serde::Serialize;

use azure_text_analytics_core::error::{TextAnalyticsError, TextAnalyticsResult};

/// A document submitted for analysis.
///
/// Immutable once submitted: the id is caller-assigned and is the only
/// correlation key between a submission and its per-document results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentInput {
    /// Caller-assigned id, unique within the batch.
    pub id: String,
    /// The text to analyze.
    pub text: String,
    /// Optional language hint (e.g. "en", "es"). When absent, the
    /// request-level hint applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl TextDocumentInput {
    /// Create a document with an explicit id.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            language: None,
        }
    }

    /// Set the per-document language hint.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Build documents from plain strings, assigning positional ids
    /// (`"0"`, `"1"`, …).
    pub fn from_strings<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(idx, text)| Self::new(idx.to_string(), text))
            .collect()
    }
}

/// Validate a document batch before it is sent anywhere.
///
/// The service rejects empty batches and duplicate ids too, but both are
/// caught here so the fault is local, immediate, and precise.
pub(crate) fn validate_documents(
    documents: &[TextDocumentInput],
) -> TextAnalyticsResult<()> {
    if documents.is_empty() {
        return Err(TextAnalyticsError::InvalidDocumentBatch(
            "input documents cannot be empty".into(),
        ));
    }

    let mut seen = std::collections::HashSet::with_capacity(documents.len());
    for (position, document) in documents.iter().enumerate() {
        if document.id.is_empty() {
            return Err(TextAnalyticsError::InvalidDocumentBatch(format!(
                "document at position {position} has an empty id"
            )));
        }
        if !seen.insert(document.id.as_str()) {
            return Err(TextAnalyticsError::InvalidDocumentBatch(format!(
                "duplicate document id `{}`",
                document.id
            )));
        }
    }

    Ok(())
}
