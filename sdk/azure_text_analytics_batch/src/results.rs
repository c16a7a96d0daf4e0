//! Caller-facing result types for batch analysis.
//!
//! Every per-document outcome is a [`DocumentResult`]: either a typed
//! success payload for the task that produced it, or a [`DocumentError`]
//! describing why the service could not process that document. Results are
//! grouped per task in a [`TaskResult`] and per page in an
//! [`AnalyzeResultPage`].

use serde::Deserialize;

use crate::models::{
    RawDocumentError, RequestStatistics, TextAnalyticsWarning, TextDocumentStatistics,
};
use azure_text_analytics_core::error::{TextAnalyticsError, TextAnalyticsResult};

/// Implemented by all per-document result payloads. Used to correlate a
/// result back to the submitted document it belongs to.
pub trait DocumentPayload {
    /// The caller-assigned id of the originating document.
    fn id(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Per-task success payloads
// ---------------------------------------------------------------------------

/// An entity recognized in a document, with its category and location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedEntity {
    /// Entity text as it appears in the document.
    pub text: String,
    /// Entity category (e.g. "Person", "Location", "Organization").
    pub category: String,
    /// Optional finer-grained category (e.g. "GPE" under "Location").
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Grapheme offset of the entity within the document.
    pub offset: u32,
    /// Grapheme length of the entity.
    pub length: u32,
    /// Confidence score between 0 and 1.
    pub confidence_score: f64,
}

/// The outcome of entity recognition for one document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeEntitiesResult {
    pub id: String,
    pub entities: Vec<CategorizedEntity>,
    #[serde(default)]
    pub warnings: Vec<TextAnalyticsWarning>,
    #[serde(default)]
    pub statistics: Option<TextDocumentStatistics>,
}

/// An entity containing personal information (e.g. SSN, bank account).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiiEntity {
    pub text: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub offset: u32,
    pub length: u32,
    pub confidence_score: f64,
}

/// The outcome of PII entity recognition for one document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizePiiEntitiesResult {
    pub id: String,
    pub entities: Vec<PiiEntity>,
    /// The document text with recognized PII entities redacted, when the
    /// service returns it.
    #[serde(default)]
    pub redacted_text: Option<String>,
    #[serde(default)]
    pub warnings: Vec<TextAnalyticsWarning>,
    #[serde(default)]
    pub statistics: Option<TextDocumentStatistics>,
}

/// The outcome of key phrase extraction for one document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractKeyPhrasesResult {
    pub id: String,
    pub key_phrases: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<TextAnalyticsWarning>,
    #[serde(default)]
    pub statistics: Option<TextDocumentStatistics>,
}

/// A sentiment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextSentiment {
    Positive,
    Neutral,
    Negative,
    /// Document-level only: sentences disagree.
    Mixed,
}

/// Confidence scores for each sentiment class. The three values sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SentimentConfidenceScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Sentiment of a single sentence within a document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceSentiment {
    pub text: String,
    pub sentiment: TextSentiment,
    pub confidence_scores: SentimentConfidenceScores,
    pub offset: u32,
    pub length: u32,
}

/// The outcome of sentiment analysis for one document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSentimentResult {
    pub id: String,
    pub sentiment: TextSentiment,
    pub confidence_scores: SentimentConfidenceScores,
    pub sentences: Vec<SentenceSentiment>,
    #[serde(default)]
    pub warnings: Vec<TextAnalyticsWarning>,
    #[serde(default)]
    pub statistics: Option<TextDocumentStatistics>,
}

/// A span of the document matching a linked entity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedEntityMatch {
    pub text: String,
    pub confidence_score: f64,
    pub offset: u32,
    pub length: u32,
}

/// An entity linked to a well-known knowledge base.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedEntity {
    /// Entity name in the data source.
    pub name: String,
    /// Document spans matching this entity.
    pub matches: Vec<LinkedEntityMatch>,
    /// Language of the data source entry.
    pub language: String,
    /// Unique identifier of the entity in the data source.
    #[serde(rename = "id", default)]
    pub data_source_entity_id: Option<String>,
    /// URL of the entity's page in the data source.
    pub url: String,
    /// The data source (e.g. "Wikipedia").
    pub data_source: String,
}

/// The outcome of entity linking for one document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeLinkedEntitiesResult {
    pub id: String,
    pub entities: Vec<LinkedEntity>,
    #[serde(default)]
    pub warnings: Vec<TextAnalyticsWarning>,
    #[serde(default)]
    pub statistics: Option<TextDocumentStatistics>,
}

macro_rules! impl_document_payload {
    ($($ty:ty),* $(,)?) => {
        $(impl DocumentPayload for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_document_payload!(
    RecognizeEntitiesResult,
    RecognizePiiEntitiesResult,
    ExtractKeyPhrasesResult,
    AnalyzeSentimentResult,
    RecognizeLinkedEntitiesResult,
);

// ---------------------------------------------------------------------------
// DocumentResult
// ---------------------------------------------------------------------------

/// Why the service could not process one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentError {
    /// Id of the document that failed.
    pub id: String,
    /// Service error code (e.g. "InvalidDocument",
    /// "UnsupportedLanguageCode").
    pub code: String,
    /// Human-readable error description.
    pub message: String,
}

impl DocumentError {
    pub(crate) fn from_raw(raw: RawDocumentError) -> Self {
        let (code, message) = raw.error.detail();
        Self {
            id: raw.id.clone(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// The per-document outcome of one task: a typed success payload or a
/// [`DocumentError`]. Never both.
///
/// Per-document errors are data, not exceptions: a page containing errored
/// documents is still returned, and the caller inspects each result.
/// Reading a success-only field through the typed accessors (e.g.
/// `entities()`, `key_phrases()`, `sentiment()`) on an
/// error-classified result fails with
/// [`TextAnalyticsError::DocumentFailed`], which names the requested
/// attribute, the document id, and the originating error.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentResult<T> {
    /// The service processed the document; the payload is task-specific.
    Success(T),
    /// The service could not process the document.
    Error(DocumentError),
}

impl<T: DocumentPayload> DocumentResult<T> {
    /// The id of the document this result belongs to.
    pub fn id(&self) -> &str {
        match self {
            Self::Success(payload) => payload.id(),
            Self::Error(error) => &error.id,
        }
    }

    /// Returns `true` if the service could not process the document.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The success payload, or `None` for an error-classified result.
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Error(_) => None,
        }
    }

    /// The per-document error, or `None` for a successful result.
    pub fn error(&self) -> Option<&DocumentError> {
        match self {
            Self::Success(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    /// Resolve the success payload for a named attribute, failing with the
    /// full error context if the document was not processed.
    fn expect_success(&self, attribute: &'static str) -> TextAnalyticsResult<&T> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::Error(error) => Err(TextAnalyticsError::DocumentFailed {
                attribute,
                id: error.id.clone(),
                code: error.code.clone(),
                message: error.message.clone(),
            }),
        }
    }
}

impl DocumentResult<RecognizeEntitiesResult> {
    /// The recognized entities.
    pub fn entities(&self) -> TextAnalyticsResult<&[CategorizedEntity]> {
        self.expect_success("entities")
            .map(|r| r.entities.as_slice())
    }
}

impl DocumentResult<RecognizePiiEntitiesResult> {
    /// The recognized PII entities.
    pub fn entities(&self) -> TextAnalyticsResult<&[PiiEntity]> {
        self.expect_success("entities")
            .map(|r| r.entities.as_slice())
    }

    /// The document text with PII redacted, when the service returns it.
    pub fn redacted_text(&self) -> TextAnalyticsResult<Option<&str>> {
        self.expect_success("redacted_text")
            .map(|r| r.redacted_text.as_deref())
    }
}

impl DocumentResult<ExtractKeyPhrasesResult> {
    /// The extracted key phrases.
    pub fn key_phrases(&self) -> TextAnalyticsResult<&[String]> {
        self.expect_success("key_phrases")
            .map(|r| r.key_phrases.as_slice())
    }
}

impl DocumentResult<AnalyzeSentimentResult> {
    /// The document-level sentiment.
    pub fn sentiment(&self) -> TextAnalyticsResult<TextSentiment> {
        self.expect_success("sentiment").map(|r| r.sentiment)
    }

    /// Document-level confidence scores.
    pub fn confidence_scores(&self) -> TextAnalyticsResult<&SentimentConfidenceScores> {
        self.expect_success("confidence_scores")
            .map(|r| &r.confidence_scores)
    }

    /// Per-sentence sentiments.
    pub fn sentences(&self) -> TextAnalyticsResult<&[SentenceSentiment]> {
        self.expect_success("sentences")
            .map(|r| r.sentences.as_slice())
    }
}

impl DocumentResult<RecognizeLinkedEntitiesResult> {
    /// The linked entities.
    pub fn entities(&self) -> TextAnalyticsResult<&[LinkedEntity]> {
        self.expect_success("entities")
            .map(|r| r.entities.as_slice())
    }
}

// ---------------------------------------------------------------------------
// Task and page grouping
// ---------------------------------------------------------------------------

/// The outcome of one analysis task: per-document results in submission
/// order, plus batch-level statistics when they were requested.
#[derive(Debug, Clone)]
pub struct TaskResult<T> {
    /// Task name as reported by the service.
    pub name: Option<String>,
    /// Model version the service actually used for this task.
    pub model_version: String,
    /// One result per document covered by this page, in the order the
    /// documents were submitted.
    pub results: Vec<DocumentResult<T>>,
    /// Batch-level counts, copied verbatim from the service payload.
    pub statistics: Option<RequestStatistics>,
}

/// One page of analysis output: one [`TaskResult`] group per task kind.
///
/// A kind that was not requested yields an empty group, never an omitted
/// field. Pages are immutable snapshots; subsequent pages are produced
/// lazily by [`crate::paging::AnalyzeResultPager`].
#[derive(Debug, Clone, Default)]
pub struct AnalyzeResultPage {
    pub entities_recognition_results: Vec<TaskResult<RecognizeEntitiesResult>>,
    pub pii_entities_recognition_results: Vec<TaskResult<RecognizePiiEntitiesResult>>,
    pub key_phrase_extraction_results: Vec<TaskResult<ExtractKeyPhrasesResult>>,
    pub sentiment_analysis_results: Vec<TaskResult<AnalyzeSentimentResult>>,
    pub entity_linking_results: Vec<TaskResult<RecognizeLinkedEntitiesResult>>,
}
