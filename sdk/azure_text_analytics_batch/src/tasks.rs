//! Analysis task directives and the batch request builder.
//!
//! A batch request pairs a document collection with one or more analysis
//! tasks. Several tasks of the same kind may be submitted in one batch
//! (e.g. two entity-recognition tasks pinned to different model versions);
//! each produces its own result group in every page.

use serde::Serialize;

use crate::input::{validate_documents, TextDocumentInput};
use azure_text_analytics_core::error::{TextAnalyticsError, TextAnalyticsResult};

macro_rules! analysis_task {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            /// Model version override; the service default ("latest") is
            /// used when absent.
            pub model_version: Option<String>,
        }

        impl $name {
            /// Create a task using the service's default model version.
            pub fn new() -> Self {
                Self::default()
            }

            /// Pin the task to a specific model version.
            pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
                self.model_version = Some(version.into());
                self
            }

            pub(crate) fn manifest(&self) -> TaskManifest {
                TaskManifest::new(self.model_version.as_deref())
            }
        }
    };
}

analysis_task!(
    /// Named entity recognition over the batch.
    EntitiesRecognitionTask
);
analysis_task!(
    /// Recognition of entities containing personal information.
    PiiEntitiesRecognitionTask
);
analysis_task!(
    /// Key phrase extraction over the batch.
    KeyPhraseExtractionTask
);
analysis_task!(
    /// Sentiment analysis over the batch.
    SentimentAnalysisTask
);
analysis_task!(
    /// Linking of entities to a well-known knowledge base.
    EntityLinkingTask
);

/// Wire form of one task entry in the job manifest.
#[derive(Debug, Serialize)]
pub(crate) struct TaskManifest {
    parameters: TaskParameters,
}

#[derive(Debug, Serialize)]
struct TaskParameters {
    #[serde(rename = "model-version")]
    model_version: String,
}

impl TaskManifest {
    fn new(model_version: Option<&str>) -> Self {
        Self {
            parameters: TaskParameters {
                model_version: model_version.unwrap_or("latest").to_string(),
            },
        }
    }
}

/// A validated batch-analysis request.
///
/// Use [`AnalyzeBatchRequest::builder()`]:
///
/// ```rust
/// use azure_text_analytics_batch::input::TextDocumentInput;
/// use azure_text_analytics_batch::tasks::{AnalyzeBatchRequest, EntitiesRecognitionTask};
///
/// let request = AnalyzeBatchRequest::builder()
///     .documents(vec![
///         TextDocumentInput::new("1", "Microsoft was founded by Bill Gates and Paul Allen."),
///     ])
///     .entities_recognition_tasks(vec![EntitiesRecognitionTask::new()])
///     .show_stats(true)
///     .build()
///     .expect("valid request");
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzeBatchRequest {
    pub(crate) documents: Vec<TextDocumentInput>,
    pub(crate) display_name: Option<String>,
    pub(crate) entities_recognition_tasks: Vec<EntitiesRecognitionTask>,
    pub(crate) pii_entities_recognition_tasks: Vec<PiiEntitiesRecognitionTask>,
    pub(crate) key_phrase_extraction_tasks: Vec<KeyPhraseExtractionTask>,
    pub(crate) sentiment_analysis_tasks: Vec<SentimentAnalysisTask>,
    pub(crate) entity_linking_tasks: Vec<EntityLinkingTask>,
    pub(crate) show_stats: bool,
    pub(crate) top: Option<i32>,
    pub(crate) skip: Option<i32>,
}

impl AnalyzeBatchRequest {
    /// Create a new builder.
    pub fn builder() -> AnalyzeBatchRequestBuilder {
        AnalyzeBatchRequestBuilder::default()
    }

    /// The submitted document ids, in submission order.
    ///
    /// Captured once at submission; continuation pages are reordered
    /// against this sequence because the request body is not available to
    /// later polls.
    pub(crate) fn document_ids(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.id.clone()).collect()
    }

    /// The JSON body for the submit call.
    pub(crate) fn body(&self) -> AnalyzeBatchBody {
        AnalyzeBatchBody {
            display_name: self.display_name.clone(),
            analysis_input: AnalysisInput {
                documents: self.documents.clone(),
            },
            tasks: JobManifestTasks {
                entity_recognition_tasks: self
                    .entities_recognition_tasks
                    .iter()
                    .map(|t| t.manifest())
                    .collect(),
                entity_recognition_pii_tasks: self
                    .pii_entities_recognition_tasks
                    .iter()
                    .map(|t| t.manifest())
                    .collect(),
                key_phrase_extraction_tasks: self
                    .key_phrase_extraction_tasks
                    .iter()
                    .map(|t| t.manifest())
                    .collect(),
                sentiment_analysis_tasks: self
                    .sentiment_analysis_tasks
                    .iter()
                    .map(|t| t.manifest())
                    .collect(),
                entity_linking_tasks: self
                    .entity_linking_tasks
                    .iter()
                    .map(|t| t.manifest())
                    .collect(),
            },
        }
    }
}

/// Wire body of the submit call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalyzeBatchBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    analysis_input: AnalysisInput,
    tasks: JobManifestTasks,
}

#[derive(Debug, Serialize)]
struct AnalysisInput {
    documents: Vec<TextDocumentInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JobManifestTasks {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    entity_recognition_tasks: Vec<TaskManifest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    entity_recognition_pii_tasks: Vec<TaskManifest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    key_phrase_extraction_tasks: Vec<TaskManifest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sentiment_analysis_tasks: Vec<TaskManifest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    entity_linking_tasks: Vec<TaskManifest>,
}

/// Builder for [`AnalyzeBatchRequest`].
#[derive(Debug, Default)]
pub struct AnalyzeBatchRequestBuilder {
    documents: Vec<TextDocumentInput>,
    display_name: Option<String>,
    language: Option<String>,
    entities_recognition_tasks: Vec<EntitiesRecognitionTask>,
    pii_entities_recognition_tasks: Vec<PiiEntitiesRecognitionTask>,
    key_phrase_extraction_tasks: Vec<KeyPhraseExtractionTask>,
    sentiment_analysis_tasks: Vec<SentimentAnalysisTask>,
    entity_linking_tasks: Vec<EntityLinkingTask>,
    show_stats: bool,
    top: Option<i32>,
    skip: Option<i32>,
}

impl AnalyzeBatchRequestBuilder {
    /// Set the documents to analyze.
    ///
    /// **Required.** Ids must be non-empty and unique within the batch.
    pub fn documents(mut self, documents: Vec<TextDocumentInput>) -> Self {
        self.documents = documents;
        self
    }

    /// Analyze plain strings, assigning positional ids (`"0"`, `"1"`, …).
    pub fn texts<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documents = TextDocumentInput::from_strings(texts);
        self
    }

    /// Set a display name for the job.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set a batch-wide language hint, applied to documents without their
    /// own hint. Pass an empty string to let the service auto-detect.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the entity recognition tasks to execute.
    pub fn entities_recognition_tasks(mut self, tasks: Vec<EntitiesRecognitionTask>) -> Self {
        self.entities_recognition_tasks = tasks;
        self
    }

    /// Set the PII entity recognition tasks to execute.
    pub fn pii_entities_recognition_tasks(
        mut self,
        tasks: Vec<PiiEntitiesRecognitionTask>,
    ) -> Self {
        self.pii_entities_recognition_tasks = tasks;
        self
    }

    /// Set the key phrase extraction tasks to execute.
    pub fn key_phrase_extraction_tasks(mut self, tasks: Vec<KeyPhraseExtractionTask>) -> Self {
        self.key_phrase_extraction_tasks = tasks;
        self
    }

    /// Set the sentiment analysis tasks to execute.
    pub fn sentiment_analysis_tasks(mut self, tasks: Vec<SentimentAnalysisTask>) -> Self {
        self.sentiment_analysis_tasks = tasks;
        self
    }

    /// Set the entity linking tasks to execute.
    pub fn entity_linking_tasks(mut self, tasks: Vec<EntityLinkingTask>) -> Self {
        self.entity_linking_tasks = tasks;
        self
    }

    /// Request request-level and document-level statistics.
    pub fn show_stats(mut self, show_stats: bool) -> Self {
        self.show_stats = show_stats;
        self
    }

    /// Maximum number of documents per result page.
    pub fn top(mut self, top: i32) -> Self {
        self.top = Some(top);
        self
    }

    /// Number of documents to skip in the first result page.
    pub fn skip(mut self, skip: i32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Build the request, validating the batch.
    ///
    /// # Errors
    ///
    /// Returns [`TextAnalyticsError::InvalidDocumentBatch`] if the document
    /// list is empty or contains empty/duplicate ids, and
    /// [`TextAnalyticsError::Builder`] if no analysis task was requested.
    pub fn build(self) -> TextAnalyticsResult<AnalyzeBatchRequest> {
        validate_documents(&self.documents)?;

        let task_count = self.entities_recognition_tasks.len()
            + self.pii_entities_recognition_tasks.len()
            + self.key_phrase_extraction_tasks.len()
            + self.sentiment_analysis_tasks.len()
            + self.entity_linking_tasks.len();
        if task_count == 0 {
            return Err(TextAnalyticsError::Builder(
                "at least one analysis task is required".into(),
            ));
        }

        let mut documents = self.documents;
        if let Some(hint) = self.language.filter(|hint| !hint.is_empty()) {
            for document in &mut documents {
                if document.language.is_none() {
                    document.language = Some(hint.clone());
                }
            }
        }

        Ok(AnalyzeBatchRequest {
            documents,
            display_name: self.display_name,
            entities_recognition_tasks: self.entities_recognition_tasks,
            pii_entities_recognition_tasks: self.pii_entities_recognition_tasks,
            key_phrase_extraction_tasks: self.key_phrase_extraction_tasks,
            sentiment_analysis_tasks: self.sentiment_analysis_tasks,
            entity_linking_tasks: self.entity_linking_tasks,
            show_stats: self.show_stats,
            top: self.top,
            skip: self.skip,
        })
    }
}
