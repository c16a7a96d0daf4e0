//! Reordering, partitioning, and assembly of raw task results.
//!
//! The service returns each task's per-document results in unspecified
//! order, with errored documents in a separate list. The functions here
//! restore the caller's submission order, merge successes and errors into
//! one [`DocumentResult`] sequence, and group everything into an
//! [`AnalyzeResultPage`]. They are pure: the submitted id order is passed
//! in explicitly (the outbound request body is not available on
//! continuation polls) and no state is shared between pages.

use std::collections::HashMap;

use crate::models::{AnalyzeJobState, RawDocumentError, RawTaskResult};
use crate::results::{
    AnalyzeResultPage, DocumentError, DocumentPayload, DocumentResult, TaskResult,
};
use azure_text_analytics_core::error::{TextAnalyticsError, TextAnalyticsResult};

/// Restore submission order over a combined success + error result set.
///
/// `doc_id_order` is the full submitted id sequence. The returned ids must
/// form one contiguous run of it: a page produced under `$skip`/`$top`
/// covers a contiguous window of the submission order, so a missing id
/// *inside* the returned range means the service omitted a document. The
/// output contains one [`DocumentResult`] per returned id, in submission
/// order.
///
/// # Errors
///
/// * [`TextAnalyticsError::DuplicateDocument`] — the same id appears twice
///   in the response (never silently overwritten).
/// * [`TextAnalyticsError::UnknownDocument`] — the response contains an id
///   that was never submitted.
/// * [`TextAnalyticsError::MissingDocument`] — an id inside the returned
///   window is absent.
pub(crate) fn order_results<T: DocumentPayload>(
    doc_id_order: &[String],
    documents: Vec<T>,
    errors: Vec<RawDocumentError>,
) -> TextAnalyticsResult<Vec<DocumentResult<T>>> {
    let mut mapping: HashMap<String, DocumentResult<T>> =
        HashMap::with_capacity(documents.len() + errors.len());

    for document in documents {
        let id = document.id().to_string();
        if mapping.insert(id.clone(), DocumentResult::Success(document)).is_some() {
            return Err(TextAnalyticsError::DuplicateDocument { id });
        }
    }
    for error in errors {
        let id = error.id.clone();
        if mapping
            .insert(id.clone(), DocumentResult::Error(DocumentError::from_raw(error)))
            .is_some()
        {
            return Err(TextAnalyticsError::DuplicateDocument { id });
        }
    }

    if let Some(unknown) = mapping
        .keys()
        .find(|id| !doc_id_order.iter().any(|submitted| submitted == *id))
    {
        return Err(TextAnalyticsError::UnknownDocument {
            id: unknown.clone(),
        });
    }

    // The returned ids must cover a contiguous window of the submission
    // order; a gap means the service dropped a document.
    let matched: Vec<bool> = doc_id_order
        .iter()
        .map(|id| mapping.contains_key(id))
        .collect();
    if let (Some(first), Some(last)) = (
        matched.iter().position(|&m| m),
        matched.iter().rposition(|&m| m),
    ) {
        if let Some(gap) = (first..=last).find(|&i| !matched[i]) {
            return Err(TextAnalyticsError::MissingDocument {
                id: doc_id_order[gap].clone(),
            });
        }
    }

    let mut ordered = Vec::with_capacity(mapping.len());
    for id in doc_id_order {
        if let Some(result) = mapping.remove(id) {
            ordered.push(result);
        }
    }
    Ok(ordered)
}

/// Collate one raw task result set into a [`TaskResult`].
///
/// Batch-level statistics are carried over verbatim when `show_stats` was
/// requested; they are never recomputed client-side.
pub(crate) fn collate_task<T: DocumentPayload>(
    doc_id_order: &[String],
    task: RawTaskResult<T>,
    show_stats: bool,
) -> TextAnalyticsResult<TaskResult<T>> {
    let payload = task.results;
    let results = order_results(doc_id_order, payload.documents, payload.errors)?;
    Ok(TaskResult {
        name: task.name,
        model_version: payload.model_version,
        results,
        statistics: if show_stats { payload.statistics } else { None },
    })
}

/// Assemble one [`AnalyzeResultPage`] from a job-state snapshot.
///
/// Each task in the snapshot is collated independently; task kinds that
/// were not requested come out as empty groups.
pub(crate) fn assemble_page(
    doc_id_order: &[String],
    state: AnalyzeJobState,
    show_stats: bool,
) -> TextAnalyticsResult<AnalyzeResultPage> {
    let tasks = state.tasks;

    fn collate_all<T: DocumentPayload>(
        doc_id_order: &[String],
        tasks: Vec<RawTaskResult<T>>,
        show_stats: bool,
    ) -> TextAnalyticsResult<Vec<TaskResult<T>>> {
        tasks
            .into_iter()
            .map(|task| collate_task(doc_id_order, task, show_stats))
            .collect()
    }

    Ok(AnalyzeResultPage {
        entities_recognition_results: collate_all(
            doc_id_order,
            tasks.entity_recognition_tasks,
            show_stats,
        )?,
        pii_entities_recognition_results: collate_all(
            doc_id_order,
            tasks.entity_recognition_pii_tasks,
            show_stats,
        )?,
        key_phrase_extraction_results: collate_all(
            doc_id_order,
            tasks.key_phrase_extraction_tasks,
            show_stats,
        )?,
        sentiment_analysis_results: collate_all(
            doc_id_order,
            tasks.sentiment_analysis_tasks,
            show_stats,
        )?,
        entity_linking_results: collate_all(doc_id_order, tasks.entity_linking_tasks, show_stats)?,
    })
}
