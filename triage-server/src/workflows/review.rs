//! Query-log review — read-only view of recent user interactions, for a
//! clinician to scan what the chat system has been asked and how it replied.

use triage_core::error::TriageError;
use triage_core::models::QueryRecord;
use triage_core::store::QueryLogStore;

/// How many interactions a review page shows when the caller does not say.
pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// Upper bound on a caller-supplied limit.
pub const MAX_QUERY_LIMIT: usize = 200;

/// Most recent interactions first. An empty log yields an empty vec.
pub async fn recent_queries(
    log: &dyn QueryLogStore,
    limit: Option<usize>,
) -> Result<Vec<QueryRecord>, TriageError> {
    let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT).clamp(1, MAX_QUERY_LIMIT);

    log.recent(limit).await.map_err(TriageError::Retrieval)
}
