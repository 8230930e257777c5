//! Answer intake — reconciles which questions lack answers and persists a
//! newly supplied answer to both stores.
//!
//! The two writes are independent, with no transaction spanning them. The
//! knowledge insert runs first and a failure there skips the aggregate merge
//! entirely: a crash between the two leaves an orphaned knowledge record
//! rather than a question marked answered with nothing retrievable behind it.

use triage_core::error::TriageError;
use triage_core::store::BoardStore;

use crate::workflows::knowledge::KnowledgeRecorder;

/// Questions with no recorded answer, in the order they were received.
///
/// A missing aggregate record degrades to an empty board (zero questions,
/// zero answers) — only an unreachable or malformed store is an error.
pub async fn list_unanswered(board: &dyn BoardStore) -> Result<Vec<String>, TriageError> {
    let board = board
        .fetch()
        .await
        .map_err(TriageError::Retrieval)?
        .unwrap_or_default();

    Ok(board.unanswered())
}

/// Persist an answer for `question`.
///
/// Effect 1 appends to the knowledge collection, Effect 2 merges the answer
/// into the aggregate record. A question transitions `unanswered → answered`
/// once; re-submitting for an already-answered question silently overwrites
/// the aggregate entry and appends a duplicate knowledge record.
pub async fn submit_answer(
    board: &dyn BoardStore,
    recorder: &KnowledgeRecorder,
    question: &str,
    answer: &str,
) -> Result<(), TriageError> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(TriageError::EmptyAnswer);
    }

    recorder.record(question, answer).await?;

    board
        .merge_answer(question, answer)
        .await
        .map_err(TriageError::StoreWrite)?;

    tracing::info!(question, "Answer recorded and merged");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeBoard, FakeEmbedder, FakeKnowledge};
    use std::sync::Arc;
    use triage_core::models::QuestionBoard;
    use triage_core::store::StoreError;

    fn seeded_board(questions: &[&str], answers: &[(&str, &str)]) -> FakeBoard {
        FakeBoard::with_board(QuestionBoard {
            questions: questions.iter().map(|q| q.to_string()).collect(),
            answers: answers
                .iter()
                .map(|(q, a)| (q.to_string(), a.to_string()))
                .collect(),
        })
    }

    fn recorder_with(store: Arc<FakeKnowledge>) -> KnowledgeRecorder {
        KnowledgeRecorder::new(Arc::new(FakeEmbedder::with_dimensions(8)), store)
    }

    #[tokio::test]
    async fn test_list_unanswered_preserves_order() {
        let board = seeded_board(&["a", "b", "c"], &[("b", "x")]);
        let result = list_unanswered(&board).await.unwrap();
        assert_eq!(result, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_list_unanswered_missing_record_is_empty() {
        let board = FakeBoard::empty();
        let result = list_unanswered(&board).await.unwrap();
        assert!(result.is_empty(), "Missing record is not an error");
    }

    #[tokio::test]
    async fn test_list_unanswered_surfaces_read_failure() {
        let board = FakeBoard::unreachable();
        let result = list_unanswered(&board).await;
        assert!(matches!(result, Err(TriageError::Retrieval(_))));
    }

    #[tokio::test]
    async fn test_submit_empty_answer_writes_nothing() {
        let board = seeded_board(&["q"], &[]);
        let knowledge = Arc::new(FakeKnowledge::default());
        let recorder = recorder_with(knowledge.clone());

        for answer in ["", "   "] {
            let result = submit_answer(&board, &recorder, "q", answer).await;
            assert!(matches!(result, Err(TriageError::EmptyAnswer)));
        }

        assert!(knowledge.records().is_empty(), "No knowledge insert");
        assert!(board.answers().is_empty(), "No aggregate merge");
    }

    #[tokio::test]
    async fn test_submit_skips_merge_on_embedding_failure() {
        let board = seeded_board(&["q"], &[("other", "kept")]);
        let knowledge = Arc::new(FakeKnowledge::default());
        let recorder =
            KnowledgeRecorder::new(Arc::new(FakeEmbedder::failing()), knowledge.clone());

        let result = submit_answer(&board, &recorder, "q", "valid answer").await;

        assert!(matches!(result, Err(TriageError::Embedding(_))));
        assert!(knowledge.records().is_empty());
        let answers = board.answers();
        assert_eq!(answers.len(), 1, "Aggregate unchanged on failure");
        assert_eq!(answers["other"], "kept");
    }

    #[tokio::test]
    async fn test_submit_skips_merge_on_insert_failure() {
        let board = seeded_board(&["q"], &[]);
        let knowledge = Arc::new(FakeKnowledge::failing());
        let recorder = recorder_with(knowledge.clone());

        let result = submit_answer(&board, &recorder, "q", "valid answer").await;

        assert!(matches!(result, Err(TriageError::StoreWrite(_))));
        assert!(board.answers().is_empty(), "Merge must not be attempted");
    }

    #[tokio::test]
    async fn test_submit_success_writes_both_stores() {
        let board = seeded_board(&["q"], &[]);
        let knowledge = Arc::new(FakeKnowledge::default());
        let recorder = recorder_with(knowledge.clone());

        submit_answer(&board, &recorder, "q", "valid answer")
            .await
            .unwrap();

        let records = knowledge.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "q");
        assert_eq!(records[0].answer, "valid answer");
        assert_eq!(records[0].embedding.len(), 8);

        assert_eq!(board.answers()["q"], "valid answer");
        assert!(list_unanswered(&board).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_trims_answer_before_writing() {
        let board = seeded_board(&["q"], &[]);
        let knowledge = Arc::new(FakeKnowledge::default());
        let recorder = recorder_with(knowledge.clone());

        submit_answer(&board, &recorder, "q", "  padded  ").await.unwrap();

        assert_eq!(board.answers()["q"], "padded");
        assert_eq!(knowledge.records()[0].answer, "padded");
    }

    #[tokio::test]
    async fn test_concurrent_distinct_questions_both_land() {
        let board = Arc::new(seeded_board(&["q1", "q2"], &[]));
        let knowledge = Arc::new(FakeKnowledge::default());
        let recorder = Arc::new(recorder_with(knowledge.clone()));

        let (r1, r2) = tokio::join!(
            submit_answer(board.as_ref(), &recorder, "q1", "first"),
            submit_answer(board.as_ref(), &recorder, "q2", "second"),
        );
        r1.unwrap();
        r2.unwrap();

        let answers = board.answers();
        assert_eq!(answers["q1"], "first");
        assert_eq!(answers["q2"], "second");
        assert_eq!(knowledge.records().len(), 2);
    }

    #[tokio::test]
    async fn test_resubmission_overwrites_silently() {
        let board = seeded_board(&["q"], &[("q", "old")]);
        let knowledge = Arc::new(FakeKnowledge::default());
        let recorder = recorder_with(knowledge.clone());

        submit_answer(&board, &recorder, "q", "new").await.unwrap();

        assert_eq!(board.answers()["q"], "new", "Last write wins, no guard");
    }

    #[tokio::test]
    async fn test_submit_failure_maps_store_error() {
        let board = FakeBoard::unreachable();
        let knowledge = Arc::new(FakeKnowledge::default());
        let recorder = recorder_with(knowledge.clone());

        let result = submit_answer(&board, &recorder, "q", "answer").await;

        // Knowledge record lands first, then the merge fails: the knowledge
        // store is ahead of the aggregate, never the reverse.
        assert!(matches!(result, Err(TriageError::StoreWrite(_))));
        assert_eq!(knowledge.records().len(), 1);
    }

    #[tokio::test]
    async fn test_list_unanswered_rejects_malformed_board() {
        let board = FakeBoard::malformed();
        let result = list_unanswered(&board).await;
        match result {
            Err(TriageError::Retrieval(StoreError::Malformed(_))) => {}
            other => panic!("Expected malformed retrieval error, got {:?}", other),
        }
    }
}
