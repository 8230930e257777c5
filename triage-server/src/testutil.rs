//! In-memory fakes for the store and embedding seams, used by workflow and
//! HTTP tests. Each fake can be switched into a failing mode to exercise the
//! error paths without a database or a network.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use triage_core::embeddings::{EmbeddingBackend, EmbeddingError};
use triage_core::models::{NewKnowledgeRecord, QueryRecord, QuestionBoard};
use triage_core::store::{BoardStore, KnowledgeStore, QueryLogStore, StoreError};

// ============================================================================
// FakeBoard
// ============================================================================

enum BoardMode {
    Normal,
    Unreachable,
    Malformed,
}

pub struct FakeBoard {
    state: Mutex<Option<QuestionBoard>>,
    mode: BoardMode,
}

impl FakeBoard {
    /// No aggregate record exists yet.
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(None),
            mode: BoardMode::Normal,
        }
    }

    pub fn with_board(board: QuestionBoard) -> Self {
        Self {
            state: Mutex::new(Some(board)),
            mode: BoardMode::Normal,
        }
    }

    /// Every operation fails as if the store were offline.
    pub fn unreachable() -> Self {
        Self {
            state: Mutex::new(None),
            mode: BoardMode::Unreachable,
        }
    }

    /// Reads fail at the deserialization boundary.
    pub fn malformed() -> Self {
        Self {
            state: Mutex::new(None),
            mode: BoardMode::Malformed,
        }
    }

    /// Snapshot of the current answers map (empty if no record exists).
    pub fn answers(&self) -> HashMap<String, String> {
        self.state
            .lock()
            .unwrap()
            .as_ref()
            .map(|b| b.answers.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BoardStore for FakeBoard {
    async fn fetch(&self) -> Result<Option<QuestionBoard>, StoreError> {
        match self.mode {
            BoardMode::Unreachable => {
                Err(StoreError::Unavailable("board store offline".to_string()))
            }
            BoardMode::Malformed => Err(StoreError::Malformed(
                "answers is not a string map".to_string(),
            )),
            BoardMode::Normal => Ok(self.state.lock().unwrap().clone()),
        }
    }

    async fn merge_answer(&self, question: &str, answer: &str) -> Result<(), StoreError> {
        if matches!(self.mode, BoardMode::Unreachable) {
            return Err(StoreError::Unavailable("board store offline".to_string()));
        }

        let mut guard = self.state.lock().unwrap();
        let board = guard.get_or_insert_with(QuestionBoard::default);
        board
            .answers
            .insert(question.to_string(), answer.to_string());
        Ok(())
    }
}

// ============================================================================
// FakeKnowledge
// ============================================================================

#[derive(Default)]
pub struct FakeKnowledge {
    records: Mutex<Vec<NewKnowledgeRecord>>,
    fail: bool,
}

impl FakeKnowledge {
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn records(&self) -> Vec<NewKnowledgeRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeStore for FakeKnowledge {
    async fn insert(&self, record: NewKnowledgeRecord) -> Result<Uuid, StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable(
                "knowledge store offline".to_string(),
            ));
        }

        self.records.lock().unwrap().push(record);
        Ok(Uuid::new_v4())
    }
}

// ============================================================================
// FakeEmbedder
// ============================================================================

pub struct FakeEmbedder {
    dimensions: usize,
    fail: bool,
}

impl FakeEmbedder {
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            dimensions: 0,
            fail: true,
        }
    }
}

#[async_trait]
impl EmbeddingBackend for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.fail {
            return Err(EmbeddingError::Api {
                code: 503,
                message: "embedding model offline".to_string(),
            });
        }

        Ok(vec![0.1; self.dimensions])
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "fake"
    }
}

// ============================================================================
// FakeQueryLog
// ============================================================================

#[derive(Default)]
pub struct FakeQueryLog {
    entries: Vec<QueryRecord>,
    last_limit: Mutex<Option<usize>>,
    fail: bool,
}

impl FakeQueryLog {
    /// `count` entries, most recent first, one minute apart.
    pub fn with_entries(count: usize) -> Self {
        let now = Utc::now();
        let entries = (0..count)
            .map(|i| QueryRecord {
                id: Uuid::new_v4(),
                question: format!("question {i}"),
                answer: format!("answer {i}"),
                ts: now - Duration::minutes(i as i64),
            })
            .collect();

        Self {
            entries,
            last_limit: Mutex::new(None),
            fail: false,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            entries: Vec::new(),
            last_limit: Mutex::new(None),
            fail: true,
        }
    }

    pub fn last_limit(&self) -> Option<usize> {
        *self.last_limit.lock().unwrap()
    }
}

#[async_trait]
impl QueryLogStore for FakeQueryLog {
    async fn recent(&self, limit: usize) -> Result<Vec<QueryRecord>, StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable("query log offline".to_string()));
        }

        *self.last_limit.lock().unwrap() = Some(limit);
        Ok(self.entries.iter().take(limit).cloned().collect())
    }
}
