//! Postgres implementations of the store traits.
//!
//! `questions` and `answers` live as JSONB columns on one row per clinic.
//! Deserialization is strict at this boundary: a malformed field (e.g.
//! `answers` that is not a string map) is rejected with
//! `StoreError::Malformed` instead of being patched up at call sites.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::{BoardStore, KnowledgeStore, QueryLogStore, StoreError};
use crate::models::{NewKnowledgeRecord, QueryRecord, QuestionBoard};

// ============================================================================
// PgBoardStore
// ============================================================================

pub struct PgBoardStore {
    pool: PgPool,
    clinic_id: String,
}

impl PgBoardStore {
    pub fn new(pool: PgPool, clinic_id: impl Into<String>) -> Self {
        Self {
            pool,
            clinic_id: clinic_id.into(),
        }
    }
}

#[async_trait]
impl BoardStore for PgBoardStore {
    async fn fetch(&self) -> Result<Option<QuestionBoard>, StoreError> {
        let row: Option<(serde_json::Value, serde_json::Value)> = sqlx::query_as(
            "SELECT questions, answers FROM question_boards WHERE clinic_id = $1",
        )
        .bind(&self.clinic_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((questions, answers)) = row else {
            return Ok(None);
        };

        let questions: Vec<String> = serde_json::from_value(questions).map_err(|e| {
            StoreError::Malformed(format!("questions is not a string array: {e}"))
        })?;
        let answers: HashMap<String, String> = serde_json::from_value(answers)
            .map_err(|e| StoreError::Malformed(format!("answers is not a string map: {e}")))?;

        Ok(Some(QuestionBoard { questions, answers }))
    }

    async fn merge_answer(&self, question: &str, answer: &str) -> Result<(), StoreError> {
        // jsonb || is a shallow key merge: every other answer survives, and
        // concurrent merges for distinct questions both land. Same-key
        // concurrent merges race last-write-wins.
        sqlx::query(
            "INSERT INTO question_boards (clinic_id, answers)
             VALUES ($1, jsonb_build_object($2::text, $3::text))
             ON CONFLICT (clinic_id) DO UPDATE
             SET answers = question_boards.answers || EXCLUDED.answers,
                 updated_at = now()",
        )
        .bind(&self.clinic_id)
        .bind(question)
        .bind(answer)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// PgKnowledgeStore
// ============================================================================

pub struct PgKnowledgeStore {
    pool: PgPool,
}

impl PgKnowledgeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KnowledgeStore for PgKnowledgeStore {
    async fn insert(&self, record: NewKnowledgeRecord) -> Result<Uuid, StoreError> {
        let NewKnowledgeRecord {
            status,
            question,
            answer,
            embedding,
        } = record;

        let row: (Uuid,) = sqlx::query_as(
            "INSERT INTO knowledge_records (status, question, answer, embedding)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(status)
        .bind(question)
        .bind(answer)
        .bind(Vector::from(embedding))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }
}

// ============================================================================
// PgQueryLog
// ============================================================================

pub struct PgQueryLog {
    pool: PgPool,
}

impl PgQueryLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryLogStore for PgQueryLog {
    async fn recent(&self, limit: usize) -> Result<Vec<QueryRecord>, StoreError> {
        let rows: Vec<QueryRecord> = sqlx::query_as(
            "SELECT id, question, answer, ts FROM query_log
             ORDER BY ts DESC
             LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
