use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// In-memory view of the aggregate question record for a clinic.
///
/// `questions` holds every question ever received, insertion order preserved,
/// duplicates included. `answers` maps exact question text to its answer; a
/// question with no entry is unanswered. Nothing enforces that every answer
/// key appears in `questions` — stray keys are simply ignored on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBoard {
    pub questions: Vec<String>,
    pub answers: HashMap<String, String>,
}

impl QuestionBoard {
    /// Questions with no recorded answer, in their original order.
    pub fn unanswered(&self) -> Vec<String> {
        self.questions
            .iter()
            .filter(|q| !self.answers.contains_key(q.as_str()))
            .cloned()
            .collect()
    }
}
