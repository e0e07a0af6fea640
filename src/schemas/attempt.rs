use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::QuizAttempt;

/// `answers` maps question id to the selected option index. Entries for
/// questions outside the quiz are ignored during scoring.
#[derive(Debug, Deserialize)]
pub(crate) struct AttemptSubmit {
    #[serde(default)]
    pub(crate) answers: HashMap<String, i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizAttemptResponse {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) score: f64,
    pub(crate) created_at: String,
}

impl QuizAttemptResponse {
    pub(crate) fn from_db(attempt: QuizAttempt) -> Self {
        Self {
            id: attempt.id,
            quiz_id: attempt.quiz_id,
            score: attempt.score,
            created_at: format_primitive(attempt.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptResultResponse {
    pub(crate) score: f64,
    pub(crate) correct_count: usize,
    pub(crate) total_questions: usize,
    pub(crate) attempt: QuizAttemptResponse,
}
