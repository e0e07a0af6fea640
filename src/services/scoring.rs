use std::collections::HashMap;

use thiserror::Error;

use crate::db::models::Question;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScoringError {
    #[error("quiz has no questions to score")]
    EmptyQuiz,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreSummary {
    pub(crate) score: f64,
    pub(crate) correct_count: usize,
    pub(crate) total_questions: usize,
}

/// Grade a submitted answer map against a quiz's questions.
///
/// An absent answer never matches; answer entries for question ids outside
/// the quiz are ignored. A quiz with no questions is rejected rather than
/// scored, so a divide-by-zero score can never be persisted.
pub(crate) fn score_answers(
    questions: &[Question],
    answers: &HashMap<String, i32>,
) -> Result<ScoreSummary, ScoringError> {
    let total_questions = questions.len();
    if total_questions == 0 {
        return Err(ScoringError::EmptyQuiz);
    }

    let correct_count = questions
        .iter()
        .filter(|question| answers.get(&question.id) == Some(&question.correct_answer))
        .count();

    let score = 100.0 * correct_count as f64 / total_questions as f64;

    Ok(ScoreSummary { score, correct_count, total_questions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use sqlx::types::Json;

    fn question(id: &str, correct_answer: i32) -> Question {
        Question {
            id: id.to_string(),
            text: format!("question {id}"),
            options: Json(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
            correct_answer,
            quiz_id: "quiz-1".to_string(),
            created_at: primitive_now_utc(),
        }
    }

    #[test]
    fn scores_partial_credit() {
        let questions = [question("q1", 1), question("q2", 0), question("q3", 2)];
        let answers = HashMap::from([
            ("q1".to_string(), 1),
            ("q2".to_string(), 2),
            ("q3".to_string(), 2),
        ]);

        let summary = score_answers(&questions, &answers).expect("score");
        assert_eq!(summary.correct_count, 2);
        assert_eq!(summary.total_questions, 3);
        assert!((summary.score - 200.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_answer_map_scores_zero() {
        let questions = [question("q1", 1)];
        let summary = score_answers(&questions, &HashMap::new()).expect("score");

        assert_eq!(summary.correct_count, 0);
        assert_eq!(summary.total_questions, 1);
        assert_eq!(summary.score, 0.0);
    }

    #[test]
    fn full_marks_scores_hundred() {
        let questions = [question("q1", 1)];
        let answers = HashMap::from([("q1".to_string(), 1)]);
        let summary = score_answers(&questions, &answers).expect("score");

        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.score, 100.0);
    }

    #[test]
    fn foreign_question_ids_are_ignored() {
        let questions = [question("q1", 0)];
        let answers = HashMap::from([
            ("q1".to_string(), 0),
            ("other-quiz-question".to_string(), 0),
        ]);

        let summary = score_answers(&questions, &answers).expect("score");
        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.total_questions, 1);
        assert_eq!(summary.score, 100.0);
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let result = score_answers(&[], &HashMap::new());
        assert_eq!(result, Err(ScoringError::EmptyQuiz));
    }
}
