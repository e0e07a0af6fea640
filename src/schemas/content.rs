use serde::{Deserialize, Deserializer, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::{Lesson, Module, Question, Quiz};

/// Forgiving `order` field: accepts a JSON number or a numeric string;
/// anything else (including garbage text) reads as absent. Creation then
/// falls back to 0 and updates leave the stored value untouched.
pub(crate) fn lenient_order<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(number)) => {
            number.as_i64().and_then(|wide| i32::try_from(wide).ok())
        }
        Some(serde_json::Value::String(raw)) => raw.trim().parse::<i32>().ok(),
        _ => None,
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleCreate {
    pub(crate) title: String,
    #[serde(default, deserialize_with = "lenient_order")]
    pub(crate) order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleUpdate {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default, deserialize_with = "lenient_order")]
    pub(crate) order: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModuleResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) order: i32,
    pub(crate) course_id: String,
    pub(crate) created_at: String,
}

impl ModuleResponse {
    pub(crate) fn from_db(module: Module) -> Self {
        Self {
            id: module.id,
            title: module.title,
            order: module.position,
            course_id: module.course_id,
            created_at: format_primitive(module.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonCreate {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) content: Option<String>,
    #[serde(default, deserialize_with = "lenient_order")]
    pub(crate) order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonUpdate {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) content: Option<String>,
    #[serde(default, deserialize_with = "lenient_order")]
    pub(crate) order: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) order: i32,
    pub(crate) module_id: String,
    pub(crate) created_at: String,
}

impl LessonResponse {
    pub(crate) fn from_db(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title,
            content: lesson.content,
            order: lesson.position,
            module_id: lesson.module_id,
            created_at: format_primitive(lesson.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizCreate {
    pub(crate) title: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) lesson_id: String,
    pub(crate) created_at: String,
}

impl QuizResponse {
    pub(crate) fn from_db(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            lesson_id: quiz.lesson_id,
            created_at: format_primitive(quiz.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionCreate {
    pub(crate) text: String,
    pub(crate) options: Vec<String>,
    #[serde(alias = "correctAnswer")]
    pub(crate) correct_answer: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) options: Vec<String>,
    pub(crate) correct_answer: i32,
    pub(crate) quiz_id: String,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: Question) -> Self {
        Self {
            id: question.id,
            text: question.text,
            options: question.options.0,
            correct_answer: question.correct_answer,
            quiz_id: question.quiz_id,
        }
    }
}
