use std::collections::HashMap;

use sqlx::PgPool;

use crate::api::errors::ApiError;
use crate::db::models::{Lesson, Module, Question, Quiz};
use crate::repositories;

/// One module of a course tree with its lessons in display order.
pub(in crate::api) struct ModuleNode {
    pub(in crate::api) module: Module,
    pub(in crate::api) lessons: Vec<LessonNode>,
}

pub(in crate::api) struct LessonNode {
    pub(in crate::api) lesson: Lesson,
    pub(in crate::api) quiz: Option<QuizNode>,
}

pub(in crate::api) struct QuizNode {
    pub(in crate::api) quiz: Quiz,
    pub(in crate::api) questions: Vec<Question>,
}

/// Fetch a course's full nested tree (modules, lessons, quiz, questions)
/// ordered by `position` ascending at every level. Batch queries per level
/// rather than a query per row.
pub(in crate::api) async fn load_course_tree(
    db: &PgPool,
    course_id: &str,
) -> Result<Vec<ModuleNode>, ApiError> {
    let modules = repositories::modules::list_by_course(db, course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list modules"))?;

    let module_ids: Vec<String> = modules.iter().map(|module| module.id.clone()).collect();
    let lessons = if module_ids.is_empty() {
        Vec::new()
    } else {
        repositories::lessons::list_by_modules(db, &module_ids)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list lessons"))?
    };

    let lesson_ids: Vec<String> = lessons.iter().map(|lesson| lesson.id.clone()).collect();
    let quizzes = if lesson_ids.is_empty() {
        Vec::new()
    } else {
        repositories::quizzes::list_by_lessons(db, &lesson_ids)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list quizzes"))?
    };

    let quiz_ids: Vec<String> = quizzes.iter().map(|quiz| quiz.id.clone()).collect();
    let questions = if quiz_ids.is_empty() {
        Vec::new()
    } else {
        repositories::questions::list_by_quizzes(db, &quiz_ids)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list questions"))?
    };

    let mut questions_by_quiz: HashMap<String, Vec<Question>> = HashMap::new();
    for question in questions {
        questions_by_quiz.entry(question.quiz_id.clone()).or_default().push(question);
    }

    let mut quiz_by_lesson: HashMap<String, QuizNode> = HashMap::new();
    for quiz in quizzes {
        let questions = questions_by_quiz.remove(&quiz.id).unwrap_or_default();
        quiz_by_lesson.insert(quiz.lesson_id.clone(), QuizNode { quiz, questions });
    }

    let mut lessons_by_module: HashMap<String, Vec<LessonNode>> = HashMap::new();
    for lesson in lessons {
        let quiz = quiz_by_lesson.remove(&lesson.id);
        lessons_by_module
            .entry(lesson.module_id.clone())
            .or_default()
            .push(LessonNode { lesson, quiz });
    }

    Ok(modules
        .into_iter()
        .map(|module| {
            let lessons = lessons_by_module.remove(&module.id).unwrap_or_default();
            ModuleNode { module, lessons }
        })
        .collect())
}

/// Modules with their lessons for a batch of courses, keyed by course id.
/// Used by the instructor course list.
pub(in crate::api) async fn load_modules_with_lessons(
    db: &PgPool,
    course_ids: &[String],
) -> Result<HashMap<String, Vec<(Module, Vec<Lesson>)>>, ApiError> {
    if course_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let modules = repositories::modules::list_by_courses(db, course_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list modules"))?;

    let module_ids: Vec<String> = modules.iter().map(|module| module.id.clone()).collect();
    let lessons = if module_ids.is_empty() {
        Vec::new()
    } else {
        repositories::lessons::list_by_modules(db, &module_ids)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list lessons"))?
    };

    let mut lessons_by_module: HashMap<String, Vec<Lesson>> = HashMap::new();
    for lesson in lessons {
        lessons_by_module.entry(lesson.module_id.clone()).or_default().push(lesson);
    }

    let mut result: HashMap<String, Vec<(Module, Vec<Lesson>)>> = HashMap::new();
    for module in modules {
        let lessons = lessons_by_module.remove(&module.id).unwrap_or_default();
        result.entry(module.course_id.clone()).or_default().push((module, lessons));
    }

    Ok(result)
}
