use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Course;
use crate::schemas::content::{LessonResponse, QuestionResponse};

#[derive(Debug, Deserialize)]
pub(crate) struct CourseCreate {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[serde(alias = "thumbnail", alias = "thumbnailUrl")]
    pub(crate) thumbnail_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseUpdate {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) instructor_id: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            thumbnail_url: course.thumbnail_url,
            instructor_id: course.instructor_id,
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }
}

/// Instructor course-list entry: modules and lessons nested in display
/// order plus the enrollment count.
#[derive(Debug, Serialize)]
pub(crate) struct CourseSummaryResponse {
    #[serde(flatten)]
    pub(crate) course: CourseResponse,
    pub(crate) enrollment_count: i64,
    pub(crate) modules: Vec<ModuleSummaryResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModuleSummaryResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) order: i32,
    pub(crate) lessons: Vec<LessonResponse>,
}

/// Full edit view: everything an instructor needs to author the course,
/// including correct answers.
#[derive(Debug, Serialize)]
pub(crate) struct CourseEditResponse {
    #[serde(flatten)]
    pub(crate) course: CourseResponse,
    pub(crate) modules: Vec<ModuleEditResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModuleEditResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) order: i32,
    pub(crate) lessons: Vec<LessonEditResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonEditResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) order: i32,
    pub(crate) quiz: Option<QuizEditResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizEditResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) questions: Vec<QuestionResponse>,
}
