use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::{Enrollment, Question};
use crate::repositories::courses::CatalogCourse;
use crate::repositories::enrollments::EnrolledCourse;

#[derive(Debug, Serialize)]
pub(crate) struct CatalogCourseResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) instructor_name: String,
    pub(crate) module_count: i64,
    pub(crate) enrollment_count: i64,
    pub(crate) created_at: String,
}

impl CatalogCourseResponse {
    pub(crate) fn from_row(row: CatalogCourse) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            thumbnail_url: row.thumbnail_url,
            instructor_name: row.instructor_name,
            module_count: row.module_count,
            enrollment_count: row.enrollment_count,
            created_at: format_primitive(row.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrolledCourseResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) instructor_name: String,
    pub(crate) module_count: i64,
    pub(crate) enrolled_at: String,
}

impl EnrolledCourseResponse {
    pub(crate) fn from_row(row: EnrolledCourse) -> Self {
        Self {
            id: row.course_id,
            title: row.title,
            description: row.description,
            thumbnail_url: row.thumbnail_url,
            instructor_name: row.instructor_name,
            module_count: row.module_count,
            enrolled_at: format_primitive(row.enrolled_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentResponse {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) course_id: String,
    pub(crate) created_at: String,
}

impl EnrollmentResponse {
    pub(crate) fn from_db(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            user_id: enrollment.user_id,
            course_id: enrollment.course_id,
            created_at: format_primitive(enrollment.created_at),
        }
    }
}

/// Enrolled-student reading view. Same tree and ordering as the instructor
/// edit view, but questions never carry the correct answer: grading happens
/// server-side only.
#[derive(Debug, Serialize)]
pub(crate) struct CourseContentResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) instructor_name: String,
    pub(crate) modules: Vec<ModuleContentResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModuleContentResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) order: i32,
    pub(crate) lessons: Vec<LessonContentResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonContentResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) order: i32,
    pub(crate) quiz: Option<QuizContentResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizContentResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) questions: Vec<StudentQuestionResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentQuestionResponse {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) options: Vec<String>,
}

impl StudentQuestionResponse {
    pub(crate) fn from_db(question: Question) -> Self {
        Self { id: question.id, text: question.text, options: question.options.0 }
    }
}
