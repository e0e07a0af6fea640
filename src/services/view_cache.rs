//! Stale-view signals sent to the presentation layer after mutations.
//!
//! Fire-and-forget: an unreachable cache degrades page freshness, never
//! request correctness.

use crate::core::redis::RedisHandle;

pub(crate) const CATALOG: &str = "views:catalog";
pub(crate) const STUDENTS: &str = "views:students";

pub(crate) fn instructor_courses(instructor_id: &str) -> String {
    format!("views:instructor:{instructor_id}:courses")
}

pub(crate) fn course_edit(course_id: &str) -> String {
    format!("views:course:{course_id}:edit")
}

pub(crate) fn student_courses(user_id: &str) -> String {
    format!("views:student:{user_id}:courses")
}

pub(crate) async fn invalidate(redis: &RedisHandle, views: &[String]) {
    if let Err(err) = redis.delete_keys(views).await {
        tracing::warn!(error = %err, views = ?views, "Failed to signal stale views");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_keys_embed_ids() {
        assert_eq!(instructor_courses("i-1"), "views:instructor:i-1:courses");
        assert_eq!(course_edit("c-1"), "views:course:c-1:edit");
        assert_eq!(student_courses("s-1"), "views:student:s-1:courses");
    }
}
