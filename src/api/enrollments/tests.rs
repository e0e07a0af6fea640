use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn duplicate_enrollment_conflicts_and_stores_one_row() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "enroll1@example.com",
        "instructor-pass",
    )
    .await;
    let student = test_support::insert_student(
        ctx.state.db(),
        "Sam Student",
        "enroll2@example.com",
        "student-pass",
    )
    .await;
    let course = test_support::insert_course(ctx.state.db(), "Course", &instructor.id).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{}/enroll", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("enroll");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{}/enroll", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("enroll again");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM enrollments WHERE user_id = $1 AND course_id = $2",
    )
    .bind(&student.id)
    .bind(&course.id)
    .fetch_one(ctx.state.db())
    .await
    .expect("count enrollments");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn enrolling_in_missing_course_is_not_found() {
    let ctx = test_support::setup_test_context().await;

    let student = test_support::insert_student(
        ctx.state.db(),
        "Sam Student",
        "enroll3@example.com",
        "student-pass",
    )
    .await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses/no-such-course/enroll",
            Some(&token),
            None,
        ))
        .await
        .expect("enroll");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn content_is_gated_by_enrollment_and_hides_answers() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "enroll4@example.com",
        "instructor-pass",
    )
    .await;
    let student = test_support::insert_student(
        ctx.state.db(),
        "Sam Student",
        "enroll5@example.com",
        "student-pass",
    )
    .await;
    let course = test_support::insert_course(ctx.state.db(), "Gated Course", &instructor.id).await;
    let module = test_support::insert_module(ctx.state.db(), &course.id, "M1", 0).await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "L1", 0).await;
    let quiz = test_support::insert_quiz(ctx.state.db(), &lesson.id, "Q1").await;
    test_support::insert_question(ctx.state.db(), &quiz.id, "2+2?", &["3", "4", "5"], 1).await;

    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/courses/{}/content", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("content without enrollment");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    test_support::insert_enrollment(ctx.state.db(), &student.id, &course.id).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/courses/{}/content", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("content with enrollment");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["title"], "Gated Course");
    assert_eq!(body["instructor_name"], "Ada Lovelace");

    let question = &body["modules"][0]["lessons"][0]["quiz"]["questions"][0];
    assert_eq!(question["text"], "2+2?");
    assert!(question.get("correct_answer").is_none(), "answers must not leak to students");
}

#[tokio::test]
async fn enrolled_courses_list_newest_enrollment_first() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "enroll6@example.com",
        "instructor-pass",
    )
    .await;
    let student = test_support::insert_student(
        ctx.state.db(),
        "Sam Student",
        "enroll7@example.com",
        "student-pass",
    )
    .await;
    let first = test_support::insert_course(ctx.state.db(), "First Course", &instructor.id).await;
    let second = test_support::insert_course(ctx.state.db(), "Second Course", &instructor.id).await;

    test_support::insert_enrollment(ctx.state.db(), &student.id, &first.id).await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    test_support::insert_enrollment(ctx.state.db(), &student.id, &second.id).await;

    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/enrollments",
            Some(&token),
            None,
        ))
        .await
        .expect("list enrollments");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let courses = body.as_array().expect("courses");
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0]["title"], "Second Course");
    assert_eq!(courses[1]["title"], "First Course");
}

#[tokio::test]
async fn catalog_lists_courses_with_counts() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "enroll8@example.com",
        "instructor-pass",
    )
    .await;
    let student = test_support::insert_student(
        ctx.state.db(),
        "Sam Student",
        "enroll9@example.com",
        "student-pass",
    )
    .await;
    let course = test_support::insert_course(ctx.state.db(), "Catalog Course", &instructor.id).await;
    test_support::insert_module(ctx.state.db(), &course.id, "M1", 0).await;
    test_support::insert_enrollment(ctx.state.db(), &student.id, &course.id).await;

    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/catalog", Some(&token), None))
        .await
        .expect("catalog");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let entry = &body.as_array().expect("catalog")[0];
    assert_eq!(entry["title"], "Catalog Course");
    assert_eq!(entry["instructor_name"], "Ada Lovelace");
    assert_eq!(entry["module_count"], 1);
    assert_eq!(entry["enrollment_count"], 1);
}
