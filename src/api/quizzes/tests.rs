use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn lesson_holds_at_most_one_quiz() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "quizzes1@example.com",
        "instructor-pass",
    )
    .await;
    let token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Course", &instructor.id).await;
    let module = test_support::insert_module(ctx.state.db(), &course.id, "Module", 0).await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Lesson", 0).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/lessons/{}/quiz", lesson.id),
            Some(&token),
            Some(json!({"title": "Checkpoint"})),
        ))
        .await
        .expect("create quiz");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/lessons/{}/quiz", lesson.id),
            Some(&token),
            Some(json!({"title": "Second Checkpoint"})),
        ))
        .await
        .expect("create second quiz");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn question_validation_rejects_bad_inputs() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "quizzes2@example.com",
        "instructor-pass",
    )
    .await;
    let token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Course", &instructor.id).await;
    let module = test_support::insert_module(ctx.state.db(), &course.id, "Module", 0).await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Lesson", 0).await;
    let quiz = test_support::insert_quiz(ctx.state.db(), &lesson.id, "Quiz").await;

    let too_few_options = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{}/questions", quiz.id),
            Some(&token),
            Some(json!({"text": "Pick one", "options": ["only"], "correct_answer": 0})),
        ))
        .await
        .expect("create question");
    assert_eq!(too_few_options.status(), StatusCode::BAD_REQUEST);

    let index_out_of_range = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{}/questions", quiz.id),
            Some(&token),
            Some(json!({"text": "Pick one", "options": ["a", "b"], "correct_answer": 2})),
        ))
        .await
        .expect("create question");
    assert_eq!(index_out_of_range.status(), StatusCode::BAD_REQUEST);

    let negative_index = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{}/questions", quiz.id),
            Some(&token),
            Some(json!({"text": "Pick one", "options": ["a", "b"], "correct_answer": -1})),
        ))
        .await
        .expect("create question");
    assert_eq!(negative_index.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn question_options_round_trip_through_storage() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "quizzes3@example.com",
        "instructor-pass",
    )
    .await;
    let token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let course = test_support::insert_course(ctx.state.db(), "Course", &instructor.id).await;
    let module = test_support::insert_module(ctx.state.db(), &course.id, "Module", 0).await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Lesson", 0).await;
    let quiz = test_support::insert_quiz(ctx.state.db(), &lesson.id, "Quiz").await;

    let options = json!(["first choice", "second choice", "third choice"]);
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{}/questions", quiz.id),
            Some(&token),
            Some(json!({"text": "Which?", "options": options, "correctAnswer": 2})),
        ))
        .await
        .expect("create question");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["options"], options);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/courses/{}", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("get course");
    let body = test_support::read_json(response).await;
    let question = &body["modules"][0]["lessons"][0]["quiz"]["questions"][0];
    assert_eq!(question["options"], options);
    assert_eq!(question["correct_answer"], 2);
}
