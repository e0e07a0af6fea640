use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::repositories;
use crate::test_support;

struct QuizFixture {
    course_id: String,
    quiz_id: String,
    question_id: String,
}

async fn quiz_fixture(ctx: &test_support::TestContext, instructor_id: &str) -> QuizFixture {
    let course = test_support::insert_course(ctx.state.db(), "Intro", instructor_id).await;
    let module = test_support::insert_module(ctx.state.db(), &course.id, "M1", 0).await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "L1", 0).await;
    let quiz = test_support::insert_quiz(ctx.state.db(), &lesson.id, "Q1").await;
    let question =
        test_support::insert_question(ctx.state.db(), &quiz.id, "2+2?", &["3", "4", "5"], 1).await;

    QuizFixture { course_id: course.id, quiz_id: quiz.id, question_id: question.id }
}

#[tokio::test]
async fn correct_answer_scores_hundred_and_persists_attempt() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "attempts1@example.com",
        "instructor-pass",
    )
    .await;
    let student = test_support::insert_student(
        ctx.state.db(),
        "Sam Student",
        "attempts2@example.com",
        "student-pass",
    )
    .await;
    let fixture = quiz_fixture(&ctx, &instructor.id).await;
    test_support::insert_enrollment(ctx.state.db(), &student.id, &fixture.course_id).await;

    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let answers = json!({"answers": {&fixture.question_id: 1}});
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{}/attempts", fixture.quiz_id),
            Some(&token),
            Some(answers),
        ))
        .await
        .expect("submit attempt");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["score"], 100.0);
    assert_eq!(body["correct_count"], 1);
    assert_eq!(body["total_questions"], 1);

    let count = repositories::quiz_attempts::count_for_user_quiz(
        ctx.state.db(),
        &student.id,
        &fixture.quiz_id,
    )
    .await
    .expect("count attempts");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn empty_answers_score_zero_and_attempts_accumulate() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "attempts3@example.com",
        "instructor-pass",
    )
    .await;
    let student = test_support::insert_student(
        ctx.state.db(),
        "Sam Student",
        "attempts4@example.com",
        "student-pass",
    )
    .await;
    let fixture = quiz_fixture(&ctx, &instructor.id).await;
    test_support::insert_enrollment(ctx.state.db(), &student.id, &fixture.course_id).await;

    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    for _ in 0..2 {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/quizzes/{}/attempts", fixture.quiz_id),
                Some(&token),
                Some(json!({"answers": {}})),
            ))
            .await
            .expect("submit attempt");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {body}");
        assert_eq!(body["score"], 0.0);
        assert_eq!(body["correct_count"], 0);
        assert_eq!(body["total_questions"], 1);
    }

    // History, not upsert: both zero-score submissions are kept.
    let count = repositories::quiz_attempts::count_for_user_quiz(
        ctx.state.db(),
        &student.id,
        &fixture.quiz_id,
    )
    .await
    .expect("count attempts");
    assert_eq!(count, 2);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/quizzes/{}/attempts", fixture.quiz_id),
            Some(&token),
            None,
        ))
        .await
        .expect("list attempts");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("attempts").len(), 2);
}

#[tokio::test]
async fn attempt_requires_enrollment() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "attempts5@example.com",
        "instructor-pass",
    )
    .await;
    let student = test_support::insert_student(
        ctx.state.db(),
        "Sam Student",
        "attempts6@example.com",
        "student-pass",
    )
    .await;
    let fixture = quiz_fixture(&ctx, &instructor.id).await;

    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{}/attempts", fixture.quiz_id),
            Some(&token),
            Some(json!({"answers": {}})),
        ))
        .await
        .expect("submit attempt");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_quiz_is_not_found() {
    let ctx = test_support::setup_test_context().await;

    let student = test_support::insert_student(
        ctx.state.db(),
        "Sam Student",
        "attempts7@example.com",
        "student-pass",
    )
    .await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/quizzes/no-such-quiz/attempts",
            Some(&token),
            Some(json!({"answers": {}})),
        ))
        .await
        .expect("submit attempt");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zero_question_quiz_is_rejected_without_attempt_row() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "attempts8@example.com",
        "instructor-pass",
    )
    .await;
    let student = test_support::insert_student(
        ctx.state.db(),
        "Sam Student",
        "attempts9@example.com",
        "student-pass",
    )
    .await;
    let course = test_support::insert_course(ctx.state.db(), "Empty Quiz Course", &instructor.id).await;
    let module = test_support::insert_module(ctx.state.db(), &course.id, "M1", 0).await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "L1", 0).await;
    let quiz = test_support::insert_quiz(ctx.state.db(), &lesson.id, "Empty Quiz").await;
    test_support::insert_enrollment(ctx.state.db(), &student.id, &course.id).await;

    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{}/attempts", quiz.id),
            Some(&token),
            Some(json!({"answers": {}})),
        ))
        .await
        .expect("submit attempt");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count =
        repositories::quiz_attempts::count_for_user_quiz(ctx.state.db(), &student.id, &quiz.id)
            .await
            .expect("count attempts");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn answers_for_foreign_questions_are_ignored() {
    let ctx = test_support::setup_test_context().await;

    let instructor = test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "attempts10@example.com",
        "instructor-pass",
    )
    .await;
    let student = test_support::insert_student(
        ctx.state.db(),
        "Sam Student",
        "attempts11@example.com",
        "student-pass",
    )
    .await;
    let fixture = quiz_fixture(&ctx, &instructor.id).await;
    test_support::insert_enrollment(ctx.state.db(), &student.id, &fixture.course_id).await;

    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let answers = json!({"answers": {
        &fixture.question_id: 1,
        "question-from-another-quiz": 0
    }});
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{}/attempts", fixture.quiz_id),
            Some(&token),
            Some(answers),
        ))
        .await
        .expect("submit attempt");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["score"], 100.0);
    assert_eq!(body["total_questions"], 1);
}
