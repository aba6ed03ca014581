mod common;

use axum::http::StatusCode;
use serde_json::json;

const QUIZ_URI: &str = "/api/v1/courses/course-onboarding/lessons/l-quiz/submit";

fn answers(pairs: &[(&str, &str)]) -> serde_json::Value {
    json!({
        "answers": pairs
            .iter()
            .map(|(q, o)| json!({ "questionId": q, "selectedOptionId": o }))
            .collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn perfect_submission_scores_100() {
    let app = common::create_test_app().await;

    let body = common::expect_json(
        common::post_json(
            &app,
            "employee-1",
            QUIZ_URI,
            answers(&[("q1", "a"), ("q2", "b"), ("q3", "c"), ("q4", "a")]),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["message"], "Activity completed");
    assert_eq!(body["score"], 100);
    assert_eq!(body["correctAnswers"], 4);
    assert_eq!(body["totalQuestions"], 4);
    assert_eq!(body["newProgress"], 33);
}

#[tokio::test]
async fn partial_credit_rounds_to_integer_percent() {
    let app = common::create_test_app().await;

    let body = common::expect_json(
        common::post_json(
            &app,
            "employee-1",
            QUIZ_URI,
            answers(&[("q1", "a"), ("q2", "b"), ("q3", "c"), ("q4", "c")]),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["score"], 75);
    assert_eq!(body["correctAnswers"], 3);
}

#[tokio::test]
async fn incomplete_submission_is_rejected_without_side_effects() {
    let app = common::create_test_app().await;

    let body = common::expect_json(
        common::post_json(
            &app,
            "employee-1",
            QUIZ_URI,
            answers(&[("q1", "a"), ("q2", "b")]),
        )
        .await,
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await;
    assert!(body["message"].as_str().unwrap().contains("unanswered"));

    // No completion record was written.
    let body = common::expect_json(
        common::get(&app, "employee-1", "/api/v1/courses/course-onboarding/progress").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["progress"], 0);
}

#[tokio::test]
async fn unknown_question_and_invalid_option_are_rejected() {
    let app = common::create_test_app().await;

    let body = common::expect_json(
        common::post_json(
            &app,
            "employee-1",
            QUIZ_URI,
            answers(&[("q1", "a"), ("q2", "b"), ("q3", "c"), ("ghost", "a")]),
        )
        .await,
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await;
    assert!(body["message"].as_str().unwrap().contains("ghost"));

    let body = common::expect_json(
        common::post_json(
            &app,
            "employee-1",
            QUIZ_URI,
            answers(&[("q1", "z"), ("q2", "b"), ("q3", "c"), ("q4", "a")]),
        )
        .await,
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await;
    assert!(body["message"].as_str().unwrap().contains("invalid option"));
}

#[tokio::test]
async fn empty_answer_set_is_rejected() {
    let app = common::create_test_app().await;

    let response = common::post_json(&app, "employee-1", QUIZ_URI, json!({ "answers": [] })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn submitting_against_a_text_lesson_is_rejected() {
    let app = common::create_test_app().await;

    let response = common::post_json(
        &app,
        "employee-1",
        "/api/v1/courses/course-onboarding/lessons/l-welcome/submit",
        answers(&[("q1", "a")]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn retakes_keep_the_latest_score_without_double_counting() {
    let app = common::create_test_app().await;

    let first = common::expect_json(
        common::post_json(
            &app,
            "employee-1",
            QUIZ_URI,
            answers(&[("q1", "a"), ("q2", "b"), ("q3", "a"), ("q4", "b")]),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(first["score"], 50);
    assert_eq!(first["newProgress"], 33);

    let second = common::expect_json(
        common::post_json(
            &app,
            "employee-1",
            QUIZ_URI,
            answers(&[("q1", "a"), ("q2", "b"), ("q3", "c"), ("q4", "a")]),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(second["score"], 100);
    // Still one completed item out of three.
    assert_eq!(second["newProgress"], 33);
}

#[tokio::test]
async fn exam_submission_completes_the_course() {
    let app = common::create_test_app().await;

    for lesson in ["l-welcome", "l-intro"] {
        let uri = format!(
            "/api/v1/courses/course-onboarding/lessons/{}/complete",
            lesson
        );
        common::post_empty(&app, "employee-1", &uri).await;
    }
    common::post_json(
        &app,
        "employee-1",
        QUIZ_URI,
        answers(&[("q1", "a"), ("q2", "b"), ("q3", "c"), ("q4", "a")]),
    )
    .await;

    let body = common::expect_json(
        common::post_json(
            &app,
            "employee-1",
            "/api/v1/test/course-onboarding/submit",
            answers(&[("e1", "a"), ("e2", "b")]),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["score"], 100);
    assert_eq!(body["totalQuestions"], 2);
    // The exam does not feed the lesson progress bar.
    assert_eq!(body["newProgress"], 100);

    let rollup = common::expect_json(
        common::get(&app, "employee-1", "/api/v1/home/progress").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(rollup["completedCount"], 1);

    // Without an exam there is nothing to submit to.
    let response = common::post_json(
        &app,
        "employee-1",
        "/api/v1/test/course-security/submit",
        answers(&[("e1", "a")]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn finished_lessons_alone_do_not_complete_an_exam_course() {
    let app = common::create_test_app().await;

    for lesson in ["l-welcome", "l-intro"] {
        let uri = format!(
            "/api/v1/courses/course-onboarding/lessons/{}/complete",
            lesson
        );
        common::post_empty(&app, "employee-1", &uri).await;
    }
    common::post_json(
        &app,
        "employee-1",
        QUIZ_URI,
        answers(&[("q1", "a"), ("q2", "b"), ("q3", "c"), ("q4", "a")]),
    )
    .await;

    let rollup = common::expect_json(
        common::get(&app, "employee-1", "/api/v1/home/progress").await,
        StatusCode::OK,
    )
    .await;
    // 100% of lessons, exam outstanding: still ongoing.
    assert_eq!(rollup["completedCount"], 0);
    assert_eq!(rollup["ongoingCount"], 1);
}
