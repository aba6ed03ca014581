#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use corplearn_api::services::catalog::{CatalogSnapshot, CourseCatalog};
use corplearn_api::{config::Config, create_router, services::AppState};

pub async fn create_test_app() -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        catalog_path: "unused-in-tests".to_string(),
        metrics_auth: "admin:test".to_string(),
    };

    let snapshot: CatalogSnapshot =
        serde_json::from_value(seed_catalog()).expect("seed catalog should deserialize");
    let catalog = CourseCatalog::from_snapshot(snapshot).expect("seed catalog should validate");

    let app_state = Arc::new(AppState::with_catalog(config, catalog));
    create_router(app_state)
}

/// Two-course catalog plus one untouched course, covering every content
/// kind, an exam-bearing course and a manager with two reports.
fn seed_catalog() -> serde_json::Value {
    json!({
        "courses": [
            {
                "id": "course-onboarding",
                "title": "Employee Onboarding",
                "description": "Processes and tools for new hires.",
                "image": "/images/onboarding.png",
                "difficulty": "beginner",
                "category": "Onboarding",
                "durationSeconds": 5400,
                "rating": 4.5,
                "participants": 100,
                "modules": [
                    {
                        "id": "mod-welcome",
                        "title": "Welcome",
                        "description": "First steps",
                        "content": [
                            {
                                "id": "l-welcome",
                                "title": "Welcome",
                                "type": "textLesson",
                                "blocks": [
                                    { "kind": "text", "value": "Hello" },
                                    { "kind": "image", "value": "/images/office.png" }
                                ]
                            },
                            {
                                "id": "l-intro",
                                "title": "Intro video",
                                "type": "videoLesson",
                                "videoUrl": "https://cdn.example.com/intro.mp4"
                            }
                        ]
                    },
                    {
                        "id": "mod-tools",
                        "title": "Tools",
                        "description": "",
                        "content": [
                            {
                                "id": "l-quiz",
                                "title": "Tools checkpoint",
                                "type": "quiz",
                                "questions": [
                                    question("q1", "a"),
                                    question("q2", "b"),
                                    question("q3", "c"),
                                    question("q4", "a")
                                ]
                            }
                        ]
                    }
                ],
                "hasExam": true,
                "examId": "exam-onboarding"
            },
            {
                "id": "course-security",
                "title": "Security Awareness",
                "description": "Phishing and passwords.",
                "image": "/images/security.png",
                "difficulty": "intermediate",
                "category": "Security",
                "durationSeconds": 3600,
                "rating": 4.8,
                "participants": 250,
                "modules": [
                    {
                        "id": "mod-basics",
                        "title": "Basics",
                        "description": "",
                        "content": [
                            {
                                "id": "sec-project",
                                "title": "Threat report",
                                "type": "pdfProject",
                                "description": "Upload a short PDF report."
                            },
                            {
                                "id": "sec-text",
                                "title": "Phishing basics",
                                "type": "textLesson",
                                "blocks": [
                                    { "kind": "text", "value": "Check the sender." }
                                ]
                            }
                        ]
                    }
                ],
                "hasExam": false
            },
            {
                "id": "course-untouched",
                "title": "Data Handling",
                "description": "Classification levels.",
                "image": "/images/data.png",
                "difficulty": "advanced",
                "category": "Security",
                "durationSeconds": 1800,
                "rating": 4.1,
                "participants": 40,
                "modules": [
                    {
                        "id": "mod-data",
                        "title": "Levels",
                        "description": "",
                        "content": [
                            {
                                "id": "data-text",
                                "title": "Levels overview",
                                "type": "textLesson",
                                "blocks": []
                            }
                        ]
                    }
                ],
                "hasExam": false
            }
        ],
        "exams": [
            {
                "id": "exam-onboarding",
                "title": "Onboarding final exam",
                "questions": [question("e1", "a"), question("e2", "b")]
            }
        ],
        "enrollments": [
            { "userId": "employee-1", "courseId": "course-onboarding" },
            { "userId": "employee-1", "courseId": "course-security" },
            { "userId": "employee-1", "courseId": "course-untouched" },
            { "userId": "employee-2", "courseId": "course-onboarding" }
        ],
        "teams": [
            { "managerId": "manager-1", "employeeIds": ["employee-1", "employee-2"] }
        ]
    })
}

fn question(id: &str, correct: &str) -> serde_json::Value {
    json!({
        "id": id,
        "text": format!("{}?", id),
        "options": [
            { "id": "a", "text": "Option A" },
            { "id": "b", "text": "Option B" },
            { "id": "c", "text": "Option C" }
        ],
        "correctOptionId": correct
    })
}

pub async fn get(app: &Router, user_id: &str, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header("x-user-id", user_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn post_json(
    app: &Router,
    user_id: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("x-user-id", user_id)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn post_empty(app: &Router, user_id: &str, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("x-user-id", user_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
