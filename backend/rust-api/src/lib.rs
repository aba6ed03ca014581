#![allow(dead_code)]

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: std::sync::Arc<services::AppState>) -> Router {
    // CORS configuration for dashboard endpoints consumed cross-origin
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any); // TODO: restrict to specific origins in production

    Router::new()
        // Public endpoints (no auth required)
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        .nest(
            "/api/v1",
            learning_routes().merge(dashboard_routes().layer(cors)),
        )
        .with_state(app_state)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

fn learning_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route("/courses/{course_id}", get(handlers::learning::get_course))
        .route(
            "/courses/{course_id}/progress",
            get(handlers::learning::get_progress),
        )
        .route(
            "/courses/{course_id}/next/{current_id}",
            get(handlers::learning::next_content),
        )
        .route(
            "/courses/{course_id}/lessons/{lesson_id}/complete",
            post(handlers::learning::mark_lesson_complete),
        )
        .route(
            "/courses/{course_id}/lessons/{lesson_id}/submit",
            post(handlers::learning::submit_quiz),
        )
        .route("/test/{course_id}", get(handlers::learning::get_exam))
        .route(
            "/test/{course_id}/submit",
            post(handlers::learning::submit_exam),
        )
}

fn dashboard_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route("/home/progress", get(handlers::dashboard::home_progress))
        .route(
            "/home/coursesInProgress",
            get(handlers::dashboard::courses_in_progress),
        )
        .route(
            "/home/competencies",
            get(handlers::dashboard::home_competencies),
        )
        .route(
            "/manager/employee/{employee_id}/dashboard",
            get(handlers::dashboard::employee_dashboard),
        )
        .route("/manager/team", get(handlers::dashboard::team_rollup))
}
