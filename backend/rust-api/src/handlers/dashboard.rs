use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::services::progress_service::ProgressService;
use crate::services::AppState;

fn progress_service(state: &AppState) -> ProgressService {
    ProgressService::new(state.catalog.clone(), state.completions.clone())
}

/// GET /home/progress
pub async fn home_progress(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let rollup = progress_service(&state).rollup(&user_id).await;
    Ok(Json(rollup))
}

/// GET /home/coursesInProgress
pub async fn courses_in_progress(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let cards = progress_service(&state).courses_in_progress(&user_id).await;
    Ok(Json(cards))
}

/// GET /home/competencies
pub async fn home_competencies(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let competencies = progress_service(&state).category_competency(&user_id).await;
    Ok(Json(competencies))
}

/// GET /manager/employee/{employeeId}/dashboard
///
/// Managers can only inspect their own reports; the team membership check
/// is the authorization boundary.
pub async fn employee_dashboard(
    State(state): State<Arc<AppState>>,
    CurrentUser(manager_id): CurrentUser,
    Path(employee_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        "Employee dashboard: manager={}, employee={}",
        manager_id,
        employee_id
    );

    let is_report = state
        .catalog
        .team(&manager_id)
        .is_some_and(|team| team.iter().any(|e| e == &employee_id));
    if !is_report {
        return Err(ApiError::Authorization);
    }

    let dashboard = progress_service(&state).employee_dashboard(&employee_id).await;
    Ok(Json(dashboard))
}

/// GET /manager/team
pub async fn team_rollup(
    State(state): State<Arc<AppState>>,
    CurrentUser(manager_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let rollup = progress_service(&state).team_rollup(&manager_id).await?;
    Ok(Json(rollup))
}
