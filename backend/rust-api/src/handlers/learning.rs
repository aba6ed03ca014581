use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::error::ApiError;
use crate::extractors::{AppJson, CurrentUser};
use crate::models::views::{
    ContentItemView, CourseView, ExamView, ModuleView, NextContent, ProgressResponse, QuestionView,
};
use crate::models::SubmitQuizRequest;
use crate::services::completion_service::CompletionService;
use crate::services::scoring_service::ScoringService;
use crate::services::sequencer::{self, SequenceKind};
use crate::services::AppState;
use crate::utils::format_duration;

/// GET /courses/{courseId}
///
/// Course detail with the caller's completion flags, progress percent and
/// the first outstanding item to continue from.
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Fetching course: user={}, course={}", user_id, course_id);

    let course = state.catalog.require_course(&course_id)?;
    if !state.catalog.is_enrolled(&user_id, &course_id) {
        return Err(ApiError::Authorization);
    }

    let completions = CompletionService::new(state.catalog.clone(), state.completions.clone());
    let completed = completions.completion_set(&user_id, &course).await;
    let progress = completions.progress_for_course(&user_id, &course).await;
    let continue_target = sequencer::first_incomplete(&course, &completed);

    let modules = course
        .modules
        .iter()
        .map(|module| ModuleView {
            id: module.id.clone(),
            title: module.title.clone(),
            description: module.description.clone(),
            content: module
                .content
                .iter()
                .map(|item| ContentItemView {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    type_code: item.body.type_code(),
                    completed: completed.contains(&item.id),
                })
                .collect(),
        })
        .collect();

    Ok(Json(CourseView {
        id: course.id.clone(),
        title: course.title.clone(),
        description: course.description.clone(),
        image: course.image.clone(),
        difficulty: course.difficulty.code(),
        category: course.category.clone(),
        duration: format_duration(course.duration_seconds),
        duration_seconds: course.duration_seconds,
        rating: course.rating,
        participants: course.participants,
        progress,
        has_exam: course.has_exam,
        exam_id: course.exam_id.clone(),
        modules,
        continue_target,
    }))
}

/// POST /courses/{courseId}/lessons/{lessonId}/complete
pub async fn mark_lesson_complete(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let completions = CompletionService::new(state.catalog.clone(), state.completions.clone());
    let response = completions
        .mark_lesson_complete(&user_id, &course_id, &lesson_id)
        .await?;
    Ok(Json(response))
}

/// POST /courses/{courseId}/lessons/{lessonId}/submit
pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path((course_id, lesson_id)): Path<(String, String)>,
    AppJson(request): AppJson<SubmitQuizRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::MalformedSubmission(e.to_string()))?;

    let scoring = ScoringService::new(state.catalog.clone(), state.completions.clone());
    let result = scoring
        .submit(&user_id, &course_id, &lesson_id, &request.answers)
        .await?;
    Ok(Json(result))
}

/// GET /test/{courseId}
///
/// The course exam as the learner sees it: questions without correct
/// option ids.
pub async fn get_exam(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let course = state.catalog.require_course(&course_id)?;
    if !state.catalog.is_enrolled(&user_id, &course_id) {
        return Err(ApiError::Authorization);
    }

    let exam = state
        .catalog
        .exam_for(&course)
        .ok_or_else(|| ApiError::not_found("exam"))?;

    let completions = CompletionService::new(state.catalog.clone(), state.completions.clone());
    let completed = completions.is_complete(&user_id, &exam.id).await;

    Ok(Json(ExamView {
        id: exam.id.clone(),
        title: exam.title.clone(),
        completed,
        questions: exam
            .questions
            .iter()
            .map(|q| QuestionView {
                id: q.id.clone(),
                question: q.text.clone(),
                options: q.options.clone(),
            })
            .collect(),
    }))
}

/// POST /test/{courseId}/submit
pub async fn submit_exam(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(course_id): Path<String>,
    AppJson(request): AppJson<SubmitQuizRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::MalformedSubmission(e.to_string()))?;

    let scoring = ScoringService::new(state.catalog.clone(), state.completions.clone());
    let exam = scoring.resolve_exam(&course_id)?;
    let result = scoring
        .submit(&user_id, &course_id, &exam.activity_id, &request.answers)
        .await?;
    Ok(Json(result))
}

/// GET /courses/{courseId}/progress
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let course = state.catalog.require_course(&course_id)?;
    if !state.catalog.is_enrolled(&user_id, &course_id) {
        return Err(ApiError::Authorization);
    }

    let completions = CompletionService::new(state.catalog.clone(), state.completions.clone());
    let progress = completions.progress_for_course(&user_id, &course).await;
    Ok(Json(ProgressResponse { progress }))
}

/// GET /courses/{courseId}/next/{currentId}
///
/// The item after `currentId` in traversal order; `null` when the current
/// item is the last one.
pub async fn next_content(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path((course_id, current_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let course = state.catalog.require_course(&course_id)?;
    if !state.catalog.is_enrolled(&user_id, &course_id) {
        return Err(ApiError::Authorization);
    }
    if course.find_item(&current_id).is_none()
        && course.exam_id.as_deref() != Some(current_id.as_str())
    {
        return Err(ApiError::not_found("content item"));
    }

    let next = sequencer::next_after(&course, &current_id).map(|r| {
        let title = match r.kind {
            SequenceKind::Exam => state
                .catalog
                .exam_for(&course)
                .map(|e| e.title.clone())
                .unwrap_or_default(),
            _ => course
                .find_item(&r.content_item_id)
                .map(|i| i.title.clone())
                .unwrap_or_default(),
        };
        NextContent {
            id: r.content_item_id,
            title,
            type_code: r.kind.type_code(),
            module_index: r.module_index,
            index_in_module: r.index_in_module,
        }
    });

    Ok(Json(next))
}
