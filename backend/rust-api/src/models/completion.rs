use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Durable fact that a user finished a content item (or the course exam).
/// One record per (user, item); the store upserts, never duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub id: String,
    pub user_id: String,
    pub content_item_id: String,
    pub completed_at: DateTime<Utc>,
    pub score: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub selected_option_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1, message = "answers must not be empty"))]
    pub answers: Vec<SubmittedAnswer>,
}

/// Outcome of a scored submission, in the shape the frontend's quiz client
/// consumes.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub message: String,
    pub score: u8,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub new_progress: u8,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkCompleteResponse {
    pub content_item_id: String,
    pub completed_at: DateTime<Utc>,
    pub score: Option<u8>,
    pub already_completed: bool,
    pub new_progress: u8,
}
