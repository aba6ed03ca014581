use serde::{Deserialize, Serialize};

use super::course::AnswerOption;
use crate::services::sequencer::ContentRef;

/// Course detail decorated with the requesting user's completion state.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub difficulty: u8,
    pub category: String,
    pub duration: String,
    pub duration_seconds: u32,
    pub rating: f32,
    pub participants: u32,
    pub progress: u8,
    pub has_exam: bool,
    pub exam_id: Option<String>,
    pub modules: Vec<ModuleView>,
    /// First uncompleted item in traversal order; `null` once the whole
    /// course (exam included) is done.
    pub continue_target: Option<ContentRef>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModuleView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: Vec<ContentItemView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentItemView {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub type_code: u8,
    pub completed: bool,
}

/// Question as shown to the learner: no correct option id on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: String,
    pub question: String,
    pub options: Vec<AnswerOption>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExamView {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub questions: Vec<QuestionView>,
}

/// "Next lesson" link target returned by the traversal endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextContent {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub type_code: u8,
    pub module_index: usize,
    pub index_in_module: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub progress: u8,
}
