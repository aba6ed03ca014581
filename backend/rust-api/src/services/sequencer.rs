use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::course::{ContentBody, Course};

/// Position of one entry in a course's flattened traversal sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentRef {
    pub content_item_id: String,
    #[serde(rename = "type")]
    pub kind: SequenceKind,
    pub module_index: usize,
    pub index_in_module: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SequenceKind {
    TextLesson,
    VideoLesson,
    Quiz,
    PdfProject,
    Exam,
}

impl SequenceKind {
    pub fn type_code(&self) -> u8 {
        match self {
            SequenceKind::TextLesson => 1,
            SequenceKind::VideoLesson => 2,
            SequenceKind::Quiz => 3,
            SequenceKind::PdfProject => 4,
            SequenceKind::Exam => 5,
        }
    }

    fn of(body: &ContentBody) -> Self {
        match body {
            ContentBody::Text { .. } => SequenceKind::TextLesson,
            ContentBody::Video { .. } => SequenceKind::VideoLesson,
            ContentBody::Quiz { .. } => SequenceKind::Quiz,
            ContentBody::PdfProject { .. } => SequenceKind::PdfProject,
        }
    }
}

/// Flatten a course into its traversal order: modules in stored order,
/// items in stored order within each module, exam appended last. Ordering
/// is strictly positional; empty modules contribute nothing. Derived fresh
/// from the snapshot on every call, so there is no cursor to desync.
pub fn flatten(course: &Course) -> Vec<ContentRef> {
    let mut sequence = Vec::new();
    for (module_index, module) in course.modules.iter().enumerate() {
        for (index_in_module, item) in module.content.iter().enumerate() {
            sequence.push(ContentRef {
                content_item_id: item.id.clone(),
                kind: SequenceKind::of(&item.body),
                module_index,
                index_in_module,
            });
        }
    }
    if course.has_exam {
        if let Some(exam_id) = &course.exam_id {
            // Synthetic terminal entry, one past the last module.
            sequence.push(ContentRef {
                content_item_id: exam_id.clone(),
                kind: SequenceKind::Exam,
                module_index: course.modules.len(),
                index_in_module: 0,
            });
        }
    }
    sequence
}

/// The entry immediately following `current_item_id`, or `None` when the
/// current item is the last one (the exam included).
pub fn next_after(course: &Course, current_item_id: &str) -> Option<ContentRef> {
    let sequence = flatten(course);
    sequence
        .iter()
        .position(|r| r.content_item_id == current_item_id)
        .and_then(|i| sequence.into_iter().nth(i + 1))
}

/// First entry whose id is not in `completed`; `None` means the course is
/// fully complete and the caller can offer review/restart.
pub fn first_incomplete(course: &Course, completed: &HashSet<String>) -> Option<ContentRef> {
    flatten(course)
        .into_iter()
        .find(|r| !completed.contains(&r.content_item_id))
}
