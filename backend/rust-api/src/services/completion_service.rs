use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::catalog::CourseCatalog;
use crate::error::ApiError;
use crate::metrics;
use crate::models::completion::{CompletionRecord, MarkCompleteResponse};
use crate::models::course::Course;

/// Integer percent with round-half-up. Exact in integer arithmetic: the
/// only .5 cases have an even denominator.
pub(crate) fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((100 * completed + total / 2) / total) as u8
}

/// Per-(user, item) completion table. The write guard is the mutual
/// exclusion boundary for concurrent submissions against the same key: the
/// upsert commits atomically or not at all, and the composite key makes
/// duplicate records unrepresentable.
#[derive(Default)]
pub struct CompletionStore {
    records: RwLock<HashMap<(String, String), CompletionRecord>>,
}

impl CompletionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a completion record. Returns the stored record and whether it
    /// already existed. Lesson scores are never overwritten; retakeable
    /// activities (quiz/exam) take the latest score, last write wins.
    async fn upsert(
        &self,
        user_id: &str,
        content_item_id: &str,
        score: Option<u8>,
        retakeable: bool,
    ) -> (CompletionRecord, bool) {
        let key = (user_id.to_string(), content_item_id.to_string());
        let mut records = self.records.write().await;

        if let Some(existing) = records.get_mut(&key) {
            if retakeable && score.is_some() {
                existing.score = score;
                existing.completed_at = Utc::now();
            }
            return (existing.clone(), true);
        }

        let record = CompletionRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            content_item_id: content_item_id.to_string(),
            completed_at: Utc::now(),
            score,
        };
        records.insert(key, record.clone());
        (record, false)
    }

    pub async fn get(&self, user_id: &str, content_item_id: &str) -> Option<CompletionRecord> {
        let records = self.records.read().await;
        records
            .get(&(user_id.to_string(), content_item_id.to_string()))
            .cloned()
    }

    pub async fn contains(&self, user_id: &str, content_item_id: &str) -> bool {
        let records = self.records.read().await;
        records.contains_key(&(user_id.to_string(), content_item_id.to_string()))
    }

    /// Subset of `candidate_ids` the user has completed.
    pub async fn completed_subset<'a, I>(&self, user_id: &str, candidate_ids: I) -> HashSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let records = self.records.read().await;
        candidate_ids
            .into_iter()
            .filter(|id| records.contains_key(&(user_id.to_string(), id.to_string())))
            .map(String::from)
            .collect()
    }
}

/// Completion tracker: the only writer of per-user completion state.
pub struct CompletionService {
    catalog: Arc<CourseCatalog>,
    store: Arc<CompletionStore>,
}

impl CompletionService {
    pub fn new(catalog: Arc<CourseCatalog>, store: Arc<CompletionStore>) -> Self {
        Self { catalog, store }
    }

    /// Direct completion for text/video/PDF-project lessons, after the
    /// external prerequisite (e.g. a successful upload) is satisfied.
    /// Idempotent: repeat calls return the existing record untouched.
    pub async fn mark_lesson_complete(
        &self,
        user_id: &str,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<MarkCompleteResponse, ApiError> {
        let course = self.catalog.require_course(course_id)?;
        if !self.catalog.is_enrolled(user_id, course_id) {
            return Err(ApiError::Authorization);
        }

        let item = course
            .find_item(lesson_id)
            .ok_or_else(|| ApiError::not_found("lesson"))?;
        if item.body.is_quiz() {
            return Err(ApiError::MalformedSubmission(
                "quiz activities are completed by submitting answers".to_string(),
            ));
        }

        let (record, already_completed) = self.store.upsert(user_id, lesson_id, None, false).await;
        if !already_completed {
            metrics::record_completion(item.body.kind_str());
        }
        let new_progress = self.progress_for_course(user_id, &course).await;

        tracing::info!(
            "Lesson completion: user={}, course={}, lesson={}, already={}, progress={}",
            user_id,
            course_id,
            lesson_id,
            already_completed,
            new_progress
        );

        Ok(MarkCompleteResponse {
            content_item_id: record.content_item_id,
            completed_at: record.completed_at,
            score: record.score,
            already_completed,
            new_progress,
        })
    }

    /// Completion side effect of a scored submission. Quiz and exam
    /// activities are retakeable, so the stored score is recomputed to the
    /// latest attempt.
    pub(crate) async fn record_scored(
        &self,
        user_id: &str,
        course: &Course,
        activity_id: &str,
        score: u8,
        kind_label: &str,
    ) -> Result<(CompletionRecord, bool), ApiError> {
        if !self.catalog.is_enrolled(user_id, &course.id) {
            return Err(ApiError::Authorization);
        }
        let (record, already) = self
            .store
            .upsert(user_id, activity_id, Some(score), true)
            .await;
        if !already {
            metrics::record_completion(kind_label);
        }
        Ok((record, already))
    }

    pub async fn is_complete(&self, user_id: &str, content_item_id: &str) -> bool {
        self.store.contains(user_id, content_item_id).await
    }

    pub async fn record_for(
        &self,
        user_id: &str,
        content_item_id: &str,
    ) -> Option<CompletionRecord> {
        self.store.get(user_id, content_item_id).await
    }

    /// Completed item ids for one course, exam included; feeds the
    /// sequencer's `first_incomplete`.
    pub async fn completion_set(&self, user_id: &str, course: &Course) -> HashSet<String> {
        let mut candidates = course.trackable_ids();
        if let Some(exam_id) = course.exam_id.as_deref().filter(|_| course.has_exam) {
            candidates.push(exam_id);
        }
        self.store.completed_subset(user_id, candidates).await
    }

    /// Course progress as an integer percent over trackable items (module
    /// content only; the exam is tracked separately). 0 for an empty set.
    pub async fn progress_for_course(&self, user_id: &str, course: &Course) -> u8 {
        let trackable = course.trackable_ids();
        let total = trackable.len();
        let completed = self.store.completed_subset(user_id, trackable).await.len();
        percent(completed, total)
    }
}
