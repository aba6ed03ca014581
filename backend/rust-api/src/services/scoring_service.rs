use std::collections::HashMap;
use std::sync::Arc;

use super::catalog::{CourseCatalog, ResolvedActivity};
use super::completion_service::{percent, CompletionService, CompletionStore};
use crate::error::ApiError;
use crate::metrics;
use crate::models::completion::{ScoreResult, SubmittedAnswer};
use crate::models::course::Question;

pub struct ScoringService {
    catalog: Arc<CourseCatalog>,
    completions: CompletionService,
}

impl ScoringService {
    pub fn new(catalog: Arc<CourseCatalog>, store: Arc<CompletionStore>) -> Self {
        let completions = CompletionService::new(catalog.clone(), store);
        Self {
            catalog,
            completions,
        }
    }

    /// Score a quiz or exam submission. Validation is all-or-nothing: on
    /// any failure no completion record is written and no partial credit
    /// is awarded. Accepted submissions overwrite the stored score
    /// (retakes allowed, last write wins) and return the fresh course
    /// progress.
    pub async fn submit(
        &self,
        user_id: &str,
        course_id: &str,
        activity_id: &str,
        answers: &[SubmittedAnswer],
    ) -> Result<ScoreResult, ApiError> {
        tracing::info!(
            "Processing submission: user={}, course={}, activity={}, answers={}",
            user_id,
            course_id,
            activity_id,
            answers.len()
        );

        let course = self.catalog.require_course(course_id)?;
        if !self.catalog.is_enrolled(user_id, course_id) {
            return Err(ApiError::Authorization);
        }

        let activity = self.catalog.resolve_activity(&course, activity_id)?;
        let label = activity.kind.as_str();

        let (score, correct_count) = match grade(&activity.questions, answers) {
            Ok(outcome) => outcome,
            Err(e) => {
                metrics::record_submission(label, "rejected");
                return Err(e);
            }
        };

        self.completions
            .record_scored(user_id, &course, &activity.activity_id, score, label)
            .await?;
        let new_progress = self.completions.progress_for_course(user_id, &course).await;

        metrics::record_submission(label, "accepted");
        metrics::QUIZ_SCORE_PERCENT.observe(f64::from(score));

        tracing::info!(
            "Submission accepted: user={}, activity={}, score={}, progress={}",
            user_id,
            activity.activity_id,
            score,
            new_progress
        );

        Ok(ScoreResult {
            message: "Activity completed".to_string(),
            score,
            correct_answers: correct_count,
            total_questions: activity.questions.len() as u32,
            new_progress,
        })
    }

    /// Exam fetch helper: the exam behaves as a quiz attached at course
    /// level, resolved through the same path submissions take.
    pub fn resolve_exam(
        &self,
        course_id: &str,
    ) -> Result<ResolvedActivity, ApiError> {
        let course = self.catalog.require_course(course_id)?;
        let exam_id = course
            .exam_id
            .as_deref()
            .filter(|_| course.has_exam)
            .ok_or_else(|| ApiError::not_found("exam"))?;
        self.catalog.resolve_activity(&course, exam_id)
    }
}

/// Pure grading step: every question answered exactly once and no unknown
/// questions first, then option membership, then counting.
fn grade(questions: &[Question], answers: &[SubmittedAnswer]) -> Result<(u8, u32), ApiError> {
    let mut selected: HashMap<&str, &str> = HashMap::new();
    for answer in answers {
        if selected
            .insert(&answer.question_id, &answer.selected_option_id)
            .is_some()
        {
            return Err(ApiError::MalformedSubmission(format!(
                "question {} answered more than once",
                answer.question_id
            )));
        }
        if !questions.iter().any(|q| q.id == answer.question_id) {
            return Err(ApiError::MalformedSubmission(format!(
                "unknown question {}",
                answer.question_id
            )));
        }
    }

    for question in questions {
        if !selected.contains_key(question.id.as_str()) {
            return Err(ApiError::MalformedSubmission(format!(
                "question {} is unanswered",
                question.id
            )));
        }
    }

    let mut correct_count: u32 = 0;
    for question in questions {
        let choice = selected[question.id.as_str()];
        if !question.has_option(choice) {
            return Err(ApiError::MalformedSubmission(format!(
                "invalid option {} for question {}",
                choice, question.id
            )));
        }
        if choice == question.correct_option_id {
            correct_count += 1;
        }
    }

    let score = percent(correct_count as usize, questions.len());
    Ok((score, correct_count))
}
