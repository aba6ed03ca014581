use std::collections::BTreeMap;
use std::sync::Arc;

use super::catalog::CourseCatalog;
use super::completion_service::{percent, CompletionService, CompletionStore};
use crate::error::ApiError;
use crate::models::course::Course;
use crate::models::progress::{
    CategoryCompetency, CourseCard, EmployeeDashboard, HomeProgress, TeamMemberSummary, TeamRollup,
};
use crate::utils::format_duration;

/// Read-only rollups over catalog and completion state. Everything here is
/// recomputed per request from the underlying records, so the numbers can
/// never drift from the completion table.
pub struct ProgressService {
    catalog: Arc<CourseCatalog>,
    completions: CompletionService,
}

/// One enrolled course with the user's progress and completion status.
struct CourseStanding {
    course: Arc<Course>,
    progress: u8,
    completed: bool,
}

impl ProgressService {
    pub fn new(catalog: Arc<CourseCatalog>, store: Arc<CompletionStore>) -> Self {
        let completions = CompletionService::new(catalog.clone(), store);
        Self {
            catalog,
            completions,
        }
    }

    async fn standings(&self, user_id: &str) -> Vec<CourseStanding> {
        let mut standings = Vec::new();
        for course in self.catalog.enrolled_courses(user_id) {
            let progress = self.completions.progress_for_course(user_id, &course).await;
            let exam_done = match course.exam_id.as_deref().filter(|_| course.has_exam) {
                Some(exam_id) => self.completions.is_complete(user_id, exam_id).await,
                None => true,
            };
            standings.push(CourseStanding {
                progress,
                completed: progress == 100 && exam_done,
                course,
            });
        }
        standings
    }

    /// Home-screen rollup across the user's enrolled courses. The overall
    /// percent is the unweighted mean of per-course progress; a course whose
    /// lessons are all done but whose exam is outstanding still counts as
    /// ongoing.
    pub async fn rollup(&self, user_id: &str) -> HomeProgress {
        let standings = self.standings(user_id).await;
        let total = standings.len();

        let completed_count = standings.iter().filter(|s| s.completed).count() as u32;
        let ongoing_count = standings
            .iter()
            .filter(|s| !s.completed && s.progress > 0)
            .count() as u32;
        let overall_percent = mean_percent(standings.iter().map(|s| s.progress));

        tracing::debug!(
            "Home rollup: user={}, total={}, ongoing={}, completed={}, overall={}",
            user_id,
            total,
            ongoing_count,
            completed_count,
            overall_percent
        );

        HomeProgress {
            total_courses: total as u32,
            ongoing_count,
            completed_count,
            overall_percent,
        }
    }

    /// Per-category competency levels: unweighted mean of course progress
    /// within each category, untouched courses included at 0%. Sorted by
    /// category name for a stable wire order.
    pub async fn category_competency(&self, user_id: &str) -> Vec<CategoryCompetency> {
        let standings = self.standings(user_id).await;

        let mut by_category: BTreeMap<&str, Vec<u8>> = BTreeMap::new();
        for standing in &standings {
            by_category
                .entry(standing.course.category.as_str())
                .or_default()
                .push(standing.progress);
        }

        by_category
            .into_iter()
            .map(|(category, values)| CategoryCompetency {
                category: category.to_string(),
                competence_level: mean_percent(values.into_iter()),
            })
            .collect()
    }

    /// Courses the user has started but not finished, as home-screen cards.
    pub async fn courses_in_progress(&self, user_id: &str) -> Vec<CourseCard> {
        let mut cards = Vec::new();
        for standing in self.standings(user_id).await {
            if standing.completed || standing.progress == 0 {
                continue;
            }
            cards.push(self.card(user_id, &standing).await);
        }
        cards
    }

    /// Manager view of one employee: competencies plus enrolled courses
    /// bucketed by status. Completed cards carry the course score.
    pub async fn employee_dashboard(&self, employee_id: &str) -> EmployeeDashboard {
        let competencies = self.category_competency(employee_id).await;

        let mut completed = Vec::new();
        let mut ongoing = Vec::new();
        let mut not_started = Vec::new();
        for standing in self.standings(employee_id).await {
            let card = self.card(employee_id, &standing).await;
            if standing.completed {
                completed.push(card);
            } else if standing.progress > 0 {
                ongoing.push(card);
            } else {
                not_started.push(card);
            }
        }

        EmployeeDashboard {
            employee_id: employee_id.to_string(),
            competencies,
            completed_courses: completed,
            ongoing_courses: ongoing,
            not_started_courses: not_started,
        }
    }

    /// Whole-team aggregate for a manager. Unknown managers get a 404
    /// rather than an empty rollup.
    pub async fn team_rollup(&self, manager_id: &str) -> Result<TeamRollup, ApiError> {
        let employee_ids = self
            .catalog
            .team(manager_id)
            .ok_or_else(|| ApiError::not_found("team"))?;

        let mut members = Vec::with_capacity(employee_ids.len());
        for employee_id in employee_ids {
            let rollup = self.rollup(employee_id).await;
            members.push(TeamMemberSummary {
                user_id: employee_id.clone(),
                overall_percent: rollup.overall_percent,
                ongoing_count: rollup.ongoing_count,
                completed_count: rollup.completed_count,
            });
        }

        let average_percent = mean_percent(members.iter().map(|m| m.overall_percent));
        Ok(TeamRollup {
            manager_id: manager_id.to_string(),
            team_size: members.len() as u32,
            average_percent,
            ongoing_count: members.iter().map(|m| m.ongoing_count).sum(),
            completed_count: members.iter().map(|m| m.completed_count).sum(),
            members,
        })
    }

    async fn card(&self, user_id: &str, standing: &CourseStanding) -> CourseCard {
        let course = &standing.course;
        let score = if standing.completed {
            self.course_score(user_id, course).await
        } else {
            None
        };
        CourseCard {
            id: course.id.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            image: course.image.clone(),
            category: course.category.clone(),
            difficulty: course.difficulty.code(),
            duration: format_duration(course.duration_seconds),
            rating: course.rating,
            participants: course.participants,
            progress: standing.progress,
            score,
        }
    }

    /// Course score for a finished course: the exam score when the course
    /// has one, otherwise the mean of recorded quiz scores. `None` when the
    /// course has no scored activities at all.
    async fn course_score(&self, user_id: &str, course: &Course) -> Option<u8> {
        if let Some(exam_id) = course.exam_id.as_deref().filter(|_| course.has_exam) {
            return self
                .completions
                .record_for(user_id, exam_id)
                .await
                .and_then(|r| r.score);
        }

        let mut scores = Vec::new();
        for module in &course.modules {
            for item in &module.content {
                if !item.body.is_quiz() {
                    continue;
                }
                if let Some(record) = self.completions.record_for(user_id, &item.id).await {
                    if let Some(score) = record.score {
                        scores.push(score);
                    }
                }
            }
        }
        if scores.is_empty() {
            return None;
        }
        Some(mean_percent(scores.into_iter()))
    }
}

/// Round-half-up mean of percent values; 0 for an empty iterator.
fn mean_percent<I: Iterator<Item = u8>>(values: I) -> u8 {
    let (sum, count) = values.fold((0usize, 0usize), |(s, n), v| (s + v as usize, n + 1));
    if count == 0 {
        return 0;
    }
    percent(sum, count * 100)
}
