use serde::{Deserialize, Serialize};

/// Per-user dashboard rollup. A course counts as completed only when its
/// progress is 100 and, if it carries an exam, the exam is done too.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeProgress {
    pub total_courses: u32,
    pub ongoing_count: u32,
    pub completed_count: u32,
    pub overall_percent: u8,
}

/// Competency bar for one course category: unweighted mean of course
/// progress across the category, untouched courses included at 0%.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCompetency {
    pub category: String,
    pub competence_level: u8,
}

/// Compact course card used by the home and manager dashboards.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub difficulty: u8,
    pub duration: String,
    pub rating: f32,
    pub participants: u32,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

/// Manager view of a single employee.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub employee_id: String,
    pub competencies: Vec<CategoryCompetency>,
    pub completed_courses: Vec<CourseCard>,
    pub ongoing_courses: Vec<CourseCard>,
    pub not_started_courses: Vec<CourseCard>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberSummary {
    pub user_id: String,
    pub overall_percent: u8,
    pub ongoing_count: u32,
    pub completed_count: u32,
}

/// Aggregate dashboard for a manager's whole team: plain counts and an
/// unweighted average, no special-cased weighting.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRollup {
    pub manager_id: String,
    pub team_size: u32,
    pub average_percent: u8,
    pub ongoing_count: u32,
    pub completed_count: u32,
    pub members: Vec<TeamMemberSummary>,
}
