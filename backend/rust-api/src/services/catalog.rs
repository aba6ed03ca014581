use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::course::{ContentBody, Course, Exam, Question};

/// On-disk shape of the catalog snapshot. Courses and exams are authored by
/// admins; enrollments and teams are mirrored in from the external
/// enrollment/directory collaborators at snapshot time.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub exams: Vec<Exam>,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub user_id: String,
    pub course_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub manager_id: String,
    pub employee_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Quiz,
    Exam,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Quiz => "quiz",
            ActivityKind::Exam => "exam",
        }
    }
}

/// A quiz content item or course exam, resolved for scoring.
#[derive(Debug, Clone)]
pub struct ResolvedActivity {
    pub activity_id: String,
    pub kind: ActivityKind,
    pub questions: Vec<Question>,
}

/// Read-mostly catalog shared across all users. Publish-time invariants are
/// enforced on load, so every course handed out is well-formed.
pub struct CourseCatalog {
    courses: Vec<Arc<Course>>,
    course_index: HashMap<String, usize>,
    exams: HashMap<String, Arc<Exam>>,
    enrollments: HashSet<(String, String)>,
    teams: HashMap<String, Vec<String>>,
}

impl CourseCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog snapshot {}", path.display()))?;
        let snapshot: CatalogSnapshot =
            serde_json::from_str(&raw).context("Failed to parse catalog snapshot")?;
        Self::from_snapshot(snapshot)
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self> {
        let mut exams = HashMap::new();
        for exam in snapshot.exams {
            validate_questions(&format!("exam {}", exam.id), &exam.questions)?;
            if exams.insert(exam.id.clone(), Arc::new(exam)).is_some() {
                bail!("duplicate exam id in catalog");
            }
        }

        let mut courses = Vec::with_capacity(snapshot.courses.len());
        let mut course_index = HashMap::new();
        for course in snapshot.courses {
            validate_course(&course, &exams)?;
            if course_index.contains_key(&course.id) {
                bail!("duplicate course id {} in catalog", course.id);
            }
            course_index.insert(course.id.clone(), courses.len());
            courses.push(Arc::new(course));
        }

        let enrollments = snapshot
            .enrollments
            .into_iter()
            .map(|e| (e.user_id, e.course_id))
            .collect();

        let teams = snapshot
            .teams
            .into_iter()
            .map(|t| (t.manager_id, t.employee_ids))
            .collect();

        Ok(Self {
            courses,
            course_index,
            exams,
            enrollments,
            teams,
        })
    }

    pub fn course(&self, course_id: &str) -> Option<Arc<Course>> {
        self.course_index
            .get(course_id)
            .map(|&i| self.courses[i].clone())
    }

    pub fn require_course(&self, course_id: &str) -> Result<Arc<Course>, ApiError> {
        self.course(course_id)
            .ok_or_else(|| ApiError::not_found("course"))
    }

    pub fn courses(&self) -> &[Arc<Course>] {
        &self.courses
    }

    pub fn exam_for(&self, course: &Course) -> Option<Arc<Exam>> {
        course
            .exam_id
            .as_deref()
            .filter(|_| course.has_exam)
            .and_then(|id| self.exams.get(id).cloned())
    }

    pub fn is_enrolled(&self, user_id: &str, course_id: &str) -> bool {
        self.enrollments
            .contains(&(user_id.to_string(), course_id.to_string()))
    }

    pub fn enrolled_courses(&self, user_id: &str) -> Vec<Arc<Course>> {
        self.courses
            .iter()
            .filter(|c| self.is_enrolled(user_id, &c.id))
            .cloned()
            .collect()
    }

    pub fn team(&self, manager_id: &str) -> Option<&[String]> {
        self.teams.get(manager_id).map(|v| v.as_slice())
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn exam_count(&self) -> usize {
        self.exams.len()
    }

    /// Resolve a submission target inside a course: either a quiz content
    /// item or the course exam. Anything else is a distinct failure.
    pub fn resolve_activity(
        &self,
        course: &Course,
        activity_id: &str,
    ) -> Result<ResolvedActivity, ApiError> {
        if course.has_exam && course.exam_id.as_deref() == Some(activity_id) {
            let exam = self
                .exams
                .get(activity_id)
                .ok_or_else(|| ApiError::not_found("exam"))?;
            return Ok(ResolvedActivity {
                activity_id: exam.id.clone(),
                kind: ActivityKind::Exam,
                questions: exam.questions.clone(),
            });
        }

        match course.find_item(activity_id) {
            Some(item) => match &item.body {
                ContentBody::Quiz { questions } => Ok(ResolvedActivity {
                    activity_id: item.id.clone(),
                    kind: ActivityKind::Quiz,
                    questions: questions.clone(),
                }),
                _ => Err(ApiError::NotAQuiz),
            },
            None => Err(ApiError::not_found("activity")),
        }
    }
}

fn validate_course(course: &Course, exams: &HashMap<String, Arc<Exam>>) -> Result<()> {
    if course.modules.is_empty() {
        bail!("course {} has no modules and cannot be published", course.id);
    }

    let mut seen_items = HashSet::new();
    for module in &course.modules {
        for item in &module.content {
            if !seen_items.insert(item.id.as_str()) {
                bail!("course {} has duplicate content item {}", course.id, item.id);
            }
            if let ContentBody::Quiz { questions } = &item.body {
                validate_questions(&format!("quiz {}", item.id), questions)?;
            }
        }
    }

    match (&course.has_exam, &course.exam_id) {
        (true, Some(exam_id)) => {
            if !exams.contains_key(exam_id) {
                bail!(
                    "course {} references exam {} which is not in the catalog",
                    course.id,
                    exam_id
                );
            }
        }
        (true, None) => bail!("course {} declares an exam but has no examId", course.id),
        (false, Some(_)) => bail!("course {} has examId but hasExam is false", course.id),
        (false, None) => {}
    }

    Ok(())
}

fn validate_questions(context: &str, questions: &[Question]) -> Result<()> {
    for question in questions {
        if question.options.len() < 2 {
            bail!(
                "{}: question {} needs at least two options",
                context,
                question.id
            );
        }
        let mut option_ids = HashSet::new();
        for option in &question.options {
            if !option_ids.insert(option.id.as_str()) {
                bail!(
                    "{}: question {} has duplicate option id {}",
                    context,
                    question.id,
                    option.id
                );
            }
        }
        if !question.has_option(&question.correct_option_id) {
            bail!(
                "{}: question {} lists correct option {} which does not exist",
                context,
                question.id,
                question.correct_option_id
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot_from(value: serde_json::Value) -> Result<CourseCatalog> {
        let snapshot: CatalogSnapshot = serde_json::from_value(value).expect("valid json");
        CourseCatalog::from_snapshot(snapshot)
    }

    fn minimal_course(id: &str, exam: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Course",
            "description": "",
            "difficulty": "beginner",
            "category": "General",
            "durationSeconds": 600,
            "modules": [{
                "id": format!("{id}-m1"),
                "title": "Module 1",
                "content": [{
                    "id": format!("{id}-l1"),
                    "title": "Lesson",
                    "type": "textLesson",
                    "blocks": []
                }]
            }],
            "hasExam": exam.is_some(),
            "examId": exam
        })
    }

    #[test]
    fn rejects_course_without_modules() {
        let result = snapshot_from(json!({
            "courses": [{
                "id": "c1",
                "title": "Empty",
                "description": "",
                "difficulty": "beginner",
                "category": "General",
                "durationSeconds": 0,
                "modules": [],
                "hasExam": false
            }]
        }));
        let err = result.err().expect("empty course must be rejected");
        assert!(err.to_string().contains("no modules"));
    }

    #[test]
    fn rejects_unreachable_exam() {
        let result = snapshot_from(json!({
            "courses": [minimal_course("c1", Some("exam-missing"))],
            "exams": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_question_with_bad_correct_option() {
        let result = snapshot_from(json!({
            "courses": [],
            "exams": [{
                "id": "e1",
                "title": "Exam",
                "questions": [{
                    "id": "q1",
                    "text": "?",
                    "options": [
                        { "id": "a", "text": "A" },
                        { "id": "b", "text": "B" }
                    ],
                    "correctOptionId": "z"
                }]
            }]
        }));
        let err = result.err().expect("bad correct option must be rejected");
        assert!(err.to_string().contains("q1"));
    }

    #[test]
    fn resolves_exam_and_rejects_non_quiz_items() {
        let catalog = snapshot_from(json!({
            "courses": [minimal_course("c1", Some("e1"))],
            "exams": [{
                "id": "e1",
                "title": "Final",
                "questions": [{
                    "id": "q1",
                    "text": "?",
                    "options": [
                        { "id": "a", "text": "A" },
                        { "id": "b", "text": "B" }
                    ],
                    "correctOptionId": "a"
                }]
            }]
        }))
        .expect("catalog should load");

        let course = catalog.course("c1").expect("course exists");

        let exam = catalog.resolve_activity(&course, "e1").expect("exam resolves");
        assert_eq!(exam.kind, ActivityKind::Exam);
        assert_eq!(exam.questions.len(), 1);

        let err = catalog
            .resolve_activity(&course, "c1-l1")
            .expect_err("text lesson is not a quiz");
        assert!(matches!(err, ApiError::NotAQuiz));

        let err = catalog
            .resolve_activity(&course, "ghost")
            .expect_err("unknown activity");
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn enrollment_and_team_lookups() {
        let catalog = snapshot_from(json!({
            "courses": [minimal_course("c1", None)],
            "enrollments": [{ "userId": "u1", "courseId": "c1" }],
            "teams": [{ "managerId": "m1", "employeeIds": ["u1", "u2"] }]
        }))
        .expect("catalog should load");

        assert!(catalog.is_enrolled("u1", "c1"));
        assert!(!catalog.is_enrolled("u2", "c1"));
        assert_eq!(catalog.enrolled_courses("u1").len(), 1);
        assert_eq!(catalog.team("m1").map(<[String]>::len), Some(2));
        assert!(catalog.team("m2").is_none());
    }
}
