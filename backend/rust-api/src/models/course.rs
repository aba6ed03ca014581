use serde::{Deserialize, Serialize};

/// Course difficulty tier. The frontend renders these as the numeric codes
/// 1 (beginner), 2 (intermediate), 3 (advanced).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn code(&self) -> u8 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Advanced => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// A block inside a text lesson. Serialized as `{"kind": "text", "value": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum LessonBlock {
    Text(String),
    Image(String),
}

/// Answer option inside a question. Ids are short codes ("a".."d"), unique
/// within the question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<AnswerOption>,
    pub correct_option_id: String,
}

impl Question {
    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }
}

/// Variant payload of a content item. The tag keeps illegal states
/// unrepresentable: a text lesson cannot carry questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBody {
    #[serde(rename = "textLesson")]
    Text { blocks: Vec<LessonBlock> },
    #[serde(rename = "videoLesson", rename_all = "camelCase")]
    Video { video_url: String },
    #[serde(rename = "quiz")]
    Quiz { questions: Vec<Question> },
    #[serde(rename = "pdfProject", rename_all = "camelCase")]
    PdfProject {
        description: String,
        #[serde(default)]
        submission_file: Option<String>,
    },
}

impl ContentBody {
    /// Numeric wire code the frontend keys its icons and routes on.
    pub fn type_code(&self) -> u8 {
        match self {
            ContentBody::Text { .. } => 1,
            ContentBody::Video { .. } => 2,
            ContentBody::Quiz { .. } => 3,
            ContentBody::PdfProject { .. } => 4,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            ContentBody::Text { .. } => "textLesson",
            ContentBody::Video { .. } => "videoLesson",
            ContentBody::Quiz { .. } => "quiz",
            ContentBody::PdfProject { .. } => "pdfProject",
        }
    }

    pub fn is_quiz(&self) -> bool {
        matches!(self, ContentBody::Quiz { .. })
    }
}

/// An atomic unit of course material inside a module. Order within the
/// module's `content` array is the traversal order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub body: ContentBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

/// Catalog-owned course entity. Admin-authored, immutable to learners;
/// per-user completion state lives in the completion store, never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub duration_seconds: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub participants: u32,
    pub modules: Vec<CourseModule>,
    #[serde(default)]
    pub has_exam: bool,
    #[serde(default)]
    pub exam_id: Option<String>,
}

impl Course {
    pub fn find_item(&self, item_id: &str) -> Option<&ContentItem> {
        self.modules
            .iter()
            .flat_map(|m| m.content.iter())
            .find(|c| c.id == item_id)
    }

    /// Items whose completion counts toward the course percentage. The exam
    /// is tracked separately and never contributes here.
    pub fn trackable_ids(&self) -> Vec<&str> {
        self.modules
            .iter()
            .flat_map(|m| m.content.iter())
            .map(|c| c.id.as_str())
            .collect()
    }
}

/// Course-level final exam. Structurally a quiz, but attached to the course
/// rather than a module; it is the terminal item in traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub title: String,
    pub questions: Vec<Question>,
}
