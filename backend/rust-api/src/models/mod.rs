pub mod completion;
pub mod course;
pub mod progress;
pub mod views;

pub use completion::{CompletionRecord, MarkCompleteResponse, ScoreResult, SubmitQuizRequest};
pub use course::{Course, CourseModule, ContentBody, ContentItem, Exam, Question};
