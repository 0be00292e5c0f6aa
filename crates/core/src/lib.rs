//! `trivia-core` — domain building blocks for the trivia question bank.
//!
//! This crate contains **pure domain** types and rules (no IO, no HTTP, no storage).

pub mod category;
pub mod error;
pub mod id;
pub mod page;
pub mod question;
pub mod quiz;

pub use category::Category;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, QuestionId};
pub use page::{Page, PageRequest, QUESTIONS_PER_PAGE};
pub use question::{NewQuestion, Question, QuestionFilter};
pub use quiz::{pick_question, QuizRequest};
