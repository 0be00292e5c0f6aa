//! Question bank storage abstraction.
//!
//! Handlers only ever see `dyn QuestionBank`; the process picks the backing
//! implementation at startup (Postgres in production, in-memory for dev/tests).

use async_trait::async_trait;
use thiserror::Error;

use trivia_core::{
    Category, NewQuestion, Page, PageRequest, Question, QuestionFilter, QuestionId, QuizRequest,
};

use crate::seed::SeedData;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryQuestionBank;
pub use postgres::PostgresQuestionBank;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A referenced record does not exist (e.g. unknown `category_id`).
    #[error("foreign key violation: {0}")]
    ForeignKey(String),

    /// Any other integrity constraint (unique, check, not-null).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The database rejected or failed the statement.
    #[error("database error: {0}")]
    Database(String),

    /// The store cannot serve requests at all (pool closed, lock poisoned).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence operations over categories and questions.
///
/// Every lookup by id returns `Option`, so callers must handle the missing case.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// All categories, ordered by id.
    async fn categories(&self) -> StoreResult<Vec<Category>>;

    async fn insert_category(&self, kind: &str) -> StoreResult<Category>;

    /// Filtered questions in listing order, cut to the requested page.
    async fn list_questions(
        &self,
        filter: &QuestionFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Question>>;

    async fn get_question(&self, id: QuestionId) -> StoreResult<Option<Question>>;

    async fn insert_question(&self, question: NewQuestion) -> StoreResult<Question>;

    /// Full-record update. `None` when no question has that id.
    async fn update_question(&self, question: &Question) -> StoreResult<Option<Question>>;

    /// Delete and return the removed record. `None` when no question has that id.
    async fn delete_question(&self, id: QuestionId) -> StoreResult<Option<Question>>;

    /// Ids eligible for a quiz round, ordered by id.
    async fn quiz_candidates(&self, request: &QuizRequest) -> StoreResult<Vec<QuestionId>>;

    /// Load fixture records with their fixed ids.
    ///
    /// Only runs against an empty store; returns whether anything was loaded.
    async fn seed(&self, data: &SeedData) -> StoreResult<bool>;
}
