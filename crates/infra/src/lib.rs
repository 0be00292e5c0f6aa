//! Infrastructure layer: question bank storage (Postgres + in-memory) and seed data.

pub mod seed;
pub mod store;

pub use seed::{demo_dataset, SeedData};
pub use store::{
    InMemoryQuestionBank, PostgresQuestionBank, QuestionBank, StoreError, StoreResult,
};
