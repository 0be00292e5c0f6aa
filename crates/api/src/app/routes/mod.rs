use axum::{
    routing::{delete, get, post},
    Router,
};

pub mod categories;
pub mod questions;
pub mod quizzes;
pub mod system;

/// Every endpoint of the question bank.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/categories", get(categories::list_categories))
        .route(
            "/categories/:category_id/questions",
            get(categories::questions_for_category),
        )
        .route(
            "/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route("/questions/search", post(questions::search_questions))
        .route("/questions/:question_id", delete(questions::delete_question))
        .route("/quizzes", post(quizzes::next_question))
}
