//! Question records and the listing filter.

use core::cmp::Ordering;

use crate::id::{CategoryId, QuestionId};

/// Stored question record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    pub category_id: CategoryId,
    pub difficulty: i32,
}

impl Question {
    /// Listing order: question text descending, ties broken by id descending.
    pub fn listing_cmp(a: &Question, b: &Question) -> Ordering {
        b.question.cmp(&a.question).then_with(|| b.id.cmp(&a.id))
    }
}

/// A question that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category_id: CategoryId,
    pub difficulty: i32,
}

impl NewQuestion {
    pub fn with_id(self, id: QuestionId) -> Question {
        Question {
            id,
            question: self.question,
            answer: self.answer,
            category_id: self.category_id,
            difficulty: self.difficulty,
        }
    }
}

/// Filter shared by the listing, category and search endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    /// Restrict to one category.
    pub category: Option<CategoryId>,
    /// Case-insensitive substring of the question text.
    pub search_term: Option<String>,
}

impl QuestionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_category(category: CategoryId) -> Self {
        Self {
            category: Some(category),
            search_term: None,
        }
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            category: None,
            search_term: Some(term.into()),
        }
    }

    pub fn matches(&self, question: &Question) -> bool {
        if let Some(category) = self.category {
            if question.category_id != category {
                return false;
            }
        }
        match &self.search_term {
            Some(term) => question
                .question
                .to_lowercase()
                .contains(&term.to_lowercase()),
            None => true,
        }
    }
}
