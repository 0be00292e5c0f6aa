//! Category: a labeled grouping of questions.

use crate::id::CategoryId;

/// Stored category record.
///
/// `kind` maps to the `type` column / JSON field (a reserved word in Rust).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub kind: String,
}

impl Category {
    pub fn new(id: CategoryId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }
}
