//! Process-wide logging setup shared by the trivia binaries and test harnesses.

/// Tracing subscriber configuration (filters, formatting).
pub mod tracing;

pub use crate::tracing::{init, LogFormat};
