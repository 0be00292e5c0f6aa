use serde_json::{Map, Value};

use trivia_core::{Category, CategoryId, NewQuestion, Page, Question, QuestionId, QuizRequest};

use crate::app::errors::ApiError;
use crate::app::extractors::JsonObject;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /questions`.
///
/// Presence is checked for all four fields before any conversion, so a body
/// missing `difficulty` and carrying a bad `category_id` reports the former.
pub fn new_question_from_json(body: &JsonObject) -> Result<NewQuestion, ApiError> {
    let question = body.required("question")?;
    let answer = body.required("answer")?;
    let category_id = body.required("category_id")?;
    let difficulty = body.required("difficulty")?;

    Ok(NewQuestion {
        question: string_field("question", question)?,
        answer: string_field("answer", answer)?,
        category_id: CategoryId::new(i32_field("category_id", category_id)?),
        difficulty: i32_field("difficulty", difficulty)?,
    })
}

/// Body of `POST /questions/search`.
pub fn search_term_from_json(body: &JsonObject) -> Result<String, ApiError> {
    match body.required("searchTerm")? {
        Value::String(term) => Ok(term.clone()),
        _ => Err(ApiError::bad_request("searchTerm is not a string")),
    }
}

/// Body of `POST /quizzes`.
///
/// `Ok(None)` means the request is well formed but no question can match
/// (a category id outside the id range).
pub fn quiz_request_from_json(body: &JsonObject) -> Result<Option<QuizRequest>, ApiError> {
    let previous = match body.required("previous_questions") {
        Ok(Value::Array(items)) => items,
        Ok(_) => return Err(ApiError::bad_request("previous_questions is not a list or array")),
        Err(_) => return Err(ApiError::bad_request("previous_questions is missing")),
    };

    let mut previous_questions = Vec::with_capacity(previous.len());
    for item in previous {
        let raw = item.as_i64().ok_or_else(|| {
            ApiError::bad_request("previous_questions must contain only integer ids")
        })?;
        // Ids outside the id range were never issued, so there is nothing to exclude.
        if let Ok(id) = QuestionId::try_from_i64(raw) {
            previous_questions.push(id);
        }
    }

    let category = match body.optional("quiz_category_id") {
        None => None,
        Some(value) => {
            let raw = value
                .as_i64()
                .ok_or_else(|| ApiError::bad_request("quiz_category_id is not an integer"))?;
            match CategoryId::try_from_i64(raw) {
                Ok(id) => Some(id),
                Err(_) => return Ok(None),
            }
        }
    };

    Ok(Some(QuizRequest::new(previous_questions, category)))
}

fn string_field(field: &str, value: &Value) -> Result<String, ApiError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ApiError::unprocessable(format!("{field} must be a string")))
}

fn i32_field(field: &str, value: &Value) -> Result<i32, ApiError> {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| ApiError::unprocessable(format!("{field} must be a 32-bit integer")))
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn question_to_json(q: Question) -> Value {
    serde_json::json!({
        "id": q.id,
        "question": q.question,
        "answer": q.answer,
        "category": q.category_id,
        "difficulty": q.difficulty,
    })
}

/// `{"1": "Science", ...}`; JSON object keys are always strings.
pub fn categories_to_json(categories: Vec<Category>) -> Value {
    let map: Map<String, Value> = categories
        .into_iter()
        .map(|c| (c.id.to_string(), Value::String(c.kind)))
        .collect();
    Value::Object(map)
}

pub fn question_listing_to_json(
    page: Page<Question>,
    current_category: Option<CategoryId>,
    categories: Vec<Category>,
) -> Value {
    serde_json::json!({
        "questions": page.items.into_iter().map(question_to_json).collect::<Vec<_>>(),
        "total_questions": page.total,
        "current_category": current_category,
        "categories": categories_to_json(categories),
    })
}
