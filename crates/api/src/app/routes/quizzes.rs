use std::sync::Arc;

use axum::{extract::Extension, Json};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::extractors::JsonObject;
use crate::app::services::AppServices;

/// Next quiz question, or `{}` once nothing is left to ask.
pub async fn next_question(
    Extension(services): Extension<Arc<AppServices>>,
    body: JsonObject,
) -> Result<Json<Value>, ApiError> {
    let Some(request) = dto::quiz_request_from_json(&body)? else {
        return Ok(Json(serde_json::json!({})));
    };

    let mut rng = StdRng::from_entropy();
    let picked = services.next_quiz_question(&request, &mut rng).await?;

    Ok(Json(match picked {
        Some(question) => serde_json::json!({ "question": dto::question_to_json(question) }),
        None => serde_json::json!({}),
    }))
}
