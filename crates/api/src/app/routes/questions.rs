use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use trivia_core::{PageRequest, QuestionFilter, QuestionId};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::extractors::{JsonObject, PathId};
use crate::app::services::AppServices;

pub async fn list_questions(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    question_listing(&services, QuestionFilter::all(), &params).await
}

pub async fn search_questions(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<HashMap<String, String>>,
    body: JsonObject,
) -> Result<Json<Value>, ApiError> {
    let term = dto::search_term_from_json(&body)?;
    question_listing(&services, QuestionFilter::search(term), &params).await
}

pub async fn create_question(
    Extension(services): Extension<Arc<AppServices>>,
    body: JsonObject,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_question = dto::new_question_from_json(&body)?;

    let created = services
        .bank()
        .insert_question(new_question)
        .await
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;

    tracing::info!(question_id = %created.id, category_id = %created.category_id, "question created");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": created.id })),
    ))
}

pub async fn delete_question(
    Extension(services): Extension<Arc<AppServices>>,
    PathId(question_id): PathId<QuestionId>,
) -> Result<Json<Value>, ApiError> {
    match services.bank().delete_question(question_id).await? {
        Some(deleted) => {
            tracing::info!(%question_id, "question deleted");
            Ok(Json(dto::question_to_json(deleted)))
        }
        None => Err(ApiError::not_found()),
    }
}

/// Shared by the listing, search and per-category endpoints.
pub(crate) async fn question_listing(
    services: &AppServices,
    filter: QuestionFilter,
    params: &HashMap<String, String>,
) -> Result<Json<Value>, ApiError> {
    let page = PageRequest::from_query(params.get("page").map(String::as_str))?;

    let questions = services.bank().list_questions(&filter, page).await?;
    let categories = services.bank().categories().await?;

    Ok(Json(dto::question_listing_to_json(
        questions,
        filter.category,
        categories,
    )))
}
