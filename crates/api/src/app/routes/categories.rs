use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};
use serde_json::Value;

use trivia_core::{CategoryId, QuestionFilter};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::extractors::PathId;
use crate::app::routes::questions::question_listing;
use crate::app::services::AppServices;

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Value>, ApiError> {
    let categories = services.bank().categories().await?;
    Ok(Json(serde_json::json!({
        "categories": dto::categories_to_json(categories),
    })))
}

pub async fn questions_for_category(
    Extension(services): Extension<Arc<AppServices>>,
    PathId(category_id): PathId<CategoryId>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    question_listing(
        &services,
        QuestionFilter::in_category(category_id),
        &params,
    )
    .await
}
