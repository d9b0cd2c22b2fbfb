use std::sync::Arc;

use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{llm::Generate, AppResult};

use super::{store, Profile, REQUIRED_FIELDS_ERROR};

/// Non-streaming variant: generate the whole message, persist it, and
/// answer once with 201.
#[debug_handler(state = crate::AppState)]
pub async fn create_message(
    State(db_pool): State<SqlitePool>,
    State(generator): State<Arc<dyn Generate>>,
    Json(profile): Json<Profile>,
) -> AppResult<Response> {
    if !profile.is_complete() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": REQUIRED_FIELDS_ERROR })),
        )
            .into_response());
    }

    let message = generator.generate(&profile).await;
    store::save(&db_pool, &profile, &message).await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": message }))).into_response())
}
