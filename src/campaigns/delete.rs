use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{message_response, AppResult};

/// Soft delete: flip status to DELETED, keep the row.
///
/// Irreversible through the API; a campaign that is already DELETED
/// looks absent here and gets a 404.
#[debug_handler]
pub async fn delete_campaign(
    Path(uuid): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let result = sqlx::query("UPDATE campaigns SET status='DELETED' WHERE uuid=? AND status!='DELETED'")
        .bind(uuid.to_string())
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(message_response(StatusCode::NOT_FOUND, "Campaign not found"));
    }

    Ok(message_response(
        StatusCode::OK,
        "Campaign soft deleted successfully",
    ))
}
