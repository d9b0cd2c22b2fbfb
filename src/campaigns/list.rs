use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{message_response, AppResult};

use super::{campaign_from_row, fetch_campaign, CampaignRow};

/// All campaigns that aren't soft-deleted.
#[debug_handler]
pub async fn list_campaigns(State(db_pool): State<SqlitePool>) -> AppResult<Response> {
    let rows: Vec<CampaignRow> = sqlx::query_as(
        "SELECT uuid,name,description,status,leads,account_ids FROM campaigns WHERE status!='DELETED'",
    )
    .fetch_all(&db_pool)
    .await?;

    let campaigns = rows
        .into_iter()
        .map(campaign_from_row)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(campaigns).into_response())
}

#[debug_handler]
pub async fn get_campaign(
    Path(uuid): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let Some(campaign) = fetch_campaign(&db_pool, uuid).await? else {
        return Ok(message_response(StatusCode::NOT_FOUND, "Campaign not found"));
    };

    Ok(Json(campaign).into_response())
}
