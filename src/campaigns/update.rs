use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{message_response, AppResult};

use super::{fetch_campaign, valid_account_ids};

const INVALID_STATUS: &str = "Status can only be ACTIVE or INACTIVE";
const NOT_FOUND: &str = "Campaign not found or already deleted";

#[derive(Debug, Deserialize)]
pub struct UpdateCampaignQuery {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub leads: Option<Vec<String>>,
    #[serde(rename = "accountIDs")]
    pub account_ids: Option<Vec<String>>,
}

/// Update whichever fields the body provides. Soft-deleted campaigns
/// can't be touched.
#[debug_handler]
pub async fn update_campaign(
    Path(uuid): Path<Uuid>,
    State(db_pool): State<SqlitePool>,

    Json(UpdateCampaignQuery { name, description, status, leads, account_ids }): Json<UpdateCampaignQuery>,
) -> AppResult<Response> {
    if let Some(status) = &status {
        if status != "ACTIVE" && status != "INACTIVE" {
            return Ok(message_response(StatusCode::BAD_REQUEST, INVALID_STATUS));
        }
    }

    if let Some(account_ids) = &account_ids {
        if !valid_account_ids(account_ids) {
            return Ok(message_response(
                StatusCode::BAD_REQUEST,
                "Invalid account IDs provided",
            ));
        }
    }

    let leads = leads.as_ref().map(serde_json::to_string).transpose()?;
    let account_ids = account_ids.as_ref().map(serde_json::to_string).transpose()?;

    let result = sqlx::query(
        "UPDATE campaigns SET
            name=COALESCE(?,name),
            description=COALESCE(?,description),
            status=COALESCE(?,status),
            leads=COALESCE(?,leads),
            account_ids=COALESCE(?,account_ids)
         WHERE uuid=? AND status!='DELETED'",
    )
    .bind(&name)
    .bind(&description)
    .bind(&status)
    .bind(&leads)
    .bind(&account_ids)
    .bind(uuid.to_string())
    .execute(&db_pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(message_response(StatusCode::NOT_FOUND, NOT_FOUND));
    }

    updated_campaign(&db_pool, uuid).await
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusQuery {
    #[serde(default)]
    pub status: String,
}

/// Partial update: status only.
#[debug_handler]
pub async fn update_campaign_status(
    Path(uuid): Path<Uuid>,
    State(db_pool): State<SqlitePool>,

    Json(UpdateStatusQuery { status }): Json<UpdateStatusQuery>,
) -> AppResult<Response> {
    if status != "ACTIVE" && status != "INACTIVE" {
        return Ok(message_response(StatusCode::BAD_REQUEST, INVALID_STATUS));
    }

    let result = sqlx::query("UPDATE campaigns SET status=? WHERE uuid=? AND status!='DELETED'")
        .bind(&status)
        .bind(uuid.to_string())
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(message_response(StatusCode::NOT_FOUND, NOT_FOUND));
    }

    updated_campaign(&db_pool, uuid).await
}

async fn updated_campaign(db_pool: &SqlitePool, uuid: Uuid) -> AppResult<Response> {
    let Some(campaign) = fetch_campaign(db_pool, uuid).await? else {
        // Raced with a delete between the update and the read-back.
        return Ok(message_response(StatusCode::NOT_FOUND, NOT_FOUND));
    };

    Ok(Json(campaign).into_response())
}
