use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{message_response, AppResult};

use super::{valid_account_ids, Campaign, CampaignStatus};

#[derive(Debug, Deserialize)]
pub struct CreateCampaignQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub leads: Vec<String>,
    #[serde(default, rename = "accountIDs")]
    pub account_ids: Vec<String>,
}

/// New campaigns always start out ACTIVE.
#[debug_handler]
pub async fn create_campaign(
    State(db_pool): State<SqlitePool>,

    Json(CreateCampaignQuery { name, description, leads, account_ids }): Json<CreateCampaignQuery>,
) -> AppResult<Response> {
    if name.is_empty() || description.is_empty() {
        return Ok(message_response(
            StatusCode::BAD_REQUEST,
            "Name and description are required",
        ));
    }

    if !valid_account_ids(&account_ids) {
        return Ok(message_response(
            StatusCode::BAD_REQUEST,
            "Invalid account IDs provided",
        ));
    }

    let uuid = Uuid::now_v7();
    sqlx::query("INSERT INTO campaigns (uuid,name,description,status,leads,account_ids) VALUES (?,?,?,?,?,?)")
        .bind(uuid.to_string())
        .bind(&name)
        .bind(&description)
        .bind(CampaignStatus::Active.as_str())
        .bind(serde_json::to_string(&leads)?)
        .bind(serde_json::to_string(&account_ids)?)
        .execute(&db_pool)
        .await?;

    let campaign = Campaign {
        id: uuid,
        name,
        description,
        status: CampaignStatus::Active,
        leads,
        account_ids,
    };

    Ok((StatusCode::CREATED, Json(campaign)).into_response())
}
