mod delete;
mod list;
mod new;
mod update;

pub use delete::delete_campaign;
pub use list::{get_campaign, list_campaigns};
pub use new::{create_campaign, CreateCampaignQuery};
pub use update::{update_campaign, update_campaign_status, UpdateCampaignQuery, UpdateStatusQuery};

use std::str::FromStr;

use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_campaigns).post(new::create_campaign))
        .route(
            "/{uuid}",
            get(list::get_campaign)
                .put(update::update_campaign)
                .patch(update::update_campaign_status)
                .delete(delete::delete_campaign),
        )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Active,
    Inactive,
    Deleted,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "ACTIVE",
            CampaignStatus::Inactive => "INACTIVE",
            CampaignStatus::Deleted => "DELETED",
        }
    }
}

impl FromStr for CampaignStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(CampaignStatus::Active),
            "INACTIVE" => Ok(CampaignStatus::Inactive),
            "DELETED" => Ok(CampaignStatus::Deleted),
            _ => Err(anyhow::anyhow!("unknown campaign status {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: CampaignStatus,
    pub leads: Vec<String>,
    #[serde(rename = "accountIDs")]
    pub account_ids: Vec<String>,
}

// (uuid, name, description, status, leads, account_ids)
pub(crate) type CampaignRow = (String, String, String, String, String, String);

pub(crate) fn campaign_from_row(row: CampaignRow) -> AppResult<Campaign> {
    let (uuid, name, description, status, leads, account_ids) = row;
    Ok(Campaign {
        id: Uuid::parse_str(&uuid)?,
        name,
        description,
        status: status.parse()?,
        leads: serde_json::from_str(&leads)?,
        account_ids: serde_json::from_str(&account_ids)?,
    })
}

pub(crate) async fn fetch_campaign(
    db_pool: &SqlitePool,
    uuid: Uuid,
) -> AppResult<Option<Campaign>> {
    let row: Option<CampaignRow> = sqlx::query_as(
        "SELECT uuid,name,description,status,leads,account_ids FROM campaigns WHERE uuid=? AND status!='DELETED'",
    )
    .bind(uuid.to_string())
    .fetch_optional(db_pool)
    .await?;

    row.map(campaign_from_row).transpose()
}

/// Account IDs are externally issued; well-formed means 24 hex chars.
pub fn valid_account_ids(ids: &[String]) -> bool {
    ids.iter()
        .all(|id| id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_json() {
        assert_eq!(
            serde_json::to_string(&CampaignStatus::Active).unwrap(),
            "\"ACTIVE\""
        );
        assert_eq!(
            serde_json::from_str::<CampaignStatus>("\"DELETED\"").unwrap(),
            CampaignStatus::Deleted
        );
    }

    #[test]
    fn account_id_must_be_24_hex_chars() {
        assert!(valid_account_ids(&["507f1f77bcf86cd799439011".to_owned()]));
        assert!(valid_account_ids(&[]));
        assert!(!valid_account_ids(&["not-an-id".to_owned()]));
        assert!(!valid_account_ids(&[
            "507f1f77bcf86cd799439011".to_owned(),
            "507f1f77bcf86cd79943901".to_owned(),
        ]));
    }
}
