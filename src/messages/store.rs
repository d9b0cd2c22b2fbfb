use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::Profile;

/// A persisted generated message: the input profile plus the full text.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedMessage {
    pub id: Uuid,
    pub name: String,
    pub job_title: String,
    pub company: String,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub generated_message: String,
    pub created_at: DateTime<Utc>,
}

/// Insert a record for a fully generated message.
///
/// The relay only emits its done event once this has returned Ok.
pub async fn save(
    db_pool: &SqlitePool,
    profile: &Profile,
    generated_message: &str,
) -> Result<GeneratedMessage, sqlx::Error> {
    let id = Uuid::now_v7();
    let created_at = Utc::now();

    sqlx::query(
        "INSERT INTO messages (id,name,job_title,company,location,summary,generated_message,created_at)
         VALUES (?,?,?,?,?,?,?,?)",
    )
    .bind(id.to_string())
    .bind(&profile.name)
    .bind(&profile.job_title)
    .bind(&profile.company)
    .bind(&profile.location)
    .bind(&profile.summary)
    .bind(generated_message)
    .bind(created_at.to_rfc3339())
    .execute(db_pool)
    .await?;

    Ok(GeneratedMessage {
        id,
        name: profile.name.clone(),
        job_title: profile.job_title.clone(),
        company: profile.company.clone(),
        location: profile.location.clone(),
        summary: profile.summary.clone(),
        generated_message: generated_message.to_owned(),
        created_at,
    })
}
