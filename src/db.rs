use sqlx::SqlitePool;

/// Create the tables if they don't exist yet.
///
/// List-valued columns (leads, account_ids) hold JSON arrays as text.
pub async fn init(db_pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS campaigns (
            uuid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'ACTIVE',
            leads TEXT NOT NULL DEFAULT '[]',
            account_ids TEXT NOT NULL DEFAULT '[]'
        )",
    )
    .execute(db_pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS messages (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            job_title TEXT NOT NULL,
            company TEXT NOT NULL,
            location TEXT,
            summary TEXT,
            generated_message TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(db_pool)
    .await?;

    Ok(())
}
