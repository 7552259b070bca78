use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow)]
pub struct SyncRecordRow {
    pub id: String,
    pub payload: String,
    pub timestamp: String,
}

pub async fn fetch_record(db: &SqlitePool, id: &str) -> Result<Option<SyncRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, SyncRecordRow>(
        r#"
        SELECT id, payload, timestamp
        FROM sync_records
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn record_exists(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM sync_records WHERE id = ?1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.is_some())
}

/// Inserts or fully replaces the record stored under `id`.
pub async fn upsert_record(
    db: &SqlitePool,
    id: &str,
    payload: &str,
    timestamp: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO sync_records (id, payload, timestamp)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(id) DO UPDATE SET
            payload = excluded.payload,
            timestamp = excluded.timestamp
        "#,
    )
    .bind(id)
    .bind(payload)
    .bind(timestamp)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn ping(db: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("select 1").execute(db).await?;
    Ok(())
}
