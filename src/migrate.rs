use anyhow::Result;
use sqlx::SqlitePool;

/// Create the record cache schema. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS records (
            word TEXT NOT NULL,
            source TEXT NOT NULL,
            content TEXT NOT NULL,
            fetched_at INTEGER NOT NULL,
            PRIMARY KEY (word, source)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_records_fetched_at ON records(fetched_at DESC)")
        .execute(pool)
        .await?;

    Ok(())
}
