//! SQLite cache of previous lookups.
//!
//! One row per `(word, source)` holding the serialized envelope. The blob is
//! opaque here; decoding happens in [`Record::envelope`]. A fresh lookup
//! replaces the row with the new record.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::config::CacheConfig;
use crate::db;
use crate::migrate;
use crate::models::{Provider, Record};

pub struct RecordCache {
    pool: SqlitePool,
}

impl RecordCache {
    /// Open (and create if needed) the cache database.
    pub async fn open(config: &CacheConfig) -> Result<Self> {
        let pool = db::connect(config).await?;
        migrate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn load(&self, word: &str, provider: Provider) -> Result<Option<Record>> {
        let row = sqlx::query("SELECT word, content FROM records WHERE word = ? AND source = ?")
            .bind(word)
            .bind(provider.id())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Record {
            word: row.get("word"),
            content: row.get("content"),
            source: provider,
        }))
    }

    pub async fn store(&self, record: &Record) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO records (word, source, content, fetched_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(word, source) DO UPDATE SET
                content = excluded.content,
                fetched_at = excluded.fetched_at
            "#,
        )
        .bind(&record.word)
        .bind(record.source.id())
        .bind(&record.content)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Number of cached records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
