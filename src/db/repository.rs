use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use rusqlite::params;
use tokio_rusqlite::Connection;

use crate::error::Result;

use super::schema::{SCHEMA, SENT_TIME_FORMAT};

/// Persistent record of article fingerprints that have already been delivered.
pub struct SentStore {
    conn: Connection,
}

impl SentStore {
    /// Opens (creating if needed) the store and drops records older than `retention`.
    ///
    /// Pruning happens here so that no lookup in the same run can see expired records.
    pub async fn open(
        path: impl AsRef<Path>,
        now: DateTime<Utc>,
        retention: TimeDelta,
    ) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).await?;
        let store = Self::init(conn).await?;

        let removed = store.prune(now, retention).await?;
        tracing::info!(
            "Opened sent-article store at {:?} ({} expired records removed)",
            path,
            removed
        );

        Ok(store)
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Deletes every record sent before `now - retention`.
    pub async fn prune(&self, now: DateTime<Utc>, retention: TimeDelta) -> Result<usize> {
        let cutoff = (now - retention).format(SENT_TIME_FORMAT).to_string();
        let removed = self
            .conn
            .call(move |conn| {
                let removed = conn.execute(
                    "DELETE FROM sent_articles WHERE sent_time < ?1",
                    params![cutoff],
                )?;
                Ok(removed)
            })
            .await?;
        Ok(removed)
    }

    pub async fn contains(&self, fingerprint: &str) -> Result<bool> {
        let fingerprint = fingerprint.to_string();
        let exists = self
            .conn
            .call(move |conn| {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM sent_articles WHERE article_hash = ?1)",
                    params![fingerprint],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await?;
        Ok(exists)
    }

    /// Records a delivered article. Returns `false` if the fingerprint was already present.
    pub async fn insert(&self, fingerprint: &str, title: &str, link: &str) -> Result<bool> {
        self.insert_at(fingerprint, title, link, Utc::now()).await
    }

    pub async fn insert_at(
        &self,
        fingerprint: &str,
        title: &str,
        link: &str,
        sent_time: DateTime<Utc>,
    ) -> Result<bool> {
        let fingerprint = fingerprint.to_string();
        let title = title.to_string();
        let link = link.to_string();
        let sent_time = sent_time.format(SENT_TIME_FORMAT).to_string();

        let inserted = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    r#"INSERT OR IGNORE INTO sent_articles (article_hash, title, link, sent_time)
                       VALUES (?1, ?2, ?3, ?4)"#,
                    params![fingerprint, title, link, sent_time],
                )?;
                Ok(changed > 0)
            })
            .await?;
        Ok(inserted)
    }

    pub async fn len(&self) -> Result<usize> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM sent_articles", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count as usize)
    }
}

#[cfg(test)]
impl SentStore {
    pub async fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }
}
