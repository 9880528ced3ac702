//! Expiring cache entries in SQLite.
//!
//! Expired rows are invisible to readers and removed lazily by
//! [`CacheDb::purge_expired_transients`].

use super::TransientStore;
use super::clock::expires_after;
use super::connection::CacheDb;
use crate::Error;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Fixed-width UTC timestamps so that SQL string comparison orders correctly.
fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl CacheDb {
    /// Delete expired transients.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired_transients(&self) -> Result<u64, Error> {
        let now = timestamp(self.clock.now());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM transients WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl TransientStore for CacheDb {
    async fn get_transient(&self, key: &str) -> Result<Option<Value>, Error> {
        let key = key.to_string();
        let now = timestamp(self.clock.now());
        let raw = self
            .conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row(
                    "SELECT value_json FROM transients WHERE name = ?1 AND expires_at > ?2",
                    params![key, now],
                    |row| row.get(0),
                );

                match result {
                    Ok(json) => Ok(Some(json)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        raw.map(|json| serde_json::from_str(&json).map_err(Error::from)).transpose()
    }

    async fn set_transient(&self, key: &str, value: &Value, ttl_seconds: i64) -> Result<(), Error> {
        let key = key.to_string();
        let value_json = serde_json::to_string(value)?;
        let expires_at = timestamp(expires_after(self.clock.now(), ttl_seconds)?);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO transients (name, value_json, expires_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(name) DO UPDATE SET
                        value_json = excluded.value_json,
                        expires_at = excluded.expires_at",
                    params![key, value_json, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_transient(&self, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM transients WHERE name = ?1", params![key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }
}
