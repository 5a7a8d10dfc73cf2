//! [`SqliteSlot`]: the SQLite implementation of [`IdentitySlot`].

use std::path::Path;

use chrono::Utc;
use fras_core::slot::{IDENTITY_SLOT_KEY, IdentitySlot};
use rusqlite::OptionalExtension as _;

use crate::{Result, schema::SCHEMA};

/// A small key-value store in a single SQLite file, exposing one key as the
/// durable identity slot.
///
/// Clones share the inner connection and see the same rows.
#[derive(Clone)]
pub struct SqliteSlot {
  conn: tokio_rusqlite::Connection,
  key:  String,
}

impl SqliteSlot {
  /// Open (or create) the store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, key: IDENTITY_SLOT_KEY.to_owned() })
  }

  /// Use a different key for the identity slot. Clones keep sharing rows.
  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    self.key = key.into();
    self
  }

  pub fn key(&self) -> &str { &self.key }

  // ── Raw key-value access ────────────────────────────────────────────────

  pub async fn get(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();
    let value: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM kv WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(value)
  }

  /// Insert or overwrite `key`.
  pub async fn put(&self, key: &str, value: String) -> Result<()> {
    let key    = key.to_owned();
    let at_str = Utc::now().to_rfc3339();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET
             value      = excluded.value,
             updated_at = excluded.updated_at",
          rusqlite::params![key, value, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Delete `key`. Returns whether a row was removed.
  pub async fn remove(&self, key: &str) -> Result<bool> {
    let key = key.to_owned();
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?)
      })
      .await?;
    Ok(removed > 0)
  }
}

// ─── IdentitySlot impl ───────────────────────────────────────────────────────

impl IdentitySlot for SqliteSlot {
  type Error = crate::Error;

  async fn load(&self) -> Result<Option<String>> { self.get(&self.key).await }

  async fn store(&self, value: String) -> Result<()> {
    self.put(&self.key, value).await
  }

  async fn clear(&self) -> Result<()> {
    if self.remove(&self.key).await? {
      tracing::debug!(key = %self.key, "cleared identity slot");
    }
    Ok(())
  }
}
