//! SQLite storage for the day cache.
//!
//! Lets several processes share one cache file. Each row holds the JSON
//! sighting list for one ISO date and its expiry in unix milliseconds.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::cache::{CacheError, CacheStore};

pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn init(&self) -> Result<(), CacheError> {
        let conn = self.conn();
        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        let schema = include_str!("../../schema/sqlite.sql");
        conn.execute_batch(schema)?;

        if version < 1 {
            conn.pragma_update(None, "user_version", 1)?;
        }

        Ok(())
    }

    /// Number of cached days, expired or not.
    pub fn cached_day_count(&self) -> Result<i64, CacheError> {
        let count = self
            .conn()
            .query_row("SELECT COUNT(*) FROM day_cache", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Deletes expired rows, returning how many were removed.
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let removed = self.conn().execute(
            "DELETE FROM day_cache WHERE expires_at <= ?1",
            params![now_millis()],
        )?;
        Ok(removed)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheStore for Db {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let row: Option<(String, i64)> = self
            .conn()
            .query_row(
                "SELECT sightings_json, expires_at FROM day_cache WHERE day = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(match row {
            Some((json, expires_at)) if expires_at > now_millis() => Some(json),
            _ => None,
        })
    }

    fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now_millis().saturating_add(ttl_ms);
        self.conn().execute(
            "INSERT INTO day_cache (day, sightings_json, expires_at, fetched_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(day) DO UPDATE SET
                sightings_json = excluded.sightings_json,
                expires_at = excluded.expires_at,
                fetched_at = excluded.fetched_at",
            params![key, value, expires_at, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.conn().execute("DELETE FROM day_cache", [])?;
        Ok(())
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
