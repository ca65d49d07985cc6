//! SQLite-backed expiring cache for source-adapter payloads.
//!
//! RULE: Only cache.rs talks to the database.
//! The planner and adapters call `get_or_fetch` — they never execute SQL.
//!
//! Entries persist across process invocations, so the TTL is wall-clock
//! time, not process lifetime. Entries are refreshed in place on expiry and
//! only destroyed en masse by `purge`.

use crate::error::PlanResult;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};

pub struct CacheStore {
    conn: Connection,
}

impl CacheStore {
    /// Open (or create) the cache database at `path`.
    pub fn open(path: &str) -> PlanResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PlanResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Apply the cache schema.
    pub fn migrate(&self) -> PlanResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_cache.sql"))?;
        Ok(())
    }

    /// Return the payload cached under `signature` if it is younger than
    /// `ttl_seconds`; otherwise invoke `fetch`, store its result with the
    /// current timestamp, and return it.
    ///
    /// A failed fetch propagates and leaves any stale entry untouched, so
    /// the next call retries. An entry that no longer deserializes is
    /// treated as a miss, never as a fatal error.
    pub fn get_or_fetch<T, F>(&self, signature: &str, ttl_seconds: u64, fetch: F) -> PlanResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> PlanResult<T>,
    {
        self.get_or_fetch_at(signature, ttl_seconds, chrono::Utc::now().timestamp(), fetch)
    }

    /// `get_or_fetch` with an explicit wall-clock second, so tests can
    /// drive expiry without sleeping.
    pub fn get_or_fetch_at<T, F>(
        &self,
        signature: &str,
        ttl_seconds: u64,
        now: i64,
        fetch: F,
    ) -> PlanResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> PlanResult<T>,
    {
        if let Some((fetched_at, payload)) = self.lookup(signature)? {
            if now - fetched_at < ttl_seconds as i64 {
                match serde_json::from_str(&payload) {
                    Ok(value) => {
                        log::debug!("cache hit: {signature}");
                        return Ok(value);
                    }
                    Err(e) => {
                        log::warn!("cache entry '{signature}' unreadable ({e}), refetching");
                    }
                }
            }
        }

        log::debug!("cache miss: {signature}");
        let value = fetch()?;
        let payload = serde_json::to_string(&value)?;
        self.conn.execute(
            "INSERT INTO api_cache (signature, fetched_at, payload) VALUES (?1, ?2, ?3)
             ON CONFLICT(signature) DO UPDATE SET fetched_at = excluded.fetched_at,
                                                  payload    = excluded.payload",
            params![signature, now, payload],
        )?;
        Ok(value)
    }

    /// Discard every entry regardless of age.
    pub fn purge(&self) -> PlanResult<()> {
        self.conn.execute("DELETE FROM api_cache", [])?;
        Ok(())
    }

    /// Number of live rows. Used by tests and the purge report.
    pub fn entry_count(&self) -> PlanResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM api_cache", [], |row| row.get(0))
            .map_err(Into::into)
    }

    fn lookup(&self, signature: &str) -> PlanResult<Option<(i64, String)>> {
        let row = self
            .conn
            .query_row(
                "SELECT fetched_at, payload FROM api_cache WHERE signature = ?1",
                params![signature],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(row)
    }
}
