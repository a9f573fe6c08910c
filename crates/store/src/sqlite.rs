//! SQLite-backed balance store.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};

use crate::key::BalanceKey;
use crate::store::{BalanceStore, ExpectedRevision, StoreError, VersionedAmount};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS balances (
    bucket   TEXT NOT NULL,
    key      TEXT NOT NULL,
    amount   INTEGER NOT NULL,
    revision INTEGER NOT NULL,
    PRIMARY KEY (bucket, key)
)";

/// Durable [`BalanceStore`] on SQLite.
///
/// A handle is scoped to one bucket (one issuing institution) at open time;
/// rows of different buckets never collide even when they share a database
/// file. The revision check and the write of `put` run inside one SQL
/// transaction, which makes the put atomic per key.
pub struct SqliteBalanceStore {
    conn: Mutex<Connection>,
    bucket: String,
}

impl SqliteBalanceStore {
    pub fn open(path: impl AsRef<Path>, bucket: impl Into<String>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path).map_err(backend)?, bucket)
    }

    /// Private in-memory database; used by tests and throwaway simulations.
    pub fn open_in_memory(bucket: impl Into<String>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory().map_err(backend)?, bucket)
    }

    fn from_connection(conn: Connection, bucket: impl Into<String>) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
            bucket: bucket.into(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl BalanceStore for SqliteBalanceStore {
    fn get(&self, key: &BalanceKey) -> Result<Option<VersionedAmount>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        let row = conn
            .query_row(
                "SELECT amount, revision FROM balances WHERE bucket = ?1 AND key = ?2",
                params![self.bucket, key.render()],
                |row| {
                    Ok(VersionedAmount {
                        amount: row.get(0)?,
                        revision: row.get::<_, i64>(1)? as u64,
                    })
                },
            )
            .optional()
            .map_err(backend)?;

        Ok(row)
    }

    fn put(
        &self,
        key: &BalanceKey,
        amount: i64,
        expected: ExpectedRevision,
    ) -> Result<u64, StoreError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        let tx = conn.transaction().map_err(backend)?;

        let current: Option<u64> = tx
            .query_row(
                "SELECT revision FROM balances WHERE bucket = ?1 AND key = ?2",
                params![self.bucket, key.render()],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map_err(backend)?
            .map(|r| r as u64);

        if !expected.matches(current) {
            return Err(StoreError::RevisionMismatch {
                expected,
                found: current,
            });
        }

        let revision = current.unwrap_or(0) + 1;
        match current {
            None => {
                tx.execute(
                    "INSERT INTO balances (bucket, key, amount, revision) VALUES (?1, ?2, ?3, ?4)",
                    params![self.bucket, key.render(), amount, revision as i64],
                )
                .map_err(backend)?;
            }
            Some(found) => {
                tx.execute(
                    "UPDATE balances SET amount = ?3, revision = ?4
                     WHERE bucket = ?1 AND key = ?2 AND revision = ?5",
                    params![
                        self.bucket,
                        key.render(),
                        amount,
                        revision as i64,
                        found as i64
                    ],
                )
                .map_err(backend)?;
            }
        }

        tx.commit().map_err(backend)?;
        Ok(revision)
    }
}

fn backend(err: rusqlite::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
