/*
 *  Copyright 2025-2026 Likeswap Contributors
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! SQLite connection management.
//!
//! This module wraps a `deadpool-diesel` pool. Diesel connections are
//! blocking, so every query runs inside `Object::interact`, which moves the
//! closure onto a blocking thread and keeps the async runtime free.
//!
//! # Example
//!
//! ```rust,ignore
//! use likeswap::database::Database;
//!
//! let db = Database::try_new("sqlite://./likeswap.db")?;
//! db.run_migrations().await?;
//! ```

use deadpool_diesel::sqlite::{Manager, Object, Pool, Runtime};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::error::StoreError;

/// SQLite has limited concurrent write support even with WAL mode. A single
/// pooled connection serializes every caller, which is also what makes the
/// per-user read-modify-write sequences in the engine linearizable.
const SQLITE_POOL_SIZE: usize = 1;

/// How long SQLite waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 30_000;

/// Per-connection settings. `busy_timeout` is not stored in the database
/// file, so every connection the pool hands out needs it, including ones
/// the pool recreates after a failure.
pub(crate) fn configure_connection(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    diesel::sql_query(format!("PRAGMA busy_timeout={};", BUSY_TIMEOUT_MS)).execute(conn)?;
    Ok(())
}

/// Shared handle to the connection pool.
///
/// `Database` is `Clone`; every clone references the same pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
    url: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("url", &self.url).finish()
    }
}

impl Database {
    /// Creates a pool for the given SQLite location.
    ///
    /// Accepts a file path, a `sqlite://` URL, a `file:` URI or `:memory:`.
    /// No connection is opened until the first query.
    pub fn try_new(connection_string: &str) -> Result<Self, StoreError> {
        let url = Self::build_sqlite_url(connection_string);
        let manager = Manager::new(url.clone(), Runtime::Tokio1);
        let pool = Pool::builder(manager)
            .max_size(SQLITE_POOL_SIZE)
            .build()
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        info!("SQLite connection pool initialized (size: {})", SQLITE_POOL_SIZE);

        Ok(Self { pool, url })
    }

    /// The normalised location this pool connects to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Checks a connection out of the pool.
    pub async fn get_connection(&self) -> Result<Object, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))
    }

    /// Strips an optional `sqlite://` prefix.
    fn build_sqlite_url(connection_string: &str) -> String {
        if let Some(path) = connection_string.strip_prefix("sqlite://") {
            path.to_string()
        } else {
            connection_string.to_string()
        }
    }

    /// Applies connection pragmas and runs pending migrations.
    ///
    /// Call once at startup. Re-running is harmless: applied migrations are
    /// recorded in `__diesel_schema_migrations` and skipped.
    pub async fn run_migrations(&self) -> Result<usize, StoreError> {
        use diesel_migrations::MigrationHarness;

        let conn = self.get_connection().await?;
        let applied = conn
            .interact(|conn| -> Result<usize, StoreError> {
                // WAL keeps readers unblocked while a write transaction is open.
                diesel::sql_query("PRAGMA journal_mode=WAL;").execute(conn)?;
                configure_connection(conn)?;

                let versions = conn
                    .run_pending_migrations(crate::database::SQLITE_MIGRATIONS)
                    .map_err(|e| StoreError::Migration(e.to_string()))?;
                Ok(versions.len())
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        if applied > 0 {
            info!("Applied {} pending migration(s)", applied);
        }
        Ok(applied)
    }
}
