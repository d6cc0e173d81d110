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

//! Data Access Layer
//!
//! One sub-module per relation. Each exposes:
//!
//! - an entity DAL (`UserDAL`, `ItemDAL`, ...) with async methods that run a
//!   single statement on a pooled connection, for reads and one-shot writes;
//! - crate-private synchronous query functions taking `&mut SqliteConnection`,
//!   which the exchange operations compose inside one
//!   [`DAL::transaction`] so that multi-row mutations commit atomically.
//!
//! # Example
//!
//! ```rust,ignore
//! use likeswap::dal::DAL;
//! use likeswap::Database;
//!
//! let dal = DAL::new(Database::try_new("likeswap.db")?);
//! let queued = dal.items().list().await?;
//! ```

use diesel::SqliteConnection;

use crate::database::connection::configure_connection;
use crate::database::Database;
use crate::error::StoreError;

pub mod clicks;
pub mod completions;
pub mod items;
pub mod models;
pub mod notify_log;
pub mod requeue;
pub mod task_batches;
pub mod users;

pub use clicks::ClickDAL;
pub use completions::CompletionDAL;
pub use items::ItemDAL;
pub use notify_log::NotifyLogDAL;
pub use requeue::RequeueDAL;
pub use task_batches::TaskBatchDAL;
pub use users::UserDAL;

/// Entry point to all database operations.
///
/// `DAL` is `Clone`; every clone shares the same connection pool.
#[derive(Clone, Debug)]
pub struct DAL {
    pub database: Database,
}

impl DAL {
    pub fn new(database: Database) -> Self {
        DAL { database }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Runs `f` on a pooled connection without opening a transaction.
    pub async fn interact<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.database.get_connection().await?;
        conn.interact(move |conn| {
            configure_connection(conn)?;
            f(conn)
        })
        .await
        .map_err(|e| StoreError::ConnectionPool(e.to_string()))?
    }

    /// Runs `f` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The write lock is taken when the transaction starts, not at the first
    /// write, so two callers can never both read the same state and then
    /// both write a successor of it. Any error rolls everything back.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.database.get_connection().await?;
        conn.interact(move |conn| {
            configure_connection(conn)?;
            conn.immediate_transaction(f)
        })
        .await
        .map_err(|e| StoreError::ConnectionPool(e.to_string()))?
    }

    /// Returns a user DAL.
    pub fn users(&self) -> UserDAL {
        UserDAL::new(self)
    }

    /// Returns a queued item DAL.
    pub fn items(&self) -> ItemDAL {
        ItemDAL::new(self)
    }

    /// Returns a task batch DAL.
    pub fn task_batches(&self) -> TaskBatchDAL {
        TaskBatchDAL::new(self)
    }

    /// Returns a requeue placeholder DAL.
    pub fn requeue(&self) -> RequeueDAL {
        RequeueDAL::new(self)
    }

    /// Returns a completion record DAL.
    pub fn completions(&self) -> CompletionDAL {
        CompletionDAL::new(self)
    }

    /// Returns a click record DAL.
    pub fn clicks(&self) -> ClickDAL {
        ClickDAL::new(self)
    }

    /// Returns a notify log DAL.
    pub fn notify_log(&self) -> NotifyLogDAL {
        NotifyLogDAL::new(self)
    }
}
