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

//! Subcommand implementations.

use anyhow::{Context, Result};
use likeswap::{Database, Exchange, ExchangeConfig};
use tracing::debug;

pub mod admin;
pub mod member;
pub mod serve;

/// An opened, migrated database and the engine on top of it.
pub struct Session {
    pub exchange: Exchange,
    pub applied_migrations: usize,
}

impl Session {
    /// Opens the database at `database_url` and applies pending migrations.
    pub async fn open(database_url: &str, config: ExchangeConfig) -> Result<Self> {
        let database = Database::try_new(database_url).context("Failed to open database")?;
        let applied_migrations = database
            .run_migrations()
            .await
            .context("Failed to run migrations")?;
        debug!(database = database_url, applied_migrations, "Database ready");

        Ok(Self {
            exchange: Exchange::new(database, config),
            applied_migrations,
        })
    }
}
