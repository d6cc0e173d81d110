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

//! `migrate` and `serve`.

use std::sync::Arc;

use anyhow::{Context, Result};
use likeswap::{BackgroundServices, TracingNotifier};
use tracing::info;

use super::Session;

/// Migrations already ran when the session opened; report what was applied.
pub async fn migrate(session: &Session) -> Result<()> {
    if session.applied_migrations == 0 {
        info!("Database schema is up to date");
    } else {
        info!("Applied {} migration(s)", session.applied_migrations);
    }
    Ok(())
}

/// Hosts the background loops until Ctrl-C.
///
/// Notices go to the log; a chat transport replaces [`TracingNotifier`] when
/// the engine is embedded in a bot.
pub async fn run(session: Session) -> Result<()> {
    let exchange = session
        .exchange
        .with_notifier(Arc::new(TracingNotifier));
    let config = exchange.config();
    info!(
        item_ttl_secs = config.item_ttl().as_secs(),
        notify_cooldown_secs = config.notify_cooldown().as_secs(),
        admin_id = ?config.admin_id(),
        "Starting likeswap service"
    );

    let services = BackgroundServices::start(exchange.clone());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    services.shutdown().await;
    Ok(())
}
