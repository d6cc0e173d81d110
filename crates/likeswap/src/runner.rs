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

//! Background services: the eviction loop and the reminder loop.
//!
//! Both loops tick on a `tokio::time::interval` and stop when the shared
//! broadcast shutdown channel fires. A failed cycle is logged and the loop
//! carries on with the next tick.
//!
//! ```rust,ignore
//! let services = BackgroundServices::start(exchange.clone());
//! tokio::signal::ctrl_c().await?;
//! services.shutdown().await;
//! ```

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::exchange::Exchange;
use crate::notifier::Notice;

/// Handles of the running background loops.
pub struct BackgroundServices {
    shutdown_sender: broadcast::Sender<()>,
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundServices {
    /// Spawns the eviction and reminder loops on the current runtime.
    pub fn start(exchange: Exchange) -> Self {
        let (shutdown_sender, eviction_shutdown) = broadcast::channel(1);
        let reminder_shutdown = shutdown_sender.subscribe();

        let eviction_interval = exchange.config().eviction_interval();
        let reminder_interval = exchange.config().reminder_interval();

        let eviction = {
            let exchange = exchange.clone();
            tokio::spawn(run_loop(
                "eviction",
                eviction_interval,
                eviction_shutdown,
                move || {
                    let exchange = exchange.clone();
                    async move { eviction_cycle(&exchange).await }
                },
            ))
        };

        let reminder = tokio::spawn(run_loop(
            "reminder",
            reminder_interval,
            reminder_shutdown,
            move || {
                let exchange = exchange.clone();
                async move { reminder_cycle(&exchange).await }
            },
        ));

        info!(
            eviction_interval_secs = eviction_interval.as_secs(),
            reminder_interval_secs = reminder_interval.as_secs(),
            "Background services started"
        );

        Self {
            shutdown_sender,
            handles: vec![eviction, reminder],
        }
    }

    /// Signals both loops to stop and waits for them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_sender.send(());
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Background service task failed: {}", e);
            }
        }
        info!("Background services stopped");
    }
}

/// Runs `cycle` on every tick until shutdown.
async fn run_loop<F, Fut>(
    name: &'static str,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
    mut cycle: F,
) where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<usize, crate::ExchangeError>>,
{
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match cycle().await {
                    Ok(0) => debug!(service = name, "Cycle finished, nothing to do"),
                    Ok(count) => info!(service = name, count, "Cycle finished"),
                    Err(e) => error!(service = name, "Cycle failed: {}", e),
                }
            }
            _ = shutdown.recv() => {
                info!(service = name, "Shutdown requested");
                break;
            }
        }
    }
}

/// Evicts expired items and tells their owners.
async fn eviction_cycle(exchange: &Exchange) -> Result<usize, crate::ExchangeError> {
    let evicted = exchange
        .queue()
        .evict_expired(exchange.config().item_ttl())
        .await?;
    for item in &evicted {
        exchange.notify(Notice::ItemEvicted {
            owner_id: item.owner_id,
            link: item.link.clone(),
        });
    }
    Ok(evicted.len())
}

async fn reminder_cycle(exchange: &Exchange) -> Result<usize, crate::ExchangeError> {
    Ok(exchange.reminders().run_reminder_pass().await?.len())
}
