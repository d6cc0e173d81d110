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

//! # likeswap
//!
//! Task assignment and verification engine for a reciprocal link exchange.
//!
//! Users submit a link to a shared queue. Before their own link gets more
//! attention they work through a batch of other users' links: each step is
//! gated by a minimum delay and by proof that the user actually followed the
//! outbound link (a click record written by an external redirect collector).
//! Repeated failed verifications escalate into a permanent ban. Items that
//! collect enough credits are retired from the queue and requeued for their
//! owner on the owner's next batch request; items that collect nothing are
//! evicted after a time-to-live.
//!
//! All state lives in SQLite. No operation keeps in-memory session state
//! between calls, so the engine can be restarted at any point.
//!
//! ```rust,ignore
//! use likeswap::{Database, Exchange, ExchangeConfig};
//!
//! let database = Database::try_new("likeswap.db")?;
//! database.run_migrations().await?;
//!
//! let exchange = Exchange::new(database, ExchangeConfig::default());
//! exchange
//!     .queue()
//!     .submit(42, "https://www.tiktok.com/@a/video/1", false)
//!     .await?;
//! let batch = exchange.assignments().request_batch(7).await?;
//! let outcome = exchange.verification().confirm_step(7).await?;
//! ```

pub mod clock;
pub mod config;
pub mod dal;
pub mod database;
pub mod error;
pub mod exchange;
pub mod logging;
pub mod models;
pub mod notifier;
pub mod runner;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ExchangeConfig, ExchangeConfigBuilder};
pub use database::Database;
pub use error::{ConfigError, ExchangeError, StoreError, ValidationError};
pub use exchange::{
    BatchView, Exchange, ExchangeStats, InviteCount, LeaderboardEntry, StepOutcome,
    SubmitOutcome,
};
pub use logging::init_logging;
pub use models::{Item, TaskBatch, User, UserId};
pub use notifier::{Notice, Notifier, NotifyError, TracingNotifier};
pub use runner::BackgroundServices;

/// Number of items assigned per batch.
pub const BATCH_SIZE: usize = 3;

/// Verified completions an item needs before it is retired from the queue.
pub const CREDIT_THRESHOLD: i64 = 3;

/// Failed verifications after which a user is banned.
pub const MAX_WARNINGS: i32 = 3;

/// Minimum seconds between a batch step being shown and being confirmed.
pub const STEP_DELAY_SECS: i64 = 30;
