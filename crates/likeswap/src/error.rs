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

//! Error types for the exchange engine.
//!
//! Only conditions that abort an operation are errors. Refusals that the
//! caller reports back to the user (duplicate submission, step confirmed too
//! early, link not clicked, ...) are modelled as outcome values instead; see
//! [`crate::exchange::SubmitOutcome`] and [`crate::exchange::StepOutcome`].

use thiserror::Error;

use crate::models::UserId;

/// Failures of the persistent store.
///
/// Any of these aborts the request that hit it. Background loops log them
/// and retry on their next cycle.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection pool error: {0}")]
    ConnectionPool(String),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Corrupt record in {table}: {message}")]
    CorruptRecord { table: &'static str, message: String },
}

/// Input rejected before the store is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Link is empty")]
    EmptyLink,

    #[error("Link exceeds {max} bytes")]
    LinkTooLong { max: usize },

    #[error("Link is not a valid URL: {0}")]
    MalformedLink(String),

    #[error("Unsupported link scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("Link host '{host}' is not accepted")]
    HostNotAllowed { host: String },

    #[error("Invalid user id: {0}")]
    InvalidUserId(UserId),

    #[error("Invalid click tracker URL: {0}")]
    InvalidTrackerUrl(String),

    #[error("Duration {0:?} is out of range")]
    DurationOutOfRange(std::time::Duration),
}

/// Errors returned by exchange operations.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<diesel::result::Error> for ExchangeError {
    fn from(err: diesel::result::Error) -> Self {
        ExchangeError::Store(StoreError::Database(err))
    }
}

impl ExchangeError {
    /// Whether this error means the store itself is unavailable or broken.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExchangeError::Store(_))
    }
}

/// Configuration values that violate the engine's scheduling constraints.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },

    #[error(
        "Eviction interval ({interval_secs}s) must be at most a tenth of the item TTL ({ttl_secs}s)"
    )]
    EvictionIntervalTooLong { interval_secs: u64, ttl_secs: u64 },

    #[error(
        "Notify cooldown ({cooldown_secs}s) must be at least ten times the reminder interval ({interval_secs}s)"
    )]
    NotifyCooldownTooShort {
        cooldown_secs: u64,
        interval_secs: u64,
    },

    #[error("At least one allowed link host is required")]
    NoAllowedHosts,

    #[error(transparent)]
    InvalidTracker(#[from] ValidationError),
}
