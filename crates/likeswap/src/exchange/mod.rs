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

//! The exchange engine.
//!
//! [`Exchange`] owns the DAL, the configuration, the clock and the optional
//! notifier, and hands out one short-lived service per concern:
//!
//! - [`queue`](Exchange::queue): submission, eviction, retirement and requeue
//! - [`assignments`](Exchange::assignments): batch assignment
//! - [`verification`](Exchange::verification): step confirmation and click records
//! - [`reporting`](Exchange::reporting): leaderboard and referral report
//! - [`admin`](Exchange::admin): moderation and queue maintenance
//! - [`reminders`](Exchange::reminders): idle-user reminder pass
//!
//! Every operation reads and writes the store directly; nothing is cached
//! between calls.

use std::sync::Arc;

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::ExchangeConfig;
use crate::dal::{self, DAL};
use crate::database::universal_types::UniversalTimestamp;
use crate::database::Database;
use crate::error::{ExchangeError, ValidationError};
use crate::models::UserId;
use crate::notifier::{self, Notice, Notifier};

pub mod admin;
pub mod assignment;
pub mod leaderboard;
pub mod links;
pub mod queue;
pub mod reminder;
pub mod verification;

pub use admin::{Admin, ExchangeStats};
pub use assignment::{Assignments, BatchView};
pub use leaderboard::{InviteCount, LeaderboardEntry, Reporting};
pub use links::{tracking_link, validate_link};
pub use queue::{ItemQueue, SubmitOutcome};
pub use reminder::Reminders;
pub use verification::{StepOutcome, Verification};

/// Entry point to the engine.
///
/// Cheap to clone; clones share the connection pool, clock and notifier.
#[derive(Clone)]
pub struct Exchange {
    dal: DAL,
    config: Arc<ExchangeConfig>,
    clock: Arc<dyn Clock>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl std::fmt::Debug for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exchange")
            .field("database", self.dal.database())
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

impl Exchange {
    /// Creates an engine on the wall clock with no notifier.
    ///
    /// The database must already be migrated.
    pub fn new(database: Database, config: ExchangeConfig) -> Self {
        Self {
            dal: DAL::new(database),
            config: Arc::new(config),
            clock: Arc::new(SystemClock),
            notifier: None,
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the notifier used for evictions, bans and reminders.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn dal(&self) -> &DAL {
        &self.dal
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub(crate) fn now(&self) -> UniversalTimestamp {
        self.clock.timestamp()
    }

    /// Whether `user_id` is the configured administrator.
    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.config.admin_id() == Some(user_id)
    }

    /// Registers a user on first interaction. Returns whether the user is new.
    ///
    /// `invited_by` is recorded only when the user is created, and ignored
    /// when it names the user themself.
    pub async fn register_user(
        &self,
        user_id: UserId,
        invited_by: Option<UserId>,
    ) -> Result<bool, ExchangeError> {
        links::check_user_id(user_id)?;
        let invited_by = match invited_by {
            Some(inviter) if inviter == user_id => {
                debug!(user_id, "Ignoring self-referral");
                None
            }
            Some(inviter) => {
                links::check_user_id(inviter)?;
                Some(inviter)
            }
            None => None,
        };

        let now = self.now();
        let created = self
            .dal
            .interact(move |conn| dal::users::ensure(conn, user_id, invited_by, now))
            .await?;
        if created {
            debug!(user_id, ?invited_by, "Registered user");
        }
        Ok(created)
    }

    /// The wrapped outbound link for `link`, when a click collector is configured.
    pub fn tracking_link(&self, user_id: UserId, link: &str) -> Option<String> {
        self.config
            .click_base_url()
            .map(|base| links::tracking_link(base, user_id, link))
    }

    /// Validates `text` against the configured host allowlist.
    pub fn validate_link(&self, text: &str) -> Result<String, ValidationError> {
        links::validate_link(text, self.config.allowed_hosts())
    }

    /// Fire-and-forget delivery of `notice`, if a notifier is set.
    pub(crate) fn notify(&self, notice: Notice) {
        match &self.notifier {
            Some(n) => {
                notifier::dispatch(n, notice);
            }
            None => debug!(kind = notice.kind(), "No notifier configured, dropping notice"),
        }
    }

    pub(crate) fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    pub fn queue(&self) -> ItemQueue<'_> {
        ItemQueue::new(self)
    }

    pub fn assignments(&self) -> Assignments<'_> {
        Assignments::new(self)
    }

    pub fn verification(&self) -> Verification<'_> {
        Verification::new(self)
    }

    pub fn reporting(&self) -> Reporting<'_> {
        Reporting::new(self)
    }

    pub fn admin(&self) -> Admin<'_> {
        Admin::new(self)
    }

    pub fn reminders(&self) -> Reminders<'_> {
        Reminders::new(self)
    }
}
