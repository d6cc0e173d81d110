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

//! Idle-user reminders.
//!
//! The pass keeps no state of its own: the last reminder time per user lives
//! in `notify_records`, so a restarted process picks up where it left off.

use tracing::{debug, info};

use super::assignment::eligible_links;
use super::links::check_user_id;
use super::Exchange;
use crate::error::{ExchangeError, ValidationError};
use crate::models::UserId;
use crate::notifier::Notice;

/// Reminder queries and the reminder pass. Obtained from [`Exchange::reminders`].
pub struct Reminders<'a> {
    exchange: &'a Exchange,
}

impl<'a> Reminders<'a> {
    pub fn new(exchange: &'a Exchange) -> Self {
        Self { exchange }
    }

    /// Number of queued items `user_id` could be assigned.
    pub async fn eligible_count(&self, user_id: UserId) -> Result<usize, ExchangeError> {
        check_user_id(user_id)?;
        let links = self
            .exchange
            .dal()
            .interact(move |conn| eligible_links(conn, user_id))
            .await?;
        Ok(links.len())
    }

    /// Whether `user_id` is idle with enough work waiting.
    ///
    /// True when the user has no active batch, is not banned, and at least
    /// `reminder_min_eligible` items are eligible.
    pub async fn has_pending_work(&self, user_id: UserId) -> Result<bool, ExchangeError> {
        Ok(self.pending_count(user_id).await?.is_some())
    }

    /// Eligible item count when the user has pending work, `None` otherwise.
    async fn pending_count(&self, user_id: UserId) -> Result<Option<usize>, ExchangeError> {
        let dal = self.exchange.dal();
        if dal.task_batches().exists(user_id).await? || dal.users().is_banned(user_id).await? {
            return Ok(None);
        }
        let eligible = self.eligible_count(user_id).await?;
        Ok((eligible >= self.exchange.config().reminder_min_eligible()).then_some(eligible))
    }

    /// Sends [`Notice::TasksAvailable`] to every user with pending work who
    /// has not been reminded within the notify cooldown.
    ///
    /// `last_notified_at` is written right after each notice is handed off.
    /// Returns the reminded users. Without a notifier nothing is sent or
    /// recorded.
    pub async fn run_reminder_pass(&self) -> Result<Vec<UserId>, ExchangeError> {
        if !self.exchange.has_notifier() {
            debug!("No notifier configured, skipping reminder pass");
            return Ok(Vec::new());
        }

        let dal = self.exchange.dal();
        let now = self.exchange.now();
        let cooldown = self.exchange.config().notify_cooldown();
        let cooldown = chrono::Duration::from_std(cooldown)
            .map_err(|_| ValidationError::DurationOutOfRange(cooldown))?;

        let mut reminded = Vec::new();
        for user_id in dal.users().all_ids().await? {
            let Some(eligible) = self.pending_count(user_id).await? else {
                continue;
            };

            if let Some(last) = dal.notify_log().last_notified(user_id).await? {
                if now.into_inner() - last.into_inner() < cooldown {
                    debug!(user_id, %last, "Reminded recently, skipping");
                    continue;
                }
            }

            self.exchange
                .notify(Notice::TasksAvailable { user_id, eligible });
            dal.notify_log().touch(user_id, now).await?;
            reminded.push(user_id);
        }

        if !reminded.is_empty() {
            info!(count = reminded.len(), "Sent task reminders");
        }
        Ok(reminded)
    }
}
