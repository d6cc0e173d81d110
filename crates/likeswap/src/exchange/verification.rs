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

//! Step verification and progress.
//!
//! `confirm_step` runs its whole read-check-write sequence inside one
//! `BEGIN IMMEDIATE` transaction. Two concurrent confirmations for the same
//! user therefore see each other's writes: the second one observes the
//! progress (or warnings) left by the first, never the same starting state.
//!
//! The checks run in a fixed order and the first one that fails decides
//! the outcome:
//!
//! 1. banned user: [`StepOutcome::AlreadyBanned`]
//! 2. no batch: [`StepOutcome::NoActiveBatch`]
//! 3. batch already fully confirmed: [`StepOutcome::AlreadyComplete`]
//! 4. step delay not elapsed: [`StepOutcome::TooEarly`] (no mutation)
//! 5. no click record: a warning, and a ban at [`crate::MAX_WARNINGS`]
//!
//! A credited step records the completion, moves the like counters, may
//! retire the item, and advances the batch.

use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::links::check_user_id;
use super::queue::retire_and_requeue_in;
use super::Exchange;
use crate::dal;
use crate::database::universal_types::UniversalTimestamp;
use crate::error::{ExchangeError, StoreError};
use crate::models::UserId;
use crate::notifier::Notice;
use crate::{CREDIT_THRESHOLD, MAX_WARNINGS, STEP_DELAY_SECS};

/// Result of a step confirmation.
///
/// Every variant maps to its own message class ([`StepOutcome::code`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The user has no active batch.
    NoActiveBatch,
    /// The user is banned; nothing else was checked.
    AlreadyBanned,
    /// Every step of the batch is already confirmed.
    AlreadyComplete,
    /// The step delay has not elapsed yet.
    TooEarly { remaining_secs: i64 },
    /// No click was recorded for the current link; a warning was added.
    LinkNotClicked { warnings: i32 },
    /// No click was recorded and the warning limit was reached.
    Banned { warnings: i32 },
    /// The step was credited and the batch continues with `next_link`.
    StepCredited {
        next_link: String,
        progress: usize,
        total: usize,
    },
    /// The last step was credited and the batch is gone.
    BatchComplete { total: usize },
}

impl StepOutcome {
    /// Stable message class of the outcome.
    pub fn code(&self) -> &'static str {
        match self {
            StepOutcome::NoActiveBatch => "no_active_batch",
            StepOutcome::AlreadyBanned => "already_banned",
            StepOutcome::AlreadyComplete => "already_complete",
            StepOutcome::TooEarly { .. } => "too_early",
            StepOutcome::LinkNotClicked { .. } => "link_not_clicked",
            StepOutcome::Banned { .. } => "banned",
            StepOutcome::StepCredited { .. } => "step_credited",
            StepOutcome::BatchComplete { .. } => "batch_complete",
        }
    }

    /// Whether the call credited a step.
    pub fn is_credited(&self) -> bool {
        matches!(
            self,
            StepOutcome::StepCredited { .. } | StepOutcome::BatchComplete { .. }
        )
    }
}

/// Whole seconds left before the step delay has passed, rounded up.
fn remaining_delay_secs(started_at: UniversalTimestamp, now: UniversalTimestamp) -> Option<i64> {
    let delay_ms = STEP_DELAY_SECS * 1000;
    let elapsed_ms = (now.into_inner() - started_at.into_inner()).num_milliseconds();
    if elapsed_ms >= delay_ms {
        return None;
    }
    let remaining_ms = delay_ms - elapsed_ms;
    Some((remaining_ms + 999) / 1000)
}

/// Credits the acting user for `link` and moves the counters.
///
/// Returns the link if this credit retired it.
fn credit(
    conn: &mut SqliteConnection,
    user_id: UserId,
    link: &str,
    now: UniversalTimestamp,
) -> Result<Option<String>, StoreError> {
    if !dal::completions::insert_or_ignore(conn, user_id, link, now)? {
        debug!(user_id, link, "Completion already recorded");
        return Ok(None);
    }

    // The item may have left the queue since the batch was assigned.
    let Some(item) = dal::items::find_by_link(conn, link)? else {
        debug!(user_id, link, "Credited link is no longer queued");
        return Ok(None);
    };

    dal::users::increment_received(conn, item.owner_id)?;
    dal::users::increment_given(conn, user_id)?;

    let credits = dal::completions::credit_count(conn, link, item.submitted_at)?;
    if credits >= CREDIT_THRESHOLD {
        retire_and_requeue_in(conn, link, item.owner_id, now)?;
        return Ok(Some(item.link));
    }
    Ok(None)
}

fn confirm_in(
    conn: &mut SqliteConnection,
    user_id: UserId,
    now: UniversalTimestamp,
) -> Result<(StepOutcome, Option<String>), StoreError> {
    dal::users::ensure(conn, user_id, None, now)?;
    let Some(user) = dal::users::find(conn, user_id)? else {
        return Err(StoreError::CorruptRecord {
            table: "users",
            message: format!("user {} missing after registration", user_id),
        });
    };
    if user.banned {
        return Ok((StepOutcome::AlreadyBanned, None));
    }

    let Some(batch) = dal::task_batches::find(conn, user_id)? else {
        return Ok((StepOutcome::NoActiveBatch, None));
    };
    let Some(link) = batch.current_link().map(str::to_string) else {
        return Ok((StepOutcome::AlreadyComplete, None));
    };

    if let Some(remaining_secs) = remaining_delay_secs(batch.batch_started_at, now) {
        return Ok((StepOutcome::TooEarly { remaining_secs }, None));
    }

    if !dal::clicks::has_clicked(conn, user_id, &link)? {
        let warnings = user.warnings.saturating_add(1);
        let banned = warnings >= MAX_WARNINGS;
        dal::users::set_moderation(conn, user_id, warnings, banned)?;
        let outcome = if banned {
            StepOutcome::Banned { warnings }
        } else {
            StepOutcome::LinkNotClicked { warnings }
        };
        return Ok((outcome, None));
    }

    let retired = credit(conn, user_id, &link, now)?;

    let total = batch.len();
    let progress = batch.progress + 1;
    let done = usize::try_from(progress).map_or(false, |p| p >= total);
    if done {
        dal::task_batches::delete(conn, user_id)?;
        return Ok((StepOutcome::BatchComplete { total }, retired));
    }

    dal::task_batches::advance(conn, user_id, progress, now)?;
    let next_index = usize::try_from(progress).unwrap_or_default();
    let next_link = batch.item_links.get(next_index).cloned().ok_or_else(|| {
        StoreError::CorruptRecord {
            table: "task_batches",
            message: format!("no link at position {} for user {}", next_index, user_id),
        }
    })?;

    Ok((
        StepOutcome::StepCredited {
            next_link,
            progress: next_index,
            total,
        },
        retired,
    ))
}

/// Step confirmation. Obtained from [`Exchange::verification`].
pub struct Verification<'a> {
    exchange: &'a Exchange,
}

impl<'a> Verification<'a> {
    pub fn new(exchange: &'a Exchange) -> Self {
        Self { exchange }
    }

    /// Confirms the current step of the user's batch.
    ///
    /// Either the whole outcome commits or nothing does. A ban sends
    /// [`Notice::UserBanned`] to the administrator once the transaction has
    /// committed.
    pub async fn confirm_step(&self, user_id: UserId) -> Result<StepOutcome, ExchangeError> {
        check_user_id(user_id)?;
        let now = self.exchange.now();

        let (outcome, retired) = self
            .exchange
            .dal()
            .transaction(move |conn| confirm_in(conn, user_id, now))
            .await?;

        if let Some(link) = retired {
            info!(user_id, link = %link, "Item reached credit threshold and was retired");
        }

        match &outcome {
            StepOutcome::Banned { warnings } => {
                warn!(user_id, warnings, "User banned after failed verifications");
                if let Some(admin_id) = self.exchange.config().admin_id() {
                    self.exchange.notify(Notice::UserBanned {
                        admin_id,
                        user_id,
                        warnings: *warnings,
                    });
                }
            }
            StepOutcome::LinkNotClicked { warnings } => {
                info!(user_id, warnings, "Step rejected, no click recorded");
            }
            StepOutcome::StepCredited {
                progress, total, ..
            } => {
                info!(user_id, progress, total, "Step credited");
            }
            StepOutcome::BatchComplete { total } => {
                info!(user_id, total, "Batch complete");
            }
            other => debug!(user_id, outcome = other.code(), "Step not confirmed"),
        }
        Ok(outcome)
    }

    /// Records that `user_id` followed the wrapped `link`.
    ///
    /// This is the write side of the click collector; the engine itself only
    /// reads click records. Returns whether this was the first click.
    pub async fn record_click(&self, user_id: UserId, link: &str) -> Result<bool, ExchangeError> {
        check_user_id(user_id)?;
        let link = link.trim();
        let first = self
            .exchange
            .dal()
            .clicks()
            .record(user_id, link, self.exchange.now())
            .await?;
        debug!(user_id, link, first, "Click recorded");
        Ok(first)
    }
}
