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

//! Item queue: submission, TTL eviction, retirement and requeue.
//!
//! An item leaves the queue in one of two ways. It is *evicted* when it
//! outlives the TTL without ever having been credited, and it is
//! *retired* when its current cycle reaches [`crate::CREDIT_THRESHOLD`]
//! credits. A retired item gets a requeue placeholder; the owner's next
//! batch request puts the link back at the end of the queue.

use std::time::Duration;

use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::links::check_user_id;
use super::Exchange;
use crate::dal;
use crate::database::universal_types::UniversalTimestamp;
use crate::error::{ExchangeError, StoreError, ValidationError};
use crate::models::{Item, UserId};

/// Result of a submission. Refusals are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// The link was appended to the queue.
    Accepted(Item),
    /// The link is already queued.
    AlreadyExists,
    /// The owner already has an item queued.
    LimitReached,
}

impl SubmitOutcome {
    /// Stable message class of the outcome.
    pub fn code(&self) -> &'static str {
        match self {
            SubmitOutcome::Accepted(_) => "accepted",
            SubmitOutcome::AlreadyExists => "already_exists",
            SubmitOutcome::LimitReached => "limit_reached",
        }
    }
}

/// Computes `now - ttl`, saturating at the earliest representable instant.
pub(crate) fn cutoff(
    now: UniversalTimestamp,
    ttl: Duration,
) -> Result<UniversalTimestamp, ValidationError> {
    let ttl = chrono::Duration::from_std(ttl).map_err(|_| ValidationError::DurationOutOfRange(ttl))?;
    let at = now
        .into_inner()
        .checked_sub_signed(ttl)
        .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);
    Ok(UniversalTimestamp(at))
}

/// Queued items older than `cutoff` whose link was never credited.
fn expired_items(
    conn: &mut SqliteConnection,
    cutoff: UniversalTimestamp,
) -> Result<Vec<Item>, StoreError> {
    let mut expired = Vec::new();
    for item in dal::items::submitted_before(conn, cutoff)? {
        if !dal::completions::has_any(conn, &item.link)? {
            expired.push(item);
        }
    }
    Ok(expired)
}

/// Removes `link` from the queue and leaves a requeue placeholder for `owner_id`.
///
/// Returns whether the link was still queued.
pub(crate) fn retire_and_requeue_in(
    conn: &mut SqliteConnection,
    link: &str,
    owner_id: UserId,
    now: UniversalTimestamp,
) -> Result<bool, StoreError> {
    let removed = dal::items::delete_by_link(conn, link)? > 0;
    dal::requeue::insert_or_ignore(conn, owner_id, link, now)?;
    Ok(removed)
}

/// Reinserts every placeholder of `owner_id` with a fresh timestamp and clears them.
///
/// Returns the links that actually went back into the queue; a link that is
/// already queued again (resubmitted meanwhile) is skipped.
pub(crate) fn resolve_placeholders(
    conn: &mut SqliteConnection,
    owner_id: UserId,
    now: UniversalTimestamp,
) -> Result<Vec<String>, StoreError> {
    let mut requeued = Vec::new();
    for placeholder in dal::requeue::take_for_owner(conn, owner_id)? {
        if dal::items::insert_or_ignore(conn, owner_id, &placeholder.link, now)? {
            requeued.push(placeholder.link);
        }
    }
    Ok(requeued)
}

/// Queue operations. Obtained from [`Exchange::queue`].
pub struct ItemQueue<'a> {
    exchange: &'a Exchange,
}

impl<'a> ItemQueue<'a> {
    pub fn new(exchange: &'a Exchange) -> Self {
        Self { exchange }
    }

    /// Submits `link` for `owner_id`.
    ///
    /// The link is validated before the store is touched. A link already in
    /// the queue (from anyone) yields [`SubmitOutcome::AlreadyExists`]; an
    /// owner with a queued item yields [`SubmitOutcome::LimitReached`]
    /// unless `is_privileged`.
    pub async fn submit(
        &self,
        owner_id: UserId,
        link: &str,
        is_privileged: bool,
    ) -> Result<SubmitOutcome, ExchangeError> {
        check_user_id(owner_id)?;
        let link = self.exchange.validate_link(link)?;
        let now = self.exchange.now();

        let outcome = self
            .exchange
            .dal()
            .transaction(move |conn| {
                dal::users::ensure(conn, owner_id, None, now)?;

                if dal::items::find_by_link(conn, &link)?.is_some() {
                    return Ok(SubmitOutcome::AlreadyExists);
                }
                if !is_privileged && dal::items::count_by_owner(conn, owner_id)? >= 1 {
                    return Ok(SubmitOutcome::LimitReached);
                }

                let item = dal::items::insert(conn, owner_id, &link, now)?;
                Ok(SubmitOutcome::Accepted(item))
            })
            .await?;

        match &outcome {
            SubmitOutcome::Accepted(item) => {
                info!(owner_id, item_id = item.id, link = %item.link, "Item queued")
            }
            refused => debug!(owner_id, outcome = refused.code(), "Submission refused"),
        }
        Ok(outcome)
    }

    /// Deletes every item older than `ttl` whose link was never credited,
    /// and returns the evicted items.
    ///
    /// Owners are not notified here; the eviction loop emits
    /// [`crate::Notice::ItemEvicted`] for each returned item.
    pub async fn evict_expired(&self, ttl: Duration) -> Result<Vec<Item>, ExchangeError> {
        let cutoff = cutoff(self.exchange.now(), ttl)?;

        let evicted = self
            .exchange
            .dal()
            .transaction(move |conn| {
                let expired = expired_items(conn, cutoff)?;
                let ids: Vec<i64> = expired.iter().map(|item| item.id).collect();
                dal::items::delete_by_ids(conn, &ids)?;
                Ok(expired)
            })
            .await?;

        if evicted.is_empty() {
            debug!(%cutoff, "No expired items");
        } else {
            info!(count = evicted.len(), %cutoff, "Evicted expired items");
        }
        Ok(evicted)
    }

    /// Items [`evict_expired`](Self::evict_expired) would remove right now.
    pub async fn preview_expired(&self, ttl: Duration) -> Result<Vec<Item>, ExchangeError> {
        let cutoff = cutoff(self.exchange.now(), ttl)?;
        Ok(self
            .exchange
            .dal()
            .interact(move |conn| expired_items(conn, cutoff))
            .await?)
    }

    /// Removes `link` from the queue and schedules it to return for `owner_id`
    /// on their next batch request.
    pub async fn retire_and_requeue(
        &self,
        link: &str,
        owner_id: UserId,
    ) -> Result<bool, ExchangeError> {
        check_user_id(owner_id)?;
        let link = link.to_string();
        let now = self.exchange.now();
        let log_link = link.clone();

        let removed = self
            .exchange
            .dal()
            .transaction(move |conn| retire_and_requeue_in(conn, &link, owner_id, now))
            .await?;

        info!(owner_id, link = %log_link, removed, "Item retired, awaiting requeue");
        Ok(removed)
    }

    /// The whole queue, front first.
    pub async fn list(&self) -> Result<Vec<Item>, ExchangeError> {
        Ok(self.exchange.dal().items().list().await?)
    }
}
