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

//! Batch assignment.
//!
//! A user is eligible for every queued item they do not own and have never
//! been credited for. A batch takes the first [`crate::BATCH_SIZE`] of those
//! in queue order.

use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::links::check_user_id;
use super::queue::resolve_placeholders;
use super::Exchange;
use crate::dal;
use crate::error::{ExchangeError, StoreError};
use crate::models::{TaskBatch, UserId};
use crate::BATCH_SIZE;

/// What a batch request hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchView {
    /// Assigned links in order; empty when nothing is eligible.
    pub links: Vec<String>,
    /// Confirmed steps so far.
    pub progress: i32,
    /// Whether this call created the batch (as opposed to returning an active one).
    pub created: bool,
    /// The caller's own retired links that went back into the queue.
    pub requeued: Vec<String>,
}

impl BatchView {
    fn existing(batch: TaskBatch) -> Self {
        Self {
            links: batch.item_links,
            progress: batch.progress,
            created: false,
            requeued: Vec::new(),
        }
    }

    /// The link the user has to work on next.
    pub fn current_link(&self) -> Option<&str> {
        usize::try_from(self.progress)
            .ok()
            .and_then(|idx| self.links.get(idx))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Links `user_id` may be assigned, in queue order.
pub(crate) fn eligible_links(
    conn: &mut SqliteConnection,
    user_id: UserId,
) -> Result<Vec<String>, StoreError> {
    let completed = dal::completions::links_for_user(conn, user_id)?;
    Ok(dal::items::not_owned_by(conn, user_id)?
        .into_iter()
        .map(|item| item.link)
        .filter(|link| !completed.contains(link))
        .collect())
}

/// Batch assignment. Obtained from [`Exchange::assignments`].
pub struct Assignments<'a> {
    exchange: &'a Exchange,
}

impl<'a> Assignments<'a> {
    pub fn new(exchange: &'a Exchange) -> Self {
        Self { exchange }
    }

    /// Returns the user's active batch, or assigns a new one.
    ///
    /// An active batch is returned unchanged. Otherwise up to
    /// [`BATCH_SIZE`] eligible links are assigned with progress 0, and after
    /// that any of the user's own retired links are put back into the queue.
    /// An empty `links` means nothing is eligible right now.
    pub async fn request_batch(&self, user_id: UserId) -> Result<BatchView, ExchangeError> {
        check_user_id(user_id)?;
        let now = self.exchange.now();

        let view = self
            .exchange
            .dal()
            .transaction(move |conn| {
                dal::users::ensure(conn, user_id, None, now)?;

                if let Some(batch) = dal::task_batches::find(conn, user_id)? {
                    return Ok(BatchView::existing(batch));
                }

                let mut links = eligible_links(conn, user_id)?;
                links.truncate(BATCH_SIZE);

                let created = !links.is_empty();
                if created {
                    dal::task_batches::insert(conn, user_id, &links, now)?;
                }

                let requeued = resolve_placeholders(conn, user_id, now)?;

                Ok(BatchView {
                    links,
                    progress: 0,
                    created,
                    requeued,
                })
            })
            .await?;

        if view.created {
            info!(user_id, links = view.links.len(), "Assigned batch");
        } else if view.links.is_empty() {
            debug!(user_id, "No eligible items");
        } else {
            debug!(user_id, progress = view.progress, "Returning active batch");
        }
        if !view.requeued.is_empty() {
            info!(user_id, requeued = ?view.requeued, "Requeued retired items");
        }
        Ok(view)
    }

    /// The user's active batch, if any, without assigning one.
    pub async fn active_batch(&self, user_id: UserId) -> Result<Option<TaskBatch>, ExchangeError> {
        check_user_id(user_id)?;
        Ok(self.exchange.dal().task_batches().find(user_id).await?)
    }
}
