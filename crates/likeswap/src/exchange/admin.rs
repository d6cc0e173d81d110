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

//! Administrative operations.
//!
//! These are plain store queries and mutations. Checking that the caller is
//! the administrator ([`Exchange::is_admin`]) is the caller's job.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::leaderboard::{InviteCount, LeaderboardEntry};
use super::links::check_user_id;
use super::Exchange;
use crate::dal;
use crate::error::ExchangeError;
use crate::models::{Item, User, UserId};

/// Counters dumped by [`Admin::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeStats {
    pub users: i64,
    pub queued_items: i64,
    pub active_batches: i64,
    pub completions: i64,
    pub top: Vec<LeaderboardEntry>,
    pub invites: Vec<InviteCount>,
}

/// Administrative operations. Obtained from [`Exchange::admin`].
pub struct Admin<'a> {
    exchange: &'a Exchange,
}

impl<'a> Admin<'a> {
    pub fn new(exchange: &'a Exchange) -> Self {
        Self { exchange }
    }

    /// Clears the ban flag and the warnings of `user_id`.
    ///
    /// Returns whether the user was banned before the call.
    pub async fn unban(&self, user_id: UserId) -> Result<bool, ExchangeError> {
        check_user_id(user_id)?;
        let was_banned = self
            .exchange
            .dal()
            .transaction(move |conn| {
                let Some(user) = dal::users::find(conn, user_id)? else {
                    return Ok(None);
                };
                dal::users::unban(conn, user_id)?;
                Ok(Some(user.banned))
            })
            .await?
            .ok_or(ExchangeError::NotFound {
                entity: "user",
                id: user_id,
            })?;

        info!(user_id, was_banned, "User unbanned");
        Ok(was_banned)
    }

    /// Banned users, lowest id first.
    pub async fn list_banned(&self) -> Result<Vec<User>, ExchangeError> {
        Ok(self.exchange.dal().users().list_banned().await?)
    }

    /// The whole queue, front first.
    pub async fn list_items(&self) -> Result<Vec<Item>, ExchangeError> {
        Ok(self.exchange.dal().items().list().await?)
    }

    /// Deletes queued items by id and returns the ids that existed.
    pub async fn delete_items(&self, ids: Vec<i64>) -> Result<Vec<i64>, ExchangeError> {
        let deleted = self
            .exchange
            .dal()
            .transaction(move |conn| {
                let present = dal::items::present_ids(conn, &ids)?;
                dal::items::delete_by_ids(conn, &present)?;
                Ok(present)
            })
            .await?;

        info!(deleted = ?deleted, "Deleted queued items");
        Ok(deleted)
    }

    /// Raw counters plus the leaderboard and the referral report.
    pub async fn stats(&self) -> Result<ExchangeStats, ExchangeError> {
        let dal = self.exchange.dal();
        let reporting = self.exchange.reporting();
        Ok(ExchangeStats {
            users: dal.users().count().await?,
            queued_items: dal.items().count().await?,
            active_batches: dal.task_batches().count().await?,
            completions: dal.completions().count().await?,
            top: reporting.top(None).await?,
            invites: reporting.invite_report().await?,
        })
    }
}
