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

//! Read-only reports: the leaderboard and the referral counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Exchange;
use crate::error::ExchangeError;
use crate::models::UserId;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub user_id: UserId,
    pub likes_given: i64,
    pub likes_received: i64,
}

/// Number of users a given user referred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteCount {
    pub inviter_id: UserId,
    pub invited: usize,
}

/// Groups `(inviter, invitee)` pairs into counts, largest first, ties by inviter id.
pub(crate) fn count_invites(referrals: &[(UserId, UserId)]) -> Vec<InviteCount> {
    let mut counts: BTreeMap<UserId, usize> = BTreeMap::new();
    for (inviter, _) in referrals {
        *counts.entry(*inviter).or_default() += 1;
    }
    let mut report: Vec<InviteCount> = counts
        .into_iter()
        .map(|(inviter_id, invited)| InviteCount {
            inviter_id,
            invited,
        })
        .collect();
    // Stable sort keeps the ascending inviter order from the BTreeMap for ties.
    report.sort_by(|a, b| b.invited.cmp(&a.invited));
    report
}

/// Reporting queries. Obtained from [`Exchange::reporting`].
pub struct Reporting<'a> {
    exchange: &'a Exchange,
}

impl<'a> Reporting<'a> {
    pub fn new(exchange: &'a Exchange) -> Self {
        Self { exchange }
    }

    /// Top users by likes given.
    ///
    /// Ties are ordered by registration time and then user id. That order is
    /// only there to keep the output stable; it carries no ranking meaning.
    /// `limit` defaults to the configured leaderboard size.
    pub async fn top(&self, limit: Option<usize>) -> Result<Vec<LeaderboardEntry>, ExchangeError> {
        let limit = limit.unwrap_or_else(|| self.exchange.config().leaderboard_limit());
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let users = self.exchange.dal().users().top_by_given(limit).await?;
        Ok(users
            .into_iter()
            .enumerate()
            .map(|(idx, user)| LeaderboardEntry {
                rank: idx + 1,
                user_id: user.id,
                likes_given: user.likes_given,
                likes_received: user.likes_received,
            })
            .collect())
    }

    /// Referral counts per inviter, largest first.
    pub async fn invite_report(&self) -> Result<Vec<InviteCount>, ExchangeError> {
        let referrals = self.exchange.dal().users().referrals().await?;
        Ok(count_invites(&referrals))
    }
}
