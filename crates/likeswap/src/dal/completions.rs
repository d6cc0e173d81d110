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

//! Verified completions. Rows are never deleted, so a user is credited for
//! a given link at most once ever.

use std::collections::HashSet;

use diesel::prelude::*;
use diesel::SqliteConnection;

use super::models::CompletionRow;
use super::DAL;
use crate::database::schema::completion_records;
use crate::database::universal_types::UniversalTimestamp;
use crate::error::StoreError;
use crate::models::UserId;

/// Records a completion. Returns `false` if the user was already credited for the link.
pub(crate) fn insert_or_ignore(
    conn: &mut SqliteConnection,
    user_id: UserId,
    link: &str,
    now: UniversalTimestamp,
) -> Result<bool, StoreError> {
    let inserted = diesel::insert_or_ignore_into(completion_records::table)
        .values(&CompletionRow {
            user_id,
            item_link: link.to_string(),
            credited_at: now.to_db_string(),
        })
        .execute(conn)?;
    Ok(inserted > 0)
}

/// Every link `user_id` has ever been credited for.
pub(crate) fn links_for_user(
    conn: &mut SqliteConnection,
    user_id: UserId,
) -> Result<HashSet<String>, StoreError> {
    let links = completion_records::table
        .filter(completion_records::user_id.eq(user_id))
        .select(completion_records::item_link)
        .load::<String>(conn)?;
    Ok(links.into_iter().collect())
}

/// Whether anyone has ever been credited for `link`, in any queue cycle.
pub(crate) fn has_any(conn: &mut SqliteConnection, link: &str) -> Result<bool, StoreError> {
    Ok(diesel::select(diesel::dsl::exists(
        completion_records::table.filter(completion_records::item_link.eq(link)),
    ))
    .get_result(conn)?)
}

/// Completions of `link` credited strictly after `since`.
///
/// Passing the item's `submitted_at` gives the credit count of its current
/// queue cycle. A credit always lands at least one step delay after the
/// item was assigned, so it can never share the submission instant.
pub(crate) fn credit_count(
    conn: &mut SqliteConnection,
    link: &str,
    since: UniversalTimestamp,
) -> Result<i64, StoreError> {
    Ok(completion_records::table
        .filter(completion_records::item_link.eq(link))
        .filter(completion_records::credited_at.gt(since.to_db_string()))
        .count()
        .get_result(conn)?)
}

/// Entity DAL for the `completion_records` table.
#[derive(Clone)]
pub struct CompletionDAL<'a> {
    dal: &'a DAL,
}

impl<'a> CompletionDAL<'a> {
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    pub async fn has_completed(&self, user_id: UserId, link: &str) -> Result<bool, StoreError> {
        let link = link.to_string();
        self.dal
            .interact(move |conn| {
                Ok(diesel::select(diesel::dsl::exists(
                    completion_records::table
                        .filter(completion_records::user_id.eq(user_id))
                        .filter(completion_records::item_link.eq(link)),
                ))
                .get_result(conn)?)
            })
            .await
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        self.dal
            .interact(|conn| Ok(completion_records::table.count().get_result::<i64>(conn)?))
            .await
    }
}
