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

//! Click records written by the redirect collector.

use diesel::prelude::*;
use diesel::SqliteConnection;

use super::models::ClickRow;
use super::DAL;
use crate::database::schema::click_records;
use crate::database::universal_types::UniversalTimestamp;
use crate::error::StoreError;
use crate::models::UserId;

pub(crate) fn has_clicked(
    conn: &mut SqliteConnection,
    user_id: UserId,
    link: &str,
) -> Result<bool, StoreError> {
    Ok(diesel::select(diesel::dsl::exists(
        click_records::table
            .filter(click_records::user_id.eq(user_id))
            .filter(click_records::item_link.eq(link)),
    ))
    .get_result(conn)?)
}

/// Entity DAL for the `click_records` table.
#[derive(Clone)]
pub struct ClickDAL<'a> {
    dal: &'a DAL,
}

impl<'a> ClickDAL<'a> {
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    /// Records that `user_id` followed the wrapped `link`. Repeat clicks keep
    /// the first timestamp; returns whether this was the first.
    pub async fn record(
        &self,
        user_id: UserId,
        link: &str,
        now: UniversalTimestamp,
    ) -> Result<bool, StoreError> {
        let row = ClickRow {
            user_id,
            item_link: link.to_string(),
            clicked_at: now.to_db_string(),
        };
        self.dal
            .interact(move |conn| {
                let inserted = diesel::insert_or_ignore_into(click_records::table)
                    .values(&row)
                    .execute(conn)?;
                Ok(inserted > 0)
            })
            .await
    }
}
