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

//! Last reminder time per user.

use diesel::prelude::*;

use super::models::NotifyRow;
use super::DAL;
use crate::database::schema::notify_records;
use crate::database::universal_types::UniversalTimestamp;
use crate::error::StoreError;
use crate::models::UserId;

/// Entity DAL for the `notify_records` table.
#[derive(Clone)]
pub struct NotifyLogDAL<'a> {
    dal: &'a DAL,
}

impl<'a> NotifyLogDAL<'a> {
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    pub async fn last_notified(
        &self,
        user_id: UserId,
    ) -> Result<Option<UniversalTimestamp>, StoreError> {
        let raw = self
            .dal
            .interact(move |conn| {
                Ok(notify_records::table
                    .find(user_id)
                    .select(notify_records::last_notified_at)
                    .first::<String>(conn)
                    .optional()?)
            })
            .await?;
        raw.map(|s| {
            UniversalTimestamp::from_db_string(&s).map_err(|e| StoreError::CorruptRecord {
                table: "notify_records",
                message: format!("bad timestamp '{}': {}", s, e),
            })
        })
        .transpose()
    }

    /// Sets the last reminder time, replacing any previous value.
    pub async fn touch(&self, user_id: UserId, now: UniversalTimestamp) -> Result<(), StoreError> {
        let row = NotifyRow {
            user_id,
            last_notified_at: now.to_db_string(),
        };
        self.dal
            .interact(move |conn| {
                diesel::replace_into(notify_records::table)
                    .values(&row)
                    .execute(conn)?;
                Ok(())
            })
            .await
    }
}
