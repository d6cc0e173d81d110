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

//! Requeue placeholders for retired items.
//!
//! A placeholder is kept apart from the owner's task batch so that neither
//! can overwrite the other.

use diesel::prelude::*;
use diesel::SqliteConnection;

use super::models::RequeuePlaceholderRow;
use super::DAL;
use crate::database::schema::requeue_placeholders;
use crate::database::universal_types::UniversalTimestamp;
use crate::error::StoreError;
use crate::models::{RequeuePlaceholder, UserId};

/// Records a retired link for its owner. Duplicate placeholders collapse.
pub(crate) fn insert_or_ignore(
    conn: &mut SqliteConnection,
    owner_id: UserId,
    link: &str,
    now: UniversalTimestamp,
) -> Result<bool, StoreError> {
    let inserted = diesel::insert_or_ignore_into(requeue_placeholders::table)
        .values(&RequeuePlaceholderRow {
            owner_id,
            link: link.to_string(),
            retired_at: now.to_db_string(),
        })
        .execute(conn)?;
    Ok(inserted > 0)
}

/// Removes and returns every placeholder of `owner_id`, oldest first.
pub(crate) fn take_for_owner(
    conn: &mut SqliteConnection,
    owner_id: UserId,
) -> Result<Vec<RequeuePlaceholder>, StoreError> {
    let rows = requeue_placeholders::table
        .filter(requeue_placeholders::owner_id.eq(owner_id))
        .order((
            requeue_placeholders::retired_at.asc(),
            requeue_placeholders::link.asc(),
        ))
        .select(RequeuePlaceholderRow::as_select())
        .load(conn)?;
    diesel::delete(requeue_placeholders::table.filter(requeue_placeholders::owner_id.eq(owner_id)))
        .execute(conn)?;
    rows.into_iter().map(RequeuePlaceholder::try_from).collect()
}

/// Entity DAL for the `requeue_placeholders` table.
#[derive(Clone)]
pub struct RequeueDAL<'a> {
    dal: &'a DAL,
}

impl<'a> RequeueDAL<'a> {
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    /// Pending placeholders of `owner_id` without consuming them.
    pub async fn pending_for_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<RequeuePlaceholder>, StoreError> {
        self.dal
            .interact(move |conn| {
                requeue_placeholders::table
                    .filter(requeue_placeholders::owner_id.eq(owner_id))
                    .order((
                        requeue_placeholders::retired_at.asc(),
                        requeue_placeholders::link.asc(),
                    ))
                    .select(RequeuePlaceholderRow::as_select())
                    .load(conn)?
                    .into_iter()
                    .map(RequeuePlaceholder::try_from)
                    .collect()
            })
            .await
    }
}
