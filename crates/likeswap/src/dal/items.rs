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

//! The active item queue.
//!
//! Queue order is `id` ascending. Links are unique across the table, so a
//! given link is queued at most once no matter who owns it.

use diesel::prelude::*;
use diesel::SqliteConnection;

use super::models::{ItemRow, NewItemRow};
use super::DAL;
use crate::database::schema::items;
use crate::database::universal_types::UniversalTimestamp;
use crate::error::StoreError;
use crate::models::{Item, UserId};

fn collect(rows: Vec<ItemRow>) -> Result<Vec<Item>, StoreError> {
    rows.into_iter().map(Item::try_from).collect()
}

pub(crate) fn find_by_link(conn: &mut SqliteConnection, link: &str) -> Result<Option<Item>, StoreError> {
    items::table
        .filter(items::link.eq(link))
        .select(ItemRow::as_select())
        .first(conn)
        .optional()?
        .map(Item::try_from)
        .transpose()
}

pub(crate) fn count_by_owner(conn: &mut SqliteConnection, owner_id: UserId) -> Result<i64, StoreError> {
    Ok(items::table
        .filter(items::owner_id.eq(owner_id))
        .count()
        .get_result(conn)?)
}

/// Appends a link to the back of the queue.
pub(crate) fn insert(
    conn: &mut SqliteConnection,
    owner_id: UserId,
    link: &str,
    now: UniversalTimestamp,
) -> Result<Item, StoreError> {
    let row = diesel::insert_into(items::table)
        .values(&NewItemRow {
            owner_id,
            link: link.to_string(),
            submitted_at: now.to_db_string(),
        })
        .returning(ItemRow::as_returning())
        .get_result(conn)?;
    Item::try_from(row)
}

/// Appends a link unless it is already queued. Returns whether a row was inserted.
pub(crate) fn insert_or_ignore(
    conn: &mut SqliteConnection,
    owner_id: UserId,
    link: &str,
    now: UniversalTimestamp,
) -> Result<bool, StoreError> {
    let inserted = diesel::insert_or_ignore_into(items::table)
        .values(&NewItemRow {
            owner_id,
            link: link.to_string(),
            submitted_at: now.to_db_string(),
        })
        .execute(conn)?;
    Ok(inserted > 0)
}

/// Queued items not owned by `user_id`, in queue order.
pub(crate) fn not_owned_by(conn: &mut SqliteConnection, user_id: UserId) -> Result<Vec<Item>, StoreError> {
    let rows = items::table
        .filter(items::owner_id.ne(user_id))
        .order(items::id.asc())
        .select(ItemRow::as_select())
        .load(conn)?;
    collect(rows)
}

pub(crate) fn delete_by_link(conn: &mut SqliteConnection, link: &str) -> Result<usize, StoreError> {
    Ok(diesel::delete(items::table.filter(items::link.eq(link))).execute(conn)?)
}

/// The subset of `ids` that is currently queued, ascending.
pub(crate) fn present_ids(conn: &mut SqliteConnection, ids: &[i64]) -> Result<Vec<i64>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(items::table
        .filter(items::id.eq_any(ids))
        .select(items::id)
        .order(items::id.asc())
        .load(conn)?)
}

pub(crate) fn delete_by_ids(conn: &mut SqliteConnection, ids: &[i64]) -> Result<usize, StoreError> {
    if ids.is_empty() {
        return Ok(0);
    }
    Ok(diesel::delete(items::table.filter(items::id.eq_any(ids))).execute(conn)?)
}

/// Items submitted strictly before `cutoff`, in queue order.
pub(crate) fn submitted_before(
    conn: &mut SqliteConnection,
    cutoff: UniversalTimestamp,
) -> Result<Vec<Item>, StoreError> {
    let rows = items::table
        .filter(items::submitted_at.lt(cutoff.to_db_string()))
        .order(items::id.asc())
        .select(ItemRow::as_select())
        .load(conn)?;
    collect(rows)
}

/// Entity DAL for the `items` table.
#[derive(Clone)]
pub struct ItemDAL<'a> {
    dal: &'a DAL,
}

impl<'a> ItemDAL<'a> {
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    /// The whole queue, front first.
    pub async fn list(&self) -> Result<Vec<Item>, StoreError> {
        self.dal
            .interact(|conn| {
                let rows = items::table
                    .order(items::id.asc())
                    .select(ItemRow::as_select())
                    .load(conn)?;
                collect(rows)
            })
            .await
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        self.dal
            .interact(|conn| Ok(items::table.count().get_result::<i64>(conn)?))
            .await
    }
}
