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

//! User records: counters, referrals and moderation state.

use diesel::prelude::*;
use diesel::SqliteConnection;

use super::models::{NewUserRow, UserRow};
use super::DAL;
use crate::database::schema::users;
use crate::database::universal_types::UniversalTimestamp;
use crate::error::StoreError;
use crate::models::{User, UserId};

/// Creates the user row if it does not exist yet. Returns whether a row was inserted.
///
/// An existing user's `invited_by` is never overwritten.
pub(crate) fn ensure(
    conn: &mut SqliteConnection,
    user_id: UserId,
    invited_by: Option<UserId>,
    now: UniversalTimestamp,
) -> Result<bool, StoreError> {
    let inserted = diesel::insert_or_ignore_into(users::table)
        .values(&NewUserRow {
            user_id,
            created_at: now.to_db_string(),
            invited_by,
        })
        .execute(conn)?;
    Ok(inserted > 0)
}

pub(crate) fn find(conn: &mut SqliteConnection, user_id: UserId) -> Result<Option<User>, StoreError> {
    users::table
        .find(user_id)
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .map(User::try_from)
        .transpose()
}

pub(crate) fn is_banned(conn: &mut SqliteConnection, user_id: UserId) -> Result<bool, StoreError> {
    let banned = users::table
        .find(user_id)
        .select(users::banned)
        .first::<bool>(conn)
        .optional()?;
    Ok(banned.unwrap_or(false))
}

/// Writes the warning count and ban flag together.
pub(crate) fn set_moderation(
    conn: &mut SqliteConnection,
    user_id: UserId,
    warnings: i32,
    banned: bool,
) -> Result<(), StoreError> {
    diesel::update(users::table.find(user_id))
        .set((users::warnings.eq(warnings), users::banned.eq(banned)))
        .execute(conn)?;
    Ok(())
}

pub(crate) fn increment_given(conn: &mut SqliteConnection, user_id: UserId) -> Result<(), StoreError> {
    diesel::update(users::table.find(user_id))
        .set(users::likes_given.eq(users::likes_given + 1))
        .execute(conn)?;
    Ok(())
}

pub(crate) fn increment_received(
    conn: &mut SqliteConnection,
    user_id: UserId,
) -> Result<(), StoreError> {
    diesel::update(users::table.find(user_id))
        .set(users::likes_received.eq(users::likes_received + 1))
        .execute(conn)?;
    Ok(())
}

/// Clears the ban flag and warnings. Returns whether the user exists.
pub(crate) fn unban(conn: &mut SqliteConnection, user_id: UserId) -> Result<bool, StoreError> {
    let updated = diesel::update(users::table.find(user_id))
        .set((users::banned.eq(false), users::warnings.eq(0)))
        .execute(conn)?;
    Ok(updated > 0)
}

/// Entity DAL for the `users` table.
#[derive(Clone)]
pub struct UserDAL<'a> {
    dal: &'a DAL,
}

impl<'a> UserDAL<'a> {
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    pub async fn find(&self, user_id: UserId) -> Result<Option<User>, StoreError> {
        self.dal.interact(move |conn| find(conn, user_id)).await
    }

    pub async fn is_banned(&self, user_id: UserId) -> Result<bool, StoreError> {
        self.dal.interact(move |conn| is_banned(conn, user_id)).await
    }

    /// Banned users, lowest id first.
    pub async fn list_banned(&self) -> Result<Vec<User>, StoreError> {
        self.dal
            .interact(|conn| {
                users::table
                    .filter(users::banned.eq(true))
                    .order(users::user_id.asc())
                    .select(UserRow::as_select())
                    .load(conn)?
                    .into_iter()
                    .map(User::try_from)
                    .collect()
            })
            .await
    }

    /// Users ordered by likes given (descending), ties by registration time then id.
    pub async fn top_by_given(&self, limit: i64) -> Result<Vec<User>, StoreError> {
        self.dal
            .interact(move |conn| {
                users::table
                    .order((
                        users::likes_given.desc(),
                        users::created_at.asc(),
                        users::user_id.asc(),
                    ))
                    .limit(limit)
                    .select(UserRow::as_select())
                    .load(conn)?
                    .into_iter()
                    .map(User::try_from)
                    .collect()
            })
            .await
    }

    /// Every registered user id, ascending.
    pub async fn all_ids(&self) -> Result<Vec<UserId>, StoreError> {
        self.dal
            .interact(|conn| {
                Ok(users::table
                    .select(users::user_id)
                    .order(users::user_id.asc())
                    .load::<i64>(conn)?)
            })
            .await
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        self.dal
            .interact(|conn| Ok(users::table.count().get_result::<i64>(conn)?))
            .await
    }

    /// `(inviter, invitee)` pairs for every user that was referred.
    pub async fn referrals(&self) -> Result<Vec<(UserId, UserId)>, StoreError> {
        self.dal
            .interact(|conn| {
                let rows = users::table
                    .filter(users::invited_by.is_not_null())
                    .order(users::user_id.asc())
                    .select((users::invited_by, users::user_id))
                    .load::<(Option<i64>, i64)>(conn)?;
                Ok(rows
                    .into_iter()
                    .filter_map(|(inviter, invitee)| inviter.map(|i| (i, invitee)))
                    .collect())
            })
            .await
    }
}
