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

//! Per-user task batches. At most one row per user.

use diesel::prelude::*;
use diesel::SqliteConnection;

use super::models::TaskBatchRow;
use super::DAL;
use crate::database::schema::task_batches;
use crate::database::universal_types::UniversalTimestamp;
use crate::error::StoreError;
use crate::models::{TaskBatch, UserId};

pub(crate) fn find(conn: &mut SqliteConnection, user_id: UserId) -> Result<Option<TaskBatch>, StoreError> {
    task_batches::table
        .find(user_id)
        .select(TaskBatchRow::as_select())
        .first(conn)
        .optional()?
        .map(TaskBatch::try_from)
        .transpose()
}

/// Stores a fresh batch. Fails if the user already has one.
pub(crate) fn insert(
    conn: &mut SqliteConnection,
    user_id: UserId,
    links: &[String],
    now: UniversalTimestamp,
) -> Result<TaskBatch, StoreError> {
    let row = TaskBatchRow::new(user_id, links, now)?;
    diesel::insert_into(task_batches::table)
        .values(&row)
        .execute(conn)?;
    TaskBatch::try_from(row)
}

/// Moves the batch to `progress` and restarts the step timer.
pub(crate) fn advance(
    conn: &mut SqliteConnection,
    user_id: UserId,
    progress: i32,
    now: UniversalTimestamp,
) -> Result<(), StoreError> {
    diesel::update(task_batches::table.find(user_id))
        .set((
            task_batches::progress.eq(progress),
            task_batches::batch_started_at.eq(now.to_db_string()),
        ))
        .execute(conn)?;
    Ok(())
}

pub(crate) fn delete(conn: &mut SqliteConnection, user_id: UserId) -> Result<bool, StoreError> {
    let deleted = diesel::delete(task_batches::table.find(user_id)).execute(conn)?;
    Ok(deleted > 0)
}

pub(crate) fn exists(conn: &mut SqliteConnection, user_id: UserId) -> Result<bool, StoreError> {
    Ok(diesel::select(diesel::dsl::exists(task_batches::table.find(user_id))).get_result(conn)?)
}

/// Entity DAL for the `task_batches` table.
#[derive(Clone)]
pub struct TaskBatchDAL<'a> {
    dal: &'a DAL,
}

impl<'a> TaskBatchDAL<'a> {
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    pub async fn find(&self, user_id: UserId) -> Result<Option<TaskBatch>, StoreError> {
        self.dal.interact(move |conn| find(conn, user_id)).await
    }

    pub async fn exists(&self, user_id: UserId) -> Result<bool, StoreError> {
        self.dal.interact(move |conn| exists(conn, user_id)).await
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        self.dal
            .interact(|conn| Ok(task_batches::table.count().get_result::<i64>(conn)?))
            .await
    }
}
