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

//! SQLite row models
//!
//! Diesel structs using SQLite-compatible types: timestamps as TEXT, the
//! batch link list as a JSON array in TEXT. They are converted to the domain
//! types in [`crate::models`] at the DAL boundary; conversions fail with
//! [`StoreError::CorruptRecord`] instead of panicking on bad data.

use diesel::prelude::*;

use crate::database::schema::*;
use crate::database::universal_types::UniversalTimestamp;
use crate::error::StoreError;
use crate::models::{Item, RequeuePlaceholder, TaskBatch, User};

fn parse_timestamp(table: &'static str, raw: &str) -> Result<UniversalTimestamp, StoreError> {
    UniversalTimestamp::from_db_string(raw).map_err(|e| StoreError::CorruptRecord {
        table,
        message: format!("bad timestamp '{}': {}", raw, e),
    })
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub user_id: i64,
    pub likes_given: i64,
    pub likes_received: i64,
    pub created_at: String,
    pub invited_by: Option<i64>,
    pub banned: bool,
    pub warnings: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub user_id: i64,
    pub created_at: String,
    pub invited_by: Option<i64>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.user_id,
            likes_given: row.likes_given,
            likes_received: row.likes_received,
            invited_by: row.invited_by,
            banned: row.banned,
            warnings: row.warnings,
            created_at: parse_timestamp("users", &row.created_at)?,
        })
    }
}

// ============================================================================
// Items
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ItemRow {
    pub id: i64,
    pub owner_id: i64,
    pub link: String,
    pub submitted_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = items)]
pub struct NewItemRow {
    pub owner_id: i64,
    pub link: String,
    pub submitted_at: String,
}

impl TryFrom<ItemRow> for Item {
    type Error = StoreError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Item {
            id: row.id,
            owner_id: row.owner_id,
            submitted_at: parse_timestamp("items", &row.submitted_at)?,
            link: row.link,
        })
    }
}

// ============================================================================
// Task Batches
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_batches)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskBatchRow {
    pub user_id: i64,
    pub item_links: String,
    pub batch_started_at: String,
    pub progress: i32,
}

impl TaskBatchRow {
    /// Builds a fresh batch row with zero progress.
    pub fn new(
        user_id: i64,
        links: &[String],
        started_at: UniversalTimestamp,
    ) -> Result<Self, StoreError> {
        let item_links = serde_json::to_string(links).map_err(|e| StoreError::CorruptRecord {
            table: "task_batches",
            message: e.to_string(),
        })?;
        Ok(Self {
            user_id,
            item_links,
            batch_started_at: started_at.to_db_string(),
            progress: 0,
        })
    }
}

impl TryFrom<TaskBatchRow> for TaskBatch {
    type Error = StoreError;

    fn try_from(row: TaskBatchRow) -> Result<Self, Self::Error> {
        let item_links: Vec<String> =
            serde_json::from_str(&row.item_links).map_err(|e| StoreError::CorruptRecord {
                table: "task_batches",
                message: format!("bad link list for user {}: {}", row.user_id, e),
            })?;
        let progress_in_range = usize::try_from(row.progress)
            .map(|p| p <= item_links.len())
            .unwrap_or(false);
        if !progress_in_range {
            return Err(StoreError::CorruptRecord {
                table: "task_batches",
                message: format!(
                    "progress {} outside 0..={} for user {}",
                    row.progress,
                    item_links.len(),
                    row.user_id
                ),
            });
        }
        Ok(TaskBatch {
            user_id: row.user_id,
            item_links,
            batch_started_at: parse_timestamp("task_batches", &row.batch_started_at)?,
            progress: row.progress,
        })
    }
}

// ============================================================================
// Requeue Placeholders
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = requeue_placeholders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RequeuePlaceholderRow {
    pub owner_id: i64,
    pub link: String,
    pub retired_at: String,
}

impl TryFrom<RequeuePlaceholderRow> for RequeuePlaceholder {
    type Error = StoreError;

    fn try_from(row: RequeuePlaceholderRow) -> Result<Self, Self::Error> {
        Ok(RequeuePlaceholder {
            owner_id: row.owner_id,
            retired_at: parse_timestamp("requeue_placeholders", &row.retired_at)?,
            link: row.link,
        })
    }
}

// ============================================================================
// Completion / Click / Notify Records
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = completion_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CompletionRow {
    pub user_id: i64,
    pub item_link: String,
    pub credited_at: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = click_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClickRow {
    pub user_id: i64,
    pub item_link: String,
    pub clicked_at: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notify_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NotifyRow {
    pub user_id: i64,
    pub last_notified_at: String,
}
