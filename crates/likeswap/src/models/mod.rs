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

//! Domain types returned by the DAL and the exchange operations.
//!
//! These carry no Diesel derives; the SQLite row structs in
//! [`crate::dal::models`] convert into them at the DAL boundary.

pub mod item;
pub mod task_batch;
pub mod user;

pub use item::{Item, RequeuePlaceholder};
pub use task_batch::TaskBatch;
pub use user::User;

/// Opaque identifier of a participant (the chat platform's user id).
pub type UserId = i64;
