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

use serde::{Deserialize, Serialize};

use super::UserId;
use crate::database::universal_types::UniversalTimestamp;

/// A participant in the exchange.
///
/// Created on first interaction. `warnings` only grows through failed
/// verifications; reaching [`crate::MAX_WARNINGS`] sets `banned`. Only an
/// explicit unban clears either field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub likes_given: i64,
    pub likes_received: i64,
    pub invited_by: Option<UserId>,
    pub banned: bool,
    pub warnings: i32,
    pub created_at: UniversalTimestamp,
}
