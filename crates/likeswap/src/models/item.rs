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

/// A submitted link sitting in the active queue.
///
/// Queue order is the autoincrement `id`: a requeued link gets a fresh row
/// and therefore goes to the back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub owner_id: UserId,
    pub link: String,
    pub submitted_at: UniversalTimestamp,
}

/// A retired item waiting to re-enter the queue on its owner's next batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequeuePlaceholder {
    pub owner_id: UserId,
    pub link: String,
    pub retired_at: UniversalTimestamp,
}
