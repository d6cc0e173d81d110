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

/// A user's current obligation: an ordered list of other users' links.
///
/// `progress` counts confirmed steps and stays within `0..=item_links.len()`.
/// `batch_started_at` is reset after each credited step so the step delay
/// applies per link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskBatch {
    pub user_id: UserId,
    pub item_links: Vec<String>,
    pub batch_started_at: UniversalTimestamp,
    pub progress: i32,
}

impl TaskBatch {
    /// The link the user has to work on next, if any remain.
    pub fn current_link(&self) -> Option<&str> {
        usize::try_from(self.progress)
            .ok()
            .and_then(|idx| self.item_links.get(idx))
            .map(String::as_str)
    }

    /// Number of links in the batch.
    pub fn len(&self) -> usize {
        self.item_links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_links.is_empty()
    }

    /// Whether every step has been confirmed.
    pub fn is_finished(&self) -> bool {
        self.current_link().is_none()
    }
}
