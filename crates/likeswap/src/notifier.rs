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

//! Outbound notifications to the messaging collaborator.
//!
//! The engine never waits on message delivery. Each [`Notice`] is handed to
//! the configured [`Notifier`] on its own spawned task after the state change
//! that produced it has committed; delivery failures are logged and dropped.
//!
//! ```rust,ignore
//! struct ChatNotifier { client: ChatClient }
//!
//! #[async_trait]
//! impl Notifier for ChatNotifier {
//!     async fn notify(&self, notice: Notice) -> Result<(), NotifyError> {
//!         self.client
//!             .send(notice.recipient(), render(&notice))
//!             .await
//!             .map_err(|e| NotifyError::Delivery(e.to_string()))
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::models::UserId;

/// Something a user (or the administrator) should be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// An uncredited item outlived the TTL and left the queue.
    ItemEvicted { owner_id: UserId, link: String },

    /// The user is idle and has enough work waiting.
    TasksAvailable { user_id: UserId, eligible: usize },

    /// A user reached the warning limit. Sent to the administrator.
    UserBanned {
        admin_id: UserId,
        user_id: UserId,
        warnings: i32,
    },
}

impl Notice {
    /// The user the notice is addressed to.
    pub fn recipient(&self) -> UserId {
        match self {
            Notice::ItemEvicted { owner_id, .. } => *owner_id,
            Notice::TasksAvailable { user_id, .. } => *user_id,
            Notice::UserBanned { admin_id, .. } => *admin_id,
        }
    }

    /// Stable identifier of the notice kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::ItemEvicted { .. } => "item_evicted",
            Notice::TasksAvailable { .. } => "tasks_available",
            Notice::UserBanned { .. } => "user_banned",
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notice delivery failed: {0}")]
    Delivery(String),

    #[error("Recipient {0} is unreachable")]
    Unreachable(UserId),
}

/// Delivery side of the messaging boundary.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notice. Called from a detached task.
    async fn notify(&self, notice: Notice) -> Result<(), NotifyError>;
}

/// Notifier that only logs. Used by `likeswap serve` when no chat transport is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notice: Notice) -> Result<(), NotifyError> {
        info!(
            kind = notice.kind(),
            recipient = notice.recipient(),
            notice = ?notice,
            "Notice"
        );
        Ok(())
    }
}

/// Hands `notice` to `notifier` on a detached task.
pub(crate) fn dispatch(notifier: &Arc<dyn Notifier>, notice: Notice) -> JoinHandle<()> {
    let notifier = Arc::clone(notifier);
    tokio::spawn(async move {
        let kind = notice.kind();
        let recipient = notice.recipient();
        if let Err(e) = notifier.notify(notice).await {
            warn!(kind, recipient, "Failed to deliver notice: {}", e);
        }
    })
}
