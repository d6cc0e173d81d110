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

//! Implementation of the `admin` subcommands.
//!
//! Running the CLI against the database is the privileged identity; no
//! further administrator check is made here.

use anyhow::{Context, Result};
use likeswap::UserId;
use tracing::info;

use super::Session;
use crate::duration::parse_duration;

pub async fn unban(session: &Session, user_id: UserId) -> Result<()> {
    let was_banned = session
        .exchange
        .admin()
        .unban(user_id)
        .await
        .with_context(|| format!("Failed to unban user {}", user_id))?;
    if was_banned {
        println!("User {} unbanned, warnings reset", user_id);
    } else {
        println!("User {} was not banned, warnings reset", user_id);
    }
    Ok(())
}

pub async fn banned(session: &Session) -> Result<()> {
    let users = session
        .exchange
        .admin()
        .list_banned()
        .await
        .context("Failed to list banned users")?;
    if users.is_empty() {
        println!("No banned users");
    }
    for user in users {
        println!("{}  warnings={}", user.id, user.warnings);
    }
    Ok(())
}

pub async fn items(session: &Session) -> Result<()> {
    let items = session
        .exchange
        .admin()
        .list_items()
        .await
        .context("Failed to list queued items")?;
    if items.is_empty() {
        println!("The queue is empty");
    }
    for item in items {
        println!(
            "{:>6}  owner={}  submitted={}  {}",
            item.id, item.owner_id, item.submitted_at, item.link
        );
    }
    Ok(())
}

pub async fn delete(session: &Session, ids: Vec<i64>) -> Result<()> {
    let requested = ids.len();
    let deleted = session
        .exchange
        .admin()
        .delete_items(ids)
        .await
        .context("Failed to delete items")?;
    println!("Deleted {} of {} item(s): {:?}", deleted.len(), requested, deleted);
    Ok(())
}

pub async fn stats(session: &Session) -> Result<()> {
    let stats = session
        .exchange
        .admin()
        .stats()
        .await
        .context("Failed to collect stats")?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

pub async fn invites(session: &Session) -> Result<()> {
    let report = session
        .exchange
        .reporting()
        .invite_report()
        .await
        .context("Failed to load referral report")?;
    if report.is_empty() {
        println!("No referrals recorded");
    }
    for row in report {
        println!("{}  invited={}", row.inviter_id, row.invited);
    }
    Ok(())
}

/// Evicts expired items, or only lists them with `dry_run`.
pub async fn evict(session: &Session, older_than: Option<&str>, dry_run: bool) -> Result<()> {
    let ttl = match older_than {
        Some(text) => parse_duration(text)
            .with_context(|| format!("Invalid duration: '{}'", text))?,
        None => session.exchange.config().item_ttl(),
    };
    let queue = session.exchange.queue();

    if dry_run {
        let expired = queue
            .preview_expired(ttl)
            .await
            .context("Failed to find expired items")?;
        if expired.is_empty() {
            info!("No items older than {:?} without credit", ttl);
        } else {
            info!("[DRY RUN] Would evict {} item(s)", expired.len());
        }
        for item in expired {
            println!("{:>6}  owner={}  {}", item.id, item.owner_id, item.link);
        }
    } else {
        let evicted = queue
            .evict_expired(ttl)
            .await
            .context("Failed to evict items")?;
        if evicted.is_empty() {
            info!("No items older than {:?} without credit", ttl);
        } else {
            info!("Evicted {} item(s)", evicted.len());
        }
        for item in evicted {
            println!("{:>6}  owner={}  {}", item.id, item.owner_id, item.link);
        }
    }

    Ok(())
}
