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

//! Operator equivalents of the chat actions.

use anyhow::{Context, Result};
use likeswap::{Exchange, StepOutcome, SubmitOutcome, UserId, MAX_WARNINGS};

use super::Session;

/// The link to show a user: wrapped for the click collector when one is configured.
fn shown_link(exchange: &Exchange, user_id: UserId, link: &str) -> String {
    exchange
        .tracking_link(user_id, link)
        .unwrap_or_else(|| link.to_string())
}

fn describe_submit(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Accepted(item) => format!("Link queued (item {})", item.id),
        SubmitOutcome::AlreadyExists => "This link is already in the queue".to_string(),
        SubmitOutcome::LimitReached => "You already have a link in the queue".to_string(),
    }
}

fn describe_step(exchange: &Exchange, user_id: UserId, outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::NoActiveBatch => "No active tasks. Request a batch first".to_string(),
        StepOutcome::AlreadyBanned => "This account is banned".to_string(),
        StepOutcome::AlreadyComplete => "Every task in this batch is done".to_string(),
        StepOutcome::TooEarly { remaining_secs } => {
            format!("Too early, wait {} more second(s)", remaining_secs)
        }
        StepOutcome::LinkNotClicked { warnings } => format!(
            "The link was not opened. Warning {}/{}",
            warnings, MAX_WARNINGS
        ),
        StepOutcome::Banned { warnings } => {
            format!("Banned after {} failed verifications", warnings)
        }
        StepOutcome::StepCredited {
            next_link,
            progress,
            total,
        } => format!(
            "Step {}/{} confirmed. Next: {}",
            progress,
            total,
            shown_link(exchange, user_id, next_link)
        ),
        StepOutcome::BatchComplete { total } => {
            format!("All {} task(s) done. Thanks for supporting the queue", total)
        }
    }
}

pub async fn register(session: &Session, user_id: UserId, invited_by: Option<UserId>) -> Result<()> {
    let created = session
        .exchange
        .register_user(user_id, invited_by)
        .await
        .context("Failed to register user")?;
    if created {
        println!("Registered user {}", user_id);
    } else {
        println!("User {} already exists", user_id);
    }
    Ok(())
}

pub async fn submit(session: &Session, user_id: UserId, link: &str) -> Result<()> {
    let exchange = &session.exchange;
    let outcome = exchange
        .queue()
        .submit(user_id, link, exchange.is_admin(user_id))
        .await
        .context("Failed to submit link")?;
    println!("[{}] {}", outcome.code(), describe_submit(&outcome));
    Ok(())
}

pub async fn tasks(session: &Session, user_id: UserId) -> Result<()> {
    let exchange = &session.exchange;
    let view = exchange
        .assignments()
        .request_batch(user_id)
        .await
        .context("Failed to request tasks")?;

    for link in &view.requeued {
        println!("Your link is back in the queue: {}", link);
    }

    if view.is_empty() {
        println!("No tasks available right now");
        return Ok(());
    }

    let progress = usize::try_from(view.progress).unwrap_or_default();
    println!(
        "{} batch, {}/{} done",
        if view.created { "New" } else { "Current" },
        progress,
        view.links.len()
    );
    for (idx, link) in view.links.iter().enumerate() {
        let marker = if idx < progress {
            "x"
        } else if idx == progress {
            ">"
        } else {
            " "
        };
        println!("[{}] {}", marker, shown_link(exchange, user_id, link));
    }
    Ok(())
}

pub async fn confirm(session: &Session, user_id: UserId) -> Result<()> {
    let exchange = &session.exchange;
    let outcome = exchange
        .verification()
        .confirm_step(user_id)
        .await
        .context("Failed to confirm step")?;
    println!(
        "[{}] {}",
        outcome.code(),
        describe_step(exchange, user_id, &outcome)
    );
    Ok(())
}

pub async fn click(session: &Session, user_id: UserId, link: &str) -> Result<()> {
    let recorded = session
        .exchange
        .verification()
        .record_click(user_id, link)
        .await
        .context("Failed to record click")?;
    if recorded {
        println!("Click recorded");
    } else {
        println!("Click was already recorded");
    }
    Ok(())
}

pub async fn top(session: &Session, limit: Option<usize>) -> Result<()> {
    let entries = session
        .exchange
        .reporting()
        .top(limit)
        .await
        .context("Failed to load leaderboard")?;
    if entries.is_empty() {
        println!("Nobody has liked anything yet");
        return Ok(());
    }
    println!("{:>4}  {:>14}  {:>6}  {:>8}", "rank", "user", "given", "received");
    for entry in entries {
        println!(
            "{:>4}  {:>14}  {:>6}  {:>8}",
            entry.rank, entry.user_id, entry.likes_given, entry.likes_received
        );
    }
    Ok(())
}
