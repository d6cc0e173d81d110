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

//! Reminder eligibility and the notify cooldown.

use diesel::prelude::*;
use likeswap::database::schema::task_batches;
use likeswap::{Exchange, ExchangeConfig, Notice, MAX_WARNINGS};
use tracing_test::traced_test;

use crate::fixtures::{link, TestExchange};

/// Three owners with one item each, plus an idle user 9 who can take all three.
async fn seeded() -> TestExchange {
    let fx = TestExchange::new().await;
    for owner in 1..=3 {
        fx.submit(owner, &link(owner as u32)).await;
    }
    fx.exchange.register_user(9, None).await.unwrap();
    fx
}

#[tokio::test]
#[traced_test]
async fn test_idle_user_reminded_once_per_cooldown() {
    let mut fx = seeded().await;

    let reminded = fx.exchange.reminders().run_reminder_pass().await.unwrap();
    // Owners only see two foreign items each, below the minimum.
    assert_eq!(reminded, vec![9]);
    assert_eq!(
        fx.next_notice().await,
        Some(Notice::TasksAvailable {
            user_id: 9,
            eligible: 3
        })
    );
    assert!(logs_contain("Sent task reminders"));

    fx.clock.advance_secs(3599);
    assert!(fx
        .exchange
        .reminders()
        .run_reminder_pass()
        .await
        .unwrap()
        .is_empty());
    fx.assert_no_notice().await;

    fx.clock.advance_secs(1);
    assert_eq!(
        fx.exchange.reminders().run_reminder_pass().await.unwrap(),
        vec![9]
    );
    assert!(matches!(
        fx.next_notice().await,
        Some(Notice::TasksAvailable { user_id: 9, .. })
    ));
}

#[tokio::test]
async fn test_pending_work_rules() {
    let fx = seeded().await;
    let reminders = fx.exchange.reminders();

    assert_eq!(reminders.eligible_count(9).await.unwrap(), 3);
    assert!(reminders.has_pending_work(9).await.unwrap());

    assert_eq!(reminders.eligible_count(1).await.unwrap(), 2);
    assert!(!reminders.has_pending_work(1).await.unwrap());

    // An active batch means the user is not idle.
    fx.exchange.assignments().request_batch(9).await.unwrap();
    assert!(!reminders.has_pending_work(9).await.unwrap());
}

#[tokio::test]
async fn test_banned_user_has_no_pending_work() {
    let fx = seeded().await;
    fx.exchange.register_user(4, None).await.unwrap();

    fx.exchange.assignments().request_batch(4).await.unwrap();
    fx.wait_step_delay();
    for _ in 0..MAX_WARNINGS {
        fx.exchange.verification().confirm_step(4).await.unwrap();
    }
    assert!(fx.exchange.dal().users().is_banned(4).await.unwrap());

    // Drop the batch so the ban is the only thing keeping 4 out.
    fx.exchange
        .dal()
        .interact(|conn| {
            diesel::delete(task_batches::table.filter(task_batches::user_id.eq(4)))
                .execute(conn)?;
            Ok(())
        })
        .await
        .unwrap();
    assert_eq!(fx.exchange.reminders().eligible_count(4).await.unwrap(), 3);

    assert!(!fx.exchange.reminders().has_pending_work(4).await.unwrap());
    let reminded = fx.exchange.reminders().run_reminder_pass().await.unwrap();
    assert_eq!(reminded, vec![9]);
}

#[tokio::test]
async fn test_reminder_pass_without_notifier_records_nothing() {
    let mut fx = seeded().await;

    let silent = Exchange::new(fx.database.clone(), ExchangeConfig::default())
        .with_clock(std::sync::Arc::new(fx.clock.clone()));
    assert!(silent
        .reminders()
        .run_reminder_pass()
        .await
        .unwrap()
        .is_empty());
    assert!(fx
        .exchange
        .dal()
        .notify_log()
        .last_notified(9)
        .await
        .unwrap()
        .is_none());

    // The configured engine still reminds right away.
    assert_eq!(
        fx.exchange.reminders().run_reminder_pass().await.unwrap(),
        vec![9]
    );
    assert!(fx.next_notice().await.is_some());
}
