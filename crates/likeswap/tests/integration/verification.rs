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

//! Step confirmation: the delay gate, click checks, warnings and bans.

use diesel::prelude::*;
use likeswap::database::schema::task_batches;
use likeswap::{ExchangeError, Notice, StepOutcome, UserId, MAX_WARNINGS};

use crate::fixtures::{link, TestExchange, ADMIN_ID};

async fn user(fx: &TestExchange, id: UserId) -> likeswap::User {
    fx.exchange
        .dal()
        .users()
        .find(id)
        .await
        .unwrap()
        .expect("user missing")
}

async fn confirm(fx: &TestExchange, id: UserId) -> StepOutcome {
    fx.exchange.verification().confirm_step(id).await.unwrap()
}

#[tokio::test]
async fn test_confirm_before_delay_changes_nothing() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;
    fx.exchange.assignments().request_batch(2).await.unwrap();

    // Without a click, too early still wins and no warning is added.
    fx.clock.advance_secs(10);
    assert_eq!(
        confirm(&fx, 2).await,
        StepOutcome::TooEarly { remaining_secs: 20 }
    );

    fx.exchange
        .verification()
        .record_click(2, &link(1))
        .await
        .unwrap();
    fx.clock.advance_secs(19);
    assert_eq!(
        confirm(&fx, 2).await,
        StepOutcome::TooEarly { remaining_secs: 1 }
    );

    assert_eq!(user(&fx, 2).await.warnings, 0);
    let batch = fx
        .exchange
        .assignments()
        .active_batch(2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.progress, 0);
    assert!(!fx
        .exchange
        .dal()
        .completions()
        .has_completed(2, &link(1))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_three_unclicked_confirms_ban_the_user() {
    let mut fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;
    fx.exchange.assignments().request_batch(2).await.unwrap();
    fx.wait_step_delay();

    assert_eq!(
        confirm(&fx, 2).await,
        StepOutcome::LinkNotClicked { warnings: 1 }
    );
    assert_eq!(
        confirm(&fx, 2).await,
        StepOutcome::LinkNotClicked { warnings: 2 }
    );
    assert_eq!(
        confirm(&fx, 2).await,
        StepOutcome::Banned {
            warnings: MAX_WARNINGS
        }
    );

    let banned = user(&fx, 2).await;
    assert!(banned.banned);
    assert_eq!(banned.warnings, MAX_WARNINGS);

    assert_eq!(
        fx.next_notice().await,
        Some(Notice::UserBanned {
            admin_id: ADMIN_ID,
            user_id: 2,
            warnings: MAX_WARNINGS,
        })
    );

    // Even with a click now on record nothing else is checked or counted.
    fx.exchange
        .verification()
        .record_click(2, &link(1))
        .await
        .unwrap();
    assert_eq!(confirm(&fx, 2).await, StepOutcome::AlreadyBanned);
    assert_eq!(user(&fx, 2).await.warnings, MAX_WARNINGS);
    assert_eq!(user(&fx, 2).await.likes_given, 0);
    fx.assert_no_notice().await;
}

#[tokio::test]
async fn test_unban_clears_ban_and_warnings() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;
    fx.exchange.assignments().request_batch(2).await.unwrap();
    fx.wait_step_delay();
    for _ in 0..MAX_WARNINGS {
        confirm(&fx, 2).await;
    }
    assert!(user(&fx, 2).await.banned);

    assert!(fx.exchange.admin().unban(2).await.unwrap());
    let cleared = user(&fx, 2).await;
    assert!(!cleared.banned);
    assert_eq!(cleared.warnings, 0);

    // A second unban finds nothing to lift.
    assert!(!fx.exchange.admin().unban(2).await.unwrap());

    assert_eq!(
        fx.complete_step(2).await,
        StepOutcome::BatchComplete { total: 1 }
    );
}

#[tokio::test]
async fn test_unban_unknown_user_is_not_found() {
    let fx = TestExchange::new().await;
    let err = fx.exchange.admin().unban(77).await.unwrap_err();
    assert!(matches!(
        err,
        ExchangeError::NotFound {
            entity: "user",
            id: 77
        }
    ));
}

#[tokio::test]
async fn test_confirm_without_batch() {
    let fx = TestExchange::new().await;
    assert_eq!(confirm(&fx, 5).await, StepOutcome::NoActiveBatch);
    // The call still registers the user.
    assert_eq!(user(&fx, 5).await.warnings, 0);
}

#[tokio::test]
async fn test_steps_advance_one_at_a_time() {
    let fx = TestExchange::new().await;
    for owner in 1..=3 {
        fx.submit(owner, &link(owner as u32)).await;
    }
    fx.exchange.assignments().request_batch(9).await.unwrap();

    assert_eq!(
        fx.complete_step(9).await,
        StepOutcome::StepCredited {
            next_link: link(2),
            progress: 1,
            total: 3
        }
    );

    // The delay restarts for every step.
    assert_eq!(
        confirm(&fx, 9).await,
        StepOutcome::TooEarly { remaining_secs: 30 }
    );

    assert_eq!(
        fx.complete_step(9).await,
        StepOutcome::StepCredited {
            next_link: link(3),
            progress: 2,
            total: 3
        }
    );
    assert_eq!(
        fx.complete_step(9).await,
        StepOutcome::BatchComplete { total: 3 }
    );
    assert_eq!(confirm(&fx, 9).await, StepOutcome::NoActiveBatch);

    assert_eq!(user(&fx, 9).await.likes_given, 3);
    for owner in 1..=3 {
        assert_eq!(user(&fx, owner).await.likes_received, 1);
    }
}

#[tokio::test]
async fn test_click_on_other_link_does_not_count() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;
    fx.submit(3, &link(3)).await;
    fx.exchange.assignments().request_batch(2).await.unwrap();

    // The click is for the second link, not the current one.
    fx.exchange
        .verification()
        .record_click(2, &link(3))
        .await
        .unwrap();
    fx.wait_step_delay();
    assert_eq!(
        confirm(&fx, 2).await,
        StepOutcome::LinkNotClicked { warnings: 1 }
    );
}

#[tokio::test]
async fn test_item_gone_from_queue_still_advances_without_counters() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;
    fx.exchange.assignments().request_batch(2).await.unwrap();

    let items = fx.exchange.admin().list_items().await.unwrap();
    let deleted = fx
        .exchange
        .admin()
        .delete_items(vec![items[0].id, 4242])
        .await
        .unwrap();
    assert_eq!(deleted, vec![items[0].id]);

    assert_eq!(
        fx.complete_step(2).await,
        StepOutcome::BatchComplete { total: 1 }
    );
    assert_eq!(user(&fx, 1).await.likes_received, 0);
    assert_eq!(user(&fx, 2).await.likes_given, 0);
    assert!(fx
        .exchange
        .dal()
        .completions()
        .has_completed(2, &link(1))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_fully_confirmed_batch_reports_complete_without_changes() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;
    fx.exchange.assignments().request_batch(2).await.unwrap();
    fx.exchange
        .verification()
        .record_click(2, &link(1))
        .await
        .unwrap();

    // A batch left at its last step, as if the final delete never happened.
    fx.exchange
        .dal()
        .interact(|conn| {
            diesel::update(task_batches::table.find(2))
                .set(task_batches::progress.eq(1))
                .execute(conn)?;
            Ok(())
        })
        .await
        .unwrap();
    let before = fx
        .exchange
        .assignments()
        .active_batch(2)
        .await
        .unwrap()
        .unwrap();
    assert!(before.is_finished());

    fx.wait_step_delay();
    assert_eq!(confirm(&fx, 2).await, StepOutcome::AlreadyComplete);
    assert_eq!(confirm(&fx, 2).await, StepOutcome::AlreadyComplete);

    let after = fx
        .exchange
        .assignments()
        .active_batch(2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after, before);
    assert_eq!(user(&fx, 2).await.warnings, 0);
    assert_eq!(user(&fx, 2).await.likes_given, 0);
    assert_eq!(user(&fx, 1).await.likes_received, 0);
    assert!(!fx
        .exchange
        .dal()
        .completions()
        .has_completed(2, &link(1))
        .await
        .unwrap());
    assert_eq!(fx.exchange.queue().list().await.unwrap().len(), 1);
}
