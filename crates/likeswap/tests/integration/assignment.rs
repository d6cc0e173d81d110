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

//! Batch assignment rules.

use likeswap::{Clock, StepOutcome, BATCH_SIZE};

use crate::fixtures::{link, TestExchange, ADMIN_ID};

#[tokio::test]
async fn test_batch_takes_oldest_foreign_items_up_to_batch_size() {
    let fx = TestExchange::new().await;
    for owner in 1..=5 {
        fx.submit(owner, &link(owner as u32)).await;
        fx.clock.advance_secs(1);
    }

    let view = fx.exchange.assignments().request_batch(3).await.unwrap();
    assert!(view.created);
    assert_eq!(view.progress, 0);
    assert_eq!(view.links.len(), BATCH_SIZE);
    assert_eq!(view.links, vec![link(1), link(2), link(4)]);
    assert!(!view.links.contains(&link(3)), "own item assigned");
}

#[tokio::test]
async fn test_active_batch_returned_unchanged() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;
    fx.submit(2, &link(2)).await;

    let started = fx.clock.now();
    let first = fx.exchange.assignments().request_batch(9).await.unwrap();
    assert!(first.created);

    // New items arriving later do not change the active batch.
    fx.submit(4, &link(4)).await;
    fx.clock.advance_secs(5);

    let second = fx.exchange.assignments().request_batch(9).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.links, first.links);
    assert_eq!(second.progress, 0);

    let stored = fx
        .exchange
        .assignments()
        .active_batch(9)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.batch_started_at.into_inner(), started);
}

#[tokio::test]
async fn test_completed_items_never_reassigned() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;

    fx.exchange.assignments().request_batch(2).await.unwrap();
    assert_eq!(fx.complete_step(2).await, StepOutcome::BatchComplete { total: 1 });

    fx.submit(3, &link(3)).await;
    let view = fx.exchange.assignments().request_batch(2).await.unwrap();
    assert_eq!(view.links, vec![link(3)]);

    assert_eq!(fx.complete_step(2).await, StepOutcome::BatchComplete { total: 1 });
    let view = fx.exchange.assignments().request_batch(2).await.unwrap();
    assert!(view.is_empty());
    assert!(!view.created);
}

#[tokio::test]
async fn test_empty_queue_yields_empty_batch_without_storing_one() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;

    let view = fx.exchange.assignments().request_batch(1).await.unwrap();
    assert!(view.is_empty());
    assert!(!view.created);
    assert!(fx
        .exchange
        .assignments()
        .active_batch(1)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_placeholder_resolved_after_assignment() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;
    fx.submit(2, &link(2)).await;
    fx.exchange
        .queue()
        .retire_and_requeue(&link(1), 1)
        .await
        .unwrap();

    let view = fx.exchange.assignments().request_batch(1).await.unwrap();
    // The requeued link is the owner's own and is never part of their batch.
    assert_eq!(view.links, vec![link(2)]);
    assert_eq!(view.requeued, vec![link(1)]);

    let queue: Vec<_> = fx
        .exchange
        .queue()
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.link)
        .collect();
    assert_eq!(queue, vec![link(2), link(1)]);
}

#[tokio::test]
async fn test_idempotent_request_leaves_placeholder_pending() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;
    fx.submit(2, &link(2)).await;
    fx.exchange.assignments().request_batch(1).await.unwrap();

    fx.exchange
        .queue()
        .retire_and_requeue(&link(1), 1)
        .await
        .unwrap();

    let view = fx.exchange.assignments().request_batch(1).await.unwrap();
    assert!(!view.created);
    assert!(view.requeued.is_empty());
    assert_eq!(
        fx.exchange
            .dal()
            .requeue()
            .pending_for_owner(1)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_several_placeholders_for_one_owner_all_return() {
    let fx = TestExchange::new().await;
    for n in 1..=2 {
        let outcome = fx
            .exchange
            .queue()
            .submit(ADMIN_ID, &link(n), true)
            .await
            .unwrap();
        assert_eq!(outcome.code(), "accepted");
    }
    for n in 1..=2 {
        fx.exchange
            .queue()
            .retire_and_requeue(&link(n), ADMIN_ID)
            .await
            .unwrap();
        fx.clock.advance_secs(1);
    }

    let view = fx.exchange.assignments().request_batch(ADMIN_ID).await.unwrap();
    assert_eq!(view.requeued, vec![link(1), link(2)]);
    assert_eq!(fx.exchange.queue().list().await.unwrap().len(), 2);
}
