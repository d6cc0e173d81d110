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

//! End-to-end flows through submit, assign, click, confirm and requeue.

use likeswap::{Clock, StepOutcome, UserId};

use crate::fixtures::{link, TestExchange};

const A: UserId = 101;
const B: UserId = 102;
const C: UserId = 103;
const D: UserId = 104;

async fn like_single(fx: &TestExchange, user: UserId, expected: &str) {
    let view = fx.exchange.assignments().request_batch(user).await.unwrap();
    assert_eq!(view.links, vec![expected.to_string()]);
    assert_eq!(
        fx.complete_step(user).await,
        StepOutcome::BatchComplete { total: 1 }
    );
}

#[tokio::test]
async fn test_single_like_credits_both_sides() {
    let fx = TestExchange::new().await;
    let l = link(1);
    fx.submit(A, &l).await;

    let view = fx.exchange.assignments().request_batch(B).await.unwrap();
    assert_eq!(view.links, vec![l.clone()]);
    assert_eq!(view.progress, 0);

    fx.exchange.verification().record_click(B, &l).await.unwrap();
    fx.wait_step_delay();
    assert_eq!(
        fx.exchange.verification().confirm_step(B).await.unwrap(),
        StepOutcome::BatchComplete { total: 1 }
    );

    let users = fx.exchange.dal().users();
    assert_eq!(users.find(A).await.unwrap().unwrap().likes_received, 1);
    assert_eq!(users.find(B).await.unwrap().unwrap().likes_given, 1);
    assert!(fx
        .exchange
        .dal()
        .completions()
        .has_completed(B, &l)
        .await
        .unwrap());

    let queue = fx.exchange.queue().list().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].link, l);
}

#[tokio::test]
async fn test_third_credit_retires_and_owner_requeues() {
    let fx = TestExchange::new().await;
    let l = link(1);
    fx.submit(A, &l).await;

    like_single(&fx, B, &l).await;
    like_single(&fx, C, &l).await;
    assert_eq!(fx.exchange.queue().list().await.unwrap().len(), 1);

    like_single(&fx, D, &l).await;
    assert!(fx.exchange.queue().list().await.unwrap().is_empty());
    let pending = fx.exchange.dal().requeue().pending_for_owner(A).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].link, l);

    let owner = fx.exchange.dal().users().find(A).await.unwrap().unwrap();
    assert_eq!(owner.likes_received, 3);

    fx.clock.advance_secs(120);
    let view = fx.exchange.assignments().request_batch(A).await.unwrap();
    assert_eq!(view.requeued, vec![l.clone()]);

    let queue = fx.exchange.queue().list().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].link, l);
    assert_eq!(queue[0].submitted_at.into_inner(), fx.clock.now());
    assert!(fx
        .exchange
        .dal()
        .requeue()
        .pending_for_owner(A)
        .await
        .unwrap()
        .is_empty());

    // Earlier likers are never handed the requeued link again.
    for user in [B, C, D] {
        let view = fx.exchange.assignments().request_batch(user).await.unwrap();
        assert!(view.is_empty(), "user {} got {:?}", user, view.links);
    }
}

#[tokio::test]
async fn test_requeued_item_counts_credits_per_cycle() {
    let fx = TestExchange::new().await;
    let l = link(1);
    fx.submit(A, &l).await;
    for user in [B, C, D] {
        like_single(&fx, user, &l).await;
    }
    fx.exchange.assignments().request_batch(A).await.unwrap();
    assert_eq!(fx.exchange.queue().list().await.unwrap().len(), 1);

    // Old credits do not carry over: one fresh like does not retire it.
    like_single(&fx, 201, &l).await;
    assert_eq!(fx.exchange.queue().list().await.unwrap().len(), 1);

    // Two more in this cycle retire it a second time.
    like_single(&fx, 202, &l).await;
    like_single(&fx, 203, &l).await;
    assert!(fx.exchange.queue().list().await.unwrap().is_empty());

    let owner = fx.exchange.dal().users().find(A).await.unwrap().unwrap();
    assert_eq!(owner.likes_received, 6);
}

#[tokio::test]
async fn test_requeued_item_with_earlier_credits_is_never_evicted() {
    let fx = TestExchange::new().await;
    let l = link(1);
    fx.submit(A, &l).await;
    for user in [B, C, D] {
        like_single(&fx, user, &l).await;
    }
    fx.exchange.assignments().request_batch(A).await.unwrap();

    // No credit in the new cycle, but the link was liked before.
    fx.clock.advance_secs(25 * 3600);
    let ttl = std::time::Duration::from_secs(24 * 3600);
    assert!(fx.exchange.queue().preview_expired(ttl).await.unwrap().is_empty());
    assert!(fx.exchange.queue().evict_expired(ttl).await.unwrap().is_empty());

    let queue = fx.exchange.queue().list().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].link, l);
    assert_eq!(queue[0].owner_id, A);
}
