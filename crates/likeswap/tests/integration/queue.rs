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

//! Submission limits, deduplication, eviction and requeue.

use std::time::Duration;

use likeswap::{Clock, ExchangeError, StepOutcome, SubmitOutcome, ValidationError};

use crate::fixtures::{link, TestExchange, ADMIN_ID};

const DAY: Duration = Duration::from_secs(24 * 3600);

#[tokio::test]
async fn test_duplicate_submission_returns_already_exists() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;

    let again = fx.exchange.queue().submit(1, &link(1), false).await.unwrap();
    assert_eq!(again, SubmitOutcome::AlreadyExists);

    // Same link from someone else is still a duplicate.
    let other = fx.exchange.queue().submit(2, &link(1), false).await.unwrap();
    assert_eq!(other, SubmitOutcome::AlreadyExists);

    assert_eq!(fx.exchange.queue().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_item_refused_unless_privileged() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;

    let second = fx.exchange.queue().submit(1, &link(2), false).await.unwrap();
    assert_eq!(second, SubmitOutcome::LimitReached);

    for n in 10..15 {
        let outcome = fx
            .exchange
            .queue()
            .submit(ADMIN_ID, &link(n), true)
            .await
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::Accepted(_)));
    }

    let queue = fx.exchange.queue().list().await.unwrap();
    assert_eq!(queue.len(), 6);
    assert_eq!(queue.iter().filter(|i| i.owner_id == ADMIN_ID).count(), 5);
}

#[tokio::test]
async fn test_accepted_item_carries_trimmed_link_and_clock_time() {
    let fx = TestExchange::new().await;
    let padded = format!("  {}\n", link(7));

    let outcome = fx.exchange.queue().submit(7, &padded, false).await.unwrap();
    let SubmitOutcome::Accepted(item) = outcome else {
        panic!("expected acceptance, got {:?}", outcome);
    };
    assert_eq!(item.link, link(7));
    assert_eq!(item.owner_id, 7);
    assert_eq!(item.submitted_at.into_inner(), fx.clock.now());
}

#[tokio::test]
async fn test_invalid_link_rejected_before_any_write() {
    let fx = TestExchange::new().await;

    let err = fx
        .exchange
        .queue()
        .submit(5, "https://www.youtube.com/watch?v=abc", false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExchangeError::Validation(ValidationError::HostNotAllowed { .. })
    ));

    let err = fx.exchange.queue().submit(0, &link(1), false).await.unwrap_err();
    assert!(matches!(
        err,
        ExchangeError::Validation(ValidationError::InvalidUserId(0))
    ));

    let stats = fx.exchange.admin().stats().await.unwrap();
    assert_eq!(stats.users, 0);
    assert_eq!(stats.queued_items, 0);
}

#[tokio::test]
async fn test_eviction_spares_credited_and_fresh_items() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;
    fx.submit(2, &link(2)).await;

    let batch = fx.exchange.assignments().request_batch(3).await.unwrap();
    assert_eq!(batch.links, vec![link(1), link(2)]);
    assert!(matches!(
        fx.complete_step(3).await,
        StepOutcome::StepCredited { .. }
    ));

    fx.clock.advance_secs(25 * 3600);
    fx.submit(4, &link(4)).await;

    let preview = fx.exchange.queue().preview_expired(DAY).await.unwrap();
    assert_eq!(preview.len(), 1);
    assert_eq!(fx.exchange.queue().list().await.unwrap().len(), 3);

    let evicted = fx.exchange.queue().evict_expired(DAY).await.unwrap();
    assert_eq!(evicted.len(), 1);
    assert_eq!(evicted[0].link, link(2));
    assert_eq!(evicted[0].owner_id, 2);

    let remaining: Vec<_> = fx
        .exchange
        .queue()
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.link)
        .collect();
    assert_eq!(remaining, vec![link(1), link(4)]);

    // Much later only the uncredited newcomer goes; the credited item stays.
    fx.clock.advance_secs(10 * 24 * 3600);
    let evicted = fx.exchange.queue().evict_expired(DAY).await.unwrap();
    assert_eq!(evicted.len(), 1);
    assert_eq!(evicted[0].link, link(4));
}

#[tokio::test]
async fn test_item_younger_than_ttl_is_kept() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;

    fx.clock.advance_secs(24 * 3600 - 1);
    assert!(fx.exchange.queue().evict_expired(DAY).await.unwrap().is_empty());

    fx.clock.advance_secs(2);
    assert_eq!(fx.exchange.queue().evict_expired(DAY).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_retired_item_returns_on_owner_request() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;

    assert!(fx
        .exchange
        .queue()
        .retire_and_requeue(&link(1), 1)
        .await
        .unwrap());
    assert!(fx.exchange.queue().list().await.unwrap().is_empty());

    let pending = fx.exchange.dal().requeue().pending_for_owner(1).await.unwrap();
    assert_eq!(pending.len(), 1);

    fx.clock.advance_secs(60);
    let view = fx.exchange.assignments().request_batch(1).await.unwrap();
    assert!(view.links.is_empty());
    assert_eq!(view.requeued, vec![link(1)]);

    let queue = fx.exchange.queue().list().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].submitted_at.into_inner(), fx.clock.now());
    assert!(fx
        .exchange
        .dal()
        .requeue()
        .pending_for_owner(1)
        .await
        .unwrap()
        .is_empty());
}
