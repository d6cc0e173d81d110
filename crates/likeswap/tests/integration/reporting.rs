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

//! Leaderboard, referral report, stats and tracking links.

use likeswap::{ExchangeConfig, ExchangeError, InviteCount, StepOutcome, ValidationError};

use crate::fixtures::{link, TestExchange, ADMIN_ID};

#[tokio::test]
async fn test_leaderboard_orders_by_given_then_registration() {
    let fx = TestExchange::new().await;
    for owner in 1..=3 {
        fx.submit(owner, &link(owner as u32)).await;
    }

    fx.exchange.assignments().request_batch(9).await.unwrap();
    for _ in 0..3 {
        fx.complete_step(9).await;
    }

    // 8 registers before 7, so it ranks ahead of 7 on a tie.
    fx.exchange.assignments().request_batch(8).await.unwrap();
    assert!(fx.complete_step(8).await.is_credited());
    fx.exchange.assignments().request_batch(7).await.unwrap();
    assert!(fx.complete_step(7).await.is_credited());

    let top = fx.exchange.reporting().top(Some(4)).await.unwrap();
    let rows: Vec<_> = top
        .iter()
        .map(|e| (e.rank, e.user_id, e.likes_given))
        .collect();
    assert_eq!(rows, vec![(1, 9, 3), (2, 8, 1), (3, 7, 1), (4, 1, 0)]);
    assert_eq!(top[3].likes_received, 3);

    // The default limit covers everyone here.
    assert_eq!(fx.exchange.reporting().top(None).await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_leaderboard_empty_store() {
    let fx = TestExchange::new().await;
    assert!(fx.exchange.reporting().top(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invite_report_counts_first_registration_only() {
    let fx = TestExchange::new().await;
    let exchange = &fx.exchange;

    assert!(exchange.register_user(10, None).await.unwrap());
    assert!(exchange.register_user(11, Some(10)).await.unwrap());
    assert!(exchange.register_user(12, Some(10)).await.unwrap());
    assert!(exchange.register_user(13, Some(11)).await.unwrap());

    // Self-referral is dropped and a repeat registration changes nothing.
    assert!(exchange.register_user(14, Some(14)).await.unwrap());
    assert!(!exchange.register_user(11, Some(12)).await.unwrap());

    let user = exchange.dal().users().find(14).await.unwrap().unwrap();
    assert_eq!(user.invited_by, None);
    let user = exchange.dal().users().find(11).await.unwrap().unwrap();
    assert_eq!(user.invited_by, Some(10));

    assert_eq!(
        exchange.reporting().invite_report().await.unwrap(),
        vec![
            InviteCount {
                inviter_id: 10,
                invited: 2
            },
            InviteCount {
                inviter_id: 11,
                invited: 1
            },
        ]
    );
}

#[tokio::test]
async fn test_register_rejects_invalid_inviter() {
    let fx = TestExchange::new().await;
    let err = fx.exchange.register_user(15, Some(-3)).await.unwrap_err();
    assert!(matches!(
        err,
        ExchangeError::Validation(ValidationError::InvalidUserId(-3))
    ));
    assert!(fx.exchange.dal().users().find(15).await.unwrap().is_none());
}

#[tokio::test]
async fn test_stats_counts_everything() {
    let fx = TestExchange::new().await;
    fx.submit(1, &link(1)).await;
    fx.submit(2, &link(2)).await;
    fx.exchange.register_user(3, Some(1)).await.unwrap();

    fx.exchange.assignments().request_batch(3).await.unwrap();
    assert!(matches!(
        fx.complete_step(3).await,
        StepOutcome::StepCredited { .. }
    ));

    let stats = fx.exchange.admin().stats().await.unwrap();
    assert_eq!(stats.users, 3);
    assert_eq!(stats.queued_items, 2);
    assert_eq!(stats.active_batches, 1);
    assert_eq!(stats.completions, 1);
    assert_eq!(stats.top[0].user_id, 3);
    assert_eq!(
        stats.invites,
        vec![InviteCount {
            inviter_id: 1,
            invited: 1
        }]
    );
}

#[tokio::test]
async fn test_tracking_link_uses_configured_collector() {
    let fx = TestExchange::with_config(
        ExchangeConfig::builder()
            .admin_id(Some(ADMIN_ID))
            .click_base_url(Some("https://clicks.example.com/".to_string())),
    )
    .await;

    let wrapped = fx
        .exchange
        .tracking_link(5, "https://www.tiktok.com/@a/video/1")
        .unwrap();
    assert_eq!(
        wrapped,
        "https://clicks.example.com/click?user_id=5&video_link=https%3A%2F%2Fwww.tiktok.com%2F%40a%2Fvideo%2F1"
    );

    let plain = TestExchange::new().await;
    assert!(plain.exchange.tracking_link(5, &link(1)).is_none());
}
