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

//! Background eviction and reminder loops.

use std::time::Duration;

use likeswap::{BackgroundServices, ExchangeConfig, Notice};
use tracing_test::traced_test;

use crate::fixtures::{link, TestExchange, ADMIN_ID};

fn fast_loops() -> likeswap::ExchangeConfigBuilder {
    ExchangeConfig::builder()
        .admin_id(Some(ADMIN_ID))
        .eviction_interval(Duration::from_millis(50))
        .reminder_interval(Duration::from_millis(50))
}

#[tokio::test]
#[traced_test]
async fn test_eviction_loop_notifies_owner() {
    let mut fx = TestExchange::with_config(fast_loops()).await;
    fx.submit(1, &link(1)).await;
    fx.clock.advance_secs(25 * 3600);

    let services = BackgroundServices::start(fx.exchange.clone());
    assert_eq!(
        fx.next_notice().await,
        Some(Notice::ItemEvicted {
            owner_id: 1,
            link: link(1),
        })
    );
    services.shutdown().await;

    assert!(fx.exchange.queue().list().await.unwrap().is_empty());
    assert!(logs_contain("Background services stopped"));
}

#[tokio::test]
async fn test_reminder_loop_runs_until_shutdown() {
    let mut fx = TestExchange::with_config(fast_loops()).await;
    for owner in 1..=3 {
        fx.submit(owner, &link(owner as u32)).await;
    }
    fx.exchange.register_user(9, None).await.unwrap();

    let services = BackgroundServices::start(fx.exchange.clone());
    assert_eq!(
        fx.next_notice().await,
        Some(Notice::TasksAvailable {
            user_id: 9,
            eligible: 3
        })
    );

    // Later ticks fall inside the cooldown, so nothing more is sent.
    tokio::time::sleep(Duration::from_millis(200)).await;
    services.shutdown().await;
    fx.assert_no_notice().await;
}
