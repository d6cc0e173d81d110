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

//! Configuration for the exchange engine and its background loops.
//!
//! Batch size, credit threshold, warning limit and step delay are fixed
//! policy (see the crate-level constants); everything here is deployment
//! tuning.

use std::time::Duration;

use crate::error::{ConfigError, ValidationError};
use crate::models::UserId;

/// Engine configuration.
///
/// # Construction
///
/// ```rust,ignore
/// let config = ExchangeConfig::builder()
///     .item_ttl(Duration::from_secs(12 * 3600))
///     .admin_id(Some(1001))
///     .build();
/// config.validate()?;
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ExchangeConfig {
    item_ttl: Duration,
    eviction_interval: Duration,
    reminder_interval: Duration,
    notify_cooldown: Duration,
    reminder_min_eligible: usize,
    leaderboard_limit: usize,
    allowed_hosts: Vec<String>,
    admin_id: Option<UserId>,
    click_base_url: Option<String>,
}

impl ExchangeConfig {
    /// Creates a new configuration builder with default values.
    pub fn builder() -> ExchangeConfigBuilder {
        ExchangeConfigBuilder::default()
    }

    /// Age after which an uncredited item is evicted from the queue.
    pub fn item_ttl(&self) -> Duration {
        self.item_ttl
    }

    /// How often the eviction loop runs.
    pub fn eviction_interval(&self) -> Duration {
        self.eviction_interval
    }

    /// How often the reminder loop runs.
    pub fn reminder_interval(&self) -> Duration {
        self.reminder_interval
    }

    /// Minimum time between two reminders to the same user.
    pub fn notify_cooldown(&self) -> Duration {
        self.notify_cooldown
    }

    /// Eligible items a user needs before a reminder is worth sending.
    pub fn reminder_min_eligible(&self) -> usize {
        self.reminder_min_eligible
    }

    /// Number of rows in the leaderboard.
    pub fn leaderboard_limit(&self) -> usize {
        self.leaderboard_limit
    }

    /// Hosts accepted in submitted links. Subdomains are accepted too.
    pub fn allowed_hosts(&self) -> &[String] {
        &self.allowed_hosts
    }

    /// The single privileged identity, if any.
    pub fn admin_id(&self) -> Option<UserId> {
        self.admin_id
    }

    /// Base URL of the click collector used to wrap outbound links.
    pub fn click_base_url(&self) -> Option<&str> {
        self.click_base_url.as_deref()
    }

    /// Checks the scheduling constraints between the configured durations.
    ///
    /// The eviction loop must run at least ten times per TTL, and the
    /// per-user reminder cooldown must span at least ten reminder cycles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("item_ttl", self.item_ttl),
            ("eviction_interval", self.eviction_interval),
            ("reminder_interval", self.reminder_interval),
            ("notify_cooldown", self.notify_cooldown),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration { name });
            }
        }

        if self.eviction_interval.saturating_mul(10) > self.item_ttl {
            return Err(ConfigError::EvictionIntervalTooLong {
                interval_secs: self.eviction_interval.as_secs(),
                ttl_secs: self.item_ttl.as_secs(),
            });
        }

        if self.notify_cooldown < self.reminder_interval.saturating_mul(10) {
            return Err(ConfigError::NotifyCooldownTooShort {
                cooldown_secs: self.notify_cooldown.as_secs(),
                interval_secs: self.reminder_interval.as_secs(),
            });
        }

        if self.allowed_hosts.iter().all(|h| h.trim().is_empty()) {
            return Err(ConfigError::NoAllowedHosts);
        }

        if let Some(base) = &self.click_base_url {
            let parsed = url::Url::parse(base)
                .map_err(|e| ValidationError::InvalidTrackerUrl(format!("{}: {}", base, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ValidationError::InvalidTrackerUrl(base.clone()).into());
            }
        }

        Ok(())
    }
}

/// Builder for [`ExchangeConfig`].
#[derive(Debug, Clone)]
pub struct ExchangeConfigBuilder {
    config: ExchangeConfig,
}

impl Default for ExchangeConfigBuilder {
    fn default() -> Self {
        Self {
            config: ExchangeConfig {
                item_ttl: Duration::from_secs(24 * 3600),
                eviction_interval: Duration::from_secs(600),
                reminder_interval: Duration::from_secs(60),
                notify_cooldown: Duration::from_secs(3600),
                reminder_min_eligible: 3,
                leaderboard_limit: 20,
                allowed_hosts: vec!["tiktok.com".to_string()],
                admin_id: None,
                click_base_url: None,
            },
        }
    }
}

impl ExchangeConfigBuilder {
    /// Sets the item TTL.
    pub fn item_ttl(mut self, value: Duration) -> Self {
        self.config.item_ttl = value;
        self
    }

    /// Sets the eviction loop period.
    pub fn eviction_interval(mut self, value: Duration) -> Self {
        self.config.eviction_interval = value;
        self
    }

    /// Sets the reminder loop period.
    pub fn reminder_interval(mut self, value: Duration) -> Self {
        self.config.reminder_interval = value;
        self
    }

    /// Sets the per-user reminder cooldown.
    pub fn notify_cooldown(mut self, value: Duration) -> Self {
        self.config.notify_cooldown = value;
        self
    }

    pub fn reminder_min_eligible(mut self, value: usize) -> Self {
        self.config.reminder_min_eligible = value;
        self
    }

    pub fn leaderboard_limit(mut self, value: usize) -> Self {
        self.config.leaderboard_limit = value;
        self
    }

    /// Replaces the accepted link hosts. Entries are lowercased.
    pub fn allowed_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_hosts = hosts
            .into_iter()
            .map(|h| h.into().trim().to_ascii_lowercase())
            .collect();
        self
    }

    /// Sets the privileged identity.
    pub fn admin_id(mut self, value: Option<UserId>) -> Self {
        self.config.admin_id = value;
        self
    }

    /// Sets the click collector base URL. A trailing slash is dropped.
    pub fn click_base_url(mut self, value: Option<String>) -> Self {
        self.config.click_base_url = value.map(|v| v.trim_end_matches('/').to_string());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ExchangeConfig {
        self.config
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        ExchangeConfigBuilder::default().build()
    }
}
