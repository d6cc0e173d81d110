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

use likeswap::{ExchangeConfig, UserId};
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::duration::parse_duration;

/// Contents of `likeswap.toml`. Every key is optional.
///
/// ```toml
/// [database]
/// url = "${LIKESWAP_DB:-likeswap.db}"
///
/// [exchange]
/// item_ttl = "24h"
/// eviction_interval = "10m"
/// admin_id = 1000
/// allowed_hosts = ["tiktok.com"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LikeswapConfig {
    pub database: DatabaseConfig,
    pub exchange: ExchangeSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Engine settings. Durations are strings such as `"24h"` or `"1d12h"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeSettings {
    pub item_ttl: Option<String>,
    pub eviction_interval: Option<String>,
    pub reminder_interval: Option<String>,
    pub notify_cooldown: Option<String>,
    pub reminder_min_eligible: Option<usize>,
    pub leaderboard_limit: Option<usize>,
    pub allowed_hosts: Option<Vec<String>>,
    pub admin_id: Option<UserId>,
    pub click_base_url: Option<String>,
}

fn duration_field(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<std::time::Duration>, ConfigError> {
    value
        .map(|text| {
            parse_duration(text).map_err(|e| ConfigError::InvalidDuration {
                field,
                message: e.to_string(),
            })
        })
        .transpose()
}

impl LikeswapConfig {
    /// Builds and validates the engine configuration, keeping the library
    /// defaults for every key the file leaves out.
    pub fn exchange_config(&self) -> Result<ExchangeConfig, ConfigError> {
        let settings = &self.exchange;
        let mut builder = ExchangeConfig::builder();

        if let Some(ttl) = duration_field("item_ttl", settings.item_ttl.as_deref())? {
            builder = builder.item_ttl(ttl);
        }
        if let Some(interval) =
            duration_field("eviction_interval", settings.eviction_interval.as_deref())?
        {
            builder = builder.eviction_interval(interval);
        }
        if let Some(interval) =
            duration_field("reminder_interval", settings.reminder_interval.as_deref())?
        {
            builder = builder.reminder_interval(interval);
        }
        if let Some(cooldown) =
            duration_field("notify_cooldown", settings.notify_cooldown.as_deref())?
        {
            builder = builder.notify_cooldown(cooldown);
        }
        if let Some(min) = settings.reminder_min_eligible {
            builder = builder.reminder_min_eligible(min);
        }
        if let Some(limit) = settings.leaderboard_limit {
            builder = builder.leaderboard_limit(limit);
        }
        if let Some(hosts) = &settings.allowed_hosts {
            builder = builder.allowed_hosts(hosts.iter().cloned());
        }
        builder = builder
            .admin_id(settings.admin_id)
            .click_base_url(settings.click_base_url.clone());

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}
