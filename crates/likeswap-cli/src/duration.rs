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

//! Human duration strings used on the command line and in the config file.

use anyhow::{anyhow, Context, Result};
use chrono::Duration;

/// Parses a duration string like "24h", "10m", "1d12h" or "1h30m".
///
/// Supported units:
/// - `d` - days
/// - `h` - hours
/// - `m` - minutes
/// - `s` - seconds
pub fn parse_duration(s: &str) -> Result<std::time::Duration> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err(anyhow!("Duration string cannot be empty"));
    }

    let mut total = Duration::zero();
    let mut digits = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return Err(anyhow!(
                "Invalid duration format: expected number before '{}'",
                c
            ));
        }

        let num: i64 = digits
            .parse()
            .with_context(|| format!("Invalid number in duration: {}", digits))?;
        digits.clear();

        let part = match c {
            'd' => Duration::try_days(num),
            'h' => Duration::try_hours(num),
            'm' => Duration::try_minutes(num),
            's' => Duration::try_seconds(num),
            _ => return Err(anyhow!("Unknown duration unit: '{}'. Use d, h, m, or s", c)),
        }
        .ok_or_else(|| anyhow!("Duration '{}' is too large", s))?;

        total = total
            .checked_add(&part)
            .ok_or_else(|| anyhow!("Duration '{}' is too large", s))?;
    }

    if !digits.is_empty() {
        return Err(anyhow!(
            "Duration '{}' is missing a unit. Use d (days), h (hours), m (minutes), or s (seconds)",
            s
        ));
    }

    if total == Duration::zero() {
        return Err(anyhow!("Duration must be greater than zero"));
    }

    total
        .to_std()
        .with_context(|| format!("Duration '{}' is out of range", s))
}
