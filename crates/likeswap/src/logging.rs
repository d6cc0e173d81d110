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

//! Tracing subscriber setup for embedders.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a global fmt subscriber filtered by `RUST_LOG`.
///
/// `level` overrides the environment when given (e.g. `Some("debug")` for a
/// verbose flag); otherwise `RUST_LOG` is used, falling back to `info`.
/// Returns `false` if a global subscriber was already installed, which makes
/// repeated calls harmless.
pub fn init_logging(level: Option<&str>) -> bool {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_ok()
}
