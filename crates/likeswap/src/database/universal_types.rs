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

//! Timestamp wrapper shared by the domain models and the SQLite rows.
//!
//! SQLite has no native timestamp type, so timestamps are stored as TEXT.
//! The stored form is always RFC 3339 in UTC with exactly six fractional
//! digits and a `Z` suffix, which makes lexicographic order in SQL equal to
//! chronological order. Range filters such as "submitted before the TTL
//! cutoff" rely on that.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// UTC timestamp with a fixed-width text encoding for SQLite.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct UniversalTimestamp(pub DateTime<Utc>);

impl UniversalTimestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// Encodes for TEXT storage (`2025-03-01T12:00:00.000000Z`).
    pub fn to_db_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Decodes a TEXT column written by [`to_db_string`](Self::to_db_string).
    ///
    /// Any RFC 3339 offset is accepted and normalised to UTC.
    pub fn from_db_string(s: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s).map(|dt| UniversalTimestamp(dt.with_timezone(&Utc)))
    }

    /// Whole seconds elapsed from `self` until `later` (negative if `later` is earlier).
    pub fn seconds_until(&self, later: &UniversalTimestamp) -> i64 {
        (later.0 - self.0).num_seconds()
    }
}

impl fmt::Display for UniversalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

impl From<DateTime<Utc>> for UniversalTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<UniversalTimestamp> for DateTime<Utc> {
    fn from(wrapper: UniversalTimestamp) -> Self {
        wrapper.0
    }
}
