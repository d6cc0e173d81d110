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

//! Submitted link validation and click-tracking link construction.

use url::Url;

use crate::error::ValidationError;
use crate::models::UserId;

/// Longest link accepted, in bytes.
pub const MAX_LINK_LEN: usize = 2048;

/// Validates a submitted link and returns it trimmed.
///
/// The link must be an absolute http(s) URL whose host equals one of
/// `allowed_hosts` or is a subdomain of one (`www.tiktok.com` matches
/// `tiktok.com`). The returned string is otherwise left as submitted so that
/// deduplication compares exactly what users pasted.
pub fn validate_link(text: &str, allowed_hosts: &[String]) -> Result<String, ValidationError> {
    let link = text.trim();
    if link.is_empty() {
        return Err(ValidationError::EmptyLink);
    }
    if link.len() > MAX_LINK_LEN {
        return Err(ValidationError::LinkTooLong { max: MAX_LINK_LEN });
    }

    let url = Url::parse(link).map_err(|e| ValidationError::MalformedLink(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::UnsupportedScheme(url.scheme().to_string()));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ValidationError::MalformedLink("missing host".to_string()))?
        .to_ascii_lowercase();

    let allowed = allowed_hosts.iter().any(|allowed| {
        let allowed = allowed.trim().to_ascii_lowercase();
        !allowed.is_empty()
            && (host == allowed
                || host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.')))
    });
    if !allowed {
        return Err(ValidationError::HostNotAllowed { host });
    }

    Ok(link.to_string())
}

/// Wraps `link` so that following it goes through the click collector first.
///
/// Produces `<base>/click?user_id=<id>&video_link=<percent-encoded link>`.
pub fn tracking_link(base_url: &str, user_id: UserId, link: &str) -> String {
    format!(
        "{}/click?user_id={}&video_link={}",
        base_url.trim_end_matches('/'),
        user_id,
        urlencoding::encode(link)
    )
}

/// Rejects identifiers the chat platform never issues.
pub(crate) fn check_user_id(user_id: UserId) -> Result<(), ValidationError> {
    if user_id <= 0 {
        return Err(ValidationError::InvalidUserId(user_id));
    }
    Ok(())
}
