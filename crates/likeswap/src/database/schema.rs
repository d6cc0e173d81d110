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

//! Diesel table definitions matching `migrations/sqlite`.
//!
//! Timestamps are TEXT in the fixed-width format produced by
//! [`UniversalTimestamp::to_db_string`](super::universal_types::UniversalTimestamp::to_db_string).

diesel::table! {
    users (user_id) {
        user_id -> BigInt,
        likes_given -> BigInt,
        likes_received -> BigInt,
        created_at -> Text,
        invited_by -> Nullable<BigInt>,
        banned -> Bool,
        warnings -> Integer,
    }
}

diesel::table! {
    items (id) {
        id -> BigInt,
        owner_id -> BigInt,
        link -> Text,
        submitted_at -> Text,
    }
}

diesel::table! {
    task_batches (user_id) {
        user_id -> BigInt,
        item_links -> Text,
        batch_started_at -> Text,
        progress -> Integer,
    }
}

diesel::table! {
    requeue_placeholders (owner_id, link) {
        owner_id -> BigInt,
        link -> Text,
        retired_at -> Text,
    }
}

diesel::table! {
    completion_records (user_id, item_link) {
        user_id -> BigInt,
        item_link -> Text,
        credited_at -> Text,
    }
}

diesel::table! {
    click_records (user_id, item_link) {
        user_id -> BigInt,
        item_link -> Text,
        clicked_at -> Text,
    }
}

diesel::table! {
    notify_records (user_id) {
        user_id -> BigInt,
        last_notified_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    items,
    task_batches,
    requeue_placeholders,
    completion_records,
    click_records,
    notify_records,
);
