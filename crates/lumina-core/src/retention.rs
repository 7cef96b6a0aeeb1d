// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Size-bounded append helpers shared by the in-memory stores.

/// Append `item` and drop the oldest entries so at most `limit` remain.
///
/// A `limit` of zero is treated as one: the newest item is always kept.
pub fn push_bounded<T>(items: &mut Vec<T>, item: T, limit: usize) {
    items.push(item);
    truncate_oldest(items, limit);
}

/// Drop the oldest entries so at most `limit` remain.
pub fn truncate_oldest<T>(items: &mut Vec<T>, limit: usize) {
    let limit = limit.max(1);
    if items.len() > limit {
        let excess = items.len() - limit;
        items.drain(..excess);
    }
}
