// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Deciding which items are due for review.

use chrono::Duration;

use crate::types::item::VocabItem;
use crate::types::mastery::MasteryLevel;
use crate::types::timestamp::Timestamp;

/// How long an item rests after a review before it is due again. `None`
/// for unrecognized levels, which are always due.
pub fn review_threshold(level: &MasteryLevel) -> Option<Duration> {
    match level {
        MasteryLevel::New => Some(Duration::days(1)),
        MasteryLevel::Learning => Some(Duration::days(3)),
        MasteryLevel::Mastered => Some(Duration::days(7)),
        MasteryLevel::Unrecognized(_) => None,
    }
}

/// An item is due once the time since its last review strictly exceeds the
/// threshold for its level.
pub fn is_due(item: &VocabItem, now: Timestamp) -> bool {
    match review_threshold(&item.mastery_level) {
        Some(threshold) => now.since(item.last_reviewed) > threshold,
        None => true,
    }
}

/// The due subset of `items`, in the original order.
pub fn due_items<'a, I>(items: I, now: Timestamp) -> Vec<VocabItem>
where
    I: IntoIterator<Item = &'a VocabItem>,
{
    items
        .into_iter()
        .filter(|item| is_due(item, now))
        .cloned()
        .collect()
}

/// The boundary after which the item becomes due. At exactly this instant
/// the item is still not due. `None` when the boundary falls outside the
/// representable range.
pub fn next_due_at(item: &VocabItem) -> Option<Timestamp> {
    review_threshold(&item.mastery_level)
        .and_then(|threshold| item.last_reviewed.checked_add(threshold))
}
