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

use serde::Serialize;

use crate::due::is_due;
use crate::due::next_due_at;
use crate::types::item::VocabItem;
use crate::types::mastery::MasteryLevel;
use crate::types::timestamp::Timestamp;

/// Summary of a collection at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub new: usize,
    pub learning: usize,
    pub mastered: usize,
    pub unrecognized: usize,
    pub due_now: usize,
    /// When the next item that is not yet due becomes due.
    pub next_due_at: Option<Timestamp>,
}

impl Stats {
    pub fn compute(items: &[VocabItem], now: Timestamp) -> Self {
        let mut stats = Stats {
            total: items.len(),
            new: 0,
            learning: 0,
            mastered: 0,
            unrecognized: 0,
            due_now: 0,
            next_due_at: None,
        };
        for item in items {
            match item.mastery_level {
                MasteryLevel::New => stats.new += 1,
                MasteryLevel::Learning => stats.learning += 1,
                MasteryLevel::Mastered => stats.mastered += 1,
                MasteryLevel::Unrecognized(_) => stats.unrecognized += 1,
            }
            if is_due(item, now) {
                stats.due_now += 1;
            } else if let Some(at) = next_due_at(item) {
                stats.next_due_at = Some(match stats.next_due_at {
                    Some(current) => current.min(at),
                    None => at,
                });
            }
        }
        stats
    }
}
