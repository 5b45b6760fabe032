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

use crate::types::item::VocabItem;
use crate::types::mastery::MasteryLevel;

/// Which mastery levels to show in the library.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum MasteryFilter {
    #[default]
    All,
    Level(MasteryLevel),
}

/// Library search: a case-insensitive substring of the word or meaning,
/// plus a mastery filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    pub search: String,
    pub mastery: MasteryFilter,
}

impl Filter {
    pub fn matches(&self, item: &VocabItem) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || item.word.to_lowercase().contains(&needle)
            || item.user_meaning.to_lowercase().contains(&needle);
        let matches_mastery = match &self.mastery {
            MasteryFilter::All => true,
            MasteryFilter::Level(level) => &item.mastery_level == level,
        };
        matches_search && matches_mastery
    }

    pub fn apply(&self, items: Vec<VocabItem>) -> Vec<VocabItem> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}
