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

use crate::error::Fallible;
use crate::types::item::VocabItem;
use crate::types::item_id::ItemId;

/// The authoritative collection of vocabulary items.
///
/// `get_all` returns items in a stable order: most recently inserted first,
/// with replaced items keeping their position.
pub trait ItemStore {
    fn get_all(&self) -> Fallible<Vec<VocabItem>>;

    fn get(&self, id: &ItemId) -> Fallible<Option<VocabItem>>;

    /// Insert the item if its id is unseen, otherwise replace the stored
    /// item with the same id.
    fn upsert(&mut self, item: VocabItem) -> Fallible<()>;

    /// Remove the item. Deleting an unknown id is not an error.
    fn delete(&mut self, id: &ItemId) -> Fallible<()>;
}

/// An item store that lives in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Vec<VocabItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemStore for MemoryStore {
    fn get_all(&self) -> Fallible<Vec<VocabItem>> {
        Ok(self.items.clone())
    }

    fn get(&self, id: &ItemId) -> Fallible<Option<VocabItem>> {
        Ok(self.items.iter().find(|item| &item.id == id).cloned())
    }

    fn upsert(&mut self, item: VocabItem) -> Fallible<()> {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.insert(0, item),
        }
        Ok(())
    }

    fn delete(&mut self, id: &ItemId) -> Fallible<()> {
        self.items.retain(|item| &item.id != id);
        Ok(())
    }
}
