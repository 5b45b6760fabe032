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

use std::fs::read_to_string;
use std::fs::write;

use vocabflow_core::ItemStore;
use vocabflow_core::VocabItem;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;

/// Write every item as a JSON array, to `output` or stdout.
pub fn export_collection(directory: Option<String>, output: Option<String>) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let items = collection.db.get_all()?;
    let json = serde_json::to_string_pretty(&items)?;
    match output {
        Some(path) => {
            write(&path, json)?;
            log::debug!("Exported {} items to {path}", items.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Insert or replace every item in a JSON array. Nothing is written unless
/// every item is valid.
pub fn import_collection(directory: Option<String>, input: String) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let text = read_to_string(&input)?;
    let count = import_items(&mut collection.db, &text)?;
    log::debug!("Imported {count} items into {}", collection.directory.display());
    println!("Imported {count} items.");
    Ok(())
}

fn import_items<S: ItemStore>(store: &mut S, text: &str) -> Fallible<usize> {
    let items: Vec<VocabItem> = serde_json::from_str(text)?;
    for item in items.iter() {
        if item.word.trim().is_empty() {
            return fail(format!("item {} has an empty word.", item.id));
        }
        if item.last_reviewed < item.created_at {
            return fail(format!(
                "item {} was last reviewed before it was created.",
                item.id
            ));
        }
    }
    let count = items.len();
    // Reverse so that the first item in the file ends up first in the store.
    for item in items.into_iter().rev() {
        store.upsert(item)?;
    }
    Ok(count)
}
