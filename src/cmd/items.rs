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

use std::fmt::Write;

use vocabflow_core::ContentEdit;
use vocabflow_core::ItemId;
use vocabflow_core::ItemStore;
use vocabflow_core::Timestamp;
use vocabflow_core::VocabItem;
use vocabflow_core::due::is_due;
use vocabflow_core::due::next_due_at;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;

/// Content of a new item, as entered by the user.
#[derive(Debug, Default)]
pub struct NewItem {
    pub word: String,
    pub meaning: Option<String>,
    pub context: Option<String>,
    pub notes: Option<String>,
    pub collocations: Vec<String>,
}

pub fn add_item(directory: Option<String>, new: NewItem) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let item = create_item(&mut collection.db, new, Timestamp::now())?;
    log::debug!("Added item {} ({})", item.id, item.word);
    println!("{}", item.id);
    Ok(())
}

pub fn edit_item(directory: Option<String>, id: ItemId, edit: ContentEdit) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let item = update_item(&mut collection.db, &id, edit)?;
    print!("{}", render_item(&item, Timestamp::now()));
    Ok(())
}

pub fn delete_item(directory: Option<String>, id: ItemId) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let item = find_item(&collection.db, &id)?;
    collection.db.delete(&id)?;
    println!("Deleted \"{}\".", item.word);
    Ok(())
}

pub fn show_item(directory: Option<String>, id: ItemId) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let item = find_item(&collection.db, &id)?;
    print!("{}", render_item(&item, Timestamp::now()));
    Ok(())
}

fn create_item<S: ItemStore>(store: &mut S, new: NewItem, now: Timestamp) -> Fallible<VocabItem> {
    let NewItem {
        word,
        meaning,
        context,
        notes,
        collocations,
    } = new;
    let mut item = VocabItem::new(word, now)?;
    item.user_meaning = meaning.unwrap_or_default();
    item.context_sentence = context.unwrap_or_default();
    item.notes = notes.unwrap_or_default();
    item.collocations = collocations;
    store.upsert(item.clone())?;
    Ok(item)
}

fn update_item<S: ItemStore>(store: &mut S, id: &ItemId, edit: ContentEdit) -> Fallible<VocabItem> {
    let mut item = find_item(store, id)?;
    item.apply_edit(edit)?;
    store.upsert(item.clone())?;
    Ok(item)
}

fn find_item<S: ItemStore>(store: &S, id: &ItemId) -> Fallible<VocabItem> {
    match store.get(id)? {
        Some(item) => Ok(item),
        None => fail(format!("no item with id {id}.")),
    }
}

/// Every field of an item, plus when it is next due.
pub fn render_item(item: &VocabItem, now: Timestamp) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", item.word);
    let _ = writeln!(out, "  id:            {}", item.id);
    let _ = writeln!(out, "  mastery:       {}", item.mastery_level);
    if !item.user_meaning.is_empty() {
        let _ = writeln!(out, "  meaning:       {}", item.user_meaning);
    }
    if !item.context_sentence.is_empty() {
        let _ = writeln!(out, "  context:       {}", item.context_sentence);
    }
    if !item.notes.is_empty() {
        let _ = writeln!(out, "  notes:         {}", item.notes);
    }
    if !item.collocations.is_empty() {
        let _ = writeln!(out, "  collocations:  {}", item.collocations.join("; "));
    }
    if let Some(dict) = &item.dictionary_data {
        if !dict.phonetic.is_empty() {
            let _ = writeln!(out, "  phonetic:      {}", dict.phonetic);
        }
        for meaning in &dict.meanings {
            let _ = writeln!(out, "  {}: {}", meaning.part_of_speech, meaning.definition);
        }
    }
    let _ = writeln!(out, "  added:         {}", item.created_at);
    let _ = writeln!(out, "  last reviewed: {}", item.last_reviewed);
    let due = if is_due(item, now) {
        "now".to_string()
    } else {
        match next_due_at(item) {
            Some(at) => format!("after {at}"),
            None => "never".to_string(),
        }
    };
    let _ = writeln!(out, "  due:           {due}");
    out
}
