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

use chrono::Duration;
use tempfile::tempdir;
use vocabflow_core::ItemStore;
use vocabflow_core::MasteryLevel;
use vocabflow_core::Timestamp;
use vocabflow_core::VocabItem;

use crate::db::DB_FILE;
use crate::db::Database;
use crate::error::Fallible;

/// Create a temporary directory that outlives the test, and return its
/// path.
pub fn create_tmp_directory() -> Fallible<String> {
    let dir = tempdir()?.keep().canonicalize()?;
    Ok(dir.display().to_string())
}

/// An item at `level`, last reviewed `ago` before now.
pub fn reviewed_item(word: &str, level: MasteryLevel, ago: Duration) -> Fallible<VocabItem> {
    let last_reviewed = Timestamp::now() - ago;
    let mut item = VocabItem::new(word, last_reviewed - Duration::days(1))?;
    item.user_meaning = format!("meaning of {word}");
    item.context_sentence = format!("A sentence using {word}.");
    item.last_reviewed = last_reviewed;
    item.mastery_level = level;
    Ok(item)
}

/// Create a temporary collection holding `items`.
pub fn create_tmp_collection(items: &[VocabItem]) -> Fallible<String> {
    let dir = create_tmp_directory()?;
    let mut db = Database::new(&std::path::Path::new(&dir).join(DB_FILE))?;
    for item in items.iter().rev() {
        db.upsert(item.clone())?;
    }
    Ok(dir)
}
