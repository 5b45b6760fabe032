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

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::transition::Outcome;
use crate::transition::transition;
use crate::types::item_id::ItemId;
use crate::types::mastery::MasteryLevel;
use crate::types::timestamp::Timestamp;

/// One memorized unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabItem {
    pub id: ItemId,
    pub word: String,
    #[serde(default)]
    pub user_meaning: String,
    #[serde(default)]
    pub context_sentence: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub collocations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_data: Option<DictionaryData>,
    pub created_at: Timestamp,
    pub last_reviewed: Timestamp,
    pub mastery_level: MasteryLevel,
}

/// Cached result of a dictionary lookup.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryData {
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub meanings: Vec<DictionaryMeaning>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryMeaning {
    pub part_of_speech: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// A change to the content fields of an item. Fields left as `None` are
/// kept. Scheduling fields cannot be edited.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentEdit {
    pub word: Option<String>,
    pub user_meaning: Option<String>,
    pub context_sentence: Option<String>,
    pub notes: Option<String>,
    pub collocations: Option<Vec<String>>,
}

impl VocabItem {
    /// A fresh item, as created by the enrichment workflow.
    pub fn new(word: impl Into<String>, created_at: Timestamp) -> Fallible<Self> {
        let word = normalize_word(word.into())?;
        Ok(Self {
            id: ItemId::generate(),
            word,
            user_meaning: String::new(),
            context_sentence: String::new(),
            notes: String::new(),
            collocations: Vec::new(),
            dictionary_data: None,
            created_at,
            last_reviewed: created_at,
            mastery_level: MasteryLevel::New,
        })
    }

    /// Apply a review outcome recorded at `reviewed_at`, returning the new
    /// mastery level.
    ///
    /// `last_reviewed` never goes below `created_at`, even if the clock
    /// disagrees.
    pub fn apply_review(&mut self, outcome: Outcome, reviewed_at: Timestamp) -> MasteryLevel {
        let next = transition(&self.mastery_level, outcome);
        self.mastery_level = next.clone();
        self.last_reviewed = reviewed_at.max(self.created_at);
        next
    }

    pub fn apply_edit(&mut self, edit: ContentEdit) -> Fallible<()> {
        let ContentEdit {
            word,
            user_meaning,
            context_sentence,
            notes,
            collocations,
        } = edit;
        if let Some(word) = word {
            self.word = normalize_word(word)?;
        }
        if let Some(user_meaning) = user_meaning {
            self.user_meaning = user_meaning;
        }
        if let Some(context_sentence) = context_sentence {
            self.context_sentence = context_sentence;
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        if let Some(collocations) = collocations {
            self.collocations = collocations;
        }
        Ok(())
    }
}

fn normalize_word(word: String) -> Fallible<String> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return fail("word must not be empty");
    }
    Ok(trimmed.to_string())
}
