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

use std::path::Path;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use vocabflow_core::DictionaryData;
use vocabflow_core::ItemId;
use vocabflow_core::ItemStore;
use vocabflow_core::MasteryLevel;
use vocabflow_core::Timestamp;
use vocabflow_core::VocabItem;

use crate::error::Context;
use crate::error::Fallible;
use crate::error::fail;

/// Name of the database file in the collection directory.
pub const DB_FILE: &str = "vocabflow.db";

const SCHEMA: &str = "
create table if not exists items (
    seq integer primary key autoincrement,
    id text not null unique,
    word text not null,
    user_meaning text not null,
    context_sentence text not null,
    notes text not null,
    collocations text not null,
    dictionary_data text,
    created_at integer not null,
    last_reviewed integer not null,
    mastery_level text not null
);
create table if not exists quarantined_items (
    seq integer,
    id text,
    word text,
    user_meaning text,
    context_sentence text,
    notes text,
    collocations text,
    dictionary_data text,
    created_at integer,
    last_reviewed integer,
    mastery_level text,
    quarantined_at integer not null
);
";

const COLUMNS: &str = "id, word, user_meaning, context_sentence, notes, collocations, \
                       dictionary_data, created_at, last_reviewed, mastery_level";

/// SQLite-backed item store.
///
/// Items are listed newest first; replacing an item keeps its position.
pub struct Database {
    conn: Connection,
    recovery_warning: Option<String>,
}

impl Database {
    pub fn new(path: &Path) -> Fallible<Self> {
        let conn = Connection::open(path).context("failed to open database")?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory().context("failed to open database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Fallible<Self> {
        conn.execute_batch(SCHEMA)
            .context("failed to create database schema")?;
        let mut db = Self {
            conn,
            recovery_warning: None,
        };
        if let Err(reason) = db.load()? {
            db.quarantine(&reason)?;
        }
        Ok(db)
    }

    /// Set when the stored collection could not be read and was reset to
    /// empty on open.
    pub fn recovery_warning(&self) -> Option<&str> {
        self.recovery_warning.as_deref()
    }

    #[cfg(test)]
    pub fn quarantined_count(&self) -> Fallible<usize> {
        let count: i64 = self
            .conn
            .query_row("select count(*) from quarantined_items", [], |row| row.get(0))
            .context("failed to count quarantined items")?;
        Ok(count as usize)
    }

    /// Move every row out of the live table so the collection reads as
    /// empty. The rows are kept in `quarantined_items` for manual recovery.
    fn quarantine(&mut self, reason: &str) -> Fallible<()> {
        let now = Timestamp::now().as_millis();
        let tx = self
            .conn
            .transaction()
            .context("failed to start transaction")?;
        let moved = tx
            .execute(
                "insert into quarantined_items
                 select seq, id, word, user_meaning, context_sentence, notes, collocations,
                        dictionary_data, created_at, last_reviewed, mastery_level, ?1
                 from items",
                params![now],
            )
            .context("failed to quarantine items")?;
        tx.execute("delete from items", [])
            .context("failed to quarantine items")?;
        tx.commit().context("failed to quarantine items")?;
        let warning = format!(
            "stored vocabulary could not be read ({reason}); {moved} items were moved to \
             the quarantined_items table and the collection starts empty"
        );
        log::warn!("{warning}");
        self.recovery_warning = Some(warning);
        Ok(())
    }

    /// All items, or a description of the first row that could not be
    /// decoded.
    fn load(&self) -> Fallible<Result<Vec<VocabItem>, String>> {
        let sql = format!("select {COLUMNS} from items order by seq desc");
        let mut stmt = self.conn.prepare(&sql).context("failed to query items")?;
        let mut rows = stmt.query([]).context("failed to query items")?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().context("failed to query items")? {
            match decode_row(row) {
                Ok(item) => items.push(item),
                Err(reason) => return Ok(Err(reason)),
            }
        }
        Ok(Ok(items))
    }
}

impl ItemStore for Database {
    fn get_all(&self) -> Fallible<Vec<VocabItem>> {
        match self.load()? {
            Ok(items) => Ok(items),
            Err(reason) => fail(format!("stored vocabulary could not be read ({reason}).")),
        }
    }

    fn get(&self, id: &ItemId) -> Fallible<Option<VocabItem>> {
        let sql = format!("select {COLUMNS} from items where id = ?1");
        let mut stmt = self.conn.prepare(&sql).context("failed to query item")?;
        let row = stmt
            .query_row(params![id.as_str()], |row| Ok(decode_row(row)))
            .optional()
            .context("failed to query item")?;
        match row {
            None => Ok(None),
            Some(Ok(item)) => Ok(Some(item)),
            Some(Err(reason)) => fail(format!("item {id} could not be read ({reason}).")),
        }
    }

    fn upsert(&mut self, item: VocabItem) -> Fallible<()> {
        let collocations = serde_json::to_string(&item.collocations)?;
        let dictionary_data = match &item.dictionary_data {
            Some(data) => Some(serde_json::to_string(data)?),
            None => None,
        };
        let mastery_level: String = item.mastery_level.clone().into();
        self.conn
            .execute(
                "insert into items (id, word, user_meaning, context_sentence, notes, collocations,
                                    dictionary_data, created_at, last_reviewed, mastery_level)
                 values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 on conflict(id) do update set
                    word = excluded.word,
                    user_meaning = excluded.user_meaning,
                    context_sentence = excluded.context_sentence,
                    notes = excluded.notes,
                    collocations = excluded.collocations,
                    dictionary_data = excluded.dictionary_data,
                    created_at = excluded.created_at,
                    last_reviewed = excluded.last_reviewed,
                    mastery_level = excluded.mastery_level",
                params![
                    item.id.as_str(),
                    item.word,
                    item.user_meaning,
                    item.context_sentence,
                    item.notes,
                    collocations,
                    dictionary_data,
                    item.created_at.as_millis(),
                    item.last_reviewed.as_millis(),
                    mastery_level,
                ],
            )
            .context("failed to save item")?;
        Ok(())
    }

    fn delete(&mut self, id: &ItemId) -> Fallible<()> {
        self.conn
            .execute("delete from items where id = ?1", params![id.as_str()])
            .context("failed to delete item")?;
        Ok(())
    }
}

fn decode_row(row: &Row) -> Result<VocabItem, String> {
    let id: String = row.get("id").map_err(|e| e.to_string())?;
    let id = ItemId::try_from(id).map_err(|e| e.message().to_string())?;
    let collocations: String = row.get("collocations").map_err(|e| e.to_string())?;
    let collocations: Vec<String> = serde_json::from_str(&collocations)
        .map_err(|e| format!("item {id}: invalid collocations: {e}"))?;
    let dictionary_data: Option<String> =
        row.get("dictionary_data").map_err(|e| e.to_string())?;
    let dictionary_data: Option<DictionaryData> = match dictionary_data {
        Some(json) => Some(
            serde_json::from_str(&json)
                .map_err(|e| format!("item {id}: invalid dictionary data: {e}"))?,
        ),
        None => None,
    };
    let created_at = decode_timestamp(row, "created_at", &id)?;
    let last_reviewed = decode_timestamp(row, "last_reviewed", &id)?;
    let mastery_level: String = row.get("mastery_level").map_err(|e| e.to_string())?;
    Ok(VocabItem {
        word: row.get("word").map_err(|e| e.to_string())?,
        user_meaning: row.get("user_meaning").map_err(|e| e.to_string())?,
        context_sentence: row.get("context_sentence").map_err(|e| e.to_string())?,
        notes: row.get("notes").map_err(|e| e.to_string())?,
        id,
        collocations,
        dictionary_data,
        created_at,
        last_reviewed,
        mastery_level: MasteryLevel::from(mastery_level),
    })
}

fn decode_timestamp(row: &Row, column: &str, id: &ItemId) -> Result<Timestamp, String> {
    let millis: i64 = row.get(column).map_err(|e| e.to_string())?;
    Timestamp::from_millis(millis).ok_or_else(|| format!("item {id}: invalid {column}: {millis}"))
}
