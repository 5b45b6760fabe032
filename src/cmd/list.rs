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

use vocabflow_core::Filter;
use vocabflow_core::ItemStore;
use vocabflow_core::SessionMode;
use vocabflow_core::Timestamp;
use vocabflow_core::VocabItem;
use vocabflow_core::due::is_due;
use vocabflow_core::rng::TinyRng;
use vocabflow_core::session::compose_queue;

use crate::collection::Collection;
use crate::error::Fallible;

pub fn list_items(directory: Option<String>, filter: Filter) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let items = filter.apply(collection.db.get_all()?);
    if items.is_empty() {
        println!("No words found.");
        return Ok(());
    }
    let now = Timestamp::now();
    for item in items.iter() {
        println!("{}", render_line(item, now));
    }
    Ok(())
}

pub fn list_due(directory: Option<String>) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let now = Timestamp::now();
    let due = due_oldest_first(&collection.db.get_all()?, now)?;
    if due.is_empty() {
        println!("No items due for review.");
        return Ok(());
    }
    for item in due.iter() {
        println!("{}", render_line(item, now));
    }
    Ok(())
}

/// The queue a full review session would walk through right now.
fn due_oldest_first(items: &[VocabItem], now: Timestamp) -> Fallible<Vec<VocabItem>> {
    let mut rng = TinyRng::from_seed(0);
    Ok(compose_queue(items, now, SessionMode::Full, &mut rng)?)
}

fn render_line(item: &VocabItem, now: Timestamp) -> String {
    let marker = if is_due(item, now) { "*" } else { " " };
    format!(
        "{marker} {}  {:<9}  {}",
        item.id,
        item.mastery_level.as_str(),
        item.word
    )
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use vocabflow_core::MasteryLevel;

    use super::*;

    fn now() -> Timestamp {
        Timestamp::from_millis(1_750_000_000_000).unwrap()
    }

    fn item(word: &str, level: MasteryLevel, ago: Duration) -> Fallible<VocabItem> {
        let mut item = VocabItem::new(word, now() - Duration::days(30))?;
        item.last_reviewed = now() - ago;
        item.mastery_level = level;
        Ok(item)
    }

    #[test]
    fn test_due_oldest_first() -> Fallible<()> {
        let items = vec![
            item("recent", MasteryLevel::New, Duration::days(2))?,
            item("resting", MasteryLevel::Mastered, Duration::days(2))?,
            item("stale", MasteryLevel::Learning, Duration::days(10))?,
        ];
        let words: Vec<String> = due_oldest_first(&items, now())?
            .into_iter()
            .map(|i| i.word)
            .collect();
        assert_eq!(words, vec!["stale", "recent"]);
        Ok(())
    }

    #[test]
    fn test_due_matches_review_queue() -> Fallible<()> {
        let items = vec![
            item("first", MasteryLevel::New, Duration::days(4))?,
            item("second", MasteryLevel::Learning, Duration::days(4))?,
            item("oldest", MasteryLevel::Mastered, Duration::days(8))?,
        ];
        let mut rng = TinyRng::from_seed(42);
        let queue = compose_queue(&items, now(), SessionMode::Full, &mut rng)?;
        let due = due_oldest_first(&items, now())?;
        assert_eq!(due, queue);
        let words: Vec<&str> = due.iter().map(|i| i.word.as_str()).collect();
        assert_eq!(words, vec!["oldest", "first", "second"]);
        Ok(())
    }

    #[test]
    fn test_render_line() -> Fallible<()> {
        let due = item("stale", MasteryLevel::Learning, Duration::days(10))?;
        assert_eq!(
            render_line(&due, now()),
            format!("* {}  Learning   stale", due.id)
        );
        let resting = item("resting", MasteryLevel::Mastered, Duration::days(1))?;
        assert_eq!(
            render_line(&resting, now()),
            format!("  {}  Mastered   resting", resting.id)
        );
        Ok(())
    }
}
