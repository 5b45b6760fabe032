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

//! Composing and driving review sessions.
//!
//! A session is a snapshot of due items taken when it is composed. Every
//! outcome is written to the store before the session advances; dropping a
//! session abandons the remaining items without touching recorded ones.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::clock::Clock;
use crate::due::due_items;
use crate::error::ErrorReport;
use crate::rng::TinyRng;
use crate::rng::sample;
use crate::store::ItemStore;
use crate::transition::Outcome;
use crate::types::item::VocabItem;
use crate::types::item_id::ItemId;
use crate::types::mastery::MasteryLevel;
use crate::types::timestamp::Timestamp;

/// Size of the daily quota when none is configured.
pub const DEFAULT_QUOTA: usize = 3;

/// How the queue of a session is chosen from the due set.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionMode {
    /// Every due item, least recently reviewed first.
    Full,
    /// A random subset of at most this many due items.
    Quota(usize),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    /// The current item's answer is hidden.
    AwaitingReveal,
    /// The answer is shown and an outcome can be recorded.
    Revealed,
    /// No items left.
    Complete,
}

#[derive(Debug, PartialEq)]
pub enum ComposeError {
    /// Quota mode was requested but nothing is due.
    Unavailable,
    /// Quota mode with a quota of zero.
    ZeroQuota,
    /// The store could not be read.
    Store(ErrorReport),
}

impl Display for ComposeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ComposeError::Unavailable => write!(f, "no items are due for review"),
            ComposeError::ZeroQuota => write!(f, "the review quota must be at least one"),
            ComposeError::Store(e) => write!(f, "failed to read items: {}", e.message()),
        }
    }
}

impl Error for ComposeError {}

impl From<ComposeError> for ErrorReport {
    fn from(value: ComposeError) -> Self {
        ErrorReport::new(value.to_string())
    }
}

#[derive(Debug, PartialEq)]
pub enum SessionError {
    /// An outcome was recorded before the answer was revealed.
    NotRevealed,
    /// The session has no current item.
    Complete,
    /// The outcome could not be persisted. The session did not advance, so
    /// the same call can be retried.
    Store(ErrorReport),
}

impl SessionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Store(_))
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NotRevealed => write!(f, "the answer has not been revealed"),
            SessionError::Complete => write!(f, "the session is complete"),
            SessionError::Store(e) => write!(f, "failed to save review: {}", e.message()),
        }
    }
}

impl Error for SessionError {}

impl From<SessionError> for ErrorReport {
    fn from(value: SessionError) -> Self {
        ErrorReport::new(value.to_string())
    }
}

/// An outcome recorded during a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Review {
    pub item_id: ItemId,
    pub word: String,
    pub outcome: Outcome,
    pub previous: MasteryLevel,
    pub next: MasteryLevel,
    pub reviewed_at: Timestamp,
    /// False when the item had been deleted from the store in the meantime,
    /// in which case nothing was written.
    pub persisted: bool,
}

#[derive(Debug)]
pub struct ReviewSession {
    queue: Vec<VocabItem>,
    cursor: usize,
    state: SessionState,
    reviews: Vec<Review>,
    started_at: Timestamp,
}

/// Choose and order the items of a session from the whole collection.
pub fn compose_queue(
    items: &[VocabItem],
    now: Timestamp,
    mode: SessionMode,
    rng: &mut TinyRng,
) -> Result<Vec<VocabItem>, ComposeError> {
    let due: Vec<VocabItem> = due_items(items, now);
    match mode {
        SessionMode::Full => {
            let mut due = due;
            // Stable, so equal timestamps keep store order.
            due.sort_by_key(|item| item.last_reviewed);
            Ok(due)
        }
        SessionMode::Quota(0) => Err(ComposeError::ZeroQuota),
        SessionMode::Quota(k) => {
            if due.is_empty() {
                return Err(ComposeError::Unavailable);
            }
            Ok(sample(due, k, rng))
        }
    }
}

impl ReviewSession {
    /// Query the store for due items and start a session over them.
    ///
    /// In full mode an empty due set yields a session that is already
    /// complete.
    pub fn compose<S, C>(
        store: &S,
        clock: &C,
        mode: SessionMode,
        rng: &mut TinyRng,
    ) -> Result<Self, ComposeError>
    where
        S: ItemStore + ?Sized,
        C: Clock + ?Sized,
    {
        let now = clock.now();
        let items = store.get_all().map_err(ComposeError::Store)?;
        let queue = compose_queue(&items, now, mode, rng)?;
        log::debug!(
            "Composed {mode:?} session: {} of {} items due.",
            queue.len(),
            items.len()
        );
        Ok(Self::new(queue, now))
    }

    fn new(queue: Vec<VocabItem>, started_at: Timestamp) -> Self {
        let state = if queue.is_empty() {
            SessionState::Complete
        } else {
            SessionState::AwaitingReveal
        };
        Self {
            queue,
            cursor: 0,
            state,
            reviews: Vec::new(),
            started_at,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// The item under review, as it was when the session was composed.
    pub fn current(&self) -> Option<&VocabItem> {
        match self.state {
            SessionState::Complete => None,
            _ => self.queue.get(self.cursor),
        }
    }

    /// Zero-based index of the current item.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.queue.len()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len() - self.cursor
    }

    /// Fraction of the queue already reviewed.
    pub fn progress(&self) -> f64 {
        if self.queue.is_empty() {
            1.0
        } else {
            self.cursor as f64 / self.queue.len() as f64
        }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Show the answer of the current item. Does nothing if it is already
    /// shown or the session is complete.
    pub fn reveal(&mut self) -> SessionState {
        if self.state == SessionState::AwaitingReveal {
            self.state = SessionState::Revealed;
        }
        self.state
    }

    /// Record the learner's outcome for the current item, persist it and
    /// move on.
    ///
    /// The transition is computed from the stored version of the item, so
    /// content edits made after the session was composed are kept.
    pub fn record_outcome<S, C>(
        &mut self,
        store: &mut S,
        clock: &C,
        outcome: Outcome,
    ) -> Result<&Review, SessionError>
    where
        S: ItemStore + ?Sized,
        C: Clock + ?Sized,
    {
        match self.state {
            SessionState::Complete => return Err(SessionError::Complete),
            SessionState::AwaitingReveal => return Err(SessionError::NotRevealed),
            SessionState::Revealed => {}
        }
        let now = clock.now();
        let id = self.queue[self.cursor].id.clone();
        let stored: Option<VocabItem> = store.get(&id).map_err(SessionError::Store)?;
        let persisted = stored.is_some();
        let mut item = match stored {
            Some(item) => item,
            None => {
                log::warn!("Item {id} was deleted during the session; not saving.");
                self.queue[self.cursor].clone()
            }
        };
        let previous = item.mastery_level.clone();
        let next = item.apply_review(outcome, now);
        let review = Review {
            item_id: id,
            word: item.word.clone(),
            outcome,
            previous,
            next,
            reviewed_at: item.last_reviewed,
            persisted,
        };
        if persisted {
            store.upsert(item.clone()).map_err(SessionError::Store)?;
        }
        self.queue[self.cursor] = item;
        self.reviews.push(review);
        self.advance();
        Ok(&self.reviews[self.reviews.len() - 1])
    }

    fn advance(&mut self) {
        self.cursor += 1;
        self.state = if self.cursor >= self.queue.len() {
            SessionState::Complete
        } else {
            SessionState::AwaitingReveal
        };
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::clock::FixedClock;
    use crate::due::is_due;
    use crate::error::Fallible;
    use crate::error::fail;
    use crate::store::MemoryStore;

    fn now() -> Timestamp {
        Timestamp::from_millis(1_750_000_000_000).unwrap()
    }

    fn rng() -> TinyRng {
        TinyRng::from_seed(1234)
    }

    /// An item at `level` last reviewed `ago` before `now()`.
    fn item(word: &str, level: MasteryLevel, ago: Duration) -> Fallible<VocabItem> {
        let last_reviewed = now() - ago;
        let mut item = VocabItem::new(word, last_reviewed - Duration::days(1))?;
        item.last_reviewed = last_reviewed;
        item.mastery_level = level;
        Ok(item)
    }

    fn store_with(items: Vec<VocabItem>) -> Fallible<MemoryStore> {
        let mut store = MemoryStore::new();
        for item in items.into_iter().rev() {
            store.upsert(item)?;
        }
        Ok(store)
    }

    /// A store whose writes fail until `healthy` is set.
    struct FlakyStore {
        inner: MemoryStore,
        healthy: bool,
    }

    impl ItemStore for FlakyStore {
        fn get_all(&self) -> Fallible<Vec<VocabItem>> {
            self.inner.get_all()
        }

        fn get(&self, id: &ItemId) -> Fallible<Option<VocabItem>> {
            self.inner.get(id)
        }

        fn upsert(&mut self, item: VocabItem) -> Fallible<()> {
            if self.healthy {
                self.inner.upsert(item)
            } else {
                fail("database is locked")
            }
        }

        fn delete(&mut self, id: &ItemId) -> Fallible<()> {
            self.inner.delete(id)
        }
    }

    #[test]
    fn test_full_queue_orders_oldest_first() -> Fallible<()> {
        let store = store_with(vec![
            item("ten", MasteryLevel::New, Duration::days(10))?,
            item("two", MasteryLevel::New, Duration::days(2))?,
            item("five", MasteryLevel::New, Duration::days(5))?,
        ])?;
        let clock = FixedClock::new(now());
        let session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        let words: Vec<&str> = session.queue.iter().map(|i| i.word.as_str()).collect();
        assert_eq!(words, vec!["ten", "five", "two"]);
        assert_eq!(session.state(), SessionState::AwaitingReveal);
        assert_eq!(session.current().map(|i| i.word.as_str()), Some("ten"));
        Ok(())
    }

    #[test]
    fn test_full_queue_excludes_items_not_due() -> Fallible<()> {
        let store = store_with(vec![
            item("due", MasteryLevel::Learning, Duration::days(4))?,
            item("resting", MasteryLevel::Mastered, Duration::days(4))?,
        ])?;
        let clock = FixedClock::new(now());
        let session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        assert_eq!(session.total(), 1);
        assert_eq!(session.current().map(|i| i.word.as_str()), Some("due"));
        Ok(())
    }

    #[test]
    fn test_full_queue_ties_keep_store_order() -> Fallible<()> {
        let store = store_with(vec![
            item("first", MasteryLevel::New, Duration::days(2))?,
            item("second", MasteryLevel::New, Duration::days(2))?,
        ])?;
        let clock = FixedClock::new(now());
        let session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        let words: Vec<&str> = session.queue.iter().map(|i| i.word.as_str()).collect();
        assert_eq!(words, vec!["first", "second"]);
        Ok(())
    }

    #[test]
    fn test_empty_full_session_is_complete() -> Fallible<()> {
        let store = store_with(vec![item("fresh", MasteryLevel::New, Duration::hours(1))?])?;
        let clock = FixedClock::new(now());
        let mut session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        assert!(session.is_complete());
        assert_eq!(session.current(), None);
        assert_eq!(session.progress(), 1.0);
        assert_eq!(session.reveal(), SessionState::Complete);
        Ok(())
    }

    #[test]
    fn test_quota_smaller_due_set() -> Fallible<()> {
        let store = store_with(vec![item("lonely", MasteryLevel::New, Duration::days(2))?])?;
        let clock = FixedClock::new(now());
        let session =
            ReviewSession::compose(&store, &clock, SessionMode::Quota(3), &mut rng())?;
        assert_eq!(session.total(), 1);
        Ok(())
    }

    #[test]
    fn test_quota_samples_distinct_due_items() -> Fallible<()> {
        let mut items = Vec::new();
        for i in 0..10 {
            items.push(item(&format!("w{i}"), MasteryLevel::New, Duration::days(2))?);
        }
        items.push(item("resting", MasteryLevel::Mastered, Duration::days(1))?);
        let store = store_with(items)?;
        let clock = FixedClock::new(now());
        let session =
            ReviewSession::compose(&store, &clock, SessionMode::Quota(3), &mut rng())?;
        assert_eq!(session.total(), 3);
        let mut ids: Vec<&ItemId> = session.queue.iter().map(|i| &i.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert!(session.queue.iter().all(|i| i.word != "resting"));
        Ok(())
    }

    #[test]
    fn test_quota_unavailable_when_nothing_due() -> Fallible<()> {
        let store = MemoryStore::new();
        let clock = FixedClock::new(now());
        let result = ReviewSession::compose(&store, &clock, SessionMode::Quota(3), &mut rng());
        assert_eq!(result.err(), Some(ComposeError::Unavailable));
        Ok(())
    }

    #[test]
    fn test_zero_quota_is_rejected() -> Fallible<()> {
        let store = store_with(vec![item("w", MasteryLevel::New, Duration::days(2))?])?;
        let clock = FixedClock::new(now());
        let result = ReviewSession::compose(&store, &clock, SessionMode::Quota(0), &mut rng());
        assert_eq!(result.err(), Some(ComposeError::ZeroQuota));
        Ok(())
    }

    #[test]
    fn test_end_to_end() -> Fallible<()> {
        let original = item("gregarious", MasteryLevel::New, Duration::days(2))?;
        let mut store = store_with(vec![original.clone()])?;
        let clock = FixedClock::new(now());
        let mut session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        assert_eq!(session.current().map(|i| &i.id), Some(&original.id));

        assert_eq!(session.reveal(), SessionState::Revealed);
        let review = session.record_outcome(&mut store, &clock, Outcome::Remembered)?;
        assert_eq!(review.previous, MasteryLevel::New);
        assert_eq!(review.next, MasteryLevel::Learning);
        assert!(review.persisted);
        assert!(session.is_complete());
        assert_eq!(session.progress(), 1.0);

        let stored = store.get(&original.id)?.unwrap();
        assert_eq!(stored.mastery_level, MasteryLevel::Learning);
        assert_eq!(stored.last_reviewed, now());
        assert!(!is_due(&stored, clock.now()));
        assert!(due_items(&store.get_all()?, clock.now()).is_empty());
        Ok(())
    }

    #[test]
    fn test_walks_whole_queue() -> Fallible<()> {
        let mut store = store_with(vec![
            item("a", MasteryLevel::Learning, Duration::days(4))?,
            item("b", MasteryLevel::Mastered, Duration::days(8))?,
        ])?;
        let clock = FixedClock::new(now());
        let mut session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        assert_eq!(session.remaining(), 2);

        session.reveal();
        session.record_outcome(&mut store, &clock, Outcome::Forgot)?;
        assert_eq!(session.state(), SessionState::AwaitingReveal);
        assert_eq!(session.position(), 1);
        assert_eq!(session.progress(), 0.5);
        assert_eq!(session.current().map(|i| i.word.as_str()), Some("a"));

        session.reveal();
        session.record_outcome(&mut store, &clock, Outcome::Remembered)?;
        assert!(session.is_complete());
        assert_eq!(session.remaining(), 0);

        let levels: Vec<(String, MasteryLevel)> = session
            .reviews()
            .iter()
            .map(|r| (r.word.clone(), r.next.clone()))
            .collect();
        assert_eq!(
            levels,
            vec![
                ("b".to_string(), MasteryLevel::Learning),
                ("a".to_string(), MasteryLevel::Mastered),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_reveal_is_idempotent() -> Fallible<()> {
        let store = store_with(vec![item("a", MasteryLevel::New, Duration::days(2))?])?;
        let clock = FixedClock::new(now());
        let mut session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        assert_eq!(session.reveal(), SessionState::Revealed);
        assert_eq!(session.reveal(), SessionState::Revealed);
        assert_eq!(session.position(), 0);
        assert!(session.reviews().is_empty());
        Ok(())
    }

    #[test]
    fn test_outcome_before_reveal_is_rejected() -> Fallible<()> {
        let original = item("a", MasteryLevel::New, Duration::days(2))?;
        let mut store = store_with(vec![original.clone()])?;
        let clock = FixedClock::new(now());
        let mut session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        let result = session.record_outcome(&mut store, &clock, Outcome::Remembered);
        assert_eq!(result.err(), Some(SessionError::NotRevealed));
        assert_eq!(session.state(), SessionState::AwaitingReveal);
        assert_eq!(store.get(&original.id)?, Some(original));
        Ok(())
    }

    #[test]
    fn test_outcome_after_completion_is_rejected() -> Fallible<()> {
        let mut store = store_with(vec![item("a", MasteryLevel::New, Duration::days(2))?])?;
        let clock = FixedClock::new(now());
        let mut session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        session.reveal();
        session.record_outcome(&mut store, &clock, Outcome::Forgot)?;
        let result = session.record_outcome(&mut store, &clock, Outcome::Forgot);
        assert_eq!(result.err(), Some(SessionError::Complete));
        assert_eq!(session.reviews().len(), 1);
        Ok(())
    }

    #[test]
    fn test_failed_write_holds_session() -> Fallible<()> {
        let original = item("a", MasteryLevel::New, Duration::days(2))?;
        let mut store = FlakyStore {
            inner: store_with(vec![original.clone()])?,
            healthy: false,
        };
        let clock = FixedClock::new(now());
        let mut session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        session.reveal();

        let err = session
            .record_outcome(&mut store, &clock, Outcome::Remembered)
            .err()
            .unwrap();
        assert!(err.is_retryable());
        assert_eq!(session.state(), SessionState::Revealed);
        assert_eq!(session.position(), 0);
        assert!(session.reviews().is_empty());
        assert_eq!(store.get(&original.id)?, Some(original.clone()));

        store.healthy = true;
        session.record_outcome(&mut store, &clock, Outcome::Remembered)?;
        assert!(session.is_complete());
        let stored = store.get(&original.id)?.unwrap();
        assert_eq!(stored.mastery_level, MasteryLevel::Learning);
        Ok(())
    }

    #[test]
    fn test_abandoned_session_keeps_recorded_outcomes() -> Fallible<()> {
        let a = item("a", MasteryLevel::New, Duration::days(3))?;
        let b = item("b", MasteryLevel::New, Duration::days(2))?;
        let mut store = store_with(vec![a.clone(), b.clone()])?;
        let clock = FixedClock::new(now());
        {
            let mut session =
                ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
            session.reveal();
            session.record_outcome(&mut store, &clock, Outcome::Remembered)?;
        }
        assert_eq!(store.get(&a.id)?.unwrap().mastery_level, MasteryLevel::Learning);
        assert_eq!(store.get(&b.id)?, Some(b));
        Ok(())
    }

    #[test]
    fn test_queue_is_a_snapshot() -> Fallible<()> {
        let a = item("a", MasteryLevel::New, Duration::days(5))?;
        let b = item("b", MasteryLevel::New, Duration::days(2))?;
        let mut store = store_with(vec![a.clone(), b.clone()])?;
        let clock = FixedClock::new(now());
        let mut session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;

        // A new due item and an edit to a queued item after composition.
        store.upsert(item("late", MasteryLevel::New, Duration::days(9))?)?;
        let mut edited = store.get(&b.id)?.unwrap();
        edited.notes = "edited mid-session".to_string();
        store.upsert(edited)?;

        assert_eq!(session.total(), 2);
        session.reveal();
        session.record_outcome(&mut store, &clock, Outcome::Remembered)?;
        assert_eq!(session.current().map(|i| &i.id), Some(&b.id));
        session.reveal();
        session.record_outcome(&mut store, &clock, Outcome::Remembered)?;
        assert!(session.is_complete());

        let stored = store.get(&b.id)?.unwrap();
        assert_eq!(stored.notes, "edited mid-session");
        assert_eq!(stored.mastery_level, MasteryLevel::Learning);
        Ok(())
    }

    #[test]
    fn test_deleted_item_is_not_resurrected() -> Fallible<()> {
        let a = item("a", MasteryLevel::New, Duration::days(2))?;
        let mut store = store_with(vec![a.clone()])?;
        let clock = FixedClock::new(now());
        let mut session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        store.delete(&a.id)?;
        session.reveal();
        let review = session.record_outcome(&mut store, &clock, Outcome::Remembered)?;
        assert!(!review.persisted);
        assert!(session.is_complete());
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_review_uses_clock_time() -> Fallible<()> {
        let a = item("a", MasteryLevel::Learning, Duration::days(4))?;
        let mut store = store_with(vec![a.clone()])?;
        let clock = FixedClock::new(now());
        let mut session = ReviewSession::compose(&store, &clock, SessionMode::Full, &mut rng())?;
        clock.advance(Duration::minutes(5));
        session.reveal();
        let review = session.record_outcome(&mut store, &clock, Outcome::Forgot)?;
        assert_eq!(review.reviewed_at, now() + Duration::minutes(5));
        assert_eq!(session.started_at(), now());
        assert_eq!(store.get(&a.id)?.unwrap().last_reviewed, now() + Duration::minutes(5));
        Ok(())
    }
}
