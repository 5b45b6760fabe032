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

//! vocabflow-core: Core library for the vocabflow vocabulary manager.
//!
//! This library provides I/O-free types and algorithms for:
//! - Vocabulary items and their three-tier mastery model
//! - Deciding which items are due for review
//! - Composing and driving review sessions
//! - Library search and collection statistics

pub mod clock;
pub mod due;
pub mod error;
pub mod filter;
pub mod rng;
pub mod session;
pub mod stats;
pub mod store;
pub mod transition;
pub mod types;

// Re-exports for convenience
pub use clock::Clock;
pub use clock::FixedClock;
#[cfg(feature = "clock")]
pub use clock::SystemClock;
pub use due::due_items;
pub use due::is_due;
pub use error::{ErrorReport, Fallible, fail};
pub use filter::{Filter, MasteryFilter};
pub use session::{ReviewSession, SessionError, SessionMode, SessionState};
pub use stats::Stats;
pub use store::{ItemStore, MemoryStore};
pub use transition::{Outcome, transition};
pub use types::item::{ContentEdit, DictionaryData, VocabItem};
pub use types::item_id::ItemId;
pub use types::mastery::MasteryLevel;
pub use types::timestamp::Timestamp;
