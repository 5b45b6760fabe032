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

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write;

use clap::ValueEnum;
use vocabflow_core::ItemStore;
use vocabflow_core::Stats;
use vocabflow_core::Timestamp;

use crate::collection::Collection;
use crate::error::Fallible;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum StatsFormat {
    /// Human-readable summary.
    Text,
    /// A JSON object.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let stats = Stats::compute(&collection.db.get_all()?, Timestamp::now());
    match format {
        StatsFormat::Text => print!("{}", render_text(&stats)),
        StatsFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}

fn render_text(stats: &Stats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total:    {}", stats.total);
    let _ = writeln!(out, "New:      {}", stats.new);
    let _ = writeln!(out, "Learning: {}", stats.learning);
    let _ = writeln!(out, "Mastered: {}", stats.mastered);
    if stats.unrecognized > 0 {
        let _ = writeln!(out, "Unknown:  {}", stats.unrecognized);
    }
    let _ = writeln!(out, "Due now:  {}", stats.due_now);
    if let Some(at) = stats.next_due_at {
        let _ = writeln!(out, "Next due: {at}");
    }
    out
}
