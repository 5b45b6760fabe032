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

use serde::Deserialize;
use serde::Serialize;

/// Coarse proficiency tag driving review frequency.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MasteryLevel {
    /// Never successfully recalled.
    #[default]
    New,
    Learning,
    Mastered,
    /// A stored value that is none of the above. Kept verbatim so that it
    /// survives a load/save cycle, and always treated as due.
    Unrecognized(String),
}

impl MasteryLevel {
    /// The three levels of the model, in ascending order.
    pub const KNOWN: [MasteryLevel; 3] = [
        MasteryLevel::New,
        MasteryLevel::Learning,
        MasteryLevel::Mastered,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            MasteryLevel::New => "New",
            MasteryLevel::Learning => "Learning",
            MasteryLevel::Mastered => "Mastered",
            MasteryLevel::Unrecognized(raw) => raw,
        }
    }

    /// Case-insensitive lookup of a known level.
    pub fn parse_known(s: &str) -> Option<MasteryLevel> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(MasteryLevel::New),
            "learning" => Some(MasteryLevel::Learning),
            "mastered" => Some(MasteryLevel::Mastered),
            _ => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, MasteryLevel::Unrecognized(_))
    }
}

impl Display for MasteryLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for MasteryLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "New" => MasteryLevel::New,
            "Learning" => MasteryLevel::Learning,
            "Mastered" => MasteryLevel::Mastered,
            _ => MasteryLevel::Unrecognized(value),
        }
    }
}

impl From<MasteryLevel> for String {
    fn from(level: MasteryLevel) -> String {
        match level {
            MasteryLevel::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}
