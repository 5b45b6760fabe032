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

use crate::error::ErrorReport;
use crate::types::mastery::MasteryLevel;

/// What the learner reports after seeing the answer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Outcome {
    Forgot,
    Remembered,
}

impl Outcome {
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Forgot => "forgot",
            Outcome::Remembered => "remembered",
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Remembered
    }
}

impl From<bool> for Outcome {
    fn from(success: bool) -> Self {
        if success {
            Outcome::Remembered
        } else {
            Outcome::Forgot
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Outcome {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "forgot" => Ok(Outcome::Forgot),
            "remembered" => Ok(Outcome::Remembered),
            _ => Err(ErrorReport::new(format!("invalid outcome string: {value}"))),
        }
    }
}

/// The mastery level after a review.
///
/// Success advances one step and saturates at `Mastered`. Failure always
/// lands on `Learning`. An unrecognized level re-enters the model as if it
/// were `New`.
pub fn transition(current: &MasteryLevel, outcome: Outcome) -> MasteryLevel {
    match (current, outcome) {
        (_, Outcome::Forgot) => MasteryLevel::Learning,
        (MasteryLevel::New, Outcome::Remembered) => MasteryLevel::Learning,
        (MasteryLevel::Learning, Outcome::Remembered) => MasteryLevel::Mastered,
        (MasteryLevel::Mastered, Outcome::Remembered) => MasteryLevel::Mastered,
        (MasteryLevel::Unrecognized(_), Outcome::Remembered) => MasteryLevel::Learning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_transition_table() {
        use MasteryLevel::*;
        let table = [
            (New, Outcome::Remembered, Learning),
            (New, Outcome::Forgot, Learning),
            (Learning, Outcome::Remembered, Mastered),
            (Learning, Outcome::Forgot, Learning),
            (Mastered, Outcome::Remembered, Mastered),
            (Mastered, Outcome::Forgot, Learning),
        ];
        for (current, outcome, expected) in table {
            assert_eq!(transition(&current, outcome), expected, "{current} / {outcome}");
        }
    }

    #[test]
    fn test_no_skip_from_new_to_mastered() {
        let once = transition(&MasteryLevel::New, Outcome::Remembered);
        assert_eq!(once, MasteryLevel::Learning);
        let twice = transition(&once, Outcome::Remembered);
        assert_eq!(twice, MasteryLevel::Mastered);
    }

    #[test]
    fn test_failure_never_resets_to_new() {
        for level in MasteryLevel::KNOWN {
            assert_ne!(transition(&level, Outcome::Forgot), MasteryLevel::New);
        }
    }

    #[test]
    fn test_unrecognized_level() {
        let level = MasteryLevel::Unrecognized("Expert".to_string());
        assert_eq!(transition(&level, Outcome::Remembered), MasteryLevel::Learning);
        assert_eq!(transition(&level, Outcome::Forgot), MasteryLevel::Learning);
    }

    #[test]
    fn test_outcome_from_bool() {
        assert_eq!(Outcome::from(true), Outcome::Remembered);
        assert_eq!(Outcome::from(false), Outcome::Forgot);
        assert!(Outcome::Remembered.is_success());
    }

    #[test]
    fn test_outcome_strings() -> Fallible<()> {
        assert_eq!(Outcome::try_from("forgot".to_string())?, Outcome::Forgot);
        assert_eq!(Outcome::try_from("remembered".to_string())?, Outcome::Remembered);
        assert!(Outcome::try_from("easy".to_string()).is_err());
        Ok(())
    }
}
