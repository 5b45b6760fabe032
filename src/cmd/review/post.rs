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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;
use vocabflow_core::Outcome;
use vocabflow_core::SessionError;
use vocabflow_core::SystemClock;
use vocabflow_core::Timestamp;

use crate::cmd::review::state::MutableState;
use crate::cmd::review::state::ServerState;
use crate::error::ErrorReport;

#[derive(Deserialize)]
pub struct ActionForm {
    action: String,
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Action {
    Reveal,
    Answer(Outcome),
    End,
    Shutdown,
}

impl TryFrom<String> for Action {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Reveal" => Ok(Action::Reveal),
            "Forgot" => Ok(Action::Answer(Outcome::Forgot)),
            "Remembered" => Ok(Action::Answer(Outcome::Remembered)),
            "End" => Ok(Action::End),
            "Shutdown" => Ok(Action::Shutdown),
            _ => Err(ErrorReport::new(format!("invalid action: {value}"))),
        }
    }
}

pub async fn post_handler(State(state): State<ServerState>, Form(form): Form<ActionForm>) -> Redirect {
    match Action::try_from(form.action) {
        Ok(Action::Shutdown) => state.shutdown(),
        Ok(action) => handle_action(&mut state.lock(), action),
        Err(e) => log::debug!("{e}"),
    }
    Redirect::to("/")
}

fn handle_action(m: &mut MutableState, action: Action) {
    let MutableState {
        db,
        session,
        finished_at,
        error,
    } = m;
    if finished_at.is_some() {
        log::debug!("Ignoring {action:?}: the session is over.");
        return;
    }
    match action {
        Action::Reveal => {
            session.reveal();
        }
        Action::Answer(outcome) => match session.record_outcome(db, &SystemClock, outcome) {
            Ok(review) => {
                log::debug!(
                    "{}: {} -> {} ({})",
                    review.word,
                    review.previous,
                    review.next,
                    review.outcome
                );
                *error = None;
            }
            Err(SessionError::Store(e)) => {
                log::error!("Failed to save review: {e}");
                *error = Some(format!("Your answer could not be saved ({}). Try again.", e.message()));
            }
            Err(e) => log::debug!("Ignoring {outcome}: {e}"),
        },
        Action::End => {
            log::debug!("Session ended with {} items left.", session.remaining());
            *finished_at = Some(Timestamp::now());
        }
        Action::Shutdown => {}
    }
    if session.is_complete() && finished_at.is_none() {
        *finished_at = Some(Timestamp::now());
    }
}
