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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;
use vocabflow_core::SessionState;
use vocabflow_core::VocabItem;

use crate::cmd::review::state::MutableState;
use crate::cmd::review::state::ServerState;
use crate::cmd::review::template::page_template;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let m = state.lock();
    let (title, body) = match m.session.current() {
        Some(item) if m.finished_at.is_none() => (
            format!("{} left", m.session.remaining()),
            render_session(&state, &m, item),
        ),
        _ => ("Done".to_string(), render_completion(&state, &m)),
    };
    (StatusCode::OK, Html(page_template(&title, body).into_string()))
}

fn render_session(state: &ServerState, m: &MutableState, item: &VocabItem) -> Markup {
    let revealed = m.session.state() == SessionState::Revealed;
    let width = format!("width: {:.0}%;", m.session.progress() * 100.0);
    html! {
        div.root {
            div.progress-text {
                "Review \u{2022} " (m.session.remaining()) " of " (state.total_items) " remaining"
            }
            div.progress-bar {
                div.progress-fill style=(width) {}
            }
            div.card {
                h1.word { (item.word) }
                @if let Some(dict) = &item.dictionary_data {
                    @if !dict.phonetic.is_empty() {
                        p.phonetic { (dict.phonetic) }
                    }
                }
                @if revealed {
                    (render_answer(item))
                } @else {
                    p.hint { "Press space to reveal" }
                }
            }
            @if let Some(error) = &m.error {
                div.error { (error) }
            }
            form method="post" {
                div.controls {
                    @if revealed {
                        input id="forgot" type="submit" name="action" value="Forgot";
                        input id="remembered" type="submit" name="action" value="Remembered";
                    } @else {
                        input id="reveal" type="submit" name="action" value="Reveal";
                    }
                    input id="end" type="submit" name="action" value="End";
                }
            }
        }
    }
}

fn render_answer(item: &VocabItem) -> Markup {
    html! {
        div.answer {
            @if !item.user_meaning.is_empty() {
                p.label { "Meaning" }
                p.meaning { (item.user_meaning) }
            }
            @if !item.context_sentence.is_empty() {
                p.label { "Context" }
                p.context { "\u{201c}" (item.context_sentence) "\u{201d}" }
            }
            @if !item.collocations.is_empty() {
                p.label { "Collocations" }
                ul.collocations {
                    @for collocation in &item.collocations {
                        li { (collocation) }
                    }
                }
            }
            @if !item.notes.is_empty() {
                p.label { "Notes" }
                p.notes { (item.notes) }
            }
        }
    }
}

fn render_completion(state: &ServerState, m: &MutableState) -> Markup {
    let reviews = m.session.reviews();
    let remembered = reviews.iter().filter(|r| r.outcome.is_success()).count();
    let forgot = reviews.len() - remembered;
    let skipped = state.total_items - reviews.len();
    html! {
        div.root {
            div.card {
                h1 { "Session Completed" }
                p {
                    "Reviewed " (reviews.len()) " of " (state.total_items) " items: "
                    (remembered) " remembered, " (forgot) " forgot."
                }
                @if skipped > 0 {
                    p.hint { (skipped) " items were left for next time." }
                }
                ul.reviews {
                    @for review in reviews {
                        li { (review.word) ": " (review.previous) " \u{2192} " (review.next) }
                    }
                }
            }
            form method="post" {
                div.controls {
                    input id="shutdown" type="submit" name="action" value="Shutdown";
                }
            }
        }
    }
}
