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


use maud::DOCTYPE;
use maud::Markup;
use maud::html;

/// Wrap a drill page. `title` is shown in the browser tab so the learner can
/// see their progress without switching to it.
pub fn page_template(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " \u{00b7} vocabflow" }
                link rel="stylesheet" href="/style.css";
            }
            body {
                (body)
                footer.shortcuts {
                    kbd { "Space" } " reveal "
                    kbd { "1" } " forgot "
                    kbd { "2" } " remembered"
                }
                script src="/script.js" {};
            }
        }
    }
}
