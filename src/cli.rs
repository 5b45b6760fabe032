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


use std::process::exit;

use clap::Parser;
use clap::ValueEnum;
use tokio::spawn;
use vocabflow_core::ContentEdit;
use vocabflow_core::Filter;
use vocabflow_core::ItemId;
use vocabflow_core::MasteryFilter;
use vocabflow_core::MasteryLevel;
use vocabflow_core::Timestamp;

use crate::cmd::export::export_collection;
use crate::cmd::export::import_collection;
use crate::cmd::items::NewItem;
use crate::cmd::items::add_item;
use crate::cmd::items::delete_item;
use crate::cmd::items::edit_item;
use crate::cmd::items::show_item;
use crate::cmd::list::list_due;
use crate::cmd::list::list_items;
use crate::cmd::review::server::ServerConfig;
use crate::cmd::review::server::start_server;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::collection::Collection;
use crate::config::ReviewMode;
use crate::error::Fallible;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Add a word to the collection.
    Add {
        /// The word or phrase to learn.
        word: String,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// What the word means, in your own words.
        #[arg(long)]
        meaning: Option<String>,
        /// A sentence where you found the word.
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// A common word combination. May be repeated.
        #[arg(long)]
        collocation: Vec<String>,
    },
    /// Edit the content of an item. Review history is left untouched.
    Edit {
        id: ItemId,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        #[arg(long)]
        word: Option<String>,
        #[arg(long)]
        meaning: Option<String>,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Replace the collocations. May be repeated.
        #[arg(long, conflicts_with = "clear_collocations")]
        collocation: Vec<String>,
        /// Remove all collocations.
        #[arg(long)]
        clear_collocations: bool,
    },
    /// Delete an item.
    Delete {
        id: ItemId,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Print every field of an item.
    Show {
        id: ItemId,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// List the items in the collection, newest first.
    List {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Only show items whose word or meaning contains this text.
        #[arg(long)]
        search: Option<String>,
        /// Only show items at this mastery level.
        #[arg(long, default_value_t = MasteryArg::All)]
        mastery: MasteryArg,
    },
    /// List the items due for review, least recently reviewed first.
    Due {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Review due items through a web interface.
    Review {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Which items to review. Default is taken from the configuration, or `full`.
        #[arg(long)]
        mode: Option<ReviewMode>,
        /// Number of items in a quota session. Default is 3.
        #[arg(long)]
        quota: Option<usize>,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long)]
        host: Option<String>,
        /// The port to use for the web server. Default is 8000.
        #[arg(long)]
        port: Option<u16>,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
    /// Print collection statistics.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Export a collection as JSON.
    Export {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<String>,
    },
    /// Import items from a JSON export, replacing items with the same id.
    Import {
        /// Path to the JSON file.
        file: String,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
enum MasteryArg {
    All,
    New,
    Learning,
    Mastered,
}

impl std::fmt::Display for MasteryArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MasteryArg::All => "all",
            MasteryArg::New => "new",
            MasteryArg::Learning => "learning",
            MasteryArg::Mastered => "mastered",
        };
        write!(f, "{s}")
    }
}

impl From<MasteryArg> for MasteryFilter {
    fn from(arg: MasteryArg) -> Self {
        match arg {
            MasteryArg::All => MasteryFilter::All,
            MasteryArg::New => MasteryFilter::Level(MasteryLevel::New),
            MasteryArg::Learning => MasteryFilter::Level(MasteryLevel::Learning),
            MasteryArg::Mastered => MasteryFilter::Level(MasteryLevel::Mastered),
        }
    }
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Add {
            word,
            directory,
            meaning,
            context,
            notes,
            collocation,
        } => {
            let new = NewItem {
                word,
                meaning,
                context,
                notes,
                collocations: collocation,
            };
            add_item(directory, new)
        }
        Command::Edit {
            id,
            directory,
            word,
            meaning,
            context,
            notes,
            collocation,
            clear_collocations,
        } => {
            let collocations = if clear_collocations {
                Some(Vec::new())
            } else if collocation.is_empty() {
                None
            } else {
                Some(collocation)
            };
            let edit = ContentEdit {
                word,
                user_meaning: meaning,
                context_sentence: context,
                notes,
                collocations,
            };
            edit_item(directory, id, edit)
        }
        Command::Delete { id, directory } => delete_item(directory, id),
        Command::Show { id, directory } => show_item(directory, id),
        Command::List {
            directory,
            search,
            mastery,
        } => {
            let filter = Filter {
                search: search.unwrap_or_default(),
                mastery: mastery.into(),
            };
            list_items(directory, filter)
        }
        Command::Due { directory } => list_due(directory),
        Command::Review {
            directory,
            mode,
            quota,
            host,
            port,
            open_browser,
        } => {
            let config = Collection::new(directory.clone())?.config;
            let host = config.host(host);
            let port = config.port(port);
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig {
                directory,
                host,
                port,
                mode: config.session_mode(mode, quota),
                seed: Timestamp::now().as_millis().unsigned_abs(),
            };
            start_server(config).await
        }
        Command::Stats { directory, format } => print_stats(directory, format),
        Command::Export { directory, output } => export_collection(directory, output),
        Command::Import { file, directory } => import_collection(directory, file),
    }
}
