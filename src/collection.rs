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

use std::env::current_dir;
use std::path::PathBuf;

use crate::config::Config;
use crate::db::DB_FILE;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;

/// A directory holding a vocabulary database and its configuration.
pub struct Collection {
    pub directory: PathBuf,
    pub db: Database,
    pub config: Config,
}

impl Collection {
    /// Open the collection at `directory`, or the current directory.
    ///
    /// The database is created if missing. If its contents could not be
    /// read, a warning is printed and the collection starts empty.
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        if !directory.exists() {
            return fail("directory does not exist.");
        }
        if !directory.is_dir() {
            return fail("not a directory.");
        }
        let directory = directory.canonicalize()?;
        let config = Config::load(&directory)?;
        let db = Database::new(&directory.join(DB_FILE))?;
        if let Some(warning) = db.recovery_warning() {
            eprintln!("warning: {warning}");
        }
        Ok(Self {
            directory,
            db,
            config,
        })
    }
}
