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

use std::fs::read_to_string;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;
use vocabflow_core::session::DEFAULT_QUOTA;
use vocabflow_core::session::SessionMode;

use crate::error::Context;
use crate::error::Fallible;

/// Name of the optional configuration file in the collection directory.
pub const CONFIG_FILE: &str = "vocabflow.toml";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    /// Every due item, least recently reviewed first.
    Full,
    /// A small random subset of the due items.
    Quota,
}

/// Collection settings read from `vocabflow.toml`. Every field is optional.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub review: ReviewSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewSettings {
    pub mode: Option<ReviewMode>,
    pub quota: Option<usize>,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Read the configuration of the collection at `directory`. A missing
    /// file means defaults.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = read_to_string(&path)?;
        Config::parse(&text)
    }

    pub fn parse(text: &str) -> Fallible<Self> {
        toml::from_str(text).context(&format!("invalid {CONFIG_FILE}"))
    }

    /// The session mode, with command-line flags taking precedence over the
    /// file.
    pub fn session_mode(&self, mode: Option<ReviewMode>, quota: Option<usize>) -> SessionMode {
        let quota = quota.or(self.review.quota).unwrap_or(DEFAULT_QUOTA);
        match mode.or(self.review.mode).unwrap_or(ReviewMode::Full) {
            ReviewMode::Full => SessionMode::Full,
            ReviewMode::Quota => SessionMode::Quota(quota),
        }
    }

    pub fn host(&self, host: Option<String>) -> String {
        host.or_else(|| self.server.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn port(&self, port: Option<u16>) -> u16 {
        port.or(self.server.port).unwrap_or(DEFAULT_PORT)
    }
}
