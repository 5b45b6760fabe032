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


use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio::time::sleep;

use crate::error::Fallible;
use crate::error::fail;

/// Static assets never change within a release: cache them for a week.
pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=604800, immutable";

const SERVER_START_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll until something accepts connections on `host:port`.
pub async fn wait_for_server(host: &str, port: u16) -> Fallible<()> {
    wait_for_server_within(host, port, SERVER_START_TIMEOUT).await
}

async fn wait_for_server_within(host: &str, port: u16, timeout: Duration) -> Fallible<()> {
    let address = format!("{host}:{port}");
    let deadline = Instant::now() + timeout;
    loop {
        if TcpStream::connect(&address).await.is_ok() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return fail(format!("review server did not start on {address}."));
        }
        sleep(Duration::from_millis(5)).await;
    }
}
