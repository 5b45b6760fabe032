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
use std::ops::Add;
use std::ops::Sub;

use chrono::DateTime;
use chrono::Duration;
use chrono::NaiveDateTime;
use chrono::SubsecRound;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;

const DISPLAY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// A UTC timestamp with millisecond precision.
///
/// Serialized as an integer number of milliseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(ndt: NaiveDateTime) -> Self {
        Self(ndt.trunc_subsecs(3))
    }

    /// Converts a timestamp into a `NaiveDateTime` in UTC.
    pub fn into_inner(self) -> NaiveDateTime {
        self.0
    }

    /// The current timestamp in UTC.
    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        Self::new(chrono::Utc::now().naive_utc())
    }

    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|dt| Self(dt.naive_utc()))
    }

    pub fn as_millis(self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }

    /// Time elapsed from `earlier` to `self`. Negative if `earlier` is in
    /// the future.
    pub fn since(self, earlier: Timestamp) -> Duration {
        self.0.signed_duration_since(earlier.0)
    }

    /// `self + duration`, or `None` past the representable range.
    pub fn checked_add(self, duration: Duration) -> Option<Timestamp> {
        self.0.checked_add_signed(duration).map(Timestamp)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0 + rhs)
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Timestamp;

    fn sub(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0 - rhs)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl TryFrom<i64> for Timestamp {
    type Error = ErrorReport;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Timestamp::from_millis(value)
            .ok_or_else(|| ErrorReport::new(format!("Timestamp out of range: '{value}'.")))
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> i64 {
        ts.as_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Timestamp {
        Timestamp::new(NaiveDateTime::parse_from_str(s, DISPLAY_FORMAT).unwrap())
    }

    #[test]
    fn test_timestamp_to_string() {
        let ts = parse("2023-10-05T14:30:15.123");
        assert_eq!(ts.to_string(), "2023-10-05T14:30:15.123");
    }

    #[test]
    fn test_millis() {
        let ts = Timestamp::from_millis(1_700_000_000_123).unwrap();
        assert_eq!(ts.to_string(), "2023-11-14T22:13:20.123");
        assert_eq!(ts.as_millis(), 1_700_000_000_123);
    }

    #[test]
    fn test_serialize() {
        let ts = Timestamp::from_millis(1_700_000_000_123).unwrap();
        let serialized = serde_json::to_string(&ts).unwrap();
        assert_eq!(serialized, "1700000000123");
    }

    #[test]
    fn test_deserialize() {
        let ts: Timestamp = serde_json::from_str("1700000000123").unwrap();
        assert_eq!(ts, Timestamp::from_millis(1_700_000_000_123).unwrap());
    }

    #[test]
    fn test_deserialize_out_of_range() {
        let result: Result<Timestamp, _> = serde_json::from_str(&i64::MAX.to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_arithmetic() {
        let ts = parse("2024-01-01T12:00:00.000");
        let later = ts + Duration::days(3) + Duration::milliseconds(1);
        assert_eq!(later.to_string(), "2024-01-04T12:00:00.001");
        assert_eq!(later.since(ts), Duration::days(3) + Duration::milliseconds(1));
        assert_eq!(ts.since(later), -(Duration::days(3) + Duration::milliseconds(1)));
        assert_eq!(later - Duration::milliseconds(1) - Duration::days(3), ts);
    }

    #[test]
    fn test_checked_add() {
        let ts = parse("2024-01-01T12:00:00.000");
        assert_eq!(ts.checked_add(Duration::days(1)), Some(ts + Duration::days(1)));
        let last = Timestamp::new(NaiveDateTime::MAX);
        assert_eq!(last.checked_add(Duration::milliseconds(1)), None);
    }

    #[test]
    fn test_new_truncates_to_millis() {
        let ndt = NaiveDateTime::parse_from_str("2024-01-01T00:00:00.123456", "%Y-%m-%dT%H:%M:%S%.6f")
            .unwrap();
        assert_eq!(Timestamp::new(ndt).to_string(), "2024-01-01T00:00:00.123");
    }
}
