//! Candle interval codes and lenient normalization of user-supplied tokens.
//!
//! Exchange APIs accept a fixed set of interval codes. Tokens coming from
//! users or query strings are mapped onto that set; unknown tokens fall back
//! to `15m` instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A whitelisted exchange interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    M1,
    M3,
    M5,
    M15,
    M30,
    H1,
    H2,
    H4,
    H6,
    H8,
    H12,
    D1,
    D3,
    W1,
    Month1,
}

/// Interval used when a token is empty or unrecognized.
pub const DEFAULT_INTERVAL: Interval = Interval::M15;

const REMAP: &[(&str, Interval)] = &[
    ("10m", Interval::M15),
    ("60m", Interval::H1),
    ("60", Interval::H1),
    ("15", Interval::M15),
];

impl Interval {
    pub const ALL: [Interval; 15] = [
        Interval::M1,
        Interval::M3,
        Interval::M5,
        Interval::M15,
        Interval::M30,
        Interval::H1,
        Interval::H2,
        Interval::H4,
        Interval::H6,
        Interval::H8,
        Interval::H12,
        Interval::D1,
        Interval::D3,
        Interval::W1,
        Interval::Month1,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M3 => "3m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H2 => "2h",
            Interval::H4 => "4h",
            Interval::H6 => "6h",
            Interval::H8 => "8h",
            Interval::H12 => "12h",
            Interval::D1 => "1d",
            Interval::D3 => "3d",
            Interval::W1 => "1w",
            Interval::Month1 => "1M",
        }
    }

    /// Nominal bar duration. A month counts as 30 days.
    pub fn seconds(self) -> i64 {
        const MIN: i64 = 60;
        const HOUR: i64 = 60 * MIN;
        const DAY: i64 = 24 * HOUR;
        match self {
            Interval::M1 => MIN,
            Interval::M3 => 3 * MIN,
            Interval::M5 => 5 * MIN,
            Interval::M15 => 15 * MIN,
            Interval::M30 => 30 * MIN,
            Interval::H1 => HOUR,
            Interval::H2 => 2 * HOUR,
            Interval::H4 => 4 * HOUR,
            Interval::H6 => 6 * HOUR,
            Interval::H8 => 8 * HOUR,
            Interval::H12 => 12 * HOUR,
            Interval::D1 => DAY,
            Interval::D3 => 3 * DAY,
            Interval::W1 => 7 * DAY,
            Interval::Month1 => 30 * DAY,
        }
    }

    /// Map any token onto a whitelisted interval. Never fails.
    ///
    /// Order: empty → default, exact whitelist match, remap table, default.
    /// Matching is case-sensitive (`1M` is a month, `1m` a minute).
    pub fn normalize(token: &str) -> Interval {
        let token = token.trim();
        if token.is_empty() {
            return DEFAULT_INTERVAL;
        }
        if let Ok(interval) = token.parse() {
            return interval;
        }
        REMAP
            .iter()
            .find(|(alias, _)| *alias == token)
            .map(|&(_, interval)| interval)
            .unwrap_or(DEFAULT_INTERVAL)
    }
}

/// String-level form of [`Interval::normalize`].
pub fn normalize_interval(token: &str) -> &'static str {
    Interval::normalize(token).as_str()
}

impl Default for Interval {
    fn default() -> Self {
        DEFAULT_INTERVAL
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for strict parsing of a non-whitelisted code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interval code: {0:?}")]
pub struct UnknownInterval(pub String);

impl FromStr for Interval {
    type Err = UnknownInterval;

    /// Strict parse: only exact whitelist codes are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| UnknownInterval(s.to_string()))
    }
}

impl TryFrom<String> for Interval {
    type Error = UnknownInterval;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.as_str().to_string()
    }
}
