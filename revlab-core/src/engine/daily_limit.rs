use crate::domain::DayKey;
use std::collections::BTreeMap;

/// Default number of entries allowed per UTC day.
pub const DEFAULT_MAX_TRADES_PER_DAY: u32 = 2;

/// Per-day entry counter.
///
/// Counts entries only, never exits. A day starts at zero the first time it
/// is seen; the map is never cleared during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTradeLimiter {
    max_per_day: u32,
    counts: BTreeMap<DayKey, u32>,
}

impl DailyTradeLimiter {
    pub fn new(max_per_day: u32) -> Self {
        Self {
            max_per_day,
            counts: BTreeMap::new(),
        }
    }

    pub fn max_per_day(&self) -> u32 {
        self.max_per_day
    }

    pub fn count(&self, day: DayKey) -> u32 {
        self.counts.get(&day).copied().unwrap_or(0)
    }

    /// Strictly fewer than `max_per_day` entries so far on `day`.
    pub fn allows_entry(&self, day: DayKey) -> bool {
        self.count(day) < self.max_per_day
    }

    pub fn record_entry(&mut self, day: DayKey) {
        *self.counts.entry(day).or_insert(0) += 1;
    }
}

impl Default for DailyTradeLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRADES_PER_DAY)
    }
}
