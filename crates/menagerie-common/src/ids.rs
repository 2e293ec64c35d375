//! Record identifiers and their generator.
//!
//! Record ids are millisecond timestamps taken at creation time. The
//! [`IdGenerator`] bumps the value past the last issued id whenever the clock
//! has not advanced, so ids remain unique and strictly increasing.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

/// Unique identifier for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw id value.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues timestamp-based record ids that never repeat within a process.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    /// Create a generator with no previously issued ids.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator whose ids are all greater than `last`.
    ///
    /// Used at startup with the largest id already persisted, so a clock
    /// that moved backwards cannot reissue an existing id.
    #[must_use]
    pub fn starting_after(last: RecordId) -> Self {
        Self {
            last: AtomicI64::new(last.get()),
        }
    }

    /// Issue the next id based on the current wall-clock time.
    pub fn next_id(&self) -> RecordId {
        self.issue_at(chrono::Utc::now().timestamp_millis())
    }

    /// Issue the next id as if the clock read `now_millis`.
    pub fn issue_at(&self, now_millis: i64) -> RecordId {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now_millis.max(prev.saturating_add(1));
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return RecordId(candidate),
                Err(actual) => prev = actual,
            }
        }
    }
}
