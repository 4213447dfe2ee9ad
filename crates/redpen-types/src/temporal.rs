use std::fmt;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Timestamp for record and audit rows.
///
/// Combines wall-clock milliseconds with a logical counter so that two
/// mutations landing in the same millisecond still order totally. History
/// ordering ("descending by creation time") depends on this: a bare
/// wall-clock value would tie under load.
///
/// Ordering: `millis` → `logical` (total order).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    /// Wall-clock milliseconds since UNIX epoch.
    pub millis: u64,
    /// Logical counter for events at the same physical time.
    pub logical: u32,
}

impl Timestamp {
    /// Create a timestamp with explicit values.
    pub const fn new(millis: u64, logical: u32) -> Self {
        Self { millis, logical }
    }

    /// Current wall-clock time with a zero logical component.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self { millis, logical: 0 }
    }

    /// The zero timestamp.
    pub const fn zero() -> Self {
        Self {
            millis: 0,
            logical: 0,
        }
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms.{})", self.millis, self.logical)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.millis, self.logical)
    }
}

/// A clock that never issues the same [`Timestamp`] twice.
///
/// Each `tick()` returns a timestamp strictly greater than every timestamp
/// previously issued by this clock: the wall clock when it has advanced,
/// otherwise the last physical time with the logical counter bumped.
#[derive(Debug)]
pub struct MonotonicClock {
    last: Mutex<Timestamp>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(Timestamp::zero()),
        }
    }

    /// Issue the next strictly increasing timestamp.
    pub fn tick(&self) -> Timestamp {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let now = Timestamp::now();
        let next = if now.millis > last.millis {
            now
        } else {
            Timestamp::new(last.millis, last.logical.saturating_add(1))
        };
        *last = next;
        next
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
