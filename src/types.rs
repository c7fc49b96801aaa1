// 1.0: primitives shared by the router. order sizes and timestamps.
// each is a newtype so a raw integer can't be passed where a validated size is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SorError, SorResult};

// 1.1: quantity to route. always > 0 once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderSize(u64);

impl OrderSize {
    /// Validate a caller supplied size. zero and negatives are caller errors.
    pub fn new(size: i64) -> SorResult<Self> {
        if size > 0 {
            Ok(Self(size as u64))
        } else {
            Err(SorError::InvalidInput {
                reason: format!("order size must be positive, got {}", size),
            })
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.2: millisecond timestamp. only used to stamp reports, never feeds a routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn to_rfc3339(&self) -> String {
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| self.0.to_string())
    }
}
