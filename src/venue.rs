//! Venue model.
//!
//! A venue is one simulated execution counterparty. Records are immutable:
//! every "update" (a measured latency, depth consumed by a fill) returns a new
//! record so a snapshot can be shared across concurrent routing calls.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SorError, SorResult};

/// Immutable venue record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VenueRecord")]
pub struct Venue {
    name: String,
    /// Simulated round-trip latency.
    latency_ms: f64,
    /// Quoted price. Carried for reporting, not used by the baseline score.
    price: Decimal,
    /// Quantity the venue can absorb.
    depth: u64,
}

impl Venue {
    /// Checked constructor. Depth is taken signed so a negative input can be
    /// rejected instead of wrapping.
    pub fn new(name: impl Into<String>, latency_ms: f64, price: Decimal, depth: i64) -> SorResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SorError::InvalidVenue {
                reason: "venue name must not be empty".to_string(),
            });
        }
        check_latency(&name, latency_ms)?;
        if depth < 0 {
            return Err(SorError::InvalidVenue {
                reason: format!("{}: depth must be >= 0, got {}", name, depth),
            });
        }

        Ok(Self {
            name,
            latency_ms,
            price,
            depth: depth as u64,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency_ms
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn depth(&self) -> u64 {
        self.depth
    }

    /// Same venue with a freshly measured latency.
    pub fn with_latency(&self, latency_ms: f64) -> SorResult<Self> {
        check_latency(&self.name, latency_ms)?;
        Ok(Self {
            latency_ms,
            ..self.clone()
        })
    }

    pub fn with_depth(&self, depth: u64) -> Self {
        Self {
            depth,
            ..self.clone()
        }
    }

    /// Depth left after a fill of `qty`. saturates at zero.
    pub fn consume_depth(&self, qty: u64) -> Self {
        self.with_depth(self.depth.saturating_sub(qty))
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (latency {:.3}ms, price {}, depth {})",
            self.name, self.latency_ms, self.price, self.depth
        )
    }
}

fn check_latency(name: &str, latency_ms: f64) -> SorResult<()> {
    if !latency_ms.is_finite() || latency_ms < 0.0 {
        return Err(SorError::InvalidVenue {
            reason: format!("{}: latency_ms must be finite and >= 0, got {}", name, latency_ms),
        });
    }
    Ok(())
}

// wire shape. deserialization goes through Venue::new so the invariants hold.
#[derive(Debug, Deserialize)]
struct VenueRecord {
    name: String,
    latency_ms: f64,
    price: Decimal,
    depth: i64,
}

impl TryFrom<VenueRecord> for Venue {
    type Error = SorError;

    fn try_from(record: VenueRecord) -> Result<Self, Self::Error> {
        Venue::new(record.name, record.latency_ms, record.price, record.depth)
    }
}
