// 5.0 scoring.rs: venue suitability scores.
// pure functions only. same (venue, order size) in, same bits out.
//
//   liquidity_score = min(order_size / (depth + 1), 1.0)
//   latency_penalty = latency_ms / 1000
//   score           = liquidity_score - latency_penalty
//
// callers validate the order size first. the functions here are total over
// non-negative depth and latency and positive sizes.

use serde::{Deserialize, Serialize};

use crate::error::{SorError, SorResult};
use crate::venue::Venue;

// 5.1: the two terms of the baseline score

/// Fraction of the order the venue's depth absorbs, capped at 1.0.
/// The +1 keeps depth 0 finite.
pub fn liquidity_score(depth: u64, order_size: u64) -> f64 {
    (order_size as f64 / (depth as f64 + 1.0)).min(1.0)
}

/// Latency cost in seconds-equivalent units.
pub fn latency_penalty(latency_ms: f64) -> f64 {
    latency_ms / 1000.0
}

/// Baseline score for routing `order_size` to `venue`.
pub fn score_venue(venue: &Venue, order_size: u64) -> f64 {
    liquidity_score(venue.depth(), order_size) - latency_penalty(venue.latency_ms())
}

// 5.2: pluggable strategies. a caller picks one, the router only sees the trait.
// execution policies like POV/TWAP/VWAP would slot in here as further
// implementors; none ship in this crate.
pub trait ScoringStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, venue: &Venue, order_size: u64) -> f64;

    fn breakdown(&self, venue: &Venue, order_size: u64) -> ScoreBreakdown {
        ScoreBreakdown {
            venue: venue.name().to_string(),
            liquidity_score: liquidity_score(venue.depth(), order_size),
            latency_penalty: latency_penalty(venue.latency_ms()),
            score: self.score(venue, order_size),
        }
    }
}

/// The baseline latency/liquidity trade-off.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatencyLiquidity;

impl ScoringStrategy for LatencyLiquidity {
    fn name(&self) -> &str {
        "latency-liquidity"
    }

    fn score(&self, venue: &Venue, order_size: u64) -> f64 {
        score_venue(venue, order_size)
    }
}

/// Baseline terms with caller supplied weights. 1.0/1.0 reproduces
/// `LatencyLiquidity` exactly. Weights are always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightRecord")]
pub struct WeightedScore {
    liquidity_weight: f64,
    latency_weight: f64,
}

impl Default for WeightedScore {
    fn default() -> Self {
        Self {
            liquidity_weight: 1.0,
            latency_weight: 1.0,
        }
    }
}

impl WeightedScore {
    pub fn new(liquidity_weight: f64, latency_weight: f64) -> SorResult<Self> {
        if !liquidity_weight.is_finite() || !latency_weight.is_finite() {
            return Err(SorError::Configuration {
                reason: format!(
                    "score weights must be finite, got liquidity {} latency {}",
                    liquidity_weight, latency_weight
                ),
            });
        }
        Ok(Self {
            liquidity_weight,
            latency_weight,
        })
    }

    pub fn liquidity_weight(&self) -> f64 {
        self.liquidity_weight
    }

    pub fn latency_weight(&self) -> f64 {
        self.latency_weight
    }

    fn weighted_terms(&self, venue: &Venue, order_size: u64) -> (f64, f64) {
        (
            self.liquidity_weight * liquidity_score(venue.depth(), order_size),
            self.latency_weight * latency_penalty(venue.latency_ms()),
        )
    }
}

impl ScoringStrategy for WeightedScore {
    fn name(&self) -> &str {
        "weighted"
    }

    fn score(&self, venue: &Venue, order_size: u64) -> f64 {
        let (liquidity, penalty) = self.weighted_terms(venue, order_size);
        liquidity - penalty
    }

    // report the weighted terms so they add up to the score
    fn breakdown(&self, venue: &Venue, order_size: u64) -> ScoreBreakdown {
        let (liquidity, penalty) = self.weighted_terms(venue, order_size);
        ScoreBreakdown {
            venue: venue.name().to_string(),
            liquidity_score: liquidity,
            latency_penalty: penalty,
            score: liquidity - penalty,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WeightRecord {
    liquidity_weight: f64,
    latency_weight: f64,
}

impl TryFrom<WeightRecord> for WeightedScore {
    type Error = SorError;

    fn try_from(record: WeightRecord) -> Result<Self, Self::Error> {
        WeightedScore::new(record.liquidity_weight, record.latency_weight)
    }
}

/// Per-venue score record for reports. never stored by the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub venue: String,
    pub liquidity_score: f64,
    pub latency_penalty: f64,
    pub score: f64,
}
