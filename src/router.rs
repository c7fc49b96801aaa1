// 6.0 router.rs: picks the best venue for an order.
// the router holds no mutable state. one instance can serve any number of
// concurrent calls against the same immutable venue slice.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{SorError, SorResult};
use crate::scoring::{LatencyLiquidity, ScoreBreakdown, ScoringStrategy};
use crate::types::OrderSize;
use crate::venue::Venue;

/// Route with the baseline strategy. Returns a borrow of the winning element
/// of `venues`.
pub fn route_order(venues: &[Venue], order_size: i64) -> SorResult<&Venue> {
    Router::new(LatencyLiquidity).route(venues, order_size)
}

// 6.1: input checks shared by every entry point. nothing is scored until both pass.
pub(crate) fn validate_request(venues: &[Venue], order_size: i64) -> SorResult<OrderSize> {
    if venues.is_empty() {
        return Err(SorError::InvalidInput {
            reason: "venue set is empty".to_string(),
        });
    }
    OrderSize::new(order_size)
}

/// 6.2: strategy-parameterised router.
#[derive(Debug, Clone)]
pub struct Router<S = LatencyLiquidity> {
    strategy: S,
}

impl<S: ScoringStrategy> Router<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Highest scoring venue. On equal scores the earliest venue in input
    /// order wins: the incumbent is only replaced by a strictly greater score.
    pub fn route<'a>(&self, venues: &'a [Venue], order_size: i64) -> SorResult<&'a Venue> {
        let size = validate_request(venues, order_size)?;
        let best = self.select(venues, size);

        info!(
            venue = %best.name(),
            order_size = size.value(),
            strategy = self.strategy.name(),
            candidates = venues.len(),
            "order routed"
        );
        Ok(best)
    }

    // caller guarantees venues is non-empty
    fn select<'a>(&self, venues: &'a [Venue], size: OrderSize) -> &'a Venue {
        let mut best = &venues[0];
        let mut best_score = self.strategy.score(best, size.value());
        debug!(venue = %best.name(), score = best_score, "scored venue");

        for venue in &venues[1..] {
            let score = self.strategy.score(venue, size.value());
            debug!(venue = %venue.name(), score, "scored venue");
            if score > best_score {
                best = venue;
                best_score = score;
            }
        }
        best
    }

    /// Every venue with its score terms, best first. The sort is stable so
    /// equal scores keep input order and the head matches `route`.
    pub fn rank(&self, venues: &[Venue], order_size: i64) -> SorResult<Vec<ScoreBreakdown>> {
        let size = validate_request(venues, order_size)?;
        let mut ranked: Vec<ScoreBreakdown> = venues
            .iter()
            .map(|v| self.strategy.breakdown(v, size.value()))
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(ranked)
    }

    /// Route many independent orders against one snapshot. Orders are scored
    /// in parallel; results come back in the order of `order_sizes`.
    pub fn route_batch<'a>(&self, venues: &'a [Venue], order_sizes: &[i64]) -> Vec<SorResult<&'a Venue>> {
        order_sizes
            .par_iter()
            .map(|&size| self.route(venues, size))
            .collect()
    }
}
