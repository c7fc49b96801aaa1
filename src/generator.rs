// 4.0 generator.rs: reproducible randomized venue sets.
// the random source is always supplied by the caller. nothing here touches
// thread_rng or any other process-wide state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SorError, SorResult};
use crate::venue::Venue;

// prices are quoted in 0.0001 ticks
const PRICE_SCALE: u32 = 4;

/// 4.1: attribute ranges for generated venues. all ranges inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorParams {
    /// Simulated latency range in milliseconds
    pub latency_ms: (f64, f64),
    /// Centre of the quoted price band
    pub price_base: Decimal,
    /// Half width of the price band
    pub price_spread: Decimal,
    /// Depth range (min == max gives a fixed depth)
    pub depth: (u64, u64),
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            latency_ms: (1.0, 20.0),
            price_base: dec!(100),
            price_spread: dec!(1),
            depth: (1000, 1000),
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> SorResult<()> {
        let (lat_min, lat_max) = self.latency_ms;
        if !lat_min.is_finite() || !lat_max.is_finite() || lat_min < 0.0 {
            return Err(SorError::Configuration {
                reason: format!("latency range must be finite and >= 0, got [{}, {}]", lat_min, lat_max),
            });
        }
        if lat_min > lat_max {
            return Err(SorError::Configuration {
                reason: format!("latency range is inverted: [{}, {}]", lat_min, lat_max),
            });
        }
        if self.price_spread < Decimal::ZERO {
            return Err(SorError::Configuration {
                reason: format!("price spread must be >= 0, got {}", self.price_spread),
            });
        }
        // both band edges must be representable
        let offset = Decimal::new(self.spread_ticks()?, PRICE_SCALE);
        if self.price_base.checked_sub(offset).is_none() || self.price_base.checked_add(offset).is_none() {
            return Err(SorError::Configuration {
                reason: format!("price band {} +/- {} overflows", self.price_base, self.price_spread),
            });
        }
        if self.depth.0 > self.depth.1 {
            return Err(SorError::Configuration {
                reason: format!("depth range is inverted: [{}, {}]", self.depth.0, self.depth.1),
            });
        }
        if self.depth.1 > i64::MAX as u64 {
            return Err(SorError::Configuration {
                reason: format!("depth {} exceeds the supported maximum", self.depth.1),
            });
        }
        Ok(())
    }

    // spread expressed in whole ticks. a spread finer than one tick is rejected
    fn spread_ticks(&self) -> SorResult<i64> {
        let out_of_range = || SorError::Configuration {
            reason: format!("price spread {} is out of range", self.price_spread),
        };
        let scaled = self
            .price_spread
            .checked_mul(Decimal::from(10i64.pow(PRICE_SCALE)))
            .ok_or_else(out_of_range)?;
        if !scaled.fract().is_zero() {
            return Err(SorError::Configuration {
                reason: format!("price spread {} is not a whole number of 0.0001 ticks", self.price_spread),
            });
        }
        i64::try_from(scaled).map_err(|_| out_of_range())
    }
}

/// 4.2: venue generator. stateless apart from its params, so one instance can
/// feed many runs with different random sources.
#[derive(Debug, Clone, Default)]
pub struct VenueGenerator {
    params: GeneratorParams,
}

impl VenueGenerator {
    pub fn new(params: GeneratorParams) -> Self {
        Self { params }
    }

    /// Draw `n` venues named V0..V(n-1) in generation order.
    pub fn generate<R: Rng>(&self, n: i64, rng: &mut R) -> SorResult<Vec<Venue>> {
        if n <= 0 {
            return Err(SorError::Configuration {
                reason: format!("venue count must be positive, got {}", n),
            });
        }
        self.params.validate()?;

        let (lat_min, lat_max) = self.params.latency_ms;
        let (depth_min, depth_max) = self.params.depth;
        let spread_ticks = self.params.spread_ticks()?;

        let mut venues = Vec::with_capacity(n as usize);
        for i in 0..n {
            let latency_ms = rng.gen_range(lat_min..=lat_max);
            let ticks = rng.gen_range(-spread_ticks..=spread_ticks);
            let price = self
                .params
                .price_base
                .checked_add(Decimal::new(ticks, PRICE_SCALE))
                .ok_or_else(|| SorError::Configuration {
                    reason: format!("price {} + {} ticks overflows", self.params.price_base, ticks),
                })?;
            let depth = rng.gen_range(depth_min..=depth_max);

            let venue = Venue::new(format!("V{}", i), latency_ms, price, depth as i64)?;
            debug!(venue = %venue.name(), latency_ms, %price, depth, "generated venue");
            venues.push(venue);
        }

        Ok(venues)
    }
}

/// Seeded convenience entry point. Same `(n, seed)` always yields the same venues.
pub fn generate_venues(n: i64, seed: u64) -> SorResult<Vec<Venue>> {
    let mut rng = StdRng::seed_from_u64(seed);
    VenueGenerator::default().generate(n, &mut rng)
}
