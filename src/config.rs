// 8.0 config.rs: simulation settings in one place. venue count, seed, order
// size, generator ranges, probe timeout.
// 8.1 Profile names the presets so the CLI can pick one before flag overrides.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{SorError, SorResult};
use crate::generator::GeneratorParams;
use crate::types::OrderSize;

/// Everything a single simulation run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of venues to generate
    pub venue_count: i64,
    /// Seed for the venue generator
    pub seed: u64,
    /// Order size routed by a single run
    pub order_size: i64,
    /// Attribute ranges for generated venues
    pub generator: GeneratorParams,
    /// Deadline for concurrent latency probes
    pub probe_timeout_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            venue_count: 5,
            seed: 42,
            order_size: 50,
            generator: GeneratorParams::default(),
            probe_timeout_ms: 25,
        }
    }
}

impl SimulationConfig {
    // fixed depth of 1000, latency 1..20ms, price 100 +/- 1
    pub fn baseline() -> Self {
        Self::default()
    }

    // depth varies per venue so liquidity competes with latency
    pub fn deep_book() -> Self {
        let mut config = Self::default();
        config.generator.depth = (500, 5000);
        config.order_size = 400;
        config
    }

    // many venues, long latency tail. some miss the probe deadline
    pub fn stress() -> Self {
        let mut config = Self::default();
        config.venue_count = 50;
        config.generator.latency_ms = (0.5, 80.0);
        config.generator.depth = (50, 2000);
        config.order_size = 250;
        config.probe_timeout_ms = 40;
        config
    }

    /// What generating the venue snapshot needs: a positive count and sane
    /// generator ranges. Order sizes are checked by the router.
    pub fn validate_snapshot(&self) -> SorResult<()> {
        if self.venue_count <= 0 {
            return Err(SorError::Configuration {
                reason: format!("venue_count must be positive, got {}", self.venue_count),
            });
        }
        self.generator.validate()
    }

    /// Probe deadline as a duration. zero would time out every venue.
    pub fn probe_timeout(&self) -> SorResult<Duration> {
        if self.probe_timeout_ms == 0 {
            return Err(SorError::Configuration {
                reason: "probe_timeout_ms must be positive".to_string(),
            });
        }
        Ok(Duration::from_millis(self.probe_timeout_ms))
    }

    /// Full check of every field. a non-positive order size is `InvalidInput`,
    /// the same error the router raises for it.
    pub fn validate(&self) -> SorResult<()> {
        self.validate_snapshot()?;
        OrderSize::new(self.order_size)?;
        self.probe_timeout()?;
        Ok(())
    }
}

/// Named presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    Baseline,
    DeepBook,
    Stress,
}

impl Profile {
    pub fn config(&self) -> SimulationConfig {
        match self {
            Profile::Baseline => SimulationConfig::baseline(),
            Profile::DeepBook => SimulationConfig::deep_book(),
            Profile::Stress => SimulationConfig::stress(),
        }
    }
}
