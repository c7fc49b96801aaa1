// 9.0 simulation.rs: the driver. generate -> route -> report.
// no business logic lives here and nothing is printed. callers render or
// serialize the returned reports.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::config::SimulationConfig;
use crate::error::{SorError, SorResult};
use crate::generator::VenueGenerator;
use crate::probe::LatencyProbe;
use crate::router::Router;
use crate::scoring::{LatencyLiquidity, ScoreBreakdown, ScoringStrategy};
use crate::types::Timestamp;
use crate::venue::Venue;

/// 9.1: outcome of routing one order against a fresh venue set.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub generated_at: Timestamp,
    pub seed: u64,
    pub strategy: String,
    pub venues: Vec<Venue>,
    pub order_size: i64,
    pub chosen_venue: Venue,
    /// All venues best first
    pub ranking: Vec<ScoreBreakdown>,
}

/// 9.2: one order of a batch. exactly one of `chosen_venue` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    pub order_size: i64,
    pub chosen_venue: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: Timestamp,
    pub seed: u64,
    pub strategy: String,
    pub venues: Vec<Venue>,
    pub decisions: Vec<RoutingDecision>,
}

impl BatchReport {
    pub fn routed(&self) -> usize {
        self.decisions.iter().filter(|d| d.chosen_venue.is_some()).count()
    }
}

/// 9.3: a single order routed on probed latencies.
#[derive(Debug, Clone, Serialize)]
pub struct ProbedReport {
    pub generated_at: Timestamp,
    pub seed: u64,
    pub venues: Vec<Venue>,
    pub order_size: i64,
    pub probe_timeout_ms: u64,
    /// Winner with its measured latency
    pub chosen_venue: Venue,
    pub timed_out: Vec<String>,
    pub failed: Vec<String>,
}

/// Generate the run's venue snapshot from the configured seed.
pub fn generate_snapshot(config: &SimulationConfig) -> SorResult<Vec<Venue>> {
    config.validate_snapshot()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    VenueGenerator::new(config.generator.clone()).generate(config.venue_count, &mut rng)
}

/// One end-to-end run with the given router.
pub fn run_simulation_with<S: ScoringStrategy>(
    config: &SimulationConfig,
    router: &Router<S>,
) -> SorResult<SimulationReport> {
    let venues = generate_snapshot(config)?;
    let chosen_venue = router.route(&venues, config.order_size)?.clone();
    let ranking = router.rank(&venues, config.order_size)?;

    info!(
        seed = config.seed,
        venues = venues.len(),
        order_size = config.order_size,
        chosen = %chosen_venue.name(),
        "simulation complete"
    );

    Ok(SimulationReport {
        generated_at: Timestamp::now(),
        seed: config.seed,
        strategy: router.strategy().name().to_string(),
        venues,
        order_size: config.order_size,
        chosen_venue,
        ranking,
    })
}

/// One end-to-end run with the baseline strategy.
pub fn run_simulation(config: &SimulationConfig) -> SorResult<SimulationReport> {
    run_simulation_with(config, &Router::new(LatencyLiquidity))
}

/// Route many orders against a single snapshot. Per-order failures are
/// recorded in the report; only config and generation errors fail the call.
pub fn run_batch_with<S: ScoringStrategy>(
    config: &SimulationConfig,
    router: &Router<S>,
    order_sizes: &[i64],
) -> SorResult<BatchReport> {
    if order_sizes.is_empty() {
        return Err(SorError::InvalidInput {
            reason: "batch has no orders".to_string(),
        });
    }
    let venues = generate_snapshot(config)?;

    let decisions: Vec<RoutingDecision> = router
        .route_batch(&venues, order_sizes)
        .into_iter()
        .zip(order_sizes)
        .map(|(result, &order_size)| match result {
            Ok(venue) => RoutingDecision {
                order_size,
                chosen_venue: Some(venue.name().to_string()),
                error: None,
            },
            Err(e) => RoutingDecision {
                order_size,
                chosen_venue: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    let report = BatchReport {
        generated_at: Timestamp::now(),
        seed: config.seed,
        strategy: router.strategy().name().to_string(),
        venues,
        decisions,
    };
    info!(
        seed = config.seed,
        orders = order_sizes.len(),
        routed = report.routed(),
        "batch complete"
    );
    Ok(report)
}

pub fn run_batch(config: &SimulationConfig, order_sizes: &[i64]) -> SorResult<BatchReport> {
    run_batch_with(config, &Router::new(LatencyLiquidity), order_sizes)
}

/// Route the configured order on probed latencies.
pub async fn run_probed<P>(config: &SimulationConfig, probe: &P) -> SorResult<ProbedReport>
where
    P: LatencyProbe + ?Sized,
{
    let timeout = config.probe_timeout()?;
    let venues = generate_snapshot(config)?;
    let routed = Router::new(LatencyLiquidity)
        .route_with_probes(&venues, config.order_size, probe, timeout)
        .await?;

    Ok(ProbedReport {
        generated_at: Timestamp::now(),
        seed: config.seed,
        venues,
        order_size: config.order_size,
        probe_timeout_ms: config.probe_timeout_ms,
        chosen_venue: routed.chosen,
        timed_out: routed.outcome.timed_out,
        failed: routed.outcome.failed.into_iter().map(|f| f.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_venues;

    #[test]
    fn snapshot_matches_seeded_generator() {
        let config = SimulationConfig::default();
        assert_eq!(generate_snapshot(&config).unwrap(), generate_venues(5, 42).unwrap());
    }

    #[test]
    fn report_chosen_is_in_snapshot() {
        let report = run_simulation(&SimulationConfig::default()).unwrap();
        assert_eq!(report.venues.len(), 5);
        assert!(report.venues.contains(&report.chosen_venue));
        assert_eq!(report.ranking[0].venue, report.chosen_venue.name());
        assert_eq!(report.strategy, "latency-liquidity");
    }

    #[test]
    fn invalid_config_stops_run() {
        let mut config = SimulationConfig::default();
        config.venue_count = 0;
        assert!(matches!(run_simulation(&config), Err(SorError::Configuration { .. })));
    }

    #[test]
    fn non_positive_order_size_is_invalid_input() {
        let mut config = SimulationConfig::default();
        config.order_size = 0;
        assert!(matches!(run_simulation(&config), Err(SorError::InvalidInput { .. })));
    }

    #[test]
    fn batch_ignores_single_order_fields() {
        let mut config = SimulationConfig::default();
        config.order_size = 0;
        config.probe_timeout_ms = 0;
        let report = run_batch(&config, &[10, 20]).unwrap();
        assert_eq!(report.routed(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn probed_run_rejects_zero_timeout() {
        let mut config = SimulationConfig::default();
        config.probe_timeout_ms = 0;
        let err = run_probed(&config, &crate::probe::SimulatedProbe::new()).await.unwrap_err();
        assert!(matches!(err, SorError::Configuration { .. }));
    }

    #[test]
    fn batch_records_per_order_errors() {
        let report = run_batch(&SimulationConfig::default(), &[10, -4, 500]).unwrap();
        assert_eq!(report.decisions.len(), 3);
        assert_eq!(report.routed(), 2);
        assert!(report.decisions[1].error.is_some());
        assert!(report.decisions[1].chosen_venue.is_none());
    }

    #[test]
    fn empty_batch_rejected() {
        assert!(matches!(
            run_batch(&SimulationConfig::default(), &[]),
            Err(SorError::InvalidInput { .. })
        ));
    }
}
