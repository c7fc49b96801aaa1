// sor-core: latency-aware smart order router simulator.
// scores each venue on depth vs. latency and picks the best one for an order.
// all routing computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: OrderSize, Timestamp
//   2.x  error.rs: SorError taxonomy
//   3.x  venue.rs: immutable venue record
//   4.x  generator.rs: seeded venue generation
//   5.x  scoring.rs: score terms, ScoringStrategy trait
//   6.x  router.rs: selection, tie-break, ranking, batch routing
//   7.x  probe.rs: concurrent latency probes with a deadline
//   8.x  config.rs: simulation settings, presets
//   9.x  simulation.rs: driver and reports

// core routing modules
pub mod error;
pub mod generator;
pub mod router;
pub mod scoring;
pub mod types;
pub mod venue;

// extensions and driver
pub mod config;
pub mod probe;
pub mod simulation;

// re exports for convenience
pub use error::*;
pub use generator::*;
pub use router::*;
pub use scoring::*;
pub use types::*;
pub use venue::*;
pub use config::{Profile, SimulationConfig};
pub use probe::{probe_venues, route_with_probes, LatencyProbe, ProbeBehavior, ProbeFailure, ProbeOutcome, ProbedRoute, SimulatedProbe};
pub use simulation::{
    generate_snapshot, run_batch, run_batch_with, run_probed, run_simulation, run_simulation_with, BatchReport,
    ProbedReport, RoutingDecision, SimulationReport,
};
