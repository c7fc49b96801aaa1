//! Concurrent venue probing.
//!
//! In a live router each venue's latency comes from a timed round-trip. This
//! module launches one probe per venue, waits for all of them or for a shared
//! timeout, and routes only among venues that answered in time. A venue that
//! misses the deadline is excluded from selection; it never holds up the
//! decision.

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{SorError, SorResult};
use crate::router::{validate_request, Router};
use crate::scoring::{LatencyLiquidity, ScoringStrategy};
use crate::venue::Venue;

/// A probe that did not complete normally.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("probe to {venue} failed: {reason}")]
pub struct ProbeFailure {
    pub venue: String,
    pub reason: String,
}

/// One round-trip to a venue. The caller times the call, so implementors
/// only need to resolve when the venue has answered.
#[async_trait]
pub trait LatencyProbe: Send + Sync {
    async fn probe(&self, venue: &Venue) -> Result<(), ProbeFailure>;
}

/// Scripted behaviour for a single venue in a `SimulatedProbe`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeBehavior {
    /// Answer after the given delay instead of the venue's own latency.
    Stall(Duration),
    /// Fail immediately with the given reason.
    Fail(String),
}

/// Probe that answers after each venue's simulated latency, with optional
/// per-venue overrides. No network I/O.
#[derive(Debug, Clone, Default)]
pub struct SimulatedProbe {
    overrides: HashMap<String, ProbeBehavior>,
}

impl SimulatedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stall(mut self, venue: impl Into<String>, delay: Duration) -> Self {
        self.overrides.insert(venue.into(), ProbeBehavior::Stall(delay));
        self
    }

    pub fn with_failure(mut self, venue: impl Into<String>, reason: impl Into<String>) -> Self {
        self.overrides.insert(venue.into(), ProbeBehavior::Fail(reason.into()));
        self
    }
}

#[async_trait]
impl LatencyProbe for SimulatedProbe {
    async fn probe(&self, venue: &Venue) -> Result<(), ProbeFailure> {
        let delay = match self.overrides.get(venue.name()) {
            Some(ProbeBehavior::Stall(delay)) => *delay,
            Some(ProbeBehavior::Fail(reason)) => {
                return Err(ProbeFailure {
                    venue: venue.name().to_string(),
                    reason: reason.clone(),
                })
            }
            None => Duration::from_secs_f64(venue.latency_ms() / 1000.0),
        };
        tokio::time::sleep(delay).await;
        Ok(())
    }
}

/// Result of probing a venue set.
#[derive(Debug, Clone, Default)]
pub struct ProbeOutcome {
    /// Venues that answered in time, latency replaced by the measured
    /// round-trip. Input order is kept.
    pub answered: Vec<Venue>,
    pub timed_out: Vec<String>,
    pub failed: Vec<ProbeFailure>,
}

enum ProbeStatus {
    Answered(Venue),
    TimedOut(String),
    Failed(ProbeFailure),
}

/// Probe every venue concurrently. Returns once all probes have resolved or
/// `timeout` has elapsed, whichever comes first.
pub async fn probe_venues<P>(venues: &[Venue], probe: &P, timeout: Duration) -> ProbeOutcome
where
    P: LatencyProbe + ?Sized,
{
    let probes = venues.iter().map(move |venue| async move {
        let started = Instant::now();
        match tokio::time::timeout(timeout, probe.probe(venue)).await {
            Ok(Ok(())) => {
                let measured_ms = started.elapsed().as_secs_f64() * 1000.0;
                match venue.with_latency(measured_ms) {
                    Ok(probed) => ProbeStatus::Answered(probed),
                    Err(e) => ProbeStatus::Failed(ProbeFailure {
                        venue: venue.name().to_string(),
                        reason: e.to_string(),
                    }),
                }
            }
            Ok(Err(failure)) => ProbeStatus::Failed(failure),
            Err(_) => ProbeStatus::TimedOut(venue.name().to_string()),
        }
    });

    let mut outcome = ProbeOutcome::default();
    for status in join_all(probes).await {
        match status {
            ProbeStatus::Answered(venue) => {
                debug!(venue = %venue.name(), latency_ms = venue.latency_ms(), "probe answered");
                outcome.answered.push(venue);
            }
            ProbeStatus::TimedOut(name) => {
                warn!(venue = %name, timeout_ms = millis(timeout), "probe timed out");
                outcome.timed_out.push(name);
            }
            ProbeStatus::Failed(failure) => {
                warn!(venue = %failure.venue, reason = %failure.reason, "probe failed");
                outcome.failed.push(failure);
            }
        }
    }
    outcome
}

// whole milliseconds, saturating at u64::MAX
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// A routing decision made on probed latencies.
#[derive(Debug, Clone)]
pub struct ProbedRoute {
    /// Winning venue, carrying its measured latency.
    pub chosen: Venue,
    pub outcome: ProbeOutcome,
}

impl<S: ScoringStrategy> Router<S> {
    /// Probe all venues, then route among those that answered within
    /// `timeout`. Fails with `Timeout` when none did.
    pub async fn route_with_probes<P>(
        &self,
        venues: &[Venue],
        order_size: i64,
        probe: &P,
        timeout: Duration,
    ) -> SorResult<ProbedRoute>
    where
        P: LatencyProbe + ?Sized,
    {
        validate_request(venues, order_size)?;

        let outcome = probe_venues(venues, probe, timeout).await;
        if outcome.answered.is_empty() {
            return Err(SorError::Timeout {
                timeout_ms: millis(timeout),
                venues: venues.len(),
            });
        }

        let chosen = self.route(&outcome.answered, order_size)?.clone();
        info!(
            venue = %chosen.name(),
            answered = outcome.answered.len(),
            timed_out = outcome.timed_out.len(),
            failed = outcome.failed.len(),
            "routed on probed latencies"
        );
        Ok(ProbedRoute { chosen, outcome })
    }
}

/// Baseline-strategy shorthand for `Router::route_with_probes`.
pub async fn route_with_probes<P>(
    venues: &[Venue],
    order_size: i64,
    probe: &P,
    timeout: Duration,
) -> SorResult<ProbedRoute>
where
    P: LatencyProbe + ?Sized,
{
    Router::new(LatencyLiquidity)
        .route_with_probes(venues, order_size, probe, timeout)
        .await
}
