//! Smart order router simulation.
//!
//! Generates a seeded venue set, routes an order, optionally routes a batch
//! and a probed order, then renders the reports as text or JSON.

use anyhow::Result;
use clap::Parser;
use sor_core::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "sor-sim", about = "Latency-aware smart order router simulator")]
struct Args {
    /// Preset to start from
    #[arg(long, value_enum, default_value_t = Profile::Baseline)]
    profile: Profile,

    /// Number of venues to generate
    #[arg(long)]
    venues: Option<i64>,

    /// Generator seed
    #[arg(long)]
    seed: Option<u64>,

    /// Order size for the single routed order
    #[arg(long, allow_negative_numbers = true)]
    order_size: Option<i64>,

    /// Comma separated order sizes routed against the same snapshot
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    batch: Vec<i64>,

    /// Also route on concurrently probed latencies
    #[arg(long)]
    probe: bool,

    /// Probe deadline in milliseconds
    #[arg(long)]
    probe_timeout_ms: Option<u64>,

    /// Print reports as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> SimulationConfig {
        let mut config = self.profile.config();
        if let Some(venues) = self.venues {
            config.venue_count = venues;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(order_size) = self.order_size {
            config.order_size = order_size;
        }
        if let Some(timeout) = self.probe_timeout_ms {
            config.probe_timeout_ms = timeout;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "sor_core=info,sor_sim=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.config();
    info!(profile = ?args.profile, seed = config.seed, venues = config.venue_count, "starting simulation");

    let report = run_simulation(&config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !args.batch.is_empty() {
        let batch = run_batch(&config, &args.batch)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&batch)?);
        } else {
            print_batch(&batch);
        }
    }

    if args.probe {
        let probed = run_probed(&config, &SimulatedProbe::new()).await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&probed)?);
        } else {
            print_probed(&probed);
        }
    }

    Ok(())
}

fn print_venues(venues: &[Venue]) {
    println!("  {:<6} {:>12} {:>10} {:>8}", "venue", "latency ms", "price", "depth");
    for v in venues {
        println!(
            "  {:<6} {:>12.3} {:>10} {:>8}",
            v.name(),
            v.latency_ms(),
            v.price().round_dp(4).to_string(),
            v.depth()
        );
    }
}

fn print_report(report: &SimulationReport) {
    println!(
        "Simulated venues (seed {}, generated {}):\n",
        report.seed,
        report.generated_at.to_rfc3339()
    );
    print_venues(&report.venues);

    println!("\nScores for order size {} ({}):\n", report.order_size, report.strategy);
    for b in &report.ranking {
        println!(
            "  {:<6} liquidity {:.6}  latency penalty {:.6}  score {:.6}",
            b.venue, b.liquidity_score, b.latency_penalty, b.score
        );
    }

    println!(
        "\nOrder size {} chosen venue: {} latency ms: {:.3}\n",
        report.order_size,
        report.chosen_venue.name(),
        report.chosen_venue.latency_ms()
    );
}

fn print_batch(batch: &BatchReport) {
    println!("Batch of {} orders, {} routed:\n", batch.decisions.len(), batch.routed());
    for d in &batch.decisions {
        match (&d.chosen_venue, &d.error) {
            (Some(venue), _) => println!("  size {:>8} -> {}", d.order_size, venue),
            (None, Some(err)) => println!("  size {:>8} -> rejected: {}", d.order_size, err),
            (None, None) => println!("  size {:>8} -> no decision", d.order_size),
        }
    }
    println!();
}

fn print_probed(probed: &ProbedReport) {
    println!("Probed routing (deadline {}ms):\n", probed.probe_timeout_ms);
    println!(
        "  chosen {} at measured latency {:.3}ms",
        probed.chosen_venue.name(),
        probed.chosen_venue.latency_ms()
    );
    if !probed.timed_out.is_empty() {
        println!("  timed out: {}", probed.timed_out.join(", "));
    }
    for failure in &probed.failed {
        println!("  {}", failure);
    }
    println!();
}
