//! Supply-chain market simulation - Main binary
//!
//! Loads warehouses, market events and sentiment, then either serves the
//! dashboard API or runs a fixed number of ticks headless.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   TickData (broadcast)   ┌────────────────┐
//! │   Scheduler    │ ───────────────────────► │  Axum server   │
//! │  (tokio task)  │                          │  REST + /ws    │
//! │                │ ◄─────────────────────── │                │
//! └────────────────┘   SimCommand (mpsc)      └────────────────┘
//!         ▲
//!         │ LiveSnapshot (optional)
//!   live WebSocket
//! ```
//!
//! The served simulation starts paused unless `--autostart` is given.
//!
//! # Headless Mode
//!
//! Run `--headless` to skip the server and step the engine back to back.
//! Useful for benchmarks, CI, and reproducible seeded runs.

mod config;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use server::{BroadcastHook, ServerState};
use simulation::{MetricsHook, Scheduler, SimCommand, Simulation, SimulationContext};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use types::SimulationSpeed;

pub use config::SimConfig;

/// Supply-chain market simulation with a live dashboard API
#[derive(Parser, Debug)]
#[command(name = "supply-sim")]
#[command(about = "A supply-chain market simulation with a live dashboard API")]
#[command(version)]
struct Args {
    /// Run without the server and exit after --ticks ticks
    #[arg(long, env = "SIM_HEADLESS")]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, env = "SIM_TICKS")]
    ticks: Option<u64>,

    /// RNG seed for reproducible runs
    #[arg(long, env = "SIM_SEED")]
    seed: Option<u64>,

    /// Initial speed (1x, 2x, 4x, 8x)
    #[arg(long, env = "SIM_SPEED")]
    speed: Option<SimulationSpeed>,

    /// Data API base URL (built-in seed data when absent)
    #[arg(long, env = "SIM_API_URL")]
    api_url: Option<String>,

    /// Live stock WebSocket URL
    #[arg(long, env = "SIM_LIVE_URL")]
    live_url: Option<String>,

    /// Server port
    #[arg(long, env = "SIM_PORT")]
    port: Option<u16>,

    /// Server host
    #[arg(long, env = "SIM_HOST")]
    host: Option<String>,

    /// Market event id to select before the first tick
    #[arg(long, env = "SIM_EVENT")]
    event: Option<String>,

    /// Start running immediately
    #[arg(long, env = "SIM_AUTOSTART")]
    autostart: bool,
}

impl Args {
    /// Layer CLI/env overrides on top of the defaults.
    fn into_config(self) -> SimConfig {
        let mut config = SimConfig::default();

        if let Some(ticks) = self.ticks {
            config = config.with_ticks(ticks);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(speed) = self.speed {
            config = config.with_speed(speed);
        }
        if let Some(url) = self.api_url {
            config = config.with_api_url(url);
        }
        if let Some(url) = self.live_url {
            config = config.with_live_url(url);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        config.initial_event = self.event;
        config.autostart = self.autostart;
        config
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let headless = args.headless;
    let config = args.into_config();

    info!(
        mode = if headless { "headless" } else { "served" },
        seed = ?config.seed,
        speed = %config.speed,
        api_url = config.api_url.as_deref().unwrap_or("<seed data>"),
        live_url = config.live_url.as_deref().unwrap_or("<none>"),
        "Starting supply-chain simulation"
    );

    // ─────────────────────────────────────────────────────────────────────────
    // Load initial data (all-or-nothing)
    // ─────────────────────────────────────────────────────────────────────────
    let source = config.data_source()?;
    let data = match feed::load_all(source.as_ref()).await {
        Ok(data) => data,
        Err(e) => {
            error!(source = source.name(), error = %e, "Failed to load initial data");
            return Err(e).context("loading initial data");
        }
    };

    let mut sim = Simulation::from_initial_data(config.simulation_config(), data);
    if let Some(event_id) = &config.initial_event {
        sim.toggle_event(event_id)
            .with_context(|| format!("selecting initial event '{event_id}'"))?;
    }

    if headless {
        run_headless(sim, &config);
        Ok(())
    } else {
        run_served(sim, config).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Headless
// ─────────────────────────────────────────────────────────────────────────────

/// Step the engine `total_ticks` times, interleaving the aggregator and route
/// updates at the ratio their cadences would have at the configured speed.
fn run_headless(mut sim: Simulation, config: &SimConfig) {
    let total_ticks = config.total_ticks;
    let sentiment_every = config.ticks_per_sentiment();
    let routes_every = config.ticks_per_route_update();

    let stats = Arc::new(MetricsHook::new());
    sim.add_hook(stats.clone());
    sim.set_running(true);

    info!(total_ticks, "Running headless");
    let start = Instant::now();

    for _ in 0..total_ticks {
        let tick = sim.step();
        if tick % sentiment_every == 0 {
            sim.step_sentiment();
        }
        if tick % routes_every == 0 {
            sim.step_routes();
        }

        // Progress every 10%
        if tick % (total_ticks / 10).max(1) == 0 {
            info!(
                tick,
                pct = tick * 100 / total_ticks,
                stock = sim.metrics().current_stock,
                "Progress"
            );
        }
    }

    let elapsed = start.elapsed();
    let m = stats.snapshot();
    let snapshot = sim.snapshot();
    info!(
        ticks = m.total_ticks,
        elapsed_secs = elapsed.as_secs_f64(),
        rate = m.total_ticks as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        "Simulation complete"
    );
    info!(
        final_stock = snapshot.metrics.current_stock,
        peak_stock = m.peak_stock,
        min_stock = m.min_stock,
        avg_utilization = m.avg_utilization,
        portfolio_sentiment = snapshot.portfolio_sentiment,
        delayed_routes = snapshot.route_summary.delayed_routes,
        "Final state"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Served
// ─────────────────────────────────────────────────────────────────────────────

async fn run_served(sim: Simulation, config: SimConfig) -> anyhow::Result<()> {
    let ctx = SimulationContext::new(sim);
    let (tick_tx, _) = broadcast::channel(config.frame_buffer);
    let run_stats = Arc::new(MetricsHook::new());

    let mut scheduler = Scheduler::new(ctx.clone());
    if let Some(live) = config.live_feed() {
        scheduler = scheduler.with_live_feed(live);
    }
    let scheduler = scheduler.spawn();

    let state = ServerState::new(tick_tx.clone(), scheduler.sender(), ctx.clone())
        .with_run_stats(run_stats.clone());
    ctx.add_hook(run_stats);
    ctx.add_hook(Arc::new(BroadcastHook::new(tick_tx, state.metrics.clone())));

    if config.autostart {
        scheduler.send(SimCommand::Start).await?;
    }

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    server::serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
    })
    .await
    .context("serving dashboard API")?;

    scheduler.shutdown().await;
    info!(tick = ctx.tick(), "Stopped");
    Ok(())
}
