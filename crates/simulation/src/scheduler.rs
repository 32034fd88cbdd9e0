//! Cooperative scheduler driving the simulation in real time.
//!
//! One tokio task owns every timer and the live channel:
//!
//! ```text
//!                 ┌──────────────── select! ────────────────┐
//!  SimCommand ───▶│ command   ──▶ start / pause / speed ...  │
//!                 │ tick      ──▶ ctx.step()                 │
//!                 │ sentiment ──▶ ctx.step_sentiment()       │
//!                 │ routes    ──▶ ctx.step_routes()          │
//!  LiveFeed   ───▶│ live      ──▶ ctx.apply_live_snapshot()  │
//!                 └──────────────────────────────────────────┘
//! ```
//!
//! While paused there are no timers and no live channel, so nothing mutates
//! state except an explicit [`SimCommand::Step`].

use std::future;
use std::time::Duration;

use feed::{LiveFeed, LiveFeedConfig, LiveMessage};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};
use types::SimulationSpeed;

use crate::context::SimulationContext;
use crate::error::{Result, SimError};

/// Buffer size for the command channel.
const COMMAND_BUFFER: usize = 64;

// =============================================================================
// SimCommand
// =============================================================================

/// Commands accepted by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimCommand {
    /// Start or resume.
    Start,
    /// Pause: drop timers and close the live channel.
    Pause,
    /// Toggle between running and paused.
    Toggle,
    /// Apply one tick (only while paused).
    Step,
    /// Restore the seed state. Leaves the simulation paused.
    Reset,
    /// Change the tick cadence.
    SetSpeed(SimulationSpeed),
    /// Select an event, or deselect it if already active.
    ToggleEvent(String),
    /// Clear the active event.
    ClearEvent,
    /// End the scheduler task. Sent by [`SchedulerHandle::shutdown`].
    Quit,
}

impl SimCommand {
    /// Whether clients outside the process may send this command.
    ///
    /// `Quit` is reserved for the owner of the [`SchedulerHandle`].
    pub fn is_client_command(&self) -> bool {
        !matches!(self, SimCommand::Quit)
    }
}

// =============================================================================
// Scheduler
// =============================================================================

#[derive(Default)]
struct Timers {
    tick: Option<Interval>,
    sentiment: Option<Interval>,
    routes: Option<Interval>,
}

impl Timers {
    fn is_active(&self) -> bool {
        self.tick.is_some()
    }
}

/// Builder for the scheduler task.
pub struct Scheduler {
    ctx: SimulationContext,
    live_config: Option<LiveFeedConfig>,
    sentiment_interval: Duration,
    route_interval: Duration,
}

impl Scheduler {
    /// Scheduler over `ctx`, using the cadences from its config.
    pub fn new(ctx: SimulationContext) -> Self {
        let (sentiment_interval, route_interval) = ctx.read(|sim| {
            (
                sim.config().sentiment_interval,
                sim.config().route_interval,
            )
        });
        Self {
            ctx,
            live_config: None,
            sentiment_interval,
            route_interval,
        }
    }

    /// Open a live channel with `config` whenever the simulation runs.
    pub fn with_live_feed(mut self, config: LiveFeedConfig) -> Self {
        self.live_config = Some(config);
        self
    }

    /// Spawn the scheduler task.
    pub fn spawn(self) -> SchedulerHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let handle = tokio::spawn(self.run(cmd_rx));
        SchedulerHandle { cmd_tx, handle }
    }

    async fn run(self, mut cmd_rx: mpsc::Receiver<SimCommand>) {
        let mut timers = Timers::default();
        let mut live: Option<LiveFeed> = None;

        if self.ctx.is_running() {
            self.start(&mut timers, &mut live);
        }
        info!(running = timers.is_active(), "Scheduler started");

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else {
                        debug!("Command channel closed");
                        break;
                    };
                    if cmd == SimCommand::Quit {
                        break;
                    }
                    self.apply(cmd, &mut timers, &mut live).await;
                }
                _ = next_tick(&mut timers.tick) => {
                    self.ctx.step();
                }
                _ = next_tick(&mut timers.sentiment) => {
                    self.ctx.step_sentiment();
                }
                _ = next_tick(&mut timers.routes) => {
                    self.ctx.step_routes();
                }
                msg = next_live(&mut live) => {
                    self.handle_live(msg, &mut live);
                }
            }
        }

        self.stop(&mut timers, &mut live).await;
        info!(tick = self.ctx.tick(), "Scheduler stopped");
    }

    async fn apply(
        &self,
        cmd: SimCommand,
        timers: &mut Timers,
        live: &mut Option<LiveFeed>,
    ) {
        debug!(?cmd, "Command received");
        match cmd {
            SimCommand::Start => {
                self.ctx.set_running(true);
                if !timers.is_active() {
                    self.start(timers, live);
                }
            }
            SimCommand::Pause => {
                self.ctx.set_running(false);
                self.stop(timers, live).await;
            }
            SimCommand::Toggle => {
                if self.ctx.toggle_running() {
                    self.start(timers, live);
                } else {
                    self.stop(timers, live).await;
                }
            }
            SimCommand::Step => {
                if self.ctx.is_running() {
                    debug!("Step ignored while running");
                } else {
                    self.ctx.step();
                }
            }
            SimCommand::Reset => {
                self.ctx.reset();
                self.stop(timers, live).await;
            }
            SimCommand::SetSpeed(speed) => {
                // Restart the tick timer so the next tick lands one new period from now.
                if self.ctx.set_speed(speed) && timers.is_active() {
                    timers.tick = Some(periodic(speed.interval()));
                }
            }
            SimCommand::ToggleEvent(event_id) => {
                if let Err(e) = self.ctx.toggle_event(&event_id) {
                    warn!(error = %e, "Event toggle rejected");
                }
            }
            SimCommand::ClearEvent => {
                self.ctx.clear_event();
            }
            SimCommand::Quit => {}
        }
    }

    fn start(&self, timers: &mut Timers, live: &mut Option<LiveFeed>) {
        timers.tick = Some(periodic(self.ctx.speed().interval()));
        timers.sentiment = Some(periodic(self.sentiment_interval));
        timers.routes = Some(periodic(self.route_interval));

        if live.is_none()
            && let Some(config) = &self.live_config
        {
            info!(url = %config.url, "Opening live channel");
            *live = Some(LiveFeed::connect(config.clone()));
        }
    }

    async fn stop(&self, timers: &mut Timers, live: &mut Option<LiveFeed>) {
        *timers = Timers::default();
        if let Some(feed) = live.take() {
            feed.close().await;
            self.ctx.set_live_connected(false);
        }
    }

    fn handle_live(&self, msg: Option<LiveMessage>, live: &mut Option<LiveFeed>) {
        match msg {
            Some(LiveMessage::Connected) => {
                info!("Live channel connected");
                self.ctx.set_live_connected(true);
            }
            Some(LiveMessage::Snapshot(snapshot)) => {
                if let Err(e) = self.ctx.apply_live_snapshot(&snapshot) {
                    warn!(error = %e, "Live snapshot ignored");
                }
            }
            Some(LiveMessage::Disconnected(e)) => {
                warn!(error = %e, "Live channel lost, continuing with local simulation");
                self.ctx.set_live_connected(false);
            }
            None => {
                warn!("Live channel ended");
                self.ctx.set_live_connected(false);
                *live = None;
            }
        }
    }
}

/// Interval whose first tick is one full `period` from now.
fn periodic(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending::<()>().await,
    }
}

async fn next_live(feed: &mut Option<LiveFeed>) -> Option<LiveMessage> {
    match feed {
        Some(feed) => feed.recv().await,
        None => future::pending().await,
    }
}

// =============================================================================
// SchedulerHandle
// =============================================================================

/// Handle to a spawned scheduler.
pub struct SchedulerHandle {
    cmd_tx: mpsc::Sender<SimCommand>,
    handle: JoinHandle<()>,
}

impl SchedulerHandle {
    /// A sender for other producers, e.g. the server.
    pub fn sender(&self) -> mpsc::Sender<SimCommand> {
        self.cmd_tx.clone()
    }

    pub async fn send(&self, cmd: SimCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| SimError::SchedulerClosed)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Send [`SimCommand::Quit`] and wait for the task to end.
    pub async fn shutdown(self) {
        if self.cmd_tx.send(SimCommand::Quit).await.is_err() {
            debug!("Scheduler already stopped");
        }
        self.join().await;
    }

    /// Wait for the task to end.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Scheduler task failed");
        }
    }
}
