//! repgated - The repgate daemon
//!
//! Wires together:
//! - Configuration loading
//! - The shared access controller and target resolver
//! - A blocking adapter fed with every changed resolution
//! - Line commands on stdin, JSON event lines on stdout

mod adapter;
mod commands;
mod events;

use anyhow::{Context, Result};
use clap::Parser;
use repgate_api::{AccessSnapshot, Event, EventPayload, Resolution};
use repgate_config::{Policy, load_config};
use repgate_core::{
    AccessController, AccessEvent, AccessResult, AllOrNothingResolver, ControllerConfig,
    SharedController, derive_screen,
};
use repgate_host_api::BlockingAdapter;
use repgate_util::{Timestamp, default_config_path, format_duration};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapter::LogBlocker;
use crate::commands::Command;
use crate::events::{occurred_at, to_payload};

/// repgated - Earn screen time with exercise
#[derive(Parser, Debug)]
#[command(name = "repgated")]
#[command(about = "Workout-gated screen-time access control", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/repgate/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Tick interval override in milliseconds
    #[arg(short, long, env = "REPGATE_TICK_MS")]
    tick_ms: Option<u64>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print every event as a JSON line on stdout
    #[arg(long)]
    json: bool,
}

/// The only place the daemon reads the wall clock
fn observe_clock() -> Timestamp {
    Timestamp::from_datetime(&repgate_util::now())
}

enum Flow {
    Continue,
    Quit,
}

/// Main service state
struct Service {
    controller: SharedController,
    policy: Policy,
    resolver: AllOrNothingResolver,
    blocker: Arc<dyn BlockingAdapter>,
    tick_interval: Duration,
    json: bool,
    /// Last resolution the blocker accepted
    applied: Option<Resolution>,
}

impl Service {
    fn from_args(args: &Args) -> Result<Self> {
        let policy = load_config(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        info!(
            config_path = %args.config.display(),
            workouts = policy.workouts.len(),
            targets = policy.targets.len(),
            "Configuration loaded"
        );

        let tick_interval = match args.tick_ms {
            Some(0) => anyhow::bail!("--tick-ms must be greater than 0"),
            Some(ms) => Duration::from_millis(ms),
            None => policy.daemon.tick_interval,
        };

        let blocker: Arc<dyn BlockingAdapter> = Arc::new(LogBlocker::new());
        info!(
            platform = %blocker.capabilities().platform,
            per_target = blocker.capabilities().can_block_per_target,
            "Blocking adapter initialized"
        );

        Ok(Self::new(policy, blocker, tick_interval, args.json))
    }

    fn new(
        policy: Policy,
        blocker: Arc<dyn BlockingAdapter>,
        tick_interval: Duration,
        json: bool,
    ) -> Self {
        let config = ControllerConfig::new(policy.access.grace_period_seconds)
            .with_time_policy(policy.access.time_policy)
            .with_warnings(policy.access.warnings.clone());

        Self {
            controller: SharedController::new(AccessController::new(config)),
            policy,
            resolver: AllOrNothingResolver,
            blocker,
            tick_interval,
            json,
            applied: None,
        }
    }

    async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;

        let mut tick_timer = tokio::time::interval(self.tick_interval);
        tick_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let now = observe_clock();
        self.report_status(now)?;
        self.sync_targets(now).await?;

        info!(tick_interval = ?self.tick_interval, "Service running");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Received interrupt, shutting down");
                    break;
                }

                _ = tick_timer.tick() => {
                    let now = observe_clock();
                    match self.controller.tick(now) {
                        Ok(events) => self.publish(events, now).await?,
                        Err(e) => warn!(error = %e, %now, "Tick rejected"),
                    }
                }

                line = lines.next_line(), if stdin_open => {
                    match line.context("Failed to read stdin")? {
                        Some(line) if line.trim().is_empty() => {}
                        Some(line) => {
                            if let Flow::Quit = self.handle_line(&line).await? {
                                break;
                            }
                        }
                        None => {
                            debug!("stdin closed, commands disabled");
                            stdin_open = false;
                        }
                    }
                }
            }
        }

        self.emit(observe_clock(), EventPayload::Shutdown)?;
        info!("Shutdown complete");
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let now = observe_clock();

        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                warn!(line, error = %e, "Invalid command");
                self.emit(
                    now,
                    EventPayload::CommandRejected {
                        command: line.trim().to_string(),
                        error: e.to_string(),
                    },
                )?;
                return Ok(Flow::Continue);
            }
        };

        debug!(command = command.name(), %now, "Handling command");

        let result = match &command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Status => {
                self.report_status(now)?;
                return Ok(Flow::Continue);
            }
            Command::Start(preset_id) => match self.policy.get_workout(preset_id) {
                Some(preset) => {
                    info!(preset = %preset.id, label = %preset.label, "Starting workout preset");
                    self.controller.start_workout(preset.workout.clone(), now)
                }
                None => {
                    warn!(preset = %preset_id, "Unknown workout preset");
                    self.emit(
                        now,
                        EventPayload::CommandRejected {
                            command: line.trim().to_string(),
                            error: format!("Unknown workout preset: {}", preset_id),
                        },
                    )?;
                    return Ok(Flow::Continue);
                }
            },
            Command::Complete => self.controller.complete_workout(now),
            Command::Cancel => self.controller.cancel_workout(now),
            Command::Lock => self.controller.lock(now),
        };

        self.handle_result(&command, result, now).await?;
        Ok(Flow::Continue)
    }

    async fn handle_result(
        &mut self,
        command: &Command,
        result: AccessResult<Vec<AccessEvent>>,
        now: Timestamp,
    ) -> Result<()> {
        match result {
            Ok(events) => self.publish(events, now).await,
            Err(e) => {
                warn!(command = command.name(), error = %e, "Command rejected");
                self.emit(
                    now,
                    EventPayload::CommandRejected {
                        command: command.name().to_string(),
                        error: e.to_string(),
                    },
                )
            }
        }
    }

    async fn publish(&mut self, events: Vec<AccessEvent>, now: Timestamp) -> Result<()> {
        for event in &events {
            debug!(
                event = ?event,
                at = ?occurred_at(event),
                state = %event.resulting_state(),
                "Access event"
            );
            self.emit(now, to_payload(event))?;
        }
        self.sync_targets(now).await
    }

    /// Resolve the catalog and push it to the blocker if it changed
    async fn sync_targets(&mut self, now: Timestamp) -> Result<()> {
        let Some((snapshot, resolution)) = self.resolve_targets(now) else {
            return Ok(());
        };

        if self.applied.as_ref() == Some(&resolution) {
            return Ok(());
        }

        let screen = derive_screen(&snapshot, &resolution);
        debug!(?screen, "Screen derived");

        match self.blocker.apply(&resolution).await {
            Ok(()) => {
                self.emit(
                    now,
                    EventPayload::TargetsChanged {
                        blocked: resolution.blocked_ids(),
                        accessible: resolution.accessible_ids(),
                    },
                )?;
                self.applied = Some(resolution);
            }
            Err(e) => {
                // Retried on the next tick since `applied` is unchanged
                warn!(error = %e, "Blocking adapter rejected resolution");
            }
        }
        Ok(())
    }

    fn report_status(&self, now: Timestamp) -> Result<()> {
        let Some((snapshot, resolution)) = self.resolve_targets(now) else {
            return Ok(());
        };

        info!(
            state = %snapshot.state,
            unlock_remaining = %format_duration(snapshot.unlock_remaining),
            grace_remaining = %format_duration(snapshot.grace_remaining),
            blocked = resolution.blocked.len(),
            accessible = resolution.accessible.len(),
            screen = ?derive_screen(&snapshot, &resolution),
            "Status"
        );

        self.emit(now, EventPayload::StateChanged(snapshot))
    }

    /// Snapshot and resolve the catalog; failures are logged, not fatal
    fn resolve_targets(&self, now: Timestamp) -> Option<(AccessSnapshot, Resolution)> {
        self.controller
            .resolve(now, &self.policy.targets, &self.resolver)
            .inspect_err(|e| error!(error = %e, "Failed to resolve targets"))
            .ok()
    }

    fn emit(&self, now: Timestamp, payload: EventPayload) -> Result<()> {
        if self.json {
            let line = serde_json::to_string(&Event::new(now, payload))
                .context("Failed to serialize event")?;
            println!("{}", line);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        mock_time = repgate_util::is_mock_time_active(),
        started_at = %repgate_util::format_datetime_full(&repgate_util::now()),
        "repgated starting"
    );

    let service = Service::from_args(&args)?;
    service.run().await
}
