use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::engine::SimEngine;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(2_000);

pub fn unix_millis() -> u64 {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    u64::try_from(millis).unwrap_or_default()
}

/// Drives [`SimEngine::step_once`] at a fixed period.
///
/// The first tick fires one full period after start. A tick that falls behind is
/// skipped rather than bunched, and the next interval is not awaited until the
/// current step has finished, so ticks never overlap.
pub struct SimulationClock {
    engine: SimEngine,
    period: Duration,
}

impl SimulationClock {
    pub fn new(engine: SimEngine, period: Duration) -> Self {
        Self {
            engine,
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// Returns the number of ticks run once `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks = 0;

        info!(period_ms = self.period.as_millis() as u64, "simulation clock started");
        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    let report = self.engine.step_once().await;
                    ticks += 1;
                    debug!(tick = report.tick, executed = report.executed.len(), "tick complete");
                }
            }
        }

        info!(ticks, "simulation clock stopped");
        ticks
    }
}
