use std::sync::Arc;
use std::time::Instant;

use market_core::{RegistryError, SimulationConfig, UserLedger};
use tokio::sync::{broadcast, Mutex};

use crate::clock::unix_millis;
use crate::events::RuntimeStage;
use crate::logging::{RunLogEvent, RunLogWriter, TracingRunLogWriter};
use crate::metrics::{LatencyPercentiles, TickLatencyMetrics};
use crate::simulation::{Simulation, TickReport};

pub const TICK_CHANNEL_CAPACITY: usize = 64;

struct EngineState {
    simulation: Simulation,
    metrics: TickLatencyMetrics,
    run_log: Box<dyn RunLogWriter + Send>,
}

/// Shared handle to the simulation. Ticks and user actions take the same lock,
/// so a trade never interleaves with order resolution.
#[derive(Clone)]
pub struct SimEngine {
    state: Arc<Mutex<EngineState>>,
    ticks: broadcast::Sender<TickReport>,
}

impl SimEngine {
    pub fn new(simulation: Simulation) -> Self {
        Self::with_run_log(simulation, TracingRunLogWriter)
    }

    pub fn with_run_log(simulation: Simulation, run_log: impl RunLogWriter + Send + 'static) -> Self {
        let (ticks, _) = broadcast::channel(TICK_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(EngineState {
                simulation,
                metrics: TickLatencyMetrics::new(),
                run_log: Box::new(run_log),
            })),
            ticks,
        }
    }

    pub fn for_test_seed(seed: u64) -> Result<Self, RegistryError> {
        let simulation = Simulation::with_default_catalog(
            SimulationConfig::default(),
            UserLedger::default(),
            Some(seed),
            0,
        )?;
        Ok(Self::new(simulation))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TickReport> {
        self.ticks.subscribe()
    }

    pub async fn step_once(&self) -> TickReport {
        self.step_at(unix_millis()).await
    }

    pub async fn step_at(&self, now_ms: u64) -> TickReport {
        let mut state = self.state.lock().await;

        let started = Instant::now();
        let report = state.simulation.tick(now_ms);
        let latency_micros = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        state.metrics.record_latency_micros(latency_micros);

        for event in &report.events {
            let detail = stage_detail(&report, event.stage);
            state
                .run_log
                .write(RunLogEvent::new(event.tick, event.stage.into(), detail));
        }
        state
            .run_log
            .write(RunLogEvent::latency(report.tick, latency_micros));
        drop(state);

        // No subscribers is not an error.
        let _ = self.ticks.send(report.clone());
        report
    }

    /// Runs `f` with exclusive access to the simulation.
    pub async fn with_simulation<T>(&self, f: impl FnOnce(&mut Simulation) -> T) -> T {
        let mut state = self.state.lock().await;
        f(&mut state.simulation)
    }

    pub async fn ledger_snapshot(&self) -> UserLedger {
        self.with_simulation(|simulation| simulation.ledger_snapshot())
            .await
    }

    pub async fn replace_ledger(&self, ledger: UserLedger) {
        self.with_simulation(|simulation| simulation.replace_ledger(ledger))
            .await;
    }

    pub async fn latency_percentiles(&self) -> Option<LatencyPercentiles> {
        self.state.lock().await.metrics.percentiles()
    }
}

fn stage_detail(report: &TickReport, stage: RuntimeStage) -> Option<String> {
    match stage {
        RuntimeStage::NewsEvaluated => report.news.as_ref().map(|news| news.headline.clone()),
        RuntimeStage::OrdersResolved | RuntimeStage::LedgerCommitted => {
            Some(format!("executed={}", report.executed.len()))
        }
        RuntimeStage::TickStarted | RuntimeStage::PricesAdvanced => None,
    }
}
