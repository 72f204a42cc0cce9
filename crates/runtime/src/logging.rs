use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::events::RuntimeStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLogEventKind {
    TickStarted,
    NewsEvaluated,
    PricesAdvanced,
    OrdersResolved,
    LedgerCommitted,
    TickLatencyRecorded,
}

impl From<RuntimeStage> for RunLogEventKind {
    fn from(stage: RuntimeStage) -> Self {
        match stage {
            RuntimeStage::TickStarted => Self::TickStarted,
            RuntimeStage::NewsEvaluated => Self::NewsEvaluated,
            RuntimeStage::PricesAdvanced => Self::PricesAdvanced,
            RuntimeStage::OrdersResolved => Self::OrdersResolved,
            RuntimeStage::LedgerCommitted => Self::LedgerCommitted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLogEvent {
    pub tick: u64,
    pub kind: RunLogEventKind,
    pub detail: Option<String>,
    pub latency_micros: Option<u64>,
}

impl RunLogEvent {
    pub fn new(tick: u64, kind: RunLogEventKind, detail: Option<String>) -> Self {
        Self {
            tick,
            kind,
            detail,
            latency_micros: None,
        }
    }

    pub fn latency(tick: u64, latency_micros: u64) -> Self {
        Self {
            tick,
            kind: RunLogEventKind::TickLatencyRecorded,
            detail: None,
            latency_micros: Some(latency_micros),
        }
    }
}

pub trait RunLogWriter {
    fn write(&mut self, event: RunLogEvent);
}

/// Collects events behind a shared handle so a clone can be inspected after
/// the writer itself is handed to the engine.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRunLogWriter {
    events: Arc<Mutex<Vec<RunLogEvent>>>,
}

impl InMemoryRunLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RunLogEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RunLogWriter for InMemoryRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Forwards run-log events to `tracing`. Stage events go out at debug level,
/// commits and latency samples at info.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRunLogWriter;

impl RunLogWriter for TracingRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        let detail = event.detail.as_deref().unwrap_or("");
        match event.kind {
            RunLogEventKind::LedgerCommitted => {
                info!(tick = event.tick, detail, "ledger committed");
            }
            RunLogEventKind::TickLatencyRecorded => {
                debug!(
                    tick = event.tick,
                    latency_micros = event.latency_micros.unwrap_or_default(),
                    "tick latency recorded"
                );
            }
            kind => {
                debug!(tick = event.tick, stage = ?kind, detail, "tick stage");
            }
        }
    }
}
