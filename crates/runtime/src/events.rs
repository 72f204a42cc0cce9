use serde::Serialize;

/// Phases of one tick, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeStage {
    TickStarted,
    NewsEvaluated,
    PricesAdvanced,
    OrdersResolved,
    LedgerCommitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeEvent {
    pub tick: u64,
    pub stage: RuntimeStage,
}

impl RuntimeEvent {
    pub fn new(tick: u64, stage: RuntimeStage) -> Self {
        Self { tick, stage }
    }
}
