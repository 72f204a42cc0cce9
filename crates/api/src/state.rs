use market_core::{ExecutedOrder, NewsEvent, PendingOrder, TradeReceipt};
use runtime::{SimEngine, TickReport};
use tokio::sync::broadcast;

pub const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MarketEvent {
    Connected {
        tick: u64,
    },
    Tick {
        tick: u64,
        timestamp_ms: u64,
        news: Option<NewsEvent>,
        executed: Vec<ExecutedOrder>,
    },
    TradeExecuted {
        receipt: TradeReceipt,
    },
    OrderPlaced {
        order: PendingOrder,
    },
    OrderCancelled {
        order_id: String,
    },
}

impl MarketEvent {
    pub fn connected(tick: u64) -> Self {
        Self::Connected { tick }
    }

    pub fn trade_executed(receipt: TradeReceipt) -> Self {
        Self::TradeExecuted { receipt }
    }

    pub fn order_placed(order: PendingOrder) -> Self {
        Self::OrderPlaced { order }
    }

    pub fn order_cancelled(order_id: impl Into<String>) -> Self {
        Self::OrderCancelled {
            order_id: order_id.into(),
        }
    }
}

impl From<TickReport> for MarketEvent {
    fn from(report: TickReport) -> Self {
        Self::Tick {
            tick: report.tick,
            timestamp_ms: report.timestamp_ms,
            news: report.news,
            executed: report.executed,
        }
    }
}

/// Engine handle plus the channel for user-action events. Tick events come
/// straight from the engine's own channel.
#[derive(Clone)]
pub struct AppState {
    engine: SimEngine,
    events_tx: broadcast::Sender<MarketEvent>,
}

impl AppState {
    pub fn new(engine: SimEngine) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { engine, events_tx }
    }

    pub fn engine(&self) -> &SimEngine {
        &self.engine
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<MarketEvent> {
        self.events_tx.subscribe()
    }

    pub fn subscribe_ticks(&self) -> broadcast::Receiver<TickReport> {
        self.engine.subscribe()
    }

    /// Returns the number of live subscribers; zero is not an error.
    pub fn publish_event(&self, event: MarketEvent) -> usize {
        self.events_tx.send(event).unwrap_or_default()
    }
}
