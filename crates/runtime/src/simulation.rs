//! The simulation context: everything one tick reads or writes, owned in one place.

use market_core::{
    advance_market, apply_news_sentiment, resolve_orders, ExecutedOrder, Instrument,
    InstrumentRegistry, NewsEvent, NewsFeed, NewsGenerator, OrderKind, PendingOrder,
    RegistryError, SimulationConfig, TradeAction, TradeError, TradeReceipt, UserLedger,
    DEFAULT_CATALOG,
};
use progression::{LevelUp, MissionReward};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::events::{RuntimeEvent, RuntimeStage};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub tick: u64,
    pub timestamp_ms: u64,
    pub news: Option<NewsEvent>,
    pub executed: Vec<ExecutedOrder>,
    #[serde(skip)]
    pub events: Vec<RuntimeEvent>,
}

impl TickReport {
    pub fn committed(&self) -> bool {
        !self.executed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    registry: InstrumentRegistry,
    news_generator: NewsGenerator,
    news_feed: NewsFeed,
    market_trend: f64,
    ledger: UserLedger,
    rng: StdRng,
    tick: u64,
}

impl Simulation {
    pub fn new(
        config: SimulationConfig,
        registry: InstrumentRegistry,
        ledger: UserLedger,
        rng: StdRng,
    ) -> Self {
        Self {
            news_generator: NewsGenerator::new(config.news_probability),
            news_feed: NewsFeed::new(config.news_feed_len),
            config,
            registry,
            market_trend: 0.0,
            ledger,
            rng,
            tick: 0,
        }
    }

    /// Builds the default catalog. Without a seed the generator is seeded from entropy.
    pub fn with_default_catalog(
        config: SimulationConfig,
        ledger: UserLedger,
        seed: Option<u64>,
        now_ms: u64,
    ) -> Result<Self, RegistryError> {
        let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let registry = InstrumentRegistry::from_seeds(&DEFAULT_CATALOG, &config, &mut rng, now_ms)?;
        Ok(Self::new(config, registry, ledger, rng))
    }

    /// Runs one tick: news, then prices, then conditional orders against the new prices.
    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        self.tick += 1;
        let tick = self.tick;
        let mut events = vec![RuntimeEvent::new(tick, RuntimeStage::TickStarted)];

        let news = self
            .news_generator
            .generate(&self.registry, &mut self.rng, now_ms);
        if let Some(event) = &news {
            apply_news_sentiment(&mut self.registry, event);
            self.news_feed.push(event.clone());
        }
        events.push(RuntimeEvent::new(tick, RuntimeStage::NewsEvaluated));

        advance_market(
            &mut self.registry,
            self.market_trend,
            news.as_ref(),
            &mut self.rng,
            now_ms,
            self.config.history_len,
        );
        events.push(RuntimeEvent::new(tick, RuntimeStage::PricesAdvanced));

        let resolution = resolve_orders(
            &self.ledger.pending_orders,
            &self.registry,
            &self.ledger.portfolio,
        );
        let executed = resolution.executed.clone();
        events.push(RuntimeEvent::new(tick, RuntimeStage::OrdersResolved));

        if self.ledger.commit_resolution(resolution) {
            events.push(RuntimeEvent::new(tick, RuntimeStage::LedgerCommitted));
        }

        TickReport {
            tick,
            timestamp_ms: now_ms,
            news,
            executed,
            events,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn registry(&self) -> &InstrumentRegistry {
        &self.registry
    }

    pub fn instrument(&self, symbol: &str) -> Option<&Instrument> {
        self.registry.get(symbol)
    }

    pub fn news_feed(&self) -> &NewsFeed {
        &self.news_feed
    }

    pub fn market_trend(&self) -> f64 {
        self.market_trend
    }

    /// Clamped to [-1, 1]; non-finite input resets the trend to neutral.
    pub fn set_market_trend(&mut self, trend: f64) -> f64 {
        self.market_trend = if trend.is_finite() {
            trend.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.market_trend
    }

    pub fn ledger(&self) -> &UserLedger {
        &self.ledger
    }

    pub fn ledger_snapshot(&self) -> UserLedger {
        self.ledger.clone()
    }

    pub fn replace_ledger(&mut self, ledger: UserLedger) {
        self.ledger = ledger;
    }

    pub fn net_worth(&self) -> f64 {
        self.ledger.net_worth(&self.registry)
    }

    pub fn execute_trade(
        &mut self,
        action: TradeAction,
        symbol: &str,
        quantity: u32,
        leverage: u32,
    ) -> Result<TradeReceipt, TradeError> {
        self.ledger
            .execute_trade(&self.registry, action, symbol, quantity, leverage)
    }

    pub fn place_order(
        &mut self,
        symbol: &str,
        kind: OrderKind,
        target_price: f64,
        quantity: u32,
        leverage: u32,
    ) -> Result<PendingOrder, TradeError> {
        self.ledger
            .place_order(&self.registry, symbol, kind, target_price, quantity, leverage)
    }

    pub fn cancel_order(&mut self, id: &str) -> Result<PendingOrder, TradeError> {
        self.ledger.cancel_order(id)
    }

    pub fn claim_mission(&mut self, id: &str) -> Result<(MissionReward, Option<LevelUp>), TradeError> {
        self.ledger.claim_mission(id)
    }

    pub fn toggle_watchlist(&mut self, symbol: &str) -> Result<bool, TradeError> {
        self.ledger.toggle_watchlist(&self.registry, symbol)
    }
}
