//! Market model for the trading sandbox: instruments, news, pricing, and the user ledger.

pub mod account;
pub mod catalog;
pub mod config;
pub mod error;
pub mod instrument;
pub mod ledger;
pub mod news;
pub mod orders;
pub mod pricing;

pub use account::{TradeAction, TradeReceipt, UserLedger};
pub use catalog::DEFAULT_CATALOG;
pub use config::SimulationConfig;
pub use error::TradeError;
pub use instrument::{Instrument, InstrumentRegistry, InstrumentSeed, PricePoint, RegistryError};
pub use ledger::{HoldingPosition, PositionType, Portfolio, SaleProceeds, STARTING_CASH};
pub use news::{apply_news_sentiment, NewsEvent, NewsFeed, NewsGenerator, Polarity};
pub use orders::{resolve_orders, ExecutedOrder, OrderKind, PendingOrder, Resolution};
pub use pricing::advance_market;
