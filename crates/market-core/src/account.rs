//! The persisted user ledger and the immediate (market) trade path.

use std::collections::HashSet;

use progression::{LevelUp, MissionKind, MissionReward, Progression, FIRST_TRADE, RISK_TAKER};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::TradeError;
use crate::instrument::InstrumentRegistry;
use crate::ledger::{Portfolio, PositionType};
use crate::orders::{OrderKind, PendingOrder, Resolution};

pub const PROFITABLE_SALE_XP: u64 = 50;
pub const SALE_XP: u64 = 10;

fn default_watchlist() -> Vec<String> {
    ["TCH", "BIO", "AIX", "GRN"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Buy,
    Sell,
    Short,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReceipt {
    pub action: TradeAction,
    pub symbol: String,
    pub quantity: u32,
    pub price: f64,
    pub cash_delta: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realized_profit: Option<f64>,
    pub xp_awarded: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_level: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLedger {
    #[serde(flatten)]
    pub progression: Progression,
    #[serde(flatten)]
    pub portfolio: Portfolio,
    #[serde(default)]
    pub pending_orders: Vec<PendingOrder>,
    #[serde(default = "default_watchlist")]
    pub watchlist: Vec<String>,
}

impl Default for UserLedger {
    fn default() -> Self {
        Self {
            progression: Progression::default(),
            portfolio: Portfolio::default(),
            pending_orders: Vec::new(),
            watchlist: default_watchlist(),
        }
    }
}

impl UserLedger {
    pub fn net_worth(&self, registry: &InstrumentRegistry) -> f64 {
        self.portfolio.net_worth(registry)
    }

    /// Executes a market order synchronously at the instrument's current price.
    pub fn execute_trade(
        &mut self,
        registry: &InstrumentRegistry,
        action: TradeAction,
        symbol: &str,
        quantity: u32,
        leverage: u32,
    ) -> Result<TradeReceipt, TradeError> {
        validate_quantity_and_leverage(quantity, leverage)?;
        let price = registry
            .price_of(symbol)
            .ok_or_else(|| TradeError::UnknownInstrument(symbol.to_owned()))?;

        let mut receipt = TradeReceipt {
            action,
            symbol: symbol.to_owned(),
            quantity,
            price,
            cash_delta: 0.0,
            realized_profit: None,
            xp_awarded: 0,
            new_level: None,
        };

        match action {
            TradeAction::Buy => {
                let cost = self.portfolio.buy_long(symbol, quantity, price, leverage)?;
                receipt.cash_delta = -cost;
                self.progression.advance_missions(MissionKind::TradeCount, 1);
                self.refresh_diversification(registry);
            }
            TradeAction::Sell => {
                let sale = self.portfolio.sell_long(symbol, quantity, price)?;
                receipt.cash_delta = sale.proceeds;
                receipt.realized_profit = Some(sale.realized_profit);
                receipt.xp_awarded = if sale.realized_profit > 0.0 {
                    PROFITABLE_SALE_XP
                } else {
                    SALE_XP
                };
                self.progression.record_realized_profit(sale.realized_profit);
                receipt.new_level = self
                    .progression
                    .award_xp(receipt.xp_awarded)
                    .map(|level_up| level_up.to);
            }
            TradeAction::Short => {
                let collateral = self.portfolio.open_short(symbol, quantity, price, leverage)?;
                receipt.cash_delta = -collateral;
                self.progression.unlock(RISK_TAKER);
            }
        }

        self.progression.unlock(FIRST_TRADE);

        info!(
            action = ?action,
            symbol,
            quantity,
            price,
            cash = self.portfolio.wallet_balance,
            "trade executed"
        );
        Ok(receipt)
    }

    pub fn place_order(
        &mut self,
        registry: &InstrumentRegistry,
        symbol: &str,
        kind: OrderKind,
        target_price: f64,
        quantity: u32,
        leverage: u32,
    ) -> Result<PendingOrder, TradeError> {
        validate_quantity_and_leverage(quantity, leverage)?;
        if !target_price.is_finite() || target_price <= 0.0 {
            return Err(TradeError::InvalidPrice);
        }
        if registry.get(symbol).is_none() {
            return Err(TradeError::UnknownInstrument(symbol.to_owned()));
        }

        let order = PendingOrder {
            id: Uuid::new_v4().to_string(),
            symbol: symbol.to_owned(),
            kind,
            target_price,
            quantity,
            leverage,
        };
        self.pending_orders.push(order.clone());

        info!(order_id = %order.id, symbol, kind = ?kind, target_price, quantity, "order placed");
        Ok(order)
    }

    pub fn cancel_order(&mut self, id: &str) -> Result<PendingOrder, TradeError> {
        let index = self
            .pending_orders
            .iter()
            .position(|order| order.id == id)
            .ok_or_else(|| TradeError::OrderNotFound(id.to_owned()))?;

        let order = self.pending_orders.remove(index);
        info!(order_id = %order.id, symbol = %order.symbol, "order cancelled");
        Ok(order)
    }

    /// Replaces cash, holdings and pending orders in one step when anything executed.
    pub fn commit_resolution(&mut self, resolution: Resolution) -> bool {
        if !resolution.has_executions() {
            return false;
        }

        self.portfolio = resolution.portfolio;
        self.pending_orders = resolution.remaining;
        true
    }

    pub fn claim_mission(&mut self, id: &str) -> Result<(MissionReward, Option<LevelUp>), TradeError> {
        let claimed = self.progression.claim_mission(id)?;
        info!(mission = id, xp = claimed.0.xp, coins = claimed.0.coins, "mission claimed");
        Ok(claimed)
    }

    /// Returns whether `symbol` is on the watchlist after the toggle.
    pub fn toggle_watchlist(&mut self, registry: &InstrumentRegistry, symbol: &str) -> Result<bool, TradeError> {
        if let Some(index) = self.watchlist.iter().position(|entry| entry == symbol) {
            self.watchlist.remove(index);
            return Ok(false);
        }
        if registry.get(symbol).is_none() {
            return Err(TradeError::UnknownInstrument(symbol.to_owned()));
        }

        self.watchlist.push(symbol.to_owned());
        Ok(true)
    }

    fn refresh_diversification(&mut self, registry: &InstrumentRegistry) {
        let sectors: HashSet<&str> = self
            .portfolio
            .holdings
            .iter()
            .filter(|holding| holding.position_type == PositionType::Long)
            .filter_map(|holding| registry.category_of(&holding.symbol))
            .collect();
        let count = u32::try_from(sectors.len()).unwrap_or(u32::MAX);
        self.progression
            .set_mission_progress(MissionKind::Diversify, count);
    }
}

fn validate_quantity_and_leverage(quantity: u32, leverage: u32) -> Result<(), TradeError> {
    if quantity == 0 {
        return Err(TradeError::InvalidQuantity);
    }
    if leverage == 0 {
        return Err(TradeError::InvalidLeverage);
    }
    Ok(())
}
