//! Conditional orders and their per-tick resolution.
//!
//! Orders are all-or-nothing. An order whose trigger is met but cannot be funded or
//! covered stays pending; the only transition driven here is Pending -> Executed.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::instrument::InstrumentRegistry;
use crate::ledger::{default_leverage, Portfolio};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    LimitBuy,
    LimitSell,
    StopLoss,
}

impl OrderKind {
    pub fn is_triggered(self, price: f64, target_price: f64) -> bool {
        match self {
            Self::LimitBuy | Self::StopLoss => price <= target_price,
            Self::LimitSell => price >= target_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: OrderKind,
    pub target_price: f64,
    pub quantity: u32,
    #[serde(default = "default_leverage")]
    pub leverage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedOrder {
    pub order: PendingOrder,
    pub fill_price: f64,
    /// Negative for buys, positive for sells.
    pub cash_delta: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub executed: Vec<ExecutedOrder>,
    pub remaining: Vec<PendingOrder>,
    pub portfolio: Portfolio,
}

impl Resolution {
    pub fn has_executions(&self) -> bool {
        !self.executed.is_empty()
    }
}

/// Matches `orders` against the registry's current prices on a staged copy of `portfolio`.
///
/// Orders are visited in list order and each sees the cash and holdings left by the ones
/// before it. Prices are read-only here, so every order sees the same snapshot.
pub fn resolve_orders(
    orders: &[PendingOrder],
    registry: &InstrumentRegistry,
    portfolio: &Portfolio,
) -> Resolution {
    let mut staged = portfolio.clone();
    let mut executed = Vec::new();
    let mut remaining = Vec::with_capacity(orders.len());

    for order in orders {
        let Some(price) = registry.price_of(&order.symbol) else {
            debug!(order_id = %order.id, symbol = %order.symbol, "order references unknown instrument");
            remaining.push(order.clone());
            continue;
        };

        match try_execute(order, price, &mut staged) {
            Some(cash_delta) => {
                info!(
                    order_id = %order.id,
                    symbol = %order.symbol,
                    kind = ?order.kind,
                    quantity = order.quantity,
                    fill_price = price,
                    "conditional order executed"
                );
                executed.push(ExecutedOrder {
                    order: order.clone(),
                    fill_price: price,
                    cash_delta,
                });
            }
            None => remaining.push(order.clone()),
        }
    }

    Resolution {
        executed,
        remaining,
        portfolio: staged,
    }
}

fn try_execute(order: &PendingOrder, price: f64, staged: &mut Portfolio) -> Option<f64> {
    if !order.kind.is_triggered(price, order.target_price) {
        return None;
    }

    let outcome = match order.kind {
        OrderKind::LimitBuy => staged
            .buy_long(&order.symbol, order.quantity, price, order.leverage)
            .map(|cost| -cost),
        OrderKind::StopLoss | OrderKind::LimitSell => staged
            .sell_long(&order.symbol, order.quantity, price)
            .map(|sale| sale.proceeds),
    };

    match outcome {
        Ok(cash_delta) => Some(cash_delta),
        Err(err) => {
            debug!(order_id = %order.id, reason = %err, "triggered order deferred");
            None
        }
    }
}
