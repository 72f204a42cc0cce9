//! Cash balance and open positions.
//!
//! A [`Portfolio`] holds at most one long row per symbol. Short rows are additive:
//! every short opens a new row even when one already exists for the symbol.

use serde::{Deserialize, Serialize};

use crate::error::TradeError;
use crate::instrument::InstrumentRegistry;

pub const STARTING_CASH: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionType {
    Long,
    Short,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingPosition {
    pub symbol: String,
    pub quantity: u32,
    pub avg_price: f64,
    #[serde(rename = "type")]
    pub position_type: PositionType,
    #[serde(default = "default_leverage")]
    pub leverage: u32,
}

pub(crate) fn default_leverage() -> u32 {
    1
}

impl HoldingPosition {
    pub fn market_value(&self, price: f64) -> f64 {
        let quantity = f64::from(self.quantity);
        match self.position_type {
            PositionType::Long => quantity * price,
            PositionType::Short => quantity * self.avg_price + (self.avg_price - price) * quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleProceeds {
    pub proceeds: f64,
    pub realized_profit: f64,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Portfolio {
    pub wallet_balance: f64,
    pub holdings: Vec<HoldingPosition>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            wallet_balance: STARTING_CASH,
            holdings: Vec::new(),
        }
    }
}

impl Portfolio {
    pub fn position(&self, symbol: &str, position_type: PositionType) -> Option<&HoldingPosition> {
        self.holdings
            .iter()
            .find(|holding| holding.symbol == symbol && holding.position_type == position_type)
    }

    pub fn long_quantity(&self, symbol: &str) -> u32 {
        self.position(symbol, PositionType::Long)
            .map_or(0, |holding| holding.quantity)
    }

    /// Debits `price * quantity` and merges into the long row at the weighted average price.
    pub fn buy_long(
        &mut self,
        symbol: &str,
        quantity: u32,
        price: f64,
        leverage: u32,
    ) -> Result<f64, TradeError> {
        validate_fill(quantity, price)?;
        let cost = price * f64::from(quantity);
        self.ensure_cash(cost)?;

        match self
            .holdings
            .iter_mut()
            .find(|holding| holding.symbol == symbol && holding.position_type == PositionType::Long)
        {
            Some(existing) => {
                let total = existing.quantity.checked_add(quantity).ok_or(TradeError::InvalidQuantity)?;
                existing.avg_price = (existing.avg_price * f64::from(existing.quantity)
                    + price * f64::from(quantity))
                    / f64::from(total);
                existing.quantity = total;
            }
            None => self.holdings.push(HoldingPosition {
                symbol: symbol.to_owned(),
                quantity,
                avg_price: price,
                position_type: PositionType::Long,
                leverage,
            }),
        }

        self.wallet_balance -= cost;
        Ok(cost)
    }

    /// Credits `price * quantity` and reduces the long row, deleting it at zero.
    pub fn sell_long(&mut self, symbol: &str, quantity: u32, price: f64) -> Result<SaleProceeds, TradeError> {
        validate_fill(quantity, price)?;
        let index = self
            .holdings
            .iter()
            .position(|holding| holding.symbol == symbol && holding.position_type == PositionType::Long);
        let held = index.map_or(0, |index| self.holdings[index].quantity);

        let index = match index {
            Some(index) if held >= quantity => index,
            _ => {
                return Err(TradeError::InsufficientHoldings {
                    symbol: symbol.to_owned(),
                    requested: quantity,
                    held,
                })
            }
        };

        let holding = &mut self.holdings[index];
        let realized_profit = (price - holding.avg_price) * f64::from(quantity);
        holding.quantity -= quantity;
        let closed = holding.quantity == 0;
        if closed {
            self.holdings.remove(index);
        }

        let proceeds = price * f64::from(quantity);
        self.wallet_balance += proceeds;
        Ok(SaleProceeds {
            proceeds,
            realized_profit,
            closed,
        })
    }

    /// Locks `price * quantity` as collateral and appends a new short row.
    pub fn open_short(
        &mut self,
        symbol: &str,
        quantity: u32,
        price: f64,
        leverage: u32,
    ) -> Result<f64, TradeError> {
        validate_fill(quantity, price)?;
        let collateral = price * f64::from(quantity);
        self.ensure_cash(collateral)?;

        self.holdings.push(HoldingPosition {
            symbol: symbol.to_owned(),
            quantity,
            avg_price: price,
            position_type: PositionType::Short,
            leverage,
        });
        self.wallet_balance -= collateral;
        Ok(collateral)
    }

    /// Symbols missing from the registry are valued at zero.
    pub fn portfolio_value(&self, registry: &InstrumentRegistry) -> f64 {
        self.holdings
            .iter()
            .map(|holding| holding.market_value(registry.price_of(&holding.symbol).unwrap_or(0.0)))
            .sum()
    }

    pub fn net_worth(&self, registry: &InstrumentRegistry) -> f64 {
        self.wallet_balance + self.portfolio_value(registry)
    }

    fn ensure_cash(&self, required: f64) -> Result<(), TradeError> {
        if self.wallet_balance < required {
            return Err(TradeError::InsufficientFunds {
                required,
                available: self.wallet_balance,
            });
        }
        Ok(())
    }
}

fn validate_fill(quantity: u32, price: f64) -> Result<(), TradeError> {
    if quantity == 0 {
        return Err(TradeError::InvalidQuantity);
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(TradeError::InvalidPrice);
    }
    Ok(())
}
