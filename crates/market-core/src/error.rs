use progression::ProgressionError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TradeError {
    #[error("quantity must be a positive whole number")]
    InvalidQuantity,
    #[error("price must be a finite positive number")]
    InvalidPrice,
    #[error("leverage must be at least 1")]
    InvalidLeverage,
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),
    #[error("insufficient funds: need {required:.2}, have {available:.2}")]
    InsufficientFunds { required: f64, available: f64 },
    #[error("insufficient holdings in {symbol}: requested {requested}, held {held}")]
    InsufficientHoldings {
        symbol: String,
        requested: u32,
        held: u32,
    },
    #[error("pending order not found: {0}")]
    OrderNotFound(String),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
}

impl TradeError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantity | Self::InvalidPrice | Self::InvalidLeverage
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownInstrument(_)
                | Self::OrderNotFound(_)
                | Self::Progression(ProgressionError::UnknownMission(_))
        )
    }
}
