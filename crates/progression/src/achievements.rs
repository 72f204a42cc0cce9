use serde::{Deserialize, Serialize};

pub const FIRST_TRADE: &str = "first_trade";
pub const PROFIT_KING: &str = "profit_king";
pub const RISK_TAKER: &str = "risk_taker";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub unlocked: bool,
}

impl Achievement {
    pub fn new(id: &str, title: &str, description: &str, icon: &str) -> Self {
        Self {
            id: id.to_owned(),
            title: title.to_owned(),
            description: description.to_owned(),
            icon: icon.to_owned(),
            unlocked: false,
        }
    }
}

pub fn default_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(FIRST_TRADE, "First Steps", "Complete your first trade", "🚀"),
        Achievement::new(PROFIT_KING, "Profit King", "Make $1000 profit", "👑"),
        Achievement::new(RISK_TAKER, "Risk Taker", "Execute a Short Sell", "⚡"),
    ]
}
