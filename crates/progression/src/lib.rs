pub mod achievements;
pub mod error;
pub mod missions;
pub mod profile;

pub use achievements::{default_achievements, Achievement, FIRST_TRADE, PROFIT_KING, RISK_TAKER};
pub use error::ProgressionError;
pub use missions::{default_missions, Mission, MissionKind, MissionReward};
pub use profile::{level_for_xp, LevelUp, Progression, COINS_PER_LEVEL, XP_PER_LEVEL};
