use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionKind {
    TradeCount,
    ProfitTarget,
    Diversify,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: String,
    pub title: String,
    pub target: u32,
    #[serde(default)]
    pub progress: u32,
    #[serde(rename = "rewardXP")]
    pub reward_xp: u64,
    pub reward_coins: u64,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "type")]
    pub kind: MissionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissionReward {
    pub xp: u64,
    pub coins: u64,
}

impl Mission {
    pub fn new(id: &str, title: &str, kind: MissionKind, target: u32, reward: MissionReward) -> Self {
        Self {
            id: id.to_owned(),
            title: title.to_owned(),
            target,
            progress: 0,
            reward_xp: reward.xp,
            reward_coins: reward.coins,
            completed: false,
            kind,
        }
    }

    /// Progress never exceeds the target.
    pub fn advance(&mut self, by: u32) {
        self.set_progress(self.progress.saturating_add(by));
    }

    pub fn set_progress(&mut self, value: u32) {
        self.progress = value.min(self.target);
    }

    pub fn is_claimable(&self) -> bool {
        !self.completed && self.progress >= self.target
    }

    pub fn reward(&self) -> MissionReward {
        MissionReward {
            xp: self.reward_xp,
            coins: self.reward_coins,
        }
    }
}

pub fn default_missions() -> Vec<Mission> {
    vec![
        Mission::new(
            "m1",
            "Execute 3 Trades",
            MissionKind::TradeCount,
            3,
            MissionReward { xp: 100, coins: 50 },
        ),
        Mission::new(
            "m2",
            "Diversify Portfolio (3 Sectors)",
            MissionKind::Diversify,
            3,
            MissionReward { xp: 150, coins: 75 },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{Mission, MissionKind, MissionReward};

    fn trade_mission() -> Mission {
        Mission::new(
            "m1",
            "Execute 3 Trades",
            MissionKind::TradeCount,
            3,
            MissionReward { xp: 100, coins: 50 },
        )
    }

    #[test]
    fn advance_caps_at_target() {
        let mut mission = trade_mission();

        for _ in 0..5 {
            mission.advance(1);
        }

        assert_eq!(mission.progress, 3);
        assert!(mission.is_claimable());
    }

    #[test]
    fn completed_mission_is_not_claimable() {
        let mut mission = trade_mission();
        mission.set_progress(3);
        mission.completed = true;

        assert!(!mission.is_claimable());
    }

    #[test]
    fn serializes_with_persisted_field_names() {
        let json = serde_json::to_value(trade_mission()).unwrap();

        assert_eq!(json["rewardXP"], 100);
        assert_eq!(json["rewardCoins"], 50);
        assert_eq!(json["type"], "TRADE_COUNT");
    }
}
