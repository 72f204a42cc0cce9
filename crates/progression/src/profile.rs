use serde::{Deserialize, Serialize};

use crate::achievements::{default_achievements, Achievement, PROFIT_KING};
use crate::error::ProgressionError;
use crate::missions::{default_missions, Mission, MissionKind, MissionReward};

pub const XP_PER_LEVEL: u64 = 1_000;
pub const COINS_PER_LEVEL: u64 = 50;
pub const PROFIT_KING_THRESHOLD: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUp {
    pub from: u32,
    pub to: u32,
    pub coins_awarded: u64,
}

pub fn level_for_xp(xp: u64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

/// Gamification state carried alongside the trading ledger.
///
/// Learning fields (`lessons_completed`, `quiz_score`, `completed_chapter_ids`,
/// `streak_days`) are owned by other parts of the app and only round-tripped here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Progression {
    pub xp: u64,
    pub level: u32,
    pub coins: u64,
    pub lessons_completed: u32,
    pub quiz_score: u32,
    pub completed_chapter_ids: Vec<String>,
    pub streak_days: u32,
    pub realized_profit: f64,
    pub achievements: Vec<Achievement>,
    pub missions: Vec<Mission>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            xp: 850,
            level: 1,
            coins: 100,
            lessons_completed: 3,
            quiz_score: 0,
            completed_chapter_ids: Vec::new(),
            streak_days: 3,
            realized_profit: 0.0,
            achievements: default_achievements(),
            missions: default_missions(),
        }
    }
}

impl Progression {
    pub fn award_xp(&mut self, xp: u64) -> Option<LevelUp> {
        self.xp = self.xp.saturating_add(xp);
        self.sync_level()
    }

    fn sync_level(&mut self) -> Option<LevelUp> {
        let earned = level_for_xp(self.xp);
        if earned <= self.level {
            return None;
        }

        let from = self.level;
        let coins_awarded = u64::from(earned - from) * COINS_PER_LEVEL;
        self.level = earned;
        self.coins = self.coins.saturating_add(coins_awarded);

        Some(LevelUp {
            from,
            to: earned,
            coins_awarded,
        })
    }

    pub fn advance_missions(&mut self, kind: MissionKind, by: u32) {
        self.missions
            .iter_mut()
            .filter(|mission| mission.kind == kind)
            .for_each(|mission| mission.advance(by));
    }

    pub fn set_mission_progress(&mut self, kind: MissionKind, value: u32) {
        self.missions
            .iter_mut()
            .filter(|mission| mission.kind == kind)
            .for_each(|mission| mission.set_progress(value));
    }

    /// Returns `true` only when the achievement flips from locked to unlocked.
    pub fn unlock(&mut self, id: &str) -> bool {
        match self
            .achievements
            .iter_mut()
            .find(|achievement| achievement.id == id)
        {
            Some(achievement) if !achievement.unlocked => {
                achievement.unlocked = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.achievements
            .iter()
            .any(|achievement| achievement.id == id && achievement.unlocked)
    }

    pub fn record_realized_profit(&mut self, profit: f64) {
        if !profit.is_finite() {
            return;
        }

        self.realized_profit += profit;
        let whole_dollars = self.realized_profit.max(0.0).floor();
        let progress = if whole_dollars >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            whole_dollars as u32
        };
        self.set_mission_progress(MissionKind::ProfitTarget, progress);

        if self.realized_profit >= PROFIT_KING_THRESHOLD {
            self.unlock(PROFIT_KING);
        }
    }

    pub fn claim_mission(&mut self, id: &str) -> Result<(MissionReward, Option<LevelUp>), ProgressionError> {
        let mission = self
            .missions
            .iter_mut()
            .find(|mission| mission.id == id)
            .ok_or_else(|| ProgressionError::UnknownMission(id.to_owned()))?;

        if mission.completed {
            return Err(ProgressionError::MissionAlreadyClaimed(id.to_owned()));
        }
        if !mission.is_claimable() {
            return Err(ProgressionError::MissionIncomplete {
                id: id.to_owned(),
                progress: mission.progress,
                target: mission.target,
            });
        }

        mission.completed = true;
        let reward = mission.reward();
        self.coins = self.coins.saturating_add(reward.coins);
        let level_up = self.award_xp(reward.xp);

        Ok((reward, level_up))
    }
}

#[cfg(test)]
mod tests {
    use super::{level_for_xp, Progression};
    use crate::{MissionKind, ProgressionError, PROFIT_KING};

    #[test]
    fn level_is_xp_thousands_plus_one() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(999), 1);
        assert_eq!(level_for_xp(1_000), 2);
        assert_eq!(level_for_xp(12_345), 13);
    }

    #[test]
    fn multi_level_jump_pays_coins_per_level() {
        let mut profile = Progression::default();

        let level_up = profile.award_xp(2_200).unwrap();

        assert_eq!(level_up.to, 4);
        assert_eq!(level_up.coins_awarded, 150);
        assert_eq!(profile.coins, 250);
    }

    #[test]
    fn xp_below_next_level_does_not_level_up() {
        let mut profile = Progression::default();

        assert!(profile.award_xp(10).is_none());
        assert_eq!(profile.level, 1);
        assert_eq!(profile.xp, 860);
    }

    #[test]
    fn claim_rejects_unknown_and_incomplete_missions() {
        let mut profile = Progression::default();

        assert_eq!(
            profile.claim_mission("nope").unwrap_err(),
            ProgressionError::UnknownMission("nope".to_owned())
        );
        assert!(matches!(
            profile.claim_mission("m1").unwrap_err(),
            ProgressionError::MissionIncomplete { progress: 0, target: 3, .. }
        ));
    }

    #[test]
    fn claim_pays_reward_once() {
        let mut profile = Progression::default();
        profile.advance_missions(MissionKind::TradeCount, 3);

        let (reward, level_up) = profile.claim_mission("m1").unwrap();

        assert_eq!(reward.xp, 100);
        assert_eq!(profile.xp, 950);
        assert_eq!(profile.coins, 150);
        assert!(level_up.is_none());
        assert_eq!(
            profile.claim_mission("m1").unwrap_err(),
            ProgressionError::MissionAlreadyClaimed("m1".to_owned())
        );
    }

    #[test]
    fn unlock_reports_only_first_transition() {
        let mut profile = Progression::default();

        assert!(profile.unlock(PROFIT_KING));
        assert!(!profile.unlock(PROFIT_KING));
        assert!(!profile.unlock("missing"));
        assert!(profile.is_unlocked(PROFIT_KING));
    }

    #[test]
    fn cumulative_profit_unlocks_profit_king() {
        let mut profile = Progression::default();

        profile.record_realized_profit(600.0);
        assert!(!profile.is_unlocked(PROFIT_KING));

        profile.record_realized_profit(400.0);
        assert!(profile.is_unlocked(PROFIT_KING));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let profile: Progression = serde_json::from_str(r#"{"xp": 1500}"#).unwrap();

        assert_eq!(profile.xp, 1_500);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.coins, 100);
        assert_eq!(profile.missions.len(), 2);
    }

    #[test]
    fn stored_zero_level_and_coins_are_kept() {
        let mut profile: Progression =
            serde_json::from_str(r#"{"xp": 1500, "level": 0, "coins": 0}"#).unwrap();

        assert_eq!(profile.level, 0);
        assert_eq!(profile.coins, 0);

        profile.award_xp(10);
        assert_eq!(profile.level, 2);
    }
}
