pub const DEFAULT_NEWS_PROBABILITY: f64 = 0.3;
pub const DEFAULT_HISTORY_LEN: usize = 30;
pub const DEFAULT_NEWS_FEED_LEN: usize = 10;
pub const DEFAULT_SEED_HISTORY_LEN: usize = 20;
pub const DEFAULT_SEED_HISTORY_STEP_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub news_probability: f64,
    pub history_len: usize,
    pub news_feed_len: usize,
    pub seed_history_len: usize,
    pub seed_history_step_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            news_probability: DEFAULT_NEWS_PROBABILITY,
            history_len: DEFAULT_HISTORY_LEN,
            news_feed_len: DEFAULT_NEWS_FEED_LEN,
            seed_history_len: DEFAULT_SEED_HISTORY_LEN,
            seed_history_step_ms: DEFAULT_SEED_HISTORY_STEP_MS,
        }
    }
}

impl SimulationConfig {
    pub fn with_news_probability(mut self, probability: f64) -> Self {
        self.news_probability = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            DEFAULT_NEWS_PROBABILITY
        };
        self
    }
}
