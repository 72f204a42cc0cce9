use std::collections::{HashSet, VecDeque};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SimulationConfig;

const SEED_PERTURBATION: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub ts_ms: u64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstrumentSeed {
    pub symbol: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub price: f64,
    pub volatility: f64,
    pub sentiment: f64,
}

impl InstrumentSeed {
    pub const fn new(
        symbol: &'static str,
        name: &'static str,
        category: &'static str,
        price: f64,
        volatility: f64,
    ) -> Self {
        Self {
            symbol,
            name,
            category,
            price,
            volatility,
            sentiment: 0.0,
        }
    }

    pub const fn with_sentiment(self, sentiment: f64) -> Self {
        Self { sentiment, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
    pub category: String,
    price: f64,
    change: f64,
    history: VecDeque<PricePoint>,
    sentiment: f64,
    volatility: f64,
}

impl Instrument {
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Percent change between the current price and the oldest retained sample.
    pub fn change(&self) -> f64 {
        self.change
    }

    pub fn history(&self) -> &VecDeque<PricePoint> {
        &self.history
    }

    pub fn sentiment(&self) -> f64 {
        self.sentiment
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn set_sentiment(&mut self, sentiment: f64) {
        self.sentiment = clamp_unit(sentiment, -1.0);
    }

    /// Records a new price sample, evicting the oldest beyond `history_len`.
    pub(crate) fn record_price(&mut self, price: f64, ts_ms: u64, history_len: usize) {
        self.price = price;
        self.history.push_back(PricePoint { ts_ms, price });
        while self.history.len() > history_len.max(1) {
            self.history.pop_front();
        }
        self.change = percent_change(self.history.front().map(|point| point.price), price);
    }

    fn from_seed<R: Rng + ?Sized>(
        seed: &InstrumentSeed,
        config: &SimulationConfig,
        rng: &mut R,
        now_ms: u64,
    ) -> Self {
        let history = seed_history(seed.price, config, rng, now_ms);
        let change = percent_change(history.front().map(|point| point.price), seed.price);

        Self {
            symbol: seed.symbol.to_owned(),
            name: seed.name.to_owned(),
            category: seed.category.to_owned(),
            price: seed.price,
            change,
            history,
            sentiment: clamp_unit(seed.sentiment, -1.0),
            volatility: clamp_unit(seed.volatility, 0.0),
        }
    }
}

fn clamp_unit(value: f64, min: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, 1.0)
    } else {
        0.0
    }
}

fn percent_change(reference: Option<f64>, price: f64) -> f64 {
    match reference {
        Some(reference) if reference > 0.0 => (price - reference) / reference * 100.0,
        _ => 0.0,
    }
}

/// Walks backward from the seed price in small random steps so charts have data on load.
fn seed_history<R: Rng + ?Sized>(
    seed_price: f64,
    config: &SimulationConfig,
    rng: &mut R,
    now_ms: u64,
) -> VecDeque<PricePoint> {
    let len = config.seed_history_len.min(config.history_len);
    let mut history = VecDeque::with_capacity(config.history_len);
    let mut price = seed_price;

    for step in 1..=len {
        let perturbation = (rng.gen::<f64>() - 0.5) * SEED_PERTURBATION;
        price = (price * (1.0 - perturbation)).max(f64::MIN_POSITIVE);
        let back_ms = config.seed_history_step_ms.saturating_mul(step as u64);
        history.push_front(PricePoint {
            ts_ms: now_ms.saturating_sub(back_ms),
            price,
        });
    }

    history
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("instrument {symbol} has a non-positive seed price {price}")]
    NonPositivePrice { symbol: String, price: f64 },
    #[error("instrument {0} is defined more than once")]
    DuplicateSymbol(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRegistry {
    instruments: Vec<Instrument>,
}

impl InstrumentRegistry {
    pub fn from_seeds<R: Rng + ?Sized>(
        seeds: &[InstrumentSeed],
        config: &SimulationConfig,
        rng: &mut R,
        now_ms: u64,
    ) -> Result<Self, RegistryError> {
        let mut seen = HashSet::with_capacity(seeds.len());
        let mut instruments = Vec::with_capacity(seeds.len());

        for seed in seeds {
            if !seed.price.is_finite() || seed.price <= 0.0 {
                return Err(RegistryError::NonPositivePrice {
                    symbol: seed.symbol.to_owned(),
                    price: seed.price,
                });
            }
            if !seen.insert(seed.symbol) {
                return Err(RegistryError::DuplicateSymbol(seed.symbol.to_owned()));
            }
            instruments.push(Instrument::from_seed(seed, config, rng, now_ms));
        }

        Ok(Self { instruments })
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments
            .iter()
            .find(|instrument| instrument.symbol == symbol)
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut Instrument> {
        self.instruments
            .iter_mut()
            .find(|instrument| instrument.symbol == symbol)
    }

    pub fn price_of(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).map(Instrument::price)
    }

    pub fn category_of(&self, symbol: &str) -> Option<&str> {
        self.get(symbol).map(|instrument| instrument.category.as_str())
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub(crate) fn instruments_mut(&mut self) -> &mut [Instrument] {
        &mut self.instruments
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{InstrumentRegistry, InstrumentSeed, RegistryError};
    use crate::config::SimulationConfig;

    const SEEDS: [InstrumentSeed; 2] = [
        InstrumentSeed::new("MSFT", "Microsoft Corp", "Tech", 415.50, 0.015).with_sentiment(0.5),
        InstrumentSeed::new("GLD", "Gold Reserve", "Commodity", 1_850.0, 0.005),
    ];

    #[test]
    fn seeded_history_has_twenty_samples_near_seed_price() {
        let mut rng = StdRng::seed_from_u64(1);
        let registry =
            InstrumentRegistry::from_seeds(&SEEDS, &SimulationConfig::default(), &mut rng, 100_000)
                .unwrap();

        let msft = registry.get("MSFT").unwrap();
        assert_eq!(msft.history().len(), 20);
        assert_eq!(msft.price(), 415.50);
        assert_eq!(msft.sentiment(), 0.5);
        for point in msft.history() {
            assert!(point.price > 415.50 * 0.75 && point.price < 415.50 * 1.25);
        }
        let timestamps: Vec<u64> = msft.history().iter().map(|point| point.ts_ms).collect();
        assert!(timestamps.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(*timestamps.last().unwrap(), 98_000);
    }

    #[test]
    fn rejects_non_positive_seed_price() {
        let mut rng = StdRng::seed_from_u64(1);
        let seeds = [InstrumentSeed::new("BAD", "Bad Co", "Tech", 0.0, 0.01)];

        let err = InstrumentRegistry::from_seeds(&seeds, &SimulationConfig::default(), &mut rng, 0)
            .unwrap_err();

        assert!(matches!(err, RegistryError::NonPositivePrice { .. }));
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let mut rng = StdRng::seed_from_u64(1);
        let seeds = [SEEDS[0], SEEDS[0]];

        let err = InstrumentRegistry::from_seeds(&seeds, &SimulationConfig::default(), &mut rng, 0)
            .unwrap_err();

        assert_eq!(err, RegistryError::DuplicateSymbol("MSFT".to_owned()));
    }

    #[test]
    fn out_of_range_seed_values_are_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        let seeds =
            [InstrumentSeed::new("WLD", "Wild Co", "Tech", 10.0, 4.0).with_sentiment(-3.0)];

        let registry =
            InstrumentRegistry::from_seeds(&seeds, &SimulationConfig::default(), &mut rng, 0)
                .unwrap();

        let wild = registry.get("WLD").unwrap();
        assert_eq!(wild.volatility(), 1.0);
        assert_eq!(wild.sentiment(), -1.0);
    }
}
