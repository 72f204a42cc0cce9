use rand::Rng;

use crate::instrument::{Instrument, InstrumentRegistry};
use crate::news::NewsEvent;

pub const SENTIMENT_DRAG: f64 = 0.005;
pub const MARKET_TREND_DRAG: f64 = 0.002;
pub const PRICE_FLOOR: f64 = 0.01;
pub const SENTIMENT_DECAY: f64 = 0.95;

/// Fractional move for one tick: uniform noise in `[-volatility, volatility]` plus drift terms.
pub fn percent_move<R: Rng + ?Sized>(
    volatility: f64,
    sentiment: f64,
    market_trend: f64,
    news_impact: f64,
    rng: &mut R,
) -> f64 {
    let noise = if volatility > 0.0 {
        rng.gen_range(-volatility..=volatility)
    } else {
        0.0
    };

    noise + sentiment * SENTIMENT_DRAG + market_trend * MARKET_TREND_DRAG + news_impact
}

pub fn next_price(price: f64, percent_move: f64) -> f64 {
    let next = price * (1.0 + percent_move);
    if next.is_finite() {
        next.max(PRICE_FLOOR)
    } else {
        PRICE_FLOOR
    }
}

pub fn decay_sentiment(sentiment: f64) -> f64 {
    (sentiment * SENTIMENT_DECAY).clamp(-1.0, 1.0)
}

pub fn advance_instrument<R: Rng + ?Sized>(
    instrument: &mut Instrument,
    market_trend: f64,
    news: Option<&NewsEvent>,
    rng: &mut R,
    now_ms: u64,
    history_len: usize,
) {
    let news_impact = news.map_or(0.0, |event| event.impact_for(instrument));
    let total_move = percent_move(
        instrument.volatility(),
        instrument.sentiment(),
        market_trend,
        news_impact,
        rng,
    );
    let price = next_price(instrument.price(), total_move);

    instrument.record_price(price, now_ms, history_len);
    instrument.set_sentiment(decay_sentiment(instrument.sentiment()));
}

/// Moves every instrument once. News sentiment must already be applied.
pub fn advance_market<R: Rng + ?Sized>(
    registry: &mut InstrumentRegistry,
    market_trend: f64,
    news: Option<&NewsEvent>,
    rng: &mut R,
    now_ms: u64,
    history_len: usize,
) {
    let market_trend = if market_trend.is_finite() {
        market_trend.clamp(-1.0, 1.0)
    } else {
        0.0
    };

    for instrument in registry.instruments_mut() {
        advance_instrument(instrument, market_trend, news, rng, now_ms, history_len);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{advance_market, decay_sentiment, next_price, percent_move, PRICE_FLOOR};
    use crate::config::SimulationConfig;
    use crate::instrument::{InstrumentRegistry, InstrumentSeed};
    use crate::news::{apply_news_sentiment, NewsEvent, Polarity};

    fn registry(seeds: &[InstrumentSeed]) -> InstrumentRegistry {
        let mut rng = StdRng::seed_from_u64(21);
        InstrumentRegistry::from_seeds(seeds, &SimulationConfig::default(), &mut rng, 0).unwrap()
    }

    #[test]
    fn zero_volatility_move_is_pure_drift() {
        let mut rng = StdRng::seed_from_u64(1);

        let total = percent_move(0.0, 0.5, -1.0, 0.02, &mut rng);

        assert!((total - (0.0025 - 0.002 + 0.02)).abs() < 1e-12);
    }

    #[test]
    fn noise_stays_within_volatility_band() {
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..5_000 {
            let total = percent_move(0.03, 0.0, 0.0, 0.0, &mut rng);
            assert!((-0.03..=0.03).contains(&total));
        }
    }

    #[test]
    fn price_never_drops_below_floor() {
        assert_eq!(next_price(10.0, -1.5), PRICE_FLOOR);
        assert_eq!(next_price(10.0, -1.0), PRICE_FLOOR);
        assert_eq!(next_price(f64::MAX, f64::MAX), PRICE_FLOOR);
        assert!((next_price(100.0, 0.01) - 101.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_inputs_keep_prices_positive_and_state_bounded() {
        let mut registry = registry(&[
            InstrumentSeed::new("CRASH", "Crash Co", "Tech", 0.02, 1.0).with_sentiment(-1.0),
            InstrumentSeed::new("MOON", "Moon Co", "Tech", 5.0, 1.0).with_sentiment(1.0),
        ]);
        let mut rng = StdRng::seed_from_u64(3);

        for tick in 0..500 {
            advance_market(&mut registry, -1.0, None, &mut rng, tick, 30);
            for instrument in registry.instruments() {
                assert!(instrument.price() > 0.0);
                assert!((-1.0..=1.0).contains(&instrument.sentiment()));
                assert!(instrument.history().len() <= 30);
            }
        }
    }

    #[test]
    fn history_is_trimmed_and_change_uses_oldest_retained_sample() {
        let mut registry = registry(&[InstrumentSeed::new("FLAT", "Flat Co", "Tech", 50.0, 0.0)]);
        let mut rng = StdRng::seed_from_u64(4);

        for tick in 1..=40 {
            advance_market(&mut registry, 0.0, None, &mut rng, 1_000 + tick, 30);
        }

        let flat = registry.get("FLAT").unwrap();
        assert_eq!(flat.history().len(), 30);
        assert_eq!(flat.history().back().unwrap().ts_ms, 1_040);
        assert_eq!(flat.history().front().unwrap().ts_ms, 1_011);
        let oldest = flat.history().front().unwrap().price;
        assert!((flat.change() - (flat.price() - oldest) / oldest * 100.0).abs() < 1e-9);
        assert_eq!(flat.price(), 50.0);
    }

    #[test]
    fn news_override_then_decays_each_tick() {
        let mut registry = registry(&[
            InstrumentSeed::new("TCH", "TechVision Inc", "Tech", 145.20, 0.02).with_sentiment(-0.4),
        ]);
        let mut rng = StdRng::seed_from_u64(5);
        let event = NewsEvent {
            id: "news-1".to_owned(),
            headline: "Record profits reported by TechVision Inc".to_owned(),
            sentiment: Polarity::Positive,
            magnitude: 0.15,
            affected_symbol: Some("TCH".to_owned()),
            affected_sector: None,
            timestamp_ms: 0,
        };

        apply_news_sentiment(&mut registry, &event);
        assert_eq!(registry.get("TCH").unwrap().sentiment(), 0.8);

        advance_market(&mut registry, 0.0, Some(&event), &mut rng, 1, 30);
        let mut expected = 0.8 * 0.95;
        assert!((registry.get("TCH").unwrap().sentiment() - expected).abs() < 1e-12);

        for tick in 2..6 {
            advance_market(&mut registry, 0.0, None, &mut rng, tick, 30);
            expected *= 0.95;
            assert!((registry.get("TCH").unwrap().sentiment() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn symbol_news_shifts_price_by_two_percent() {
        let mut registry = registry(&[InstrumentSeed::new("STL", "Still Co", "Tech", 100.0, 0.0)]);
        let mut rng = StdRng::seed_from_u64(6);
        let event = NewsEvent {
            id: "news-1".to_owned(),
            headline: "CEO steps down at Still Co".to_owned(),
            sentiment: Polarity::Negative,
            magnitude: -0.12,
            affected_symbol: Some("STL".to_owned()),
            affected_sector: None,
            timestamp_ms: 0,
        };

        apply_news_sentiment(&mut registry, &event);
        advance_market(&mut registry, 0.0, Some(&event), &mut rng, 1, 30);

        // -0.8 * 0.005 sentiment drag plus -0.02 news impact
        let expected = 100.0 * (1.0 - 0.004 - 0.02);
        assert!((registry.get("STL").unwrap().price() - expected).abs() < 1e-9);
    }

    #[test]
    fn decay_moves_toward_neutral() {
        assert_eq!(decay_sentiment(0.0), 0.0);
        assert!(decay_sentiment(-0.5) > -0.5);
        assert!(decay_sentiment(0.5) < 0.5);
    }
}
