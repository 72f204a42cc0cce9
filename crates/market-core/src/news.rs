//! Market-moving headlines.
//!
//! At most one [`NewsEvent`] is emitted per tick. Company templates target a single
//! instrument, sector templates target every instrument sharing a category.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::instrument::{Instrument, InstrumentRegistry};

pub const NEWS_SENTIMENT_OVERRIDE: f64 = 0.8;
pub const SYMBOL_NEWS_IMPACT: f64 = 0.02;
pub const SECTOR_NEWS_IMPACT: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Polarity {
    pub fn sign(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
            Self::Neutral => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateTarget {
    Company,
    Sector,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewsTemplate {
    pub text: &'static str,
    pub polarity: Polarity,
    pub magnitude: f64,
    pub target: TemplateTarget,
}

const fn template(
    text: &'static str,
    polarity: Polarity,
    magnitude: f64,
    target: TemplateTarget,
) -> NewsTemplate {
    NewsTemplate {
        text,
        polarity,
        magnitude,
        target,
    }
}

pub const NEWS_TEMPLATES: [NewsTemplate; 8] = [
    template("Record profits reported by {company}", Polarity::Positive, 0.15, TemplateTarget::Company),
    template("{company} faces regulatory scrutiny", Polarity::Negative, -0.15, TemplateTarget::Company),
    template("New product launch drives {sector} optimism", Polarity::Positive, 0.1, TemplateTarget::Sector),
    template("Global supply chain issues hit {sector}", Polarity::Negative, -0.1, TemplateTarget::Sector),
    template("Market analysts upgrade {company} to Buy", Polarity::Positive, 0.08, TemplateTarget::Company),
    template("CEO steps down at {company}", Polarity::Negative, -0.12, TemplateTarget::Company),
    template("Breakthrough technology announced by {company}", Polarity::Positive, 0.2, TemplateTarget::Company),
    template("Inflation fears cause dip in {sector} stocks", Polarity::Negative, -0.08, TemplateTarget::Sector),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsEvent {
    pub id: String,
    pub headline: String,
    pub sentiment: Polarity,
    pub magnitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_sector: Option<String>,
    pub timestamp_ms: u64,
}

impl NewsEvent {
    pub fn render(
        id: String,
        template: &NewsTemplate,
        instrument: &Instrument,
        timestamp_ms: u64,
    ) -> Self {
        let (headline, affected_symbol, affected_sector) = match template.target {
            TemplateTarget::Company => (
                template.text.replace("{company}", &instrument.name),
                Some(instrument.symbol.clone()),
                None,
            ),
            TemplateTarget::Sector => (
                template.text.replace("{sector}", &instrument.category),
                None,
                Some(instrument.category.clone()),
            ),
        };

        Self {
            id,
            headline,
            sentiment: template.polarity,
            magnitude: template.magnitude,
            affected_symbol,
            affected_sector,
            timestamp_ms,
        }
    }

    /// Extra percent move this event adds to `instrument` on the tick it fires.
    pub fn impact_for(&self, instrument: &Instrument) -> f64 {
        let sign = self.sentiment.sign();
        if self.affected_symbol.as_deref() == Some(instrument.symbol.as_str()) {
            SYMBOL_NEWS_IMPACT * sign
        } else if self.affected_sector.as_deref() == Some(instrument.category.as_str()) {
            SECTOR_NEWS_IMPACT * sign
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewsGenerator {
    probability: f64,
    next_id: u64,
}

impl NewsGenerator {
    pub fn new(probability: f64) -> Self {
        let probability = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            probability,
            next_id: 1,
        }
    }

    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        registry: &InstrumentRegistry,
        rng: &mut R,
        now_ms: u64,
    ) -> Option<NewsEvent> {
        if registry.is_empty() || rng.gen::<f64>() >= self.probability {
            return None;
        }

        let template = &NEWS_TEMPLATES[rng.gen_range(0..NEWS_TEMPLATES.len())];
        let instrument = &registry.instruments()[rng.gen_range(0..registry.len())];
        let id = format!("news-{}", self.next_id);
        self.next_id += 1;

        let event = NewsEvent::render(id, template, instrument, now_ms);
        debug!(
            id = %event.id,
            headline = %event.headline,
            sentiment = ?event.sentiment,
            "news generated"
        );
        Some(event)
    }
}

/// Overwrites the targeted instrument's sentiment before prices move.
///
/// Sector news and neutral events leave sentiment untouched.
pub fn apply_news_sentiment(registry: &mut InstrumentRegistry, event: &NewsEvent) {
    let Some(symbol) = event.affected_symbol.as_deref() else {
        return;
    };
    let sentiment = match event.sentiment {
        Polarity::Positive => NEWS_SENTIMENT_OVERRIDE,
        Polarity::Negative => -NEWS_SENTIMENT_OVERRIDE,
        Polarity::Neutral => return,
    };

    if let Some(instrument) = registry.get_mut(symbol) {
        instrument.set_sentiment(sentiment);
    }
}

/// Most recent events, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsFeed {
    capacity: usize,
    events: VecDeque<NewsEvent>,
}

impl NewsFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: NewsEvent) {
        self.events.push_front(event);
        self.events.truncate(self.capacity);
    }

    pub fn events(&self) -> impl Iterator<Item = &NewsEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
