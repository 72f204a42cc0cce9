use std::{
    env,
    net::{AddrParseError, Ipv4Addr, SocketAddr, SocketAddrV4},
    time::Duration,
};

use market_core::config::DEFAULT_NEWS_PROBABILITY;
use runtime::DEFAULT_TICK_INTERVAL;
use thiserror::Error;

const DEFAULT_LISTEN_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));
const DEFAULT_STATE_PATH: &str = "artifacts/user_state.json";
const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(5_000);

const ENV_ADDR: &str = "MARKET_SERVER_ADDR";
const ENV_TICK_INTERVAL: &str = "MARKET_TICK_INTERVAL_MS";
const ENV_STATE_PATH: &str = "MARKET_STATE_PATH";
const ENV_AUTOSAVE_INTERVAL: &str = "MARKET_AUTOSAVE_INTERVAL_MS";
const ENV_NEWS_PROBABILITY: &str = "MARKET_NEWS_PROBABILITY";
const ENV_SEED: &str = "MARKET_SEED";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub tick_interval: Duration,
    pub state_path: String,
    pub autosave_interval: Duration,
    pub news_probability: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MARKET_SERVER_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(#[source] AddrParseError),
    #[error("MARKET_TICK_INTERVAL_MS must be a positive whole number of milliseconds")]
    InvalidTickInterval,
    #[error("MARKET_STATE_PATH must not be empty or whitespace")]
    InvalidStatePath,
    #[error("MARKET_AUTOSAVE_INTERVAL_MS must be a positive whole number of milliseconds")]
    InvalidAutosaveInterval,
    #[error("MARKET_NEWS_PROBABILITY must be a finite probability between 0 and 1")]
    InvalidNewsProbability,
    #[error("MARKET_SEED must be an unsigned 64-bit integer")]
    InvalidSeed,
    #[error("MARKET_SERVER_ADDR contains non-unicode data")]
    NonUnicodeListenAddr,
    #[error("MARKET_TICK_INTERVAL_MS contains non-unicode data")]
    NonUnicodeTickInterval,
    #[error("MARKET_STATE_PATH contains non-unicode data")]
    NonUnicodeStatePath,
    #[error("MARKET_AUTOSAVE_INTERVAL_MS contains non-unicode data")]
    NonUnicodeAutosaveInterval,
    #[error("MARKET_NEWS_PROBABILITY contains non-unicode data")]
    NonUnicodeNewsProbability,
    #[error("MARKET_SEED contains non-unicode data")]
    NonUnicodeSeed,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match env::var(ENV_ADDR) {
            Ok(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            Err(env::VarError::NotPresent) => DEFAULT_LISTEN_ADDR,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeListenAddr);
            }
        };

        let tick_interval = parse_millis_env(
            ENV_TICK_INTERVAL,
            DEFAULT_TICK_INTERVAL,
            ConfigError::InvalidTickInterval,
            ConfigError::NonUnicodeTickInterval,
        )?;

        let state_path = match env::var(ENV_STATE_PATH) {
            Ok(value) => {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidStatePath);
                }
                value
            }
            Err(env::VarError::NotPresent) => DEFAULT_STATE_PATH.to_owned(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeStatePath);
            }
        };

        let autosave_interval = parse_millis_env(
            ENV_AUTOSAVE_INTERVAL,
            DEFAULT_AUTOSAVE_INTERVAL,
            ConfigError::InvalidAutosaveInterval,
            ConfigError::NonUnicodeAutosaveInterval,
        )?;

        let news_probability = match env::var(ENV_NEWS_PROBABILITY) {
            Ok(value) => {
                let parsed = value
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidNewsProbability)?;
                if !parsed.is_finite() || !(0.0..=1.0).contains(&parsed) {
                    return Err(ConfigError::InvalidNewsProbability);
                }
                parsed
            }
            Err(env::VarError::NotPresent) => DEFAULT_NEWS_PROBABILITY,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeNewsProbability);
            }
        };

        let seed = match env::var(ENV_SEED) {
            Ok(value) => Some(value.parse::<u64>().map_err(|_| ConfigError::InvalidSeed)?),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeSeed);
            }
        };

        Ok(Self {
            listen_addr,
            tick_interval,
            state_path,
            autosave_interval,
            news_probability,
            seed,
        })
    }
}

fn parse_millis_env(
    key: &str,
    default: Duration,
    invalid_error: ConfigError,
    non_unicode_error: ConfigError,
) -> Result<Duration, ConfigError> {
    match env::var(key) {
        Ok(value) => match value.parse::<u64>() {
            Ok(millis) if millis > 0 => Ok(Duration::from_millis(millis)),
            _ => Err(invalid_error),
        },
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(_)) => Err(non_unicode_error),
    }
}
