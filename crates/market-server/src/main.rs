mod config;
mod store;
mod wiring;

use std::error::Error;

use market_core::SimulationConfig;
use runtime::{unix_millis, SimEngine, Simulation, SimulationClock};
use tokio::{net::TcpListener, sync::watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::store::{load_or_default, JsonFileStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = config::Config::from_env()?;
    let store = JsonFileStore::new(&config.state_path);
    let ledger = load_or_default(&store);

    let simulation_config = SimulationConfig::default().with_news_probability(config.news_probability);
    let simulation =
        Simulation::with_default_catalog(simulation_config, ledger, config.seed, unix_millis())?;
    let engine = SimEngine::new(simulation);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let clock = tokio::spawn(
        SimulationClock::new(engine.clone(), config.tick_interval).run(shutdown_rx.clone()),
    );
    let autosave = tokio::spawn(wiring::autosave(
        engine.clone(),
        store.clone(),
        config.autosave_interval,
        shutdown_rx,
    ));

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(
        addr = %config.listen_addr,
        state_path = %store.path().display(),
        tick_interval_ms = config.tick_interval.as_millis() as u64,
        "market server listening"
    );
    axum::serve(listener, wiring::build_app(engine.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Receivers may already be gone if a task exited early.
    let _ = shutdown_tx.send(true);
    let ticks = clock.await?;
    autosave.await?;
    wiring::persist(&engine, &store).await?;
    info!(ticks, "market server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c, shutting down");
    }
}
