use std::time::Duration;

use axum::{routing::get, Router};
use market_core::UserLedger;
use runtime::SimEngine;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::store::{StateStore, StoreError};

pub fn build_app(engine: SimEngine) -> Router {
    api::app(engine).route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}

/// Writes the current ledger through `store` off the async runtime.
pub async fn persist<S>(engine: &SimEngine, store: &S) -> Result<UserLedger, StoreError>
where
    S: StateStore + Clone + Send + 'static,
{
    let ledger = engine.ledger_snapshot().await;
    let store = store.clone();
    let saved = ledger.clone();
    tokio::task::spawn_blocking(move || store.save(&saved)).await??;
    Ok(ledger)
}

/// Saves periodically until `shutdown` flips, skipping writes when the ledger is
/// unchanged since the last save. Returns the number of writes.
pub async fn autosave<S>(
    engine: SimEngine,
    store: S,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> u64
where
    S: StateStore + Clone + Send + 'static,
{
    let period = period.max(Duration::from_millis(1));
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_saved: Option<UserLedger> = None;
    let mut saves = 0;

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = interval.tick() => {
                if last_saved.as_ref() == Some(&engine.ledger_snapshot().await) {
                    continue;
                }
                match persist(&engine, &store).await {
                    Ok(ledger) => {
                        saves += 1;
                        last_saved = Some(ledger);
                        debug!(saves, "user state saved");
                    }
                    Err(err) => warn!(error = %err, "autosave failed"),
                }
            }
        }
    }

    saves
}
