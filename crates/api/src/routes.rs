use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use market_core::{Instrument, NewsEvent, OrderKind, TradeAction, TradeError, UserLedger};
use progression::{LevelUp, MissionReward};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    state::{AppState, MarketEvent},
    ws,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/market", get(market))
        .route("/market/trend", put(set_market_trend))
        .route("/market/:symbol", get(instrument))
        .route("/news", get(news))
        .route("/ledger", get(ledger))
        .route("/trades", post(execute_trade))
        .route("/orders", post(place_order))
        .route("/orders/:id", delete(cancel_order))
        .route("/missions/:id/claim", post(claim_mission))
        .route("/watchlist/:symbol", put(toggle_watchlist))
        .route("/ws/events", get(ws::events_socket))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarketResponse {
    tick: u64,
    market_trend: f64,
    instruments: Vec<Instrument>,
}

async fn market(State(state): State<AppState>) -> Json<MarketResponse> {
    let response = state
        .engine()
        .with_simulation(|simulation| MarketResponse {
            tick: simulation.tick_count(),
            market_trend: simulation.market_trend(),
            instruments: simulation.registry().instruments().to_vec(),
        })
        .await;
    Json(response)
}

async fn instrument(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Instrument>, ApiError> {
    state
        .engine()
        .with_simulation(|simulation| simulation.instrument(&symbol).cloned())
        .await
        .map(Json)
        .ok_or_else(|| TradeError::UnknownInstrument(symbol).into())
}

#[derive(Debug, Deserialize, Serialize)]
struct TrendBody {
    trend: f64,
}

async fn set_market_trend(
    State(state): State<AppState>,
    payload: Result<Json<TrendBody>, JsonRejection>,
) -> Result<Json<TrendBody>, ApiError> {
    let Json(body) = payload?;
    let trend = state
        .engine()
        .with_simulation(|simulation| simulation.set_market_trend(body.trend))
        .await;
    Ok(Json(TrendBody { trend }))
}

#[derive(Debug, Serialize)]
struct NewsResponse {
    events: Vec<NewsEvent>,
}

async fn news(State(state): State<AppState>) -> Json<NewsResponse> {
    let events = state
        .engine()
        .with_simulation(|simulation| simulation.news_feed().events().cloned().collect())
        .await;
    Json(NewsResponse { events })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LedgerResponse {
    #[serde(flatten)]
    ledger: UserLedger,
    net_worth: f64,
}

async fn ledger(State(state): State<AppState>) -> Json<LedgerResponse> {
    let response = state
        .engine()
        .with_simulation(|simulation| LedgerResponse {
            ledger: simulation.ledger_snapshot(),
            net_worth: simulation.net_worth(),
        })
        .await;
    Json(response)
}

fn default_leverage() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TradeRequest {
    action: TradeAction,
    symbol: String,
    quantity: u32,
    #[serde(default = "default_leverage")]
    leverage: u32,
}

async fn execute_trade(
    State(state): State<AppState>,
    payload: Result<Json<TradeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let receipt = state
        .engine()
        .with_simulation(|simulation| {
            simulation.execute_trade(
                request.action,
                &request.symbol,
                request.quantity,
                request.leverage,
            )
        })
        .await?;

    state.publish_event(MarketEvent::trade_executed(receipt.clone()));
    Ok(Json(receipt))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderRequest {
    symbol: String,
    #[serde(rename = "type")]
    kind: OrderKind,
    target_price: f64,
    quantity: u32,
    #[serde(default = "default_leverage")]
    leverage: u32,
}

async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let order = state
        .engine()
        .with_simulation(|simulation| {
            simulation.place_order(
                &request.symbol,
                request.kind,
                request.target_price,
                request.quantity,
                request.leverage,
            )
        })
        .await?;

    state.publish_event(MarketEvent::order_placed(order.clone()));
    let location = format!("/orders/{}", order.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(order)))
}

async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let order = state
        .engine()
        .with_simulation(|simulation| simulation.cancel_order(&id))
        .await?;

    state.publish_event(MarketEvent::order_cancelled(order.id));
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimResponse {
    reward: MissionReward,
    #[serde(skip_serializing_if = "Option::is_none")]
    level_up: Option<LevelUp>,
}

async fn claim_mission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let (reward, level_up) = state
        .engine()
        .with_simulation(|simulation| simulation.claim_mission(&id))
        .await?;
    Ok(Json(ClaimResponse { reward, level_up }))
}

#[derive(Debug, Serialize)]
struct WatchlistResponse {
    symbol: String,
    watching: bool,
}

async fn toggle_watchlist(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<WatchlistResponse>, ApiError> {
    let watching = state
        .engine()
        .with_simulation(|simulation| simulation.toggle_watchlist(&symbol))
        .await?;
    Ok(Json(WatchlistResponse { symbol, watching }))
}
