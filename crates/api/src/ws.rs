use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::state::{AppState, MarketEvent};

pub async fn events_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| stream_events(socket, state))
}

async fn stream_events(mut socket: WebSocket, state: AppState) {
    let mut events = state.subscribe_events();
    let mut ticks = state.subscribe_ticks();

    let tick = state
        .engine()
        .with_simulation(|simulation| simulation.tick_count())
        .await;
    if let Err(err) = send_event(&mut socket, &MarketEvent::connected(tick)).await {
        debug!(error = %err, "websocket closed before greeting");
        return;
    }

    loop {
        let outbound = tokio::select! {
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        debug!(error = %err, "websocket receive failed");
                        return;
                    }
                }
            }
            event = events.recv() => match event {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "websocket client lagged behind user events");
                    continue;
                }
                Err(RecvError::Closed) => return,
            },
            report = ticks.recv() => match report {
                Ok(report) => MarketEvent::from(report),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "websocket client lagged behind ticks");
                    continue;
                }
                Err(RecvError::Closed) => return,
            },
        };

        if let Err(err) = send_event(&mut socket, &outbound).await {
            debug!(error = %err, "websocket send failed");
            return;
        }
    }
}

/// Events that fail to encode are logged and skipped; only a transport failure ends the stream.
async fn send_event(socket: &mut WebSocket, event: &MarketEvent) -> Result<(), axum::Error> {
    match encode_event(event) {
        Some(payload) => socket.send(Message::Text(payload)).await,
        None => Ok(()),
    }
}

fn encode_event(event: &MarketEvent) -> Option<String> {
    serde_json::to_string(event)
        .map_err(|err| debug!(error = %err, "dropping unencodable market event"))
        .ok()
}
