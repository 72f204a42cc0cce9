pub mod error;
pub mod routes;
pub mod state;
pub mod ws;

use axum::Router;
use runtime::SimEngine;

pub fn app(engine: SimEngine) -> Router {
    routes::router(state::AppState::new(engine))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
        Router,
    };
    use futures_util::StreamExt;
    use runtime::SimEngine;
    use serde_json::{json, Value};
    use tokio_tungstenite::tungstenite::Message;
    use tower::ServiceExt;

    use crate::app;

    fn test_app() -> (Router, SimEngine) {
        let engine = SimEngine::for_test_seed(42).unwrap();
        (app(engine.clone()), engine)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn market_lists_the_default_catalog() {
        let (app, _) = test_app();

        let response = app
            .oneshot(Request::get("/market").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["tick"], 0);
        assert_eq!(body["marketTrend"], 0.0);
        assert_eq!(body["instruments"].as_array().unwrap().len(), 45);
    }

    #[tokio::test]
    async fn unknown_instrument_is_not_found() {
        let (app, _) = test_app();

        let response = app
            .oneshot(Request::get("/market/NOPE").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "unknown instrument: NOPE");
    }

    #[tokio::test]
    async fn buy_then_oversell_reports_conflict() {
        let (app, engine) = test_app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/trades",
                json!({"action": "BUY", "symbol": "TCH", "quantity": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let receipt = body_json(response).await;
        assert_eq!(receipt["action"], "BUY");
        assert_eq!(receipt["quantity"], 2);

        let response = app
            .oneshot(json_request(
                "POST",
                "/trades",
                json!({"action": "SELL", "symbol": "TCH", "quantity": 3}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        assert_eq!(engine.ledger_snapshot().await.portfolio.long_quantity("TCH"), 2);
    }

    #[tokio::test]
    async fn zero_quantity_trade_is_a_bad_request() {
        let (app, _) = test_app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/trades",
                json!({"action": "SHORT", "symbol": "TCH", "quantity": 0}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_quantities_are_json_bad_requests() {
        let (app, engine) = test_app();
        let bodies = [
            ("/trades", json!({"action": "BUY", "symbol": "TCH", "quantity": -5})),
            ("/trades", json!({"action": "BUY", "symbol": "TCH", "quantity": 1.5})),
            (
                "/orders",
                json!({"symbol": "TCH", "type": "LIMIT_BUY", "targetPrice": 10.0, "quantity": -5}),
            ),
            (
                "/orders",
                json!({"symbol": "TCH", "type": "LIMIT_BUY", "targetPrice": 10.0, "quantity": 1.5}),
            ),
        ];

        for (uri, body) in bodies {
            let response = app
                .clone()
                .oneshot(json_request("POST", uri, body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body = body_json(response).await;
            assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
        }

        let ledger = engine.ledger_snapshot().await;
        assert!(ledger.pending_orders.is_empty());
        assert_eq!(ledger.portfolio.long_quantity("TCH"), 0);
    }

    #[tokio::test]
    async fn place_and_cancel_order() {
        let (app, engine) = test_app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/orders",
                json!({"symbol": "GRN", "type": "LIMIT_BUY", "targetPrice": 1.0, "quantity": 5}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_owned();
        let order = body_json(response).await;
        assert_eq!(location, format!("/orders/{}", order["id"].as_str().unwrap()));
        assert_eq!(order["leverage"], 1);

        let response = app
            .clone()
            .oneshot(Request::delete(location.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(engine.ledger_snapshot().await.pending_orders.is_empty());

        let response = app
            .oneshot(Request::delete(location.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ledger_reports_net_worth_with_flat_fields() {
        let (app, _) = test_app();

        let response = app
            .oneshot(Request::get("/ledger").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["walletBalance"], 10_000.0);
        assert_eq!(body["netWorth"], 10_000.0);
        assert_eq!(body["xp"], 850);
        assert_eq!(body["pendingOrders"], json!([]));
    }

    #[tokio::test]
    async fn unclaimable_mission_conflicts_and_unknown_mission_is_not_found() {
        let (app, _) = test_app();

        let response = app
            .clone()
            .oneshot(Request::post("/missions/m1/claim").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(Request::post("/missions/m9/claim").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn watchlist_and_trend_updates() {
        let (app, engine) = test_app();

        let response = app
            .clone()
            .oneshot(Request::put("/watchlist/MSFT").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["watching"], true);

        let response = app
            .oneshot(json_request("PUT", "/market/trend", json!({"trend": -4.0})))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["trend"], -1.0);
        assert_eq!(
            engine
                .with_simulation(|simulation| simulation.market_trend())
                .await,
            -1.0
        );
    }

    #[tokio::test]
    async fn websocket_streams_connected_then_ticks() {
        let (app, engine) = test_app();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/events"))
            .await
            .unwrap();

        let connected = next_json(&mut socket).await;
        assert_eq!(connected["event_type"], "connected");

        engine.step_once().await;
        let tick = next_json(&mut socket).await;
        assert_eq!(tick["event_type"], "tick");
        assert_eq!(tick["tick"], 1);
    }

    async fn next_json<S>(socket: &mut S) -> Value
    where
        S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
    {
        let message = tokio::time::timeout(std::time::Duration::from_secs(5), socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        serde_json::from_str(message.to_text().unwrap()).unwrap()
    }
}
