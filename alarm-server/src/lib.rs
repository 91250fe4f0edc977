use serde::Serialize;
use warp::Filter;
use warp::http::StatusCode;

use crate::hub::HubHandle;
use crate::websocket::rate_limiter::RateLimiter;

pub mod config;
pub mod hub;
pub mod websocket;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// `rate_limiter` is the template bucket each socket starts from.
pub fn create_routes(
    hub: HubHandle,
    rate_limiter: RateLimiter,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let hub_filter = warp::any().map({
        let hub = hub.clone();
        move || hub.clone()
    });

    let rate_limiter_filter = warp::any().map(move || rate_limiter.clone());

    // WebSocket endpoint
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(hub_filter.clone())
        .and(rate_limiter_filter)
        .map(|ws: warp::ws::Ws, hub, limiter| {
            ws.on_upgrade(move |socket| websocket::handle_connection(socket, hub, limiter))
        });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // Read-only room view
    let game_state = warp::path!("game" / String)
        .and(warp::get())
        .and(hub_filter)
        .and_then(handle_game_state_request);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET"]);

    websocket
        .or(health)
        .or(game_state)
        .with(cors)
        .with(warp::log("false_alarm"))
}

async fn handle_game_state_request(
    game_id: String,
    hub: HubHandle,
) -> Result<impl warp::Reply, warp::Rejection> {
    match hub.snapshot(&game_id).await {
        Ok(Some(snapshot)) => Ok(warp::reply::with_status(
            warp::reply::json(&snapshot),
            StatusCode::OK,
        )),
        Ok(None) => Ok(warp::reply::with_status(
            warp::reply::json(&ErrorResponse::new("Game not found")),
            StatusCode::NOT_FOUND,
        )),
        Err(e) => {
            tracing::error!("Failed to read game {}: {}", game_id, e);
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorResponse::new("Game service unavailable")),
                StatusCode::SERVICE_UNAVAILABLE,
            ))
        }
    }
}
