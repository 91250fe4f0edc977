use alarm_types::{ClientMessage, ConnectionId};
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::hub::{HubError, HubHandle};

pub mod connection;
pub mod handlers;
pub mod rate_limiter;


pub use connection::ConnectionManager;
use rate_limiter::RateLimiter;

#[derive(Debug, Error)]
enum ConnectionError {
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error(transparent)]
    Hub(#[from] HubError),
}

pub async fn handle_connection(websocket: WebSocket, hub: HubHandle, rate_limiter: RateLimiter) {
    let (connection_id, mut outgoing) = match hub.connect() {
        Ok(connection) => connection,
        Err(e) => {
            error!("Could not register WebSocket connection: {}", e);
            return;
        }
    };
    info!("New WebSocket connection: {}", connection_id);

    let (mut ws_sender, mut ws_receiver) = websocket.split();

    let incoming_handler = {
        let hub = hub.clone();
        let mut rate_limiter = rate_limiter;

        async move {
            while let Some(result) = ws_receiver.next().await {
                match result {
                    Ok(msg) => {
                        if let Err(e) = handle_message(msg, &mut rate_limiter, &hub, connection_id)
                        {
                            warn!("Closing connection {}: {}", connection_id, e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", connection_id, e);
                        break;
                    }
                }
            }
        }
    };

    let outgoing_handler = async move {
        while let Some(message) = outgoing.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize message: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = ws_sender.send(Message::text(json)).await {
                warn!("Failed to send message to {}: {:?}", connection_id, e);
                break;
            }
        }
    };

    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
    }

    info!("Connection {} disconnected", connection_id);
    if let Err(e) = hub.disconnect(connection_id) {
        error!("Could not report disconnect of {}: {}", connection_id, e);
    }
}

fn handle_message(
    msg: Message,
    rate_limiter: &mut RateLimiter,
    hub: &HubHandle,
    connection_id: ConnectionId,
) -> Result<(), ConnectionError> {
    if !rate_limiter.check_rate_limit() {
        return Err(ConnectionError::RateLimited);
    }

    // Pings, pongs and binary frames carry nothing for us
    let Ok(text) = msg.to_str() else {
        return Ok(());
    };

    match serde_json::from_str::<ClientMessage>(text) {
        Ok(client_message) => hub.client_message(connection_id, client_message)?,
        Err(e) => warn!("Ignoring malformed message from {}: {}", connection_id, e),
    }
    Ok(())
}
