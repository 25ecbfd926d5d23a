// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! WebSocket fan-out for connected observers
//!
//! Every observer gets every `sensor` and `action` event, fire and
//! forget. A slow or dead connection is dropped without ever touching
//! the ingestion path.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, RwLock};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::core::EventBus;

/// WebSocket server relaying bus events to observers.
pub struct WsServer {
    port: u16,
    max_clients: usize,
    clients: Arc<RwLock<HashMap<String, SocketAddr>>>,
    events: Arc<EventBus>,
}

impl WsServer {
    pub fn new(port: u16, max_clients: usize, events: Arc<EventBus>) -> Self {
        Self {
            port,
            max_clients,
            clients: Arc::new(RwLock::new(HashMap::new())),
            events,
        }
    }

    pub async fn start(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr).await?;

        info!("WebSocket fan-out listening on ws://{}", addr);

        let clients = self.clients.clone();
        let max_clients = self.max_clients;
        let events = self.events.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    accept_result = listener.accept() => {
                        match accept_result {
                            Ok((stream, addr)) => {
                                let client_count = clients.read().await.len();
                                if client_count >= max_clients {
                                    warn!("max observers reached, rejecting connection from {}", addr);
                                    continue;
                                }

                                tokio::spawn(handle_connection(
                                    stream,
                                    addr,
                                    clients.clone(),
                                    events.subscribe_sensors(),
                                    events.subscribe_actions(),
                                ));
                            }
                            Err(e) => {
                                error!("accept error: {}", e);
                            }
                        }
                    }
                    _ = shutdown.recv() => {
                        info!("WebSocket fan-out shutting down");
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    pub async fn observer_count(&self) -> usize {
        self.clients.read().await.len()
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    clients: Arc<RwLock<HashMap<String, SocketAddr>>>,
    mut sensor_rx: broadcast::Receiver<crate::core::SensorEvent>,
    mut action_rx: broadcast::Receiver<crate::dispatch::Action>,
) {
    let client_id = uuid::Uuid::new_v4().to_string();

    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!("WebSocket handshake failed for {}: {}", addr, e);
            return;
        }
    };

    info!("observer connected from {} (id: {})", addr, client_id);
    clients.write().await.insert(client_id.clone(), addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // local-only courtesy, not part of the wire contract
    let welcome = serde_json::json!({
        "type": "welcome",
        "client_id": client_id,
        "server": "Trinetra",
        "version": env!("CARGO_PKG_VERSION"),
    });
    if let Err(e) = ws_sender.send(Message::Text(welcome.to_string().into())).await {
        warn!("failed to send welcome to {}: {}", addr, e);
    }

    loop {
        tokio::select! {
            msg = ws_receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!("received from {}: {}", addr, text);
                        if let Ok(cmd) = serde_json::from_str::<serde_json::Value>(&text) {
                            if cmd.get("type").and_then(|v| v.as_str()) == Some("ping") {
                                let pong = serde_json::json!({"type": "pong"});
                                let _ = ws_sender.send(Message::Text(pong.to_string().into())).await;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("WebSocket closed by observer {}", addr);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sender.send(Message::Pong(data)).await;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error from {}: {}", addr, e);
                        break;
                    }
                    None => break,
                    _ => {}
                }
            }

            ev = sensor_rx.recv() => {
                match ev {
                    Ok(event) => {
                        let frame = serde_json::json!({ "type": "sensor", "data": event });
                        if let Err(e) = ws_sender.send(Message::Text(frame.to_string().into())).await {
                            warn!("failed to send to {}: {}", addr, e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // best-effort delivery: the observer fell behind
                        warn!("observer {} lagged, {} sensor events dropped", addr, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            act = action_rx.recv() => {
                match act {
                    Ok(action) => {
                        let frame = serde_json::json!({ "type": "action", "data": action });
                        if let Err(e) = ws_sender.send(Message::Text(frame.to_string().into())).await {
                            warn!("failed to send to {}: {}", addr, e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("observer {} lagged, {} action events dropped", addr, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    clients.write().await.remove(&client_id);
    info!("observer {} disconnected", addr);
}
