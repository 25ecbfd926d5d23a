//! Server module - HTTP ingress/command API and WebSocket fan-out

mod http;
mod ws;

pub use http::{create_router, run_http, AppState};
pub use ws::WsServer;
