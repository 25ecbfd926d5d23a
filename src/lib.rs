// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! Trinetra - Zone Safety Telemetry Server
//!
//! A real-time crowd safety backend:
//! - Tolerant ingestion of zone telemetry (crowd, noise, heat, pollution,
//!   kiosk feedback) from any producer
//! - Deterministic risk scoring (Zone Load Index / Zone Experience Index)
//! - Threshold alerts and ranked operator suggestions
//! - Best-effort WebSocket fan-out to every connected observer
//! - Cancellable auto-dispatch with a fixed undo window
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      Trinetra Server                       │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐  ┌─────────┐  ┌───────────┐  ┌────────────┐  │
//! │  │ Ingest   │→ │ Scoring │→ │   Zone    │→ │  Advisory  │  │
//! │  │ Gateway  │  │ Engine  │  │   Store   │  │  Derivers  │  │
//! │  └──────────┘  └─────────┘  └───────────┘  └────────────┘  │
//! │       ↓                                          ↑         │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │                     Event Bus                       │   │
//! │  └─────────────────────────────────────────────────────┘   │
//! │       ↓                ↓                  ↑                 │
//! │  ┌──────────┐  ┌─────────────┐  ┌──────────────────┐       │
//! │  │ WS Fan-  │  │  Dispatch   │  │    Simulator     │       │
//! │  │   out    │  │  Manager    │  │   Supervisor     │       │
//! │  └──────────┘  └─────────────┘  └──────────────────┘       │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![allow(dead_code)]

pub mod advisory;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod ingest;
pub mod scoring;
pub mod server;
pub mod simulator;
pub mod zones;

// Re-exports for convenience
pub use advisory::{derive_alerts, derive_suggestions, Alert, Suggestion};
pub use config::Config;
pub use crate::core::{EventBus, SensorEvent};
pub use dispatch::{Action, DispatchManager};
pub use ingest::{IngestGateway, RawReading};
pub use scoring::{score, RiskScore};
pub use server::{AppState, WsServer};
pub use simulator::SimulatorSupervisor;
pub use zones::{SensorReading, ZoneState, ZoneStore};

/// Trinetra version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Trinetra name
pub const NAME: &str = "Trinetra";
