// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! Ingestion gateway
//!
//! Accepts readings from any producer in a tolerant wire shape (field
//! names vary across legacy producers), normalizes them into one
//! canonical record, assigns the authoritative arrival timestamp, scores
//! the zone, replaces its stored state and publishes the wire event.
//! Never blocks on observer delivery.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::core::{EventBus, SensorEvent};
use crate::scoring::{self, ScoreInput, DEFAULT_NOISE_DB};
use crate::zones::{SensorReading, ZoneState, ZoneStore};

/// Inbound reading as producers actually send it. Each field accepts the
/// aliases used by the known legacy shapes; anything else is rejected at
/// the zone-id check rather than silently defaulted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReading {
    #[serde(default, alias = "zoneId", alias = "zone_id")]
    pub zone: Option<String>,
    #[serde(default, alias = "crowdCount")]
    pub crowd: Option<u32>,
    #[serde(default, alias = "noiseDb")]
    pub noise: Option<f64>,
    #[serde(default, alias = "avgTemp")]
    pub temp: Option<f64>,
    #[serde(default, alias = "pm25")]
    pub pollution: Option<f64>,
    #[serde(default, alias = "kioskScore")]
    pub kiosk_score: Option<f64>,
    /// Producer clock, kept only as a debugging hint. The gateway assigns
    /// its own arrival timestamp.
    #[serde(default)]
    pub t: Option<i64>,
    /// Some producers ship their own load index. It is untrusted and
    /// always recomputed.
    #[serde(default)]
    pub zli: Option<u32>,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing or empty zone id")]
    MissingZone,
}

/// Entry point for all inbound telemetry.
pub struct IngestGateway {
    store: Arc<ZoneStore>,
    events: Arc<EventBus>,
}

impl IngestGateway {
    pub fn new(store: Arc<ZoneStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    /// Normalize, score, store and broadcast one reading. On error the
    /// store is untouched and nothing is broadcast.
    pub fn ingest(&self, raw: RawReading) -> Result<SensorReading, IngestError> {
        let zone = raw
            .zone
            .filter(|z| !z.trim().is_empty())
            .ok_or(IngestError::MissingZone)?;

        if raw.zli.is_some() {
            debug!(%zone, "ignoring producer-supplied zli, recomputing");
        }

        let t = Utc::now().timestamp_millis();
        let reading = SensorReading {
            crowd: raw.crowd.unwrap_or(0),
            noise: raw.noise.unwrap_or(DEFAULT_NOISE_DB),
            temp: raw.temp,
            pollution: raw.pollution,
            kiosk_score: raw.kiosk_score,
            zone,
            t,
        };

        let score = scoring::score(&ScoreInput {
            crowd: Some(reading.crowd),
            temp: reading.temp,
            noise: Some(reading.noise),
            pollution: reading.pollution,
            kiosk_score: reading.kiosk_score,
        });

        let state = self.store.apply(reading, score);
        self.events.publish_sensor(wire_event(&state));
        Ok(state.reading)
    }
}

fn wire_event(state: &ZoneState) -> SensorEvent {
    SensorEvent {
        id: state.reading.zone.clone(),
        crowd: state.reading.crowd,
        noise: state.reading.noise,
        temp: state.reading.temp,
        zli: state.score.zli,
        t: state.reading.t,
    }
}
