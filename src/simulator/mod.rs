// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! Telemetry simulator
//!
//! A supervised background producer that POSTs randomized zone readings
//! to the ingestion endpoint, standing in for real field sensors during
//! demos. It talks to the server over plain HTTP like any external
//! producer would, so the whole ingestion path is exercised. At most one
//! producer runs at a time.

use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use rand::prelude::*;
use rand_distr::Normal;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SimulatorConfig;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Simulator already running")]
    AlreadyRunning,
}

/// Payload in the legacy producer shape, including the advisory fields
/// (`zli`, `t`) the gateway is expected to discard.
#[derive(Debug, Clone, Serialize)]
struct SimReading {
    zone: String,
    crowd: u32,
    noise: f64,
    temp: f64,
    zli: u32,
    t: i64,
}

/// Owns the single producer task; exposes only start/stop.
pub struct SimulatorSupervisor {
    config: SimulatorConfig,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatorSupervisor {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            task: Mutex::new(None),
        }
    }

    /// Spawn the producer loop. Errors when one is already running.
    pub fn start(&self) -> Result<(), SimulatorError> {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return Err(SimulatorError::AlreadyRunning);
        }

        info!(target_url = %self.config.target_url, "simulator starting");
        *task = Some(tokio::spawn(run_producer(self.config.clone())));
        Ok(())
    }

    /// Stop the producer. Idempotent.
    pub fn stop(&self) -> bool {
        match self.task.lock().take() {
            Some(task) => {
                task.abort();
                info!("simulator stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|t| !t.is_finished())
    }
}

async fn run_producer(config: SimulatorConfig) {
    let client = reqwest::Client::new();
    let url = format!("{}/api/sensor", config.target_url.trim_end_matches('/'));
    let mut rng = rand::rngs::StdRng::from_entropy();
    let noise_jitter = Normal::new(0.0, 2.0).unwrap();

    let mut tick = tokio::time::interval(Duration::from_secs_f64(config.interval_secs));

    loop {
        // the first interval tick fires immediately, matching the
        // send-then-wait cadence of the field producers
        tick.tick().await;

        let reading = generate_reading(&config, &mut rng, noise_jitter);
        let zone = reading.zone.clone();

        match client.post(&url).json(&reading).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(%zone, crowd = reading.crowd, "reading sent");
            }
            Ok(resp) => {
                warn!(%zone, status = %resp.status(), "server rejected reading");
            }
            Err(e) => {
                warn!("producer send failed: {}", e);
            }
        }
    }
}

fn generate_reading(
    config: &SimulatorConfig,
    rng: &mut rand::rngs::StdRng,
    noise_jitter: Normal<f64>,
) -> SimReading {
    let zone = config
        .zones
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| "MAIN".to_string());

    let mut crowd = rng.gen_range(10..=250);
    // occasional surge
    if rng.gen::<f64>() < config.surge_probability {
        crowd += rng.gen_range(80..=450);
    }

    let noise = (rng.gen_range(40.0..95.0) + rng.sample(noise_jitter)).clamp(30.0, 110.0);
    let temp: f64 = rng.gen_range(24.0..40.0);

    SimReading {
        zone,
        crowd,
        noise: (noise * 10.0).round() / 10.0,
        temp: (temp * 10.0).round() / 10.0,
        // deliberately bogus: the gateway must recompute this
        zli: rng.gen_range(0..=100),
        t: Utc::now().timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimulatorConfig {
        SimulatorConfig {
            target_url: "http://localhost:4000".to_string(),
            interval_secs: 1.0,
            zones: vec!["GHAT1".to_string(), "GHAT2".to_string(), "MAIN".to_string()],
            surge_probability: 0.08,
        }
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let sup = SimulatorSupervisor::new(config());
        sup.start().unwrap();
        assert!(matches!(sup.start(), Err(SimulatorError::AlreadyRunning)));
        assert!(sup.is_running());
        sup.stop();
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let sup = SimulatorSupervisor::new(config());
        assert!(!sup.stop());
        sup.start().unwrap();
        assert!(sup.stop());
        assert!(!sup.stop());
        assert!(!sup.is_running());
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let sup = SimulatorSupervisor::new(config());
        sup.start().unwrap();
        sup.stop();
        assert!(sup.start().is_ok());
        sup.stop();
    }

    #[test]
    fn test_generated_readings_stay_in_range() {
        let cfg = config();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let jitter = Normal::new(0.0, 2.0).unwrap();
        for _ in 0..500 {
            let r = generate_reading(&cfg, &mut rng, jitter);
            assert!(cfg.zones.contains(&r.zone));
            assert!(r.crowd >= 10 && r.crowd <= 700);
            assert!(r.noise >= 30.0 && r.noise <= 110.0);
            assert!(r.temp >= 24.0 && r.temp < 40.05);
            assert!(r.zli <= 100);
        }
    }
}
