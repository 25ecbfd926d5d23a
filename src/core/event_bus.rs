// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! Event bus for inter-component communication
//!
//! Fan-out is best-effort by construction: `broadcast::Sender::send` never
//! blocks, and an observer that lags simply drops messages. Ingestion is
//! therefore isolated from slow or disconnected observers.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::dispatch::Action;

/// Wire payload of a `sensor` broadcast event, one per ingested reading.
/// `id` is the zone id; `t` is the gateway-assigned arrival time in epoch
/// millis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorEvent {
    pub id: String,
    pub crowd: u32,
    pub noise: f64,
    pub temp: Option<f64>,
    pub zli: u8,
    pub t: i64,
}

/// Central pub/sub hub between the ingestion gateway, the dispatch
/// manager and every connected observer.
pub struct EventBus {
    sensor_tx: broadcast::Sender<SensorEvent>,
    action_tx: broadcast::Sender<Action>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sensor_tx, _) = broadcast::channel(capacity);
        let (action_tx, _) = broadcast::channel(capacity);

        Self {
            sensor_tx,
            action_tx,
        }
    }

    pub fn publish_sensor(&self, event: SensorEvent) {
        if self.sensor_tx.send(event).is_err() {
            debug!("no observers connected, sensor event dropped");
        }
    }

    pub fn publish_action(&self, action: Action) {
        if self.action_tx.send(action).is_err() {
            debug!("no observers connected, action event dropped");
        }
    }

    pub fn subscribe_sensors(&self) -> broadcast::Receiver<SensorEvent> {
        self.sensor_tx.subscribe()
    }

    pub fn subscribe_actions(&self) -> broadcast::Receiver<Action> {
        self.action_tx.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.sensor_tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_all_subscribers() {
        let bus = EventBus::new(16);
        let mut a = bus.subscribe_sensors();
        let mut b = bus.subscribe_sensors();

        bus.publish_sensor(SensorEvent {
            id: "GHAT1".to_string(),
            crowd: 42,
            noise: 55.0,
            temp: Some(30.0),
            zli: 20,
            t: 1,
        });

        assert_eq!(a.recv().await.unwrap().crowd, 42);
        assert_eq!(b.recv().await.unwrap().id, "GHAT1");
    }

    #[tokio::test]
    async fn test_publish_without_observers_is_silent() {
        let bus = EventBus::new(16);
        // must not error or block
        bus.publish_sensor(SensorEvent {
            id: "MAIN".to_string(),
            crowd: 0,
            noise: 50.0,
            temp: None,
            zli: 16,
            t: 1,
        });
    }
}
