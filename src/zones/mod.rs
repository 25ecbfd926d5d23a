// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! Zone state store
//!
//! Process-wide mapping of zone id to the latest reading and derived
//! score. A zone is created on its first reading, fully replaced on every
//! subsequent one and never deleted. Readers always get cloned snapshots
//! in zone-insertion order, never a view into live state.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::scoring::RiskScore;

/// One normalized telemetry sample, as stored and echoed back to the
/// producer. The arrival timestamp `t` (epoch millis) is assigned by the
/// ingestion gateway, never trusted from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub zone: String,
    pub crowd: u32,
    pub noise: f64,
    pub temp: Option<f64>,
    pub pollution: Option<f64>,
    pub kiosk_score: Option<f64>,
    pub t: i64,
}

/// A single point of the per-zone ZLI history ring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistorySample {
    pub t: i64,
    pub zli: u8,
}

/// Latest known state for one zone.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneState {
    pub reading: SensorReading,
    pub score: RiskScore,
    pub updated_at: DateTime<Utc>,
    pub history: VecDeque<HistorySample>,
}

struct StoreInner {
    zones: HashMap<String, ZoneState>,
    // first-seen order, the iteration contract for derivers
    order: Vec<String>,
}

/// Exclusive owner of all zone state.
pub struct ZoneStore {
    inner: RwLock<StoreInner>,
    history_len: usize,
}

impl ZoneStore {
    pub fn new(history_len: usize) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                zones: HashMap::new(),
                order: Vec::new(),
            }),
            history_len,
        }
    }

    /// Replace the zone's state with a fresh reading and score. The ZLI
    /// history ring is carried over and extended, everything else is
    /// overwritten. Returns the stored state.
    pub fn apply(&self, reading: SensorReading, score: RiskScore) -> ZoneState {
        let mut inner = self.inner.write();

        if !inner.zones.contains_key(&reading.zone) {
            inner.order.push(reading.zone.clone());
        }
        let mut history = inner
            .zones
            .get(&reading.zone)
            .map(|prev| prev.history.clone())
            .unwrap_or_else(|| VecDeque::with_capacity(self.history_len));
        history.push_back(HistorySample {
            t: reading.t,
            zli: score.zli,
        });
        while history.len() > self.history_len {
            history.pop_front();
        }

        let state = ZoneState {
            updated_at: Utc::now(),
            reading,
            score,
            history,
        };
        inner
            .zones
            .insert(state.reading.zone.clone(), state.clone());
        state
    }

    /// Point-in-time snapshot of every zone, in insertion order.
    pub fn snapshot(&self) -> Vec<ZoneState> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.zones.get(id).cloned())
            .collect()
    }

    pub fn get(&self, zone: &str) -> Option<ZoneState> {
        self.inner.read().zones.get(zone).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score, ScoreInput};

    fn reading(zone: &str, crowd: u32, t: i64) -> (SensorReading, RiskScore) {
        let r = SensorReading {
            zone: zone.to_string(),
            crowd,
            noise: 50.0,
            temp: None,
            pollution: None,
            kiosk_score: None,
            t,
        };
        let s = score(&ScoreInput {
            crowd: Some(crowd),
            noise: Some(50.0),
            ..Default::default()
        });
        (r, s)
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let store = ZoneStore::new(20);
        for zone in ["GHAT2", "MAIN", "GHAT1"] {
            let (r, s) = reading(zone, 10, 1);
            store.apply(r, s);
        }
        // updating an existing zone must not move it
        let (r, s) = reading("MAIN", 500, 2);
        store.apply(r, s);

        let ids: Vec<_> = store
            .snapshot()
            .iter()
            .map(|z| z.reading.zone.clone())
            .collect();
        assert_eq!(ids, ["GHAT2", "MAIN", "GHAT1"]);
    }

    #[test]
    fn test_second_reading_fully_replaces_first() {
        let store = ZoneStore::new(20);
        let (r1, s1) = reading("GHAT1", 750, 1);
        store.apply(r1, s1);
        let (r2, s2) = reading("GHAT1", 20, 2);
        store.apply(r2, s2);

        let state = store.get("GHAT1").unwrap();
        assert_eq!(state.reading.crowd, 20);
        assert_eq!(state.reading.t, 2);
        assert_eq!(state.score.zli, s2.zli);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_history_ring_is_bounded() {
        let store = ZoneStore::new(3);
        for t in 0..10 {
            let (r, s) = reading("MAIN", 100, t);
            store.apply(r, s);
        }
        let state = store.get("MAIN").unwrap();
        assert_eq!(state.history.len(), 3);
        assert_eq!(state.history.front().unwrap().t, 7);
        assert_eq!(state.history.back().unwrap().t, 9);
    }

    #[test]
    fn test_snapshot_is_point_in_time() {
        let store = ZoneStore::new(20);
        let (r, s) = reading("GHAT1", 100, 1);
        store.apply(r, s);
        let snap = store.snapshot();

        let (r, s) = reading("GHAT1", 900, 2);
        store.apply(r, s);
        assert_eq!(snap[0].reading.crowd, 100);
    }
}
