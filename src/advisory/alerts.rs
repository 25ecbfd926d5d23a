// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! Threshold alerts

use crate::zones::ZoneState;

use super::{Alert, AlertLevel};

const CROWD_CRITICAL: u32 = 700;
const CROWD_ELEVATED: u32 = 300;
const NOISE_HIGH_DB: f64 = 90.0;
const ZLI_ELEVATED: u8 = 60;

/// Derive threshold alerts for every zone, in zone-insertion order. A
/// single zone contributes up to three: one crowd alert (critical
/// supersedes elevated), one noise alert, one ZLI alert.
pub fn derive_alerts(zones: &[ZoneState]) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for state in zones {
        let zone = &state.reading.zone;
        let crowd = state.reading.crowd;
        let noise = state.reading.noise;
        let zli = state.score.zli;

        if crowd >= CROWD_CRITICAL {
            alerts.push(Alert {
                level: AlertLevel::Critical,
                text: format!("Crowd critical @ {zone} ({crowd})"),
            });
        } else if crowd >= CROWD_ELEVATED {
            alerts.push(Alert {
                level: AlertLevel::Warn,
                text: format!("Crowd elevated @ {zone} ({crowd})"),
            });
        }

        if noise >= NOISE_HIGH_DB {
            alerts.push(Alert {
                level: AlertLevel::Warn,
                text: format!("Noise high @ {zone} ({noise:.1})"),
            });
        }

        if zli >= ZLI_ELEVATED {
            alerts.push(Alert {
                level: AlertLevel::Warn,
                text: format!("ZLI elevated @ {zone} ({zli})"),
            });
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score, ScoreInput};
    use crate::zones::{SensorReading, ZoneStore};

    fn zone(id: &str, crowd: u32, noise: f64, temp: Option<f64>) -> ZoneState {
        let store = ZoneStore::new(20);
        let s = score(&ScoreInput {
            crowd: Some(crowd),
            noise: Some(noise),
            temp,
            ..Default::default()
        });
        store.apply(
            SensorReading {
                zone: id.to_string(),
                crowd,
                noise,
                temp,
                pollution: None,
                kiosk_score: None,
                t: 0,
            },
            s,
        )
    }

    #[test]
    fn test_critical_crowd_alert_names_zone_and_count() {
        let alerts = derive_alerts(&[zone("GHAT1", 750, 50.0, Some(25.0))]);
        let critical = alerts
            .iter()
            .find(|a| a.level == AlertLevel::Critical)
            .expect("critical alert");
        assert!(critical.text.contains("GHAT1"));
        assert!(critical.text.contains("750"));
    }

    #[test]
    fn test_crowd_critical_supersedes_elevated() {
        let alerts = derive_alerts(&[zone("MAIN", 750, 50.0, None)]);
        assert!(!alerts.iter().any(|a| a.text.contains("elevated")
            && a.text.contains("Crowd")));
    }

    #[test]
    fn test_zone_can_emit_three_alerts() {
        // crowd 800 pushes ZLI past 60 as well, noise 95 adds the third
        let alerts = derive_alerts(&[zone("GHAT2", 800, 95.0, Some(38.0))]);
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
        assert!(alerts[1].text.contains("Noise high"));
        assert!(alerts[2].text.contains("ZLI elevated"));
    }

    #[test]
    fn test_quiet_zone_emits_nothing() {
        assert!(derive_alerts(&[zone("MAIN", 50, 40.0, Some(25.0))]).is_empty());
    }

    #[test]
    fn test_alerts_follow_insertion_order() {
        let zones = [zone("B", 400, 50.0, None), zone("A", 400, 50.0, None)];
        let alerts = derive_alerts(&zones);
        assert!(alerts[0].text.contains("B"));
        assert!(alerts[1].text.contains("A"));
    }
}
