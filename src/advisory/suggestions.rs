// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! Ranked operator suggestions
//!
//! Deterministic rules, evaluated per zone in fixed priority order. A
//! critical match short-circuits the remaining rules for that zone; the
//! heat, patrol and monitor rules are otherwise independent, so one zone
//! can contribute several suggestions. The collected list is sorted by
//! urgency, ties broken by affected-people count descending. Operators
//! scan top to bottom, so that ordering is a contract.

use crate::zones::ZoneState;

use super::{Suggestion, SuggestionLevel};

const ZLI_CRITICAL: u8 = 90;
const CROWD_CRITICAL: u32 = 700;
const TEMP_HEAT_C: f64 = 36.0;
const ZLI_PATROL: u8 = 50;
const NOISE_PATROL_DB: f64 = 85.0;
const CROWD_MONITOR: u32 = 200;

/// Derive and rank suggestions across all zones.
pub fn derive_suggestions(zones: &[ZoneState]) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for state in zones {
        let zone = state.reading.zone.clone();
        let crowd = state.reading.crowd;
        let noise = state.reading.noise;
        let zli = state.score.zli;

        if zli >= ZLI_CRITICAL || crowd >= CROWD_CRITICAL {
            suggestions.push(Suggestion {
                zone,
                title: "Immediate surveillance recommended".to_string(),
                level: SuggestionLevel::Critical,
                rationale: format!("ZLI {zli} and crowd {crowd} - high risk of crowding."),
                people: crowd,
            });
            continue;
        }

        if let Some(temp) = state.reading.temp {
            if temp >= TEMP_HEAT_C {
                suggestions.push(Suggestion {
                    zone: zone.clone(),
                    title: "Heat stress risk - suggest water points".to_string(),
                    level: SuggestionLevel::Info,
                    rationale: format!("Temperature {temp:.1}°C - provide extra water and shade."),
                    people: crowd,
                });
            }
        }

        if zli >= ZLI_PATROL || noise >= NOISE_PATROL_DB {
            suggestions.push(Suggestion {
                zone: zone.clone(),
                title: "Increase patrols / crowd control".to_string(),
                level: SuggestionLevel::Warn,
                rationale: format!("ZLI {zli}, noise {noise:.1} dB - potential agitation."),
                people: crowd,
            });
        }

        if crowd >= CROWD_MONITOR && zli < ZLI_PATROL {
            suggestions.push(Suggestion {
                zone,
                title: "Crowd growing - monitor and prepare".to_string(),
                level: SuggestionLevel::Monitor,
                rationale: format!("Crowd {crowd} - keep mobilised staff nearby."),
                people: crowd,
            });
        }
    }

    suggestions.sort_by(|a, b| {
        a.level
            .priority()
            .cmp(&b.level.priority())
            .then(b.people.cmp(&a.people))
    });
    suggestions
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
    fn test_critical_zone_short_circuits() {
        // crowd 750 with heat and noise would match every other rule too
        let suggestions = derive_suggestions(&[zone("GHAT1", 750, 95.0, Some(40.0))]);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].level, SuggestionLevel::Critical);
        assert_eq!(suggestions[0].zone, "GHAT1");
    }

    #[test]
    fn test_ghat1_crowd_surge_ranks_critical_first() {
        let zones = [
            zone("MAIN", 50, 50.0, Some(25.0)),
            zone("GHAT1", 750, 50.0, Some(25.0)),
        ];
        let suggestions = derive_suggestions(&zones);
        assert_eq!(suggestions[0].zone, "GHAT1");
        assert_eq!(suggestions[0].level, SuggestionLevel::Critical);
    }

    #[test]
    fn test_heat_only_zone_yields_single_info() {
        let suggestions = derive_suggestions(&[zone("MAIN", 50, 50.0, Some(37.0))]);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].level, SuggestionLevel::Info);
        assert!(suggestions[0].rationale.contains("37"));
    }

    #[test]
    fn test_heat_cooccurs_with_monitor() {
        // hot but quiet and well-rated zone: load stays under the patrol
        // threshold, so the heat rule and the monitor fallback both fire
        let store = ZoneStore::new(20);
        let reading = SensorReading {
            zone: "GHAT2".to_string(),
            crowd: 200,
            noise: 30.0,
            temp: Some(36.5),
            pollution: None,
            kiosk_score: Some(5.0),
            t: 0,
        };
        let s = score(&ScoreInput {
            crowd: Some(reading.crowd),
            noise: Some(reading.noise),
            temp: reading.temp,
            kiosk_score: reading.kiosk_score,
            ..Default::default()
        });
        let state = store.apply(reading, s);

        let suggestions = derive_suggestions(&[state]);
        let levels: Vec<_> = suggestions.iter().map(|s| s.level).collect();
        assert_eq!(levels, [SuggestionLevel::Info, SuggestionLevel::Monitor]);
    }

    #[test]
    fn test_ordering_contract() {
        let zones = [
            zone("D", 250, 40.0, None),          // monitor, people 250
            zone("B", 650, 95.0, None),          // warn, people 650
            zone("A", 900, 50.0, None),          // critical, people 900
            zone("C", 500, 95.0, None),          // warn, people 500
        ];
        let suggestions = derive_suggestions(&zones);
        let got: Vec<_> = suggestions
            .iter()
            .map(|s| (s.level, s.people))
            .collect();
        assert_eq!(
            got,
            [
                (SuggestionLevel::Critical, 900),
                (SuggestionLevel::Warn, 650),
                (SuggestionLevel::Warn, 500),
                (SuggestionLevel::Monitor, 250),
            ]
        );
    }

    #[test]
    fn test_patrol_fires_on_noise_alone() {
        let suggestions = derive_suggestions(&[zone("MAIN", 10, 88.0, None)]);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].level, SuggestionLevel::Warn);
        assert!(suggestions[0].rationale.contains("88.0"));
    }
}
