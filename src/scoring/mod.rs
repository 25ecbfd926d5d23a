// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! Zone risk scoring engine
//!
//! Turns one raw telemetry sample into a bounded composite index. Every
//! metric is squashed through a tanh curve centered at its baseline, then
//! combined into the Zone Load Index (ZLI, 0-100) and the Zone Experience
//! Index (ZEI, 0-100). Pure and total: absent fields fall back to their
//! baselines, out-of-range inputs are clamped, never rejected.

use serde::{Deserialize, Serialize};

/// Baseline used when a reading carries no temperature (°C).
pub const DEFAULT_TEMP_C: f64 = 25.0;
/// Baseline used when a reading carries no noise level (dB).
pub const DEFAULT_NOISE_DB: f64 = 50.0;
/// Baseline used when a reading carries no pollution index.
pub const DEFAULT_POLLUTION: f64 = 10.0;

/// Color tier shown on zone cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Green,
    Yellow,
    Red,
}

/// Recommended action tier, mirrors the color tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTier {
    Normal,
    Alert,
    ShantiPulse,
}

/// Normalized per-metric contributions.
///
/// Crowd and pollution land in [0,1), heat and noise in (-1,1), feedback
/// in [0,1]. Feedback is a quality score, so it is inverted before it
/// enters the load composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Components {
    pub crowd: f64,
    pub heat: f64,
    pub noise: f64,
    pub pollution: f64,
    pub feedback: f64,
}

/// Derived risk score, recomputed on every reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub zli: u8,
    pub zei: u8,
    pub color: ColorTier,
    pub action: ActionTier,
    pub components: Components,
}

/// Raw metrics for one scoring pass. `None` means the producer did not
/// report the metric; the engine substitutes the baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInput {
    pub crowd: Option<u32>,
    pub temp: Option<f64>,
    pub noise: Option<f64>,
    pub pollution: Option<f64>,
    pub kiosk_score: Option<f64>,
}

impl ColorTier {
    fn from_zli(zli: u8) -> Self {
        match zli {
            0..=39 => Self::Green,
            40..=69 => Self::Yellow,
            _ => Self::Red,
        }
    }
}

impl ActionTier {
    fn from_zli(zli: u8) -> Self {
        match zli {
            0..=39 => Self::Normal,
            40..=69 => Self::Alert,
            _ => Self::ShantiPulse,
        }
    }
}

/// Compute the risk score for one telemetry sample.
pub fn score(input: &ScoreInput) -> RiskScore {
    let crowd = input.crowd.unwrap_or(0) as f64;
    let temp = input.temp.unwrap_or(DEFAULT_TEMP_C);
    let noise = input.noise.unwrap_or(DEFAULT_NOISE_DB).max(0.0);
    let pollution = input.pollution.unwrap_or(DEFAULT_POLLUTION).max(0.0);
    let feedback = input.kiosk_score.unwrap_or(0.0).clamp(0.0, 5.0);

    let components = Components {
        crowd: (crowd / 150.0).tanh(),
        heat: ((temp - 25.0) / 8.0).tanh(),
        noise: ((noise - 50.0) / 20.0).tanh(),
        pollution: (pollution / 100.0).tanh(),
        feedback: feedback / 5.0,
    };

    let load = components.crowd * 0.35
        + components.heat * 0.22
        + components.noise * 0.15
        + components.pollution * 0.13
        + (1.0 - components.feedback) * 0.15;

    let zli = (load * 100.0).clamp(0.0, 100.0).round() as u8;
    let zei = ((components.noise * 0.6 + (1.0 - components.feedback) * 0.4) * 100.0)
        .clamp(0.0, 100.0)
        .round() as u8;

    RiskScore {
        zli,
        zei,
        color: ColorTier::from_zli(zli),
        action: ActionTier::from_zli(zli),
        components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(crowd: u32, temp: f64, noise: f64) -> ScoreInput {
        ScoreInput {
            crowd: Some(crowd),
            temp: Some(temp),
            noise: Some(noise),
            ..Default::default()
        }
    }

    #[test]
    fn test_indices_bounded_across_extremes() {
        let extremes = [0u32, 1, 149, 150, 700, 10_000, u32::MAX];
        let temps = [-60.0, 0.0, 25.0, 36.0, 80.0, 1e9];
        let noises = [0.0, 50.0, 90.0, 500.0, 1e9];
        for &crowd in &extremes {
            for &temp in &temps {
                for &noise in &noises {
                    let s = score(&input(crowd, temp, noise));
                    assert!(s.zli <= 100, "zli out of range for crowd={crowd}");
                    assert!(s.zei <= 100, "zei out of range for noise={noise}");
                }
            }
        }
    }

    #[test]
    fn test_crowd_monotonicity() {
        let mut last = 0u8;
        for crowd in (0..2000).step_by(10) {
            let s = score(&input(crowd, 30.0, 70.0));
            assert!(s.zli >= last, "zli decreased at crowd={crowd}");
            last = s.zli;
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let i = ScoreInput {
            crowd: Some(420),
            temp: Some(33.3),
            noise: Some(77.7),
            pollution: Some(55.0),
            kiosk_score: Some(2.5),
        };
        assert_eq!(score(&i), score(&i));
    }

    #[test]
    fn test_defaults_when_absent() {
        // All baselines: only the pollution default (10) and the inverted
        // zero-feedback term contribute.
        let s = score(&ScoreInput::default());
        assert_eq!(s.zli, 16);
        assert_eq!(s.zei, 40);
        assert_eq!(s.color, ColorTier::Green);
        assert_eq!(s.action, ActionTier::Normal);
    }

    #[test]
    fn test_color_tier_boundaries() {
        assert_eq!(ColorTier::from_zli(39), ColorTier::Green);
        assert_eq!(ColorTier::from_zli(40), ColorTier::Yellow);
        assert_eq!(ColorTier::from_zli(69), ColorTier::Yellow);
        assert_eq!(ColorTier::from_zli(70), ColorTier::Red);
        assert_eq!(ActionTier::from_zli(70), ActionTier::ShantiPulse);
    }

    #[test]
    fn test_out_of_range_inputs_clamped() {
        let s = score(&ScoreInput {
            crowd: Some(u32::MAX),
            temp: Some(f64::MAX),
            noise: Some(-40.0),
            pollution: Some(-5.0),
            kiosk_score: Some(99.0),
        });
        assert!(s.zli <= 100);
        assert!(s.zei <= 100);
        // negative noise is treated as silence, not an error
        assert!(s.components.noise < 0.0);
        // kiosk score capped at the 0-5 scale
        assert_eq!(s.components.feedback, 1.0);
    }

    #[test]
    fn test_feedback_quality_reduces_load() {
        let unhappy = score(&ScoreInput {
            crowd: Some(300),
            kiosk_score: Some(0.0),
            ..Default::default()
        });
        let happy = score(&ScoreInput {
            crowd: Some(300),
            kiosk_score: Some(5.0),
            ..Default::default()
        });
        assert!(happy.zli < unhappy.zli);
    }
}
