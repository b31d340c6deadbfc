//! Weighted 0–100 performance score.

use adscale_core::config::ScoringConfig;
use serde::{Deserialize, Serialize};

/// Current values being scored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub cpr: f64,
    pub cpc: f64,
    pub conversions: f64,
    pub frequency: f64,
}

/// Targets the current values are measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTargets {
    pub cpr: f64,
    pub cpc: f64,
    pub conversions: f64,
    pub frequency: f64,
}

impl ScoreTargets {
    /// Targets from configuration, with the CPR target supplied by the
    /// ideal-target inference.
    pub fn from_config(cpr_ideal: f64, config: &ScoringConfig) -> Self {
        Self {
            cpr: cpr_ideal,
            cpc: config.cpc_ideal,
            conversions: config.conversions_ideal,
            frequency: config.frequency_ideal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    /// 0–100 before weighting.
    pub score: f64,
    pub weight: f64,
}

impl SubScore {
    pub fn weighted(&self) -> f64 {
        self.score * self.weight
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScore {
    pub score: u8,
    pub cpr: SubScore,
    pub cpc: SubScore,
    pub conversions: SubScore,
    pub frequency: SubScore,
}

fn clamp_pct(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Lower is better: full marks at or under the target.
fn cost_score(current: f64, ideal: f64) -> f64 {
    if current <= ideal {
        100.0
    } else {
        clamp_pct(ideal / current * 100.0)
    }
}

/// Higher is better: full marks at or above the target.
fn volume_score(current: f64, ideal: f64) -> f64 {
    if current >= ideal {
        100.0
    } else {
        clamp_pct(current / ideal * 100.0)
    }
}

pub fn score_performance(
    inputs: &ScoreInputs,
    targets: &ScoreTargets,
    config: &ScoringConfig,
) -> PerformanceScore {
    // A zero cost reads as "under target". Without conversions that usually
    // means no data yet, so the credit can be withheld.
    let cost_credit = |current: f64, ideal: f64| {
        if current == 0.0 && !config.zero_cost_is_ideal && inputs.conversions <= 0.0 {
            0.0
        } else {
            cost_score(current, ideal)
        }
    };

    let weights = &config.weights;
    let cpr = SubScore {
        score: cost_credit(inputs.cpr, targets.cpr),
        weight: weights.cpr,
    };
    let cpc = SubScore {
        score: cost_credit(inputs.cpc, targets.cpc),
        weight: weights.cpc,
    };
    let conversions = SubScore {
        score: volume_score(inputs.conversions, targets.conversions),
        weight: weights.conversions,
    };
    let frequency = SubScore {
        score: cost_score(inputs.frequency, targets.frequency),
        weight: weights.frequency,
    };

    let total = cpr.weighted() + cpc.weighted() + conversions.weighted() + frequency.weighted();

    PerformanceScore {
        score: clamp_pct(total.round()) as u8,
        cpr,
        cpc,
        conversions,
        frequency,
    }
}
