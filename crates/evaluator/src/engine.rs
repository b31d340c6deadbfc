//! Evaluation pipeline: windows → aggregates → recommendation, trend,
//! ideal target and score.

use adscale_core::{EngineConfig, Objective};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::gate::has_sufficient_sample;
use crate::ideal::{resolve_ideal_target, IdealTarget};
use crate::recommend::{recommend, Recommendation, ScalingInputs};
use crate::score::{score_performance, PerformanceScore, ScoreInputs, ScoreTargets};
use crate::stability::is_stable;
use crate::trend::{classify_trend, TrendClassification, TrendInputs};
use crate::window::{WindowAggregates, WindowedSamples};

/// Everything computed for one line item. Contains no timestamps or ids, so
/// identical inputs always produce equal evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub objective: Objective,
    pub aggregates: WindowAggregates,
    pub sufficient_sample: bool,
    pub stable: bool,
    pub recommendation: Recommendation,
    pub trend: TrendClassification,
    pub score: PerformanceScore,
    pub ideal_target: IdealTarget,
}

/// Stateless evaluator. Holds only configuration, so one instance can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EngineConfig,
}

impl Evaluator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluate(&self, samples: &WindowedSamples, objective: Objective) -> Evaluation {
        let config = &self.config;
        let aggregates = samples.aggregate(config.revenue_per_purchase);

        let sufficient_sample = has_sufficient_sample(
            &aggregates.selected_period,
            objective,
            &config.sample_gate,
            &config.target_costs,
        );
        let stable = is_stable(&samples.selected_period, &config.stability);

        let recommendation = recommend(
            &ScalingInputs {
                objective,
                aggregate: &aggregates.selected_period,
                sufficient_sample,
                stable,
            },
            config,
        );

        let trend = classify_trend(
            &TrendInputs {
                last_7d: &aggregates.last_7_days,
                previous_7d: &aggregates.previous_7_days,
                last_3d: &aggregates.last_3_days,
                previous_3d: &aggregates.previous_3_days,
                frequency: aggregates.all_time.frequency,
            },
            &config.trend,
            &config.currency_symbol,
        );

        let all_time = &aggregates.all_time;
        let ideal_target = resolve_ideal_target(all_time, &config.ideal_targets);
        let score = score_performance(
            &ScoreInputs {
                cpr: all_time.cpr,
                cpc: all_time.cpc,
                conversions: all_time.conversions as f64,
                frequency: all_time.frequency,
            },
            &ScoreTargets::from_config(ideal_target.ideal_cost, &config.scoring),
            &config.scoring,
        );

        debug!(
            objective = %objective,
            recommendation = ?recommendation.kind,
            trend = ?trend.class,
            score = score.score,
            sufficient_sample,
            stable,
            "line item evaluated"
        );

        Evaluation {
            objective,
            aggregates,
            sufficient_sample,
            stable,
            recommendation,
            trend,
            score,
            ideal_target,
        }
    }
}
