//! Ideal cost inference from all-time cost magnitude.
//!
//! This is a heuristic guess at what kind of result a line item buys, and it
//! is independent of the configured `Objective`. The two can disagree.

use adscale_core::config::IdealTargetConfig;
use serde::{Deserialize, Serialize};

use crate::aggregate::WindowAggregate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealTarget {
    pub ideal_cost: f64,
    pub objective_label: String,
    pub conversion_type_label: String,
}

pub fn resolve_ideal_target(all_time: &WindowAggregate, config: &IdealTargetConfig) -> IdealTarget {
    let fallback = || IdealTarget {
        ideal_cost: config.fallback_cost,
        objective_label: config.fallback_objective_label.clone(),
        conversion_type_label: config.fallback_conversion_label.clone(),
    };

    if all_time.conversions == 0 || all_time.cpr == 0.0 {
        return fallback();
    }

    config
        .buckets
        .iter()
        .find(|bucket| all_time.cpr >= bucket.min_cpr)
        .map(|bucket| IdealTarget {
            ideal_cost: bucket.ideal_cost,
            objective_label: bucket.label.clone(),
            conversion_type_label: bucket.label.clone(),
        })
        .unwrap_or_else(fallback)
}
