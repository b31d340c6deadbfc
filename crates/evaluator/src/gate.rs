//! Sample-size gate: is there enough volume to judge a line item at all?

use adscale_core::config::{SampleGateConfig, TargetCostConfig};
use adscale_core::Objective;

use crate::aggregate::WindowAggregate;

/// Either delivery volume or spend relative to the objective's target cost
/// can qualify a window.
pub fn has_sufficient_sample(
    aggregate: &WindowAggregate,
    objective: Objective,
    gate: &SampleGateConfig,
    targets: &TargetCostConfig,
) -> bool {
    let enough_delivery =
        aggregate.impressions >= gate.min_impressions && aggregate.clicks >= gate.min_clicks;
    let target_cost = targets.target_cost(objective, aggregate.clicks);
    let enough_spend = aggregate.spend >= gate.spend_multiplier * target_cost;

    enough_delivery || enough_spend
}
