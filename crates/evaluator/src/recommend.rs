//! Budget-scaling recommendation.
//!
//! One generic tier evaluator walks the objective's rule table: vertical
//! first, then horizontal, otherwise wait. Rationale strings always carry the
//! metric values that decided the outcome.

use adscale_core::config::{
    CostMetric, EngineConfig, FrequencyLimit, ObjectiveRules, TierRule, VolumeMetric,
};
use adscale_core::Objective;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::WindowAggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Raise budget on what already works.
    Vertical,
    /// Expand with new creatives or audiences instead of budget.
    Horizontal,
    Wait,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub rationale: String,
    pub stats: WindowAggregate,
}

/// Everything the recommender needs about the selected period.
#[derive(Debug, Clone, Copy)]
pub struct ScalingInputs<'a> {
    pub objective: Objective,
    pub aggregate: &'a WindowAggregate,
    pub sufficient_sample: bool,
    pub stable: bool,
}

pub fn recommend(inputs: &ScalingInputs<'_>, config: &EngineConfig) -> Recommendation {
    let agg = inputs.aggregate;
    let wait = |rationale: String| Recommendation {
        kind: RecommendationKind::Wait,
        rationale,
        stats: agg.clone(),
    };

    if !inputs.sufficient_sample {
        return wait(format!(
            "insufficient data: {} impressions, {} clicks",
            agg.impressions, agg.clicks
        ));
    }

    let rules = config.scaling.for_objective(inputs.objective);

    if let Some(volume) = rules.volume {
        let (name, observed) = match volume.metric {
            VolumeMetric::Conversions => ("leads", agg.conversions),
            VolumeMetric::Purchases => ("sales", agg.purchases),
        };
        if observed < volume.minimum {
            return wait(format!(
                "not enough {name}: {observed} (minimum {})",
                volume.minimum
            ));
        }
    }

    let ctx = TierContext {
        rules,
        aggregate: agg,
        acceptable_frequency: config.frequency.acceptable_max(inputs.objective),
        stable: inputs.stable,
        currency: &config.currency_symbol,
    };
    let summary = ctx.summary();

    let vertical_misses = ctx.misses(&rules.vertical);
    let (kind, rationale) = if vertical_misses.is_empty() {
        (
            RecommendationKind::Vertical,
            format!("scale budget: {summary}, stable delivery"),
        )
    } else {
        let horizontal_misses = ctx.misses(&rules.horizontal);
        if horizontal_misses.is_empty() {
            (
                RecommendationKind::Horizontal,
                format!(
                    "expand creatives/audiences: {summary}; not ready for budget increase: {}",
                    vertical_misses.join(", ")
                ),
            )
        } else {
            (
                RecommendationKind::Wait,
                format!(
                    "hold: {summary}; below expansion criteria: {}",
                    horizontal_misses.join(", ")
                ),
            )
        }
    };

    debug!(
        objective = %inputs.objective,
        kind = ?kind,
        spend = agg.spend,
        "scaling recommendation computed"
    );

    Recommendation {
        kind,
        rationale,
        stats: agg.clone(),
    }
}

struct TierContext<'a> {
    rules: &'a ObjectiveRules,
    aggregate: &'a WindowAggregate,
    acceptable_frequency: f64,
    stable: bool,
    currency: &'a str,
}

impl TierContext<'_> {
    fn cost(&self) -> f64 {
        match self.rules.cost_metric {
            CostMetric::Cpr => self.aggregate.cpr,
            CostMetric::Cpc => self.aggregate.cpc,
            CostMetric::CostPerPurchase => self.aggregate.cost_per_purchase,
        }
    }

    fn money(&self, value: f64) -> String {
        format!("{}{:.2}", self.currency, value)
    }

    fn uses<T>(&self, pick: impl Fn(&TierRule) -> Option<T>) -> bool {
        pick(&self.rules.vertical).is_some() || pick(&self.rules.horizontal).is_some()
    }

    /// The metrics this objective is judged on, e.g. `CTR 2.10%, CPL R$12.30, freq 1.80`.
    fn summary(&self) -> String {
        let agg = self.aggregate;
        let mut parts = Vec::new();
        if self.uses(|t| t.min_ctr) {
            parts.push(format!("CTR {:.2}%", agg.ctr));
        }
        parts.push(format!("{} {}", self.rules.cost_label, self.money(self.cost())));
        if self.uses(|t| t.min_roas) {
            parts.push(format!("ROAS {:.2}x", agg.roas));
        }
        if self.uses(|t| t.min_lpv_rate) {
            parts.push(format!("LPV {:.1}%", agg.lpv_rate));
        }
        parts.push(format!("freq {:.2}", agg.frequency));
        parts.join(", ")
    }

    /// Criteria of `tier` the window misses. Empty means the tier matches.
    fn misses(&self, tier: &TierRule) -> Vec<String> {
        let agg = self.aggregate;
        let mut misses = Vec::new();

        let cost = self.cost();
        if cost > tier.max_cost {
            misses.push(format!(
                "{} {} > {}",
                self.rules.cost_label,
                self.money(cost),
                self.money(tier.max_cost)
            ));
        }
        if let Some(min_ctr) = tier.min_ctr {
            if agg.ctr < min_ctr {
                misses.push(format!("CTR {:.2}% < {:.2}%", agg.ctr, min_ctr));
            }
        }
        if let Some(min_roas) = tier.min_roas {
            if agg.roas < min_roas {
                misses.push(format!("ROAS {:.2}x < {:.2}x", agg.roas, min_roas));
            }
        }
        if let Some(min_lpv) = tier.min_lpv_rate {
            if agg.lpv_rate < min_lpv {
                misses.push(format!("LPV {:.1}% < {:.1}%", agg.lpv_rate, min_lpv));
            }
        }
        let max_frequency = match tier.frequency {
            FrequencyLimit::Acceptable => self.acceptable_frequency,
            FrequencyLimit::AtMost(limit) => limit,
        };
        if agg.frequency > max_frequency {
            misses.push(format!("freq {:.2} > {:.2}", agg.frequency, max_frequency));
        }
        if tier.require_stability && !self.stable {
            misses.push("unstable daily spend".to_string());
        }

        misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(
        objective: Objective,
        aggregate: &WindowAggregate,
        stable: bool,
    ) -> ScalingInputs<'_> {
        ScalingInputs {
            objective,
            aggregate,
            sufficient_sample: true,
            stable,
        }
    }

    fn messages_window(conversions: u64, cpr: f64, ctr: f64, frequency: f64) -> WindowAggregate {
        WindowAggregate {
            days: 7,
            spend: cpr * conversions as f64,
            impressions: 10_000,
            clicks: 200,
            conversions,
            cpr,
            ctr,
            frequency,
            ..Default::default()
        }
    }

    #[test]
    fn test_insufficient_sample_waits_with_counts() {
        let agg = WindowAggregate {
            impressions: 2_999,
            clicks: 99,
            ..Default::default()
        };
        let rec = recommend(
            &ScalingInputs {
                objective: Objective::Messages,
                aggregate: &agg,
                sufficient_sample: false,
                stable: true,
            },
            &EngineConfig::default(),
        );
        assert_eq!(rec.kind, RecommendationKind::Wait);
        assert_eq!(rec.rationale, "insufficient data: 2999 impressions, 99 clicks");
    }

    #[test]
    fn test_messages_vertical() {
        let agg = messages_window(12, 10.0, 2.0, 2.0);
        let rec = recommend(&inputs(Objective::Messages, &agg, true), &EngineConfig::default());
        assert_eq!(rec.kind, RecommendationKind::Vertical);
        assert!(rec.rationale.contains("CTR 2.00%"));
        assert!(rec.rationale.contains("CPL R$10.00"));
        assert!(rec.rationale.contains("freq 2.00"));
        assert_eq!(rec.stats, agg);
    }

    #[test]
    fn test_messages_unstable_falls_to_horizontal() {
        let agg = messages_window(12, 10.0, 2.0, 2.0);
        let rec = recommend(&inputs(Objective::Messages, &agg, false), &EngineConfig::default());
        assert_eq!(rec.kind, RecommendationKind::Horizontal);
        assert!(rec.rationale.contains("unstable daily spend"));
    }

    #[test]
    fn test_messages_horizontal_frequency_ceiling() {
        // 2.8 is acceptable for vertical on messages (3.0) but the CPL fails it;
        // horizontal caps frequency at 2.5.
        let agg = messages_window(12, 20.0, 1.2, 2.8);
        let rec = recommend(&inputs(Objective::Messages, &agg, true), &EngineConfig::default());
        assert_eq!(rec.kind, RecommendationKind::Wait);
        assert!(rec.rationale.contains("freq 2.80 > 2.50"));

        let agg = messages_window(12, 20.0, 1.2, 2.4);
        let rec = recommend(&inputs(Objective::Messages, &agg, true), &EngineConfig::default());
        assert_eq!(rec.kind, RecommendationKind::Horizontal);
    }

    #[test]
    fn test_messages_needs_ten_leads() {
        let agg = messages_window(9, 5.0, 3.0, 1.0);
        let rec = recommend(&inputs(Objective::Messages, &agg, true), &EngineConfig::default());
        assert_eq!(rec.kind, RecommendationKind::Wait);
        assert_eq!(rec.rationale, "not enough leads: 9 (minimum 10)");
    }

    #[test]
    fn test_purchases_need_three_sales() {
        let agg = WindowAggregate {
            purchases: 2,
            cost_per_purchase: 5.0,
            roas: 20.0,
            frequency: 1.0,
            ..Default::default()
        };
        let rec = recommend(&inputs(Objective::Purchases, &agg, true), &EngineConfig::default());
        assert_eq!(rec.kind, RecommendationKind::Wait);
        assert!(rec.rationale.contains("sales: 2"));
    }

    #[test]
    fn test_purchases_tiers() {
        let config = EngineConfig::default();
        let base = WindowAggregate {
            purchases: 5,
            cost_per_purchase: 25.0,
            roas: 1.8,
            frequency: 2.0,
            ..Default::default()
        };
        let rec = recommend(&inputs(Objective::Purchases, &base, true), &config);
        assert_eq!(rec.kind, RecommendationKind::Vertical);
        assert!(rec.rationale.contains("CPA R$25.00"));
        assert!(rec.rationale.contains("ROAS 1.80x"));

        // Frequency above the strict 2.5 ceiling blocks vertical but not horizontal.
        let saturated = WindowAggregate {
            frequency: 2.8,
            ..base.clone()
        };
        let rec = recommend(&inputs(Objective::Purchases, &saturated, true), &config);
        assert_eq!(rec.kind, RecommendationKind::Horizontal);

        let expensive = WindowAggregate {
            cost_per_purchase: 45.0,
            ..base
        };
        let rec = recommend(&inputs(Objective::Purchases, &expensive, true), &config);
        assert_eq!(rec.kind, RecommendationKind::Wait);
        assert!(rec.rationale.contains("CPA R$45.00 > R$39.00"));
    }

    #[test]
    fn test_traffic_requires_landing_page_rate_for_vertical() {
        let config = EngineConfig::default();
        let agg = WindowAggregate {
            clicks: 400,
            cpc: 0.9,
            ctr: 1.8,
            frequency: 2.0,
            lpv_rate: 75.0,
            ..Default::default()
        };
        let rec = recommend(&inputs(Objective::Traffic, &agg, true), &config);
        assert_eq!(rec.kind, RecommendationKind::Vertical);
        assert!(rec.rationale.contains("CPC R$0.90"));
        assert!(rec.rationale.contains("LPV 75.0%"));

        let weak_lpv = WindowAggregate {
            lpv_rate: 55.0,
            ..agg
        };
        let rec = recommend(&inputs(Objective::Traffic, &weak_lpv, true), &config);
        assert_eq!(rec.kind, RecommendationKind::Horizontal);
        assert!(rec.rationale.contains("LPV 55.0% < 70.0%"));
    }

    #[test]
    fn test_lead_capture_horizontal_band() {
        let config = EngineConfig::default();
        let agg = messages_window(15, 18.0, 1.2, 2.0);
        let rec = recommend(&inputs(Objective::LeadCapture, &agg, true), &config);
        assert_eq!(rec.kind, RecommendationKind::Horizontal);

        let agg = messages_window(15, 20.0, 1.2, 2.0);
        let rec = recommend(&inputs(Objective::LeadCapture, &agg, true), &config);
        assert_eq!(rec.kind, RecommendationKind::Wait);
        assert!(rec.rationale.contains("CPL R$20.00 > R$19.50"));
    }

    #[test]
    fn test_currency_symbol_is_configurable() {
        let config = EngineConfig {
            currency_symbol: "$".to_string(),
            ..Default::default()
        };
        let agg = messages_window(12, 12.3, 2.1, 1.8);
        let rec = recommend(&inputs(Objective::Messages, &agg, true), &config);
        assert!(rec.rationale.contains("CTR 2.10%, CPL $12.30, freq 1.80"));
    }
}
