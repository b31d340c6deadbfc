use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AdScaleResult;
use crate::types::Objective;

/// Root engine configuration. Every numeric constant the evaluation uses
/// lives here so thresholds can be tuned without touching the algorithms.
///
/// Loaded from an optional TOML/JSON file, then from environment variables
/// with the prefix `ADSCALE__` (e.g. `ADSCALE__SAMPLE_GATE__MIN_CLICKS=150`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_revenue_per_purchase")]
    pub revenue_per_purchase: f64,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub target_costs: TargetCostConfig,
    #[serde(default)]
    pub sample_gate: SampleGateConfig,
    #[serde(default)]
    pub stability: StabilityConfig,
    #[serde(default)]
    pub frequency: FrequencyConfig,
    #[serde(default)]
    pub scaling: ScalingRules,
    #[serde(default)]
    pub trend: TrendConfig,
    #[serde(default)]
    pub ideal_targets: IdealTargetConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Per-objective cost a line item is expected to reach. Traffic scales with
/// observed click volume, the others are flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCostConfig {
    #[serde(default = "default_messages_target")]
    pub messages: f64,
    #[serde(default = "default_lead_capture_target")]
    pub lead_capture: f64,
    #[serde(default = "default_purchases_target")]
    pub purchases: f64,
    #[serde(default = "default_traffic_cost_per_click")]
    pub traffic_per_click: f64,
}

impl TargetCostConfig {
    pub fn target_cost(&self, objective: Objective, clicks: u64) -> f64 {
        match objective {
            Objective::Messages => self.messages,
            Objective::LeadCapture => self.lead_capture,
            Objective::Purchases => self.purchases,
            Objective::Traffic => self.traffic_per_click * clicks as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGateConfig {
    #[serde(default = "default_min_impressions")]
    pub min_impressions: u64,
    #[serde(default = "default_min_clicks")]
    pub min_clicks: u64,
    /// Spend of at least this many target costs also qualifies.
    #[serde(default = "default_spend_multiplier")]
    pub spend_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityConfig {
    #[serde(default = "default_min_days")]
    pub min_days: usize,
    /// A day may not spend less than this fraction of the previous day.
    #[serde(default = "default_min_spend_ratio")]
    pub min_spend_ratio: f64,
    #[serde(default = "default_min_streak")]
    pub min_streak: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyConfig {
    /// Ceiling for purchases and lead capture.
    #[serde(default = "default_strict_frequency")]
    pub strict_max: f64,
    #[serde(default = "default_frequency")]
    pub default_max: f64,
}

impl FrequencyConfig {
    pub fn acceptable_max(&self, objective: Objective) -> f64 {
        match objective {
            Objective::Purchases | Objective::LeadCapture => self.strict_max,
            Objective::Traffic | Objective::Messages => self.default_max,
        }
    }

    pub fn is_acceptable(&self, objective: Objective, frequency: f64) -> bool {
        frequency <= self.acceptable_max(objective)
    }
}

// ─── Scaling Rules ──────────────────────────────────────────────────────

/// Objective-indexed rule table consumed by the tier evaluator.
///
/// Each objective is replaced as a whole when overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingRules {
    #[serde(default = "default_traffic_rules")]
    pub traffic: ObjectiveRules,
    #[serde(default = "default_messages_rules")]
    pub messages: ObjectiveRules,
    #[serde(default = "default_purchases_rules")]
    pub purchases: ObjectiveRules,
    #[serde(default = "default_lead_capture_rules")]
    pub lead_capture: ObjectiveRules,
}

impl ScalingRules {
    pub fn for_objective(&self, objective: Objective) -> &ObjectiveRules {
        match objective {
            Objective::Traffic => &self.traffic,
            Objective::Messages => &self.messages,
            Objective::Purchases => &self.purchases,
            Objective::LeadCapture => &self.lead_capture,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveRules {
    /// Minimum result volume before any scaling tier is considered.
    #[serde(default)]
    pub volume: Option<VolumeRequirement>,
    pub cost_metric: CostMetric,
    /// Short name used in rationale strings ("CPL", "CPC", "CPA").
    pub cost_label: String,
    pub vertical: TierRule,
    pub horizontal: TierRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeMetric {
    /// Messaging conversations, or leads when no conversations were reported.
    Conversions,
    Purchases,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRequirement {
    pub metric: VolumeMetric,
    pub minimum: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMetric {
    Cpr,
    Cpc,
    CostPerPurchase,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyLimit {
    /// Whatever `FrequencyConfig` accepts for the objective.
    Acceptable,
    AtMost(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    pub max_cost: f64,
    #[serde(default)]
    pub min_ctr: Option<f64>,
    #[serde(default)]
    pub min_roas: Option<f64>,
    #[serde(default)]
    pub min_lpv_rate: Option<f64>,
    pub frequency: FrequencyLimit,
    #[serde(default)]
    pub require_stability: bool,
}

fn default_traffic_rules() -> ObjectiveRules {
    ObjectiveRules {
        volume: None,
        cost_metric: CostMetric::Cpc,
        cost_label: "CPC".to_string(),
        vertical: TierRule {
            max_cost: 1.2,
            min_ctr: Some(1.5),
            min_roas: None,
            min_lpv_rate: Some(70.0),
            frequency: FrequencyLimit::Acceptable,
            require_stability: true,
        },
        horizontal: TierRule {
            max_cost: 2.5,
            min_ctr: Some(1.0),
            min_roas: None,
            min_lpv_rate: None,
            frequency: FrequencyLimit::AtMost(3.0),
            require_stability: false,
        },
    }
}

fn default_messages_rules() -> ObjectiveRules {
    ObjectiveRules {
        volume: Some(VolumeRequirement {
            metric: VolumeMetric::Conversions,
            minimum: 10,
        }),
        cost_metric: CostMetric::Cpr,
        cost_label: "CPL".to_string(),
        vertical: TierRule {
            max_cost: 15.0,
            min_ctr: Some(1.5),
            min_roas: None,
            min_lpv_rate: None,
            frequency: FrequencyLimit::Acceptable,
            require_stability: true,
        },
        horizontal: TierRule {
            max_cost: 25.0,
            min_ctr: Some(1.0),
            min_roas: None,
            min_lpv_rate: None,
            frequency: FrequencyLimit::AtMost(2.5),
            require_stability: false,
        },
    }
}

fn default_purchases_rules() -> ObjectiveRules {
    ObjectiveRules {
        volume: Some(VolumeRequirement {
            metric: VolumeMetric::Purchases,
            minimum: 3,
        }),
        cost_metric: CostMetric::CostPerPurchase,
        cost_label: "CPA".to_string(),
        vertical: TierRule {
            max_cost: 30.0,
            min_ctr: None,
            min_roas: Some(1.5),
            min_lpv_rate: None,
            frequency: FrequencyLimit::Acceptable,
            require_stability: true,
        },
        horizontal: TierRule {
            max_cost: 30.0 * 1.3,
            min_ctr: None,
            min_roas: Some(1.5 * 0.8),
            min_lpv_rate: None,
            frequency: FrequencyLimit::AtMost(3.0),
            require_stability: false,
        },
    }
}

fn default_lead_capture_rules() -> ObjectiveRules {
    ObjectiveRules {
        volume: Some(VolumeRequirement {
            metric: VolumeMetric::Conversions,
            minimum: 10,
        }),
        cost_metric: CostMetric::Cpr,
        cost_label: "CPL".to_string(),
        vertical: TierRule {
            max_cost: 15.0,
            min_ctr: Some(1.5),
            min_roas: None,
            min_lpv_rate: None,
            frequency: FrequencyLimit::Acceptable,
            require_stability: true,
        },
        horizontal: TierRule {
            max_cost: 15.0 * 1.3,
            min_ctr: Some(1.0),
            min_roas: None,
            min_lpv_rate: None,
            frequency: FrequencyLimit::AtMost(3.0),
            require_stability: false,
        },
    }
}

impl Default for ScalingRules {
    fn default() -> Self {
        Self {
            traffic: default_traffic_rules(),
            messages: default_messages_rules(),
            purchases: default_purchases_rules(),
            lead_capture: default_lead_capture_rules(),
        }
    }
}

// ─── Trend Config ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Conditions that must hold before a trend class is assigned.
    #[serde(default = "default_min_conditions")]
    pub min_conditions: usize,
    // 3-day alert multipliers
    #[serde(default = "default_alert_cpr_rise")]
    pub alert_cpr_rise: f64,
    #[serde(default = "default_alert_ctr_drop")]
    pub alert_ctr_drop: f64,
    #[serde(default = "default_alert_conversion_drop")]
    pub alert_conversion_drop: f64,
    #[serde(default = "default_alert_frequency")]
    pub alert_frequency: f64,
    // 7-day improvement multipliers
    #[serde(default = "default_up_cpr")]
    pub up_cpr: f64,
    #[serde(default = "default_up_conversions")]
    pub up_conversions: f64,
    #[serde(default = "default_up_ctr")]
    pub up_ctr: f64,
    #[serde(default = "default_up_max_frequency")]
    pub up_max_frequency: f64,
    // 7-day decline multipliers
    #[serde(default = "default_down_cpr")]
    pub down_cpr: f64,
    #[serde(default = "default_down_conversions")]
    pub down_conversions: f64,
    #[serde(default = "default_down_ctr")]
    pub down_ctr: f64,
    #[serde(default = "default_down_frequency")]
    pub down_frequency: f64,
}

// ─── Ideal Target Config ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealTargetConfig {
    #[serde(default = "default_fallback_ideal_cost")]
    pub fallback_cost: f64,
    #[serde(default = "default_fallback_objective_label")]
    pub fallback_objective_label: String,
    #[serde(default = "default_fallback_conversion_label")]
    pub fallback_conversion_label: String,
    /// Evaluated in order; the first bucket whose `min_cpr` the CPR reaches wins.
    #[serde(default = "default_ideal_buckets")]
    pub buckets: Vec<IdealBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealBucket {
    pub min_cpr: f64,
    pub ideal_cost: f64,
    pub label: String,
}

fn default_ideal_buckets() -> Vec<IdealBucket> {
    [
        (25.0, 35.0, "conversions"),
        (8.0, 15.0, "lead generation"),
        (2.0, 5.0, "messages/contacts"),
        (0.0, 2.0, "engagement/traffic"),
    ]
    .into_iter()
    .map(|(min_cpr, ideal_cost, label)| IdealBucket {
        min_cpr,
        ideal_cost,
        label: label.to_string(),
    })
    .collect()
}

// ─── Scoring Config ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_cpc_ideal")]
    pub cpc_ideal: f64,
    #[serde(default = "default_conversions_ideal")]
    pub conversions_ideal: f64,
    #[serde(default = "default_frequency_ideal")]
    pub frequency_ideal: f64,
    #[serde(default)]
    pub weights: ScoreWeights,
    /// When false, a cost of 0 only earns full credit if conversions were recorded.
    #[serde(default = "default_zero_cost_is_ideal")]
    pub zero_cost_is_ideal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_cpr_weight")]
    pub cpr: f64,
    #[serde(default = "default_cpc_weight")]
    pub cpc: f64,
    #[serde(default = "default_conversions_weight")]
    pub conversions: f64,
    #[serde(default = "default_frequency_weight")]
    pub frequency: f64,
}

// Default functions
fn default_revenue_per_purchase() -> f64 {
    100.0
}
fn default_currency_symbol() -> String {
    "R$".to_string()
}
fn default_messages_target() -> f64 {
    15.0
}
fn default_lead_capture_target() -> f64 {
    15.0
}
fn default_purchases_target() -> f64 {
    30.0
}
fn default_traffic_cost_per_click() -> f64 {
    1.2
}
fn default_min_impressions() -> u64 {
    3000
}
fn default_min_clicks() -> u64 {
    100
}
fn default_spend_multiplier() -> f64 {
    2.0
}
fn default_min_days() -> usize {
    3
}
fn default_min_spend_ratio() -> f64 {
    0.5
}
fn default_min_streak() -> usize {
    2
}
fn default_strict_frequency() -> f64 {
    2.5
}
fn default_frequency() -> f64 {
    3.0
}

fn default_min_conditions() -> usize { 2 }
fn default_alert_cpr_rise() -> f64 { 1.3 }
fn default_alert_ctr_drop() -> f64 { 0.8 }
fn default_alert_conversion_drop() -> f64 { 0.7 }
fn default_alert_frequency() -> f64 { 5.0 }
fn default_up_cpr() -> f64 { 0.9 }
fn default_up_conversions() -> f64 { 1.1 }
fn default_up_ctr() -> f64 { 1.05 }
fn default_up_max_frequency() -> f64 { 3.5 }
fn default_down_cpr() -> f64 { 1.15 }
fn default_down_conversions() -> f64 { 0.9 }
fn default_down_ctr() -> f64 { 0.95 }
fn default_down_frequency() -> f64 { 4.5 }

fn default_fallback_ideal_cost() -> f64 { 30.0 }
fn default_fallback_objective_label() -> String { "undefined".to_string() }
fn default_fallback_conversion_label() -> String { "collecting data".to_string() }

fn default_cpc_ideal() -> f64 { 2.0 }
fn default_conversions_ideal() -> f64 { 100.0 }
fn default_frequency_ideal() -> f64 { 3.0 }
fn default_zero_cost_is_ideal() -> bool { true }
fn default_cpr_weight() -> f64 { 0.40 }
fn default_cpc_weight() -> f64 { 0.25 }
fn default_conversions_weight() -> f64 { 0.25 }
fn default_frequency_weight() -> f64 { 0.10 }

impl Default for TargetCostConfig {
    fn default() -> Self {
        Self {
            messages: default_messages_target(),
            lead_capture: default_lead_capture_target(),
            purchases: default_purchases_target(),
            traffic_per_click: default_traffic_cost_per_click(),
        }
    }
}

impl Default for SampleGateConfig {
    fn default() -> Self {
        Self {
            min_impressions: default_min_impressions(),
            min_clicks: default_min_clicks(),
            spend_multiplier: default_spend_multiplier(),
        }
    }
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            min_days: default_min_days(),
            min_spend_ratio: default_min_spend_ratio(),
            min_streak: default_min_streak(),
        }
    }
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            strict_max: default_strict_frequency(),
            default_max: default_frequency(),
        }
    }
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            min_conditions: default_min_conditions(),
            alert_cpr_rise: default_alert_cpr_rise(),
            alert_ctr_drop: default_alert_ctr_drop(),
            alert_conversion_drop: default_alert_conversion_drop(),
            alert_frequency: default_alert_frequency(),
            up_cpr: default_up_cpr(),
            up_conversions: default_up_conversions(),
            up_ctr: default_up_ctr(),
            up_max_frequency: default_up_max_frequency(),
            down_cpr: default_down_cpr(),
            down_conversions: default_down_conversions(),
            down_ctr: default_down_ctr(),
            down_frequency: default_down_frequency(),
        }
    }
}

impl Default for IdealTargetConfig {
    fn default() -> Self {
        Self {
            fallback_cost: default_fallback_ideal_cost(),
            fallback_objective_label: default_fallback_objective_label(),
            fallback_conversion_label: default_fallback_conversion_label(),
            buckets: default_ideal_buckets(),
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            cpr: default_cpr_weight(),
            cpc: default_cpc_weight(),
            conversions: default_conversions_weight(),
            frequency: default_frequency_weight(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cpc_ideal: default_cpc_ideal(),
            conversions_ideal: default_conversions_ideal(),
            frequency_ideal: default_frequency_ideal(),
            weights: ScoreWeights::default(),
            zero_cost_is_ideal: default_zero_cost_is_ideal(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            revenue_per_purchase: default_revenue_per_purchase(),
            currency_symbol: default_currency_symbol(),
            target_costs: TargetCostConfig::default(),
            sample_gate: SampleGateConfig::default(),
            stability: StabilityConfig::default(),
            frequency: FrequencyConfig::default(),
            scaling: ScalingRules::default(),
            trend: TrendConfig::default(),
            ideal_targets: IdealTargetConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from an optional file and environment variables.
    /// Environment values override the file.
    pub fn load(path: Option<&Path>) -> AdScaleResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("ADSCALE")
                .separator("__")
                .try_parsing(true),
        );

        let loaded: Self = builder.build()?.try_deserialize()?;
        debug!(
            file = ?path,
            currency = %loaded.currency_symbol,
            "engine configuration loaded"
        );
        Ok(loaded)
    }
}
