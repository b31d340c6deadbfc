//! Short-term trend and alert classification.
//!
//! Compares the last 7 days against the 7 before them, and the last 3 days
//! against the 3 before them. Each class carries one explanation line per
//! condition that contributed, so callers can render them as bullets.

use adscale_core::config::TrendConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{safe_div, WindowAggregate};

/// Slack for inclusive threshold comparisons on derived ratios.
const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendClass {
    Up,
    Down,
    Warning,
    Stable,
    /// Not enough history in one of the 7-day windows.
    Collecting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendClassification {
    pub class: TrendClass,
    pub explanation: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct TrendInputs<'a> {
    pub last_7d: &'a WindowAggregate,
    pub previous_7d: &'a WindowAggregate,
    pub last_3d: &'a WindowAggregate,
    pub previous_3d: &'a WindowAggregate,
    /// All-time frequency.
    pub frequency: f64,
}

pub fn classify_trend(
    inputs: &TrendInputs<'_>,
    config: &TrendConfig,
    currency: &str,
) -> TrendClassification {
    let classification = if let Some(lines) = collecting(inputs) {
        TrendClassification {
            class: TrendClass::Collecting,
            explanation: lines,
        }
    } else {
        let warning = warning_conditions(inputs, config, currency);
        let up = improvement_conditions(inputs, config, currency);
        let down = decline_conditions(inputs, config, currency);

        if warning.len() >= config.min_conditions {
            TrendClassification {
                class: TrendClass::Warning,
                explanation: warning,
            }
        } else if up.len() >= config.min_conditions && inputs.last_7d.conversions > 0 {
            TrendClassification {
                class: TrendClass::Up,
                explanation: up,
            }
        } else if down.len() >= config.min_conditions {
            TrendClassification {
                class: TrendClass::Down,
                explanation: down,
            }
        } else {
            TrendClassification {
                class: TrendClass::Stable,
                explanation: vec!["no significant change versus the previous 7 days".to_string()],
            }
        }
    };

    debug!(
        class = ?classification.class,
        conditions = classification.explanation.len(),
        "trend classified"
    );
    classification
}

fn collecting(inputs: &TrendInputs<'_>) -> Option<Vec<String>> {
    let mut lines = Vec::new();
    if inputs.last_7d.has_no_signal() {
        lines.push("no conversions, clicks or cost recorded in the last 7 days".to_string());
    }
    if inputs.previous_7d.has_no_signal() {
        lines.push("no conversions, clicks or cost recorded in the previous 7 days".to_string());
    }
    (!lines.is_empty()).then_some(lines)
}

/// Percentage change from `previous` to `current`; 0 when there is no base.
fn pct_change(current: f64, previous: f64) -> f64 {
    safe_div(current - previous, previous) * 100.0
}

fn reaches(value: f64, threshold: f64) -> bool {
    value >= threshold - TOLERANCE
}

fn within(value: f64, threshold: f64) -> bool {
    value <= threshold + TOLERANCE
}

fn warning_conditions(
    inputs: &TrendInputs<'_>,
    config: &TrendConfig,
    currency: &str,
) -> Vec<String> {
    let (last, prev) = (inputs.last_3d, inputs.previous_3d);
    let mut lines = Vec::new();

    if last.cpr > 0.0 && reaches(last.cpr, prev.cpr * config.alert_cpr_rise) {
        if prev.cpr > 0.0 {
            lines.push(format!(
                "CPR up {:.1}% in the last 3 days ({currency}{:.2} vs {currency}{:.2})",
                pct_change(last.cpr, prev.cpr),
                last.cpr,
                prev.cpr
            ));
        } else {
            lines.push(format!(
                "CPR at {currency}{:.2} in the last 3 days with no cost per result before",
                last.cpr
            ));
        }
    }
    if prev.ctr > 0.0 && within(last.ctr, prev.ctr * config.alert_ctr_drop) {
        lines.push(format!(
            "CTR down {:.1}% in the last 3 days ({:.2}% vs {:.2}%)",
            -pct_change(last.ctr, prev.ctr),
            last.ctr,
            prev.ctr
        ));
    }
    // Strict: an exact tie on the integer counts does not alert.
    if prev.conversions > 0
        && (last.conversions as f64) < prev.conversions as f64 * config.alert_conversion_drop
    {
        lines.push(format!(
            "conversions down {:.1}% in the last 3 days ({} vs {})",
            -pct_change(last.conversions as f64, prev.conversions as f64),
            last.conversions,
            prev.conversions
        ));
    }
    if inputs.frequency > config.alert_frequency {
        lines.push(format!(
            "frequency {:.2} above {:.2}, audience saturating",
            inputs.frequency, config.alert_frequency
        ));
    }

    lines
}

fn improvement_conditions(
    inputs: &TrendInputs<'_>,
    config: &TrendConfig,
    currency: &str,
) -> Vec<String> {
    let (last, prev) = (inputs.last_7d, inputs.previous_7d);
    let mut lines = Vec::new();

    if prev.cpr > 0.0 && last.cpr > 0.0 && last.cpr < prev.cpr * config.up_cpr {
        lines.push(format!(
            "CPR improved {:.1}% versus the previous 7 days ({currency}{:.2} vs {currency}{:.2})",
            -pct_change(last.cpr, prev.cpr),
            last.cpr,
            prev.cpr
        ));
    }
    if prev.conversions > 0
        && last.conversions as f64 > prev.conversions as f64 * config.up_conversions
    {
        lines.push(format!(
            "conversions up {:.1}% versus the previous 7 days ({} vs {})",
            pct_change(last.conversions as f64, prev.conversions as f64),
            last.conversions,
            prev.conversions
        ));
    }
    if prev.ctr > 0.0 && last.ctr > prev.ctr * config.up_ctr {
        lines.push(format!(
            "CTR up {:.1}% versus the previous 7 days ({:.2}% vs {:.2}%)",
            pct_change(last.ctr, prev.ctr),
            last.ctr,
            prev.ctr
        ));
    }
    if inputs.frequency <= config.up_max_frequency {
        lines.push(format!(
            "frequency {:.2} within the healthy range (up to {:.2})",
            inputs.frequency, config.up_max_frequency
        ));
    }

    lines
}

fn decline_conditions(
    inputs: &TrendInputs<'_>,
    config: &TrendConfig,
    currency: &str,
) -> Vec<String> {
    let (last, prev) = (inputs.last_7d, inputs.previous_7d);
    let mut lines = Vec::new();

    if prev.cpr > 0.0 && last.cpr > 0.0 && reaches(last.cpr, prev.cpr * config.down_cpr) {
        lines.push(format!(
            "CPR worsened {:.1}% versus the previous 7 days ({currency}{:.2} vs {currency}{:.2})",
            pct_change(last.cpr, prev.cpr),
            last.cpr,
            prev.cpr
        ));
    }
    if prev.conversions > 0
        && within(
            last.conversions as f64,
            prev.conversions as f64 * config.down_conversions,
        )
    {
        lines.push(format!(
            "conversions down {:.1}% versus the previous 7 days ({} vs {})",
            -pct_change(last.conversions as f64, prev.conversions as f64),
            last.conversions,
            prev.conversions
        ));
    }
    if prev.ctr > 0.0 && within(last.ctr, prev.ctr * config.down_ctr) {
        lines.push(format!(
            "CTR down {:.1}% versus the previous 7 days ({:.2}% vs {:.2}%)",
            -pct_change(last.ctr, prev.ctr),
            last.ctr,
            prev.ctr
        ));
    }
    if inputs.frequency > config.down_frequency {
        lines.push(format!(
            "frequency {:.2} above {:.2}",
            inputs.frequency, config.down_frequency
        ));
    }

    lines
}
