//! Line-item input shape for the CLI and the windowing around it.
//!
//! Strategies (audiences) and individual ads arrive in the same shape and go
//! through the same evaluator; `level` only tags the output.

use adscale_core::{DateRange, InsightsRow, MetricSample, Objective};
use adscale_evaluator::{Evaluation, Evaluator, WindowedSamples};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Strategy,
    Ad,
}

/// A daily row, either already typed or as a raw insights row with actions.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SampleRecord {
    Insights(InsightsRow),
    Sample(MetricSample),
}

impl SampleRecord {
    pub fn to_sample(&self) -> MetricSample {
        match self {
            SampleRecord::Insights(row) => row.to_sample(),
            SampleRecord::Sample(sample) => sample.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub level: Level,
    /// Configured objective; API identifiers such as `OUTCOME_LEADS` are accepted.
    pub objective: String,
    #[serde(default)]
    pub samples: Vec<SampleRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineItemReport {
    pub id: String,
    pub name: String,
    pub level: Level,
    pub evaluation: Evaluation,
}

/// Caller-supplied window bounds. Unset values fall back to the data.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowOptions {
    pub as_of: Option<NaiveDate>,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl LineItem {
    /// Evaluate the item, or `Ok(None)` when it has no samples and no
    /// `as_of` date to anchor the rolling windows.
    pub fn evaluate(
        &self,
        evaluator: &Evaluator,
        options: &WindowOptions,
    ) -> anyhow::Result<Option<LineItemReport>> {
        let objective: Objective = self
            .objective
            .parse()
            .with_context(|| format!("line item {}", self.id))?;

        let samples: Vec<MetricSample> = self.samples.iter().map(SampleRecord::to_sample).collect();
        let first = samples.iter().map(|s| s.date).min();
        let last = samples.iter().map(|s| s.date).max();

        let Some(as_of) = options.as_of.or(last) else {
            return Ok(None);
        };
        // An item that only started after `as_of` still gets an empty period.
        let since = options
            .since
            .unwrap_or_else(|| first.map_or(as_of, |first| first.min(as_of)));
        let until = options.until.unwrap_or(as_of);
        let selected = DateRange::new(since, until)
            .with_context(|| format!("selected period for line item {}", self.id))?;

        let windows = WindowedSamples::partition(&samples, selected, as_of);
        Ok(Some(LineItemReport {
            id: self.id.clone(),
            name: self.name.clone(),
            level: self.level,
            evaluation: evaluator.evaluate(&windows, objective),
        }))
    }
}

/// Evaluate every item. Items that are empty or fail are logged and
/// skipped so one bad line item does not sink the batch.
pub fn evaluate_all(
    items: &[LineItem],
    evaluator: &Evaluator,
    options: &WindowOptions,
) -> Vec<LineItemReport> {
    let mut reports = Vec::with_capacity(items.len());
    for item in items {
        match item.evaluate(evaluator, options) {
            Ok(Some(report)) => {
                info!(
                    id = %report.id,
                    level = ?report.level,
                    recommendation = ?report.evaluation.recommendation.kind,
                    trend = ?report.evaluation.trend.class,
                    score = report.evaluation.score.score,
                    "Line item evaluated"
                );
                reports.push(report);
            }
            Ok(None) => warn!(id = %item.id, "Line item has no samples, skipping"),
            Err(e) => warn!(
                id = %item.id,
                error = %format!("{e:#}"),
                "Line item could not be evaluated, skipping"
            ),
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use adscale_evaluator::RecommendationKind;

    const ITEMS: &str = r#"[
        {
            "id": "aud-1",
            "name": "Lookalike 1%",
            "level": "strategy",
            "objective": "OUTCOME_LEADS",
            "samples": [
                {"date": "2024-10-01", "spend": 12.0, "impressions": 800, "clicks": 20, "reach": 600,
                 "actions": [{"action_type": "link_click", "value": 14},
                             {"action_type": "lead", "value": 1}]},
                {"date": "2024-10-02", "spend": 14.0, "impressions": 900, "link_clicks": 16, "reach": 700,
                 "leads": 2}
            ]
        },
        {
            "id": "ad-9",
            "level": "ad",
            "objective": "messages",
            "samples": []
        }
    ]"#;

    #[test]
    fn test_parses_both_sample_shapes() {
        let items: Vec<LineItem> = serde_json::from_str(ITEMS).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].level, Level::Strategy);
        assert!(matches!(items[0].samples[0], SampleRecord::Insights(_)));
        assert!(matches!(items[0].samples[1], SampleRecord::Sample(_)));

        let first = items[0].samples[0].to_sample();
        assert_eq!(first.link_clicks, 14);
        assert_eq!(first.leads, 1);
    }

    #[test]
    fn test_evaluates_over_full_history_by_default() {
        let items: Vec<LineItem> = serde_json::from_str(ITEMS).unwrap();
        let report = items[0]
            .evaluate(&Evaluator::default(), &WindowOptions::default())
            .unwrap()
            .unwrap();

        let selected = &report.evaluation.aggregates.selected_period;
        assert_eq!(selected.days, 2);
        assert_eq!(selected.clicks, 30);
        assert_eq!(selected.conversions, 3);
        assert_eq!(report.evaluation.recommendation.kind, RecommendationKind::Wait);
    }

    #[test]
    fn test_empty_item_without_anchor_is_skipped() {
        let items: Vec<LineItem> = serde_json::from_str(ITEMS).unwrap();
        let report = items[1]
            .evaluate(&Evaluator::default(), &WindowOptions::default())
            .unwrap();
        assert!(report.is_none());
    }

    #[test]
    fn test_unknown_objective_is_an_error() {
        let item = LineItem {
            id: "x".to_string(),
            name: String::new(),
            level: Level::Ad,
            objective: "OUTCOME_AWARENESS".to_string(),
            samples: Vec::new(),
        };
        assert!(item
            .evaluate(&Evaluator::default(), &WindowOptions::default())
            .is_err());
    }

    #[test]
    fn test_inverted_window_is_an_error() {
        let items: Vec<LineItem> = serde_json::from_str(ITEMS).unwrap();
        let options = WindowOptions {
            since: NaiveDate::from_ymd_opt(2024, 10, 5),
            until: NaiveDate::from_ymd_opt(2024, 10, 1),
            ..Default::default()
        };
        assert!(items[0].evaluate(&Evaluator::default(), &options).is_err());
    }

    #[test]
    fn test_batch_skips_failing_items() {
        let mut items: Vec<LineItem> = serde_json::from_str(ITEMS).unwrap();
        items.push(LineItem {
            id: "bad".to_string(),
            name: String::new(),
            level: Level::Ad,
            objective: "OUTCOME_AWARENESS".to_string(),
            samples: Vec::new(),
        });

        let reports = evaluate_all(&items, &Evaluator::default(), &WindowOptions::default());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, "aud-1");
    }

    #[test]
    fn test_item_starting_after_as_of_is_evaluated() {
        let items: Vec<LineItem> = serde_json::from_str(ITEMS).unwrap();
        let options = WindowOptions {
            as_of: NaiveDate::from_ymd_opt(2024, 9, 20),
            ..Default::default()
        };
        let report = items[0]
            .evaluate(&Evaluator::default(), &options)
            .unwrap()
            .unwrap();

        let aggregates = &report.evaluation.aggregates;
        assert_eq!(aggregates.selected_period.days, 0);
        assert_eq!(aggregates.last_7_days.days, 0);
        assert_eq!(aggregates.all_time.days, 2);
        assert_eq!(report.evaluation.recommendation.kind, RecommendationKind::Wait);
    }
}
