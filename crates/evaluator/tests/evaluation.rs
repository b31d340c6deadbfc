//! End-to-end evaluation of daily histories through the public API.

use adscale_core::config::EngineConfig;
use adscale_core::{DateRange, MetricSample, Objective};
use adscale_evaluator::aggregate::WindowAggregate;
use adscale_evaluator::{Evaluator, RecommendationKind, TrendClass, WindowedSamples};
use chrono::{Duration, NaiveDate};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
}

fn messages_day(offset: i64, link_clicks: u64, conversations: u64) -> MetricSample {
    MetricSample {
        spend: 30.0,
        impressions: 1_500,
        reach: 800,
        clicks: link_clicks + 10,
        link_clicks,
        messaging_conversations_started: conversations,
        ..MetricSample::empty(start() + Duration::days(offset))
    }
}

fn healthy_messages_history() -> Vec<MetricSample> {
    (0..14).map(|d| messages_day(d, 30, 3)).collect()
}

fn full_range(samples: &[MetricSample]) -> (DateRange, NaiveDate) {
    let first = samples.iter().map(|s| s.date).min().unwrap();
    let last = samples.iter().map(|s| s.date).max().unwrap();
    (DateRange::new(first, last).unwrap(), last)
}

fn evaluate(samples: &[MetricSample], objective: Objective) -> adscale_evaluator::Evaluation {
    let (range, as_of) = full_range(samples);
    let windows = WindowedSamples::partition(samples, range, as_of);
    Evaluator::default().evaluate(&windows, objective)
}

#[test]
fn healthy_messages_campaign_scales_vertically() {
    let evaluation = evaluate(&healthy_messages_history(), Objective::Messages);

    assert!(evaluation.sufficient_sample);
    assert!(evaluation.stable);
    assert_eq!(evaluation.recommendation.kind, RecommendationKind::Vertical);
    assert!(evaluation.recommendation.rationale.contains("CTR 2.00%"));
    assert!(evaluation.recommendation.rationale.contains("CPL R$10.00"));
    assert!(evaluation.recommendation.rationale.contains("freq 1.88"));

    // Identical weeks: only the frequency condition holds.
    assert_eq!(evaluation.trend.class, TrendClass::Stable);

    assert!((evaluation.ideal_target.ideal_cost - 15.0).abs() < f64::EPSILON);
    assert_eq!(evaluation.ideal_target.objective_label, "lead generation");

    // cpr 10 <= 15, cpc 1 <= 2, 42 of 100 conversions, freq 1.875 <= 3
    assert!((evaluation.score.conversions.score - 42.0).abs() < 1e-9);
    assert_eq!(evaluation.score.score, 86);
}

#[test]
fn late_deterioration_raises_warning() {
    let mut samples = healthy_messages_history();
    for sample in samples.iter_mut().skip(11) {
        sample.link_clicks = 20;
        sample.messaging_conversations_started = 2;
    }

    let evaluation = evaluate(&samples, Objective::Messages);
    assert_eq!(evaluation.trend.class, TrendClass::Warning);
    assert_eq!(evaluation.trend.explanation.len(), 3);
    assert!(evaluation.trend.explanation[0].starts_with("CPR up 50.0%"));
    assert!(evaluation.trend.explanation[1].starts_with("CTR down 33.3%"));
    assert!(evaluation.trend.explanation[2].starts_with("conversions down 33.3%"));
}

#[test]
fn evaluation_is_idempotent() {
    let samples = healthy_messages_history();
    let (range, as_of) = full_range(&samples);
    let windows = WindowedSamples::partition(&samples, range, as_of);
    let evaluator = Evaluator::new(EngineConfig::default());

    let first = evaluator.evaluate(&windows, Objective::LeadCapture);
    let second = evaluator.evaluate(&windows, Objective::LeadCapture);
    assert_eq!(first, second);

    let mut shuffled = samples.clone();
    shuffled.reverse();
    let reordered = WindowedSamples::partition(&shuffled, range, as_of);
    assert_eq!(evaluator.evaluate(&reordered, Objective::LeadCapture), first);
}

#[test]
fn purchases_below_three_sales_always_wait() {
    let samples: Vec<MetricSample> = (0..10)
        .map(|d| MetricSample {
            spend: 20.0,
            impressions: 5_000,
            reach: 4_000,
            link_clicks: 150,
            purchases: if d < 2 { 1 } else { 0 },
            ..MetricSample::empty(start() + Duration::days(d))
        })
        .collect();

    let evaluation = evaluate(&samples, Objective::Purchases);
    assert!(evaluation.sufficient_sample);
    assert_eq!(evaluation.aggregates.selected_period.purchases, 2);
    assert_eq!(evaluation.recommendation.kind, RecommendationKind::Wait);
    assert!(evaluation.recommendation.rationale.contains("sales: 2"));
}

#[test]
fn new_line_item_is_collecting_and_waits() {
    let samples: Vec<MetricSample> = (0..3)
        .map(|d| MetricSample {
            spend: 5.0,
            impressions: 300,
            reach: 250,
            link_clicks: 4,
            ..MetricSample::empty(start() + Duration::days(d))
        })
        .collect();

    let evaluation = evaluate(&samples, Objective::Messages);
    assert!(!evaluation.sufficient_sample);
    assert_eq!(evaluation.recommendation.kind, RecommendationKind::Wait);
    assert_eq!(
        evaluation.recommendation.rationale,
        "insufficient data: 900 impressions, 12 clicks"
    );
    assert_eq!(evaluation.trend.class, TrendClass::Collecting);
    assert_eq!(evaluation.ideal_target.objective_label, "undefined");
}

#[test]
fn all_zero_windows_are_collecting() {
    let zeros: Vec<MetricSample> = (0..14)
        .map(|d| MetricSample::empty(start() + Duration::days(d)))
        .collect();
    let evaluation = evaluate(&zeros, Objective::Traffic);
    assert_eq!(evaluation.trend.class, TrendClass::Collecting);
}

#[test]
fn zero_denominators_never_leak_nan() {
    let histories = vec![
        vec![MetricSample {
            spend: 10.0,
            ..MetricSample::empty(start())
        }],
        vec![MetricSample {
            impressions: 400,
            clicks: 7,
            ..MetricSample::empty(start())
        }],
        vec![MetricSample {
            spend: 3.0,
            impressions: 900,
            reach: 0,
            leads: 2,
            ..MetricSample::empty(start())
        }],
    ];

    for samples in histories {
        let agg = WindowAggregate::from_samples(&samples, 100.0);
        if agg.reach == 0 {
            assert_eq!(agg.frequency, 0.0);
        }
        if agg.impressions == 0 {
            assert_eq!(agg.ctr, 0.0);
            assert_eq!(agg.cpm, 0.0);
        }
        if agg.clicks == 0 {
            assert_eq!(agg.cpc, 0.0);
        }
        if agg.conversions == 0 {
            assert_eq!(agg.cpr, 0.0);
        }
        for ratio in [agg.ctr, agg.cpc, agg.cpr, agg.cpm, agg.frequency, agg.roas, agg.lpv_rate] {
            assert!(ratio.is_finite());
        }
    }
}

#[test]
fn evaluation_serializes_with_snake_case_tags() {
    let evaluation = evaluate(&healthy_messages_history(), Objective::Messages);
    let json = serde_json::to_value(&evaluation).unwrap();
    assert_eq!(json["objective"], "messages");
    assert_eq!(json["recommendation"]["kind"], "vertical");
    assert_eq!(json["trend"]["class"], "stable");
    assert!(json["aggregates"]["previous_3_days"]["ctr"].is_number());
}

#[test]
fn evaluator_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Evaluator>();
}
