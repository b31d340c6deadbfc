//! Day-over-day spend stability.

use adscale_core::config::StabilityConfig;
use adscale_core::MetricSample;

/// Length of the unbroken run of good transitions ending at the last day.
///
/// A transition is good when the later day spent something and did not fall
/// below `min_spend_ratio` of a non-zero earlier day. Any bad transition
/// resets the run.
pub fn good_streak(samples: &[MetricSample], config: &StabilityConfig) -> usize {
    let mut spends: Vec<_> = samples.iter().map(|s| (s.date, s.spend)).collect();
    spends.sort_by_key(|(date, _)| *date);

    let mut streak = 0;
    for pair in spends.windows(2) {
        let (earlier, later) = (pair[0].1, pair[1].1);
        let good = later > 0.0 && (earlier == 0.0 || later >= config.min_spend_ratio * earlier);
        streak = if good { streak + 1 } else { 0 };
    }
    streak
}

/// Whether the daily series shows consistent, non-collapsing delivery.
pub fn is_stable(samples: &[MetricSample], config: &StabilityConfig) -> bool {
    if samples.len() < config.min_days {
        return false;
    }
    good_streak(samples, config) >= config.min_streak
}
