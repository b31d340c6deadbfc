//! Slicing one daily series into the six evaluation windows.

use adscale_core::{DateRange, MetricSample};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregate::WindowAggregate;

/// Daily samples for each evaluation window, each sorted ascending by date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowedSamples {
    pub selected_period: Vec<MetricSample>,
    pub last_7_days: Vec<MetricSample>,
    pub previous_7_days: Vec<MetricSample>,
    pub last_3_days: Vec<MetricSample>,
    pub previous_3_days: Vec<MetricSample>,
    pub all_time: Vec<MetricSample>,
}

impl WindowedSamples {
    /// Partition a full daily history.
    ///
    /// The rolling windows end at `as_of` inclusive: last 7 days is
    /// `[as_of - 6, as_of]`, previous 7 is `[as_of - 13, as_of - 7]`, and the
    /// 3-day pair follows the same shape. Samples after `as_of` only count
    /// toward the selected period and all-time windows.
    pub fn partition(samples: &[MetricSample], selected: DateRange, as_of: NaiveDate) -> Self {
        let mut sorted = samples.to_vec();
        sorted.sort_by_key(|s| s.date);

        let slice = |range: DateRange| -> Vec<MetricSample> {
            sorted
                .iter()
                .filter(|s| range.contains(s.date))
                .cloned()
                .collect()
        };

        Self {
            selected_period: slice(selected),
            last_7_days: slice(trailing(as_of, 0, 7)),
            previous_7_days: slice(trailing(as_of, 7, 7)),
            last_3_days: slice(trailing(as_of, 0, 3)),
            previous_3_days: slice(trailing(as_of, 3, 3)),
            all_time: sorted.clone(),
        }
    }

    pub fn aggregate(&self, revenue_per_purchase: f64) -> WindowAggregates {
        let agg =
            |samples: &[MetricSample]| WindowAggregate::from_samples(samples, revenue_per_purchase);
        WindowAggregates {
            selected_period: agg(&self.selected_period),
            last_7_days: agg(&self.last_7_days),
            previous_7_days: agg(&self.previous_7_days),
            last_3_days: agg(&self.last_3_days),
            previous_3_days: agg(&self.previous_3_days),
            all_time: agg(&self.all_time),
        }
    }
}

/// A `len`-day range ending `offset` days before `as_of`.
fn trailing(as_of: NaiveDate, offset: i64, len: u32) -> DateRange {
    DateRange::ending_at(as_of - Duration::days(offset), len)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowAggregates {
    pub selected_period: WindowAggregate,
    pub last_7_days: WindowAggregate,
    pub previous_7_days: WindowAggregate,
    pub last_3_days: WindowAggregate,
    pub previous_3_days: WindowAggregate,
    pub all_time: WindowAggregate,
}
