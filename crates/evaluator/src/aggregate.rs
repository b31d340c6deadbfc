//! Window aggregation: sums a run of daily samples and derives the ratios
//! every other component reads.

use adscale_core::MetricSample;
use serde::{Deserialize, Serialize};

/// Totals and derived ratios for one date window.
///
/// Every ratio is 0.0 when its denominator is zero, so consumers never see
/// NaN or infinity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowAggregate {
    /// Number of daily samples folded into this aggregate.
    pub days: usize,
    pub spend: f64,
    pub impressions: u64,
    pub reach: u64,
    /// Link clicks, or raw clicks when no link clicks were reported.
    pub clicks: u64,
    pub landing_page_views: u64,
    /// Messaging conversations, or leads when no conversations were reported.
    pub conversions: u64,
    pub purchases: u64,
    pub revenue: f64,
    /// `clicks / impressions * 100`
    pub ctr: f64,
    /// `spend / clicks`
    pub cpc: f64,
    /// `spend / conversions`
    pub cpr: f64,
    /// `spend / impressions * 1000`
    pub cpm: f64,
    /// `impressions / reach`
    pub frequency: f64,
    /// `revenue / spend`
    pub roas: f64,
    /// `landing_page_views / clicks * 100`
    pub lpv_rate: f64,
    /// `spend / purchases`
    pub cost_per_purchase: f64,
}

impl WindowAggregate {
    /// Fold `samples` into one aggregate. Order does not matter.
    pub fn from_samples(samples: &[MetricSample], revenue_per_purchase: f64) -> Self {
        let spend: f64 = samples.iter().map(|s| s.spend).sum();
        let impressions: u64 = samples.iter().map(|s| s.impressions).sum();
        let reach: u64 = samples.iter().map(|s| s.reach).sum();
        let landing_page_views: u64 = samples.iter().map(|s| s.landing_page_views).sum();

        let link_clicks: u64 = samples.iter().map(|s| s.link_clicks).sum();
        let clicks = if link_clicks > 0 {
            link_clicks
        } else {
            samples.iter().map(|s| s.clicks).sum()
        };

        let messaging: u64 = samples
            .iter()
            .map(|s| s.messaging_conversations_started)
            .sum();
        let conversions = if messaging > 0 {
            messaging
        } else {
            samples.iter().map(|s| s.leads).sum()
        };

        let purchases: u64 = samples.iter().map(|s| s.purchases).sum();
        let revenue = purchases as f64 * revenue_per_purchase;

        Self {
            days: samples.len(),
            spend,
            impressions,
            reach,
            clicks,
            landing_page_views,
            conversions,
            purchases,
            revenue,
            ctr: safe_div(clicks as f64, impressions as f64) * 100.0,
            cpc: safe_div(spend, clicks as f64),
            cpr: safe_div(spend, conversions as f64),
            cpm: safe_div(spend, impressions as f64) * 1000.0,
            frequency: safe_div(impressions as f64, reach as f64),
            roas: safe_div(revenue, spend),
            lpv_rate: safe_div(landing_page_views as f64, clicks as f64) * 100.0,
            cost_per_purchase: safe_div(spend, purchases as f64),
        }
    }

    /// True when the window carries no conversion, click or cost signal.
    pub fn has_no_signal(&self) -> bool {
        self.conversions == 0 && self.ctr == 0.0 && self.cpr == 0.0
    }
}

/// `numerator / denominator`, or 0.0 when the denominator is zero.
pub(crate) fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
