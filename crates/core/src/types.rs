use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AdScaleError, AdScaleResult};

/// One day of delivery data for a single ad or audience.
///
/// Every numeric field defaults to zero when the feed omits it, so a missing
/// `link_clicks` and a reported zero look the same to the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub date: NaiveDate,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub link_clicks: u64,
    #[serde(default)]
    pub reach: u64,
    #[serde(default)]
    pub landing_page_views: u64,
    #[serde(default)]
    pub messaging_conversations_started: u64,
    #[serde(default)]
    pub leads: u64,
    #[serde(default)]
    pub purchases: u64,
}

impl MetricSample {
    /// An all-zero sample for `date`.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            spend: 0.0,
            impressions: 0,
            clicks: 0,
            link_clicks: 0,
            reach: 0,
            landing_page_views: 0,
            messaging_conversations_started: 0,
            leads: 0,
            purchases: 0,
        }
    }
}

/// The campaign's declared goal. Selects the primary cost metric and the
/// thresholds used by the scaling rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Traffic,
    Messages,
    Purchases,
    LeadCapture,
}

impl Objective {
    pub const ALL: [Objective; 4] = [
        Objective::Traffic,
        Objective::Messages,
        Objective::Purchases,
        Objective::LeadCapture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::Traffic => "traffic",
            Objective::Messages => "messages",
            Objective::Purchases => "purchases",
            Objective::LeadCapture => "lead_capture",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts both the snake_case names used in configuration and the
/// objective identifiers reported by the Meta Ads API.
impl FromStr for Objective {
    type Err = AdScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "traffic" | "link_clicks" | "outcome_traffic" => Ok(Objective::Traffic),
            "messages" | "outcome_engagement" | "engagement" => Ok(Objective::Messages),
            "purchases" | "sales" | "conversions" | "outcome_sales" | "product_catalog_sales" => {
                Ok(Objective::Purchases)
            }
            "lead_capture" | "leads" | "lead_generation" | "outcome_leads" => {
                Ok(Objective::LeadCapture)
            }
            other => Err(AdScaleError::UnknownObjective(other.to_string())),
        }
    }
}

/// Inclusive calendar range supplied by the caller for the "selected period".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AdScaleResult<Self> {
        if start > end {
            return Err(AdScaleError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// The `days`-day range ending on `end`. Zero days yields `end` alone.
    pub fn ending_at(end: NaiveDate, days: u32) -> Self {
        Self {
            start: end - Duration::days(i64::from(days.saturating_sub(1))),
            end,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
