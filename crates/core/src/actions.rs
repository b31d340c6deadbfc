//! Mapping from ads-platform action types to typed sample fields.
//!
//! Insights rows report link clicks, landing page views and conversions as a
//! list of `(action_type, value)` pairs. The table below is the single place
//! that decides which action type feeds which `MetricSample` field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::MetricSample;

/// Sample field an action type contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    LinkClick,
    LandingPageView,
    MessagingConversation,
    Lead,
    Purchase,
}

/// Known action types. Several aliases may describe the same events
/// (pixel vs. on-platform vs. omni), so they are never summed together.
pub const ACTION_TYPE_MAPPINGS: &[(&str, ActionKind)] = &[
    ("link_click", ActionKind::LinkClick),
    ("landing_page_view", ActionKind::LandingPageView),
    ("omni_landing_page_view", ActionKind::LandingPageView),
    (
        "onsite_conversion.messaging_conversation_started_7d",
        ActionKind::MessagingConversation,
    ),
    ("lead", ActionKind::Lead),
    ("onsite_conversion.lead_grouped", ActionKind::Lead),
    ("offsite_conversion.fb_pixel_lead", ActionKind::Lead),
    ("purchase", ActionKind::Purchase),
    ("omni_purchase", ActionKind::Purchase),
    ("offsite_conversion.fb_pixel_purchase", ActionKind::Purchase),
];

/// Look up the sample field for an action type. Unknown types map to `None`.
pub fn action_kind(action_type: &str) -> Option<ActionKind> {
    ACTION_TYPE_MAPPINGS
        .iter()
        .find(|(name, _)| *name == action_type)
        .map(|(_, kind)| *kind)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionValue {
    pub action_type: String,
    pub value: f64,
}

/// A raw daily insights row as delivered by the feed collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsRow {
    pub date: NaiveDate,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub reach: u64,
    pub actions: Vec<ActionValue>,
}

impl InsightsRow {
    /// Fold the action list into a typed sample. For each kind, the largest
    /// value among its aliases wins.
    pub fn to_sample(&self) -> MetricSample {
        let mut sample = MetricSample {
            spend: self.spend,
            impressions: self.impressions,
            clicks: self.clicks,
            reach: self.reach,
            ..MetricSample::empty(self.date)
        };

        for action in &self.actions {
            let Some(kind) = action_kind(&action.action_type) else {
                continue;
            };
            let value = action.value.max(0.0).round() as u64;
            let slot = match kind {
                ActionKind::LinkClick => &mut sample.link_clicks,
                ActionKind::LandingPageView => &mut sample.landing_page_views,
                ActionKind::MessagingConversation => &mut sample.messaging_conversations_started,
                ActionKind::Lead => &mut sample.leads,
                ActionKind::Purchase => &mut sample.purchases,
            };
            *slot = (*slot).max(value);
        }

        sample
    }
}

impl From<&InsightsRow> for MetricSample {
    fn from(row: &InsightsRow) -> Self {
        row.to_sample()
    }
}
