//! Shared domain types, engine configuration, and errors for the ad
//! scaling advisor.

pub mod actions;
pub mod config;
pub mod error;
pub mod types;

pub use crate::actions::{ActionKind, ActionValue, InsightsRow};
pub use crate::config::EngineConfig;
pub use crate::error::{AdScaleError, AdScaleResult};
pub use crate::types::{DateRange, MetricSample, Objective};
