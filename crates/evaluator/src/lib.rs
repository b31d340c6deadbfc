//! Ad-performance evaluation: window aggregation, sample and stability
//! gating, scaling recommendations, trend alerts, and performance scoring.
//!
//! Everything here is a pure function of its inputs: no I/O, no clocks,
//! no shared state.

pub mod aggregate;
pub mod engine;
pub mod gate;
pub mod ideal;
pub mod recommend;
pub mod score;
pub mod stability;
pub mod trend;
pub mod window;

pub use aggregate::WindowAggregate;
pub use engine::{Evaluation, Evaluator};
pub use ideal::IdealTarget;
pub use recommend::{Recommendation, RecommendationKind};
pub use score::PerformanceScore;
pub use trend::{TrendClass, TrendClassification};
pub use window::{WindowAggregates, WindowedSamples};
