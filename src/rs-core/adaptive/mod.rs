//! Decision core of adaptive streaming: predicting the bandwidth from past throughput samples
//! and choosing the next rendition to load from it and the buffer level.
//!
//! Every function here is pure: the caller owns the throughput and switch histories and hands
//! a snapshot of them on each call.

mod bandwidth_estimator;
mod buffer_health;
mod configuration;
mod ewma;
mod ladder;
mod oscillation_guard;
mod qoe;
mod quality_selector;
mod recommendation;

pub use bandwidth_estimator::{
    detect_trend, predict_bandwidth, predict_bandwidth_harmonic, variance_of, BandwidthTrend,
};
pub use buffer_health::{health_score, rebuffer_probability};
pub use configuration::AbrConfiguration;
pub use ladder::{LadderError, Rendition, RenditionLadder};
pub use oscillation_guard::{
    apply_oscillation_guard, select_quality_stable, SwitchHistory, SWITCH_HISTORY_LOOKBACK,
};
pub use qoe::{estimate_qoe, select_quality_maximizing_qoe};
pub use quality_selector::{select_quality_level, BufferRegime};
pub use recommendation::{get_comprehensive_recommendation, BandwidthOutlook, Recommendation};
