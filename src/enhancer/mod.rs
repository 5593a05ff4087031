//! Multi-scale orchestration: parameters, method pairings and the run loop.

pub mod params;
pub mod pipeline;

pub use params::{EnhanceParams, EnhancementMethod};
pub use pipeline::{EnhancementOutput, MultiScaleEnhancer, ScaleProgress};
