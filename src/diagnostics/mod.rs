//! Run diagnostics returned alongside the enhanced volume.
//!
//! [`EnhancementReport`] is the entry point: it describes the input lattice,
//! the estimator/functor pairing and one [`ScaleReport`] per processed sigma,
//! each with its own [`TimingBreakdown`]. Everything serialises to camelCase
//! JSON for the command-line tool.

pub mod report;
pub mod timing;

pub use report::{EnhancementReport, InputDescriptor, ScaleReport};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
