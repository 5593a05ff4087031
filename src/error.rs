//! Error type shared by every stage of the enhancement engine.
//!
//! Argument and domain problems are detected before any per-voxel work starts
//! and abort the run. Numeric degeneracies (near-zero denominators, empty
//! estimation populations) are not errors: they resolve to well-defined zero
//! values inside the stage that meets them.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnhanceError {
    /// A caller-supplied value is outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The mask region cannot be represented inside the volume domain.
    #[error("mask region {mask} is not contained in volume domain {volume}")]
    DomainMismatch { mask: String, volume: String },

    /// The cooperative abort flag was raised between two scales.
    #[error("enhancement aborted after {completed_scales} completed scale(s)")]
    Aborted { completed_scales: usize },

    /// Reading or writing a file failed.
    #[error("i/o error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// A tool configuration file could not be parsed.
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl EnhanceError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EnhanceError>;
