//! JSON configuration for the command-line tools.

pub mod tool;

pub use tool::{
    load_config, EnhanceToolConfig, InputConfig, MaskConfig, OutputConfig, PreprocessConfig,
    SigmaConfig,
};
