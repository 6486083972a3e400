//! Configuration domain module
//!
//! Value objects for detector parameters, kept free of any loading concerns
//! (environment and file parsing live in `crate::config`).

pub mod feature_config;

pub use feature_config::{
    BreakOfStructureConfig, FairValueGapConfig, FeatureConfig, LiquiditySweepConfig,
    OrderBlockConfig, RawFeatureConfig, WindowAlignment,
};
