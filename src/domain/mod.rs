// Detector parameter value objects
pub mod config;

// Domain-specific error types
pub mod errors;

// Feature table (derived columns)
pub mod features;

// Price series domain
pub mod market;

// Port interfaces
pub mod ports;
