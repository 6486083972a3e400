// Multi-file CSV processing
pub mod batch;

// SMC detectors and raw feature augmenters
pub mod detectors;

// Rolling window statistics over price columns
pub mod market_data;

// Feature pipeline driver
pub mod pipeline;
