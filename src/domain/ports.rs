use crate::domain::features::FeatureColumn;
use crate::domain::market::PriceSeries;

/// A pure pass over a price series that produces derived columns.
///
/// Implementations must be stateless across calls and must not depend on
/// columns produced by other detectors, so the pipeline can run them in any
/// order or concurrently.
pub trait FeatureDetector: Send + Sync {
    /// Short identifier used in logs and by `FeaturePipeline::without`.
    fn name(&self) -> &str;

    /// Names of the columns `detect` returns, in the same order.
    fn column_names(&self) -> Vec<String>;

    /// Minimum number of bars for at least one fully-defined output row.
    fn required_bars(&self) -> usize;

    /// Whether any output uses bars after the current one.
    fn uses_lookahead(&self) -> bool {
        false
    }

    fn detect(&self, series: &PriceSeries) -> Vec<FeatureColumn>;
}
