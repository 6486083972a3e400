// Market data processing modules
pub mod rolling_window;
