// CSV persistence for price series and feature tables
pub mod csv_store;
