pub mod analyze;
pub mod config;
pub mod datasets;
pub mod parse;
