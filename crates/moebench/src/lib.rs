//! moebench library: application logic of the experiment runner.

pub mod app;
pub mod config;
pub mod errors;
pub mod version;
