pub mod config;
pub mod runner;
pub mod surface;
pub mod types;
