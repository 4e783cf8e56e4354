pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod labels;
pub mod state;
