pub mod ai;
pub mod analysis;
pub mod config;
pub mod error;
pub mod mastery;
pub mod metrics;
pub mod middleware;
pub mod normalization;
pub mod practice;
pub mod question;
pub mod router;
pub mod state;
pub mod test_result;
pub mod topic;
pub mod tracing;
pub mod validation;

pub use config::ApiConfig;
pub use state::ApiState;
