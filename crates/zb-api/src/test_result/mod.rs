pub mod parser;
mod routes;

pub use routes::{TestResultSubmission, TestResultsResponse, routes};
