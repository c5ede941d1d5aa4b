pub mod grading;
pub mod model;
mod routes;

pub use routes::routes;
