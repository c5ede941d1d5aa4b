mod routes;

pub use routes::{UserMasteryResponse, routes};
