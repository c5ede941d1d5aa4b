mod routes;

pub use routes::{ExplainRequest, ExplainResponse, GenerateVariantRequest, routes};
