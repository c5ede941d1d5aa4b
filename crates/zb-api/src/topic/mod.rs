mod routes;

pub use routes::{PrerequisitesResponse, TopicQuery, TopicsResponse, routes};
