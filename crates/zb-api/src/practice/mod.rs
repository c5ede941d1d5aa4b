mod routes;

pub use routes::{NextQuestionRequest, NextQuestionResponse, routes};
