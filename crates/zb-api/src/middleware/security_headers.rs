use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue, header},
    middleware::{self, Next},
    response::Response,
};

use crate::config::Environment;

/// Headers set on every response regardless of environment
const BASELINE_HEADERS: &[(HeaderName, &str)] = &[
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "no-referrer"),
    // Mastery and test results are per-student data
    (header::CACHE_CONTROL, "no-store"),
];

const HSTS: &str = "max-age=31536000; includeSubDomains";

pub async fn security_headers_middleware(
    environment: Environment,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in BASELINE_HEADERS {
        headers
            .entry(name.clone())
            .or_insert(HeaderValue::from_static(*value));
    }

    // Development is served over plain HTTP
    if environment.is_production() {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS),
        );
    }

    response
}

/// Wrap every route of `router` with [`security_headers_middleware`].
pub fn apply_security_headers<S>(router: Router<S>, environment: Environment) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn(move |req, next| {
        security_headers_middleware(environment, req, next)
    }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    async fn fetch(environment: Environment, path: &str) -> HeaderMap {
        let app = Router::new()
            .route("/plain", get(|| async { "ok" }))
            .route(
                "/cached",
                get(|| async { ([(header::CACHE_CONTROL, "max-age=60")], "ok").into_response() }),
            );
        let app = apply_security_headers(app, environment);

        let response = app
            .oneshot(axum::http::Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        response.headers().clone()
    }

    #[tokio::test]
    async fn test_baseline_headers_in_every_environment() {
        for environment in [Environment::Development, Environment::Production] {
            let headers = fetch(environment, "/plain").await;
            for (name, value) in BASELINE_HEADERS {
                assert_eq!(headers.get(name).unwrap(), value, "{name} in {environment:?}");
            }
        }
    }

    #[tokio::test]
    async fn test_hsts_only_in_production() {
        let production = fetch(Environment::Production, "/plain").await;
        assert_eq!(production.get(header::STRICT_TRANSPORT_SECURITY).unwrap(), HSTS);

        let development = fetch(Environment::Development, "/plain").await;
        assert!(development.get(header::STRICT_TRANSPORT_SECURITY).is_none());
    }

    #[tokio::test]
    async fn test_handler_cache_control_is_kept() {
        let headers = fetch(Environment::Production, "/cached").await;
        assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "max-age=60");
    }
}
