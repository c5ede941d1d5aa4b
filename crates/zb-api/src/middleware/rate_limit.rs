//! Per-IP rate limiting for the expensive routes (LLM calls, test uploads).
//!
//! The key is the client IP as seen through `X-Forwarded-For`/`X-Real-IP`,
//! falling back to the peer address, so the server must be started with
//! `into_make_service_with_connect_info::<SocketAddr>()`.

/// Sustained requests per second for the general limiter
pub const GENERAL_RATE_PER_SECOND: u64 = 10;
/// Burst allowance for the general limiter
pub const GENERAL_BURST_SIZE: u32 = 20;

/// Build a `GovernorLayer` keyed on the client IP.
///
/// ```ignore
/// Router::new()
///     .route("/ai/explain", post(explain))
///     .layer(make_rate_limit_layer!(GENERAL_RATE_PER_SECOND, GENERAL_BURST_SIZE))
/// ```
#[macro_export]
macro_rules! make_rate_limit_layer {
    ($per_second:expr, $burst:expr) => {{
        let config = ::tower_governor::governor::GovernorConfigBuilder::default()
            .per_second($per_second)
            .burst_size($burst)
            .key_extractor(::tower_governor::key_extractor::SmartIpKeyExtractor)
            .use_headers()
            .finish()
            .expect("rate limit period and burst size are non-zero");
        ::tower_governor::GovernorLayer::new(config)
    }};
}
