//! Log output setup.
//!
//! Development gets pretty, human-readable output. Production gets flattened
//! JSON lines carrying the current span (request id, method, uri).

use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Filter applied when `RUST_LOG` is not set
pub fn default_filter(env: &Environment) -> &'static str {
    match env {
        Environment::Development => "debug,tower_http=debug,sqlx=warn",
        Environment::Production => "info,tower_http=info,sqlx=warn",
    }
}

/// Install the global subscriber for `env`.
///
/// `RUST_LOG` overrides the default filter of either mode
/// (e.g. `RUST_LOG=zb_api=trace,tower_http=info`).
pub fn init_tracing(env: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(env)));

    let output: BoxedLayer = match env {
        Environment::Development => tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Environment::Production => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(output.with_filter(filter))
        .init();

    tracing::info!(environment = ?env, "Tracing initialized");
}
