//! Tracing subscriber setup

use std::str::FromStr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const NOISY_MODULES: &str = "h2=info,hyper=info,hyper_util=info,reqwest=info,alloy_transport_http=info,alloy_rpc_client=info";

/// Filter directives for `level`
///
/// A bare level gets the transport crates pinned to `info`; a custom
/// directive string (containing `,` or `=`) is used as-is.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.contains(',') || level.contains('=') {
        level.to_string()
    } else {
        format!("{},{}", level, NOISY_MODULES)
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the `verbose` flag when set.
pub fn setup_logging(verbose: bool, json_format: bool) {
    let level = match std::env::var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => value,
        _ if verbose => "debug".to_string(),
        _ => "info".to_string(),
    };

    let directives = filter_directives(&level);
    let filter = EnvFilter::from_str(&directives).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter);

    if json_format {
        let json_layer = fmt::layer().json().with_target(false).with_current_span(true);
        subscriber.with(json_layer).init();
    } else {
        subscriber.with(fmt::layer().with_target(true).compact()).init();
    }

    tracing::debug!(
        filter = %directives,
        format = if json_format { "json" } else { "compact" },
        "Logging initialized"
    );
}
