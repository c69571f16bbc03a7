//! Tracing subscriber setup for the binary
//!
//! Logs go to stderr so `convert` and `formats` output on stdout stays clean.
//! `RUST_LOG` overrides the default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber: compact text by default, JSON lines when
/// `json` is set.
pub fn init_logger(verbose: bool, json: bool) {
    let default_directives = if verbose {
        "tabconvert=debug,info"
    } else {
        "tabconvert=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer.compact()).init();
    }
}
