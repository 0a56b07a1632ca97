use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Directive used when `RUST_LOG` is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "ghp=debug" } else { "ghp=warn" }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init();
}
