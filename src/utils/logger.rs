use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. Verbose mode adds engine debug
/// output (catalog sizes, best combination per request).
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "jaljalgotcha=debug,info"
    } else {
        "jaljalgotcha=info,warn"
    }
}

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Compact human-readable output for `jaljalgotcha` and `fetch-catalog`.
pub fn init_cli_logger(verbose: bool) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(verbose)
        .without_time()
        .compact();

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter(default_directives(verbose)))
        .with(fmt_layer)
        .try_init()
    {
        eprintln!("Logger already initialised: {}", e);
    }
}

/// JSON lines for the HTTP server, including the `tower_http` request spans.
pub fn init_server_logger() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .json()
        .with_current_span(true);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter("jaljalgotcha=info,tower_http=debug,warn"))
        .with(fmt_layer)
        .try_init()
    {
        eprintln!("Logger already initialised: {}", e);
    }
}
