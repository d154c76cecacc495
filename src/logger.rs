use tracing_subscriber::{EnvFilter, FmtSubscriber};

const FALLBACK_DIRECTIVE: &str = "info";

pub fn init_logging(verbose: bool) {
    let directive = filter_directive(
        std::env::var("STAGGER_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
        verbose,
    );
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

/// `STAGGER_LOG` beats `RUST_LOG`; with neither set, `--verbose` picks debug.
fn filter_directive(stagger_log: Option<String>, rust_log: Option<String>, verbose: bool) -> String {
    stagger_log.or(rust_log).unwrap_or_else(|| {
        if verbose {
            "debug".to_owned()
        } else {
            FALLBACK_DIRECTIVE.to_owned()
        }
    })
}
