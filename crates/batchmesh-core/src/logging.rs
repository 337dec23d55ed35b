//! Logging bootstrap built on `tracing-subscriber`.

/// Default filter directives used by [`init`].
pub const DEFAULT_FILTER: &str = "info,batchmesh_render=debug";

/// Install a global fmt subscriber with the default filter.
///
/// `RUST_LOG` takes precedence when set.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a global fmt subscriber with the given filter directives.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_filter(directives: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directives));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
