//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (for example
/// `"info"` or `"rust_ludo=debug"`) is used. Calling this twice is
/// harmless: the second install is ignored.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
}
