// src/logging.rs
// =============================================================================
// Tracing setup for the binary.
//
// Logs go to stderr so `--json` output on stdout stays machine-readable.
// RUST_LOG wins when set; otherwise the crate logs at info (debug with -v)
// and everything else at warn.
// =============================================================================

use tracing_subscriber::{fmt, EnvFilter};

pub fn init(verbose: bool) {
    let default = if verbose {
        "warn,image_spider=debug,spider=debug"
    } else {
        "warn,image_spider=info,spider=info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Already-installed subscriber is fine
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
