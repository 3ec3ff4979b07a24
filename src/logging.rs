//! Logging setup
//!
//! Diagnostics go to stderr through the `log` facade so warnings from any
//! component share one format, and the success diagnostic on stdout stays
//! machine-friendly. `RUST_LOG` overrides the default level.

use env_logger::{Builder, Env, Target};

/// Initialize the process-wide logger.
pub fn init() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "{}: {}", record.level(), record.args())
        })
        .target(Target::Stderr)
        .init();
}
