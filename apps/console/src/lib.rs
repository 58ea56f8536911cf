//! # mallpark-console
//!
//! Line-command front end for the parking engine. The binary in `main.rs`
//! only wires stdin/stdout to [`commands`].

pub mod commands;
pub mod error;

pub use commands::{execute, respond, Command};
pub use error::{ApiError, ErrorCode};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - Default: `info,mallpark=debug`
/// - Override: `RUST_LOG=mallpark_engine=trace`
///
/// Logs are written to stderr so stdout stays one JSON object per line.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mallpark=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
