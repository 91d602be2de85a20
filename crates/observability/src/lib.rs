//! Process-wide logging setup shared by learnhub binaries.

/// Install the default subscriber: JSON lines on stderr, filtered by
/// `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init() {
    tracing::init("info");
}

/// Tracing subscriber configuration.
pub mod tracing;
