//! Process-wide observability setup shared by the fleetwatch binaries.

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
