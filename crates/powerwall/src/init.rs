//! Logging setup.

/// Installs `env_logger` as the `log` backend.
///
/// Safe to call more than once; later calls do nothing. Control verbosity
/// with `RUST_LOG`, e.g. `RUST_LOG=powerwall_core=debug`.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
