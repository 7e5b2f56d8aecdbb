//! Shared fixtures for the scenario tests.

pub mod test_components;

/// Installs a test logger once per test binary.
///
/// Verbosity follows `RUST_LOG`, defaulting to warnings.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}
