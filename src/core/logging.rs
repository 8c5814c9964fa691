//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable, e.g.
/// `RUST_LOG=voxedit::region=trace` to see every rejected seed.
///
/// # Example
/// ```
/// voxedit::core::logging::init();
/// log::info!("Editor started");
/// ```
pub fn init() {
    // try_init: tests and embedding hosts may already own the logger
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .format_timestamp_millis()
    .try_init();
}
