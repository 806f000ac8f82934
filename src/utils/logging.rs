// utils/logging.rs

use log::LevelFilter;

/// Map a `--log-level` value to a filter, defaulting to `Info`.
pub fn parse_level(log_level: &str) -> LevelFilter {
    match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info, // Default to Info if unrecognized
    }
}

/// Sets the logger level based on the provided argument.
/// Log records go to stderr so Terraform's forwarded output stays on stdout.
pub fn initialize_logger(log_level: &str) {
    env_logger::Builder::new()
        .filter(None, parse_level(log_level))
        .format_target(false)
        .target(env_logger::Target::Stderr)
        .init();
}
