//! Logging setup. Records go to the browser console through `console_log` on wasm32 and to
//! stderr through `env_logger` elsewhere.

use log::LevelFilter;

/// Install the platform logger at `level`. Returns `false` when a logger was already installed,
/// in which case only the maximum level changes.
pub fn init(level: LevelFilter) -> bool {
    let installed = install(level);
    log::set_max_level(level);
    installed
}

#[cfg(target_arch = "wasm32")]
fn install(level: LevelFilter) -> bool {
    match level.to_level() {
        Some(level) => console_log::init_with_level(level).is_ok(),
        None => false,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn install(level: LevelFilter) -> bool {
    env_logger::Builder::new()
        .filter_level(level)
        .try_init()
        .is_ok()
}

/// Level names as accepted from JS; anything unrecognised means `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" | "none" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}
