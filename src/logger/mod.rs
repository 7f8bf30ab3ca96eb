//! Structured console logging for swap orchestration
//!
//! Same API shape across the crate:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - One `LogTag` per subsystem (session, wallet, tokens, router, swap)
//! - Per-tag debug control via `--debug-<tag>` arguments or `set_logger_config`
//!
//! ## Usage
//!
//! ```rust
//! use swapall::logger::{self, LogTag};
//!
//! logger::info(LogTag::Swap, "Swap confirmed");
//! logger::warning(LogTag::Router, "Quote request took 4.2s");
//! logger::debug(LogTag::Wallet, "eth_call payload: ..."); // Only if --debug-wallet
//! ```
//!
//! Embedders call `logger::init()` once at startup; without it every tag logs at
//! Info and above.

mod config;
mod core;
mod format;
mod levels;
mod tags;

pub use config::{
    get_logger_config, init_from_args, set_logger_config, update_logger_config, LoggerConfig,
};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger from command-line arguments
///
/// Scans for `--debug-<tag>`, `--verbose` and `--quiet` flags.
pub fn init() {
    config::init_from_args();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (shown unless `--quiet`)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level, only when debug is enabled for `tag`
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level, only with `--verbose`
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Whether a debug line for `tag` would be printed
///
/// Lets callers skip building expensive debug strings.
pub fn is_debug_enabled(tag: LogTag) -> bool {
    core::should_log(&tag, LogLevel::Debug)
}
