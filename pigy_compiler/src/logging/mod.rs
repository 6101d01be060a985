//! Global logging module for the PigYacc compiler
//!
//! Provides a process wide logger behind a `OnceLock`, a thread-local file
//! context that tags events with the grammar being processed, and the
//! support functions the `log_*!` macros expand to.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use crate::utils::Position;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(LoggingService::with_config());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether a debug event would reach any logger
pub fn debug_enabled() -> bool {
    try_get_global_logger().is_some_and(|logger| logger.should_log(LogLevel::Debug))
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

pub fn set_file_context(file_path: &Path) {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(file_path.to_path_buf());
    });
}

pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with file context
pub fn with_file_context<F, R>(file_path: &Path, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path);
    let result = f();
    clear_file_context();
    result
}

pub fn get_current_file_context() -> Option<PathBuf> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Tag with the current file and hand to the global logger
pub fn dispatch(event: LogEvent) {
    let event = match get_current_file_context() {
        Some(path) => event.with_context("file", &path.display().to_string()),
        None => event,
    };

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

fn with_pairs(mut event: LogEvent, position: Option<Position>, context: Vec<(&str, &str)>) -> LogEvent {
    if let Some(p) = position {
        event = event.with_position(p);
    }
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    event
}

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    position: Option<Position>,
    context: Vec<(&str, &str)>,
) {
    dispatch(with_pairs(LogEvent::error(code, message), position, context));
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_pairs(LogEvent::success(code, message), None, context));
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_pairs(LogEvent::info(message), None, context));
}

/// Log warning with context (used by log_warning! macro)
pub fn log_warning_with_context(
    code: Option<Code>,
    message: &str,
    position: Option<Position>,
    context: Vec<(&str, &str)>,
) {
    let event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };
    dispatch(with_pairs(event, position, context));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_scoping() {
        let path = Path::new("grammars/calc.pigy");

        let inside = with_file_context(path, get_current_file_context);
        assert_eq!(inside.as_deref(), Some(path));
        assert_eq!(get_current_file_context(), None);
    }

    #[test]
    fn test_with_pairs_attaches_position_and_context() {
        let event = with_pairs(
            LogEvent::info("x"),
            Some(Position::new(3, 1, 4)),
            vec![("a", "1"), ("b", "2")],
        );

        assert_eq!(event.position, Some(Position::new(3, 1, 4)));
        assert_eq!(event.context.len(), 2);
    }
}
