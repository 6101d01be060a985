// RUNTIME PREFERENCES (User Experience)

use crate::config::compile_time::lexical::MAX_TOKEN_COUNT;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessorPreferences {
    /// Whether to require the .pigy extension on grammar files
    pub require_pigy_extension: bool,

    /// Whether to log file metadata once the grammar file is opened
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_pigy_extension: env_flag(env_vars::REQUIRE_PIGY_EXTENSION, false),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether to collect per-category token metrics
    pub collect_detailed_metrics: bool,

    /// Whether every emitted token is echoed as a debug event
    pub log_token_events: bool,

    /// Whether to show position information in error messages
    pub include_position_in_errors: bool,

    /// Tokens allowed per run, never above the compile-time ceiling
    pub max_token_count: usize,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
            log_token_events: env_flag(env_vars::LEXICAL_LOG_TOKENS, true),
            include_position_in_errors: env_flag(env_vars::LEXICAL_INCLUDE_POSITIONS, true),
            max_token_count: env_usize(env_vars::LEXICAL_MAX_TOKENS, MAX_TOKEN_COUNT)
                .min(MAX_TOKEN_COUNT),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Runtime configuration with the debug switch applied: everything down
    /// to state banners and individual tokens is logged.
    pub fn debug() -> Self {
        let mut config = Self::default();
        config.logging.min_log_level = LogLevel::Debug;
        config.lexical.log_token_events = true;
        config
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_PIGY_EXTENSION: &str = "PIGY_REQUIRE_PIGY_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "PIGY_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "PIGY_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_LOG_TOKENS: &str = "PIGY_LEXICAL_LOG_TOKENS";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "PIGY_LEXICAL_INCLUDE_POSITIONS";
    pub const LEXICAL_MAX_TOKENS: &str = "PIGY_LEXICAL_MAX_TOKENS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "PIGY_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "PIGY_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "PIGY_LOGGING_MIN_LEVEL";
}
