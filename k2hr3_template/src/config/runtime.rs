// RUNTIME PREFERENCES (environment driven, bounded by compile-time limits)

use crate::config::compile_time::execution::DEFAULT_MAX_LOOP_ITERATIONS;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateFilePreferences {
    /// Whether an empty template file is accepted (renders to empty output)
    pub allow_empty_file: bool,

    /// Whether to log size and line metrics for every loaded file
    pub log_file_metrics: bool,
}

impl Default for TemplateFilePreferences {
    fn default() -> Self {
        Self {
            allow_empty_file: env_or(env_vars::TEMPLATE_FILE_ALLOW_EMPTY, true),
            log_file_metrics: env_or(env_vars::TEMPLATE_FILE_LOG_METRICS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnginePreferences {
    /// Drop one line break directly after a leading `{{#!k2hr3template}}` tag
    pub strip_newline_after_engine_tag: bool,

    /// Whether to log segment/node statistics after a successful load
    pub log_statistics: bool,
}

impl Default for EnginePreferences {
    fn default() -> Self {
        Self {
            strip_newline_after_engine_tag: env_or(env_vars::ENGINE_STRIP_TAG_NEWLINE, true),
            log_statistics: env_or(env_vars::ENGINE_LOG_STATISTICS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPreferences {
    /// Upper bound on iterations of a single loop construct, 0 means unbounded
    pub max_loop_iterations: u64,
}

impl ExecutionPreferences {
    /// Preferences with no loop budget at all
    pub fn unbounded() -> Self {
        Self {
            max_loop_iterations: 0,
        }
    }

    pub fn loop_budget(&self) -> Option<u64> {
        if self.max_loop_iterations == 0 {
            None
        } else {
            Some(self.max_loop_iterations)
        }
    }
}

impl Default for ExecutionPreferences {
    fn default() -> Self {
        Self {
            max_loop_iterations: env_or(
                env_vars::EXECUTION_MAX_LOOP_ITERATIONS,
                DEFAULT_MAX_LOOP_ITERATIONS,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level written by the configured logger
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
        }
    }
}

/// Parse log level from string (used for environment variables and the CLI)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Template files
    pub const TEMPLATE_FILE_ALLOW_EMPTY: &str = "K2HR3_TEMPLATE_FILE_ALLOW_EMPTY";
    pub const TEMPLATE_FILE_LOG_METRICS: &str = "K2HR3_TEMPLATE_FILE_LOG_METRICS";

    // Engine
    pub const ENGINE_STRIP_TAG_NEWLINE: &str = "K2HR3_TEMPLATE_STRIP_TAG_NEWLINE";
    pub const ENGINE_LOG_STATISTICS: &str = "K2HR3_TEMPLATE_LOG_STATISTICS";

    // Execution
    pub const EXECUTION_MAX_LOOP_ITERATIONS: &str = "K2HR3_TEMPLATE_MAX_LOOP_ITERATIONS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "K2HR3_TEMPLATE_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "K2HR3_TEMPLATE_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "K2HR3_TEMPLATE_LOGGING_MIN_LEVEL";
}
