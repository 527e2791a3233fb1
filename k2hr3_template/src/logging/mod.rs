//! Global logging for the template engine
//!
//! Coded events flow through a process-wide `LoggingService`. Until
//! `init_global_logging` is called every macro is a no-op, so the library
//! stays silent for embedders that never opt in.

#[macro_use]
pub mod macros;
pub mod codes;
pub mod config;
pub mod events;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static TEMPLATE_CONTEXT: RefCell<Option<String>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with a caller-provided service (tests, embedders)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// TEMPLATE CONTEXT
// ============================================================================

/// Run `f` with every event on this thread tagged with the template name
pub fn with_template_context<F, R>(name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = TEMPLATE_CONTEXT.with(|ctx| ctx.replace(Some(name.to_string())));
    let result = f();
    TEMPLATE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = previous;
    });
    result
}

pub fn get_current_template_context() -> Option<String> {
    TEMPLATE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Attach thread context and hand the event to the global logger
pub fn emit(event: LogEvent) {
    if let Some(logger) = try_get_global_logger() {
        let event = match get_current_template_context() {
            Some(name) => event.with_template(&name),
            None => event,
        };
        logger.log_event(event);
    }
}

pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);

    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    emit(event);
}

pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    emit(event);
}

pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::info(message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    emit(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_context_is_scoped() {
        assert!(get_current_template_context().is_none());

        let inner = with_template_context("outer.tmpl", || {
            assert_eq!(
                get_current_template_context().as_deref(),
                Some("outer.tmpl")
            );
            with_template_context("inner.tmpl", get_current_template_context)
        });

        assert_eq!(inner.as_deref(), Some("inner.tmpl"));
        assert!(get_current_template_context().is_none());
    }
}
