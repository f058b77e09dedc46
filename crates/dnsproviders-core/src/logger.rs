//! Logging collaborator handed to providers
//!
//! Providers report informational reconciliation events ("existing record
//! matches", "updating", ...) through a [`Logger`]. The call context is the
//! caller's current `tracing` span. Log calls never influence control flow.

use std::fmt;
use std::sync::Arc;

/// A key/value pair attached to a log call
pub type Field<'a> = (&'a str, &'a dyn fmt::Debug);

/// Leveled, contextual logger accepted by provider constructors
pub trait Logger: Send + Sync {
    /// Log an informational message with ordered key/value pairs
    fn info(&self, message: &str, fields: &[Field<'_>]);
}

/// Shared logger handle
pub type SharedLogger = Arc<dyn Logger>;

/// Default logger that forwards to `tracing` at INFO level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str, fields: &[Field<'_>]) {
        if fields.is_empty() {
            tracing::info!("{}", message);
        } else {
            tracing::info!(fields = %format_fields(fields), "{}", message);
        }
    }
}

/// Logger used when the caller does not supply one
pub fn default_logger() -> SharedLogger {
    Arc::new(TracingLogger)
}

/// Render fields as `key=value` pairs in call order
pub fn format_fields(fields: &[Field<'_>]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={:?}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}
