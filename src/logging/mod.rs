//! Logger capability and diagnostic helpers.
//!
//! The client takes an optional [`Logger`] and works without one. The trait
//! follows the PSR-3 shape: eight severity levels, each accepting a message
//! template plus a context map interpolated with `{key}` placeholders.
//! [`TracingLogger`] forwards everything to the `tracing` facade.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Log severity, ordered most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Emergency => "emergency",
            Level::Alert => "alert",
            Level::Critical => "critical",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Notice => "notice",
            Level::Info => "info",
            Level::Debug => "debug",
        };
        f.write_str(name)
    }
}

/// Context entries interpolated into message templates.
pub type Context<'a> = [(&'a str, String)];

/// Leveled logging capability with `{key}` placeholder interpolation.
///
/// Every level method has a default implementation delegating to
/// [`Logger::log`], so implementors only need the one method.
pub trait Logger {
    /// Log with an arbitrary level.
    fn log(&self, level: Level, message: &str, context: &Context<'_>);

    /// System is unusable.
    fn emergency(&self, message: &str, context: &Context<'_>) {
        self.log(Level::Emergency, message, context);
    }

    /// Action must be taken immediately.
    fn alert(&self, message: &str, context: &Context<'_>) {
        self.log(Level::Alert, message, context);
    }

    /// Critical conditions, e.g. an application component unavailable.
    fn critical(&self, message: &str, context: &Context<'_>) {
        self.log(Level::Critical, message, context);
    }

    /// Runtime errors that do not require immediate action but should be
    /// logged and monitored.
    fn error(&self, message: &str, context: &Context<'_>) {
        self.log(Level::Error, message, context);
    }

    /// Exceptional occurrences that are not errors.
    fn warning(&self, message: &str, context: &Context<'_>) {
        self.log(Level::Warning, message, context);
    }

    /// Normal but significant events.
    fn notice(&self, message: &str, context: &Context<'_>) {
        self.log(Level::Notice, message, context);
    }

    /// Interesting events.
    fn info(&self, message: &str, context: &Context<'_>) {
        self.log(Level::Info, message, context);
    }

    /// Detailed debug information.
    fn debug(&self, message: &str, context: &Context<'_>) {
        self.log(Level::Debug, message, context);
    }
}

/// Replace `{key}` placeholders in `message` with their context values.
///
/// Keys absent from the context are left untouched.
#[must_use]
pub fn interpolate(message: &str, context: &Context<'_>) -> String {
    let mut out = message.to_string();
    for (key, value) in context {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

static MASK_PASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(pass[a-z_0-9]*)=[^&]*").expect("static pattern")
});
static MASK_PW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(pw[a-z_0-9]*)=[^&]*").expect("static pattern"));

/// Mask password-like query parameters (`pass*`, `pw*`) in a URL or a
/// JSON-rendered option payload before it reaches a log sink.
#[must_use]
pub fn mask_secrets(text: &str) -> String {
    let masked = MASK_PASS.replace_all(text, "${1}=*private*");
    MASK_PW.replace_all(&masked, "${1}=*private*").into_owned()
}

/// [`Logger`] implementation forwarding to the `tracing` macros.
///
/// Severities above `error` have no `tracing` equivalent and collapse onto
/// `error`; `notice` collapses onto `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str, context: &Context<'_>) {
        let rendered = interpolate(message, context);
        match level {
            Level::Emergency | Level::Alert | Level::Critical | Level::Error => {
                tracing::error!(target: "plainhttp", "{rendered}");
            }
            Level::Warning => tracing::warn!(target: "plainhttp", "{rendered}"),
            Level::Notice | Level::Info => tracing::info!(target: "plainhttp", "{rendered}"),
            Level::Debug => tracing::debug!(target: "plainhttp", "{rendered}"),
        }
    }
}
