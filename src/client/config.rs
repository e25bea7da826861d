//! Client configuration.

/// Explicit configuration passed at construction instead of reading any
/// ambient process or request state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientConfig {
    /// When set, the client emits its debug-level traces (public URL and
    /// option dumps, DNS lookups, cache cleanups) to the attached logger.
    pub debug: bool,
}

impl ClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug-level tracing.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
