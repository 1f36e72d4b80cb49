//! Scope configuration.

use std::time::Duration;

/// Fallback message shown when a validator fails without producing one.
pub const DEFAULT_VALIDATOR_ERROR: &str = "Invalid value";

/// Default delay between an autocomplete losing focus and its dropdown closing.
pub const DEFAULT_BLUR_GRACE: Duration = Duration::from_millis(150);

/// Default time a toast stays open before hiding itself.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);

/// Per-scope configuration shared by every widget created in the scope.
#[derive(Debug, Clone)]
pub struct ScopeConfig {
    /// Grace delay before a blurred autocomplete closes its dropdown.
    pub blur_grace: Duration,

    /// Auto-hide delay for toasts that do not set their own.
    pub toast_duration: Duration,

    /// Message used when a validator fails and no error is shown yet.
    pub validator_error: String,

    /// Minimum search length before an autocomplete opens, unless overridden.
    pub min_search_chars: usize,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            blur_grace: DEFAULT_BLUR_GRACE,
            toast_duration: DEFAULT_TOAST_DURATION,
            validator_error: DEFAULT_VALIDATOR_ERROR.to_string(),
            min_search_chars: 0,
        }
    }
}

impl ScopeConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the autocomplete blur grace delay.
    pub fn blur_grace(mut self, delay: Duration) -> Self {
        self.blur_grace = delay;
        self
    }

    /// Set the default toast auto-hide delay.
    pub fn toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    /// Set the generic validator failure message.
    pub fn validator_error(mut self, message: impl Into<String>) -> Self {
        self.validator_error = message.into();
        self
    }

    /// Set the default autocomplete minimum search length.
    pub fn min_search_chars(mut self, chars: usize) -> Self {
        self.min_search_chars = chars;
        self
    }
}
