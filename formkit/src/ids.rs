//! Deterministic widget ids.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Identifier of a widget instance within a scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(String);

impl WidgetId {
    /// Wrap an explicit id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the listbox element owned by this widget.
    pub fn listbox(&self) -> String {
        format!("{}__listbox", self.0)
    }

    /// Id of the n-th option element owned by this widget.
    pub fn option(&self, index: usize) -> String {
        format!("{}__option_{}", self.0, index)
    }

    /// Id of the error message element owned by this widget.
    pub fn error(&self) -> String {
        format!("{}__error", self.0)
    }

    /// Id of the label element owned by this widget.
    pub fn label(&self) -> String {
        format!("{}__label", self.0)
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WidgetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Sequence-counter id generator, one counter per prefix.
///
/// Ids are `__{prefix}_{n}` with `n` starting at zero, so two scopes fed the
/// same construction order produce the same ids.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    counters: Arc<Mutex<HashMap<&'static str, usize>>>,
}

impl IdGenerator {
    /// Create a generator with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next id for a prefix.
    pub fn next(&self, prefix: &'static str) -> WidgetId {
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = counters.entry(prefix).or_insert(0);
        let n = *slot;
        *slot += 1;
        WidgetId(format!("__{}_{}", prefix, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_per_prefix() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next("input").as_str(), "__input_0");
        assert_eq!(ids.next("input").as_str(), "__input_1");
        assert_eq!(ids.next("tree").as_str(), "__tree_0");

        let other = IdGenerator::new();
        assert_eq!(other.next("input").as_str(), "__input_0");
    }
}
