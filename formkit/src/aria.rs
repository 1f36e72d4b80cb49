//! ARIA attribute snapshots.
//!
//! Widgets compute these from their current state every time they are
//! asked, so a renderer that repaints dirty widgets always sees attributes
//! that agree with the state machine.

use std::collections::BTreeMap;

/// An ordered set of ARIA (and `role`) attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AriaAttributes {
    attrs: BTreeMap<&'static str, String>,
}

impl AriaAttributes {
    /// Start with a role.
    pub fn with_role(role: &str) -> Self {
        let mut attrs = Self::default();
        attrs.set("role", role);
        attrs
    }

    /// Set an attribute.
    pub fn set(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.attrs.insert(name, value.into());
        self
    }

    /// Set a boolean attribute as `"true"`/`"false"`.
    pub fn set_bool(&mut self, name: &'static str, value: bool) -> &mut Self {
        self.set(name, if value { "true" } else { "false" })
    }

    /// Set an attribute only when a value is present.
    pub fn set_opt(&mut self, name: &'static str, value: Option<impl Into<String>>) -> &mut Self {
        if let Some(value) = value {
            self.set(name, value);
        }
        self
    }

    /// Get an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Whether an attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Iterate attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.attrs.iter().map(|(k, v)| (*k, v.as_str()))
    }
}
