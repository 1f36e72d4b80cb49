//! Field values and selectable options.

use serde::{Deserialize, Serialize};

/// The value held by a form field.
///
/// A field's `multiple` flag decides which shape it uses for its whole
/// lifetime; single-value fields always hold `Single`, multi-value fields
/// always hold `Multiple`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single scalar value.
    Single(String),
    /// An ordered list of scalar values.
    Multiple(Vec<String>),
}

impl FieldValue {
    /// The empty value for the given shape.
    pub fn empty(multiple: bool) -> Self {
        if multiple {
            Self::Multiple(Vec::new())
        } else {
            Self::Single(String::new())
        }
    }

    /// Whether the value is empty (`""` or `[]`).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(s) => s.is_empty(),
            Self::Multiple(v) => v.is_empty(),
        }
    }

    /// Whether this is the multi-value shape.
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    /// The scalar value, or `None` for the multi-value shape.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s),
            Self::Multiple(_) => None,
        }
    }

    /// The value list, or `None` for the single-value shape.
    pub fn as_multiple(&self) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::Multiple(v) => Some(v),
        }
    }

    /// Whether `value` is (one of) the current value(s).
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Single(s) => s == value,
            Self::Multiple(v) => v.iter().any(|x| x == value),
        }
    }

    /// Coerce into the requested shape.
    ///
    /// A scalar becomes a one-element list (or the empty list when empty);
    /// a list collapses to its first element.
    pub(crate) fn into_shape(self, multiple: bool) -> Self {
        match (self, multiple) {
            (Self::Single(s), true) if s.is_empty() => Self::Multiple(Vec::new()),
            (Self::Single(s), true) => Self::Multiple(vec![s]),
            (Self::Multiple(v), false) => {
                Self::Single(v.into_iter().next().unwrap_or_default())
            }
            (value, _) => value,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multiple(values.into_iter().map(String::from).collect())
    }
}

/// A selectable option for select and autocomplete widgets.
///
/// Options are owned by the consumer; widgets keep a read-only copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Text shown to the user
    pub label: String,
    /// Value submitted when chosen
    pub value: String,
    /// Disabled options are shown but never selectable
    #[serde(default)]
    pub disabled: bool,
}

impl SelectOption {
    /// Create an enabled option.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }

    /// Mark the option disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_shape() {
        assert_eq!(
            FieldValue::from("a").into_shape(true),
            FieldValue::Multiple(vec!["a".into()])
        );
        assert_eq!(
            FieldValue::from("").into_shape(true),
            FieldValue::Multiple(vec![])
        );
        assert_eq!(
            FieldValue::from(vec!["x", "y"]).into_shape(false),
            FieldValue::from("x")
        );
    }
}
