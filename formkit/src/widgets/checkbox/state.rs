//! State and operations for the Checkbox widget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::aria::AriaAttributes;
use crate::context::Scope;
use crate::events::{EventDetail, WidgetEvent, WidgetEventKind};
use crate::ids::WidgetId;

/// Internal state for a Checkbox widget
#[derive(Debug)]
struct CheckboxInner {
    /// Whether the checkbox is checked
    checked: bool,
    /// Mixed state; cleared by the next activation
    indeterminate: bool,
    /// Form field name
    name: String,
    /// Submitted value when checked
    value: String,
    /// Label text
    label: String,
    /// Whether the checkbox is disabled
    disabled: bool,
}

impl Default for CheckboxInner {
    fn default() -> Self {
        Self {
            checked: false,
            indeterminate: false,
            name: String::new(),
            value: "on".to_string(),
            label: String::new(),
            disabled: false,
        }
    }
}

/// A checkbox with delegated activation.
///
/// A click anywhere in the hit area toggles the box, as does Space while
/// focused. Disabled checkboxes ignore both.
///
/// # Example
///
/// ```ignore
/// let agree = Checkbox::new(&cx).with_name("agree").with_label("I agree");
/// agree.on_click(ClickTarget::HitArea, &cx);
/// assert!(agree.is_checked());
/// ```
#[derive(Debug, Clone)]
pub struct Checkbox {
    /// Unique identifier for this checkbox instance
    id: WidgetId,
    /// Internal state
    inner: Arc<RwLock<CheckboxInner>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl Checkbox {
    /// Create an unchecked checkbox with a generated id.
    pub fn new(cx: &Scope) -> Self {
        Self::with_id(cx.next_id("checkbox"))
    }

    /// Create an unchecked checkbox with an explicit id.
    pub fn with_id(id: impl Into<WidgetId>) -> Self {
        Self {
            id: id.into(),
            inner: Arc::new(RwLock::new(CheckboxInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the field name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.name = name.into();
        }
        self
    }

    /// Set the submitted value.
    pub fn with_value(self, value: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.value = value.into();
        }
        self
    }

    /// Set the label.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.label = label.into();
        }
        self
    }

    /// Start checked.
    pub fn checked(self) -> Self {
        self.set_checked(true);
        self
    }

    /// Mark the checkbox disabled.
    pub fn disabled(self) -> Self {
        self.set_disabled(true);
        self
    }

    /// Get the unique ID.
    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Check if the checkbox is checked.
    pub fn is_checked(&self) -> bool {
        self.inner.read().map(|g| g.checked).unwrap_or(false)
    }

    /// Check if the checkbox is in the mixed state.
    pub fn is_indeterminate(&self) -> bool {
        self.inner.read().map(|g| g.indeterminate).unwrap_or(false)
    }

    /// Check if the checkbox is disabled.
    pub fn is_disabled(&self) -> bool {
        self.inner.read().map(|g| g.disabled).unwrap_or(false)
    }

    /// Get the field name.
    pub fn name(&self) -> String {
        self.inner
            .read()
            .map(|g| g.name.clone())
            .unwrap_or_default()
    }

    /// Get the submitted value.
    pub fn value(&self) -> String {
        self.inner
            .read()
            .map(|g| g.value.clone())
            .unwrap_or_default()
    }

    /// Get the label.
    pub fn label(&self) -> String {
        self.inner
            .read()
            .map(|g| g.label.clone())
            .unwrap_or_default()
    }

    /// Set the checked state programmatically (no events).
    pub fn set_checked(&self, checked: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.checked = checked;
            guard.indeterminate = false;
            self.mark_dirty();
        }
    }

    /// Set the mixed state programmatically.
    pub fn set_indeterminate(&self, indeterminate: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.indeterminate = indeterminate;
            self.mark_dirty();
        }
    }

    /// Enable or disable the checkbox.
    pub fn set_disabled(&self, disabled: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.disabled = disabled;
            self.mark_dirty();
        }
    }

    /// Toggle as the user would. Returns the new checked state, or `None`
    /// if the checkbox is disabled.
    pub fn toggle(&self, cx: &Scope) -> Option<bool> {
        let checked = {
            let mut guard = self.inner.write().ok()?;
            if guard.disabled {
                return None;
            }
            guard.checked = !guard.checked;
            guard.indeterminate = false;
            guard.checked
        };
        self.mark_dirty();
        log::debug!("[checkbox] {} checked={}", self.id, checked);

        for kind in [WidgetEventKind::Change, WidgetEventKind::Input] {
            cx.push_event(
                WidgetEvent::new(kind, self.id.clone()).with_detail(EventDetail::Checked(checked)),
            );
        }
        Some(checked)
    }

    /// Reset to unchecked without events.
    pub fn reset(&self) {
        self.set_checked(false);
    }

    /// ARIA attributes for the current state.
    pub fn aria(&self) -> AriaAttributes {
        let mut aria = AriaAttributes::with_role("checkbox");
        if self.is_indeterminate() {
            aria.set("aria-checked", "mixed");
        } else {
            aria.set_bool("aria-checked", self.is_checked());
        }
        if self.is_disabled() {
            aria.set_bool("aria-disabled", true);
        }
        if !self.label().is_empty() {
            aria.set("aria-labelledby", self.id.label());
        }
        aria
    }

    /// Check if the checkbox state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
