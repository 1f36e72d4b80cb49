//! State and operations for the Button widget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::Deserialize;

use crate::aria::AriaAttributes;
use crate::context::Scope;
use crate::events::{WidgetEvent, WidgetEventKind};
use crate::ids::WidgetId;

/// What a button does when activated inside a form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    /// Plain button: only emits `click`
    #[default]
    Button,
    /// Submits the enclosing form
    Submit,
    /// Clears the enclosing form
    Reset,
    /// Requests deletion of the enclosing form's record
    Delete,
}

/// Internal state for a Button widget
#[derive(Debug, Default)]
struct ButtonInner {
    /// Button label text
    label: String,
    /// Form behavior
    kind: ButtonKind,
    /// Whether the button is disabled
    disabled: bool,
}

/// A button widget.
///
/// Activation by pointer, Enter or Space emits `click`. A [`Form`] turns
/// submit, reset and delete buttons into its own notifications via
/// [`Form::activate`].
///
/// [`Form`]: crate::form::Form
/// [`Form::activate`]: crate::form::Form::activate
#[derive(Debug, Clone)]
pub struct Button {
    /// Unique identifier for this button instance
    id: WidgetId,
    /// Internal state
    inner: Arc<RwLock<ButtonInner>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl Button {
    /// Create a plain button with a generated id.
    pub fn new(cx: &Scope, label: impl Into<String>) -> Self {
        Self::with_id(cx.next_id("button"), label)
    }

    /// Create a plain button with an explicit id.
    pub fn with_id(id: impl Into<WidgetId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            inner: Arc::new(RwLock::new(ButtonInner {
                label: label.into(),
                ..Default::default()
            })),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the button kind.
    pub fn with_kind(self, kind: ButtonKind) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.kind = kind;
        }
        self
    }

    /// Mark the button disabled.
    pub fn disabled(self) -> Self {
        self.set_disabled(true);
        self
    }

    /// Get the unique ID.
    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    /// Get the label text.
    pub fn label(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.label.clone())
            .unwrap_or_default()
    }

    /// Get the button kind.
    pub fn kind(&self) -> ButtonKind {
        self.inner.read().map(|g| g.kind).unwrap_or_default()
    }

    /// Check if the button is disabled.
    pub fn is_disabled(&self) -> bool {
        self.inner.read().map(|g| g.disabled).unwrap_or(false)
    }

    /// Set the label text.
    pub fn set_label(&self, label: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.label = label.into();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Enable or disable the button.
    pub fn set_disabled(&self, disabled: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.disabled = disabled;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Activate as the user would. Returns false when disabled.
    pub fn click(&self, cx: &Scope) -> bool {
        if self.is_disabled() {
            return false;
        }
        cx.push_event(WidgetEvent::new(WidgetEventKind::Click, self.id.clone()));
        true
    }

    /// ARIA attributes for the current state.
    pub fn aria(&self) -> AriaAttributes {
        let mut aria = AriaAttributes::with_role("button");
        if self.is_disabled() {
            aria.set_bool("aria-disabled", true);
        }
        aria
    }

    /// Check if the button state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
