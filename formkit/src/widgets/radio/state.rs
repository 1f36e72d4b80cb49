//! Radio widget state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::aria::AriaAttributes;
use crate::context::Scope;
use crate::events::{EventDetail, WidgetEvent, WidgetEventKind};
use crate::ids::WidgetId;

use super::registry::RadioHandle;

/// Internal state for a Radio widget
#[derive(Debug, Default)]
pub(super) struct RadioInner {
    /// Whether this radio is the checked member of its group
    pub checked: bool,
    /// Current group name
    pub name: String,
    /// Submitted value when checked
    pub value: String,
    /// Label text
    pub label: String,
    /// Whether the radio is disabled
    pub disabled: bool,
}

/// One option of an exclusive group.
///
/// Radios sharing a `name` within a [`Scope`] form a group. Checking one
/// unchecks the others first, so no two members are ever observed checked
/// together.
///
/// Renaming a radio changes no checked state by itself. From then on it
/// belongs to the new group: the next check in that group unchecks it, and
/// checks in the old group no longer touch it.
///
/// # Example
///
/// ```ignore
/// let a = Radio::new(&cx, "g", "a");
/// let b = Radio::new(&cx, "g", "b");
/// a.check(&cx);
/// b.check(&cx);
/// assert!(!a.is_checked());
/// assert!(b.is_checked());
/// ```
#[derive(Debug, Clone)]
pub struct Radio {
    /// Unique identifier for this radio instance
    id: WidgetId,
    /// Internal state
    pub(super) inner: Arc<RwLock<RadioInner>>,
    /// Dirty flag for re-render
    pub(super) dirty: Arc<AtomicBool>,
}

impl Radio {
    /// Create an unchecked radio in group `name` with a generated id.
    pub fn new(cx: &Scope, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_id(cx, cx.next_id("radio"), name, value)
    }

    /// Create an unchecked radio with an explicit id.
    pub fn with_id(
        cx: &Scope,
        id: impl Into<WidgetId>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let radio = Self {
            id: id.into(),
            inner: Arc::new(RwLock::new(RadioInner {
                name: name.clone(),
                value: value.into(),
                ..Default::default()
            })),
            dirty: Arc::new(AtomicBool::new(false)),
        };
        cx.radios().register(&name, radio.handle());
        radio
    }

    /// Set the label.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.label = label.into();
        }
        self
    }

    /// Mark the radio disabled.
    pub fn disabled(self) -> Self {
        self.set_disabled(true);
        self
    }

    pub(super) fn handle(&self) -> RadioHandle {
        RadioHandle {
            id: self.id.clone(),
            inner: Arc::downgrade(&self.inner),
            dirty: Arc::downgrade(&self.dirty),
        }
    }

    /// Rebuild a widget handle from a registry entry.
    pub(super) fn from_handle(handle: &RadioHandle) -> Option<Self> {
        Some(Self {
            id: handle.id.clone(),
            inner: handle.inner.upgrade()?,
            dirty: handle.dirty.upgrade()?,
        })
    }

    /// Get the unique ID.
    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Check if the radio is checked.
    pub fn is_checked(&self) -> bool {
        self.inner.read().map(|g| g.checked).unwrap_or(false)
    }

    /// Check if the radio is disabled.
    pub fn is_disabled(&self) -> bool {
        self.inner.read().map(|g| g.disabled).unwrap_or(false)
    }

    /// Current group name.
    pub fn name(&self) -> String {
        self.inner
            .read()
            .map(|g| g.name.clone())
            .unwrap_or_default()
    }

    /// Submitted value.
    pub fn value(&self) -> String {
        self.inner
            .read()
            .map(|g| g.value.clone())
            .unwrap_or_default()
    }

    /// Label text.
    pub fn label(&self) -> String {
        self.inner
            .read()
            .map(|g| g.label.clone())
            .unwrap_or_default()
    }

    /// Change the group name. Checked states are only reconciled on the
    /// next check.
    pub fn set_name(&self, name: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.name = name.into();
            self.mark_dirty();
        }
    }

    /// Enable or disable the radio.
    pub fn set_disabled(&self, disabled: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.disabled = disabled;
            self.mark_dirty();
        }
    }

    /// Check this radio as the user would.
    ///
    /// Siblings in the current group are unchecked before this radio's own
    /// flag is set. Emits `change` and `input` when the state changed.
    /// Returns false for disabled or already checked radios.
    pub fn check(&self, cx: &Scope) -> bool {
        if self.is_disabled() || self.is_checked() {
            return false;
        }
        self.set_checked_in_group(cx);
        log::debug!("[radio] {} checked", self.id);
        for kind in [WidgetEventKind::Change, WidgetEventKind::Input] {
            cx.push_event(
                WidgetEvent::new(kind, self.id.clone()).with_detail(EventDetail::Checked(true)),
            );
        }
        true
    }

    /// Set the checked state programmatically (no events).
    ///
    /// Checking still enforces group exclusivity.
    pub fn set_checked(&self, checked: bool, cx: &Scope) {
        if checked {
            self.set_checked_in_group(cx);
        } else if let Ok(mut guard) = self.inner.write() {
            guard.checked = false;
            self.mark_dirty();
        }
    }

    fn set_checked_in_group(&self, cx: &Scope) {
        let name = self.name();
        for sibling in cx.radios().siblings(&name, &self.inner) {
            if sibling.uncheck() {
                log::trace!("[radio] {} unchecked by {}", sibling.id, self.id);
            }
        }

        if let Ok(mut guard) = self.inner.write() {
            guard.checked = true;
            self.mark_dirty();
        }
    }

    /// Reset to unchecked without events.
    pub fn reset(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.checked = false;
            self.mark_dirty();
        }
    }

    /// Members of this radio's group, in registration order.
    pub fn group(&self, cx: &Scope) -> Vec<Radio> {
        let name = self.name();
        cx.radios()
            .members(&name)
            .iter()
            .filter_map(Radio::from_handle)
            .collect()
    }

    /// ARIA attributes for the current state. Only the checked radio (or the
    /// first one when none is checked) is in the tab order.
    pub fn aria(&self, cx: &Scope) -> AriaAttributes {
        let mut aria = AriaAttributes::with_role("radio");
        aria.set_bool("aria-checked", self.is_checked());
        if self.is_disabled() {
            aria.set_bool("aria-disabled", true);
        }
        if !self.label().is_empty() {
            aria.set("aria-labelledby", self.id.label());
        }

        let group = self.group(cx);
        let tab_stop = group
            .iter()
            .find(|r| r.is_checked())
            .or_else(|| group.iter().find(|r| !r.is_disabled()))
            .map(|r| r.id == self.id)
            .unwrap_or(true);
        aria.set("tabindex", if tab_stop { "0" } else { "-1" });
        aria
    }

    /// Check if the radio state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
