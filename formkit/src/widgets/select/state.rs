//! State and operations for the Select widget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::aria::AriaAttributes;
use crate::context::Scope;
use crate::events::{EventDetail, WidgetEvent, WidgetEventKind};
use crate::ids::WidgetId;
use crate::validation::{Validator, Validity};
use crate::value::{FieldValue, SelectOption};

use crate::widgets::field::FieldController;

/// Internal state for a Select widget.
#[derive(Debug, Default)]
struct SelectInner {
    /// Options shown in the dropdown
    options: Arc<[SelectOption]>,
    /// Placeholder text shown when nothing is selected
    placeholder: String,
    /// Whether the dropdown is open
    open: bool,
    /// Cursor position when open (for keyboard navigation)
    cursor: usize,
}

/// A dropdown select with single or multiple selection.
///
/// # Example
///
/// ```ignore
/// let priority = Select::new(&cx)
///     .with_name("priority")
///     .with_options(vec![
///         SelectOption::new("Low", "low"),
///         SelectOption::new("High", "high"),
///     ]);
///
/// priority.open(&cx);
/// priority.cursor_down();
/// priority.select_at_cursor(&cx);
/// assert_eq!(priority.value(), FieldValue::from("high"));
/// ```
#[derive(Debug, Clone)]
pub struct Select {
    /// Value and validity
    field: FieldController,
    /// Internal state
    inner: Arc<RwLock<SelectInner>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl Select {
    /// Create a single-value select with a generated id.
    pub fn new(cx: &Scope) -> Self {
        Self::with_id(cx.next_id("select"), false)
    }

    /// Create a multi-value select with a generated id.
    pub fn new_multiple(cx: &Scope) -> Self {
        Self::with_id(cx.next_id("select"), true)
    }

    /// Create a select with an explicit id.
    pub fn with_id(id: impl Into<WidgetId>, multiple: bool) -> Self {
        let dirty = Arc::new(AtomicBool::new(false));
        Self {
            field: FieldController::new(id.into(), multiple, Arc::clone(&dirty)),
            inner: Arc::new(RwLock::new(SelectInner::default())),
            dirty,
        }
    }

    /// Set the options.
    pub fn with_options(self, options: Vec<SelectOption>) -> Self {
        self.set_options(options);
        self
    }

    /// Set the field name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.field.set_name(name);
        self
    }

    /// Set the visible label.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.field.set_label(label);
        self
    }

    /// Set the placeholder.
    pub fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.placeholder = placeholder.into();
        }
        self
    }

    /// Set the initial value.
    pub fn with_value(self, value: impl Into<FieldValue>) -> Self {
        self.field.set_value(value);
        self
    }

    /// Attach a validator.
    pub fn with_validator(self, validator: Validator) -> Self {
        self.field.set_validator(Some(validator));
        self
    }

    /// Mark the select required.
    pub fn required(self) -> Self {
        self.field.set_required(true);
        self
    }

    /// Mark the select disabled.
    pub fn disabled(self) -> Self {
        self.field.set_disabled(true);
        self
    }

    /// Get the unique ID.
    pub fn id(&self) -> &WidgetId {
        self.field.id()
    }

    /// The shared value/validity controller.
    pub fn field(&self) -> &FieldController {
        &self.field
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Current value.
    pub fn value(&self) -> FieldValue {
        self.field.value()
    }

    /// Whether several options can be selected.
    pub fn is_multiple(&self) -> bool {
        self.field.is_multiple()
    }

    /// All options.
    pub fn options(&self) -> Arc<[SelectOption]> {
        self.inner
            .read()
            .map(|guard| Arc::clone(&guard.options))
            .unwrap_or_else(|_| Arc::from(Vec::new()))
    }

    /// Placeholder text.
    pub fn placeholder(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.placeholder.clone())
            .unwrap_or_default()
    }

    /// Labels of the selected options, in option order.
    pub fn selected_labels(&self) -> Vec<String> {
        let value = self.value();
        self.options()
            .iter()
            .filter(|o| value.contains(&o.value))
            .map(|o| o.label.clone())
            .collect()
    }

    /// Check if the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.inner.read().map(|g| g.open).unwrap_or(false)
    }

    /// Cursor position within the options.
    pub fn cursor(&self) -> usize {
        self.inner.read().map(|g| g.cursor).unwrap_or(0)
    }

    /// Rendered validity.
    pub fn is_valid(&self) -> Validity {
        self.field.is_valid()
    }

    /// Current error message.
    pub fn error(&self) -> String {
        self.field.error()
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Replace the options. The cursor is clamped to the new list.
    pub fn set_options(&self, options: Vec<SelectOption>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.cursor = guard.cursor.min(options.len().saturating_sub(1));
            guard.options = options.into();
            self.mark_dirty();
        }
    }

    /// Assign the value programmatically (no events).
    pub fn set_value(&self, value: impl Into<FieldValue>) {
        self.field.set_value(value);
    }

    /// Open the dropdown with the cursor on the first selected option.
    pub fn open(&self, cx: &Scope) {
        if self.field.is_disabled() {
            return;
        }
        let value = self.value();
        let opened = match self.inner.write() {
            Ok(mut guard) if !guard.open => {
                guard.open = true;
                guard.cursor = guard
                    .options
                    .iter()
                    .position(|o| value.contains(&o.value))
                    .unwrap_or(0);
                true
            }
            _ => false,
        };
        if opened {
            self.mark_dirty();
            cx.push_event(WidgetEvent::new(WidgetEventKind::Open, self.id().clone()));
        }
    }

    /// Close the dropdown.
    pub fn close(&self, cx: &Scope) {
        let closed = match self.inner.write() {
            Ok(mut guard) => std::mem::replace(&mut guard.open, false),
            Err(_) => false,
        };
        if closed {
            self.mark_dirty();
            cx.push_event(WidgetEvent::new(WidgetEventKind::Close, self.id().clone()));
        }
    }

    /// Move the cursor up (stops at the first option).
    pub fn cursor_up(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.cursor > 0
        {
            guard.cursor -= 1;
            self.mark_dirty();
        }
    }

    /// Move the cursor down (stops at the last option).
    pub fn cursor_down(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.cursor + 1 < guard.options.len()
        {
            guard.cursor += 1;
            self.mark_dirty();
        }
    }

    /// Jump the cursor to the first (or last) option.
    pub fn cursor_to(&self, end: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.cursor = if end { guard.options.len().saturating_sub(1) } else { 0 };
        }
        self.mark_dirty();
    }

    /// Commit the option under the cursor.
    pub fn select_at_cursor(&self, cx: &Scope) -> bool {
        self.select_index(self.cursor(), cx)
    }

    /// Commit the option at `index`.
    ///
    /// Single mode replaces the value and closes; multi mode toggles the
    /// option and stays open. Disabled options are ignored.
    pub fn select_index(&self, index: usize, cx: &Scope) -> bool {
        if self.field.is_disabled() {
            return false;
        }
        let Some(option) = self.options().get(index).cloned() else {
            return false;
        };
        if option.disabled {
            log::debug!("[select] {} ignores disabled option {}", self.id(), option.value);
            return false;
        }

        let value = if self.is_multiple() {
            let mut values = self
                .value()
                .as_multiple()
                .map(<[String]>::to_vec)
                .unwrap_or_default();
            match values.iter().position(|v| *v == option.value) {
                Some(pos) => {
                    values.remove(pos);
                }
                None => values.push(option.value.clone()),
            }
            FieldValue::Multiple(values)
        } else {
            self.close(cx);
            FieldValue::Single(option.value.clone())
        };

        self.field.input(value.clone(), cx);
        cx.push_event(
            WidgetEvent::new(WidgetEventKind::Change, self.id().clone())
                .with_detail(EventDetail::Value(value.clone())),
        );
        cx.push_event(
            WidgetEvent::new(WidgetEventKind::Input, self.id().clone())
                .with_detail(EventDetail::Value(value)),
        );
        true
    }

    /// Reset to the empty baseline without events.
    pub fn reset(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.open = false;
            guard.cursor = 0;
        }
        self.field.reset();
    }

    // -------------------------------------------------------------------------
    // Rendering contract
    // -------------------------------------------------------------------------

    /// ARIA attributes of the trigger.
    pub fn aria(&self) -> AriaAttributes {
        let mut aria = AriaAttributes::with_role("combobox");
        aria.set("aria-haspopup", "listbox")
            .set("aria-controls", self.id().listbox())
            .set_bool("aria-expanded", self.is_open());
        if self.is_open() {
            aria.set("aria-activedescendant", self.id().option(self.cursor()));
        }
        self.field.apply_aria(&mut aria);
        aria
    }

    /// ARIA attributes of the option at `index`.
    pub fn option_aria(&self, index: usize) -> Option<AriaAttributes> {
        let option = self.options().get(index).cloned()?;
        let mut aria = AriaAttributes::with_role("option");
        aria.set("id", self.id().option(index))
            .set_bool("aria-selected", self.value().contains(&option.value));
        if option.disabled {
            aria.set_bool("aria-disabled", true);
        }
        Some(aria)
    }

    /// Check if the select state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
