//! State and operations for the Input widget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::aria::AriaAttributes;
use crate::context::Scope;
use crate::events::{EventDetail, WidgetEvent, WidgetEventKind};
use crate::ids::WidgetId;
use crate::validation::{ErrorDisplay, Validator, Validity, ValidityState};
use crate::value::FieldValue;

use crate::widgets::field::FieldController;

/// Internal state for an Input widget
#[derive(Debug, Default)]
struct InputInner {
    /// Placeholder text
    placeholder: String,
    /// Cursor position (byte offset)
    cursor: usize,
    /// Value at the last `change` notification
    committed: String,
    /// Read-only inputs can be focused but not edited
    readonly: bool,
}

/// A text input widget with validation.
///
/// # Example
///
/// ```ignore
/// let cx = Scope::new();
/// let email = Input::new(&cx)
///     .with_name("email")
///     .with_validator(Validator::email("Please enter a valid email"));
///
/// email.input("a@b.c", &cx);
/// assert_eq!(email.is_valid(), Validity::Valid);
/// ```
#[derive(Debug, Clone)]
pub struct Input {
    /// Value and validity
    field: FieldController,
    /// Internal state
    inner: Arc<RwLock<InputInner>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl Input {
    /// Create an empty input with a generated id.
    pub fn new(cx: &Scope) -> Self {
        Self::with_id(cx.next_id("input"))
    }

    /// Create an empty input with an explicit id.
    pub fn with_id(id: impl Into<WidgetId>) -> Self {
        let dirty = Arc::new(AtomicBool::new(false));
        Self {
            field: FieldController::new(id.into(), false, Arc::clone(&dirty)),
            inner: Arc::new(RwLock::new(InputInner::default())),
            dirty,
        }
    }

    /// Set the field name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.field.set_name(name);
        self
    }

    /// Set the initial value.
    pub fn with_value(self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// Set the placeholder.
    pub fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
        self.set_placeholder(placeholder);
        self
    }

    /// Set the visible label.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.field.set_label(label);
        self
    }

    /// Attach a validator.
    pub fn with_validator(self, validator: Validator) -> Self {
        self.field.set_validator(Some(validator));
        self
    }

    /// Mark the input required.
    pub fn required(self) -> Self {
        self.field.set_required(true);
        self
    }

    /// Mark the input disabled.
    pub fn disabled(self) -> Self {
        self.field.set_disabled(true);
        self
    }

    /// Mark the input read-only.
    pub fn readonly(self) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.readonly = true;
        }
        self
    }

    /// Get the unique ID for this input.
    pub fn id(&self) -> &WidgetId {
        self.field.id()
    }

    /// The shared value/validity controller.
    pub fn field(&self) -> &FieldController {
        &self.field
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Get the current text.
    pub fn value(&self) -> String {
        match self.field.value() {
            FieldValue::Single(s) => s,
            FieldValue::Multiple(items) => items.join(","),
        }
    }

    /// Get the field name.
    pub fn name(&self) -> String {
        self.field.name()
    }

    /// Get the placeholder text.
    pub fn placeholder(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.placeholder.clone())
            .unwrap_or_default()
    }

    /// Get the cursor position (byte offset, always on a char boundary of
    /// the current text).
    pub fn cursor(&self) -> usize {
        let text = self.value();
        let cursor = self.inner.read().map(|guard| guard.cursor).unwrap_or(0);
        snap_to_boundary(&text, cursor)
    }

    /// Check if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.field.value().is_empty()
    }

    /// Rendered validity.
    pub fn is_valid(&self) -> Validity {
        self.field.is_valid()
    }

    /// Full validity state.
    pub fn validity(&self) -> ValidityState {
        self.field.validity()
    }

    /// Current error message.
    pub fn error(&self) -> String {
        self.field.error()
    }

    /// Whether edits are allowed.
    pub fn is_editable(&self) -> bool {
        !self.field.is_disabled() && !self.inner.read().map(|g| g.readonly).unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Set the text programmatically (no events, no validation).
    pub fn set_value(&self, value: impl Into<String>) {
        let value = value.into();
        if let Ok(mut guard) = self.inner.write() {
            guard.cursor = value.len();
            guard.committed = value.clone();
        }
        self.field.set_value(value);
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.placeholder = placeholder.into();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Assign validity from outside.
    pub fn set_valid(&self, valid: bool, cx: &Scope) {
        self.field.set_valid(valid, cx);
    }

    /// Set the error display mode.
    pub fn set_error_display(&self, display: ErrorDisplay) {
        self.field.set_error_display(display);
    }

    /// Replace the whole text as the user would (paste, IME, host input
    /// event). Emits `input` and runs validation.
    pub fn input(&self, text: impl Into<String>, cx: &Scope) {
        if !self.is_editable() {
            return;
        }
        let text = text.into();
        if let Ok(mut guard) = self.inner.write() {
            guard.cursor = text.len();
        }
        self.apply_input(text, cx);
    }

    /// Like [`Input::input`], but awaits an async validator inline.
    pub async fn input_async(&self, text: impl Into<String>, cx: &Scope) {
        if !self.is_editable() {
            return;
        }
        let text = text.into();
        if let Ok(mut guard) = self.inner.write() {
            guard.cursor = text.len();
        }
        self.field.input_async(text.clone(), cx).await;
        self.push_input(text, cx);
    }

    /// Emit `change` if the text differs from the last committed text.
    pub fn commit(&self, cx: &Scope) {
        let value = self.value();
        let changed = match self.inner.write() {
            Ok(mut guard) if guard.committed != value => {
                guard.committed = value.clone();
                true
            }
            _ => false,
        };
        if changed {
            cx.push_event(
                WidgetEvent::new(WidgetEventKind::Change, self.id().clone())
                    .with_detail(EventDetail::Value(FieldValue::Single(value))),
            );
        }
    }

    /// Reset to the empty baseline.
    pub fn reset(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.cursor = 0;
            guard.committed.clear();
        }
        self.field.reset();
    }

    fn apply_input(&self, text: String, cx: &Scope) {
        self.field.input(text.clone(), cx);
        self.push_input(text, cx);
    }

    fn push_input(&self, text: String, cx: &Scope) {
        cx.push_event(
            WidgetEvent::new(WidgetEventKind::Input, self.id().clone())
                .with_detail(EventDetail::Value(FieldValue::Single(text))),
        );
    }

    // -------------------------------------------------------------------------
    // Text manipulation (called on key events)
    // -------------------------------------------------------------------------

    /// Insert a character at the cursor position.
    pub fn insert_char(&self, c: char, cx: &Scope) {
        let mut text = self.value();
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        let cursor = snap_to_boundary(&text, guard.cursor);
        text.insert(cursor, c);
        guard.cursor = cursor + c.len_utf8();
        drop(guard);
        self.apply_input(text, cx);
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char_before(&self, cx: &Scope) {
        let mut text = self.value();
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        let cursor = snap_to_boundary(&text, guard.cursor);
        if cursor == 0 {
            return;
        }
        let prev = text[..cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        text.remove(prev);
        guard.cursor = prev;
        drop(guard);
        self.apply_input(text, cx);
    }

    /// Delete the character at the cursor (delete key).
    pub fn delete_char_at(&self, cx: &Scope) {
        let mut text = self.value();
        let cursor = snap_to_boundary(&text, self.cursor());
        if cursor < text.len() {
            text.remove(cursor);
            self.apply_input(text, cx);
        }
    }

    /// Move the cursor one character left.
    pub fn cursor_left(&self) {
        let text = self.value();
        if let Ok(mut guard) = self.inner.write()
            && guard.cursor > 0
        {
            let cursor = snap_to_boundary(&text, guard.cursor);
            guard.cursor = text[..cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Move the cursor one character right.
    pub fn cursor_right(&self) {
        let text = self.value();
        if let Ok(mut guard) = self.inner.write() {
            let cursor = snap_to_boundary(&text, guard.cursor);
            if cursor >= text.len() {
                guard.cursor = text.len();
                return;
            }
            guard.cursor = text[cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| cursor + i)
                .unwrap_or(text.len());
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Move the cursor to the start or end.
    pub fn cursor_to(&self, end: bool) {
        let len = self.value().len();
        if let Ok(mut guard) = self.inner.write() {
            guard.cursor = if end { len } else { 0 };
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Rendering contract
    // -------------------------------------------------------------------------

    /// ARIA attributes for the current state.
    pub fn aria(&self) -> AriaAttributes {
        let mut aria = AriaAttributes::with_role("textbox");
        self.field.apply_aria(&mut aria);
        if self.inner.read().map(|g| g.readonly).unwrap_or(false) {
            aria.set_bool("aria-readonly", true);
        }
        aria
    }

    /// Check if the input state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

/// Clamp a stored cursor to the text and move it back onto a char boundary.
/// The field value can be replaced behind the cursor's back (through
/// [`Input::field`]), so every use goes through here.
fn snap_to_boundary(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}
