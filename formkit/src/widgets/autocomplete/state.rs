//! Autocomplete widget state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::aria::AriaAttributes;
use crate::context::Scope;
use crate::events::{EventDetail, WidgetEvent, WidgetEventKind};
use crate::ids::WidgetId;
use crate::validation::{Validator, Validity};
use crate::value::{FieldValue, SelectOption};
use crate::widgets::field::FieldController;

use super::filter::filter_options;

/// Visible state of the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    /// The listbox is hidden.
    Closed,
    /// The listbox is shown but nothing matches.
    OpenEmpty,
    /// The listbox is shown with candidates.
    OpenFilled,
}

/// Internal state for an Autocomplete widget.
#[derive(Debug, Default)]
pub(super) struct AutocompleteInner {
    /// All options (read-only copy of the consumer's list)
    pub options: Arc<[SelectOption]>,
    /// Current search text
    pub search: String,
    /// Candidate indices into `options`
    pub filtered: Vec<usize>,
    /// Whether the listbox is shown
    pub open: bool,
    /// Roving focus, as an index into `filtered`
    pub focused: Option<usize>,
    /// Search length needed before the listbox opens
    pub min_search_chars: usize,
    /// Placeholder text
    pub placeholder: String,
    /// Bumped on focus/blur; a pending blur close only fires if unchanged
    pub blur_generation: u64,
}

/// A text input with a substring-filtered listbox of options.
///
/// In single mode a commit stores the option's value, closes the listbox
/// and mirrors the option label into the search text. In multi mode a
/// commit toggles the value's membership and leaves the listbox and the
/// search text alone.
///
/// # Example
///
/// ```ignore
/// let city = Autocomplete::new(&cx)
///     .with_options(vec![
///         SelectOption::new("Berlin", "berlin"),
///         SelectOption::new("Hamburg", "hamburg"),
///     ])
///     .with_min_search_chars(1);
///
/// city.type_text("ber", &cx);
/// city.select_option(0, &cx);
/// assert_eq!(city.value(), FieldValue::from("berlin"));
/// assert_eq!(city.search(), "Berlin");
/// ```
#[derive(Debug, Clone)]
pub struct Autocomplete {
    /// Value and validity
    pub(super) field: FieldController,
    /// Internal state
    pub(super) inner: Arc<RwLock<AutocompleteInner>>,
    /// Dirty flag for re-render
    pub(super) dirty: Arc<AtomicBool>,
}

impl Autocomplete {
    /// Create a single-value autocomplete with a generated id.
    pub fn new(cx: &Scope) -> Self {
        Self::build(cx.next_id("autocomplete"), false, cx.config().min_search_chars)
    }

    /// Create a multi-value autocomplete with a generated id.
    pub fn new_multiple(cx: &Scope) -> Self {
        Self::build(cx.next_id("autocomplete"), true, cx.config().min_search_chars)
    }

    /// Create an autocomplete with an explicit id.
    pub fn with_id(id: impl Into<WidgetId>, multiple: bool) -> Self {
        Self::build(id.into(), multiple, 0)
    }

    fn build(id: WidgetId, multiple: bool, min_search_chars: usize) -> Self {
        let dirty = Arc::new(AtomicBool::new(false));
        Self {
            field: FieldController::new(id, multiple, Arc::clone(&dirty)),
            inner: Arc::new(RwLock::new(AutocompleteInner {
                min_search_chars,
                filtered: Vec::new(),
                ..Default::default()
            })),
            dirty,
        }
    }

    /// Set the options.
    pub fn with_options(self, options: Vec<SelectOption>) -> Self {
        self.set_options(options);
        self
    }

    /// Set the minimum search length that opens the listbox.
    pub fn with_min_search_chars(self, chars: usize) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.min_search_chars = chars;
            Self::refilter_locked(&mut guard);
        }
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

    /// Attach a validator.
    pub fn with_validator(self, validator: Validator) -> Self {
        self.field.set_validator(Some(validator));
        self
    }

    /// Mark the autocomplete required.
    pub fn required(self) -> Self {
        self.field.set_required(true);
        self
    }

    /// Mark the autocomplete disabled.
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

    pub(super) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Value
    // -------------------------------------------------------------------------

    /// Current value (`Single` or `Multiple` per the widget's mode).
    pub fn value(&self) -> FieldValue {
        self.field.value()
    }

    /// Whether this autocomplete holds a list of values.
    pub fn is_multiple(&self) -> bool {
        self.field.is_multiple()
    }

    /// Assign the value programmatically.
    ///
    /// In single mode the matching option's label is mirrored into the
    /// search text.
    pub fn set_value(&self, value: impl Into<FieldValue>) {
        self.field.set_value(value);
        if !self.is_multiple()
            && let FieldValue::Single(v) = self.field.value()
            && let Ok(mut guard) = self.inner.write()
        {
            guard.search = guard
                .options
                .iter()
                .find(|o| o.value == v)
                .map(|o| o.label.clone())
                .unwrap_or_default();
            Self::refilter_locked(&mut guard);
        }
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
    // Options and filtering
    // -------------------------------------------------------------------------

    /// Replace the option list.
    pub fn set_options(&self, options: Vec<SelectOption>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.options = options.into();
            Self::refilter_locked(&mut guard);
            guard.focused = guard.focused.filter(|&i| i < guard.filtered.len());
            self.mark_dirty();
        }
    }

    /// All options.
    pub fn options(&self) -> Arc<[SelectOption]> {
        self.inner
            .read()
            .map(|guard| Arc::clone(&guard.options))
            .unwrap_or_else(|_| Arc::from(Vec::new()))
    }

    /// Current candidates, in option order.
    pub fn filtered_options(&self) -> Vec<SelectOption> {
        self.inner
            .read()
            .map(|guard| {
                guard
                    .filtered
                    .iter()
                    .filter_map(|&i| guard.options.get(i).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of current candidates.
    pub fn filtered_count(&self) -> usize {
        self.inner.read().map(|g| g.filtered.len()).unwrap_or(0)
    }

    /// Current search text.
    pub fn search(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.search.clone())
            .unwrap_or_default()
    }

    /// Placeholder text.
    pub fn placeholder(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.placeholder.clone())
            .unwrap_or_default()
    }

    /// Minimum search length that opens the listbox.
    pub fn min_search_chars(&self) -> usize {
        self.inner.read().map(|g| g.min_search_chars).unwrap_or(0)
    }

    /// Whether the current search is long enough to open the listbox.
    pub fn threshold_met(&self) -> bool {
        self.inner
            .read()
            .map(|g| Self::threshold_met_locked(&g))
            .unwrap_or(false)
    }

    pub(super) fn threshold_met_locked(inner: &AutocompleteInner) -> bool {
        inner.search.chars().count() >= inner.min_search_chars
    }

    /// Recompute candidates. Below the threshold every option is a
    /// candidate, so a forced-open listbox shows the full list.
    pub(super) fn refilter_locked(inner: &mut AutocompleteInner) {
        inner.filtered = if Self::threshold_met_locked(inner) {
            filter_options(&inner.options, &inner.search)
        } else {
            (0..inner.options.len()).collect()
        };
    }

    /// Change the search text as the user typed it.
    ///
    /// Emits `search`, recomputes candidates, resets roving focus and opens
    /// or closes the listbox according to the minimum search length.
    pub fn type_text(&self, text: impl Into<String>, cx: &Scope) {
        if self.field.is_disabled() {
            return;
        }
        let text = text.into();
        let open = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            guard.search = text.clone();
            Self::refilter_locked(&mut guard);
            guard.focused = None;
            self.mark_dirty();
            Self::threshold_met_locked(&guard)
        };

        cx.push_event(
            WidgetEvent::new(WidgetEventKind::Search, self.id().clone())
                .with_detail(EventDetail::Search(text)),
        );
        if open {
            self.open(cx);
        } else {
            self.close(cx);
        }
    }

    // -------------------------------------------------------------------------
    // Dropdown open/close state
    // -------------------------------------------------------------------------

    /// Current dropdown state.
    pub fn state(&self) -> DropdownState {
        self.inner
            .read()
            .map(|g| match (g.open, g.filtered.is_empty()) {
                (false, _) => DropdownState::Closed,
                (true, true) => DropdownState::OpenEmpty,
                (true, false) => DropdownState::OpenFilled,
            })
            .unwrap_or(DropdownState::Closed)
    }

    /// Check if the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.state() != DropdownState::Closed
    }

    /// Open the dropdown regardless of the search length.
    pub fn open(&self, cx: &Scope) {
        let opened = match self.inner.write() {
            Ok(mut guard) if !guard.open => {
                guard.open = true;
                true
            }
            _ => false,
        };
        if opened {
            self.mark_dirty();
            log::debug!("[autocomplete] {} opened", self.id());
            cx.push_event(WidgetEvent::new(WidgetEventKind::Open, self.id().clone()));
        }
    }

    /// Close the dropdown and clear roving focus.
    pub fn close(&self, cx: &Scope) {
        let closed = match self.inner.write() {
            Ok(mut guard) => {
                guard.focused = None;
                std::mem::replace(&mut guard.open, false)
            }
            Err(_) => false,
        };
        if closed {
            self.mark_dirty();
            log::debug!("[autocomplete] {} closed", self.id());
            cx.push_event(WidgetEvent::new(WidgetEventKind::Close, self.id().clone()));
        }
    }

    // -------------------------------------------------------------------------
    // Roving focus
    // -------------------------------------------------------------------------

    /// Index (into the candidates) of the focused option.
    pub fn focused_index(&self) -> Option<usize> {
        self.inner.read().ok().and_then(|g| g.focused)
    }

    /// The focused option.
    pub fn focused_option(&self) -> Option<SelectOption> {
        self.inner.read().ok().and_then(|g| {
            g.focused
                .and_then(|i| g.filtered.get(i))
                .and_then(|&i| g.options.get(i).cloned())
        })
    }

    /// Move focus forward, wrapping from the last candidate to the first.
    pub fn focus_next(&self) {
        if let Ok(mut guard) = self.inner.write() {
            let len = guard.filtered.len();
            guard.focused = match (len, guard.focused) {
                (0, _) => None,
                (_, None) => Some(0),
                (len, Some(i)) => Some((i + 1) % len),
            };
            self.mark_dirty();
        }
    }

    /// Move focus backward, wrapping from the first candidate to the last.
    pub fn focus_prev(&self) {
        if let Ok(mut guard) = self.inner.write() {
            let len = guard.filtered.len();
            guard.focused = match (len, guard.focused) {
                (0, _) => None,
                (len, None) | (len, Some(0)) => Some(len - 1),
                (_, Some(i)) => Some(i - 1),
            };
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Commit the focused option. Returns false when nothing is focused.
    pub fn commit_focused(&self, cx: &Scope) -> bool {
        match self.focused_index() {
            Some(index) => self.select_option(index, cx),
            None => false,
        }
    }

    /// Commit the candidate at `filtered_index`.
    ///
    /// Returns false (and changes nothing) for disabled or missing options.
    pub fn select_option(&self, filtered_index: usize, cx: &Scope) -> bool {
        let option = self.inner.read().ok().and_then(|g| {
            g.filtered
                .get(filtered_index)
                .and_then(|&i| g.options.get(i).cloned())
        });
        match option {
            Some(option) => self.commit(&option, cx),
            None => false,
        }
    }

    /// Commit the option with the given value, if present and enabled.
    pub fn select_value(&self, value: &str, cx: &Scope) -> bool {
        let option = self
            .inner
            .read()
            .ok()
            .and_then(|g| g.options.iter().find(|o| o.value == value).cloned());
        match option {
            Some(option) => self.commit(&option, cx),
            None => false,
        }
    }

    /// Pointer click on a candidate row.
    ///
    /// A click that lands inside the blur grace window still commits, but
    /// it does not cancel the pending close: only focus returning to the
    /// widget does that.
    pub fn click_option(&self, filtered_index: usize, cx: &Scope) -> bool {
        self.select_option(filtered_index, cx)
    }

    fn commit(&self, option: &SelectOption, cx: &Scope) -> bool {
        if option.disabled || self.field.is_disabled() {
            return false;
        }

        let value = if self.is_multiple() {
            let mut values = self
                .field
                .value()
                .as_multiple()
                .map(<[String]>::to_vec)
                .unwrap_or_default();
            if let Some(pos) = values.iter().position(|v| *v == option.value) {
                values.remove(pos);
            } else {
                values.push(option.value.clone());
            }
            FieldValue::Multiple(values)
        } else {
            if let Ok(mut guard) = self.inner.write() {
                guard.search = option.label.clone();
                Self::refilter_locked(&mut guard);
            }
            self.close(cx);
            FieldValue::Single(option.value.clone())
        };

        log::debug!("[autocomplete] {} committed {:?}", self.id(), value);
        self.emit_value(value, cx);
        true
    }

    /// Remove one value from a multi-value autocomplete (chip removal).
    pub fn remove_value(&self, value: &str, cx: &Scope) -> bool {
        let Some(mut values) = self.field.value().as_multiple().map(<[String]>::to_vec) else {
            return false;
        };
        let Some(pos) = values.iter().position(|v| v == value) else {
            return false;
        };
        values.remove(pos);
        self.emit_value(FieldValue::Multiple(values), cx);
        true
    }

    /// Clear the search text, keeping the value.
    pub fn clear_search(&self, cx: &Scope) {
        if !self.search().is_empty() {
            self.type_text(String::new(), cx);
        }
    }

    /// Clear search text and value as the user would.
    pub fn clear(&self, cx: &Scope) {
        if let Ok(mut guard) = self.inner.write() {
            guard.search.clear();
            guard.focused = None;
            Self::refilter_locked(&mut guard);
        }
        let empty = FieldValue::empty(self.is_multiple());
        if self.field.value() != empty {
            self.emit_value(empty, cx);
        }
        self.close(cx);
    }

    /// Reset to the empty baseline without events.
    pub fn reset(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.search.clear();
            guard.focused = None;
            guard.open = false;
            Self::refilter_locked(&mut guard);
        }
        self.field.reset();
    }

    fn emit_value(&self, value: FieldValue, cx: &Scope) {
        self.field.input(value.clone(), cx);
        cx.push_event(
            WidgetEvent::new(WidgetEventKind::Change, self.id().clone())
                .with_detail(EventDetail::Value(value.clone())),
        );
        cx.push_event(
            WidgetEvent::new(WidgetEventKind::Input, self.id().clone())
                .with_detail(EventDetail::Value(value)),
        );
    }

    // -------------------------------------------------------------------------
    // Rendering contract
    // -------------------------------------------------------------------------

    /// ARIA attributes of the combobox input.
    pub fn aria(&self) -> AriaAttributes {
        let mut aria = AriaAttributes::with_role("combobox");
        aria.set("aria-autocomplete", "list")
            .set("aria-haspopup", "listbox")
            .set("aria-controls", self.id().listbox())
            .set_bool("aria-expanded", self.is_open());
        if let Ok(guard) = self.inner.read()
            && guard.open
            && let Some(&option_index) = guard.focused.and_then(|i| guard.filtered.get(i))
        {
            aria.set("aria-activedescendant", self.id().option(option_index));
        }
        self.field.apply_aria(&mut aria);
        aria
    }

    /// ARIA attributes of the listbox.
    pub fn listbox_aria(&self) -> AriaAttributes {
        let mut aria = AriaAttributes::with_role("listbox");
        aria.set("id", self.id().listbox());
        if self.is_multiple() {
            aria.set_bool("aria-multiselectable", true);
        }
        aria
    }

    /// ARIA attributes of the candidate at `filtered_index`.
    pub fn option_aria(&self, filtered_index: usize) -> Option<AriaAttributes> {
        let value = self.field.value();
        let guard = self.inner.read().ok()?;
        let &option_index = guard.filtered.get(filtered_index)?;
        let option = guard.options.get(option_index)?;

        let mut aria = AriaAttributes::with_role("option");
        aria.set("id", self.id().option(option_index))
            .set_bool("aria-selected", value.contains(&option.value));
        if option.disabled {
            aria.set_bool("aria-disabled", true);
        }
        Some(aria)
    }

    /// Check if the autocomplete state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
