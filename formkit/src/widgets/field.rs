//! Shared value and validity state for input, select and autocomplete.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::aria::AriaAttributes;
use crate::context::Scope;
use crate::error::ValidatorError;
use crate::events::{EventDetail, WidgetEvent, WidgetEventKind};
use crate::ids::WidgetId;
use crate::validation::{
    ErrorDisplay, Validation, Validator, ValidatorCall, Validity, ValidityState,
};
use crate::value::FieldValue;

/// Internal state for a field.
#[derive(Debug)]
struct FieldInner {
    /// Form field name
    name: String,
    /// Visible label
    label: String,
    /// Current value
    value: FieldValue,
    /// Whether the value is a list
    multiple: bool,
    /// Tri-state validity
    validity: ValidityState,
    /// Error message shown while invalid
    error: String,
    /// Attached validator
    validator: Option<Validator>,
    /// How the error message is displayed
    error_display: ErrorDisplay,
    /// Whether a value is required
    required: bool,
    /// Whether the field is disabled
    disabled: bool,
    /// Bumped on every value mutation; async results carry the generation
    /// they were started for
    generation: u64,
}

/// Value/validity controller shared by the validated field widgets.
///
/// Consumers may assign `value` and validity directly; user input goes
/// through [`FieldController::input`], which runs the validator and emits
/// `validitychange`.
///
/// Rules applied on every user-driven mutation:
/// - an empty value always resets validity to `Unset` and clears the error;
/// - a non-empty value with a validator takes the validator's verdict;
/// - a rejection without a message keeps the previous message;
/// - a validator that fails or panics yields `Invalid` and, if nothing is
///   shown yet, the scope's generic error message.
#[derive(Debug, Clone)]
pub struct FieldController {
    id: WidgetId,
    inner: Arc<RwLock<FieldInner>>,
    dirty: Arc<AtomicBool>,
}

impl FieldController {
    /// Create a controller reporting changes through `dirty`.
    pub fn new(id: WidgetId, multiple: bool, dirty: Arc<AtomicBool>) -> Self {
        Self {
            id,
            inner: Arc::new(RwLock::new(FieldInner {
                name: String::new(),
                label: String::new(),
                value: FieldValue::empty(multiple),
                multiple,
                validity: ValidityState::default(),
                error: String::new(),
                validator: None,
                error_display: ErrorDisplay::default(),
                required: false,
                disabled: false,
                generation: 0,
            })),
            dirty,
        }
    }

    /// The owning widget's id.
    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Get the field name.
    pub fn name(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.name.clone())
            .unwrap_or_default()
    }

    /// Set the field name.
    pub fn set_name(&self, name: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.name = name.into();
            self.mark_dirty();
        }
    }

    /// Get the visible label.
    pub fn label(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.label.clone())
            .unwrap_or_default()
    }

    /// Set the visible label.
    pub fn set_label(&self, label: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.label = label.into();
            self.mark_dirty();
        }
    }

    /// Whether the value is a list.
    pub fn is_multiple(&self) -> bool {
        self.inner.read().map(|guard| guard.multiple).unwrap_or(false)
    }

    /// Whether a value is required.
    pub fn is_required(&self) -> bool {
        self.inner.read().map(|guard| guard.required).unwrap_or(false)
    }

    /// Set whether a value is required.
    pub fn set_required(&self, required: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.required = required;
            self.mark_dirty();
        }
    }

    /// Whether the field is disabled.
    pub fn is_disabled(&self) -> bool {
        self.inner.read().map(|guard| guard.disabled).unwrap_or(false)
    }

    /// Set whether the field is disabled.
    pub fn set_disabled(&self, disabled: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.disabled = disabled;
            self.mark_dirty();
        }
    }

    /// Attach or remove the validator.
    pub fn set_validator(&self, validator: Option<Validator>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.validator = validator;
        }
    }

    /// Whether a validator is attached.
    pub fn has_validator(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.validator.is_some())
            .unwrap_or(false)
    }

    /// Get the error display mode.
    pub fn error_display(&self) -> ErrorDisplay {
        self.inner
            .read()
            .map(|guard| guard.error_display)
            .unwrap_or_default()
    }

    /// Set the error display mode.
    pub fn set_error_display(&self, display: ErrorDisplay) {
        if let Ok(mut guard) = self.inner.write() {
            guard.error_display = display;
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Value
    // -------------------------------------------------------------------------

    /// Get the current value.
    pub fn value(&self) -> FieldValue {
        self.inner
            .read()
            .map(|guard| guard.value.clone())
            .unwrap_or_default()
    }

    /// Assign the value programmatically.
    ///
    /// The validator does not run and no events fire, but an empty value
    /// still resets validity to neutral.
    pub fn set_value(&self, value: impl Into<FieldValue>) {
        if let Ok(mut guard) = self.inner.write() {
            let value = value.into().into_shape(guard.multiple);
            guard.generation += 1;
            if value.is_empty() {
                guard.validity.validity = Validity::Unset;
                guard.error.clear();
            }
            guard.value = value;
            self.mark_dirty();
        }
    }

    /// Apply a user-driven value change and validate it.
    ///
    /// Sync validators run immediately. Async validators are spawned on the
    /// current tokio runtime; without one the value is stored but not
    /// judged (use [`FieldController::input_async`] to drive them inline).
    pub fn input(&self, value: impl Into<FieldValue>, cx: &Scope) {
        let Some((value, generation, validator)) = self.store_input(value.into(), cx) else {
            return;
        };
        match validator.call(&value) {
            ValidatorCall::Ready(result) => self.apply_result(generation, result, cx),
            ValidatorCall::Pending(fut) => match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let field = self.clone();
                    let cx = cx.clone();
                    handle.spawn(async move {
                        let result = fut.await;
                        field.apply_result(generation, result, &cx);
                    });
                }
                Err(_) => {
                    log::warn!(
                        "[field] {} has an async validator but no runtime is running; skipping",
                        self.id
                    );
                }
            },
        }
    }

    /// Like [`FieldController::input`], but awaits async validators inline.
    pub async fn input_async(&self, value: impl Into<FieldValue>, cx: &Scope) {
        let Some((value, generation, validator)) = self.store_input(value.into(), cx) else {
            return;
        };
        let result = match validator.call(&value) {
            ValidatorCall::Ready(result) => result,
            ValidatorCall::Pending(fut) => fut.await,
        };
        self.apply_result(generation, result, cx);
    }

    /// Re-run the validator on the current value (sync validators only).
    ///
    /// Returns the validity afterwards.
    pub fn validate(&self, cx: &Scope) -> Validity {
        let (value, generation, validator) = match self.inner.read() {
            Ok(guard) => (guard.value.clone(), guard.generation, guard.validator.clone()),
            Err(_) => return Validity::Unset,
        };
        if let Some(validator) = validator
            && !value.is_empty()
        {
            match validator.call(&value) {
                ValidatorCall::Ready(result) => self.apply_result(generation, result, cx),
                ValidatorCall::Pending(_) => {
                    log::debug!("[field] {} skips async validator in validate()", self.id);
                }
            }
        }
        self.validity().validity
    }

    /// Store a user-driven value. Returns what the validator needs, or
    /// `None` when there is nothing to validate.
    fn store_input(
        &self,
        value: FieldValue,
        cx: &Scope,
    ) -> Option<(FieldValue, u64, Validator)> {
        let (value, generation, validator, reset) = {
            let mut guard = self.inner.write().ok()?;
            let value = value.into_shape(guard.multiple);
            guard.generation += 1;
            guard.value = value.clone();
            self.mark_dirty();

            if value.is_empty() {
                let was = guard.validity.shown();
                guard.validity.validity = Validity::Unset;
                guard.error.clear();
                (value, guard.generation, None, was != Validity::Unset)
            } else {
                (value, guard.generation, guard.validator.clone(), false)
            }
        };

        if reset {
            self.push_validity(Validity::Unset, String::new(), cx);
        }
        validator.map(|v| (value, generation, v))
    }

    /// Apply a validator verdict if it still belongs to the current value.
    fn apply_result(
        &self,
        generation: u64,
        result: Result<Validation, ValidatorError>,
        cx: &Scope,
    ) {
        let (validity, error) = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            if guard.generation != generation {
                log::debug!(
                    "[field] {} discards stale validation (generation {}, current {})",
                    self.id,
                    generation,
                    guard.generation
                );
                return;
            }
            if guard.value.is_empty() {
                return;
            }

            guard.validity.explicit = true;
            match result {
                Ok(Validation::Valid) => {
                    guard.validity.validity = Validity::Valid;
                    guard.error.clear();
                }
                Ok(Validation::Invalid { message }) => {
                    guard.validity.validity = Validity::Invalid;
                    if let Some(message) = message {
                        guard.error = message;
                    }
                }
                Err(err) => {
                    log::warn!("[field] {} validator failed: {}", self.id, err);
                    guard.validity.validity = Validity::Invalid;
                    if guard.error.is_empty() {
                        guard.error = cx.config().validator_error.clone();
                    }
                }
            }
            self.mark_dirty();
            (guard.validity.validity, guard.error.clone())
        };
        self.push_validity(validity, error, cx);
    }

    fn push_validity(&self, valid: Validity, error: String, cx: &Scope) {
        cx.push_event(
            WidgetEvent::new(WidgetEventKind::ValidityChange, self.id.clone())
                .with_detail(EventDetail::Validity { valid, error }),
        );
    }

    // -------------------------------------------------------------------------
    // Validity
    // -------------------------------------------------------------------------

    /// Full validity state.
    pub fn validity(&self) -> ValidityState {
        self.inner
            .read()
            .map(|guard| guard.validity)
            .unwrap_or_default()
    }

    /// Rendered validity: `Unset` until someone judged the field.
    pub fn is_valid(&self) -> Validity {
        self.validity().shown()
    }

    /// Assign validity from outside (the consumer's own judgement).
    ///
    /// Marks validity as explicitly set and emits `validitychange`.
    pub fn set_valid(&self, valid: bool, cx: &Scope) {
        let error = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            guard.validity.explicit = true;
            guard.validity.validity = Validity::from(valid);
            if valid {
                guard.error.clear();
            }
            self.mark_dirty();
            guard.error.clone()
        };
        self.push_validity(Validity::from(valid), error, cx);
    }

    /// Current error message (empty when none).
    pub fn error(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.error.clone())
            .unwrap_or_default()
    }

    /// Set the error message shown while invalid.
    pub fn set_error(&self, msg: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.error = msg.into();
            self.mark_dirty();
        }
    }

    /// Clear the error message.
    pub fn clear_error(&self) {
        if let Ok(mut guard) = self.inner.write()
            && !guard.error.is_empty()
        {
            guard.error.clear();
            self.mark_dirty();
        }
    }

    /// Whether an error message is currently rendered.
    pub fn shows_error(&self) -> bool {
        self.inner
            .read()
            .map(|guard| {
                guard.validity.shown() == Validity::Invalid
                    && !guard.error.is_empty()
                    && guard.error_display.shows_message()
            })
            .unwrap_or(false)
    }

    /// Reset to the empty baseline: empty value, neutral validity, no error.
    pub fn reset(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.value = FieldValue::empty(guard.multiple);
            guard.generation += 1;
            guard.validity.validity = Validity::Unset;
            guard.error.clear();
            self.mark_dirty();
        }
    }

    /// Add the field-level ARIA attributes to a widget's attribute set.
    pub fn apply_aria(&self, aria: &mut AriaAttributes) {
        aria.set_opt("aria-invalid", self.validity().aria_invalid().map(|b| b.to_string()));
        if self.shows_error() {
            aria.set("aria-describedby", self.id.error());
        }
        if self.is_required() {
            aria.set_bool("aria-required", true);
        }
        if self.is_disabled() {
            aria.set_bool("aria-disabled", true);
        }
        if !self.label().is_empty() {
            aria.set("aria-labelledby", self.id.label());
        }
    }
}
