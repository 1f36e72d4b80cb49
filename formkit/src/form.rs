//! Form aggregation.
//!
//! A [`Form`] owns a tree of [`FormNode`]s and turns the named controls
//! inside it into a flat [`FormData`] record on demand. Nothing is cached:
//! every `collect_values`, `submit` or `delete` walks the controls again.

use std::fmt::Debug;
use std::sync::{Arc, RwLock};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::context::Scope;
use crate::error::ResetError;
use crate::events::{EventDetail, WidgetEvent, WidgetEventKind};
use crate::ids::WidgetId;
use crate::validation::Validity;
use crate::value::FieldValue;
use crate::widgets::{
    Autocomplete, Button, ButtonKind, Checkbox, Input, Radio, Select, Tree,
};

// =============================================================================
// Values
// =============================================================================

/// A captured control value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    /// Checkbox state
    Bool(bool),
    /// Scalar value
    Text(String),
    /// Multi-value control
    List(Vec<String>),
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FormValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<FieldValue> for FormValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Single(s) => Self::Text(s),
            FieldValue::Multiple(items) => Self::List(items),
        }
    }
}

/// Flat name → value record, in first-seen order.
///
/// Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value. A repeated name keeps its position and takes the new
    /// value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FormValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a value.
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Whether a name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl Serialize for FormData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Controls
// =============================================================================

/// How a control contributes to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Contributes its checked state as a boolean
    Checkbox,
    /// Contributes its value only while checked
    Radio,
    /// Contributes its current value
    Value,
}

/// A named control a [`Form`] can collect and reset.
pub trait FormControl: Debug + Send + Sync {
    /// The control's widget id.
    fn control_id(&self) -> WidgetId;

    /// Field name; unnamed controls are skipped.
    fn control_name(&self) -> String;

    /// How the control contributes to the record.
    fn control_kind(&self) -> ControlKind;

    /// Checked state for checkbox and radio controls.
    fn is_checked(&self) -> bool {
        false
    }

    /// Current value.
    fn form_value(&self) -> FormValue;

    /// Return to the empty/unchecked baseline.
    fn reset(&self) -> Result<(), ResetError>;

    /// Rendered validity.
    fn validity(&self) -> Validity {
        Validity::Unset
    }
}

impl FormControl for Input {
    fn control_id(&self) -> WidgetId {
        self.id().clone()
    }

    fn control_name(&self) -> String {
        self.name()
    }

    fn control_kind(&self) -> ControlKind {
        ControlKind::Value
    }

    fn form_value(&self) -> FormValue {
        FormValue::Text(self.value())
    }

    fn reset(&self) -> Result<(), ResetError> {
        Input::reset(self);
        Ok(())
    }

    fn validity(&self) -> Validity {
        self.is_valid()
    }
}

impl FormControl for Select {
    fn control_id(&self) -> WidgetId {
        self.id().clone()
    }

    fn control_name(&self) -> String {
        self.field().name()
    }

    fn control_kind(&self) -> ControlKind {
        ControlKind::Value
    }

    fn form_value(&self) -> FormValue {
        self.value().into()
    }

    fn reset(&self) -> Result<(), ResetError> {
        Select::reset(self);
        Ok(())
    }

    fn validity(&self) -> Validity {
        self.is_valid()
    }
}

impl FormControl for Autocomplete {
    fn control_id(&self) -> WidgetId {
        self.id().clone()
    }

    fn control_name(&self) -> String {
        self.field().name()
    }

    fn control_kind(&self) -> ControlKind {
        ControlKind::Value
    }

    fn form_value(&self) -> FormValue {
        self.value().into()
    }

    fn reset(&self) -> Result<(), ResetError> {
        Autocomplete::reset(self);
        Ok(())
    }

    fn validity(&self) -> Validity {
        self.is_valid()
    }
}

impl FormControl for Checkbox {
    fn control_id(&self) -> WidgetId {
        self.id().clone()
    }

    fn control_name(&self) -> String {
        self.name()
    }

    fn control_kind(&self) -> ControlKind {
        ControlKind::Checkbox
    }

    fn is_checked(&self) -> bool {
        Checkbox::is_checked(self)
    }

    fn form_value(&self) -> FormValue {
        FormValue::Bool(Checkbox::is_checked(self))
    }

    fn reset(&self) -> Result<(), ResetError> {
        Checkbox::reset(self);
        Ok(())
    }
}

impl FormControl for Radio {
    fn control_id(&self) -> WidgetId {
        self.id().clone()
    }

    fn control_name(&self) -> String {
        self.name()
    }

    fn control_kind(&self) -> ControlKind {
        ControlKind::Radio
    }

    fn is_checked(&self) -> bool {
        Radio::is_checked(self)
    }

    fn form_value(&self) -> FormValue {
        FormValue::Text(self.value())
    }

    fn reset(&self) -> Result<(), ResetError> {
        Radio::reset(self);
        Ok(())
    }
}

impl FormControl for Tree {
    fn control_id(&self) -> WidgetId {
        self.id().clone()
    }

    fn control_name(&self) -> String {
        self.name()
    }

    fn control_kind(&self) -> ControlKind {
        ControlKind::Value
    }

    fn form_value(&self) -> FormValue {
        FormValue::List(self.selected())
    }

    fn reset(&self) -> Result<(), ResetError> {
        self.clear_selection();
        Ok(())
    }
}

// =============================================================================
// Form
// =============================================================================

/// An entry in a form's content.
#[derive(Debug, Clone)]
pub enum FormNode {
    /// A control
    Control(Arc<dyn FormControl>),
    /// A container whose descendants are walked in order
    Group(Vec<FormNode>),
}

impl FormNode {
    /// Wrap a control.
    pub fn control<C: FormControl + 'static>(control: C) -> Self {
        Self::Control(Arc::new(control))
    }

    fn walk<'a>(&'a self, out: &mut Vec<&'a Arc<dyn FormControl>>) {
        match self {
            Self::Control(control) => out.push(control),
            Self::Group(children) => {
                for child in children {
                    child.walk(out);
                }
            }
        }
    }
}

impl<C: FormControl + 'static> From<C> for FormNode {
    fn from(control: C) -> Self {
        Self::control(control)
    }
}

/// Internal state for a Form
#[derive(Debug, Default)]
struct FormInner {
    /// Content in document order
    nodes: Vec<FormNode>,
}

/// Aggregates the values of the controls it contains.
///
/// # Example
///
/// ```ignore
/// let email = Input::new(&cx).with_name("email").with_value("a@b.c");
/// let agree = Checkbox::new(&cx).with_name("agree").checked();
/// let form = Form::new(&cx).with_nodes(vec![email.into(), agree.into()]);
///
/// let data = form.collect_values();
/// assert_eq!(serde_json::to_string(&data)?, r#"{"email":"a@b.c","agree":true}"#);
/// ```
#[derive(Debug, Clone)]
pub struct Form {
    /// Unique identifier for this form
    id: WidgetId,
    /// Internal state
    inner: Arc<RwLock<FormInner>>,
}

impl Form {
    /// Create an empty form with a generated id.
    pub fn new(cx: &Scope) -> Self {
        Self::with_id(cx.next_id("form"))
    }

    /// Create an empty form with an explicit id.
    pub fn with_id(id: impl Into<WidgetId>) -> Self {
        Self {
            id: id.into(),
            inner: Arc::new(RwLock::new(FormInner::default())),
        }
    }

    /// Set the content.
    pub fn with_nodes(self, nodes: Vec<FormNode>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.nodes = nodes;
        }
        self
    }

    /// Append a node.
    pub fn push(&self, node: impl Into<FormNode>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.nodes.push(node.into());
        }
    }

    /// Get the unique ID.
    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    /// All controls in traversal order.
    pub fn controls(&self) -> Vec<Arc<dyn FormControl>> {
        let Ok(guard) = self.inner.read() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for node in &guard.nodes {
            node.walk(&mut out);
        }
        out.into_iter().cloned().collect()
    }

    /// Build the record from the current control state.
    ///
    /// Checkboxes contribute a boolean, radios contribute their value only
    /// while checked, other controls contribute their value. A name seen
    /// twice keeps the last value.
    pub fn collect_values(&self) -> FormData {
        let mut data = FormData::new();
        for control in self.controls() {
            let name = control.control_name();
            if name.is_empty() {
                continue;
            }
            match control.control_kind() {
                ControlKind::Checkbox => data.insert(name, control.is_checked()),
                ControlKind::Radio => {
                    if control.is_checked() {
                        data.insert(name, control.form_value());
                    }
                }
                ControlKind::Value => data.insert(name, control.form_value()),
            }
        }
        data
    }

    /// Whether no control is currently shown invalid.
    pub fn is_valid(&self) -> bool {
        self.controls()
            .iter()
            .all(|c| c.validity() != Validity::Invalid)
    }

    /// Collect fresh values and emit `submit` with them.
    pub fn submit(&self, cx: &Scope) -> FormData {
        let data = self.collect_values();
        log::debug!("[form] {} submit with {} fields", self.id, data.len());
        self.emit(WidgetEventKind::Submit, data.clone(), cx);
        data
    }

    /// Reset every control and emit `clear` with the emptied values.
    ///
    /// Controls that fail to reset are logged and skipped.
    pub fn clear(&self, cx: &Scope) -> FormData {
        for control in self.controls() {
            if let Err(err) = control.reset() {
                log::warn!("[form] {} skipped reset: {}", self.id, err);
            }
        }
        let data = self.collect_values();
        log::debug!("[form] {} cleared", self.id);
        self.emit(WidgetEventKind::Clear, data.clone(), cx);
        data
    }

    /// Emit `delete` with the current values.
    pub fn delete(&self, cx: &Scope) -> FormData {
        let data = self.collect_values();
        log::debug!("[form] {} delete requested", self.id);
        self.emit(WidgetEventKind::Delete, data.clone(), cx);
        data
    }

    /// Activate a button and run its form behavior.
    ///
    /// Returns false when the button is disabled.
    pub fn activate(&self, button: &Button, cx: &Scope) -> bool {
        if !button.click(cx) {
            return false;
        }
        match button.kind() {
            ButtonKind::Button => {}
            ButtonKind::Submit => {
                self.submit(cx);
            }
            ButtonKind::Reset => {
                self.clear(cx);
            }
            ButtonKind::Delete => {
                self.delete(cx);
            }
        }
        true
    }

    fn emit(&self, kind: WidgetEventKind, data: FormData, cx: &Scope) {
        cx.push_event(
            WidgetEvent::new(kind, self.id.clone()).with_detail(EventDetail::Data(data)),
        );
    }
}
