//! Declarative widget assembly.
//!
//! A form can be described as data (typically JSON) and turned into live
//! widgets in one go. Primitive configuration travels as string attributes
//! following the markup conventions in [`crate::attr`]; option lists and
//! tree nodes are typed.
//!
//! ```ignore
//! let built = Builder::new(cx.clone()).from_json(r#"[
//!     { "kind": "input", "name": "email", "rules": [{ "rule": "email" }] },
//!     { "kind": "checkbox", "name": "agree", "attrs": { "checked": "" } }
//! ]"#)?;
//! let data = built.form.collect_values();
//! ```

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::Deserialize;

use crate::attr::{parse_bool_attr, parse_number_attr};
use crate::context::Scope;
use crate::error::BuildError;
use crate::form::{Form, FormNode};
use crate::ids::WidgetId;
use crate::validation::{ErrorDisplay, Validator};
use crate::value::SelectOption;
use crate::widgets::{
    Autocomplete, Button, ButtonKind, Checkbox, Input, Radio, Select, SelectionMode, Toast,
    ToastVariant, Tree, TreeNode,
};

/// A validation rule by name.
///
/// Known rules: `required`, `min_length`, `max_length`, `pattern`, `email`.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    /// Rule name
    pub rule: String,
    /// Rule argument (length or pattern)
    #[serde(default)]
    pub value: Option<String>,
    /// Message shown when the rule rejects
    #[serde(default)]
    pub message: Option<String>,
}

/// Configuration shared by the control kinds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ControlSpec {
    /// Explicit id; generated when absent
    pub id: Option<String>,
    /// Field (or radio group) name
    pub name: Option<String>,
    /// Visible label (button text, toast message)
    pub label: Option<String>,
    /// Markup-style attributes
    pub attrs: HashMap<String, String>,
    /// Validation rules, applied in order
    pub rules: Vec<RuleSpec>,
    /// Options for select and autocomplete
    pub options: Vec<SelectOption>,
}

impl ControlSpec {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn flag(&self, name: &str) -> bool {
        parse_bool_attr(self.attr(name))
    }
}

/// Tree configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TreeSpec {
    /// Explicit id; generated when absent
    pub id: Option<String>,
    /// Field name for the selection
    pub name: Option<String>,
    /// Selection mode
    pub selection: SelectionMode,
    /// Root nodes
    pub nodes: Vec<TreeNode>,
    /// Initially expanded ids
    pub expanded: Vec<String>,
    /// Initially selected ids
    pub selected: Vec<String>,
}

/// One widget in a declarative description.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WidgetSpec {
    /// Text input
    Input(ControlSpec),
    /// Dropdown select
    Select(ControlSpec),
    /// Filtered combobox
    Autocomplete(ControlSpec),
    /// Checkbox
    Checkbox(ControlSpec),
    /// Radio option; `name` is the group
    Radio(ControlSpec),
    /// Button; attribute `type` picks the form behavior
    Button(ControlSpec),
    /// Toast notification; `label` is the message
    Toast(ControlSpec),
    /// Tree
    Tree(TreeSpec),
    /// Container of nested widgets
    Group {
        /// Nested widgets
        #[serde(default)]
        children: Vec<WidgetSpec>,
    },
}

/// Result of a build: the form plus typed lookups.
#[derive(Debug, Clone)]
pub struct Built {
    /// Form over every control in the description
    pub form: Form,
    inputs: HashMap<String, Input>,
    selects: HashMap<String, Select>,
    autocompletes: HashMap<String, Autocomplete>,
    checkboxes: HashMap<String, Checkbox>,
    radios: HashMap<String, Vec<Radio>>,
    trees: HashMap<String, Tree>,
    buttons: Vec<Button>,
    toasts: Vec<Toast>,
}

impl Built {
    fn new(form: Form) -> Self {
        Self {
            form,
            inputs: HashMap::new(),
            selects: HashMap::new(),
            autocompletes: HashMap::new(),
            checkboxes: HashMap::new(),
            radios: HashMap::new(),
            trees: HashMap::new(),
            buttons: Vec::new(),
            toasts: Vec::new(),
        }
    }

    /// Input by field name.
    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.get(name)
    }

    /// Select by field name.
    pub fn select(&self, name: &str) -> Option<&Select> {
        self.selects.get(name)
    }

    /// Autocomplete by field name.
    pub fn autocomplete(&self, name: &str) -> Option<&Autocomplete> {
        self.autocompletes.get(name)
    }

    /// Checkbox by field name.
    pub fn checkbox(&self, name: &str) -> Option<&Checkbox> {
        self.checkboxes.get(name)
    }

    /// Radios of a group, in description order.
    pub fn radios(&self, name: &str) -> &[Radio] {
        self.radios.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tree by field name or id.
    pub fn tree(&self, name: &str) -> Option<&Tree> {
        self.trees.get(name)
    }

    /// Button by label.
    pub fn button(&self, label: &str) -> Option<&Button> {
        self.buttons.iter().find(|b| b.label() == label)
    }

    /// Toast by id.
    pub fn toast(&self, id: &str) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id().as_str() == id)
    }

    /// All buttons in description order.
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }
}

/// Turns widget descriptions into widgets registered in one scope.
#[derive(Debug, Clone)]
pub struct Builder {
    scope: Scope,
}

impl Builder {
    /// Create a builder for a scope.
    pub fn new(scope: Scope) -> Self {
        Self { scope }
    }

    /// Parse a JSON array of widget descriptions and build it.
    pub fn from_json(&self, json: &str) -> Result<Built, BuildError> {
        let specs: Vec<WidgetSpec> = serde_json::from_str(json)?;
        self.build(&specs)
    }

    /// Build widgets from descriptions.
    pub fn build(&self, specs: &[WidgetSpec]) -> Result<Built, BuildError> {
        let mut built = Built::new(Form::new(&self.scope));
        let mut ids = HashSet::new();
        let mut nodes = Vec::new();
        for spec in specs {
            if let Some(node) = self.build_one(spec, &mut built, &mut ids)? {
                nodes.push(node);
            }
        }
        built.form = built.form.with_nodes(nodes);
        log::debug!(
            "[builder] built {} controls",
            built.form.controls().len()
        );
        Ok(built)
    }

    fn build_one(
        &self,
        spec: &WidgetSpec,
        built: &mut Built,
        ids: &mut HashSet<String>,
    ) -> Result<Option<FormNode>, BuildError> {
        let cx = &self.scope;
        let node = match spec {
            WidgetSpec::Input(c) => {
                let id = resolve_id(cx, c.id.as_deref(), "input", ids)?;
                let mut input = Input::with_id(id);
                if let Some(label) = &c.label {
                    input = input.with_label(label);
                }
                if let Some(placeholder) = c.attr("placeholder") {
                    input = input.with_placeholder(placeholder);
                }
                if let Some(value) = c.attr("value") {
                    input = input.with_value(value);
                }
                if c.flag("required") {
                    input = input.required();
                }
                if c.flag("disabled") {
                    input = input.disabled();
                }
                if c.flag("readonly") {
                    input = input.readonly();
                }
                if let Some(validator) = validator_for(&c.rules)? {
                    input = input.with_validator(validator);
                }
                input.set_error_display(error_display(c)?);
                if let Some(name) = &c.name {
                    input = input.with_name(name);
                    built.inputs.insert(name.clone(), input.clone());
                }
                Some(FormNode::control(input))
            }
            WidgetSpec::Select(c) => {
                let id = resolve_id(cx, c.id.as_deref(), "select", ids)?;
                let mut select =
                    Select::with_id(id, c.flag("multiple")).with_options(c.options.clone());
                if let Some(label) = &c.label {
                    select = select.with_label(label);
                }
                if let Some(placeholder) = c.attr("placeholder") {
                    select = select.with_placeholder(placeholder);
                }
                if let Some(value) = c.attr("value") {
                    select = select.with_value(value);
                }
                if c.flag("required") {
                    select = select.required();
                }
                if c.flag("disabled") {
                    select = select.disabled();
                }
                if let Some(validator) = validator_for(&c.rules)? {
                    select = select.with_validator(validator);
                }
                select.field().set_error_display(error_display(c)?);
                if let Some(name) = &c.name {
                    select = select.with_name(name);
                    built.selects.insert(name.clone(), select.clone());
                }
                Some(FormNode::control(select))
            }
            WidgetSpec::Autocomplete(c) => {
                let id = resolve_id(cx, c.id.as_deref(), "autocomplete", ids)?;
                let min_chars = parse_number_attr::<usize>(
                    "min-search-chars",
                    c.attr("min-search-chars"),
                )?
                .unwrap_or(cx.config().min_search_chars);
                let mut autocomplete = Autocomplete::with_id(id, c.flag("multiple"))
                    .with_options(c.options.clone())
                    .with_min_search_chars(min_chars);
                if let Some(label) = &c.label {
                    autocomplete = autocomplete.with_label(label);
                }
                if let Some(placeholder) = c.attr("placeholder") {
                    autocomplete = autocomplete.with_placeholder(placeholder);
                }
                if c.flag("required") {
                    autocomplete = autocomplete.required();
                }
                if c.flag("disabled") {
                    autocomplete = autocomplete.disabled();
                }
                if let Some(validator) = validator_for(&c.rules)? {
                    autocomplete = autocomplete.with_validator(validator);
                }
                autocomplete.field().set_error_display(error_display(c)?);
                if let Some(name) = &c.name {
                    autocomplete = autocomplete.with_name(name);
                    built.autocompletes.insert(name.clone(), autocomplete.clone());
                }
                Some(FormNode::control(autocomplete))
            }
            WidgetSpec::Checkbox(c) => {
                let id = resolve_id(cx, c.id.as_deref(), "checkbox", ids)?;
                let mut checkbox = Checkbox::with_id(id);
                if let Some(label) = &c.label {
                    checkbox = checkbox.with_label(label);
                }
                if let Some(value) = c.attr("value") {
                    checkbox = checkbox.with_value(value);
                }
                if c.flag("checked") {
                    checkbox = checkbox.checked();
                }
                if c.flag("indeterminate") {
                    checkbox.set_indeterminate(true);
                }
                if c.flag("disabled") {
                    checkbox = checkbox.disabled();
                }
                if let Some(name) = &c.name {
                    checkbox = checkbox.with_name(name);
                    built.checkboxes.insert(name.clone(), checkbox.clone());
                }
                Some(FormNode::control(checkbox))
            }
            WidgetSpec::Radio(c) => {
                let id = resolve_id(cx, c.id.as_deref(), "radio", ids)?;
                let name = c.name.clone().unwrap_or_default();
                let mut radio = Radio::with_id(cx, id, name.clone(), c.attr("value").unwrap_or(""));
                if let Some(label) = &c.label {
                    radio = radio.with_label(label);
                }
                if c.flag("disabled") {
                    radio = radio.disabled();
                }
                if c.flag("checked") {
                    radio.set_checked(true, cx);
                }
                built.radios.entry(name).or_default().push(radio.clone());
                Some(FormNode::control(radio))
            }
            WidgetSpec::Button(c) => {
                let id = resolve_id(cx, c.id.as_deref(), "button", ids)?;
                let kind = match c.attr("type") {
                    None => ButtonKind::Button,
                    Some(raw) => parse_enum::<ButtonKind>("type", raw)?,
                };
                let mut button =
                    Button::with_id(id, c.label.clone().unwrap_or_default()).with_kind(kind);
                if c.flag("disabled") {
                    button = button.disabled();
                }
                built.buttons.push(button);
                None
            }
            WidgetSpec::Toast(c) => {
                let id = resolve_id(cx, c.id.as_deref(), "toast", ids)?;
                let mut toast = Toast::with_id(id, c.label.clone().unwrap_or_default());
                if let Some(raw) = c.attr("variant") {
                    toast = toast.with_variant(parse_enum::<ToastVariant>("variant", raw)?);
                }
                if let Some(ms) = parse_number_attr::<u64>("duration-ms", c.attr("duration-ms"))? {
                    toast = toast.with_duration(Duration::from_millis(ms));
                }
                if c.flag("persistent") {
                    toast = toast.persistent();
                }
                if c.flag("open") {
                    toast.open(cx);
                }
                built.toasts.push(toast);
                None
            }
            WidgetSpec::Tree(t) => {
                let id = resolve_id(cx, t.id.as_deref(), "tree", ids)?;
                check_tree_ids(&t.nodes, &mut HashSet::new())?;
                let mut tree = Tree::with_id(id.clone())
                    .with_selection_mode(t.selection)
                    .with_nodes(t.nodes.clone())
                    .with_expanded(t.expanded.iter().cloned())
                    .with_selected(t.selected.iter().cloned());
                let key = match &t.name {
                    Some(name) => {
                        tree = tree.with_name(name);
                        name.clone()
                    }
                    None => id.to_string(),
                };
                built.trees.insert(key, tree.clone());
                Some(FormNode::control(tree))
            }
            WidgetSpec::Group { children } => {
                let mut nodes = Vec::with_capacity(children.len());
                for child in children {
                    if let Some(node) = self.build_one(child, built, ids)? {
                        nodes.push(node);
                    }
                }
                Some(FormNode::Group(nodes))
            }
        };
        Ok(node)
    }
}

fn resolve_id(
    cx: &Scope,
    explicit: Option<&str>,
    prefix: &'static str,
    seen: &mut HashSet<String>,
) -> Result<WidgetId, BuildError> {
    match explicit {
        Some(id) => {
            if !seen.insert(id.to_string()) {
                return Err(BuildError::DuplicateId(id.to_string()));
            }
            Ok(WidgetId::new(id))
        }
        None => Ok(cx.next_id(prefix)),
    }
}

fn check_tree_ids(nodes: &[TreeNode], seen: &mut HashSet<String>) -> Result<(), BuildError> {
    for node in nodes {
        if node.id.is_empty() || !seen.insert(node.id.clone()) {
            return Err(BuildError::DuplicateNode(node.id.clone()));
        }
        if let Some(children) = &node.children {
            check_tree_ids(children, seen)?;
        }
    }
    Ok(())
}

fn parse_enum<T: serde::de::DeserializeOwned>(name: &str, raw: &str) -> Result<T, BuildError> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_ascii_lowercase())).map_err(
        |_| BuildError::InvalidAttribute {
            name: name.to_string(),
            value: raw.to_string(),
        },
    )
}

fn error_display(c: &ControlSpec) -> Result<ErrorDisplay, BuildError> {
    match c.attr("error-display") {
        None => Ok(ErrorDisplay::default()),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "below" => Ok(ErrorDisplay::Below),
            "inline" => Ok(ErrorDisplay::Inline),
            "none" => Ok(ErrorDisplay::None),
            _ => Err(BuildError::InvalidAttribute {
                name: "error-display".to_string(),
                value: raw.to_string(),
            }),
        },
    }
}

fn validator_for(rules: &[RuleSpec]) -> Result<Option<Validator>, BuildError> {
    let mut validators = rules
        .iter()
        .map(rule_validator)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(match validators.len() {
        0 => None,
        1 => validators.pop(),
        _ => Some(Validator::all(validators)),
    })
}

fn rule_validator(rule: &RuleSpec) -> Result<Validator, BuildError> {
    let value = rule.value.as_deref();
    let message = |default: String| rule.message.clone().unwrap_or(default);
    let validator = match rule.rule.as_str() {
        "required" => Validator::required(message("This field is required".to_string())),
        "min_length" => {
            let min = required_number(&rule.rule, value)?;
            Validator::min_length(min, message(format!("Must be at least {} characters", min)))
        }
        "max_length" => {
            let max = required_number(&rule.rule, value)?;
            Validator::max_length(max, message(format!("Must be at most {} characters", max)))
        }
        "pattern" => {
            let pattern = value.unwrap_or_default();
            Validator::pattern(pattern, message("Invalid format".to_string())).map_err(|_| {
                BuildError::InvalidAttribute {
                    name: "pattern".to_string(),
                    value: pattern.to_string(),
                }
            })?
        }
        "email" => Validator::email(message("Please enter a valid email".to_string())),
        other => return Err(BuildError::UnknownRule(other.to_string())),
    };
    Ok(validator)
}

fn required_number(name: &str, value: Option<&str>) -> Result<usize, BuildError> {
    parse_number_attr::<usize>(name, value)?.ok_or_else(|| BuildError::InvalidAttribute {
        name: name.to_string(),
        value: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_rule_is_rejected() {
        let rules = vec![RuleSpec {
            rule: "palindrome".to_string(),
            value: None,
            message: None,
        }];
        assert!(matches!(
            validator_for(&rules),
            Err(BuildError::UnknownRule(name)) if name == "palindrome"
        ));
    }

    #[test]
    fn test_parse_enum_attr() {
        assert_eq!(
            parse_enum::<ButtonKind>("type", " Submit ").unwrap(),
            ButtonKind::Submit
        );
        assert!(parse_enum::<ToastVariant>("variant", "loud").is_err());
    }
}
