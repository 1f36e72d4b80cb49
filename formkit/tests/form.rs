use formkit::error::ResetError;
use formkit::form::ControlKind;
use formkit::prelude::*;

fn submitted(cx: &Scope, kind: WidgetEventKind) -> Option<FormData> {
    cx.drain_events().into_iter().find_map(|e| match e.detail {
        EventDetail::Data(data) if e.kind == kind => Some(data),
        _ => None,
    })
}

// =============================================================================
// collect_values
// =============================================================================

#[test]
fn test_collect_text_and_checkbox() {
    let cx = Scope::new();
    let email = Input::new(&cx).with_name("email").with_value("a@b.c");
    let agree = Checkbox::new(&cx).with_name("agree").checked();
    let form = Form::new(&cx).with_nodes(vec![email.into(), agree.into()]);

    let data = form.collect_values();
    assert_eq!(data.get("email"), Some(&FormValue::Text("a@b.c".to_string())));
    assert_eq!(data.get("agree"), Some(&FormValue::Bool(true)));
    assert_eq!(
        serde_json::to_string(&data).unwrap(),
        r#"{"email":"a@b.c","agree":true}"#
    );
}

#[test]
fn test_unchecked_checkbox_is_false() {
    let cx = Scope::new();
    let agree = Checkbox::new(&cx).with_name("agree");
    let form = Form::new(&cx).with_nodes(vec![agree.into()]);
    assert_eq!(form.collect_values().get("agree"), Some(&FormValue::Bool(false)));
}

#[test]
fn test_only_checked_radio_contributes() {
    let cx = Scope::new();
    let small = Radio::new(&cx, "size", "s");
    let large = Radio::new(&cx, "size", "l");
    let form = Form::new(&cx).with_nodes(vec![small.clone().into(), large.clone().into()]);

    assert!(!form.collect_values().contains("size"));

    large.check(&cx);
    assert_eq!(
        form.collect_values().get("size"),
        Some(&FormValue::Text("l".to_string()))
    );
}

#[test]
fn test_nested_groups_are_walked() {
    let cx = Scope::new();
    let first = Input::new(&cx).with_name("first").with_value("Ada");
    let last = Input::new(&cx).with_name("last").with_value("Lovelace");
    let tags = Select::new_multiple(&cx)
        .with_name("tags")
        .with_options(vec![
            SelectOption::new("Math", "math"),
            SelectOption::new("Code", "code"),
        ])
        .with_value(vec!["code"]);

    let form = Form::new(&cx).with_nodes(vec![
        first.into(),
        FormNode::Group(vec![FormNode::Group(vec![last.into()]), tags.into()]),
    ]);

    let data = form.collect_values();
    let names: Vec<&str> = data.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["first", "last", "tags"]);
    assert_eq!(
        data.get("tags"),
        Some(&FormValue::List(vec!["code".to_string()]))
    );
}

#[test]
fn test_duplicate_name_last_wins() {
    let cx = Scope::new();
    let a = Input::new(&cx).with_name("x").with_value("first");
    let b = Input::new(&cx).with_name("x").with_value("second");
    let form = Form::new(&cx).with_nodes(vec![a.into(), b.into()]);

    let data = form.collect_values();
    assert_eq!(data.len(), 1);
    assert_eq!(data.get("x"), Some(&FormValue::Text("second".to_string())));
}

#[test]
fn test_unnamed_controls_skipped() {
    let cx = Scope::new();
    let anon = Input::new(&cx).with_value("ignored");
    let form = Form::new(&cx).with_nodes(vec![anon.into()]);
    assert!(form.collect_values().is_empty());
}

#[test]
fn test_tree_contributes_selection() {
    let cx = Scope::new();
    let tree = Tree::new(&cx)
        .with_name("folders")
        .with_selection_mode(SelectionMode::Multiple)
        .with_nodes(vec![TreeNode::new("a", "A"), TreeNode::new("b", "B")]);
    tree.select("b", &cx);
    tree.select("a", &cx);

    let form = Form::new(&cx).with_nodes(vec![tree.into()]);
    assert_eq!(
        form.collect_values().get("folders"),
        Some(&FormValue::List(vec!["a".to_string(), "b".to_string()]))
    );
}

// =============================================================================
// submit / clear / delete
// =============================================================================

#[test]
fn test_submit_collects_fresh_values() {
    let cx = Scope::new();
    let name = Input::new(&cx).with_name("name");
    let form = Form::new(&cx).with_nodes(vec![name.clone().into()]);

    name.input("one", &cx);
    form.submit(&cx);
    let first = submitted(&cx, WidgetEventKind::Submit).unwrap();
    assert_eq!(first.get("name"), Some(&FormValue::Text("one".to_string())));

    name.input("two", &cx);
    form.submit(&cx);
    let second = submitted(&cx, WidgetEventKind::Submit).unwrap();
    assert_eq!(second.get("name"), Some(&FormValue::Text("two".to_string())));
}

#[test]
fn test_clear_resets_every_control() {
    let cx = Scope::new();
    let name = Input::new(&cx)
        .with_name("name")
        .with_validator(Validator::text(|v| v.len() > 3, "too short"));
    let agree = Checkbox::new(&cx).with_name("agree").checked();
    let size = Radio::new(&cx, "size", "m");
    let city = Autocomplete::new(&cx)
        .with_name("city")
        .with_options(vec![SelectOption::new("Berlin", "berlin")]);

    name.input("ab", &cx);
    size.check(&cx);
    city.select_value("berlin", &cx);

    let form = Form::new(&cx).with_nodes(vec![
        name.clone().into(),
        agree.clone().into(),
        size.clone().into(),
        city.clone().into(),
    ]);
    cx.drain_events();
    let data = form.clear(&cx);

    assert_eq!(name.value(), "");
    assert_eq!(name.is_valid(), Validity::Unset);
    assert!(!agree.is_checked());
    assert!(!size.is_checked());
    assert!(city.value().is_empty());
    assert_eq!(city.search(), "");

    assert_eq!(data.get("agree"), Some(&FormValue::Bool(false)));
    assert!(!data.contains("size"));
    assert!(submitted(&cx, WidgetEventKind::Clear).is_some());
}

#[derive(Debug)]
struct Stubborn;

impl FormControl for Stubborn {
    fn control_id(&self) -> WidgetId {
        WidgetId::new("stubborn")
    }

    fn control_name(&self) -> String {
        "stubborn".to_string()
    }

    fn control_kind(&self) -> ControlKind {
        ControlKind::Value
    }

    fn form_value(&self) -> FormValue {
        FormValue::Text("still here".to_string())
    }

    fn reset(&self) -> Result<(), ResetError> {
        Err(ResetError::UnexpectedTarget {
            control: "stubborn".to_string(),
            detail: "index is not a number".to_string(),
        })
    }
}

#[test]
fn test_clear_skips_failing_reset() {
    let cx = Scope::new();
    let name = Input::new(&cx).with_name("name").with_value("x");
    let form = Form::new(&cx).with_nodes(vec![FormNode::control(Stubborn), name.clone().into()]);

    let data = form.clear(&cx);
    assert_eq!(name.value(), "");
    assert_eq!(
        data.get("stubborn"),
        Some(&FormValue::Text("still here".to_string()))
    );
}

#[test]
fn test_buttons_drive_form() {
    let cx = Scope::new();
    let name = Input::new(&cx).with_name("name").with_value("x");
    let form = Form::new(&cx).with_nodes(vec![name.clone().into()]);

    let save = Button::new(&cx, "Save").with_kind(ButtonKind::Submit);
    let reset = Button::new(&cx, "Reset").with_kind(ButtonKind::Reset);
    let remove = Button::new(&cx, "Delete").with_kind(ButtonKind::Delete);
    let off = Button::new(&cx, "Off").with_kind(ButtonKind::Submit).disabled();

    assert!(form.activate(&save, &cx));
    assert!(submitted(&cx, WidgetEventKind::Submit).is_some());

    assert!(form.activate(&remove, &cx));
    let deleted = submitted(&cx, WidgetEventKind::Delete).unwrap();
    assert_eq!(deleted.get("name"), Some(&FormValue::Text("x".to_string())));

    assert!(form.activate(&reset, &cx));
    assert_eq!(name.value(), "");
    assert!(submitted(&cx, WidgetEventKind::Clear).is_some());

    assert!(!form.activate(&off, &cx));
    assert!(cx.drain_events().is_empty());
}

#[test]
fn test_form_validity() {
    let cx = Scope::new();
    let name = Input::new(&cx)
        .with_name("name")
        .with_validator(Validator::text(|v| v.len() >= 2, "short"));
    let form = Form::new(&cx).with_nodes(vec![name.clone().into()]);

    assert!(form.is_valid());
    name.input("a", &cx);
    assert!(!form.is_valid());
    name.input("ab", &cx);
    assert!(form.is_valid());
}
