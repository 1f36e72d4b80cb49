use formkit::prelude::*;

fn options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("Red", "red"),
        SelectOption::new("Green", "green").disabled(),
        SelectOption::new("Blue", "blue"),
    ]
}

fn key(k: Key) -> KeyCombo {
    KeyCombo::key(k)
}

// =============================================================================
// Select
// =============================================================================

#[test]
fn test_select_keyboard_flow() {
    let cx = Scope::new();
    let select = Select::new(&cx).with_options(options());

    assert!(select.on_key(&key(Key::Down), &cx).is_handled());
    assert!(select.is_open());
    assert_eq!(select.cursor(), 0);

    select.on_key(&key(Key::End), &cx);
    select.on_key(&key(Key::Enter), &cx);
    assert_eq!(select.value(), FieldValue::Single("blue".to_string()));
    assert!(!select.is_open());
    assert_eq!(select.selected_labels(), vec!["Blue".to_string()]);

    // Reopening puts the cursor on the selection.
    select.open(&cx);
    assert_eq!(select.cursor(), 2);
}

#[test]
fn test_select_home_and_end_jump_cursor() {
    let cx = Scope::new();
    let select = Select::new(&cx).with_options(options());
    select.open(&cx);

    assert!(select.on_key(&key(Key::End), &cx).is_handled());
    assert_eq!(select.cursor(), 2);
    assert!(select.on_key(&key(Key::Home), &cx).is_handled());
    assert_eq!(select.cursor(), 0);

    select.cursor_to(true);
    assert_eq!(select.cursor(), 2);
}

#[test]
fn test_select_skips_disabled_option() {
    let cx = Scope::new();
    let select = Select::new(&cx).with_options(options());
    select.open(&cx);

    assert!(!select.select_index(1, &cx));
    assert!(select.value().is_empty());
    assert!(select.is_open());
}

#[test]
fn test_select_multiple_toggles() {
    let cx = Scope::new();
    let select = Select::new_multiple(&cx).with_options(options());
    select.open(&cx);

    select.select_index(0, &cx);
    select.select_index(2, &cx);
    assert!(select.is_open());
    assert_eq!(
        select.value(),
        FieldValue::Multiple(vec!["red".to_string(), "blue".to_string()])
    );

    select.select_index(0, &cx);
    assert_eq!(select.value(), FieldValue::Multiple(vec!["blue".to_string()]));
    assert_eq!(select.aria().get("aria-expanded"), Some("true"));
}

#[test]
fn test_select_escape_and_blur_close() {
    let cx = Scope::new();
    let select = Select::new(&cx).with_options(options());

    select.open(&cx);
    select.on_key(&key(Key::Escape), &cx);
    assert!(!select.is_open());

    select.open(&cx);
    select.on_blur(false, &cx);
    assert!(!select.is_open());
}

// =============================================================================
// Checkbox
// =============================================================================

#[test]
fn test_checkbox_toggle_clears_indeterminate() {
    let cx = Scope::new();
    let checkbox = Checkbox::new(&cx).with_name("all");
    checkbox.set_indeterminate(true);
    assert_eq!(checkbox.aria().get("aria-checked"), Some("mixed"));

    assert_eq!(checkbox.toggle(&cx), Some(true));
    assert!(!checkbox.is_indeterminate());
    assert_eq!(checkbox.aria().get("aria-checked"), Some("true"));

    let kinds: Vec<_> = cx.drain_events().into_iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![WidgetEventKind::Change, WidgetEventKind::Input]);
}

#[test]
fn test_checkbox_hit_area_and_space() {
    let cx = Scope::new();
    let checkbox = Checkbox::new(&cx);

    assert!(checkbox.on_click(ClickTarget::HitArea, &cx).is_handled());
    assert!(checkbox.is_checked());
    assert!(checkbox.on_key(&key(Key::Space), &cx).is_handled());
    assert!(!checkbox.is_checked());
}

#[test]
fn test_disabled_checkbox_ignores_input() {
    let cx = Scope::new();
    let checkbox = Checkbox::new(&cx).disabled();

    assert_eq!(checkbox.toggle(&cx), None);
    assert_eq!(
        checkbox.on_click(ClickTarget::Control, &cx),
        EventResult::Ignored
    );
    assert!(!checkbox.is_checked());
    assert!(cx.drain_events().is_empty());
}

// =============================================================================
// Button
// =============================================================================

#[test]
fn test_button_activation() {
    let cx = Scope::new();
    let button = Button::new(&cx, "Go");

    assert!(button.on_key(&key(Key::Enter), &cx).is_handled());
    assert!(button.on_key(&key(Key::Space), &cx).is_handled());
    assert_eq!(
        button.on_key(&key(Key::Enter).ctrl(), &cx),
        EventResult::Ignored
    );
    assert_eq!(cx.drain_events().len(), 2);

    button.set_disabled(true);
    assert_eq!(button.on_click(ClickTarget::Control, &cx), EventResult::Ignored);
    assert_eq!(button.aria().get("aria-disabled"), Some("true"));
}

// =============================================================================
// Ids
// =============================================================================

#[test]
fn test_generated_ids_are_deterministic() {
    let first = Scope::new();
    let second = Scope::new();

    let a = Input::new(&first);
    let b = Input::new(&first);
    let c = Input::new(&second);

    assert_ne!(a.id(), b.id());
    assert_eq!(a.id(), c.id());
}
