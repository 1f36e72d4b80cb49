use std::time::Duration;

use formkit::prelude::*;
use formkit::widgets::autocomplete::filter_options;

fn cities() -> Vec<SelectOption> {
    vec![
        SelectOption::new("Berlin", "berlin"),
        SelectOption::new("Hamburg", "hamburg"),
    ]
}

fn key(k: Key) -> KeyCombo {
    KeyCombo::key(k)
}

fn kinds(cx: &Scope) -> Vec<WidgetEventKind> {
    cx.drain_events().into_iter().map(|e| e.kind).collect()
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_filter_is_pure_subset() {
    let options = vec![
        SelectOption::new("Berlin", "berlin"),
        SelectOption::new("Hamburg", "hamburg"),
        SelectOption::new("Bern", "ch-bern"),
        SelectOption::new("Oslo", "no-osl"),
    ];
    for term in ["", "ber", "BER", "no", "zzz", "g"] {
        let first = filter_options(&options, term);
        let second = filter_options(&options, term);
        assert_eq!(first, second);
        assert!(first.iter().all(|&i| i < options.len()));
    }
    // Label or value, case-insensitive substring
    assert_eq!(filter_options(&options, "BER"), vec![0, 2]);
    assert_eq!(filter_options(&options, "no"), vec![3]);
}

#[test]
fn test_typing_filters_and_opens() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx)
        .with_options(cities())
        .with_min_search_chars(1);

    ac.type_text("ber", &cx);
    assert_eq!(ac.state(), DropdownState::OpenFilled);
    let filtered = ac.filtered_options();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].label, "Berlin");
    assert_eq!(ac.focused_index(), None);

    ac.type_text("xyz", &cx);
    assert_eq!(ac.state(), DropdownState::OpenEmpty);
}

#[test]
fn test_min_search_chars_gates_visibility() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx)
        .with_options(cities())
        .with_min_search_chars(2);

    ac.type_text("b", &cx);
    assert_eq!(ac.state(), DropdownState::Closed);

    // Forced open below the threshold shows everything.
    ac.open(&cx);
    assert_eq!(ac.filtered_count(), 2);

    ac.type_text("", &cx);
    assert!(!ac.is_open());
    assert_eq!(
        ac.on_key(&key(Key::Down), &cx),
        EventResult::Consumed
    );
    assert!(!ac.is_open());
}

// =============================================================================
// Roving focus
// =============================================================================

#[test]
fn test_focus_wraps_both_ways() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.open(&cx);

    ac.on_key(&key(Key::Down), &cx);
    assert_eq!(ac.focused_index(), Some(0));
    ac.on_key(&key(Key::Down), &cx);
    assert_eq!(ac.focused_index(), Some(1));
    ac.on_key(&key(Key::Down), &cx);
    assert_eq!(ac.focused_index(), Some(0));
    ac.on_key(&key(Key::Up), &cx);
    assert_eq!(ac.focused_index(), Some(1));
}

#[test]
fn test_focus_on_empty_list_stays_none() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.type_text("nothing matches", &cx);

    ac.focus_next();
    assert_eq!(ac.focused_index(), None);
    ac.focus_prev();
    assert_eq!(ac.focused_index(), None);
}

#[test]
fn test_focus_never_exceeds_candidates() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.open(&cx);
    for _ in 0..7 {
        ac.focus_next();
        let count = ac.filtered_count();
        assert!(ac.focused_index().is_some_and(|i| i < count));
    }
    ac.type_text("ham", &cx);
    assert_eq!(ac.focused_index(), None);
}

#[test]
fn test_up_does_not_open() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.on_key(&key(Key::Up), &cx);
    assert!(!ac.is_open());
}

#[test]
fn test_escape_closes_and_clears_focus() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.open(&cx);
    ac.focus_next();

    assert!(ac.on_key(&key(Key::Escape), &cx).is_handled());
    assert!(!ac.is_open());
    assert_eq!(ac.focused_index(), None);
}

// =============================================================================
// Commit
// =============================================================================

#[test]
fn test_single_commit_mirrors_label() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx)
        .with_options(cities())
        .with_min_search_chars(1);

    ac.type_text("ber", &cx);
    ac.on_key(&key(Key::Down), &cx);
    cx.drain_events();

    assert!(ac.on_key(&key(Key::Enter), &cx).is_handled());
    assert_eq!(ac.value(), FieldValue::Single("berlin".to_string()));
    assert!(!ac.is_open());
    assert_eq!(ac.search(), "Berlin");

    let events = kinds(&cx);
    let change = events.iter().position(|k| *k == WidgetEventKind::Change);
    let input = events.iter().position(|k| *k == WidgetEventKind::Input);
    assert!(matches!((change, input), (Some(c), Some(i)) if c < i));
    assert!(events.contains(&WidgetEventKind::Close));
}

#[test]
fn test_enter_without_focus_is_noop() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.open(&cx);
    cx.drain_events();

    assert_eq!(ac.on_key(&key(Key::Enter), &cx), EventResult::Ignored);
    assert!(ac.value().is_empty());
    assert!(cx.drain_events().is_empty());
}

#[test]
fn test_multi_commit_toggles_and_stays_open() {
    let cx = Scope::new();
    let ac = Autocomplete::new_multiple(&cx).with_options(cities());
    ac.type_text("r", &cx);

    assert!(ac.select_value("berlin", &cx));
    assert!(ac.select_value("hamburg", &cx));
    assert_eq!(
        ac.value(),
        FieldValue::Multiple(vec!["berlin".to_string(), "hamburg".to_string()])
    );
    assert!(ac.is_open());
    assert_eq!(ac.search(), "r");

    assert!(ac.select_value("berlin", &cx));
    assert_eq!(ac.value(), FieldValue::Multiple(vec!["hamburg".to_string()]));

    assert!(ac.remove_value("hamburg", &cx));
    assert!(ac.value().is_empty());
}

#[test]
fn test_disabled_option_not_selectable() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(vec![
        SelectOption::new("Berlin", "berlin").disabled(),
        SelectOption::new("Hamburg", "hamburg"),
    ]);
    ac.open(&cx);
    cx.drain_events();

    assert!(!ac.select_option(0, &cx));
    assert!(ac.value().is_empty());
    assert!(ac.is_open());
    assert!(cx.drain_events().is_empty());
}

#[test]
fn test_typing_does_not_change_value() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.select_value("hamburg", &cx);
    ac.type_text("ber", &cx);
    assert_eq!(ac.value(), FieldValue::Single("hamburg".to_string()));
}

// =============================================================================
// Blur grace
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_blur_closes_after_grace() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.open(&cx);

    ac.on_blur(false, &cx);
    assert!(ac.is_open());
    tokio::time::sleep(cx.config().blur_grace + Duration::from_millis(10)).await;
    assert!(!ac.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_click_during_grace_wins() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.open(&cx);

    ac.on_blur(false, &cx);
    assert!(ac.click_option(1, &cx));
    tokio::time::sleep(cx.config().blur_grace * 2).await;

    assert_eq!(ac.value(), FieldValue::Single("hamburg".to_string()));
    assert!(!ac.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_multi_click_during_grace_still_closes() {
    let cx = Scope::new();
    let ac = Autocomplete::new_multiple(&cx).with_options(cities());
    ac.open(&cx);

    ac.on_blur(false, &cx);
    assert!(ac.click_option(0, &cx));
    assert!(ac.is_open());

    tokio::time::sleep(cx.config().blur_grace * 2).await;
    assert_eq!(ac.value(), FieldValue::Multiple(vec!["berlin".to_string()]));
    assert!(!ac.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_refocus_cancels_blur_close() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.open(&cx);

    ac.on_blur(false, &cx);
    ac.on_focus(&cx);
    tokio::time::sleep(cx.config().blur_grace * 2).await;
    assert!(ac.is_open());
}

#[test]
fn test_blur_within_keeps_open() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.open(&cx);
    ac.on_blur(true, &cx);
    assert!(ac.is_open());
}

#[test]
fn test_blur_without_runtime_closes_now() {
    let cx = Scope::new();
    let ac = Autocomplete::new(&cx).with_options(cities());
    ac.open(&cx);
    ac.on_blur(false, &cx);
    assert!(!ac.is_open());
}

// =============================================================================
// ARIA
// =============================================================================

#[test]
fn test_aria_tracks_state() {
    let cx = Scope::new();
    let ac = Autocomplete::with_id("city", false).with_options(cities());

    let aria = ac.aria();
    assert_eq!(aria.get("role"), Some("combobox"));
    assert_eq!(aria.get("aria-expanded"), Some("false"));
    assert_eq!(aria.get("aria-controls"), Some(ac.id().listbox().as_str()));
    assert!(aria.get("aria-activedescendant").is_none());

    ac.type_text("ham", &cx);
    ac.focus_next();
    let aria = ac.aria();
    assert_eq!(aria.get("aria-expanded"), Some("true"));
    // Hamburg is option 1 in the full list.
    assert_eq!(
        aria.get("aria-activedescendant"),
        Some(ac.id().option(1).as_str())
    );

    ac.select_option(0, &cx);
    let option = ac.option_aria(0).unwrap();
    assert_eq!(option.get("aria-selected"), Some("true"));
}
