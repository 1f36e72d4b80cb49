use formkit::prelude::*;

fn checked_count(radios: &[&Radio]) -> usize {
    radios.iter().filter(|r| r.is_checked()).count()
}

// =============================================================================
// Exclusivity
// =============================================================================

#[test]
fn test_check_unchecks_sibling() {
    let cx = Scope::new();
    let a = Radio::new(&cx, "g", "a");
    let b = Radio::new(&cx, "g", "b");

    assert!(a.check(&cx));
    assert!(b.check(&cx));
    assert!(!a.is_checked());
    assert!(b.is_checked());
    assert_eq!(cx.radios().checked_in("g"), vec![b.id().clone()]);
}

#[test]
fn test_at_most_one_checked_after_any_sequence() {
    let cx = Scope::new();
    let radios: Vec<Radio> = (0..4)
        .map(|i| Radio::new(&cx, "g", format!("v{}", i)))
        .collect();
    let refs: Vec<&Radio> = radios.iter().collect();

    for step in [0, 2, 2, 1, 3, 0, 1, 1, 3, 2] {
        radios[step].check(&cx);
        assert!(checked_count(&refs) <= 1);
        assert!(radios[step].is_checked());
    }

    radios[1].set_checked(true, &cx);
    assert_eq!(checked_count(&refs), 1);
}

#[test]
fn test_groups_are_independent() {
    let cx = Scope::new();
    let a = Radio::new(&cx, "size", "s");
    let b = Radio::new(&cx, "color", "red");

    a.check(&cx);
    b.check(&cx);
    assert!(a.is_checked());
    assert!(b.is_checked());
}

#[test]
fn test_scopes_are_independent() {
    let first = Scope::new();
    let second = Scope::new();
    let a = Radio::new(&first, "g", "a");
    let b = Radio::new(&second, "g", "b");

    a.check(&first);
    b.check(&second);
    assert!(a.is_checked());
    assert!(b.is_checked());
}

#[test]
fn test_disabled_radio_cannot_check() {
    let cx = Scope::new();
    let a = Radio::new(&cx, "g", "a");
    let b = Radio::new(&cx, "g", "b").disabled();
    a.check(&cx);

    assert!(!b.check(&cx));
    assert_eq!(b.on_click(ClickTarget::HitArea, &cx), EventResult::Ignored);
    assert!(a.is_checked());
    assert!(!b.is_checked());
}

#[test]
fn test_check_emits_change_then_input() {
    let cx = Scope::new();
    let a = Radio::new(&cx, "g", "a");
    a.check(&cx);

    let events = cx.drain_events();
    let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![WidgetEventKind::Change, WidgetEventKind::Input]);
    assert!(matches!(events[0].detail, EventDetail::Checked(true)));

    // Already checked: nothing happens.
    assert!(!a.check(&cx));
    assert!(cx.drain_events().is_empty());
}

// =============================================================================
// Renaming
// =============================================================================

#[test]
fn test_rename_reconciles_on_next_check() {
    let cx = Scope::new();
    let a = Radio::new(&cx, "old", "a");
    let b = Radio::new(&cx, "old", "b");
    let c = Radio::new(&cx, "new", "c");

    a.check(&cx);
    c.check(&cx);
    a.set_name("new");

    // The rename alone unchecks nothing.
    assert!(a.is_checked());
    assert!(c.is_checked());

    // `a` is no longer named "old", so the old group leaves it alone.
    b.check(&cx);
    assert!(b.is_checked());
    assert!(a.is_checked());

    let d = Radio::with_id(&cx, "d", "new", "d");
    d.check(&cx);
    assert!(!a.is_checked());
    assert!(!c.is_checked());
    assert_eq!(cx.radios().checked_in("new"), vec![WidgetId::new("d")]);
    assert!(b.is_checked());
}

#[test]
fn test_renamed_checked_radio_leaves_one_checked() {
    let cx = Scope::new();
    let a = Radio::with_id(&cx, "a", "old", "a");
    let d = Radio::with_id(&cx, "d", "new", "d");

    a.check(&cx);
    a.set_name("new");
    d.check(&cx);

    let checked: Vec<_> = a
        .group(&cx)
        .into_iter()
        .filter(|r| r.name() == "new" && r.is_checked())
        .map(|r| r.id().clone())
        .collect();
    assert_eq!(checked, vec![WidgetId::new("d")]);
    assert_eq!(cx.radios().group_len("old"), 0);
    assert_eq!(cx.radios().group_len("new"), 2);
}

#[test]
fn test_dropped_radio_leaves_group() {
    let cx = Scope::new();
    let a = Radio::new(&cx, "g", "a");
    {
        let b = Radio::new(&cx, "g", "b");
        b.check(&cx);
        assert_eq!(cx.radios().group_len("g"), 2);
    }
    a.check(&cx);
    assert_eq!(cx.radios().group_len("g"), 1);
}

// =============================================================================
// Keyboard and pointer
// =============================================================================

#[test]
fn test_hit_area_click_delegates() {
    let cx = Scope::new();
    let a = Radio::new(&cx, "g", "a");
    assert!(a.on_click(ClickTarget::HitArea, &cx).is_handled());
    assert!(a.is_checked());
}

#[test]
fn test_arrows_move_check_and_skip_disabled() {
    let cx = Scope::new();
    let a = Radio::new(&cx, "g", "a");
    let b = Radio::new(&cx, "g", "b").disabled();
    let c = Radio::new(&cx, "g", "c");
    a.check(&cx);

    a.on_key(&KeyCombo::key(Key::Down), &cx);
    assert!(c.is_checked());
    assert!(!a.is_checked());
    assert!(!b.is_checked());

    // Wraps from the last member back to the first.
    c.on_key(&KeyCombo::key(Key::Right), &cx);
    assert!(a.is_checked());

    a.on_key(&KeyCombo::key(Key::Up), &cx);
    assert!(c.is_checked());
}

#[test]
fn test_roving_tabindex() {
    let cx = Scope::new();
    let a = Radio::new(&cx, "g", "a");
    let b = Radio::new(&cx, "g", "b");

    assert_eq!(a.aria(&cx).get("tabindex"), Some("0"));
    assert_eq!(b.aria(&cx).get("tabindex"), Some("-1"));

    b.check(&cx);
    assert_eq!(a.aria(&cx).get("tabindex"), Some("-1"));
    assert_eq!(b.aria(&cx).get("tabindex"), Some("0"));
    assert_eq!(b.aria(&cx).get("aria-checked"), Some("true"));
}
