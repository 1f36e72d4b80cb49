use std::time::Duration;

use formkit::prelude::*;

fn sample(cx: &Scope) -> Tree {
    Tree::new(cx).with_nodes(vec![
        TreeNode::new("docs", "Docs").with_children(vec![
            TreeNode::new("guide", "Guide").with_children(vec![TreeNode::new("intro", "Intro")]),
            TreeNode::new("api", "API"),
        ]),
        TreeNode::new("lazy", "Lazy").loadable(),
        TreeNode::new("locked", "Locked")
            .with_children(vec![TreeNode::new("secret", "Secret")])
            .disabled(),
    ])
}

fn key(k: Key) -> KeyCombo {
    KeyCombo::key(k)
}

// =============================================================================
// Lazy loading
// =============================================================================

#[test]
fn test_expand_requests_children() {
    let cx = Scope::new();
    let tree = Tree::new(&cx).with_nodes(vec![TreeNode::new("x", "X").loadable()]);

    let request = tree.toggle_expand("x", &cx).unwrap();
    assert_eq!(request.id(), "x");
    assert!(tree.is_expanded("x"));
    assert!(tree.is_loading("x"));

    let events = cx.drain_events();
    assert!(events.iter().any(|e| matches!(
        &e.detail,
        EventDetail::LoadNeeded(r) if r.id() == "x"
    )));

    request.resolve(vec![TreeNode::new("x1", "Child")]).unwrap();
    assert_eq!(tree.children_of("x"), vec!["x1".to_string()]);
    assert!(tree.is_expanded("x"));
    assert!(!tree.is_loading("x"));
    assert_eq!(tree.visible_ids(), vec!["x".to_string(), "x1".to_string()]);
}

#[test]
fn test_resolve_is_at_most_once() {
    let cx = Scope::new();
    let tree = Tree::new(&cx).with_nodes(vec![TreeNode::new("x", "X").loadable()]);
    let request = tree.expand("x", &cx).unwrap();
    let copy = request.clone();

    request.resolve(vec![TreeNode::new("x1", "One")]).unwrap();
    assert_eq!(
        copy.resolve(vec![TreeNode::new("x2", "Two")]),
        Err(LoadError::AlreadyResolved("x".to_string()))
    );
    assert_eq!(tree.children_of("x"), vec!["x1".to_string()]);
}

#[test]
fn test_unresolved_node_stays_loading() {
    let cx = Scope::new();
    let tree = Tree::new(&cx).with_nodes(vec![TreeNode::new("x", "X").loadable()]);
    drop(tree.expand("x", &cx));

    let flat = tree.visible();
    assert_eq!(flat.len(), 1);
    assert!(flat[0].loading);
    assert!(flat[0].expanded);
    assert_eq!(tree.item_aria("x").unwrap().get("aria-busy"), Some("true"));
}

#[test]
fn test_pending_load_is_coalesced() {
    let cx = Scope::new();
    let tree = Tree::new(&cx).with_nodes(vec![TreeNode::new("x", "X").loadable()]);

    let first = tree.toggle_expand("x", &cx).unwrap();
    tree.toggle_expand("x", &cx);
    assert!(tree.toggle_expand("x", &cx).is_none());
    assert!(tree.is_expanded("x"));

    first.resolve(vec![TreeNode::new("x1", "Child")]).unwrap();
    assert_eq!(tree.children_of("x"), vec!["x1".to_string()]);
}

#[test]
fn test_stale_request_is_discarded() {
    let cx = Scope::new();
    let tree = Tree::new(&cx).with_nodes(vec![TreeNode::new("x", "X").loadable()]);

    let first = tree.expand("x", &cx).unwrap();
    assert!(tree.cancel_load("x"));
    tree.collapse("x", &cx);
    let second = tree.expand("x", &cx).unwrap();

    second.resolve(vec![TreeNode::new("new", "New")]).unwrap();
    assert!(matches!(
        first.resolve(vec![TreeNode::new("old", "Old")]),
        Err(LoadError::Stale { .. })
    ));
    assert_eq!(tree.children_of("x"), vec!["new".to_string()]);
}

#[test]
fn test_failed_load_retries_on_next_expand() {
    let cx = Scope::new();
    let tree = Tree::new(&cx).with_nodes(vec![TreeNode::new("x", "X").loadable()]);

    let request = tree.expand("x", &cx).unwrap();
    request.fail("timeout").unwrap();
    assert!(!tree.is_loading("x"));

    tree.collapse("x", &cx);
    assert!(tree.expand("x", &cx).is_some());
}

#[test]
fn test_request_outliving_tree_is_detached() {
    let cx = Scope::new();
    let request = {
        let tree = Tree::new(&cx).with_nodes(vec![TreeNode::new("x", "X").loadable()]);
        tree.expand("x", &cx).unwrap()
    };
    assert_eq!(
        request.resolve(Vec::new()),
        Err(LoadError::Detached("x".to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn test_spawn_load_applies_children() {
    let cx = Scope::new();
    let tree = Tree::new(&cx).with_nodes(vec![TreeNode::new("x", "X").loadable()]);
    let request = tree.expand("x", &cx).unwrap();

    let task = tree
        .spawn_load(request, |id| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, String>(vec![TreeNode::new(format!("{}-1", id), "Loaded")])
        })
        .unwrap();

    assert_eq!(task.await.unwrap(), Ok(()));
    assert_eq!(tree.children_of("x"), vec!["x-1".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_aborts_spawned_load() {
    let cx = Scope::new();
    let tree = Tree::new(&cx).with_nodes(vec![TreeNode::new("x", "X").loadable()]);
    let request = tree.expand("x", &cx).unwrap();

    let task = tree
        .spawn_load(request, |_| async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, String>(vec![TreeNode::new("late", "Late")])
        })
        .unwrap();
    assert!(tree.cancel_load("x"));

    assert!(task.await.unwrap_err().is_cancelled());
    assert!(tree.children_of("x").is_empty());
}

// =============================================================================
// apply_children
// =============================================================================

#[test]
fn test_apply_children_is_idempotent() {
    let cx = Scope::new();
    let tree = sample(&cx);
    tree.expand("docs", &cx);
    tree.expand("guide", &cx);
    tree.select("intro", &cx);

    let children = vec![TreeNode::new("guide", "Guide"), TreeNode::new("api", "API")];
    assert!(tree.apply_children("docs", children.clone()));
    let expanded = tree.expanded();
    let selected = tree.selected();
    let visible = tree.visible_ids();

    assert!(tree.apply_children("docs", children));
    assert_eq!(tree.expanded(), expanded);
    assert_eq!(tree.selected(), selected);
    assert_eq!(tree.visible_ids(), visible);
    assert_eq!(tree.children_of("docs").len(), 2);
    assert_eq!(tree.children_of("guide"), vec!["intro".to_string()]);
    assert!(tree.is_selected("intro"));
}

#[test]
fn test_apply_children_unknown_node() {
    let cx = Scope::new();
    let tree = sample(&cx);
    assert!(!tree.apply_children("nope", vec![TreeNode::new("a", "A")]));
}

// =============================================================================
// Visibility and selection
// =============================================================================

#[test]
fn test_flattened_order_respects_expansion() {
    let cx = Scope::new();
    let tree = sample(&cx);
    assert_eq!(tree.visible_ids(), vec!["docs", "lazy", "locked"]);

    tree.expand("guide", &cx);
    assert_eq!(tree.visible_ids(), vec!["docs", "lazy", "locked"]);

    tree.expand("docs", &cx);
    assert_eq!(
        tree.visible_ids(),
        vec!["docs", "guide", "intro", "api", "lazy", "locked"]
    );

    let depths: Vec<usize> = tree.visible().iter().map(|n| n.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 1, 0, 0]);
}

#[test]
fn test_disabled_node_ignored() {
    let cx = Scope::new();
    let tree = sample(&cx);

    assert!(tree.toggle_expand("locked", &cx).is_none());
    assert!(!tree.is_expanded("locked"));
    assert!(!tree.select("locked", &cx));
    assert!(!tree.is_selected("locked"));
}

#[test]
fn test_single_selection_replaces() {
    let cx = Scope::new();
    let tree = sample(&cx);
    tree.select("docs", &cx);
    tree.select("lazy", &cx);

    assert_eq!(tree.selected(), vec!["lazy".to_string()]);
    assert_eq!(tree.active_id().as_deref(), Some("lazy"));
}

#[test]
fn test_multiple_selection_toggles() {
    let cx = Scope::new();
    let tree = sample(&cx).with_selection_mode(SelectionMode::Multiple);
    tree.select("docs", &cx);
    tree.select("lazy", &cx);
    assert_eq!(tree.selected(), vec!["docs".to_string(), "lazy".to_string()]);

    tree.select("docs", &cx);
    assert_eq!(tree.selected(), vec!["lazy".to_string()]);
    assert_eq!(tree.aria().get("aria-multiselectable"), Some("true"));
}

#[test]
fn test_select_event_carries_selection() {
    let cx = Scope::new();
    let tree = sample(&cx);
    cx.drain_events();
    tree.select("api", &cx);

    let events = cx.drain_events();
    assert_eq!(events.len(), 1);
    match &events[0].detail {
        EventDetail::Select { id, selected } => {
            assert_eq!(id, "api");
            assert_eq!(selected, &vec!["api".to_string()]);
        }
        other => panic!("unexpected detail {:?}", other),
    }
}

// =============================================================================
// Keyboard
// =============================================================================

#[test]
fn test_active_defaults_to_first_root() {
    let cx = Scope::new();
    let tree = sample(&cx);
    assert_eq!(tree.active_id().as_deref(), Some("docs"));
    assert_eq!(tree.item_aria("docs").unwrap().get("tabindex"), Some("0"));
    assert_eq!(tree.item_aria("lazy").unwrap().get("tabindex"), Some("-1"));
}

#[test]
fn test_right_expands_but_never_collapses() {
    let cx = Scope::new();
    let tree = sample(&cx);

    assert!(tree.on_key(&key(Key::Right), &cx).is_handled());
    assert!(tree.is_expanded("docs"));
    assert!(tree.on_key(&key(Key::Right), &cx).is_handled());
    assert!(tree.is_expanded("docs"));
    assert_eq!(tree.active_id().as_deref(), Some("docs"));
}

#[test]
fn test_left_collapses_but_never_moves_to_parent() {
    let cx = Scope::new();
    let tree = sample(&cx);
    tree.expand("docs", &cx);
    tree.on_key(&key(Key::Down), &cx);
    assert_eq!(tree.active_id().as_deref(), Some("guide"));

    assert!(tree.on_key(&key(Key::Left), &cx).is_handled());
    assert_eq!(tree.active_id().as_deref(), Some("guide"));
    assert!(tree.is_expanded("docs"));
}

#[test]
fn test_up_down_stop_at_ends() {
    let cx = Scope::new();
    let tree = sample(&cx);

    assert!(tree.on_key(&key(Key::Up), &cx).is_handled());
    assert_eq!(tree.active_id().as_deref(), Some("docs"));

    tree.on_key(&key(Key::End), &cx);
    assert_eq!(tree.active_id().as_deref(), Some("locked"));
    assert!(tree.on_key(&key(Key::Down), &cx).is_handled());
    assert_eq!(tree.active_id().as_deref(), Some("locked"));

    tree.on_key(&key(Key::Home), &cx);
    assert_eq!(tree.active_id().as_deref(), Some("docs"));
}

#[test]
fn test_enter_and_space_select() {
    let cx = Scope::new();
    let tree = sample(&cx).with_selection_mode(SelectionMode::Multiple);

    tree.on_key(&key(Key::Enter), &cx);
    assert!(tree.is_selected("docs"));
    tree.on_key(&key(Key::Down), &cx);
    tree.on_key(&key(Key::Space), &cx);
    assert_eq!(tree.selected(), vec!["docs".to_string(), "lazy".to_string()]);
}

#[test]
fn test_collapse_moves_hidden_active_to_parent() {
    let cx = Scope::new();
    let tree = sample(&cx);
    tree.expand("docs", &cx);
    tree.expand("guide", &cx);
    tree.set_active("intro");

    tree.collapse("docs", &cx);
    assert_eq!(tree.active_id().as_deref(), Some("docs"));
}

// =============================================================================
// Pointer
// =============================================================================

#[test]
fn test_click_node_acts_on_clicked_row() {
    let cx = Scope::new();
    let tree = sample(&cx);

    assert!(tree.click_node("lazy", ClickTarget::HitArea, &cx).is_handled());
    assert_eq!(tree.selected(), vec!["lazy".to_string()]);
    assert_eq!(tree.active_id().as_deref(), Some("lazy"));

    assert!(tree.click_node("docs", ClickTarget::Control, &cx).is_handled());
    assert!(tree.is_expanded("docs"));
    assert_eq!(tree.active_id().as_deref(), Some("docs"));
    assert_eq!(tree.selected(), vec!["lazy".to_string()]);

    // Rows under a collapsed parent cannot be clicked.
    assert_eq!(
        tree.click_node("intro", ClickTarget::HitArea, &cx),
        EventResult::Ignored
    );
    assert_eq!(tree.active_id().as_deref(), Some("docs"));
}

#[test]
fn test_click_without_row_uses_active_node() {
    let cx = Scope::new();
    let tree = sample(&cx);
    tree.set_active("lazy");

    assert!(tree.on_click(ClickTarget::HitArea, &cx).is_handled());
    assert_eq!(tree.selected(), vec!["lazy".to_string()]);
}
