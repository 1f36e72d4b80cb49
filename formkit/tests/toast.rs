use std::time::Duration;

use formkit::prelude::*;

fn close_reasons(cx: &Scope) -> Vec<CloseReason> {
    cx.drain_events()
        .into_iter()
        .filter_map(|e| match e.detail {
            EventDetail::Close(reason) => Some(reason),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_auto_hide_after_duration() {
    let cx = Scope::new();
    let toast = Toast::new(&cx, "Saved").with_duration(Duration::from_millis(500));

    toast.open(&cx);
    assert!(toast.is_open());
    assert!(toast.has_pending_timer());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(toast.is_open());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!toast.is_open());
    assert!(!toast.has_pending_timer());
    assert_eq!(close_reasons(&cx), vec![CloseReason::Timeout]);
}

#[tokio::test(start_paused = true)]
async fn test_reopen_restarts_timer() {
    let cx = Scope::new();
    let toast = Toast::new(&cx, "Saved").with_duration(Duration::from_millis(500));

    toast.open(&cx);
    tokio::time::sleep(Duration::from_millis(400)).await;
    toast.open(&cx);
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(toast.is_open());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!toast.is_open());

    let events = cx.drain_events();
    let opens = events
        .iter()
        .filter(|e| e.kind == WidgetEventKind::Open)
        .count();
    let closes = events
        .iter()
        .filter(|e| e.kind == WidgetEventKind::Close)
        .count();
    assert_eq!((opens, closes), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn test_manual_close_cancels_timer() {
    let cx = Scope::new();
    let toast = Toast::new(&cx, "Saved").with_duration(Duration::from_millis(500));

    toast.open(&cx);
    assert!(toast.close(CloseReason::Programmatic, &cx));
    assert!(!toast.has_pending_timer());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(close_reasons(&cx), vec![CloseReason::Programmatic]);
    assert!(!toast.close(CloseReason::Programmatic, &cx));
}

#[tokio::test(start_paused = true)]
async fn test_escape_closes_as_user() {
    let cx = Scope::new();
    let toast = Toast::new(&cx, "Oops").with_variant(ToastVariant::Error);
    toast.open(&cx);

    assert!(toast.on_key(&KeyCombo::key(Key::Escape), &cx).is_handled());
    assert!(!toast.is_open());
    assert_eq!(close_reasons(&cx), vec![CloseReason::User]);
}

#[tokio::test(start_paused = true)]
async fn test_persistent_toast_stays() {
    let cx = Scope::new();
    let toast = Toast::new(&cx, "Sticky").persistent();
    toast.open(&cx);

    assert!(!toast.has_pending_timer());
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(toast.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_scope_default_duration() {
    let cx = Scope::with_config(ScopeConfig::new().toast_duration(Duration::from_secs(1)));
    let toast = Toast::new(&cx, "Hello");
    toast.open(&cx);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert!(!toast.is_open());
}

#[test]
fn test_open_without_runtime_has_no_timer() {
    let cx = Scope::new();
    let toast = Toast::new(&cx, "Offline");
    toast.open(&cx);
    assert!(toast.is_open());
    assert!(!toast.has_pending_timer());
}

#[test]
fn test_aria_by_variant() {
    let cx = Scope::new();
    let info = Toast::new(&cx, "FYI");
    let error = Toast::new(&cx, "Broken").with_variant(ToastVariant::Error);

    assert_eq!(info.aria().get("role"), Some("status"));
    assert_eq!(info.aria().get("aria-live"), Some("polite"));
    assert_eq!(error.aria().get("role"), Some("alert"));
    assert_eq!(error.aria().get("aria-live"), Some("assertive"));
}
