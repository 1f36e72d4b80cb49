//! State and operations for the Toast widget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::Deserialize;
use tokio::task::JoinHandle;

use crate::aria::AriaAttributes;
use crate::context::Scope;
use crate::events::{EventDetail, WidgetEvent, WidgetEventKind};
use crate::ids::WidgetId;

/// Visual flavor of a toast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    /// Neutral information
    #[default]
    Info,
    /// Something succeeded
    Success,
    /// Something needs attention
    Warning,
    /// Something failed
    Error,
}

/// Why a toast closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The auto-hide timer ran out
    Timeout,
    /// The user dismissed it
    User,
    /// Application code closed it
    Programmatic,
}

/// Internal state for a Toast widget
#[derive(Debug, Default)]
struct ToastInner {
    /// Message text
    message: String,
    /// Visual flavor
    variant: ToastVariant,
    /// Per-toast auto-hide delay; the scope default applies when unset
    duration: Option<Duration>,
    /// Never auto-hide
    persistent: bool,
    /// Whether the toast is showing
    open: bool,
    /// Bumped on every open/close; a timer only fires for its own generation
    generation: u64,
    /// The pending auto-hide timer
    timer: Option<JoinHandle<()>>,
}

/// A transient notification with a cancellable auto-hide timer.
///
/// Opening (re)starts the timer; any close cancels it. At most one timer is
/// pending per toast.
///
/// # Example
///
/// ```ignore
/// let saved = Toast::new(&cx, "Saved").with_variant(ToastVariant::Success);
/// saved.open(&cx);
/// // ... four seconds later (ScopeConfig::toast_duration) it closes itself
/// ```
#[derive(Debug, Clone)]
pub struct Toast {
    /// Unique identifier for this toast instance
    id: WidgetId,
    /// Internal state
    inner: Arc<RwLock<ToastInner>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl Toast {
    /// Create a closed toast with a generated id.
    pub fn new(cx: &Scope, message: impl Into<String>) -> Self {
        Self::with_id(cx.next_id("toast"), message)
    }

    /// Create a closed toast with an explicit id.
    pub fn with_id(id: impl Into<WidgetId>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            inner: Arc::new(RwLock::new(ToastInner {
                message: message.into(),
                ..Default::default()
            })),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the variant.
    pub fn with_variant(self, variant: ToastVariant) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.variant = variant;
        }
        self
    }

    /// Set a custom auto-hide delay for this toast.
    pub fn with_duration(self, duration: Duration) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.duration = Some(duration);
        }
        self
    }

    /// Disable auto-hide.
    pub fn persistent(self) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.persistent = true;
        }
        self
    }

    /// Get the unique ID.
    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    /// Message text.
    pub fn message(&self) -> String {
        self.inner
            .read()
            .map(|g| g.message.clone())
            .unwrap_or_default()
    }

    /// Replace the message text.
    pub fn set_message(&self, message: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.message = message.into();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Visual flavor.
    pub fn variant(&self) -> ToastVariant {
        self.inner.read().map(|g| g.variant).unwrap_or_default()
    }

    /// Whether the toast is showing.
    pub fn is_open(&self) -> bool {
        self.inner.read().map(|g| g.open).unwrap_or(false)
    }

    /// Whether an auto-hide timer is pending.
    pub fn has_pending_timer(&self) -> bool {
        self.inner
            .read()
            .map(|g| g.timer.as_ref().is_some_and(|t| !t.is_finished()))
            .unwrap_or(false)
    }

    /// Show the toast and (re)start its auto-hide timer.
    ///
    /// Emits `open` when the toast was closed. Opening an open toast only
    /// restarts the timer.
    pub fn open(&self, cx: &Scope) {
        let (was_open, generation, delay) = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            let was_open = std::mem::replace(&mut guard.open, true);
            guard.generation += 1;
            if let Some(timer) = guard.timer.take() {
                timer.abort();
            }
            let delay = if guard.persistent {
                None
            } else {
                Some(guard.duration.unwrap_or(cx.config().toast_duration))
            };
            (was_open, guard.generation, delay)
        };
        self.dirty.store(true, Ordering::SeqCst);

        if !was_open {
            log::debug!("[toast] {} opened", self.id);
            cx.push_event(WidgetEvent::new(WidgetEventKind::Open, self.id.clone()));
        }

        if let Some(delay) = delay {
            self.start_timer(generation, delay, cx);
        }
    }

    fn start_timer(&self, generation: u64, delay: Duration, cx: &Scope) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::debug!("[toast] {} has no runtime; auto-hide disabled", self.id);
            return;
        };

        let toast = self.clone();
        let cx = cx.clone();
        let timer = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            toast.close_generation(generation, CloseReason::Timeout, &cx);
        });

        if let Ok(mut guard) = self.inner.write() {
            if guard.generation == generation {
                guard.timer = Some(timer);
            } else {
                timer.abort();
            }
        }
    }

    /// Hide the toast and cancel its timer. Returns false if it was closed.
    pub fn close(&self, reason: CloseReason, cx: &Scope) -> bool {
        let generation = match self.inner.read() {
            Ok(guard) => guard.generation,
            Err(_) => return false,
        };
        self.close_generation(generation, reason, cx)
    }

    fn close_generation(&self, generation: u64, reason: CloseReason, cx: &Scope) -> bool {
        {
            let Ok(mut guard) = self.inner.write() else {
                return false;
            };
            if !guard.open || guard.generation != generation {
                return false;
            }
            guard.open = false;
            guard.generation += 1;
            // Timeout closes run on the timer task itself.
            if let Some(timer) = guard.timer.take()
                && reason != CloseReason::Timeout
            {
                timer.abort();
            }
        }
        self.dirty.store(true, Ordering::SeqCst);
        log::debug!("[toast] {} closed ({:?})", self.id, reason);
        cx.push_event(
            WidgetEvent::new(WidgetEventKind::Close, self.id.clone())
                .with_detail(EventDetail::Close(reason)),
        );
        true
    }

    /// ARIA attributes for the current state.
    pub fn aria(&self) -> AriaAttributes {
        let urgent = matches!(self.variant(), ToastVariant::Warning | ToastVariant::Error);
        let mut aria = AriaAttributes::with_role(if urgent { "alert" } else { "status" });
        aria.set("aria-live", if urgent { "assertive" } else { "polite" })
            .set_bool("aria-hidden", !self.is_open());
        aria
    }

    /// Check if the toast state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
