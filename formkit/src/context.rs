//! The shared per-root context.

use std::sync::{Arc, RwLock};

use crate::config::ScopeConfig;
use crate::events::WidgetEvent;
use crate::ids::{IdGenerator, WidgetId};
use crate::widgets::radio::RadioRegistry;

/// Inner state for Scope
#[derive(Debug, Default)]
struct ScopeInner {
    /// Pending widget events to dispatch
    pending_events: Vec<WidgetEvent>,
}

/// Context shared by all widgets under one root (a document or a shadow
/// root in DOM terms).
///
/// `Scope` uses interior mutability, so all methods take `&self`, and it is
/// cheap to clone. Widgets keep a clone so timers and spawned tasks can
/// still report events after the triggering handler returned.
///
/// # Example
///
/// ```ignore
/// let cx = Scope::new();
/// let name = Input::new(&cx).with_name("name");
/// name.input("Ada", &cx);
///
/// for event in cx.drain_events() {
///     println!("{} from {}", event.kind.name(), event.widget_id);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Scope {
    inner: Arc<RwLock<ScopeInner>>,
    config: Arc<ScopeConfig>,
    ids: IdGenerator,
    radios: RadioRegistry,
}

impl Scope {
    /// Create a scope with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ScopeConfig::default())
    }

    /// Create a scope with a custom configuration.
    pub fn with_config(config: ScopeConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ScopeInner::default())),
            config: Arc::new(config),
            ids: IdGenerator::new(),
            radios: RadioRegistry::new(),
        }
    }

    /// The scope configuration.
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Allocate the next id for a widget kind.
    pub fn next_id(&self, prefix: &'static str) -> WidgetId {
        self.ids.next(prefix)
    }

    /// The radio group registry for this scope.
    pub fn radios(&self) -> &RadioRegistry {
        &self.radios
    }

    // -------------------------------------------------------------------------
    // Widget event queue
    // -------------------------------------------------------------------------

    /// Push a widget event to the queue.
    pub fn push_event(&self, event: WidgetEvent) {
        log::trace!("[scope] {} from {}", event.kind.name(), event.widget_id);
        match self.inner.write() {
            Ok(mut inner) => inner.pending_events.push(event),
            Err(poisoned) => poisoned.into_inner().pending_events.push(event),
        }
    }

    /// Drain all pending widget events in emission order.
    pub fn drain_events(&self) -> Vec<WidgetEvent> {
        self.inner
            .write()
            .ok()
            .map(|mut inner| std::mem::take(&mut inner.pending_events))
            .unwrap_or_default()
    }

    /// Number of events waiting to be drained.
    pub fn pending_event_count(&self) -> usize {
        self.inner
            .read()
            .map(|inner| inner.pending_events.len())
            .unwrap_or(0)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
