//! Per-scope registry of radio groups.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use crate::ids::WidgetId;

use super::state::RadioInner;

/// Weak reference to a registered radio.
#[derive(Debug, Clone)]
pub(super) struct RadioHandle {
    pub id: WidgetId,
    pub inner: Weak<RwLock<RadioInner>>,
    pub dirty: Weak<AtomicBool>,
}

impl RadioHandle {
    fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Current group name, or `None` once the radio is gone.
    fn current_name(&self) -> Option<String> {
        let inner = self.inner.upgrade()?;
        let guard = inner.read().ok()?;
        Some(guard.name.clone())
    }

    fn is(&self, inner: &Arc<RwLock<RadioInner>>) -> bool {
        std::ptr::eq(self.inner.as_ptr(), Arc::as_ptr(inner))
    }

    /// Force the radio unchecked. Returns true if it was checked.
    pub fn uncheck(&self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let was_checked = match inner.write() {
            Ok(mut guard) => std::mem::replace(&mut guard.checked, false),
            Err(_) => false,
        };
        if was_checked && let Some(dirty) = self.dirty.upgrade() {
            dirty.store(true, Ordering::SeqCst);
        }
        was_checked
    }
}

/// Radios of one scope, filed by group name.
///
/// Entries are weak, so dropping a radio removes it from its group. Every
/// lookup first prunes dead entries and re-files renamed radios under
/// their current name, so a group is always exactly the live radios that
/// carry that name.
#[derive(Debug, Clone, Default)]
pub struct RadioRegistry {
    groups: Arc<Mutex<HashMap<String, Vec<RadioHandle>>>>,
}

impl RadioRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<RadioHandle>>> {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// File a radio under a group name.
    pub(super) fn register(&self, name: &str, handle: RadioHandle) {
        self.lock().entry(name.to_string()).or_default().push(handle);
    }

    /// Drop dead entries and move renamed radios to their current group.
    fn refile(groups: &mut HashMap<String, Vec<RadioHandle>>) {
        let mut moved = Vec::new();
        for (filed, members) in groups.iter_mut() {
            members.retain(|handle| match handle.current_name() {
                None => false,
                Some(name) if name == *filed => true,
                Some(name) => {
                    log::trace!("[radio] {} moves from '{}' to '{}'", handle.id, filed, name);
                    moved.push((name, handle.clone()));
                    false
                }
            });
        }
        for (name, handle) in moved {
            groups.entry(name).or_default().push(handle);
        }
        groups.retain(|_, members| !members.is_empty());
    }

    /// Live members of a group in registration order (renamed radios join
    /// at the end).
    pub(super) fn members(&self, name: &str) -> Vec<RadioHandle> {
        let mut groups = self.lock();
        Self::refile(&mut groups);
        groups.get(name).cloned().unwrap_or_default()
    }

    /// Live members of a group other than `inner`.
    pub(super) fn siblings(&self, name: &str, inner: &Arc<RwLock<RadioInner>>) -> Vec<RadioHandle> {
        self.members(name)
            .into_iter()
            .filter(|h| !h.is(inner))
            .collect()
    }

    /// Number of live radios filed under a group name.
    pub fn group_len(&self, name: &str) -> usize {
        self.members(name).len()
    }

    /// Ids of the checked members of a group.
    pub fn checked_in(&self, name: &str) -> Vec<WidgetId> {
        self.members(name)
            .into_iter()
            .filter(|h| {
                h.inner
                    .upgrade()
                    .and_then(|inner| inner.read().ok().map(|g| g.checked))
                    .unwrap_or(false)
            })
            .map(|h| h.id)
            .collect()
    }
}
