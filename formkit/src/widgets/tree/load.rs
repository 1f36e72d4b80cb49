//! Lazy child loading.
//!
//! Expanding a node that declares children it has not received yet issues
//! a [`LoadRequest`]. Each request carries the generation of its node's
//! load slot; resolving applies the children only if no newer request,
//! direct `apply_children` or cancel happened in between.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};

use tokio::task::JoinHandle;

use crate::error::LoadError;
use crate::ids::WidgetId;

use super::arena::TreeNode;
use super::state::{Tree, TreeInner};

/// Book-keeping for one node's loads.
#[derive(Debug, Default)]
pub(super) struct LoadSlot {
    /// Generation of the newest request (or direct apply)
    pub generation: u64,
    /// Whether a request is outstanding
    pub pending: bool,
    /// Task driving the request, when spawned through `Tree::spawn_load`
    pub task: Option<tokio::task::AbortHandle>,
}

/// A request for a node's children.
///
/// Cheap to clone; all clones share one at-most-once guard, so only the
/// first `resolve` or `fail` across clones takes effect. Dropping every
/// clone without resolving leaves the node loading.
#[derive(Clone)]
pub struct LoadRequest {
    id: String,
    generation: u64,
    tree_id: WidgetId,
    consumed: Arc<AtomicBool>,
    inner: Weak<RwLock<TreeInner>>,
    dirty: Weak<AtomicBool>,
}

impl std::fmt::Debug for LoadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadRequest")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("tree_id", &self.tree_id)
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

impl LoadRequest {
    pub(super) fn new(tree: &Tree, id: &str, generation: u64) -> Self {
        Self {
            id: id.to_string(),
            generation,
            tree_id: tree.id().clone(),
            consumed: Arc::new(AtomicBool::new(false)),
            inner: Arc::downgrade(&tree.inner),
            dirty: Arc::downgrade(&tree.dirty),
        }
    }

    /// The node whose children are requested.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Generation this request was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `resolve` or `fail` was already called.
    pub fn is_consumed(&self) -> bool {
        self.consumed.load(Ordering::SeqCst)
    }

    fn tree(&self) -> Result<Tree, LoadError> {
        match (self.inner.upgrade(), self.dirty.upgrade()) {
            (Some(inner), Some(dirty)) => Ok(Tree::from_parts(self.tree_id.clone(), inner, dirty)),
            _ => Err(LoadError::Detached(self.id.clone())),
        }
    }

    fn consume(&self) -> Result<(), LoadError> {
        if self.consumed.swap(true, Ordering::SeqCst) {
            return Err(LoadError::AlreadyResolved(self.id.clone()));
        }
        Ok(())
    }

    /// Deliver the loaded children.
    pub fn resolve(&self, children: Vec<TreeNode>) -> Result<(), LoadError> {
        self.consume()?;
        self.tree()?
            .finish_load(&self.id, self.generation, Some(children))
    }

    /// Report that loading failed. The node stops loading and the next
    /// expansion asks again.
    pub fn fail(&self, message: impl Into<String>) -> Result<(), LoadError> {
        self.consume()?;
        let error = LoadError::Failed {
            id: self.id.clone(),
            message: message.into(),
        };
        log::warn!("[tree] {} {}", self.tree_id, error);
        self.tree()?.finish_load(&self.id, self.generation, None)
    }
}

impl Tree {
    /// Drive a request with an async loader on the current tokio runtime.
    ///
    /// The task is aborted by `cancel_load`. Returns `None` when no runtime
    /// is running.
    pub fn spawn_load<F, Fut>(
        &self,
        request: LoadRequest,
        loader: F,
    ) -> Option<JoinHandle<Result<(), LoadError>>>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Vec<TreeNode>, String>> + Send + 'static,
    {
        let handle = tokio::runtime::Handle::try_current().ok()?;
        let fut = loader(request.id().to_string());
        let id = request.id().to_string();
        let generation = request.generation();

        let task = handle.spawn(async move {
            match fut.await {
                Ok(children) => request.resolve(children),
                Err(message) => request.fail(message),
            }
        });

        if let Ok(mut guard) = self.inner.write()
            && let Some(slot) = guard.loads.get_mut(&id)
            && slot.generation == generation
        {
            slot.task = Some(task.abort_handle());
        }
        Some(task)
    }

    /// Abandon the outstanding request for a node. A later resolve of that
    /// request is rejected as stale. Returns false if nothing was pending.
    pub fn cancel_load(&self, id: &str) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        let Some(slot) = guard.loads.get_mut(id) else {
            return false;
        };
        if !slot.pending {
            return false;
        }
        slot.generation += 1;
        slot.pending = false;
        if let Some(task) = slot.task.take() {
            task.abort();
        }
        drop(guard);
        self.mark_dirty();
        log::debug!("[tree] {} cancelled load of '{}'", self.id(), id);
        true
    }

    /// Whether a load is outstanding for a node.
    pub fn is_loading(&self, id: &str) -> bool {
        self.inner
            .read()
            .map(|g| g.loads.get(id).is_some_and(|s| s.pending))
            .unwrap_or(false)
    }

    fn finish_load(
        &self,
        id: &str,
        generation: u64,
        children: Option<Vec<TreeNode>>,
    ) -> Result<(), LoadError> {
        {
            let Ok(mut guard) = self.inner.write() else {
                return Err(LoadError::Detached(id.to_string()));
            };
            if !guard.arena.contains(id) {
                return Err(LoadError::UnknownNode(id.to_string()));
            }
            let current = guard.loads.get(id).map(|s| s.generation).unwrap_or(0);
            if current != generation {
                log::debug!(
                    "[tree] {} discards stale load of '{}' ({} < {})",
                    self.id(),
                    id,
                    generation,
                    current
                );
                return Err(LoadError::Stale {
                    id: id.to_string(),
                    generation,
                    current,
                });
            }
            if let Some(slot) = guard.loads.get_mut(id) {
                slot.pending = false;
                slot.task = None;
            }
            if let Some(children) = children {
                log::debug!(
                    "[tree] {} loaded {} children for '{}'",
                    self.id(),
                    children.len(),
                    id
                );
                guard.arena.replace_children(id, children);
                guard.prune();
            }
            guard.rebuild_visible();
        }
        self.mark_dirty();
        Ok(())
    }
}
