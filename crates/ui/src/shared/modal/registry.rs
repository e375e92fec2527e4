use super::lock;
use super::reference::ModalRef;
use ds_contracts::modal::{ModalId, ModalState};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Result-type-erased side of a modal handle.
pub(crate) trait ModalEntry: Send + Sync {
    fn id(&self) -> &ModalId;
    fn state(&self) -> ModalState;
    fn dismiss(&self);
    fn mark_closed(&self);
    fn as_any(&self) -> &dyn Any;
}

impl<R: Clone + Send + 'static> ModalEntry for ModalRef<R> {
    fn id(&self) -> &ModalId {
        ModalRef::id(self)
    }

    fn state(&self) -> ModalState {
        ModalRef::state(self)
    }

    fn dismiss(&self) {
        self.close(None);
    }

    fn mark_closed(&self) {
        self.inner().advance(ModalState::Closed);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A modal currently in the registry, whatever its result type.
#[derive(Clone)]
pub struct OpenModal {
    entry: Arc<dyn ModalEntry>,
}

impl OpenModal {
    pub(crate) fn new<R: Clone + Send + 'static>(modal_ref: ModalRef<R>) -> Self {
        Self {
            entry: Arc::new(modal_ref),
        }
    }

    pub fn id(&self) -> &ModalId {
        self.entry.id()
    }

    pub fn state(&self) -> ModalState {
        self.entry.state()
    }

    /// Close without a result.
    pub fn close(&self) {
        self.entry.dismiss();
    }

    /// Recover the typed handle when `R` is the modal's result type.
    pub fn downcast<R: Clone + Send + 'static>(&self) -> Option<ModalRef<R>> {
        self.entry.as_any().downcast_ref::<ModalRef<R>>().cloned()
    }

    pub(crate) fn mark_closed(&self) {
        self.entry.mark_closed();
    }
}

impl fmt::Debug for OpenModal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenModal")
            .field("id", self.id())
            .field("state", &self.state())
            .finish()
    }
}

/// Modals that are opening, open or closing, in the order they were opened.
///
/// Entries are removed as soon as their modal starts closing, so a `Closed`
/// modal is never listed.
#[derive(Default)]
pub struct ModalRegistry {
    entries: Mutex<Vec<OpenModal>>,
}

impl ModalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, modal: OpenModal) {
        lock(&self.entries).push(modal);
    }

    /// Remove by id. Removing an absent id is a no-op.
    pub(crate) fn remove(&self, id: &ModalId) -> bool {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|m| m.id() != id);
        entries.len() != before
    }

    pub fn find(&self, id: &str) -> Option<OpenModal> {
        lock(&self.entries)
            .iter()
            .find(|m| m.id() == id)
            .cloned()
    }

    /// Copy of the current entries; safe to iterate while closing them.
    pub fn snapshot(&self) -> Vec<OpenModal> {
        lock(&self.entries).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}
