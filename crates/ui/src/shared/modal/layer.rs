use super::container::ModalContainer;
use ds_contracts::modal::ModalId;
use leptos::prelude::*;
use std::sync::Arc;

/// The render tree modal containers are attached to.
pub trait OverlayLayer: Send + Sync {
    /// Append a container above everything attached so far.
    fn attach(&self, container: Arc<ModalContainer>);

    /// The modal started closing; its exit transition may play.
    fn begin_exit(&self, _id: &ModalId) {}

    /// Remove the container from the render tree. Unknown ids are ignored.
    fn detach(&self, id: &ModalId);
}

/// Layer rendered by [`ModalOutlet`](crate::layout::ModalOutlet).
#[derive(Clone, Copy)]
pub struct SignalOverlayLayer {
    mounted: RwSignal<Vec<Arc<ModalContainer>>>,
    exiting: RwSignal<Vec<ModalId>>,
}

impl SignalOverlayLayer {
    pub fn new() -> Self {
        Self {
            mounted: RwSignal::new(Vec::new()),
            exiting: RwSignal::new(Vec::new()),
        }
    }

    /// Attached containers, bottom to top (tracked).
    pub fn mounted(&self) -> Vec<Arc<ModalContainer>> {
        self.mounted.get()
    }

    /// Whether `id` is playing its exit transition (tracked).
    pub fn is_exiting(&self, id: &ModalId) -> bool {
        self.exiting.with(|ids| ids.contains(id))
    }

    /// Live stacking position of `id`, 0 at the bottom (tracked).
    pub fn position(&self, id: &ModalId) -> Option<usize> {
        self.mounted
            .with(|mounted| mounted.iter().position(|c| c.id() == id))
    }

    /// Topmost container that is not already on its way out.
    pub fn topmost(&self) -> Option<Arc<ModalContainer>> {
        let exiting = self.exiting.get_untracked();
        self.mounted.with_untracked(|mounted| {
            mounted
                .iter()
                .rev()
                .find(|c| !exiting.contains(c.id()))
                .cloned()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.with(|mounted| mounted.is_empty())
    }
}

impl Default for SignalOverlayLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayLayer for SignalOverlayLayer {
    fn attach(&self, container: Arc<ModalContainer>) {
        self.mounted.update(|mounted| mounted.push(container));
    }

    fn begin_exit(&self, id: &ModalId) {
        let id = id.clone();
        self.exiting.update(|ids| {
            if !ids.contains(&id) {
                ids.push(id);
            }
        });
    }

    fn detach(&self, id: &ModalId) {
        self.mounted.update(|mounted| mounted.retain(|c| c.id() != id));
        self.exiting.update(|ids| ids.retain(|e| e != id));
    }
}
