//! Deterministic scheduler, layer and content unit for lifecycle tests.

use super::container::ModalContainer;
use super::content::{ModalComponent, ModalContext};
use super::layer::OverlayLayer;
use super::scheduler::{TeardownScheduler, TeardownTask};
use super::ModalRef;
use ds_contracts::modal::ModalId;
use leptos::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Holds scheduled tasks until the test runs them.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: Mutex<Vec<(Duration, TeardownTask)>>,
}

impl ManualScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.tasks.lock().unwrap().iter().map(|(d, _)| *d).collect()
    }

    /// Let the teardown delay elapse: run everything scheduled so far.
    pub fn run_pending(&self) -> usize {
        let tasks: Vec<_> = self.tasks.lock().unwrap().drain(..).collect();
        let count = tasks.len();
        for (_, task) in tasks {
            task();
        }
        count
    }
}

impl TeardownScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: TeardownTask) {
        self.tasks.lock().unwrap().push((delay, task));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerEvent {
    Attached(ModalId),
    Exiting(ModalId),
    Detached(ModalId),
}

/// Records what the manager does to the render tree.
#[derive(Default)]
pub struct RecordingLayer {
    mounted: Mutex<Vec<Arc<ModalContainer>>>,
    events: Mutex<Vec<LayerEvent>>,
}

impl RecordingLayer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn mounted_ids(&self) -> Vec<String> {
        self.mounted
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.id().to_string())
            .collect()
    }

    pub fn container(&self, id: &str) -> Option<Arc<ModalContainer>> {
        self.mounted
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id() == id)
            .cloned()
    }

    pub fn events(&self) -> Vec<LayerEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl OverlayLayer for RecordingLayer {
    fn attach(&self, container: Arc<ModalContainer>) {
        self.events
            .lock()
            .unwrap()
            .push(LayerEvent::Attached(container.id().clone()));
        self.mounted.lock().unwrap().push(container);
    }

    fn begin_exit(&self, id: &ModalId) {
        self.events
            .lock()
            .unwrap()
            .push(LayerEvent::Exiting(id.clone()));
    }

    fn detach(&self, id: &ModalId) {
        self.events
            .lock()
            .unwrap()
            .push(LayerEvent::Detached(id.clone()));
        self.mounted.lock().unwrap().retain(|c| c.id() != id);
    }
}

/// Content unit that remembers what it was given.
pub struct Probe {
    pub data: Option<u32>,
    pub modal_ref: ModalRef<bool>,
    pub destroyed: AtomicUsize,
}

impl ModalComponent for Probe {
    type Data = u32;
    type Output = bool;

    fn create(ctx: ModalContext<u32, bool>) -> Self {
        Self {
            data: ctx.data().copied(),
            modal_ref: ctx.modal_ref().clone(),
            destroyed: AtomicUsize::new(0),
        }
    }

    fn render(self: Arc<Self>) -> AnyView {
        ().into_any()
    }

    fn on_destroy(&self) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}
