use super::container::ModalContainer;
use super::content::{ModalComponent, ModalContentType, ModalContext};
use super::layer::OverlayLayer;
use super::reference::ModalRef;
use super::registry::{ModalRegistry, OpenModal};
use super::scheduler::TeardownScheduler;
use ds_contracts::modal::{ModalConfig, ModalId, ModalOptions};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Time between the logical close and removal from the render tree, so the
/// exit transition can play.
pub const DEFAULT_TEARDOWN_DELAY: Duration = Duration::from_millis(150);

struct ManagerInner {
    registry: ModalRegistry,
    defaults: ModalOptions,
    next_id: AtomicU64,
    teardown_delay: Duration,
    layer: Arc<dyn OverlayLayer>,
    scheduler: Arc<dyn TeardownScheduler>,
}

/// Opens modals, tracks them while they are open and tears them down.
///
/// The manager is the only writer of lifecycle transitions besides the
/// logical close on [`ModalRef`], and the only owner of containers and their
/// content.
#[derive(Clone)]
pub struct ModalManager {
    inner: Arc<ManagerInner>,
}

impl ModalManager {
    pub fn new(layer: Arc<dyn OverlayLayer>, scheduler: Arc<dyn TeardownScheduler>) -> Self {
        Self::with_settings(layer, scheduler, ModalOptions::default(), DEFAULT_TEARDOWN_DELAY)
    }

    pub fn with_settings(
        layer: Arc<dyn OverlayLayer>,
        scheduler: Arc<dyn TeardownScheduler>,
        defaults: ModalOptions,
        teardown_delay: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                registry: ModalRegistry::new(),
                defaults,
                next_id: AtomicU64::new(0),
                teardown_delay,
                layer,
                scheduler,
            }),
        }
    }

    /// Replace the manager-level defaults. Only effective before the
    /// manager is cloned.
    pub fn with_defaults(mut self, defaults: ModalOptions) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.defaults = defaults,
            None => log::warn!("Modal defaults ignored: manager is already shared"),
        }
        self
    }

    pub fn with_teardown_delay(mut self, delay: Duration) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.teardown_delay = delay,
            None => log::warn!("Teardown delay ignored: manager is already shared"),
        }
        self
    }

    pub fn defaults(&self) -> &ModalOptions {
        &self.inner.defaults
    }

    pub fn teardown_delay(&self) -> Duration {
        self.inner.teardown_delay
    }

    /// Open `C` inside a new modal.
    pub fn open<C: ModalComponent>(&self, config: ModalConfig<C::Data>) -> ModalRef<C::Output> {
        self.open_content(ModalContentType::of::<C>(), config)
    }

    /// Open `content` inside a new modal and return its handle.
    ///
    /// Never fails: empty content is logged and shown as bare chrome.
    pub fn open_content<D, R>(
        &self,
        content: ModalContentType<D, R>,
        config: ModalConfig<D>,
    ) -> ModalRef<R>
    where
        D: Send + Sync + 'static,
        R: Clone + Send + Sync + 'static,
    {
        let (options, data) = config.into_parts();
        let chrome = options.merged_over(&self.inner.defaults).resolve();

        let id = ModalId::from_sequence(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let modal_ref = ModalRef::<R>::new(id.clone());
        let ctx = ModalContext::new(modal_ref.clone(), data);

        let on_close_requested = {
            let modal_ref = modal_ref.clone();
            Arc::new(move || modal_ref.dismiss())
        };
        let container = Arc::new(ModalContainer::create(
            id.clone(),
            chrome,
            &content,
            ctx,
            on_close_requested,
        ));

        self.inner.layer.attach(container.clone());
        modal_ref.mark_open();
        log::debug!("Opened modal '{}' with '{}'", id, content.name());

        let entry = OpenModal::new(modal_ref.clone());
        {
            let inner = Arc::downgrade(&self.inner);
            let layer = self.inner.layer.clone();
            let entry = entry.clone();
            modal_ref.install_teardown(Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.teardown(entry, container);
                } else {
                    // Manager is gone: no scheduler left, tear down now.
                    layer.detach(entry.id());
                    container.destroy();
                    entry.mark_closed();
                }
            }));
        }

        if modal_ref.state().is_visible() {
            self.inner.registry.insert(entry);
        }
        modal_ref
    }

    /// Close every open modal without a result.
    pub fn close_all(&self) {
        let modals = self.inner.registry.snapshot();
        log::debug!("Closing {} modal(s)", modals.len());
        for modal in modals {
            modal.close();
        }
    }

    pub fn get_modal_by_id(&self, id: &str) -> Option<OpenModal> {
        self.inner.registry.find(id)
    }

    pub fn get_open_modals(&self) -> Vec<OpenModal> {
        self.inner.registry.snapshot()
    }

    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.registry.is_empty()
    }

    /// End of the manager's life: close whatever is still open.
    pub fn shutdown(&self) {
        if !self.is_empty() {
            log::info!("Shutting down with {} open modal(s)", self.len());
        }
        self.close_all();
    }
}

impl ManagerInner {
    fn teardown(&self, modal: OpenModal, container: Arc<ModalContainer>) {
        let id = modal.id().clone();
        self.registry.remove(&id);
        self.layer.begin_exit(&id);

        let layer = self.layer.clone();
        self.scheduler.schedule(
            self.teardown_delay,
            Box::new(move || {
                layer.detach(&id);
                container.destroy();
                modal.mark_closed();
                log::debug!("Modal '{}' removed", id);
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::modal::test_support::{LayerEvent, ManualScheduler, Probe, RecordingLayer};
    use crate::shared::modal::CloseReason;
    use ds_contracts::modal::{ModalSize, ModalState};
    use leptos::prelude::*;
    use std::sync::Mutex;

    fn manager() -> (ModalManager, Arc<RecordingLayer>, Arc<ManualScheduler>) {
        let layer = RecordingLayer::new();
        let scheduler = ManualScheduler::new();
        let manager = ModalManager::new(layer.clone(), scheduler.clone());
        (manager, layer, scheduler)
    }

    fn record<R: Clone + Send + 'static>(modal: &ModalRef<R>) -> Arc<Mutex<Vec<Option<R>>>> {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        modal.after_closed(move |result| sink.lock().unwrap().push(result));
        calls
    }

    #[test]
    fn test_open_returns_open_handle_with_unique_ids() {
        let (manager, layer, _) = manager();
        let first = manager.open::<Probe>(ModalConfig::new());
        let second = manager.open::<Probe>(ModalConfig::new());

        assert_eq!(first.id(), "modal-0");
        assert_eq!(second.id(), "modal-1");
        assert_eq!(first.state(), ModalState::Open);
        assert_eq!(manager.len(), 2);
        assert_eq!(layer.mounted_ids(), vec!["modal-0", "modal-1"]);
    }

    #[test]
    fn test_registry_tracks_opens_minus_closes() {
        let (manager, _, scheduler) = manager();
        let handles: Vec<_> = (0..5)
            .map(|_| manager.open::<Probe>(ModalConfig::new()))
            .collect();
        assert_eq!(manager.len(), 5);

        handles[1].close_with(true);
        handles[3].dismiss();
        assert_eq!(manager.len(), 3);

        scheduler.run_pending();
        assert_eq!(manager.len(), 3);
        let ids: Vec<_> = manager
            .get_open_modals()
            .iter()
            .map(|m| m.id().to_string())
            .collect();
        assert_eq!(ids, vec!["modal-0", "modal-2", "modal-4"]);
    }

    #[test]
    fn test_close_is_logical_first_then_physical() {
        let (manager, layer, scheduler) = manager();
        let modal = manager.open::<Probe>(ModalConfig::new());
        let probe = modal.component_instance::<Probe>().unwrap();

        modal.close_with(true);
        assert_eq!(modal.state(), ModalState::Closing);
        assert!(manager.get_modal_by_id("modal-0").is_none());
        assert_eq!(layer.mounted_ids(), vec!["modal-0"]);
        assert_eq!(scheduler.delays(), vec![DEFAULT_TEARDOWN_DELAY]);

        scheduler.run_pending();
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(layer.mounted_ids().is_empty());
        assert!(manager.get_open_modals().is_empty());
        assert_eq!(probe.destroyed.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(
            layer.events(),
            vec![
                LayerEvent::Attached("modal-0".into()),
                LayerEvent::Exiting("modal-0".into()),
                LayerEvent::Detached("modal-0".into()),
            ]
        );
    }

    #[test]
    fn test_double_close_fires_callback_once_with_first_result() {
        let (manager, _, scheduler) = manager();
        let modal = manager.open::<Probe>(ModalConfig::new());
        let calls = record(&modal);

        modal.close_with(true);
        modal.close_with(false);
        assert_eq!(scheduler.pending(), 1);
        scheduler.run_pending();
        modal.close_with(false);

        assert_eq!(*calls.lock().unwrap(), vec![Some(true)]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_close_all_closes_each_once() {
        let (manager, layer, scheduler) = manager();
        let handles: Vec<_> = (0..3)
            .map(|_| manager.open::<Probe>(ModalConfig::new()))
            .collect();
        let calls: Vec<_> = handles.iter().map(record).collect();

        manager.close_all();
        assert!(manager.is_empty());
        for call in &calls {
            assert_eq!(*call.lock().unwrap(), vec![None]);
        }

        scheduler.run_pending();
        assert!(layer.mounted_ids().is_empty());
        assert!(handles.iter().all(|h| h.state() == ModalState::Closed));
    }

    #[test]
    fn test_close_all_notifies_before_any_teardown() {
        let (manager, layer, scheduler) = manager();
        let first = manager.open::<Probe>(ModalConfig::new());
        let second = manager.open::<Probe>(ModalConfig::new());
        let first_calls = record(&first);
        let second_calls = record(&second);

        manager.close_all();

        assert_eq!(first_calls.lock().unwrap().len(), 1);
        assert_eq!(second_calls.lock().unwrap().len(), 1);
        assert_eq!(layer.mounted_ids().len(), 2);
        assert_eq!(scheduler.pending(), 2);
    }

    #[test]
    fn test_close_all_during_individual_teardown() {
        let (manager, _, scheduler) = manager();
        let first = manager.open::<Probe>(ModalConfig::new());
        let _second = manager.open::<Probe>(ModalConfig::new());

        first.close_with(true);
        manager.close_all();
        manager.close_all();

        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.run_pending(), 2);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_confirm_scenario() {
        let (manager, _, scheduler) = manager();
        let content = ModalContentType::from_fn(
            "confirm",
            |_ctx: ModalContext<serde_json::Value, bool>| ().into_any(),
        );
        let modal = manager.open_content(
            content,
            ModalConfig::new()
                .title("Confirm")
                .data(serde_json::json!({ "msg": "ok?" })),
        );
        let calls = record(&modal);

        let ctx = modal
            .component_instance::<ModalContext<serde_json::Value, bool>>()
            .unwrap();
        assert_eq!(ctx.data(), Some(&serde_json::json!({ "msg": "ok?" })));

        ctx.modal_ref().close_with(true);
        assert_eq!(*calls.lock().unwrap(), vec![Some(true)]);
        assert!(manager.get_modal_by_id(modal.id().as_str()).is_none());

        scheduler.run_pending();
        assert_eq!(modal.state(), ModalState::Closed);
    }

    #[test]
    fn test_data_injection() {
        let (manager, _, _) = manager();
        let with_data = manager.open::<Probe>(ModalConfig::new().data(1));
        let without = manager.open::<Probe>(ModalConfig::new());

        let probe = with_data.component_instance::<Probe>().unwrap();
        assert_eq!(probe.data, Some(1));
        assert!(probe.modal_ref.ptr_eq(&with_data));
        assert_eq!(without.component_instance::<Probe>().unwrap().data, None);
    }

    #[test]
    fn test_builders_apply_before_sharing() {
        let (manager, _, _) = manager();
        let defaults = ModalOptions {
            size: Some(ModalSize::Lg),
            ..ModalOptions::default()
        };
        let manager = manager
            .with_defaults(defaults)
            .with_teardown_delay(Duration::from_millis(10));
        assert_eq!(manager.defaults().size, Some(ModalSize::Lg));
        assert_eq!(manager.teardown_delay(), Duration::from_millis(10));

        let shared = manager.clone();
        let manager = manager.with_teardown_delay(Duration::from_millis(99));
        assert_eq!(manager.teardown_delay(), Duration::from_millis(10));
        drop(shared);
    }

    #[test]
    fn test_defaults_merge_into_chrome() {
        let layer = RecordingLayer::new();
        let scheduler = ManualScheduler::new();
        let defaults = ModalOptions {
            size: Some(ModalSize::Lg),
            close_on_esc: Some(false),
            ..Default::default()
        };
        let manager = ModalManager::with_settings(
            layer.clone(),
            scheduler.clone(),
            defaults,
            Duration::from_millis(10),
        );

        manager.open::<Probe>(ModalConfig::new().title("Edit").size(ModalSize::Sm));
        let chrome = layer.container("modal-0").unwrap().chrome().clone();
        assert_eq!(chrome.title, "Edit");
        assert_eq!(chrome.size, ModalSize::Sm);
        assert!(!chrome.close_on_esc);

        manager.close_all();
        assert_eq!(scheduler.delays(), vec![Duration::from_millis(10)]);
    }

    #[test]
    fn test_user_gesture_closes_through_handle() {
        let (manager, layer, scheduler) = manager();
        let modal = manager.open::<Probe>(ModalConfig::new().close_on_outside_click(false));
        let calls = record(&modal);
        let container = layer.container("modal-0").unwrap();

        assert!(!container.request_close(CloseReason::Backdrop));
        assert_eq!(modal.state(), ModalState::Open);

        assert!(container.request_close(CloseReason::Escape));
        assert_eq!(modal.state(), ModalState::Closing);
        assert_eq!(*calls.lock().unwrap(), vec![None]);

        scheduler.run_pending();
        assert!(!container.request_close(CloseReason::CloseButton));
    }

    #[test]
    fn test_empty_content_still_opens() {
        let (manager, layer, scheduler) = manager();
        let modal = manager.open_content(
            ModalContentType::<(), String>::empty(),
            ModalConfig::new().title("Nothing"),
        );

        assert_eq!(modal.state(), ModalState::Open);
        assert!(!layer.container("modal-0").unwrap().has_content());

        modal.close_with("done".to_string());
        scheduler.run_pending();
        assert_eq!(modal.state(), ModalState::Closed);
        assert_eq!(modal.result().as_deref(), Some("done"));
    }

    #[test]
    fn test_content_closing_itself_during_create() {
        struct SelfClosing;

        impl ModalComponent for SelfClosing {
            type Data = ();
            type Output = u8;

            fn create(ctx: ModalContext<(), u8>) -> Self {
                ctx.modal_ref().close_with(1);
                SelfClosing
            }

            fn render(self: Arc<Self>) -> AnyView {
                ().into_any()
            }
        }

        let (manager, layer, scheduler) = manager();
        let modal = manager.open::<SelfClosing>(ModalConfig::new());

        assert_eq!(modal.state(), ModalState::Closing);
        assert!(manager.is_empty());
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(layer.mounted_ids().is_empty());
    }

    #[test]
    fn test_callback_may_open_another_modal() {
        let (manager, _, _) = manager();
        let modal = manager.open::<Probe>(ModalConfig::new());
        let reopened = Arc::new(Mutex::new(None));
        {
            let manager = manager.clone();
            let reopened = reopened.clone();
            modal.after_closed(move |_| {
                let next = manager.open::<Probe>(ModalConfig::new());
                *reopened.lock().unwrap() = Some(next.id().clone());
            });
        }

        modal.dismiss();
        assert_eq!(
            reopened.lock().unwrap().as_ref().map(|id| id.to_string()),
            Some("modal-1".to_string())
        );
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_get_modal_by_id_downcasts() {
        let (manager, _, _) = manager();
        let modal = manager.open::<Probe>(ModalConfig::new());

        let found = manager.get_modal_by_id("modal-0").unwrap();
        assert_eq!(found.state(), ModalState::Open);
        assert!(found.downcast::<bool>().unwrap().ptr_eq(&modal));
        assert!(manager.get_modal_by_id("modal-9").is_none());
    }

    #[test]
    fn test_shutdown_closes_everything() {
        let (manager, layer, scheduler) = manager();
        manager.open::<Probe>(ModalConfig::new());
        manager.open::<Probe>(ModalConfig::new());

        manager.shutdown();
        assert!(manager.is_empty());
        scheduler.run_pending();
        assert!(layer.mounted_ids().is_empty());
    }

    #[test]
    fn test_close_after_manager_dropped_still_detaches() {
        let (manager, layer, scheduler) = manager();
        let modal = manager.open::<Probe>(ModalConfig::new());
        let probe = modal.component_instance::<Probe>().unwrap();
        drop(manager);

        modal.close_with(true);
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(layer.mounted_ids().is_empty());
        assert!(layer
            .events()
            .contains(&LayerEvent::Detached(modal.id().clone())));
        assert_eq!(probe.destroyed.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_tears_down_after_delay() {
        use crate::shared::modal::TokioScheduler;

        let layer = RecordingLayer::new();
        let manager = ModalManager::new(layer.clone(), Arc::new(TokioScheduler::current()));
        let modal = manager.open::<Probe>(ModalConfig::new());

        modal.close_with(true);
        assert_eq!(modal.state(), ModalState::Closing);
        assert_eq!(layer.mounted_ids().len(), 1);

        tokio::time::sleep(DEFAULT_TEARDOWN_DELAY * 2).await;
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(layer.mounted_ids().is_empty());
    }
}
