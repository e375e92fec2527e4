use crate::shared::modal::{
    CloseReason, ModalComponent, ModalContentType, ModalManager, ModalRef, OpenModal, PageLock,
    SignalOverlayLayer, TimeoutScheduler, DEFAULT_TEARDOWN_DELAY,
};
use crate::shared::modal_frame::{capture_page, restore_page, ModalChrome, PageState};
use ds_contracts::modal::{ModalConfig, ModalOptions};
use leptos::prelude::*;
use std::sync::Arc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

/// App-wide modal service, provided through Leptos context.
///
/// Wraps a [`ModalManager`] whose containers are rendered by [`ModalOutlet`]
/// and whose teardown runs on browser timers.
#[derive(Clone)]
pub struct ModalService {
    manager: ModalManager,
    layer: SignalOverlayLayer,
}

impl ModalService {
    pub fn new() -> Self {
        Self::with_defaults(ModalOptions::default())
    }

    pub fn with_defaults(defaults: ModalOptions) -> Self {
        let layer = SignalOverlayLayer::new();
        let manager = ModalManager::with_settings(
            Arc::new(layer),
            Arc::new(TimeoutScheduler),
            defaults,
            DEFAULT_TEARDOWN_DELAY,
        );
        Self { manager, layer }
    }

    /// Open `C` in a new modal.
    pub fn open<C: ModalComponent>(&self, config: ModalConfig<C::Data>) -> ModalRef<C::Output> {
        self.manager.open::<C>(config)
    }

    pub fn open_content<D, R>(
        &self,
        content: ModalContentType<D, R>,
        config: ModalConfig<D>,
    ) -> ModalRef<R>
    where
        D: Send + Sync + 'static,
        R: Clone + Send + Sync + 'static,
    {
        self.manager.open_content(content, config)
    }

    pub fn close_all(&self) {
        self.manager.close_all();
    }

    pub fn get_modal_by_id(&self, id: &str) -> Option<OpenModal> {
        self.manager.get_modal_by_id(id)
    }

    pub fn get_open_modals(&self) -> Vec<OpenModal> {
        self.manager.get_open_modals()
    }

    pub fn len(&self) -> usize {
        self.manager.len()
    }

    /// Whether any overlay is on screen (tracked).
    pub fn is_open(&self) -> bool {
        !self.layer.is_empty()
    }

    pub fn manager(&self) -> &ModalManager {
        &self.manager
    }

    pub fn layer(&self) -> SignalOverlayLayer {
        self.layer
    }
}

impl Default for ModalService {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the service and put it into context. Call once at the app root.
pub fn provide_modal_service(defaults: ModalOptions) -> ModalService {
    let service = ModalService::with_defaults(defaults);
    provide_context(service.clone());
    service
}

pub fn use_modal_service() -> ModalService {
    use_context::<ModalService>()
        .expect("ModalService not provided in context (call provide_modal_service in app root)")
}

/// Renders every attached modal at the application root.
///
/// Must be mounted exactly once. Body scrolling stays locked while any
/// modal is mounted.
#[component]
pub fn ModalOutlet() -> impl IntoView {
    let layer = use_modal_service().layer();

    let page = StoredValue::new_local(PageLock::<PageState>::new());
    Effect::new(move |_| {
        let any_mounted = !layer.is_empty();
        let released = page
            .try_update_value(|lock| lock.sync(any_mounted, capture_page))
            .flatten();
        if let Some(state) = released {
            restore_page(state);
        }
    });
    on_cleanup(move || {
        if let Some(state) = page.try_update_value(|lock| lock.sync(false, capture_page)).flatten() {
            restore_page(state);
        }
    });

    // Global Escape handler: only the topmost modal reacts.
    Effect::new(move |_| {
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(keyboard_event) = event.dyn_ref::<KeyboardEvent>() {
                if keyboard_event.key() == "Escape" {
                    if let Some(top) = layer.topmost() {
                        top.request_close(CloseReason::Escape);
                    }
                }
            }
        }) as Box<dyn FnMut(_)>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            // Mounted once for the whole app lifetime; keep the closure alive.
            closure.forget();
        }
    });

    let containers = move || layer.mounted();

    view! {
        <Show when=move || !layer.is_empty()>
            <For
                each=containers
                key=|container| container.id().clone()
                children=move |container| {
                    let id = container.id().clone();
                    let z_index = {
                        let id = id.clone();
                        Signal::derive(move || {
                            1000 + layer.position(&id).unwrap_or_default() as i32
                        })
                    };
                    let exiting = Signal::derive(move || layer.is_exiting(&id));
                    view! { <ModalChrome container=container z_index=z_index exiting=exiting /> }
                }
            />
        </Show>
    }
}
