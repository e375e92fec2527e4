use super::content::{ModalContentType, ModalContext, MountedContent};
use super::lock;
use ds_contracts::modal::{ChromeOptions, ModalId};
use leptos::prelude::*;
use std::sync::{Arc, Mutex};

/// What the user did to ask for the modal to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    CloseButton,
    Backdrop,
    Escape,
}

type CloseRequested = Arc<dyn Fn() + Send + Sync>;

/// The overlay host for one modal: resolved chrome settings plus the content
/// unit mounted inside it.
///
/// The container never closes its modal itself. User gestures go through
/// [`request_close`](Self::request_close), which notifies the manager.
pub struct ModalContainer {
    id: ModalId,
    chrome: ChromeOptions,
    content_name: String,
    content: Mutex<Option<MountedContent>>,
    on_close_requested: Mutex<Option<CloseRequested>>,
}

impl ModalContainer {
    pub(crate) fn create<D, R>(
        id: ModalId,
        chrome: ChromeOptions,
        content: &ModalContentType<D, R>,
        ctx: ModalContext<D, R>,
        on_close_requested: CloseRequested,
    ) -> Self
    where
        D: Send + Sync + 'static,
        R: Clone + Send + Sync + 'static,
    {
        let modal_ref = ctx.modal_ref().clone();
        let mounted = content.instantiate(ctx);

        match &mounted {
            Some(mounted) => {
                modal_ref.link_instance(mounted.instance());
                log::debug!("Mounted '{}' into modal '{}'", mounted.name(), id);
            }
            None => {
                log::warn!("No content type provided to modal '{}'", id);
            }
        }

        Self {
            id,
            chrome,
            content_name: content.name().to_string(),
            content: Mutex::new(mounted),
            on_close_requested: Mutex::new(Some(on_close_requested)),
        }
    }

    pub fn id(&self) -> &ModalId {
        &self.id
    }

    pub fn chrome(&self) -> &ChromeOptions {
        &self.chrome
    }

    pub fn content_name(&self) -> &str {
        &self.content_name
    }

    /// Whether a content unit is mounted (false for empty chrome and after
    /// destruction).
    pub fn has_content(&self) -> bool {
        lock(&self.content).is_some()
    }

    /// Render the mounted content, if any.
    pub fn render_content(&self) -> Option<AnyView> {
        // Lock is released before the view runs.
        let render = lock(&self.content).as_ref().map(|m| m.render_fn())?;
        Some(render())
    }

    /// Render the content's footer actions, if it has any.
    pub fn render_footer(&self) -> Option<AnyView> {
        let footer = lock(&self.content).as_ref().and_then(|m| m.footer_fn())?;
        footer()
    }

    /// Whether `reason` is allowed to close this modal.
    pub fn accepts(&self, reason: CloseReason) -> bool {
        match reason {
            CloseReason::CloseButton => true,
            CloseReason::Backdrop => self.chrome.close_on_outside_click,
            CloseReason::Escape => self.chrome.close_on_esc,
        }
    }

    /// Forward a user close gesture to the manager. Returns whether it was
    /// honoured.
    pub fn request_close(&self, reason: CloseReason) -> bool {
        if !self.accepts(reason) {
            log::debug!("Modal '{}' ignores {:?}", self.id, reason);
            return false;
        }
        let notify = lock(&self.on_close_requested).clone();
        match notify {
            Some(notify) => {
                notify();
                true
            }
            None => false,
        }
    }

    /// Destroy the mounted content. Safe to call more than once.
    pub(crate) fn destroy(&self) {
        lock(&self.on_close_requested).take();
        let mounted = lock(&self.content).take();
        if let Some(mounted) = mounted {
            log::debug!("Destroying '{}' in modal '{}'", mounted.name(), self.id);
            mounted.destroy();
        }
    }
}

impl std::fmt::Debug for ModalContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalContainer")
            .field("id", &self.id)
            .field("content", &self.content_name)
            .field("chrome", &self.chrome)
            .finish()
    }
}
