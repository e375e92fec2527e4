//! Dynamic modals: open a content unit at runtime, hand it a private scope,
//! track its lifecycle and tear it down once it is closed.
//!
//! ```ignore
//! let modal = service.open::<ConfirmDialog>(
//!     ModalConfig::new().title("Confirm").data(ConfirmData { message: "Delete?".into() }),
//! );
//! modal.after_closed(|confirmed| log::info!("confirmed: {:?}", confirmed));
//! ```

mod container;
mod content;
mod focus_trap;
mod layer;
mod manager;
mod page_lock;
mod reference;
mod registry;
mod scheduler;

#[cfg(test)]
mod test_support;

pub use container::{CloseReason, ModalContainer};
pub use content::{ModalComponent, ModalContentType, ModalContext, MountedContent};
pub use focus_trap::{FocusTrap, FOCUSABLE_SELECTOR};
pub use layer::{OverlayLayer, SignalOverlayLayer};
pub use manager::{ModalManager, DEFAULT_TEARDOWN_DELAY};
pub use page_lock::PageLock;
pub use reference::ModalRef;
pub use registry::{ModalRegistry, OpenModal};
#[cfg(not(target_arch = "wasm32"))]
pub use scheduler::TokioScheduler;
pub use scheduler::{TeardownScheduler, TeardownTask, TimeoutScheduler};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
