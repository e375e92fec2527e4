//! Framework-free modal types shared by the UI crate and its hosts.

pub mod defaults;
pub mod options;
pub mod state;

pub use defaults::{load_default_options, ModalConfigError, DEFAULT_MODAL_OPTIONS};
pub use options::{BackdropType, ChromeOptions, ModalConfig, ModalOptions, ModalSize};
pub use state::{ModalId, ModalState};
