pub mod app;
pub mod layout;
pub mod shared;

pub use ds_contracts::modal::{
    BackdropType, ChromeOptions, ModalConfig, ModalId, ModalOptions, ModalSize, ModalState,
};
pub use layout::{provide_modal_service, use_modal_service, ModalOutlet, ModalService};
pub use shared::modal::{
    ModalComponent, ModalContentType, ModalContext, ModalManager, ModalRef, OpenModal,
};

/// Mount the demo app on `<body>`.
#[cfg(feature = "demo")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn hydrate() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(app::App);
}
