pub mod modal_service;

pub use modal_service::{provide_modal_service, use_modal_service, ModalOutlet, ModalService};
