pub mod icons;
pub mod modal;
pub mod modal_frame;
