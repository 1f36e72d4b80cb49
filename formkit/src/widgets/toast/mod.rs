//! Toast notification widget.

pub mod events;
mod state;

pub use state::{CloseReason, Toast, ToastVariant};
