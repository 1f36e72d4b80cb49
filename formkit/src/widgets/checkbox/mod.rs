//! Checkbox widget.

pub mod events;
mod state;

pub use state::Checkbox;
