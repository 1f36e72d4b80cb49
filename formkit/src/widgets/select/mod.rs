//! Dropdown select widget.

pub mod events;
mod state;

pub use state::Select;
