//! Text input widget.

pub mod events;
mod state;

pub use state::Input;
