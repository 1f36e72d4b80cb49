//! Button widget.

pub mod events;
mod state;

pub use state::{Button, ButtonKind};
