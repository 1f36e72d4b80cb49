//! Radio widget - mutually exclusive options grouped by name.

pub mod events;
mod registry;
mod state;

pub use registry::RadioRegistry;
pub use state::Radio;
