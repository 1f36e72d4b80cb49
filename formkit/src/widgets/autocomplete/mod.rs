//! Autocomplete widget - text input with a filtered listbox of options.

mod events;
mod filter;
mod state;

pub use filter::filter_options;
pub use state::{Autocomplete, DropdownState};
