//! Tree widget - expandable hierarchy with selection and lazy loading.

mod arena;
pub mod events;
mod load;
mod state;

pub use arena::TreeNode;
pub use load::LoadRequest;
pub use state::{FlatNode, SelectionMode, Tree};
