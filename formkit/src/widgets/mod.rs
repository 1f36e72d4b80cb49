//! Built-in widgets.
//!
//! Every widget is a cheap-clone handle over shared state. Host input enters
//! through the [`WidgetEvents`](crate::events::WidgetEvents) trait or the
//! widget's own methods; notifications leave through the [`Scope`] event
//! queue; `is_dirty()` tells the renderer what to repaint.
//!
//! [`Scope`]: crate::context::Scope

pub mod autocomplete;
pub mod button;
pub mod checkbox;
pub mod field;
pub mod input;
pub mod radio;
pub mod select;
pub mod toast;
pub mod tree;

pub use autocomplete::{Autocomplete, DropdownState};
pub use button::{Button, ButtonKind};
pub use checkbox::Checkbox;
pub use field::FieldController;
pub use input::Input;
pub use radio::{Radio, RadioRegistry};
pub use select::Select;
pub use toast::{CloseReason, Toast, ToastVariant};
pub use tree::{FlatNode, LoadRequest, SelectionMode, Tree, TreeNode};
