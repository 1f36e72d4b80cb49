//! Headless form widgets.
//!
//! Widgets here own interaction state only: values, validation, focus,
//! open/closed dropdowns, tree expansion. Rendering is left to the host,
//! which forwards input through [`events::WidgetEvents`], drains
//! notifications from a [`context::Scope`], and reads ARIA snapshots from
//! each widget.

pub mod aria;
pub mod attr;
pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod form;
pub mod ids;
pub mod keybinds;
pub mod validation;
pub mod value;
pub mod widgets;

pub mod prelude {
    pub use crate::aria::AriaAttributes;
    pub use crate::builder::{Builder, Built, WidgetSpec};
    pub use crate::config::ScopeConfig;
    pub use crate::context::Scope;
    pub use crate::error::{BuildError, LoadError, ResetError, ValidatorError};
    pub use crate::events::{
        ClickTarget, EventDetail, EventResult, WidgetEvent, WidgetEventKind, WidgetEvents,
    };
    pub use crate::form::{Form, FormControl, FormData, FormNode, FormValue};
    pub use crate::ids::WidgetId;
    pub use crate::keybinds::{Key, KeyCombo, Modifiers};
    pub use crate::validation::{ErrorDisplay, Validation, Validator, Validity, ValidityState};
    pub use crate::value::{FieldValue, SelectOption};
    pub use crate::widgets::{
        Autocomplete, Button, ButtonKind, Checkbox, CloseReason, DropdownState, FieldController,
        FlatNode, Input, LoadRequest, Radio, Select, SelectionMode, Toast, ToastVariant, Tree,
        TreeNode,
    };
}
