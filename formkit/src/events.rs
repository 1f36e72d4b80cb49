//! Widget event handling types and traits.
//!
//! Widgets push notifications to their scope's queue via
//! `Scope::push_event()`. The host drains the queue after each user
//! interaction and forwards the events to whoever listens.

use crate::context::Scope;
use crate::form::FormData;
use crate::ids::WidgetId;
use crate::keybinds::KeyCombo;
use crate::validation::Validity;
use crate::value::FieldValue;
use crate::widgets::toast::CloseReason;
use crate::widgets::tree::LoadRequest;

// =============================================================================
// Widget Event Types
// =============================================================================

/// Identifies which notification a widget emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetEventKind {
    /// Committed value changed (input text, checkbox state, selection)
    Change,
    /// Value edited by the user (fires alongside `Change` on commits)
    Input,
    /// Autocomplete search text changed
    Search,
    /// Field validity was (re)determined
    ValidityChange,
    /// Dropdown or toast opened
    Open,
    /// Dropdown or toast closed
    Close,
    /// Tree node expanded or collapsed
    Toggle,
    /// Tree selection changed
    Select,
    /// Tree node needs its children loaded
    LoadNeeded,
    /// Form submitted
    Submit,
    /// Form cleared
    Clear,
    /// Form delete requested
    Delete,
    /// Button activated
    Click,
    /// Widget gained focus
    Focus,
    /// Widget lost focus
    Blur,
}

impl WidgetEventKind {
    /// The DOM-style event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Input => "input",
            Self::Search => "search",
            Self::ValidityChange => "validitychange",
            Self::Open => "open",
            Self::Close => "close",
            Self::Toggle => "toggle",
            Self::Select => "select",
            Self::LoadNeeded => "load-needed",
            Self::Submit => "submit",
            Self::Clear => "clear",
            Self::Delete => "delete",
            Self::Click => "click",
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }
}

/// Payload carried by a widget event.
#[derive(Debug, Clone, Default)]
pub enum EventDetail {
    /// No payload
    #[default]
    None,
    /// Field value after the change
    Value(FieldValue),
    /// Checkbox/radio checked state
    Checked(bool),
    /// Autocomplete search text
    Search(String),
    /// Field validity determination
    Validity {
        /// The new validity
        valid: Validity,
        /// Error message shown after the determination
        error: String,
    },
    /// Tree expand/collapse
    Toggle {
        /// Node id
        id: String,
        /// Whether the node is now expanded
        expanded: bool,
    },
    /// Tree selection
    Select {
        /// Node that was activated
        id: String,
        /// Selection after the change
        selected: Vec<String>,
    },
    /// Tree child loading request
    LoadNeeded(LoadRequest),
    /// Collected form data
    Data(FormData),
    /// Why a toast closed
    Close(CloseReason),
}

/// A widget event to be dispatched.
#[derive(Debug, Clone)]
pub struct WidgetEvent {
    /// Which kind of event
    pub kind: WidgetEventKind,
    /// Widget ID that triggered the event
    pub widget_id: WidgetId,
    /// Event payload
    pub detail: EventDetail,
}

impl WidgetEvent {
    /// Create a new widget event without payload.
    pub fn new(kind: WidgetEventKind, widget_id: impl Into<WidgetId>) -> Self {
        Self {
            kind,
            widget_id: widget_id.into(),
            detail: EventDetail::None,
        }
    }

    /// Attach a payload.
    pub fn with_detail(mut self, detail: EventDetail) -> Self {
        self.detail = detail;
        self
    }
}

// =============================================================================
// Event Result
// =============================================================================

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, the host keeps its default behavior.
    Ignored,
    /// Event was consumed: prevent the default action and stop propagation.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

/// Where a pointer click landed relative to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// On the native control itself
    Control,
    /// Elsewhere in the widget's hit area (label, padding, indicator)
    HitArea,
}

/// Trait for widgets that handle host input.
///
/// All methods default to `EventResult::Ignored`, so widgets only implement
/// the events they care about.
pub trait WidgetEvents {
    /// Handle a key press while this widget is focused.
    fn on_key(&self, _key: &KeyCombo, _cx: &Scope) -> EventResult {
        EventResult::Ignored
    }

    /// Handle a pointer click within the widget.
    fn on_click(&self, _target: ClickTarget, _cx: &Scope) -> EventResult {
        EventResult::Ignored
    }

    /// Handle the widget gaining focus.
    fn on_focus(&self, _cx: &Scope) -> EventResult {
        EventResult::Ignored
    }

    /// Handle the widget losing focus.
    ///
    /// `focus_within` is true when focus moved to an element inside the
    /// same widget (e.g. a dropdown option).
    fn on_blur(&self, _focus_within: bool, _cx: &Scope) -> EventResult {
        EventResult::Ignored
    }
}
