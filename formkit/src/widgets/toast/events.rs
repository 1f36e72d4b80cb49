//! Event handling for the Toast widget.

use crate::context::Scope;
use crate::events::{ClickTarget, EventResult, WidgetEvents};
use crate::keybinds::{Key, KeyCombo};

use super::{CloseReason, Toast};

impl WidgetEvents for Toast {
    fn on_key(&self, key: &KeyCombo, cx: &Scope) -> EventResult {
        if key.key == Key::Escape && self.close(CloseReason::User, cx) {
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    /// A click on the control (the dismiss button) closes the toast.
    fn on_click(&self, target: ClickTarget, cx: &Scope) -> EventResult {
        if target == ClickTarget::Control && self.close(CloseReason::User, cx) {
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }
}
