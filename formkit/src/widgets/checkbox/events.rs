//! Event handling for the Checkbox widget.

use crate::context::Scope;
use crate::events::{ClickTarget, EventResult, WidgetEvents};
use crate::keybinds::KeyCombo;

use super::Checkbox;

impl WidgetEvents for Checkbox {
    fn on_key(&self, key: &KeyCombo, cx: &Scope) -> EventResult {
        if key.modifiers.is_shortcut() {
            return EventResult::Ignored;
        }
        if key.is_space() && self.toggle(cx).is_some() {
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    fn on_click(&self, _target: ClickTarget, cx: &Scope) -> EventResult {
        match self.toggle(cx) {
            Some(_) => EventResult::Consumed,
            None => EventResult::Ignored,
        }
    }
}
