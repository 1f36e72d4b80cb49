//! Event handling for the Button widget.

use crate::context::Scope;
use crate::events::{ClickTarget, EventResult, WidgetEvents};
use crate::keybinds::{Key, KeyCombo};

use super::Button;

impl WidgetEvents for Button {
    fn on_key(&self, key: &KeyCombo, cx: &Scope) -> EventResult {
        if key.modifiers.any() {
            return EventResult::Ignored;
        }
        if (key.key == Key::Enter || key.is_space()) && self.click(cx) {
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    fn on_click(&self, _target: ClickTarget, cx: &Scope) -> EventResult {
        if self.click(cx) {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }
}
