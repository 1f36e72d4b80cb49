//! Event handling for the Radio widget.

use crate::context::Scope;
use crate::events::{ClickTarget, EventResult, WidgetEvent, WidgetEventKind, WidgetEvents};
use crate::keybinds::{Key, KeyCombo};

use super::Radio;

impl Radio {
    /// Move the check to the next (or previous) enabled member of the
    /// group, wrapping at the ends. Returns the newly checked radio.
    pub fn move_check(&self, forward: bool, cx: &Scope) -> Option<Radio> {
        let group = self.group(cx);
        let len = group.len();
        let current = group.iter().position(|r| r.id() == self.id())?;

        let target = (1..len)
            .map(|step| {
                if forward {
                    (current + step) % len
                } else {
                    (current + len - step) % len
                }
            })
            .map(|i| &group[i])
            .find(|r| !r.is_disabled())?
            .clone();

        target.check(cx);
        cx.push_event(WidgetEvent::new(WidgetEventKind::Focus, target.id().clone()));
        Some(target)
    }
}

impl WidgetEvents for Radio {
    fn on_key(&self, key: &KeyCombo, cx: &Scope) -> EventResult {
        if key.modifiers.is_shortcut() {
            return EventResult::Ignored;
        }
        if self.is_disabled() {
            return EventResult::Ignored;
        }

        if key.is_space() {
            self.check(cx);
            return EventResult::Consumed;
        }

        match key.key {
            Key::Down | Key::Right => {
                self.move_check(true, cx);
                EventResult::Consumed
            }
            Key::Up | Key::Left => {
                self.move_check(false, cx);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    /// Clicks anywhere in the hit area activate the radio.
    fn on_click(&self, _target: ClickTarget, cx: &Scope) -> EventResult {
        if self.is_disabled() {
            return EventResult::Ignored;
        }
        self.check(cx);
        EventResult::Consumed
    }
}
