//! Event handling for the Select widget.

use crate::context::Scope;
use crate::events::{ClickTarget, EventResult, WidgetEvents};
use crate::keybinds::{Key, KeyCombo};

use super::Select;

impl WidgetEvents for Select {
    fn on_key(&self, key: &KeyCombo, cx: &Scope) -> EventResult {
        if key.modifiers.is_shortcut() {
            return EventResult::Ignored;
        }
        if self.field().is_disabled() {
            return EventResult::Ignored;
        }

        if !self.is_open() {
            return match key.key {
                Key::Enter | Key::Space | Key::Char(' ') | Key::Down => {
                    self.open(cx);
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            };
        }

        match key.key {
            Key::Up => {
                self.cursor_up();
                EventResult::Consumed
            }
            Key::Down => {
                self.cursor_down();
                EventResult::Consumed
            }
            Key::Home => {
                self.cursor_to(false);
                EventResult::Consumed
            }
            Key::End => {
                self.cursor_to(true);
                EventResult::Consumed
            }
            Key::Enter | Key::Space | Key::Char(' ') => {
                self.select_at_cursor(cx);
                EventResult::Consumed
            }
            Key::Escape => {
                self.close(cx);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn on_click(&self, _target: ClickTarget, cx: &Scope) -> EventResult {
        if self.field().is_disabled() {
            return EventResult::Ignored;
        }
        if self.is_open() {
            self.close(cx);
        } else {
            self.open(cx);
        }
        EventResult::Consumed
    }

    fn on_blur(&self, focus_within: bool, cx: &Scope) -> EventResult {
        if !focus_within {
            self.close(cx);
        }
        EventResult::Ignored
    }
}
