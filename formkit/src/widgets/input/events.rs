//! Event handling for the Input widget.

use crate::context::Scope;
use crate::events::{ClickTarget, EventResult, WidgetEvent, WidgetEventKind, WidgetEvents};
use crate::keybinds::{Key, KeyCombo};

use super::Input;

impl WidgetEvents for Input {
    fn on_key(&self, key: &KeyCombo, cx: &Scope) -> EventResult {
        if key.modifiers.is_shortcut() {
            return EventResult::Ignored;
        }
        if !self.is_editable() {
            return EventResult::Ignored;
        }

        match key.key {
            Key::Char(c) => {
                self.insert_char(c, cx);
                EventResult::Consumed
            }
            Key::Space => {
                self.insert_char(' ', cx);
                EventResult::Consumed
            }
            Key::Backspace => {
                self.delete_char_before(cx);
                EventResult::Consumed
            }
            Key::Delete => {
                self.delete_char_at(cx);
                EventResult::Consumed
            }
            Key::Left => {
                self.cursor_left();
                EventResult::Consumed
            }
            Key::Right => {
                self.cursor_right();
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
            // Enter commits but keeps the host's default (implicit form submit).
            Key::Enter => {
                self.commit(cx);
                EventResult::Ignored
            }
            _ => EventResult::Ignored,
        }
    }

    fn on_click(&self, _target: ClickTarget, cx: &Scope) -> EventResult {
        if self.field().is_disabled() {
            return EventResult::Ignored;
        }
        cx.push_event(WidgetEvent::new(WidgetEventKind::Focus, self.id().clone()));
        EventResult::Consumed
    }

    fn on_blur(&self, _focus_within: bool, cx: &Scope) -> EventResult {
        self.commit(cx);
        EventResult::Ignored
    }
}
