//! Event handling for the Tree widget.

use crate::context::Scope;
use crate::events::{ClickTarget, EventResult, WidgetEvents};
use crate::keybinds::{Key, KeyCombo};

use super::state::Tree;

impl Tree {
    /// Pointer click on a row. The row becomes the active node; a click on
    /// its expander (`Control`) toggles it and a click elsewhere on the row
    /// selects it. Hidden or unknown rows are ignored.
    pub fn click_node(&self, id: &str, target: ClickTarget, cx: &Scope) -> EventResult {
        if !self.set_active(id) {
            return EventResult::Ignored;
        }
        match target {
            ClickTarget::Control => {
                self.toggle_expand(id, cx);
            }
            ClickTarget::HitArea => {
                self.select(id, cx);
            }
        }
        EventResult::Consumed
    }
}

impl WidgetEvents for Tree {
    /// Arrow keys, Home/End, Enter and Space are always consumed, even when
    /// they change nothing.
    fn on_key(&self, key: &KeyCombo, cx: &Scope) -> EventResult {
        if key.modifiers.is_shortcut() {
            return EventResult::Ignored;
        }
        let Some(active) = self.active_id() else {
            return EventResult::Ignored;
        };

        if key.is_space() {
            self.select(&active, cx);
            return EventResult::Consumed;
        }

        match key.key {
            // Right only expands; it never moves into the children.
            Key::Right => {
                if !self.is_expanded(&active) {
                    self.expand(&active, cx);
                }
                EventResult::Consumed
            }
            // Left only collapses; it never moves to the parent.
            Key::Left => {
                self.collapse(&active, cx);
                EventResult::Consumed
            }
            Key::Up => {
                self.move_active(-1);
                EventResult::Consumed
            }
            Key::Down => {
                self.move_active(1);
                EventResult::Consumed
            }
            Key::Home => {
                if let Some(first) = self.visible_ids().first() {
                    self.set_active(first);
                }
                EventResult::Consumed
            }
            Key::End => {
                if let Some(last) = self.visible_ids().last() {
                    self.set_active(last);
                }
                EventResult::Consumed
            }
            Key::Enter => {
                self.select(&active, cx);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    /// `WidgetEvents` clicks carry no row, so this acts on the active
    /// node. Hosts that know which row was hit use [`Tree::click_node`].
    fn on_click(&self, target: ClickTarget, cx: &Scope) -> EventResult {
        match self.active_id() {
            Some(active) => self.click_node(&active, target, cx),
            None => EventResult::Ignored,
        }
    }
}
