//! Event handling for the Autocomplete widget.

use crate::context::Scope;
use crate::events::{ClickTarget, EventResult, WidgetEvent, WidgetEventKind, WidgetEvents};
use crate::keybinds::{Key, KeyCombo};

use super::Autocomplete;

impl Autocomplete {
    /// Close after the scope's blur grace delay, unless focus returns
    /// first.
    fn schedule_blur_close(&self, cx: &Scope) {
        let generation = match self.inner.write() {
            Ok(mut guard) => {
                guard.blur_generation += 1;
                guard.blur_generation
            }
            Err(_) => return,
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            self.close(cx);
            return;
        };

        let widget = self.clone();
        let cx = cx.clone();
        let grace = cx.config().blur_grace;
        handle.spawn(async move {
            tokio::time::sleep(grace).await;
            let current = widget
                .inner
                .read()
                .map(|guard| guard.blur_generation)
                .unwrap_or(generation);
            if current == generation {
                widget.close(&cx);
            } else {
                log::trace!("[autocomplete] {} blur close superseded", widget.id());
            }
        });
    }
}

impl WidgetEvents for Autocomplete {
    fn on_key(&self, key: &KeyCombo, cx: &Scope) -> EventResult {
        if key.modifiers.is_shortcut() {
            return EventResult::Ignored;
        }
        if self.field.is_disabled() {
            return EventResult::Ignored;
        }

        match key.key {
            Key::Down => {
                if !self.is_open() {
                    if self.threshold_met() {
                        self.open(cx);
                    }
                } else {
                    self.focus_next();
                }
                EventResult::Consumed
            }
            Key::Up => {
                if self.is_open() {
                    self.focus_prev();
                }
                EventResult::Consumed
            }
            Key::Enter => {
                if self.is_open() && self.commit_focused(cx) {
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            Key::Escape => {
                if self.is_open() {
                    self.close(cx);
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            Key::Char(c) => {
                let mut search = self.search();
                search.push(c);
                self.type_text(search, cx);
                EventResult::Consumed
            }
            Key::Space => {
                let mut search = self.search();
                search.push(' ');
                self.type_text(search, cx);
                EventResult::Consumed
            }
            Key::Backspace => {
                let mut search = self.search();
                if search.pop().is_some() {
                    self.type_text(search, cx);
                }
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn on_click(&self, _target: ClickTarget, cx: &Scope) -> EventResult {
        if self.field.is_disabled() {
            return EventResult::Ignored;
        }
        if self.is_open() {
            self.close(cx);
        } else {
            self.open(cx);
        }
        EventResult::Consumed
    }

    fn on_focus(&self, cx: &Scope) -> EventResult {
        if let Ok(mut guard) = self.inner.write() {
            guard.blur_generation += 1;
        }
        cx.push_event(WidgetEvent::new(WidgetEventKind::Focus, self.id().clone()));
        EventResult::Ignored
    }

    fn on_blur(&self, focus_within: bool, cx: &Scope) -> EventResult {
        if focus_within {
            return EventResult::Ignored;
        }
        cx.push_event(WidgetEvent::new(WidgetEventKind::Blur, self.id().clone()));
        if self.is_open() {
            self.schedule_blur_close(cx);
        }
        EventResult::Ignored
    }
}
