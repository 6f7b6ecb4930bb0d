use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::components::{Component, ComponentContext};
use crate::constants::STATUS_SEPARATOR;
use crate::keybindings::KeyCombo;
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, text_width};

/// One status bar entry. The title marks its hot key between tildes, as in
/// `"~F1~ Help"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    shortcut: Option<KeyCombo>,
    title: String,
    command: String,
}

impl StatusItem {
    pub fn new(
        shortcut: Option<KeyCombo>,
        title: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            shortcut,
            title: title.into(),
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Title with the tilde markup removed.
    pub fn label(&self) -> String {
        self.title.replace('~', "")
    }

    fn segments(&self) -> impl Iterator<Item = (bool, &str)> {
        self.title
            .split('~')
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(idx, text)| (idx % 2 == 1, text))
    }
}

#[derive(Debug, Default)]
pub struct StatusBar {
    items: Vec<StatusItem>,
    hits: Vec<Rect>,
}

impl StatusBar {
    pub fn new(items: Vec<StatusItem>) -> Self {
        Self {
            items,
            hits: Vec::new(),
        }
    }

    pub fn items(&self) -> &[StatusItem] {
        &self.items
    }

    pub fn layout(&mut self, area: Rect) {
        self.hits.clear();
        if area.height == 0 {
            return;
        }
        let max_x = area.right();
        let mut x = area.x.saturating_add(1);
        let separator = text_width(STATUS_SEPARATOR);
        for item in &self.items {
            if x >= max_x {
                break;
            }
            let width = text_width(&item.label()).min(max_x - x);
            self.hits.push(Rect::new(x, area.y, width, 1));
            x = x.saturating_add(width).saturating_add(separator);
        }
    }

    /// Command bound to `key`, if any item claims it.
    pub fn command_for_key(&self, key: &KeyEvent) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.shortcut.as_ref().is_some_and(|combo| combo.matches(key)))
            .map(StatusItem::command)
    }

    pub fn command_for_mouse(&self, mouse: &MouseEvent) -> Option<&str> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        self.hits
            .iter()
            .position(|rect| rect_contains(*rect, mouse.column, mouse.row))
            .and_then(|idx| self.items.get(idx))
            .map(StatusItem::command)
    }
}

impl Component for StatusBar {
    fn resize(&mut self, area: Rect, _ctx: &ComponentContext) {
        self.layout(area);
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        frame.fill_style(area, theme::panel_style());
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        let plain = theme::panel_style();
        let hot = Style::default().fg(theme::panel_hotkey_fg());
        let last = self.hits.len().saturating_sub(1);
        for (idx, (item, hit)) in self.items.iter().zip(self.hits.iter()).enumerate() {
            let mut x = hit.x;
            for (is_hot, text) in item.segments() {
                let style = if is_hot { plain.patch(hot) } else { plain };
                safe_set_string(buffer, bounds, x, hit.y, text, style);
                x = x.saturating_add(text_width(text));
            }
            if idx < last {
                safe_set_string(buffer, bounds, x, hit.y, STATUS_SEPARATOR, plain);
            }
        }
    }
}
