//! Bordered list of menu items shared by context menus and menu-bar
//! drop-downs.
//!
//! The list owns items and selection only. Where it sits on screen is decided
//! by whoever owns it (see `crate::layout::placement`); rendering takes the
//! resolved frame, which may start at negative coordinates.

use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::constants::{
    MENU_BORDER_CELLS, MENU_HINT_GAP, MENU_HINT_RIGHT_PAD, MENU_ITEM_LEFT_PAD,
    MENU_ITEM_RIGHT_PAD, MIN_MENU_INNER_WIDTH,
};
use crate::keybindings::{Action, KeyBindings, KeyCombo};
use crate::layout::{FloatRect, Size};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, text_width};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    title: String,
    shortcut: Option<String>,
    command: String,
    enabled: bool,
}

impl MenuItem {
    pub fn new(title: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            shortcut: None,
            command: command.into(),
            enabled: true,
        }
    }

    /// Shortcut hint shown right-aligned next to the title.
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn shortcut(&self) -> Option<&str> {
        self.shortcut.as_deref()
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Cells this item needs between the borders.
    pub fn width(&self) -> u16 {
        let mut width = MENU_ITEM_LEFT_PAD
            .saturating_add(text_width(&self.title))
            .saturating_add(MENU_ITEM_RIGHT_PAD);
        if let Some(shortcut) = &self.shortcut {
            width = width
                .saturating_add(text_width(shortcut))
                .saturating_add(MENU_HINT_GAP);
        }
        width
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Event was not for the menu.
    Ignored,
    /// Event consumed; selection may have moved.
    Handled,
    /// Item at this index was chosen.
    Activated(usize),
    /// The menu asked to be closed without choosing anything.
    Dismissed,
}

#[derive(Debug, Clone, Default)]
pub struct MenuList {
    items: Vec<MenuItem>,
    selected: Option<usize>,
}

impl MenuList {
    pub fn new(items: Vec<MenuItem>) -> Self {
        let mut list = Self {
            items,
            selected: None,
        };
        list.select_first();
        list
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<MenuItem>) {
        self.items = items;
        self.select_first();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Size of the bordered popup that shows every item untruncated.
    pub fn natural_size(&self) -> Size {
        let inner = self
            .items
            .iter()
            .map(MenuItem::width)
            .max()
            .unwrap_or(0)
            .max(MIN_MENU_INNER_WIDTH);
        let rows = self.items.len().min(u16::MAX as usize) as u16;
        Size::new(
            inner.saturating_add(MENU_BORDER_CELLS),
            rows.saturating_add(MENU_BORDER_CELLS),
        )
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.selected.and_then(|idx| self.items.get(idx))
    }

    pub fn select(&mut self, index: usize) -> bool {
        match self.items.get(index) {
            Some(item) if item.enabled => {
                self.selected = Some(index);
                true
            }
            _ => false,
        }
    }

    pub fn select_first(&mut self) {
        self.selected = self.items.iter().position(|item| item.enabled);
    }

    /// Move the selection by `delta` enabled items, wrapping at either end.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.items.len();
        if len == 0 || !self.items.iter().any(|item| item.enabled) {
            self.selected = None;
            return;
        }
        let step = if delta < 0 { len - 1 } else { 1 };
        let mut idx = self.selected.unwrap_or(if delta < 0 { 0 } else { len - 1 });
        for _ in 0..delta.unsigned_abs() {
            loop {
                idx = (idx + step) % len;
                if self.items[idx].enabled {
                    break;
                }
            }
        }
        self.selected = Some(idx);
    }

    /// Index of the item drawn at `(column, row)` when the list occupies
    /// `frame`. Border cells belong to no item.
    pub fn item_at(&self, frame: FloatRect, column: u16, row: u16) -> Option<usize> {
        let column = column as i32;
        let row = row as i32;
        if column <= frame.x || column >= frame.right().saturating_sub(1) {
            return None;
        }
        if row <= frame.y || row >= frame.bottom().saturating_sub(1) {
            return None;
        }
        let idx = (row - frame.y - 1) as usize;
        (idx < self.items.len()).then_some(idx)
    }

    pub fn handle_key(&mut self, key: &KeyEvent, keys: &KeyBindings) -> MenuOutcome {
        if keys.matches(Action::MenuUp, key) {
            self.move_selection(-1);
            return MenuOutcome::Handled;
        }
        if keys.matches(Action::MenuDown, key) {
            self.move_selection(1);
            return MenuOutcome::Handled;
        }
        if keys.matches(Action::MenuSelect, key) {
            return match self.selected_item() {
                Some(item) if item.enabled => self
                    .selected
                    .map_or(MenuOutcome::Handled, MenuOutcome::Activated),
                _ => MenuOutcome::Handled,
            };
        }
        if keys.matches(Action::MenuClose, key) {
            return MenuOutcome::Dismissed;
        }
        // An item's own shortcut activates it directly.
        let pressed = KeyCombo::new(key.code, key.modifiers);
        if !key.modifiers.is_empty()
            && let Some(idx) = self.items.iter().position(|item| {
                item.enabled
                    && item
                        .shortcut()
                        .is_some_and(|hint| hint == pressed.display() && pressed.matches(key))
            })
        {
            return MenuOutcome::Activated(idx);
        }
        MenuOutcome::Ignored
    }

    /// Pointer handling while the list occupies `frame`.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent, frame: FloatRect) -> MenuOutcome {
        let inside = frame.contains(mouse.column as i32, mouse.row as i32);
        let hovered = self.item_at(frame, mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                if let Some(idx) = hovered {
                    self.select(idx);
                }
                if inside {
                    MenuOutcome::Handled
                } else {
                    MenuOutcome::Ignored
                }
            }
            MouseEventKind::Down(_) => match hovered {
                Some(idx) if self.items[idx].enabled => {
                    self.selected = Some(idx);
                    MenuOutcome::Activated(idx)
                }
                _ if inside => MenuOutcome::Handled,
                _ => MenuOutcome::Dismissed,
            },
            MouseEventKind::ScrollUp if inside => {
                self.move_selection(-1);
                MenuOutcome::Handled
            }
            MouseEventKind::ScrollDown if inside => {
                self.move_selection(1);
                MenuOutcome::Handled
            }
            _ if inside => MenuOutcome::Handled,
            _ => MenuOutcome::Ignored,
        }
    }

    /// Draw the list into `frame`. The popup is painted offscreen at its own
    /// size and then copied, so frames hanging off any screen edge keep their
    /// visible slice intact.
    pub fn render(&self, frame: &mut UiFrame<'_>, rect: FloatRect) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let local = Rect::new(0, 0, rect.width, rect.height);
        let mut buffer = Buffer::empty(local);
        Block::bordered()
            .style(theme::menu_style())
            .render(local, &mut buffer);
        let inner = Rect::new(
            1,
            1,
            rect.width.saturating_sub(MENU_BORDER_CELLS),
            rect.height.saturating_sub(MENU_BORDER_CELLS),
        );
        for (idx, item) in self.items.iter().enumerate() {
            if idx >= inner.height as usize {
                break;
            }
            let y = inner.y + idx as u16;
            let style = self.item_style(idx, item);
            buffer.set_style(Rect::new(inner.x, y, inner.width, 1), style);
            safe_set_string(
                &mut buffer,
                inner,
                inner.x.saturating_add(MENU_ITEM_LEFT_PAD),
                y,
                item.title(),
                style,
            );
            if let Some(hint) = item.shortcut() {
                let hint_x = inner
                    .right()
                    .saturating_sub(MENU_HINT_RIGHT_PAD)
                    .saturating_sub(text_width(hint));
                if hint_x > inner.x {
                    safe_set_string(&mut buffer, inner, hint_x, y, hint, style);
                }
            }
        }
        frame.blit_from_signed(&buffer, rect);
    }

    fn item_style(&self, idx: usize, item: &MenuItem) -> Style {
        if self.selected == Some(idx) {
            theme::menu_selected_style()
        } else if !item.enabled {
            theme::menu_style().fg(theme::menu_disabled_fg())
        } else {
            theme::menu_style()
        }
    }
}
