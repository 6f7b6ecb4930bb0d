//! Single-line text input with the standard edit context menu.

use std::collections::VecDeque;

use crossterm::event::{Event, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::clipboard::Clipboard;
use crate::components::{Component, ComponentContext, Control, MenuItem};
use crate::constants::MAX_UNDO_DEPTH;
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::UiFrame;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    text: Vec<char>,
    cursor: usize,
}

#[derive(Debug)]
pub struct TextField {
    text: Vec<char>,
    cursor: usize,
    selection: Option<(usize, usize)>,
    scroll: usize,
    area: Rect,
    clipboard: Clipboard,
    keys: KeyBindings,
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
}

impl TextField {
    pub fn new(text: impl Into<String>) -> Self {
        let text: Vec<char> = text.into().chars().collect();
        Self {
            cursor: text.len(),
            text,
            selection: None,
            scroll: 0,
            area: Rect::default(),
            clipboard: Clipboard::local(),
            keys: KeyBindings::default(),
            undo: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    pub fn with_clipboard(mut self, clipboard: Clipboard) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_keybindings(mut self, keys: KeyBindings) -> Self {
        self.keys = keys;
        self
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn set_text(&mut self, text: &str) {
        self.checkpoint();
        self.text = text.chars().collect();
        self.cursor = self.text.len();
        self.selection = None;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn selected_text(&self) -> Option<String> {
        self.selection
            .map(|(start, end)| self.text[start..end].iter().collect())
    }

    pub fn select_all(&mut self) {
        if self.text.is_empty() {
            self.selection = None;
            return;
        }
        self.selection = Some((0, self.text.len()));
        self.cursor = self.text.len();
    }

    pub fn delete_all(&mut self) {
        if self.text.is_empty() {
            return;
        }
        self.checkpoint();
        self.text.clear();
        self.cursor = 0;
        self.selection = None;
    }

    pub fn copy(&mut self) {
        if let Some(selected) = self.selected_text() {
            self.clipboard.set_text(&selected);
        }
    }

    pub fn cut(&mut self) {
        if self.selection.is_none() {
            return;
        }
        self.copy();
        self.checkpoint();
        self.remove_selection();
    }

    pub fn paste(&mut self) {
        let pasted = self.clipboard.text();
        if pasted.is_empty() {
            return;
        }
        self.checkpoint();
        self.remove_selection();
        // Single line: newlines from the clipboard are dropped.
        for ch in pasted.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.text.insert(self.cursor, ch);
            self.cursor += 1;
        }
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(self.snapshot());
        self.restore(previous);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.push_undo();
        self.restore(next);
        true
    }

    pub fn insert_char(&mut self, ch: char) {
        self.checkpoint();
        self.remove_selection();
        self.text.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) {
        if self.selection.is_some() {
            self.checkpoint();
            self.remove_selection();
        } else if self.cursor > 0 {
            self.checkpoint();
            self.cursor -= 1;
            self.text.remove(self.cursor);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.selection.is_some() {
            self.checkpoint();
            self.remove_selection();
        } else if self.cursor < self.text.len() {
            self.checkpoint();
            self.text.remove(self.cursor);
        }
    }

    fn move_cursor(&mut self, to: usize) {
        self.selection = None;
        self.cursor = to.min(self.text.len());
    }

    fn remove_selection(&mut self) {
        if let Some((start, end)) = self.selection.take() {
            self.text.drain(start..end);
            self.cursor = start;
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            cursor: self.cursor,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.text = snapshot.text;
        self.cursor = snapshot.cursor.min(self.text.len());
        self.selection = None;
    }

    fn checkpoint(&mut self) {
        self.push_undo();
        self.redo.clear();
    }

    fn push_undo(&mut self) {
        if self.undo.len() >= MAX_UNDO_DEPTH {
            self.undo.pop_front();
        }
        self.undo.push_back(self.snapshot());
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let Some(action) = [
            Action::SelectAll,
            Action::DeleteAll,
            Action::Copy,
            Action::Cut,
            Action::Paste,
            Action::Undo,
            Action::Redo,
            Action::CursorLeft,
            Action::CursorRight,
            Action::CursorHome,
            Action::CursorEnd,
            Action::DeleteBack,
            Action::DeleteForward,
        ]
        .into_iter()
        .find(|action| self.keys.matches(*action, key)) else {
            return self.handle_typed(key);
        };
        self.run(action);
        true
    }

    fn handle_typed(&mut self, key: &KeyEvent) -> bool {
        if key.kind == crossterm::event::KeyEventKind::Release
            || key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            crossterm::event::KeyCode::Char(ch) => {
                self.insert_char(ch);
                true
            }
            _ => false,
        }
    }

    fn run(&mut self, action: Action) {
        match action {
            Action::SelectAll => self.select_all(),
            Action::DeleteAll => self.delete_all(),
            Action::Copy => self.copy(),
            Action::Cut => self.cut(),
            Action::Paste => self.paste(),
            Action::Undo => {
                self.undo();
            }
            Action::Redo => {
                self.redo();
            }
            Action::CursorLeft => self.move_cursor(self.cursor.saturating_sub(1)),
            Action::CursorRight => self.move_cursor(self.cursor + 1),
            Action::CursorHome => self.move_cursor(0),
            Action::CursorEnd => self.move_cursor(self.text.len()),
            Action::DeleteBack => self.delete_back(),
            Action::DeleteForward => self.delete_forward(),
            _ => {}
        }
        tracing::trace!(%action, cursor = self.cursor, "text field edit");
    }

    fn edit_item(&self, title: &str, action: Action, command: &str) -> MenuItem {
        let item = MenuItem::new(title, command);
        match self.keys.first_combo(action) {
            Some(combo) => item.with_shortcut(combo.display()),
            None => item,
        }
    }

    fn scroll_to_cursor(&mut self, width: usize) {
        if width == 0 {
            return;
        }
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + width {
            self.scroll = self.cursor + 1 - width;
        }
    }
}

impl Component for TextField {
    fn resize(&mut self, area: Rect, _ctx: &ComponentContext) {
        self.area = area;
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.area = area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.scroll_to_cursor(area.width as usize);
        let base = Style::default().bg(theme::input_bg()).fg(theme::input_fg());
        frame.fill_style(area, base);
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        for col in 0..area.width {
            let idx = self.scroll + col as usize;
            let x = area.x + col;
            if x >= bounds.right() || area.y >= bounds.bottom() {
                break;
            }
            let mut style = base;
            if self
                .selection
                .is_some_and(|(start, end)| idx >= start && idx < end)
            {
                style = style.bg(theme::input_selection_bg());
            }
            if ctx.focused() && idx == self.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if let Some(cell) = buffer.cell_mut((x, area.y)) {
                match self.text.get(idx) {
                    Some(ch) => cell.set_char(*ch),
                    None => cell.set_char(' '),
                };
                cell.set_style(style);
            }
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left)
                    || !rect_contains(self.area, mouse.column, mouse.row)
                {
                    return false;
                }
                let offset = (mouse.column - self.area.x) as usize;
                self.move_cursor(self.scroll + offset);
                true
            }
            Event::Paste(text) => {
                self.checkpoint();
                self.remove_selection();
                for ch in text.chars().filter(|c| *c != '\n' && *c != '\r') {
                    self.text.insert(self.cursor, ch);
                    self.cursor += 1;
                }
                true
            }
            _ => false,
        }
    }
}

impl Control for TextField {
    fn focusable(&self) -> bool {
        true
    }

    fn context_menu_items(&self) -> Option<Vec<MenuItem>> {
        Some(vec![
            self.edit_item("Select All", Action::SelectAll, "select_all"),
            self.edit_item("Delete All", Action::DeleteAll, "delete_all"),
            self.edit_item("Copy", Action::Copy, "copy"),
            self.edit_item("Cut", Action::Cut, "cut"),
            self.edit_item("Paste", Action::Paste, "paste"),
            self.edit_item("Undo", Action::Undo, "undo"),
            self.edit_item("Redo", Action::Redo, "redo"),
        ])
    }

    fn handle_command(&mut self, command: &str) -> bool {
        let action = match command {
            "select_all" => Action::SelectAll,
            "delete_all" => Action::DeleteAll,
            "copy" => Action::Copy,
            "cut" => Action::Cut,
            "paste" => Action::Paste,
            "undo" => Action::Undo,
            "redo" => Action::Redo,
            _ => return false,
        };
        self.run(action);
        true
    }
}
