use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent};
use crossterm::event::{ModifierKeyCode, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Menu navigation (context menu and menu-bar drop-downs)
    MenuUp,
    MenuDown,
    MenuLeft,
    MenuRight,
    MenuSelect,
    MenuClose,
    // Menu bar hot key
    MenuBarToggle,
    // Text editing
    SelectAll,
    DeleteAll,
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    DeleteBack,
    DeleteForward,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::MenuUp => "Menu up",
            Action::MenuDown => "Menu down",
            Action::MenuLeft => "Menu left",
            Action::MenuRight => "Menu right",
            Action::MenuSelect => "Menu select",
            Action::MenuClose => "Close menu",
            Action::MenuBarToggle => "Toggle menu bar",
            Action::SelectAll => "Select All",
            Action::DeleteAll => "Delete All",
            Action::Copy => "Copy",
            Action::Cut => "Cut",
            Action::Paste => "Paste",
            Action::Undo => "Undo",
            Action::Redo => "Redo",
            Action::CursorLeft => "Cursor left",
            Action::CursorRight => "Cursor right",
            Action::CursorHome => "Cursor home",
            Action::CursorEnd => "Cursor end",
            Action::DeleteBack => "Delete backward",
            Action::DeleteForward => "Delete forward",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Whether `key` is a press (or repeat) of this combo. Character codes
    /// compare case-insensitively since terminals disagree on whether Shift
    /// uppercases the reported char.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release || key.modifiers != self.mods {
            return false;
        }
        match (self.code, key.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }

    /// A synthetic press event for this combo.
    pub fn to_event(&self) -> KeyEvent {
        KeyEvent::new(self.code, self.mods)
    }

    pub fn display(&self) -> String {
        let mut parts = modifier_parts(self.mods);
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Insert => "Insert".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Mouse chord: a button press with an exact modifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseCombo {
    pub button: MouseButton,
    pub mods: KeyModifiers,
}

impl MouseCombo {
    pub fn new(button: MouseButton, mods: KeyModifiers) -> Self {
        Self { button, mods }
    }

    pub fn matches(&self, mouse: &MouseEvent) -> bool {
        matches!(mouse.kind, MouseEventKind::Down(button) if button == self.button)
            && mouse.modifiers == self.mods
    }

    /// A synthetic press of this chord at `(column, row)`.
    pub fn to_event(&self, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(self.button),
            column,
            row,
            modifiers: self.mods,
        }
    }

    pub fn display(&self) -> String {
        let mut parts = modifier_parts(self.mods);
        let button = match self.button {
            MouseButton::Left => "Left click",
            MouseButton::Right => "Right click",
            MouseButton::Middle => "Middle click",
        };
        parts.push(button.to_string());
        parts.join("+")
    }
}

impl fmt::Display for MouseCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

fn modifier_parts(mods: KeyModifiers) -> Vec<String> {
    let mut parts = Vec::new();
    if mods.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl".to_string());
    }
    if mods.contains(KeyModifiers::SHIFT) {
        parts.push("Shift".to_string());
    }
    if mods.contains(KeyModifiers::ALT) {
        parts.push("Alt".to_string());
    }
    parts
}

/// Whether `key` is the bare Alt key (reported on its own only when the
/// terminal supports modifier key events).
pub fn is_bare_alt(key: &KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Modifier(ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt)
    )
}

/// Default chord that opens a context menu from the keyboard.
pub fn default_context_menu_key() -> KeyCombo {
    KeyCombo::new(KeyCode::F(10), KeyModifiers::SHIFT)
}

/// Default chord that opens a context menu from the mouse.
pub fn default_context_menu_mouse() -> MouseCombo {
    MouseCombo::new(MouseButton::Right, KeyModifiers::NONE)
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        // Menu navigation
        kb.add(MenuUp, KeyCombo::new(KeyCode::Up, KeyModifiers::NONE));
        kb.add(MenuDown, KeyCombo::new(KeyCode::Down, KeyModifiers::NONE));
        kb.add(MenuLeft, KeyCombo::new(KeyCode::Left, KeyModifiers::NONE));
        kb.add(MenuRight, KeyCombo::new(KeyCode::Right, KeyModifiers::NONE));
        kb.add(
            MenuSelect,
            KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE),
        );
        kb.add(MenuClose, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        kb.add(
            MenuBarToggle,
            KeyCombo::new(KeyCode::F(9), KeyModifiers::NONE),
        );
        // Text editing
        kb.add(
            SelectAll,
            KeyCombo::new(KeyCode::Char('t'), KeyModifiers::CONTROL),
        );
        kb.add(
            DeleteAll,
            KeyCombo::new(
                KeyCode::Char('d'),
                KeyModifiers::CONTROL | KeyModifiers::SHIFT,
            ),
        );
        kb.add(
            Copy,
            KeyCombo::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        kb.add(
            Cut,
            KeyCombo::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
        );
        kb.add(
            Paste,
            KeyCombo::new(KeyCode::Char('v'), KeyModifiers::CONTROL),
        );
        kb.add(
            Undo,
            KeyCombo::new(KeyCode::Char('z'), KeyModifiers::CONTROL),
        );
        kb.add(
            Redo,
            KeyCombo::new(KeyCode::Char('y'), KeyModifiers::CONTROL),
        );
        kb.add(CursorLeft, KeyCombo::new(KeyCode::Left, KeyModifiers::NONE));
        kb.add(
            CursorRight,
            KeyCombo::new(KeyCode::Right, KeyModifiers::NONE),
        );
        kb.add(CursorHome, KeyCombo::new(KeyCode::Home, KeyModifiers::NONE));
        kb.add(CursorEnd, KeyCombo::new(KeyCode::End, KeyModifiers::NONE));
        kb.add(
            DeleteBack,
            KeyCombo::new(KeyCode::Backspace, KeyModifiers::NONE),
        );
        kb.add(
            DeleteForward,
            KeyCombo::new(KeyCode::Delete, KeyModifiers::NONE),
        );
        kb
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }

    /// Return the first `KeyCombo` mapped to `action`, if any.
    pub fn first_combo(&self, action: Action) -> Option<KeyCombo> {
        self.map.get(&action).and_then(|list| list.first().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn defaults_match_quit() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(kb.matches(Action::Quit, &ev));
    }

    #[test]
    fn display_orders_modifiers() {
        let kb = KeyBindings::default();
        assert_eq!(kb.combos_for(Action::DeleteAll), vec!["Ctrl+Shift+D"]);
        assert_eq!(kb.combos_for(Action::SelectAll), vec!["Ctrl+T"]);
        assert_eq!(default_context_menu_key().display(), "Shift+F10");
        assert_eq!(
            KeyCombo::new(KeyCode::Char(' '), KeyModifiers::CONTROL).display(),
            "Ctrl+Space"
        );
    }

    #[test]
    fn char_combos_ignore_case() {
        let kb = KeyBindings::default();
        let upper = KeyEvent::new(
            KeyCode::Char('D'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        assert!(kb.matches(Action::DeleteAll, &upper));
    }

    #[test]
    fn release_events_never_match() {
        let combo = KeyCombo::new(KeyCode::F(9), KeyModifiers::NONE);
        let mut ev = combo.to_event();
        assert!(combo.matches(&ev));
        ev.kind = KeyEventKind::Release;
        assert!(!combo.matches(&ev));
    }

    #[test]
    fn mouse_combo_matches_press_only() {
        let combo = default_context_menu_mouse();
        assert!(combo.matches(&combo.to_event(3, 4)));
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert!(!combo.matches(&moved));
        let middle = MouseCombo::new(MouseButton::Middle, KeyModifiers::NONE);
        assert!(!middle.matches(&combo.to_event(0, 0)));
        assert_eq!(combo.display(), "Right click");
    }
}
