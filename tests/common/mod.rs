#![allow(dead_code)]

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use term_menu::components::{MenuBar, MenuBarItem, MenuItem, StatusBar, StatusItem};
use term_menu::keybindings::KeyCombo;
use term_menu::ui::UiFrame;
use term_menu::window::Toplevel;

pub fn render(top: &mut Toplevel) -> Buffer {
    let area = top.viewport();
    let mut buffer = Buffer::empty(area);
    let mut frame = UiFrame::from_parts(area, &mut buffer);
    top.render(&mut frame);
    buffer
}

/// Rows of the buffer with trailing blanks removed.
pub fn lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.y..area.bottom())
        .map(|y| {
            let row: String = (area.x..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            row.trim_end().to_string()
        })
        .collect()
}

/// The whole screen as text, without trailing blank rows.
pub fn screen(buffer: &Buffer) -> String {
    let mut rows = lines(buffer);
    while rows.last().is_some_and(String::is_empty) {
        rows.pop();
    }
    rows.join("\n")
}

/// Smallest rectangle holding every non-blank cell.
pub fn drawn_bounds(buffer: &Buffer) -> Option<Rect> {
    let area = buffer.area;
    let mut bounds: Option<(u16, u16, u16, u16)> = None;
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if buffer[(x, y)].symbol().trim().is_empty() {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x), b.max(y)),
            });
        }
    }
    bounds.map(|(l, t, r, b)| Rect::new(l, t, r - l + 1, b - t + 1))
}

pub fn key(code: KeyCode, mods: KeyModifiers) -> Event {
    Event::Key(KeyEvent::new(code, mods))
}

pub fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

pub fn press(button: MouseButton, column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Down(button), column, row)
}

pub fn one_two() -> Vec<MenuItem> {
    vec![MenuItem::new("One", "one"), MenuItem::new("Two", "two")]
}

pub fn file_edit_bar() -> MenuBar {
    MenuBar::new(vec![
        MenuBarItem::new(
            "File",
            vec![
                MenuItem::new("New", "new"),
                MenuItem::new("Quit", "quit").with_shortcut("Ctrl+Q"),
            ],
        ),
        MenuBarItem::new(
            "Edit",
            vec![
                MenuItem::new("Copy", "copy"),
                MenuItem::new("Cut", "cut"),
                MenuItem::new("Paste", "paste"),
            ],
        ),
    ])
}

pub fn help_quit_status() -> StatusBar {
    StatusBar::new(vec![
        StatusItem::new(
            Some(KeyCombo::new(KeyCode::F(1), KeyModifiers::NONE)),
            "~F1~ Help",
            "help",
        ),
        StatusItem::new(
            Some(KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            "~^Q~ Quit",
            "quit",
        ),
    ])
}
