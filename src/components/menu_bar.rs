use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseEventKind};
use ratatui::layout::Rect;

use crate::components::{Component, ComponentContext, MenuItem, MenuList, MenuOutcome};
use crate::constants::{MENU_BAR_LEFT_MARGIN, MENU_BAR_TITLE_GAP};
use crate::keybindings::{Action, KeyBindings, is_bare_alt};
use crate::layout::{Anchor, FloatRect, PlacementRequest, Point, rect_contains, resolve};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, text_width};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuBarItem {
    title: String,
    command: Option<String>,
    children: Vec<MenuItem>,
}

impl MenuBarItem {
    /// A title that drops down `children` when opened.
    pub fn new(title: impl Into<String>, children: Vec<MenuItem>) -> Self {
        Self {
            title: title.into(),
            command: None,
            children,
        }
    }

    /// A title with no drop-down that runs `command` when chosen.
    pub fn action(title: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            command: Some(command.into()),
            children: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn children(&self) -> &[MenuItem] {
        &self.children
    }

    fn label(&self) -> String {
        format!(" {} ", self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuBarOutcome {
    Ignored,
    Handled,
    Activated(String),
    Closed,
}

#[derive(Debug)]
pub struct MenuBar {
    items: Vec<MenuBarItem>,
    area: Rect,
    viewport: Rect,
    title_hits: Vec<Rect>,
    open: bool,
    selected: usize,
    drop_down: MenuList,
    drop_frame: Option<FloatRect>,
    alt_armed: bool,
}

impl MenuBar {
    pub fn new(items: Vec<MenuBarItem>) -> Self {
        Self {
            items,
            area: Rect::default(),
            viewport: Rect::default(),
            title_hits: Vec::new(),
            open: false,
            selected: 0,
            drop_down: MenuList::default(),
            drop_frame: None,
            alt_armed: false,
        }
    }

    pub fn items(&self) -> &[MenuBarItem] {
        &self.items
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> Option<usize> {
        self.open.then_some(self.selected)
    }

    pub fn drop_down_frame(&self) -> Option<FloatRect> {
        self.drop_frame
    }

    /// Place the bar on `area` (one row) and recompute title hit rects.
    /// An open drop-down is re-placed against the new viewport.
    pub fn layout(&mut self, area: Rect, viewport: Rect) {
        self.area = area;
        self.viewport = viewport;
        self.title_hits.clear();
        let max_x = area.right();
        let mut x = area.x.saturating_add(MENU_BAR_LEFT_MARGIN);
        for item in &self.items {
            let width = text_width(&item.label());
            if area.height == 0 || x.saturating_add(width) > max_x {
                break;
            }
            self.title_hits.push(Rect::new(x, area.y, width, 1));
            x = x.saturating_add(width).saturating_add(MENU_BAR_TITLE_GAP);
        }
        if self.open {
            self.place_drop_down();
        }
    }

    pub fn title_at(&self, column: u16, row: u16) -> Option<usize> {
        self.title_hits
            .iter()
            .position(|rect| rect_contains(*rect, column, row))
    }

    /// Track a bare Alt tap. Returns true on the release edge of an Alt press
    /// with no other key in between.
    pub fn track_alt(&mut self, key: &KeyEvent) -> bool {
        if !is_bare_alt(key) {
            if key.kind != KeyEventKind::Release {
                self.alt_armed = false;
            }
            return false;
        }
        match key.kind {
            KeyEventKind::Press => {
                self.alt_armed = true;
                false
            }
            KeyEventKind::Release => std::mem::take(&mut self.alt_armed),
            KeyEventKind::Repeat => false,
        }
    }

    /// Open on title `index`. Returns the drop-down frame, if the title has
    /// children.
    pub fn open(&mut self, index: usize) -> Option<FloatRect> {
        if index >= self.items.len() {
            return None;
        }
        self.open = true;
        self.alt_armed = false;
        self.select_title(index);
        tracing::debug!(title = %self.items[index].title, "menu bar opened");
        self.drop_frame
    }

    /// Close the bar. Returns the drop-down frame that was visible.
    pub fn close(&mut self) -> Option<FloatRect> {
        if !self.open {
            return None;
        }
        self.open = false;
        tracing::debug!("menu bar closed");
        self.drop_frame.take()
    }

    fn select_title(&mut self, index: usize) {
        self.selected = index;
        self.drop_down.set_items(self.items[index].children.clone());
        self.place_drop_down();
    }

    fn place_drop_down(&mut self) {
        self.drop_frame = None;
        if self.drop_down.is_empty() {
            return;
        }
        let Some(hit) = self.title_hits.get(self.selected) else {
            return;
        };
        let placement = resolve(&PlacementRequest {
            anchor: Anchor::Point(Point::new(hit.x as i32, hit.y as i32)),
            natural: self.drop_down.natural_size(),
            viewport: self.viewport,
            clamp_to_zero: true,
        });
        self.drop_frame = Some(placement.frame);
    }

    fn activate_selected_title(&self) -> MenuBarOutcome {
        match &self.items[self.selected].command {
            Some(command) => MenuBarOutcome::Activated(command.clone()),
            None => MenuBarOutcome::Closed,
        }
    }

    fn outcome_for(&self, outcome: MenuOutcome) -> MenuBarOutcome {
        match outcome {
            MenuOutcome::Ignored => MenuBarOutcome::Ignored,
            MenuOutcome::Handled => MenuBarOutcome::Handled,
            MenuOutcome::Dismissed => MenuBarOutcome::Closed,
            MenuOutcome::Activated(idx) => self
                .drop_down
                .items()
                .get(idx)
                .map(|item| MenuBarOutcome::Activated(item.command().to_string()))
                .unwrap_or(MenuBarOutcome::Handled),
        }
    }

    /// Route an event while the bar is open.
    pub fn handle_open_event(&mut self, event: &Event, keys: &KeyBindings) -> MenuBarOutcome {
        if !self.open || self.items.is_empty() {
            return MenuBarOutcome::Ignored;
        }
        match event {
            Event::Key(key) => {
                if keys.matches(Action::MenuBarToggle, key) {
                    return MenuBarOutcome::Closed;
                }
                if keys.matches(Action::MenuLeft, key) {
                    let len = self.items.len();
                    self.select_title((self.selected + len - 1) % len);
                    return MenuBarOutcome::Handled;
                }
                if keys.matches(Action::MenuRight, key) {
                    self.select_title((self.selected + 1) % self.items.len());
                    return MenuBarOutcome::Handled;
                }
                if self.drop_down.is_empty() {
                    if keys.matches(Action::MenuSelect, key) {
                        return self.activate_selected_title();
                    }
                    if keys.matches(Action::MenuClose, key) {
                        return MenuBarOutcome::Closed;
                    }
                    return MenuBarOutcome::Ignored;
                }
                let outcome = self.drop_down.handle_key(key, keys);
                self.outcome_for(outcome)
            }
            Event::Mouse(mouse) => {
                if let Some(index) = self.title_at(mouse.column, mouse.row) {
                    return match mouse.kind {
                        MouseEventKind::Down(_) if index == self.selected => {
                            MenuBarOutcome::Closed
                        }
                        MouseEventKind::Down(_) | MouseEventKind::Moved => {
                            if index != self.selected {
                                self.select_title(index);
                            }
                            MenuBarOutcome::Handled
                        }
                        _ => MenuBarOutcome::Handled,
                    };
                }
                if let Some(frame) = self.drop_frame
                    && frame.contains(mouse.column as i32, mouse.row as i32)
                {
                    let outcome = self.drop_down.handle_mouse(mouse, frame);
                    return self.outcome_for(outcome);
                }
                match mouse.kind {
                    MouseEventKind::Down(_) => MenuBarOutcome::Closed,
                    _ => MenuBarOutcome::Ignored,
                }
            }
            _ => MenuBarOutcome::Ignored,
        }
    }

    /// Draw the open drop-down. Called after everything else so it sits on
    /// top.
    pub fn render_drop_down(&self, frame: &mut UiFrame<'_>) {
        if let Some(rect) = self.drop_frame {
            self.drop_down.render(frame, rect);
        }
    }
}

impl Component for MenuBar {
    fn resize(&mut self, area: Rect, ctx: &ComponentContext) {
        self.layout(area, ctx.viewport());
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        frame.fill_style(area, theme::panel_style());
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        for (idx, (item, hit)) in self.items.iter().zip(self.title_hits.iter()).enumerate() {
            let style = if self.open && idx == self.selected {
                theme::menu_selected_style()
            } else {
                theme::panel_style()
            };
            safe_set_string(buffer, bounds, hit.x, hit.y, &item.label(), style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent};
    use ratatui::buffer::Buffer;

    fn file_edit() -> MenuBar {
        let mut bar = MenuBar::new(vec![
            MenuBarItem::new(
                "File",
                vec![MenuItem::new("New", "new"), MenuItem::new("Quit", "quit")],
            ),
            MenuBarItem::new("Edit", vec![MenuItem::new("Copy", "copy")]),
        ]);
        bar.layout(Rect::new(0, 0, 45, 1), Rect::new(0, 0, 45, 17));
        bar
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn titles_are_laid_out_with_margin_and_gap() {
        let bar = file_edit();
        assert_eq!(bar.title_at(1, 0), Some(0));
        assert_eq!(bar.title_at(6, 0), Some(0));
        assert_eq!(bar.title_at(7, 0), None);
        assert_eq!(bar.title_at(8, 0), Some(1));
        assert_eq!(bar.title_at(0, 0), None);
    }

    #[test]
    fn render_row_matches_layout() {
        let mut bar = file_edit();
        let area = Rect::new(0, 0, 45, 1);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        bar.render(&mut frame, area, &ComponentContext::default());
        let row: String = (0..15)
            .map(|x| buf.cell((x, 0)).map(|c| c.symbol()).unwrap_or(" "))
            .collect();
        assert_eq!(row, "  File   Edit  ");
    }

    #[test]
    fn drop_down_hangs_below_title() {
        let mut bar = file_edit();
        assert_eq!(bar.open(0), Some(FloatRect::new(1, 1, 9, 4)));
        assert_eq!(bar.selected(), Some(0));
        assert_eq!(bar.close(), Some(FloatRect::new(1, 1, 9, 4)));
        assert!(!bar.is_open());
        assert_eq!(bar.selected(), None);
    }

    #[test]
    fn arrows_switch_titles_and_wrap() {
        let keys = KeyBindings::default();
        let mut bar = file_edit();
        bar.open(0);
        assert_eq!(
            bar.handle_open_event(&key(KeyCode::Right), &keys),
            MenuBarOutcome::Handled
        );
        assert_eq!(bar.selected(), Some(1));
        assert_eq!(bar.drop_down_frame(), Some(FloatRect::new(8, 1, 9, 3)));
        bar.handle_open_event(&key(KeyCode::Right), &keys);
        assert_eq!(bar.selected(), Some(0));
        bar.handle_open_event(&key(KeyCode::Left), &keys);
        assert_eq!(bar.selected(), Some(1));
    }

    #[test]
    fn enter_activates_drop_down_item() {
        let keys = KeyBindings::default();
        let mut bar = file_edit();
        bar.open(0);
        bar.handle_open_event(&key(KeyCode::Down), &keys);
        assert_eq!(
            bar.handle_open_event(&key(KeyCode::Enter), &keys),
            MenuBarOutcome::Activated("quit".into())
        );
    }

    #[test]
    fn escape_and_f9_close() {
        let keys = KeyBindings::default();
        let mut bar = file_edit();
        bar.open(1);
        assert_eq!(
            bar.handle_open_event(&key(KeyCode::Esc), &keys),
            MenuBarOutcome::Closed
        );
        assert_eq!(
            bar.handle_open_event(&key(KeyCode::F(9)), &keys),
            MenuBarOutcome::Closed
        );
    }

    #[test]
    fn clicks_toggle_switch_and_close() {
        let keys = KeyBindings::default();
        let mut bar = file_edit();
        bar.open(0);
        let down = MouseEventKind::Down(MouseButton::Left);
        assert_eq!(
            bar.handle_open_event(&mouse(down, 9, 0), &keys),
            MenuBarOutcome::Handled
        );
        assert_eq!(bar.selected(), Some(1));
        assert_eq!(
            bar.handle_open_event(&mouse(down, 9, 0), &keys),
            MenuBarOutcome::Closed
        );
        assert_eq!(
            bar.handle_open_event(&mouse(down, 30, 10), &keys),
            MenuBarOutcome::Closed
        );
        assert_eq!(
            bar.handle_open_event(&mouse(MouseEventKind::Moved, 30, 10), &keys),
            MenuBarOutcome::Ignored
        );
    }

    #[test]
    fn click_in_drop_down_activates_item() {
        let keys = KeyBindings::default();
        let mut bar = file_edit();
        bar.open(0);
        assert_eq!(
            bar.handle_open_event(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 2), &keys),
            MenuBarOutcome::Activated("new".into())
        );
    }

    #[test]
    fn action_title_activates_without_drop_down() {
        let keys = KeyBindings::default();
        let mut bar = MenuBar::new(vec![MenuBarItem::action("Help", "help")]);
        bar.layout(Rect::new(0, 0, 20, 1), Rect::new(0, 0, 20, 5));
        assert_eq!(bar.open(0), None);
        assert_eq!(
            bar.handle_open_event(&key(KeyCode::Enter), &keys),
            MenuBarOutcome::Activated("help".into())
        );
    }

    #[test]
    fn alt_tap_fires_on_release_only() {
        let mut bar = file_edit();
        let press = KeyEvent::new(
            KeyCode::Modifier(crossterm::event::ModifierKeyCode::LeftAlt),
            KeyModifiers::ALT,
        );
        let mut release = press;
        release.kind = KeyEventKind::Release;
        assert!(!bar.track_alt(&press));
        assert!(bar.track_alt(&release));
        assert!(!bar.track_alt(&release));

        assert!(!bar.track_alt(&press));
        assert!(!bar.track_alt(&KeyEvent::new(KeyCode::Char('f'), KeyModifiers::ALT)));
        assert!(!bar.track_alt(&release));
    }
}
