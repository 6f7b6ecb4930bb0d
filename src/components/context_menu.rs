//! Popup menu anchored at a point or on a host control.
//!
//! A `ContextMenu` knows its items, the chords that summon it and where it
//! was last placed. It does not take input ownership on its own; the
//! `Toplevel` it is registered with shows and hides it through the input
//! arbiter so a menu bar and a context menu are never open together.

use std::fmt;

use crossterm::event::{Event, KeyEvent, MouseEvent};
use ratatui::layout::Rect;

use crate::components::{Component, ComponentContext, MenuItem, MenuList, MenuOutcome};
use crate::keybindings::{
    KeyBindings, KeyCombo, MouseCombo, default_context_menu_key, default_context_menu_mouse,
};
use crate::layout::{Anchor, FloatRect, Placement, PlacementRequest, Point, Size, resolve};
use crate::ui::UiFrame;
use crate::window::HostId;

type Observer<T> = Box<dyn FnMut(&T)>;

pub struct ContextMenu {
    position: Point,
    list: MenuList,
    host: Option<HostId>,
    key: KeyCombo,
    mouse: MouseCombo,
    clamp_to_zero: bool,
    keys: KeyBindings,
    placement: Option<Placement>,
    key_observers: Vec<Observer<KeyCombo>>,
    mouse_observers: Vec<Observer<MouseCombo>>,
}

impl fmt::Debug for ContextMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextMenu")
            .field("position", &self.position)
            .field("items", &self.list.items())
            .field("host", &self.host)
            .field("key", &self.key)
            .field("mouse", &self.mouse)
            .field("clamp_to_zero", &self.clamp_to_zero)
            .field("placement", &self.placement)
            .finish_non_exhaustive()
    }
}

impl Default for ContextMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextMenu {
    pub fn new() -> Self {
        Self {
            position: Point::default(),
            list: MenuList::default(),
            host: None,
            key: default_context_menu_key(),
            mouse: default_context_menu_mouse(),
            clamp_to_zero: true,
            keys: KeyBindings::default(),
            placement: None,
            key_observers: Vec::new(),
            mouse_observers: Vec::new(),
        }
    }

    /// A menu that opens at raw screen coordinates.
    pub fn at(x: i32, y: i32, items: Vec<MenuItem>) -> Self {
        let mut menu = Self::new();
        menu.position = Point::new(x, y);
        menu.list.set_items(items);
        menu
    }

    /// A menu that opens below `host`.
    pub fn for_host(host: HostId, items: Vec<MenuItem>) -> Self {
        let mut menu = Self::new();
        menu.host = Some(host);
        menu.list.set_items(items);
        menu
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Takes effect on the next show.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn items(&self) -> &[MenuItem] {
        self.list.items()
    }

    /// Takes effect on the next show; a visible popup keeps its frame.
    pub fn set_items(&mut self, items: Vec<MenuItem>) {
        self.list.set_items(items);
    }

    pub fn selected(&self) -> Option<usize> {
        self.list.selected()
    }

    pub fn host(&self) -> Option<HostId> {
        self.host
    }

    pub fn set_host(&mut self, host: Option<HostId>) {
        self.host = host;
    }

    pub fn key(&self) -> &KeyCombo {
        &self.key
    }

    /// Replace the keyboard chord. Observers hear about the previous chord
    /// only when the value actually changes.
    pub fn set_key(&mut self, key: KeyCombo) -> KeyCombo {
        let previous = std::mem::replace(&mut self.key, key);
        if previous != self.key {
            tracing::debug!(old = %previous, new = %self.key, "context menu key changed");
            for observer in self.key_observers.iter_mut() {
                observer(&previous);
            }
        }
        previous
    }

    pub fn on_key_changed(&mut self, observer: impl FnMut(&KeyCombo) + 'static) {
        self.key_observers.push(Box::new(observer));
    }

    pub fn mouse(&self) -> MouseCombo {
        self.mouse
    }

    pub fn set_mouse(&mut self, mouse: MouseCombo) -> MouseCombo {
        let previous = std::mem::replace(&mut self.mouse, mouse);
        if previous != self.mouse {
            tracing::debug!(old = %previous, new = %self.mouse, "context menu mouse chord changed");
            for observer in self.mouse_observers.iter_mut() {
                observer(&previous);
            }
        }
        previous
    }

    pub fn on_mouse_changed(&mut self, observer: impl FnMut(&MouseCombo) + 'static) {
        self.mouse_observers.push(Box::new(observer));
    }

    pub fn matches_key(&self, key: &KeyEvent) -> bool {
        self.key.matches(key)
    }

    pub fn matches_mouse(&self, mouse: &MouseEvent) -> bool {
        self.mouse.matches(mouse)
    }

    pub fn clamp_to_zero(&self) -> bool {
        self.clamp_to_zero
    }

    pub fn set_clamp_to_zero(&mut self, clamp: bool) {
        self.clamp_to_zero = clamp;
    }

    pub fn set_keybindings(&mut self, keys: KeyBindings) {
        self.keys = keys;
    }

    pub fn natural_size(&self) -> Size {
        self.list.natural_size()
    }

    pub fn is_visible(&self) -> bool {
        self.placement.is_some()
    }

    /// Frame of the visible popup body.
    pub fn frame(&self) -> Option<FloatRect> {
        self.placement.map(|placement| placement.frame)
    }

    /// Part of the visible popup that lands inside `viewport`.
    pub fn visible_rect(&self, viewport: Rect) -> Option<Rect> {
        self.placement.map(|placement| placement.visible(viewport))
    }

    /// Resolve placement and mark the popup visible. `host_frame` is the
    /// screen frame of the host control when it still exists; without it the
    /// menu falls back to its raw position. This does not touch input
    /// ownership.
    pub fn open(&mut self, viewport: Rect, host_frame: Option<Rect>) -> Placement {
        let anchor = match host_frame {
            Some(frame) => Anchor::Host(frame),
            None => Anchor::Point(self.position),
        };
        let placement = resolve(&PlacementRequest {
            anchor,
            natural: self.list.natural_size(),
            viewport,
            clamp_to_zero: self.clamp_to_zero,
        });
        self.position = placement.position;
        if self.placement.is_none() {
            self.list.select_first();
        }
        self.placement = Some(placement);
        placement
    }

    /// Hide the popup. Returns the frame it occupied, if it was visible.
    pub fn close(&mut self) -> Option<FloatRect> {
        self.placement.take().map(|placement| placement.frame)
    }

    /// Route an event to the visible popup.
    pub fn handle_menu_event(&mut self, event: &Event) -> MenuOutcome {
        let Some(frame) = self.frame() else {
            return MenuOutcome::Ignored;
        };
        match event {
            Event::Key(key) => match self.list.handle_key(key, &self.keys) {
                // The popup is modal while open.
                MenuOutcome::Ignored => MenuOutcome::Handled,
                outcome => outcome,
            },
            Event::Mouse(mouse) => self.list.handle_mouse(mouse, frame),
            _ => MenuOutcome::Ignored,
        }
    }
}

impl Component for ContextMenu {
    fn render(&mut self, frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {
        if let Some(rect) = self.frame() {
            self.list.render(frame, rect);
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        !matches!(self.handle_menu_event(event), MenuOutcome::Ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn one_two() -> Vec<MenuItem> {
        vec![MenuItem::new("One", "one"), MenuItem::new("Two", "two")]
    }

    #[test]
    fn new_menu_has_default_chords_and_no_host() {
        let menu = ContextMenu::new();
        assert_eq!(menu.position(), Point::new(0, 0));
        assert!(menu.items().is_empty());
        assert_eq!(menu.host(), None);
        assert_eq!(menu.key(), &KeyCombo::new(KeyCode::F(10), KeyModifiers::SHIFT));
        assert_eq!(
            menu.mouse(),
            MouseCombo::new(MouseButton::Right, KeyModifiers::NONE)
        );
        assert!(menu.clamp_to_zero());
        assert!(!menu.is_visible());
    }

    #[test]
    fn set_key_notifies_with_previous_chord() {
        let mut menu = ContextMenu::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        menu.on_key_changed(move |old| sink.borrow_mut().push(old.clone()));
        let ctrl_space = KeyCombo::new(KeyCode::Char(' '), KeyModifiers::CONTROL);
        let previous = menu.set_key(ctrl_space.clone());
        assert_eq!(previous, default_context_menu_key());
        assert_eq!(menu.key(), &ctrl_space);
        assert_eq!(seen.borrow().as_slice(), &[default_context_menu_key()]);
        menu.set_key(ctrl_space);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn set_mouse_notifies_with_previous_chord() {
        let mut menu = ContextMenu::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        menu.on_mouse_changed(move |old| sink.borrow_mut().push(*old));
        let left = MouseCombo::new(MouseButton::Left, KeyModifiers::NONE);
        assert_eq!(menu.set_mouse(left), default_context_menu_mouse());
        assert_eq!(menu.mouse(), left);
        assert_eq!(seen.borrow().as_slice(), &[default_context_menu_mouse()]);
    }

    #[test]
    fn open_does_not_rewrite_raw_position() {
        let mut menu = ContextMenu::at(80, 25, one_two());
        let placed = menu.open(Rect::new(0, 0, 80, 25), None);
        assert_eq!(placed.frame, FloatRect::new(72, 21, 8, 4));
        assert_eq!(menu.position(), Point::new(80, 25));
        assert!(menu.is_visible());
        assert_eq!(menu.close(), Some(FloatRect::new(72, 21, 8, 4)));
        assert_eq!(menu.close(), None);
    }

    #[test]
    fn host_open_reports_host_anchor_as_position() {
        let mut menu = ContextMenu::for_host(HostId(1), one_two());
        menu.open(Rect::new(0, 0, 80, 25), Some(Rect::new(5, 10, 10, 3)));
        assert_eq!(menu.position(), Point::new(5, 12));
        assert_eq!(menu.frame(), Some(FloatRect::new(5, 13, 8, 4)));
    }

    #[test]
    fn clamp_flag_controls_negative_positions() {
        let viewport = Rect::new(0, 0, 80, 25);
        let mut menu = ContextMenu::at(-1, -2, one_two());
        menu.open(viewport, None);
        assert_eq!(menu.frame(), Some(FloatRect::new(0, 1, 8, 4)));
        menu.close();
        menu.set_clamp_to_zero(false);
        menu.open(viewport, None);
        assert_eq!(menu.frame(), Some(FloatRect::new(-1, -1, 8, 4)));
        assert_eq!(menu.visible_rect(viewport), Some(Rect::new(0, 0, 7, 3)));
    }

    #[test]
    fn new_items_apply_on_next_open() {
        let viewport = Rect::new(0, 0, 80, 25);
        let mut menu = ContextMenu::at(0, 0, one_two());
        menu.open(viewport, None);
        menu.set_items(vec![MenuItem::new("Longer title", "long")]);
        assert_eq!(menu.frame(), Some(FloatRect::new(0, 1, 8, 4)));
        menu.open(viewport, None);
        assert_eq!(menu.frame(), Some(FloatRect::new(0, 1, 17, 3)));
    }

    #[test]
    fn hidden_menu_ignores_events() {
        let mut menu = ContextMenu::at(0, 0, one_two());
        let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(menu.handle_menu_event(&esc), MenuOutcome::Ignored);
        menu.open(Rect::new(0, 0, 80, 25), None);
        assert_eq!(menu.handle_menu_event(&esc), MenuOutcome::Dismissed);
    }

    #[test]
    fn open_menu_swallows_unbound_keys_but_not_pointer_motion_outside() {
        let mut menu = ContextMenu::at(0, 0, one_two());
        menu.open(Rect::new(0, 0, 80, 25), None);
        let key = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert_eq!(menu.handle_menu_event(&key), MenuOutcome::Handled);
        let moved = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 40,
            row: 20,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(menu.handle_menu_event(&moved), MenuOutcome::Ignored);
    }
}
