//! The toplevel: owns the controls on screen, the menu bar, the status bar and
//! every context menu, and routes input according to who currently holds the
//! input token.
//!
//! Routing order for a key:
//! 1. Alt tap edge and the menu-bar hot key toggle the menu bar in any state.
//! 2. Otherwise the current owner (open context menu or open menu bar) gets it.
//! 3. With nobody owning input: status-bar shortcuts, then context-menu
//!    chords, then the focused control.
//!
//! Mouse input follows the same owner-first rule, except that a press on a
//! menu-bar title always opens the menu bar. Pointer motion never changes
//! ownership.

use std::collections::{BTreeMap, BTreeSet};

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::widgets::Clear;

use super::{Dock, HostId};
use crate::arbiter::{Acquire, ArbiterState, InputArbiter, Owner};
use crate::components::{
    Component, ComponentContext, ContextMenu, Control, MenuBar, MenuBarOutcome, MenuId,
    MenuOutcome, StatusBar,
};
use crate::keybindings::{Action, KeyBindings, is_bare_alt};
use crate::layout::{FloatRect, Point, RegionMap, inset_rect};
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    ContextMenu(MenuId),
    MenuBar,
    StatusBar,
}

/// A command chosen by the user that no control consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub source: CommandSource,
    pub id: String,
}

#[derive(Debug)]
struct ControlEntry {
    parent: Option<HostId>,
    dock: Dock,
    frame: Rect,
    control: Box<dyn Control>,
}

#[derive(Debug)]
pub struct Toplevel {
    viewport: Rect,
    arbiter: InputArbiter,
    keys: KeyBindings,
    controls: BTreeMap<HostId, ControlEntry>,
    order: Vec<HostId>,
    regions: RegionMap<HostId>,
    next_host: u32,
    menus: BTreeMap<MenuId, ContextMenu>,
    host_menus: BTreeMap<HostId, MenuId>,
    next_menu: u32,
    menu_bar: Option<MenuBar>,
    status_bar: Option<StatusBar>,
    focus: Option<HostId>,
    running: bool,
    commands: Vec<Command>,
    redraw: Vec<Rect>,
}

impl Toplevel {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            viewport: Rect::new(0, 0, width, height),
            arbiter: InputArbiter::new(),
            keys: KeyBindings::default(),
            controls: BTreeMap::new(),
            order: Vec::new(),
            regions: RegionMap::default(),
            next_host: 0,
            menus: BTreeMap::new(),
            host_menus: BTreeMap::new(),
            next_menu: 0,
            menu_bar: None,
            status_bar: None,
            focus: None,
            running: false,
            commands: Vec::new(),
            redraw: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn arbiter(&self) -> &InputArbiter {
        &self.arbiter
    }

    pub fn state(&self) -> ArbiterState {
        self.arbiter.state()
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keys
    }

    pub fn set_keybindings(&mut self, keys: KeyBindings) {
        for menu in self.menus.values_mut() {
            menu.set_keybindings(keys.clone());
        }
        self.keys = keys;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start a run: lay everything out and focus the first focusable control.
    pub fn begin(&mut self) {
        self.running = true;
        self.relayout();
        if self.focus.is_none() {
            self.focus = self.first_focusable();
        }
        self.redraw.push(self.viewport);
        tracing::info!(
            width = self.viewport.width,
            height = self.viewport.height,
            controls = self.order.len(),
            "toplevel started"
        );
    }

    /// End the run. Hides whatever holds input and returns the arbiter to
    /// idle.
    pub fn request_stop(&mut self) {
        let visible: Vec<MenuId> = self
            .menus
            .iter()
            .filter(|(_, menu)| menu.is_visible())
            .map(|(id, _)| *id)
            .collect();
        for id in visible {
            if let Some(frame) = self.menus.get_mut(&id).and_then(ContextMenu::close) {
                self.mark(frame);
            }
        }
        if let Some(bar) = self.menu_bar.as_mut()
            && let Some(frame) = bar.close()
        {
            self.mark(frame);
        }
        self.arbiter.reset();
        self.running = false;
        tracing::info!("toplevel stopped");
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0, 0, width, height);
        self.relayout();
        self.replace_visible_menus(|_| true);
        self.redraw.push(self.viewport);
        tracing::debug!(width, height, "toplevel resized");
    }

    /// Re-resolve the placement of every visible menu accepted by `filter`.
    fn replace_visible_menus(&mut self, filter: impl Fn(&ContextMenu) -> bool) {
        let visible: Vec<MenuId> = self
            .menus
            .iter()
            .filter(|(_, menu)| menu.is_visible() && filter(menu))
            .map(|(id, _)| *id)
            .collect();
        for id in visible {
            let host_frame = self.host_frame_of(id);
            let viewport = self.viewport;
            let Some(menu) = self.menus.get_mut(&id) else {
                continue;
            };
            let previous = menu.frame();
            let placement = menu.open(viewport, host_frame);
            if let Some(frame) = previous {
                self.mark(frame);
            }
            self.mark(placement.frame);
        }
    }

    // Controls

    /// Add a control at the top level. `Dock::Fixed` rects are screen
    /// coordinates; the other docks fill the rows between the menu bar and
    /// the status bar.
    pub fn add_control(&mut self, control: impl Control + 'static, dock: Dock) -> HostId {
        self.insert_control(None, Box::new(control), dock)
    }

    /// Add a control inside `parent`'s content area.
    pub fn add_child(
        &mut self,
        parent: HostId,
        control: impl Control + 'static,
        dock: Dock,
    ) -> Option<HostId> {
        if !self.controls.contains_key(&parent) {
            return None;
        }
        Some(self.insert_control(Some(parent), Box::new(control), dock))
    }

    fn insert_control(
        &mut self,
        parent: Option<HostId>,
        control: Box<dyn Control>,
        dock: Dock,
    ) -> HostId {
        let id = HostId(self.next_host);
        self.next_host = self.next_host.saturating_add(1);
        let items = control.context_menu_items();
        self.controls.insert(
            id,
            ControlEntry {
                parent,
                dock,
                frame: Rect::default(),
                control,
            },
        );
        self.order.push(id);
        if let Some(items) = items {
            let mut menu = ContextMenu::for_host(id, items);
            menu.set_keybindings(self.keys.clone());
            let menu_id = self.add_context_menu(menu);
            self.host_menus.insert(id, menu_id);
        }
        self.relayout();
        if let Some(frame) = self.control_frame(id) {
            self.redraw.push(frame);
        }
        tracing::debug!(?id, ?parent, ?dock, "control added");
        id
    }

    /// Remove a control and everything nested in it. Context menus hosted by
    /// removed controls stay registered and fall back to their last position.
    pub fn remove_control(&mut self, id: HostId) -> bool {
        if !self.controls.contains_key(&id) {
            return false;
        }
        let removed = self.subtree_of(id);
        for gone in &removed {
            if let Some(entry) = self.controls.remove(gone) {
                self.redraw.push(entry.frame);
            }
            self.regions.remove(*gone);
            self.host_menus.remove(gone);
        }
        self.order.retain(|candidate| !removed.contains(candidate));
        if self.focus.is_some_and(|focus| removed.contains(&focus)) {
            self.focus = self.first_focusable();
        }
        self.relayout();
        tracing::debug!(?id, removed = removed.len(), "control removed");
        true
    }

    /// Move or resize a control. Visible menus hosted by it, or by anything
    /// nested in it, follow the new geometry.
    pub fn set_dock(&mut self, id: HostId, dock: Dock) -> bool {
        let Some(entry) = self.controls.get_mut(&id) else {
            return false;
        };
        let previous = entry.frame;
        entry.dock = dock;
        self.relayout();
        self.redraw.push(previous);
        if let Some(frame) = self.control_frame(id) {
            self.redraw.push(frame);
        }
        let moved: BTreeSet<HostId> = self.subtree_of(id);
        self.replace_visible_menus(|menu| menu.host().is_some_and(|host| moved.contains(&host)));
        tracing::debug!(?id, ?dock, "control docked");
        true
    }

    /// `id` and every control nested in it.
    fn subtree_of(&self, id: HostId) -> BTreeSet<HostId> {
        let mut tree = BTreeSet::from([id]);
        for candidate in &self.order {
            if let Some(parent) = self.controls.get(candidate).and_then(|entry| entry.parent)
                && tree.contains(&parent)
            {
                tree.insert(*candidate);
            }
        }
        tree
    }

    pub fn control_ids(&self) -> &[HostId] {
        &self.order
    }

    pub fn control<T: Control>(&self, id: HostId) -> Option<&T> {
        self.controls
            .get(&id)
            .and_then(|entry| (*entry.control).as_any().downcast_ref::<T>())
    }

    pub fn control_mut<T: Control>(&mut self, id: HostId) -> Option<&mut T> {
        self.controls
            .get_mut(&id)
            .and_then(|entry| (*entry.control).as_any_mut().downcast_mut::<T>())
    }

    /// Screen rectangle of a control.
    pub fn control_frame(&self, id: HostId) -> Option<Rect> {
        self.controls.get(&id).map(|entry| entry.frame)
    }

    pub fn focused(&self) -> Option<HostId> {
        self.focus
    }

    pub fn set_focus(&mut self, id: HostId) -> bool {
        let Some(entry) = self.controls.get(&id) else {
            return false;
        };
        if !entry.control.focusable() {
            return false;
        }
        if self.focus != Some(id) {
            if let Some(old) = self.focus.and_then(|old| self.control_frame(old)) {
                self.redraw.push(old);
            }
            self.redraw.push(entry.frame);
            self.focus = Some(id);
        }
        true
    }

    fn first_focusable(&self) -> Option<HostId> {
        self.order.iter().copied().find(|id| {
            self.controls
                .get(id)
                .is_some_and(|entry| entry.control.focusable())
        })
    }

    fn context_for(&self, id: HostId) -> ComponentContext {
        ComponentContext::new(self.focus == Some(id)).with_viewport(self.viewport)
    }

    fn control_at(&self, column: u16, row: u16) -> Option<HostId> {
        let topmost_first: Vec<HostId> = self.order.iter().rev().copied().collect();
        self.regions.hit_test(column, row, &topmost_first)
    }

    /// Split the viewport into menu-bar row, status-bar row and the content
    /// rows between them.
    fn split_area(&self) -> (Rect, Rect, Rect) {
        let area = self.viewport;
        let top_h = if self.menu_bar.is_some() {
            area.height.min(1)
        } else {
            0
        };
        let bottom_h = if self.status_bar.is_some() {
            area.height.saturating_sub(top_h).min(1)
        } else {
            0
        };
        let bar = Rect::new(area.x, area.y, area.width, top_h);
        let status = Rect::new(
            area.x,
            area.bottom().saturating_sub(bottom_h),
            area.width,
            bottom_h,
        );
        let content = Rect::new(
            area.x,
            area.y.saturating_add(top_h),
            area.width,
            area.height.saturating_sub(top_h).saturating_sub(bottom_h),
        );
        (bar, status, content)
    }

    fn content_of(&self, id: HostId) -> Rect {
        self.controls
            .get(&id)
            .map(|entry| inset_rect(entry.frame, entry.control.content_inset()))
            .unwrap_or_default()
    }

    fn relayout(&mut self) {
        let (bar_area, status_area, content) = self.split_area();
        let viewport = self.viewport;
        let ctx = ComponentContext::default().with_viewport(viewport);
        if let Some(bar) = self.menu_bar.as_mut() {
            bar.resize(bar_area, &ctx);
        }
        if let Some(status) = self.status_bar.as_mut() {
            status.resize(status_area, &ctx);
        }
        self.regions.clear();
        for id in self.order.clone() {
            let Some(entry) = self.controls.get(&id) else {
                continue;
            };
            let bounds = match (entry.parent, entry.dock) {
                (Some(parent), _) => self.content_of(parent),
                (None, Dock::Fixed(_)) => viewport,
                (None, _) => content,
            };
            let ctx = self.context_for(id);
            let Some(entry) = self.controls.get_mut(&id) else {
                continue;
            };
            entry.frame = entry.dock.resolve(bounds);
            entry.control.resize(entry.frame, &ctx);
            self.regions.set(id, entry.frame);
        }
    }

    // Bars

    pub fn set_menu_bar(&mut self, bar: MenuBar) {
        if self.arbiter.is_owned_by(Owner::MenuBar) {
            self.arbiter.release(Owner::MenuBar);
        }
        self.menu_bar = Some(bar);
        self.relayout();
        self.redraw.push(self.viewport);
    }

    pub fn menu_bar(&self) -> Option<&MenuBar> {
        self.menu_bar.as_ref()
    }

    pub fn set_status_bar(&mut self, bar: StatusBar) {
        self.status_bar = Some(bar);
        self.relayout();
        self.redraw.push(self.viewport);
    }

    pub fn status_bar(&self) -> Option<&StatusBar> {
        self.status_bar.as_ref()
    }

    pub fn is_menu_bar_open(&self) -> bool {
        self.menu_bar.as_ref().is_some_and(MenuBar::is_open)
    }

    pub fn open_menu_bar(&mut self) -> bool {
        self.open_menu_bar_at(0)
    }

    /// Open the menu bar on title `index`, taking input from any visible
    /// context menu.
    pub fn open_menu_bar_at(&mut self, index: usize) -> bool {
        if self
            .menu_bar
            .as_ref()
            .is_none_or(|bar| index >= bar.items().len())
        {
            return false;
        }
        if let Acquire::Granted {
            displaced: Some(previous),
        } = self.arbiter.acquire(Owner::MenuBar)
        {
            self.hide_displaced(previous);
        }
        if let Some(bar) = self.menu_bar.as_mut() {
            if let Some(previous) = bar.drop_down_frame() {
                self.redraw.push(previous.visible_in(self.viewport));
            }
            bar.open(index);
        }
        self.mark_menu_bar();
        true
    }

    pub fn close_menu_bar(&mut self) -> bool {
        let Some(bar) = self.menu_bar.as_mut() else {
            return false;
        };
        if !bar.is_open() {
            return false;
        }
        let dropped = bar.close();
        let area = bar.area();
        self.arbiter.release(Owner::MenuBar);
        self.redraw.push(area);
        if let Some(frame) = dropped {
            self.mark(frame);
        }
        true
    }

    fn toggle_menu_bar(&mut self) -> bool {
        if self.is_menu_bar_open() {
            self.close_menu_bar()
        } else {
            self.open_menu_bar()
        }
    }

    fn mark_menu_bar(&mut self) {
        let Some(bar) = self.menu_bar.as_ref() else {
            return;
        };
        let area = bar.area();
        let drop = bar.drop_down_frame();
        self.redraw.push(area);
        if let Some(frame) = drop {
            self.mark(frame);
        }
    }

    // Context menus

    pub fn add_context_menu(&mut self, mut menu: ContextMenu) -> MenuId {
        let id = MenuId(self.next_menu);
        self.next_menu = self.next_menu.saturating_add(1);
        menu.set_keybindings(self.keys.clone());
        self.menus.insert(id, menu);
        id
    }

    /// Unregister a menu, hiding it first when visible. Returns the menu.
    pub fn remove_context_menu(&mut self, id: MenuId) -> Option<ContextMenu> {
        self.hide_context_menu(id);
        self.arbiter.release(Owner::ContextMenu(id));
        let menu = self.menus.remove(&id)?;
        self.host_menus.retain(|_, menu_id| *menu_id != id);
        tracing::debug!(menu = ?id, "context menu removed");
        Some(menu)
    }

    pub fn context_menu(&self, id: MenuId) -> Option<&ContextMenu> {
        self.menus.get(&id)
    }

    pub fn context_menu_mut(&mut self, id: MenuId) -> Option<&mut ContextMenu> {
        self.menus.get_mut(&id)
    }

    /// The menu attached to `host` when it was added.
    pub fn context_menu_for(&self, host: HostId) -> Option<MenuId> {
        self.host_menus.get(&host).copied()
    }

    pub fn visible_context_menu(&self) -> Option<MenuId> {
        match self.arbiter.state() {
            ArbiterState::ContextMenuOpen(id) => Some(id),
            _ => None,
        }
    }

    fn host_frame_of(&self, id: MenuId) -> Option<Rect> {
        self.menus
            .get(&id)
            .and_then(ContextMenu::host)
            .and_then(|host| self.control_frame(host))
    }

    /// Show a context menu, taking input from whoever holds it. Showing an
    /// already visible menu re-resolves its placement.
    pub fn show_context_menu(&mut self, id: MenuId) -> bool {
        if !self.menus.contains_key(&id) {
            return false;
        }
        if let Acquire::Granted {
            displaced: Some(previous),
        } = self.arbiter.acquire(Owner::ContextMenu(id))
        {
            self.hide_displaced(previous);
        }
        let host_frame = self.host_frame_of(id);
        let viewport = self.viewport;
        let Some(menu) = self.menus.get_mut(&id) else {
            return false;
        };
        let previous = menu.frame();
        let placement = menu.open(viewport, host_frame);
        if let Some(frame) = previous {
            self.mark(frame);
        }
        self.mark(placement.frame);
        tracing::debug!(
            menu = ?id,
            x = placement.frame.x,
            y = placement.frame.y,
            width = placement.frame.width,
            height = placement.frame.height,
            "context menu shown"
        );
        true
    }

    pub fn hide_context_menu(&mut self, id: MenuId) -> bool {
        let Some(frame) = self.menus.get_mut(&id).and_then(ContextMenu::close) else {
            return false;
        };
        self.arbiter.release(Owner::ContextMenu(id));
        self.mark(frame);
        tracing::debug!(menu = ?id, "context menu hidden");
        true
    }

    fn hide_displaced(&mut self, owner: Owner) {
        match owner {
            Owner::MenuBar => {
                let Some(bar) = self.menu_bar.as_mut() else {
                    return;
                };
                let dropped = bar.close();
                self.redraw.push(bar.area());
                if let Some(frame) = dropped {
                    self.mark(frame);
                }
            }
            Owner::ContextMenu(id) => {
                if let Some(frame) = self.menus.get_mut(&id).and_then(ContextMenu::close) {
                    self.mark(frame);
                }
            }
        }
    }

    fn activate_context_item(&mut self, id: MenuId, index: usize) {
        let Some(menu) = self.menus.get(&id) else {
            return;
        };
        let Some(item) = menu.items().get(index) else {
            return;
        };
        let command = item.command().to_string();
        let host = menu.host();
        self.hide_context_menu(id);
        let consumed = match host.and_then(|host| self.controls.get_mut(&host)) {
            Some(entry) => {
                let consumed = entry.control.handle_command(&command);
                if consumed {
                    self.redraw.push(entry.frame);
                }
                consumed
            }
            None => false,
        };
        tracing::debug!(menu = ?id, %command, consumed, "context menu item activated");
        if !consumed {
            self.commands.push(Command {
                source: CommandSource::ContextMenu(id),
                id: command,
            });
        }
    }

    fn mark(&mut self, frame: FloatRect) {
        let visible = frame.visible_in(self.viewport);
        if visible.width > 0 && visible.height > 0 {
            self.redraw.push(visible);
        }
    }

    /// Screen regions that changed since the last call.
    pub fn take_redraw_regions(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.redraw)
    }

    /// Commands chosen since the last call that no control consumed.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    // Input

    /// Route one event. Returns whether something consumed it.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Resize(width, height) => {
                self.resize(*width, *height);
                true
            }
            Event::Key(key) => self.handle_key(key, event),
            Event::Mouse(mouse) => self.handle_mouse(mouse, event),
            Event::Paste(_) if self.arbiter.is_idle() => self.dispatch_to_focus(event),
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, event: &Event) -> bool {
        if let Some(bar) = self.menu_bar.as_mut()
            && bar.track_alt(key)
        {
            return self.toggle_menu_bar();
        }
        // The Alt press itself stays unconsumed so the release edge can fire.
        if key.kind == KeyEventKind::Release || is_bare_alt(key) {
            return false;
        }
        if self.menu_bar.is_some() && self.keys.matches(Action::MenuBarToggle, key) {
            return self.toggle_menu_bar();
        }
        match self.arbiter.state() {
            ArbiterState::ContextMenuOpen(id) => self.route_to_context_menu(id, event),
            ArbiterState::MenuBarOpen => self.route_to_menu_bar(event),
            ArbiterState::Idle => self.handle_idle_key(key, event),
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, event: &Event) -> bool {
        let state = self.arbiter.state();
        if state != ArbiterState::MenuBarOpen
            && mouse.kind == MouseEventKind::Down(MouseButton::Left)
            && !self.popup_covers(mouse.column, mouse.row)
            && let Some(index) = self
                .menu_bar
                .as_ref()
                .and_then(|bar| bar.title_at(mouse.column, mouse.row))
        {
            return self.open_menu_bar_at(index);
        }
        match state {
            ArbiterState::ContextMenuOpen(id) => self.route_to_context_menu(id, event),
            ArbiterState::MenuBarOpen => self.route_to_menu_bar(event),
            ArbiterState::Idle => self.handle_idle_mouse(mouse, event),
        }
    }

    /// Whether a visible popup or drop-down is drawn over `(column, row)`.
    fn popup_covers(&self, column: u16, row: u16) -> bool {
        let (column, row) = (column as i32, row as i32);
        let menu_covers = self
            .visible_context_menu()
            .and_then(|id| self.menus.get(&id))
            .and_then(ContextMenu::frame)
            .is_some_and(|frame| frame.contains(column, row));
        let drop_down_covers = self
            .menu_bar
            .as_ref()
            .and_then(MenuBar::drop_down_frame)
            .is_some_and(|frame| frame.contains(column, row));
        menu_covers || drop_down_covers
    }

    fn route_to_context_menu(&mut self, id: MenuId, event: &Event) -> bool {
        let Some(menu) = self.menus.get_mut(&id) else {
            self.arbiter.release(Owner::ContextMenu(id));
            return false;
        };
        match menu.handle_menu_event(event) {
            MenuOutcome::Ignored => false,
            MenuOutcome::Handled => {
                if let Some(frame) = menu.frame() {
                    self.mark(frame);
                }
                true
            }
            MenuOutcome::Activated(index) => {
                self.activate_context_item(id, index);
                true
            }
            MenuOutcome::Dismissed => {
                self.hide_context_menu(id);
                self.reopen_for_chord(event);
                true
            }
        }
    }

    fn route_to_menu_bar(&mut self, event: &Event) -> bool {
        let outcome = match self.menu_bar.as_mut() {
            Some(bar) => bar.handle_open_event(event, &self.keys),
            None => {
                self.arbiter.release(Owner::MenuBar);
                return false;
            }
        };
        match outcome {
            MenuBarOutcome::Ignored => match event {
                Event::Key(key) => self.show_for_key(key),
                _ => false,
            },
            MenuBarOutcome::Handled => {
                self.mark_menu_bar();
                true
            }
            MenuBarOutcome::Activated(command) => {
                self.close_menu_bar();
                tracing::debug!(%command, "menu bar item activated");
                self.commands.push(Command {
                    source: CommandSource::MenuBar,
                    id: command,
                });
                true
            }
            MenuBarOutcome::Closed => {
                self.close_menu_bar();
                self.reopen_for_chord(event);
                true
            }
        }
    }

    /// A press that closed a popup can itself be a context-menu chord; in that
    /// case it opens the next menu right away.
    fn reopen_for_chord(&mut self, event: &Event) {
        if let Event::Mouse(mouse) = event
            && self.menus.values().any(|menu| menu.matches_mouse(mouse))
        {
            self.handle_idle_mouse(mouse, event);
        }
    }

    fn handle_idle_key(&mut self, key: &KeyEvent, event: &Event) -> bool {
        if let Some(command) = self
            .status_bar
            .as_ref()
            .and_then(|bar| bar.command_for_key(key))
            .map(str::to_owned)
        {
            self.commands.push(Command {
                source: CommandSource::StatusBar,
                id: command,
            });
            return true;
        }
        if self.show_for_key(key) {
            return true;
        }
        self.dispatch_to_focus(event)
    }

    /// Show the menu whose keyboard chord is `key`: the focused control's
    /// menu first, then any menu without a host.
    fn show_for_key(&mut self, key: &KeyEvent) -> bool {
        let hosted = self
            .focus
            .and_then(|host| self.host_menus.get(&host).copied())
            .filter(|id| self.menus.get(id).is_some_and(|menu| menu.matches_key(key)));
        let target = hosted.or_else(|| {
            self.menus
                .iter()
                .find(|(_, menu)| menu.host().is_none() && menu.matches_key(key))
                .map(|(id, _)| *id)
        });
        match target {
            Some(id) => self.show_context_menu(id),
            None => false,
        }
    }

    fn handle_idle_mouse(&mut self, mouse: &MouseEvent, event: &Event) -> bool {
        if let Some(command) = self
            .status_bar
            .as_ref()
            .and_then(|bar| bar.command_for_mouse(mouse))
            .map(str::to_owned)
        {
            self.commands.push(Command {
                source: CommandSource::StatusBar,
                id: command,
            });
            return true;
        }
        let hit = self.control_at(mouse.column, mouse.row);
        let hosted = hit
            .and_then(|host| self.host_menus.get(&host).copied())
            .filter(|id| {
                self.menus
                    .get(id)
                    .is_some_and(|menu| menu.matches_mouse(mouse))
            });
        if let (Some(host), Some(id)) = (hit, hosted) {
            self.set_focus(host);
            return self.show_context_menu(id);
        }
        let free = self
            .menus
            .iter()
            .find(|(_, menu)| menu.host().is_none() && menu.matches_mouse(mouse))
            .map(|(id, _)| *id);
        if let Some(id) = free {
            if let Some(menu) = self.menus.get_mut(&id) {
                menu.set_position(Point::new(mouse.column as i32, mouse.row as i32));
            }
            return self.show_context_menu(id);
        }
        let Some(host) = hit else {
            return false;
        };
        if matches!(mouse.kind, MouseEventKind::Down(_)) {
            self.set_focus(host);
        }
        let ctx = self.context_for(host);
        match self.controls.get_mut(&host) {
            Some(entry) => {
                let handled = entry.control.handle_event(event, &ctx);
                if handled {
                    self.redraw.push(entry.frame);
                }
                handled
            }
            None => false,
        }
    }

    fn dispatch_to_focus(&mut self, event: &Event) -> bool {
        let Some(id) = self.focus else {
            return false;
        };
        let ctx = self.context_for(id);
        let Some(entry) = self.controls.get_mut(&id) else {
            return false;
        };
        let handled = entry.control.handle_event(event, &ctx);
        if handled {
            self.redraw.push(entry.frame);
        }
        handled
    }

    // Rendering

    /// Draw the whole toplevel: controls, then the bars, then whichever popup
    /// is open.
    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let viewport = self.viewport.intersection(frame.area());
        frame.render_widget(Clear, viewport);
        let (bar_area, status_area, _) = self.split_area();
        for id in &self.order {
            let ctx = ComponentContext::new(self.focus == Some(*id)).with_viewport(self.viewport);
            if let Some(entry) = self.controls.get_mut(id) {
                let area = entry.frame;
                entry.control.render(frame, area, &ctx);
            }
        }
        let ctx = ComponentContext::default().with_viewport(self.viewport);
        if let Some(bar) = self.menu_bar.as_mut() {
            bar.render(frame, bar_area, &ctx);
        }
        if let Some(status) = self.status_bar.as_mut() {
            status.render(frame, status_area, &ctx);
        }
        if let Some(bar) = self.menu_bar.as_ref() {
            bar.render_drop_down(frame);
        }
        for menu in self.menus.values_mut() {
            if menu.is_visible() {
                menu.render(frame, viewport, &ctx);
            }
        }
    }
}
