use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod context_menu;
pub mod frame_window;
pub mod label;
pub mod menu_bar;
pub mod menu_list;
pub mod status_bar;
pub mod text_field;

pub use context_menu::ContextMenu;
pub use frame_window::FrameWindow;
pub use label::Label;
pub use menu_bar::{MenuBar, MenuBarItem, MenuBarOutcome};
pub use menu_list::{MenuItem, MenuList, MenuOutcome};
pub use status_bar::{StatusBar, StatusItem};
pub use text_field::TextField;

use std::any::Any;

pub use crate::component_context::ComponentContext;

/// Identifier of a context menu registered with a `Toplevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MenuId(pub u32);

pub trait Component {
    fn resize(&mut self, _area: Rect, _ctx: &ComponentContext) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A component that can live in a `Toplevel` and anchor a context menu.
pub trait Control: Component + AsAny + std::fmt::Debug {
    fn focusable(&self) -> bool {
        false
    }

    /// Cells between this control's frame and the area its children occupy.
    fn content_inset(&self) -> u16 {
        0
    }

    /// Items of the context menu this control wants attached when it is
    /// added to a toplevel.
    fn context_menu_items(&self) -> Option<Vec<MenuItem>> {
        None
    }

    /// Run a command coming from this control's context menu. Returns whether
    /// the command was consumed.
    fn handle_command(&mut self, _command: &str) -> bool {
        false
    }
}
