//! Shared component rendering context
//!
//! `ComponentContext` carries UI metadata that components may need during
//! rendering and event handling: whether the component has focus and the
//! viewport it lives in.
//! Keeping this in one value means the `Component` trait does not grow a new
//! parameter every time a component needs more context.

use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    focused: bool,
    viewport: Rect,
}

impl ComponentContext {
    /// Create a new `ComponentContext` with the given focus state.
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            viewport: Rect::ZERO,
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// Full screen area of the toplevel this component belongs to.
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    pub const fn with_viewport(mut self, viewport: Rect) -> Self {
        self.viewport = viewport;
        self
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(false)
    }
}
