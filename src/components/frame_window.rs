use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::components::{Component, ComponentContext, Control};
use crate::theme;
use crate::ui::UiFrame;

/// Bordered container with a title. Children are laid out inside the border.
#[derive(Debug, Clone)]
pub struct FrameWindow {
    title: String,
}

impl FrameWindow {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Component for FrameWindow {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width < 2 || area.height < 2 {
            return;
        }
        let block = Block::bordered()
            .border_style(Style::default().fg(theme::frame_border()))
            .title(format!(" {} ", self.title));
        frame.render_widget(block, area);
    }
}

impl Control for FrameWindow {
    fn content_inset(&self) -> u16 {
        1
    }
}
