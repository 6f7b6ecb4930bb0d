use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::components::{Component, ComponentContext, Control};
use crate::ui::{UiFrame, safe_set_string, text_width};

#[derive(Debug, Clone, Default)]
pub struct Label {
    text: String,
    style: Style,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Cells needed to show the text on one row.
    pub fn width(&self) -> u16 {
        text_width(&self.text)
    }
}

impl Component for Label {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        safe_set_string(buffer, bounds, area.x, area.y, &self.text, self.style);
    }
}

impl Control for Label {}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    #[test]
    fn renders_text_clipped_to_area() {
        let mut label = Label::new("Label:");
        assert_eq!(label.width(), 6);
        let screen = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(screen);
        let mut frame = UiFrame::from_parts(screen, &mut buf);
        label.render(&mut frame, Rect::new(2, 1, 3, 1), &ComponentContext::default());
        let row: String = (0..10)
            .map(|x| buf.cell((x, 1)).map(|c| c.symbol()).unwrap_or(" "))
            .collect();
        assert_eq!(row, "  Lab     ");
    }
}
