mod toplevel;

use ratatui::prelude::Rect;

pub use toplevel::{Command, CommandSource, Toplevel};

/// Identifier of a control registered with a `Toplevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostId(pub u32);

/// How a control is placed inside its parent's content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dock {
    /// Offset and size relative to the parent's content origin.
    Fixed(Rect),
    /// Percentages (0..=100) of the parent's content area.
    Percent {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },
    /// The whole content area.
    Fill,
}

impl Dock {
    /// Screen rectangle for this dock inside `bounds`, clipped to it.
    pub fn resolve(&self, bounds: Rect) -> Rect {
        let rect = match *self {
            Dock::Fixed(rect) => Rect {
                x: bounds.x.saturating_add(rect.x),
                y: bounds.y.saturating_add(rect.y),
                width: rect.width,
                height: rect.height,
            },
            Dock::Percent {
                x,
                y,
                width,
                height,
            } => {
                let bw = bounds.width as u32;
                let bh = bounds.height as u32;
                Rect {
                    x: bounds.x + (bw * x.min(100) as u32 / 100) as u16,
                    y: bounds.y + (bh * y.min(100) as u32 / 100) as u16,
                    width: (bw * width.min(100) as u32 / 100) as u16,
                    height: (bh * height.min(100) as u32 / 100) as u16,
                }
            }
            Dock::Fill => bounds,
        };
        clip_size(rect, bounds)
    }
}

/// Keep the origin of `rect` but trim its size so it ends inside `bounds`.
/// Origins past `bounds` collapse to an empty rect at that origin.
fn clip_size(rect: Rect, bounds: Rect) -> Rect {
    Rect {
        width: rect.width.min(bounds.right().saturating_sub(rect.x)),
        height: rect.height.min(bounds.bottom().saturating_sub(rect.y)),
        ..rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_dock_is_relative_to_parent_content() {
        let content = Rect::new(1, 2, 43, 13);
        assert_eq!(
            Dock::Fixed(Rect::new(9, 3, 20, 1)).resolve(content),
            Rect::new(10, 5, 20, 1)
        );
    }

    #[test]
    fn fixed_dock_is_trimmed_to_parent() {
        let content = Rect::new(0, 0, 10, 5);
        assert_eq!(
            Dock::Fixed(Rect::new(8, 4, 20, 3)).resolve(content),
            Rect::new(8, 4, 2, 1)
        );
        assert_eq!(
            Dock::Fixed(Rect::new(12, 0, 3, 1)).resolve(content),
            Rect::new(12, 0, 0, 1)
        );
    }

    #[test]
    fn percent_and_fill() {
        let bounds = Rect::new(0, 1, 40, 20);
        assert_eq!(
            Dock::Percent {
                x: 50,
                y: 0,
                width: 50,
                height: 100
            }
            .resolve(bounds),
            Rect::new(20, 1, 20, 20)
        );
        assert_eq!(Dock::Fill.resolve(bounds), bounds);
    }
}
