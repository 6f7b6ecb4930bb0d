//! Popup placement.
//!
//! A popup hangs from an anchor cell: the anchor is the row the menu drops
//! down from (a menu-bar title, or the last row of a host control) and the
//! popup body starts on the row below it. Placement shifts the anchor so the
//! body stays inside the viewport, without ever mutating the caller's
//! requested position; every show re-resolves from the request.

use ratatui::prelude::Rect;

use super::{FloatRect, Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Raw coordinates, possibly negative.
    Point(Point),
    /// Screen frame of a host control. The popup prefers the row directly
    /// below the host and flips above it when there is no room.
    Host(Rect),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRequest {
    pub anchor: Anchor,
    pub natural: Size,
    pub viewport: Rect,
    pub clamp_to_zero: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Logical position the popup reports. For raw anchors this is the
    /// request itself; for hosts it is the host's bottom-left cell.
    pub position: Point,
    /// Rectangle the popup body occupies, in screen cells.
    pub frame: FloatRect,
}

impl Placement {
    /// Slice of the frame that actually reaches the screen.
    pub fn visible(&self, viewport: Rect) -> Rect {
        self.frame.visible_in(viewport)
    }
}

/// Bottom-left cell of a host control.
pub fn host_anchor(host: Rect) -> Point {
    Point {
        x: host.x as i32,
        y: host.y as i32 + host.height.max(1) as i32 - 1,
    }
}

pub fn resolve(request: &PlacementRequest) -> Placement {
    let position = match request.anchor {
        Anchor::Point(point) => point,
        Anchor::Host(host) => host_anchor(host),
    };
    let left = request.viewport.x as i32;
    let top = request.viewport.y as i32;
    let right = left + request.viewport.width as i32;
    let bottom = top + request.viewport.height as i32;
    let width = request.natural.width as i32;
    let height = request.natural.height as i32;
    let clamp = request.clamp_to_zero;

    // Positions are caller-supplied and may sit anywhere in i32.
    let mut x = position.x;
    if x.saturating_add(width) >= right {
        x = if right - width >= left || !clamp {
            right - width
        } else {
            left
        };
    } else if clamp && x < left {
        x = left;
    }

    let mut y = position.y;
    if y.saturating_add(height) >= bottom {
        if bottom - height - 1 >= top || !clamp {
            y = match request.anchor {
                Anchor::Point(_) => bottom - height - 1,
                Anchor::Host(host) => host.y as i32 - height - 1,
            };
            if clamp && y.saturating_add(1) < top {
                y = top;
            }
        } else {
            y = top;
        }
    } else if clamp && y < top {
        y = top;
    }

    let frame = FloatRect {
        x,
        y: y.saturating_add(1),
        width: request.natural.width,
        height: request.natural.height,
    };
    tracing::trace!(
        requested_x = position.x,
        requested_y = position.y,
        x = frame.x,
        y = frame.y,
        width = frame.width,
        height = frame.height,
        "resolved popup placement"
    );
    Placement { position, frame }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_request(x: i32, y: i32, viewport: Rect, clamp: bool) -> PlacementRequest {
        PlacementRequest {
            anchor: Anchor::Point(Point::new(x, y)),
            natural: Size::new(8, 4),
            viewport,
            clamp_to_zero: clamp,
        }
    }

    #[test]
    fn body_hangs_below_anchor_when_it_fits() {
        let placed = resolve(&point_request(10, 5, Rect::new(0, 0, 80, 25), true));
        assert_eq!(placed.position, Point::new(10, 5));
        assert_eq!(placed.frame, FloatRect::new(10, 6, 8, 4));
    }

    #[test]
    fn anchor_past_bottom_right_is_pulled_inside() {
        let placed = resolve(&point_request(80, 25, Rect::new(0, 0, 80, 25), true));
        assert_eq!(placed.position, Point::new(80, 25));
        assert_eq!(placed.frame, FloatRect::new(72, 21, 8, 4));
    }

    #[test]
    fn negative_anchor_clamps_to_origin() {
        let placed = resolve(&point_request(-1, -2, Rect::new(0, 0, 80, 25), true));
        assert_eq!(placed.frame, FloatRect::new(0, 1, 8, 4));
        assert_eq!(placed.position, Point::new(-1, -2));
    }

    #[test]
    fn negative_anchor_is_kept_without_clamping() {
        let viewport = Rect::new(0, 0, 80, 25);
        let placed = resolve(&point_request(-1, -2, viewport, false));
        assert_eq!(placed.frame, FloatRect::new(-1, -1, 8, 4));
        assert_eq!(placed.visible(viewport), Rect::new(0, 0, 7, 3));
    }

    #[test]
    fn bottom_right_clamping_stays_active_without_clamp_to_zero() {
        let placed = resolve(&point_request(78, 24, Rect::new(0, 0, 80, 25), false));
        assert_eq!(placed.frame, FloatRect::new(72, 21, 8, 4));
    }

    #[test]
    fn narrow_viewport_pins_to_left_edge() {
        let viewport = Rect::new(0, 0, 5, 25);
        let placed = resolve(&point_request(0, 0, viewport, true));
        assert_eq!(placed.frame, FloatRect::new(0, 1, 8, 4));
        assert_eq!(placed.visible(viewport), Rect::new(0, 1, 5, 4));
    }

    #[test]
    fn short_viewport_pins_to_top_edge() {
        let viewport = Rect::new(0, 0, 80, 4);
        let placed = resolve(&point_request(0, 0, viewport, true));
        assert_eq!(placed.visible(viewport), Rect::new(0, 1, 8, 3));
    }

    #[test]
    fn host_prefers_row_below() {
        let request = PlacementRequest {
            anchor: Anchor::Host(Rect::new(10, 5, 10, 1)),
            natural: Size::new(8, 4),
            viewport: Rect::new(0, 0, 80, 25),
            clamp_to_zero: true,
        };
        let placed = resolve(&request);
        assert_eq!(placed.position, Point::new(10, 5));
        assert_eq!(placed.frame, FloatRect::new(10, 6, 8, 4));
    }

    #[test]
    fn taller_host_anchors_on_its_last_row() {
        let request = PlacementRequest {
            anchor: Anchor::Host(Rect::new(5, 10, 10, 3)),
            natural: Size::new(8, 4),
            viewport: Rect::new(0, 0, 80, 25),
            clamp_to_zero: true,
        };
        let placed = resolve(&request);
        assert_eq!(placed.position, Point::new(5, 12));
        assert_eq!(placed.frame, FloatRect::new(5, 13, 8, 4));
    }

    #[test]
    fn host_on_last_row_flips_above() {
        let request = PlacementRequest {
            anchor: Anchor::Host(Rect::new(70, 24, 10, 1)),
            natural: Size::new(8, 4),
            viewport: Rect::new(0, 0, 80, 25),
            clamp_to_zero: true,
        };
        let placed = resolve(&request);
        assert_eq!(placed.position, Point::new(70, 24));
        assert_eq!(placed.frame, FloatRect::new(70, 20, 8, 4));
    }

    #[test]
    fn extreme_positions_saturate() {
        let viewport = Rect::new(0, 0, 80, 25);
        let placed = resolve(&point_request(i32::MAX, i32::MAX, viewport, true));
        assert_eq!(placed.position, Point::new(i32::MAX, i32::MAX));
        assert_eq!(placed.frame, FloatRect::new(72, 21, 8, 4));

        let placed = resolve(&point_request(i32::MIN, i32::MIN, viewport, true));
        assert_eq!(placed.frame, FloatRect::new(0, 1, 8, 4));

        let placed = resolve(&point_request(i32::MIN, i32::MIN, viewport, false));
        assert_eq!(placed.frame, FloatRect::new(i32::MIN, i32::MIN + 1, 8, 4));
        assert_eq!(placed.visible(viewport), Rect::default());
    }

    #[test]
    fn zero_sized_viewport_does_not_panic() {
        let viewport = Rect::new(0, 0, 0, 0);
        let placed = resolve(&point_request(3, 3, viewport, true));
        assert_eq!(placed.visible(viewport), Rect::default());
    }
}
