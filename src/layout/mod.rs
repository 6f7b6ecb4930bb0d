pub mod placement;

pub use placement::{Anchor, Placement, PlacementRequest, resolve};

use ratatui::prelude::Rect;
use std::collections::BTreeMap;

/// Signed cell coordinate. Popups may be requested at negative positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Signed rectangle origin with unsigned size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    pub fn contains(&self, column: i32, row: i32) -> bool {
        column >= self.x && column < self.right() && row >= self.y && row < self.bottom()
    }

    /// The part of this rectangle that lands inside `bounds`, or an empty
    /// rect when they do not overlap.
    pub fn visible_in(&self, bounds: Rect) -> Rect {
        let bounds_x0 = bounds.x as i32;
        let bounds_y0 = bounds.y as i32;
        let bounds_x1 = bounds_x0 + bounds.width as i32;
        let bounds_y1 = bounds_y0 + bounds.height as i32;
        let x0 = self.x.max(bounds_x0);
        let y0 = self.y.max(bounds_y0);
        let x1 = self.right().min(bounds_x1);
        let y1 = self.bottom().min(bounds_y1);
        if x1 <= x0 || y1 <= y0 {
            return Rect::default();
        }
        Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        }
    }
}

impl From<Rect> for FloatRect {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x as i32,
            y: rect.y as i32,
            width: rect.width,
            height: rect.height,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionMap<T: Copy + Eq + Ord> {
    regions: BTreeMap<T, Rect>,
}

impl<T: Copy + Eq + Ord> Default for RegionMap<T> {
    fn default() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }
}

impl<T: Copy + Eq + Ord> RegionMap<T> {
    pub fn ids(&self) -> Vec<T> {
        self.regions.keys().copied().collect()
    }

    pub fn set(&mut self, id: T, rect: Rect) {
        self.regions.insert(id, rect);
    }

    pub fn get(&self, id: T) -> Option<Rect> {
        self.regions.get(&id).copied()
    }

    pub fn remove(&mut self, id: T) -> Option<Rect> {
        self.regions.remove(&id)
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// First id in `ids` whose region contains the point. Callers pass ids
    /// topmost first.
    pub fn hit_test(&self, column: u16, row: u16, ids: &[T]) -> Option<T> {
        for id in ids {
            if let Some(rect) = self.regions.get(id)
                && rect_contains(*rect, column, row)
            {
                return Some(*id);
            }
        }
        None
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

/// Shrink `rect` by `inset` cells on every side.
pub fn inset_rect(rect: Rect, inset: u16) -> Rect {
    let twice = inset.saturating_mul(2);
    Rect {
        x: rect.x.saturating_add(inset),
        y: rect.y.saturating_add(inset),
        width: rect.width.saturating_sub(twice),
        height: rect.height.saturating_sub(twice),
    }
}

/// Translate a parent-relative `rect` by `origin`, clipping nothing.
pub fn offset_rect(rect: Rect, origin: (u16, u16)) -> Rect {
    Rect {
        x: rect.x.saturating_add(origin.0),
        y: rect.y.saturating_add(origin.1),
        width: rect.width,
        height: rect.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::prelude::Rect;

    #[test]
    fn visible_in_clips_negative_offsets() {
        let bounds = Rect::new(0, 0, 80, 25);
        let rect = FloatRect::new(-1, -1, 8, 4);
        assert_eq!(rect.visible_in(bounds), Rect::new(0, 0, 7, 3));
    }

    #[test]
    fn visible_in_returns_empty_when_disjoint() {
        let bounds = Rect::new(0, 0, 10, 10);
        let rect = FloatRect::new(-20, 3, 5, 5);
        assert_eq!(rect.visible_in(bounds), Rect::default());
    }

    #[test]
    fn float_rect_contains_uses_half_open_edges() {
        let rect = FloatRect::new(-2, 0, 4, 2);
        assert!(rect.contains(-2, 0));
        assert!(rect.contains(1, 1));
        assert!(!rect.contains(2, 1));
        assert!(!rect.contains(0, 2));
    }

    #[test]
    fn region_map_set_get_hit_test() {
        let mut map = RegionMap::default();
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(6, 0, 5, 5);
        map.set(1u8, a);
        map.set(2u8, b);
        assert_eq!(map.get(1u8), Some(a));
        assert_eq!(map.ids(), vec![1u8, 2u8]);
        assert_eq!(map.hit_test(2, 2, &[1u8, 2u8]), Some(1u8));
        assert_eq!(map.hit_test(100, 100, &[1u8, 2u8]), None);
        map.remove(1u8);
        assert_eq!(map.hit_test(2, 2, &[1u8, 2u8]), None);
    }

    #[test]
    fn rect_contains_edge_cases() {
        let r = Rect::new(0, 0, 0, 5);
        assert!(!rect_contains(r, 0, 0));
        let r2 = Rect::new(1, 1, 3, 3);
        assert!(rect_contains(r2, 1, 1));
        assert!(!rect_contains(r2, 4, 1));
    }

    #[test]
    fn inset_and_offset() {
        let r = Rect::new(0, 1, 45, 15);
        assert_eq!(inset_rect(r, 1), Rect::new(1, 2, 43, 13));
        assert_eq!(inset_rect(Rect::new(0, 0, 1, 1), 1).width, 0);
        assert_eq!(
            offset_rect(Rect::new(9, 3, 20, 1), (1, 2)),
            Rect::new(10, 5, 20, 1)
        );
    }
}
