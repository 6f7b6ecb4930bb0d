//! Shared crate-wide constants.

/// Blank cells between the left border and an item title.
pub const MENU_ITEM_LEFT_PAD: u16 = 1;

/// Trailing cells after an item title when the item has no shortcut hint.
pub const MENU_ITEM_RIGHT_PAD: u16 = 2;

/// Extra width an item gets when it carries a shortcut hint, on top of the
/// hint itself. The hint is right-aligned one cell before the border.
pub const MENU_HINT_GAP: u16 = 3;

/// Blank cells between a right-aligned hint and the right border.
pub const MENU_HINT_RIGHT_PAD: u16 = 1;

/// Cells taken by the left and right borders together (and by the top and
/// bottom borders for the height).
pub const MENU_BORDER_CELLS: u16 = 2;

/// Inner width of a menu that has no items at all.
pub const MIN_MENU_INNER_WIDTH: u16 = 2;

/// Undo snapshots a text field keeps; the oldest is dropped beyond this.
pub const MAX_UNDO_DEPTH: usize = 100;

/// Column where the first menu-bar title chunk starts.
pub const MENU_BAR_LEFT_MARGIN: u16 = 1;

/// Blank columns between menu-bar title chunks.
pub const MENU_BAR_TITLE_GAP: u16 = 1;

/// Separator drawn between status-bar items.
pub const STATUS_SEPARATOR: &str = " │ ";
