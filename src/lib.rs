//! Context menus, menu bars and popup placement for terminal UIs.
//!
//! The crate is organised around a [`window::Toplevel`] container that owns the
//! viewport, the [`arbiter::InputArbiter`] and every control that can host a
//! [`components::ContextMenu`]. Placement itself is a pure function in
//! [`layout::placement`] so it can be reasoned about (and tested) without a
//! terminal.

pub mod arbiter;
pub mod clipboard;
pub mod component_context;
pub mod components;
pub mod constants;
pub mod drivers;
pub mod event_loop;
pub mod keybindings;
pub mod layout;
pub mod runner;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;
