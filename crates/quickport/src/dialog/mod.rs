//! Dialog items and dialog event handling.
//!
//! A dialog is a [`Window`](crate::window::Window) that owns an ordered list
//! of [`DialogItem`]s. Item order is both compositing order within a group
//! and hit-test priority; the item's 1-based position is its item number.
//!
//! [`dialog_select`] turns one inbound event into a [`DialogOutcome`].

mod item;
mod param_text;
mod select;

pub use item::DialogItem;
pub use param_text::ParamText;
pub use select::{DialogOutcome, dialog_select, is_dialog_event};

use quickport_core::ResourceSource;
use quickport_render::{FontTable, TextRasterizer};

/// Collaborators an item needs to redraw itself.
pub struct RenderEnv<'a> {
    pub resources: &'a dyn ResourceSource,
    pub raster: &'a mut dyn TextRasterizer,
    pub fonts: &'a FontTable,
    pub params: &'a ParamText,
}
