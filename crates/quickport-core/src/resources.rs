//! The resource collaborator.
//!
//! Window creation pulls decoded templates, item lists and bitmaps through a
//! [`ResourceSource`]. Decoding resource forks is someone else's job; this
//! crate only defines the decoded shapes and an in-memory [`ResourceTable`]
//! that applications (and tests) fill directly.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item_kind::DialogItemKind;
use quickport_render::{Picture, PixelPattern, Rect};

/// Resource types the toolbox asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Window,
    Dialog,
    ItemList,
    Picture,
    ColorIcon,
    PixelPattern,
}

impl ResourceKind {
    /// The classic four-character type code.
    pub fn type_code(self) -> &'static str {
        match self {
            Self::Window => "WIND",
            Self::Dialog => "DLOG",
            Self::ItemList => "DITL",
            Self::Picture => "PICT",
            Self::ColorIcon => "cicn",
            Self::PixelPattern => "ppat",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_code())
    }
}

/// Errors reported by a [`ResourceSource`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("no '{kind}' resource with id {id}")]
    NotFound { kind: ResourceKind, id: i16 },

    #[error("failed to decode '{kind}' resource {id}: {reason}")]
    Decode {
        kind: ResourceKind,
        id: i16,
        reason: String,
    },
}

/// Result type for resource lookups.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// A decoded `WIND` or `DLOG` template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowTemplate {
    /// Content bounds in global coordinates.
    pub bounds: Rect,
    /// Window definition procedure id.
    pub proc_id: i16,
    pub title: String,
    pub visible: bool,
    /// Whether the window has a close box.
    pub go_away: bool,
    pub ref_con: i32,
    /// The `DITL` id for dialogs, `None` for plain windows.
    pub item_list: Option<i16>,
}

impl WindowTemplate {
    pub fn new(bounds: Rect, title: impl Into<String>) -> Self {
        Self {
            bounds,
            proc_id: 0,
            title: title.into(),
            visible: true,
            go_away: false,
            ref_con: 0,
            item_list: None,
        }
    }

    pub fn with_proc_id(mut self, proc_id: i16) -> Self {
        self.proc_id = proc_id;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_item_list(mut self, id: i16) -> Self {
        self.item_list = Some(id);
        self
    }
}

/// One entry of a decoded `DITL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub kind: DialogItemKind,
    /// Bounds relative to the window's content area.
    pub bounds: Rect,
    /// `PICT`/`cicn`/`CNTL` id for resource-backed items.
    pub resource_id: i16,
    pub text: String,
    pub enabled: bool,
}

impl ItemTemplate {
    pub fn new(kind: DialogItemKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            resource_id: 0,
            text: String::new(),
            enabled: true,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_resource(mut self, id: i16) -> Self {
        self.resource_id = id;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Supplies decoded resources by id.
pub trait ResourceSource {
    fn window_template(&self, id: i16) -> ResourceResult<WindowTemplate>;

    fn dialog_template(&self, id: i16) -> ResourceResult<WindowTemplate>;

    fn item_list(&self, id: i16) -> ResourceResult<Vec<ItemTemplate>>;

    fn picture(&self, id: i16) -> ResourceResult<Picture>;

    fn color_icon(&self, id: i16) -> ResourceResult<Picture>;

    fn pixel_pattern(&self, id: i16) -> ResourceResult<PixelPattern>;
}

/// In-memory resources keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    windows: HashMap<i16, WindowTemplate>,
    dialogs: HashMap<i16, WindowTemplate>,
    item_lists: HashMap<i16, Vec<ItemTemplate>>,
    pictures: HashMap<i16, Picture>,
    color_icons: HashMap<i16, Picture>,
    patterns: HashMap<i16, PixelPattern>,
}

fn lookup<T: Clone>(map: &HashMap<i16, T>, kind: ResourceKind, id: i16) -> ResourceResult<T> {
    map.get(&id)
        .cloned()
        .ok_or(ResourceError::NotFound { kind, id })
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_window(&mut self, id: i16, template: WindowTemplate) {
        self.windows.insert(id, template);
    }

    pub fn insert_dialog(&mut self, id: i16, template: WindowTemplate) {
        self.dialogs.insert(id, template);
    }

    pub fn insert_item_list(&mut self, id: i16, items: Vec<ItemTemplate>) {
        self.item_lists.insert(id, items);
    }

    pub fn insert_picture(&mut self, id: i16, picture: Picture) {
        self.pictures.insert(id, picture);
    }

    pub fn insert_color_icon(&mut self, id: i16, icon: Picture) {
        self.color_icons.insert(id, icon);
    }

    pub fn insert_pixel_pattern(&mut self, id: i16, pattern: PixelPattern) {
        self.patterns.insert(id, pattern);
    }

    /// Builder form of [`insert_window`](Self::insert_window).
    pub fn with_window(mut self, id: i16, template: WindowTemplate) -> Self {
        self.insert_window(id, template);
        self
    }

    pub fn with_dialog(mut self, id: i16, template: WindowTemplate) -> Self {
        self.insert_dialog(id, template);
        self
    }

    pub fn with_item_list(mut self, id: i16, items: Vec<ItemTemplate>) -> Self {
        self.insert_item_list(id, items);
        self
    }

    pub fn with_picture(mut self, id: i16, picture: Picture) -> Self {
        self.insert_picture(id, picture);
        self
    }

    pub fn with_color_icon(mut self, id: i16, icon: Picture) -> Self {
        self.insert_color_icon(id, icon);
        self
    }

    pub fn with_pixel_pattern(mut self, id: i16, pattern: PixelPattern) -> Self {
        self.insert_pixel_pattern(id, pattern);
        self
    }
}

impl ResourceSource for ResourceTable {
    fn window_template(&self, id: i16) -> ResourceResult<WindowTemplate> {
        lookup(&self.windows, ResourceKind::Window, id)
    }

    fn dialog_template(&self, id: i16) -> ResourceResult<WindowTemplate> {
        lookup(&self.dialogs, ResourceKind::Dialog, id)
    }

    fn item_list(&self, id: i16) -> ResourceResult<Vec<ItemTemplate>> {
        lookup(&self.item_lists, ResourceKind::ItemList, id)
    }

    fn picture(&self, id: i16) -> ResourceResult<Picture> {
        lookup(&self.pictures, ResourceKind::Picture, id)
    }

    fn color_icon(&self, id: i16) -> ResourceResult<Picture> {
        lookup(&self.color_icons, ResourceKind::ColorIcon, id)
    }

    fn pixel_pattern(&self, id: i16) -> ResourceResult<PixelPattern> {
        lookup(&self.patterns, ResourceKind::PixelPattern, id)
    }
}
