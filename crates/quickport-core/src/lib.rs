//! Core types for Quickport.
//!
//! This crate holds the pieces every other part of the toolbox layer shares:
//!
//! - **Handles**: never-reused window and item identifiers, plus the
//!   generation-checked arena key the registry stores windows under
//! - **Events**: the toolbox-level input event model
//! - **Resources**: decoded window templates, item lists and bitmaps, and
//!   the [`ResourceSource`] trait that supplies them
//! - **Errors**: the [`ToolboxError`] taxonomy
//! - **Configuration** and **logging** setup
//!
//! # Example
//!
//! ```
//! use quickport_core::{DialogItemKind, ItemTemplate, ResourceSource, ResourceTable, WindowTemplate};
//! use quickport_render::Rect;
//!
//! let resources = ResourceTable::new()
//!     .with_dialog(128, WindowTemplate::new(Rect::new(40, 40, 200, 300), "Name").with_item_list(128))
//!     .with_item_list(128, vec![
//!         ItemTemplate::new(DialogItemKind::StaticText, Rect::new(10, 10, 26, 120)).with_text("Your name:"),
//!         ItemTemplate::new(DialogItemKind::EditText, Rect::new(30, 10, 46, 200)),
//!     ]);
//!
//! assert_eq!(resources.item_list(128).map(|items| items.len()), Ok(2));
//! ```

pub mod config;
mod error;
mod event;
mod handle;
mod item_kind;
pub mod logging;
mod resources;

pub use config::{FontMapping, FontSettings, ToolboxConfig};
pub use error::{ConfigError, ToolboxError, ToolboxResult};
pub use event::{EventKind, KeyCode, ToolboxEvent};
pub use handle::{HandleAllocator, ItemHandle, PlatformWindowId, WindowHandle, WindowKey};
pub use item_kind::{DialogItemKind, ITEM_DISABLE};
pub use logging::init_tracing;
pub use resources::{
    ItemTemplate, ResourceError, ResourceKind, ResourceResult, ResourceSource, ResourceTable,
    WindowTemplate,
};
