//! Quickport - a window and dialog item manager with a classic toolbox
//! call surface.
//!
//! This is the main crate: dialog items, windows, the window registry,
//! dialog event translation, platform backends and the [`Toolbox`] facade.
//! The shared types of `quickport-core` are re-exported at the root and the
//! drawing layer is available as [`render`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use quickport::platform::HeadlessPlatform;
//! use quickport::render::{BoxGlyphRasterizer, Rect};
//! use quickport::{
//!     DialogItemKind, ItemTemplate, ResourceTable, Toolbox, ToolboxConfig, ToolboxEvent,
//!     WindowTemplate,
//! };
//!
//! let resources = ResourceTable::new()
//!     .with_dialog(128, WindowTemplate::new(Rect::new(40, 40, 140, 240), "Age").with_item_list(128))
//!     .with_item_list(128, vec![
//!         ItemTemplate::new(DialogItemKind::StaticText, Rect::new(10, 10, 30, 190)).with_text("OK"),
//!         ItemTemplate::new(DialogItemKind::EditText, Rect::new(40, 10, 60, 190)),
//!     ]);
//!
//! let mut toolbox = Toolbox::new(
//!     ToolboxConfig::default(),
//!     HeadlessPlatform::new(),
//!     resources,
//!     BoxGlyphRasterizer::new(),
//! );
//! let dialog = toolbox.get_new_dialog(128)?;
//! let native = toolbox.windows().window(dialog)?.platform_id().expect("initialized");
//! toolbox.platform_mut().push_event(ToolboxEvent::text_input(native, "5"));
//!
//! let event = toolbox.wait_next_event(Duration::from_millis(10));
//! assert!(toolbox.is_dialog_event(&event));
//! assert!(toolbox.dialog_select(&event).is_handled());
//!
//! let field = toolbox.get_dialog_item(dialog, 2)?.handle;
//! assert_eq!(toolbox.get_dialog_item_text(field)?, "5");
//! # Ok::<(), quickport::ToolboxError>(())
//! ```

pub mod dialog;
pub mod platform;
pub mod prelude;
mod toolbox;
pub mod window;

pub use quickport_core::*;

pub use dialog::DialogOutcome;
pub use toolbox::{DialogItemInfo, Toolbox};

/// Drawing layer.
pub mod render {
    pub use quickport_render::*;
}
