//! Prelude module for Quickport.
//!
//! ```ignore
//! use quickport::prelude::*;
//! ```
//!
//! This provides access to:
//! - The toolbox facade (`Toolbox`, `DialogItemInfo`)
//! - Events and dialog outcomes (`ToolboxEvent`, `KeyCode`, `DialogOutcome`)
//! - Handles and errors
//! - Resource templates
//! - Geometry and color types

// ============================================================================
// Toolbox
// ============================================================================

pub use crate::toolbox::{DialogItemInfo, Toolbox};

// ============================================================================
// Events
// ============================================================================

pub use crate::dialog::DialogOutcome;
pub use quickport_core::{EventKind, KeyCode, ToolboxEvent};

// ============================================================================
// Handles and errors
// ============================================================================

pub use quickport_core::{ItemHandle, PlatformWindowId, ToolboxError, ToolboxResult, WindowHandle};

// ============================================================================
// Resources and configuration
// ============================================================================

pub use quickport_core::{
    DialogItemKind, ItemTemplate, ResourceSource, ResourceTable, ToolboxConfig, WindowTemplate,
};

// ============================================================================
// Platforms
// ============================================================================

pub use crate::platform::HeadlessPlatform;
#[cfg(all(
    feature = "winit-backend",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
pub use crate::platform::WinitPlatform;
pub use crate::window::Platform;

// ============================================================================
// Geometry and colors
// ============================================================================

pub use quickport_render::{Point, Rect, RgbColor, Size, TextFace};
