//! Error types for Quickport.
//!
//! Failures fall into three groups:
//!
//! - **Not found**: a handle, platform id or item index that does not
//!   resolve. Toolbox entry points recover from these locally and report a
//!   sentinel to the caller ([`ToolboxError::is_not_found`]).
//! - **Resource and render failures**: logged, and the affected drawing is
//!   skipped while the rest of the frame carries on.
//! - **Misuse**: e.g. treating a plain window as a dialog.

use std::fmt;
use std::path::PathBuf;

use quickport_render::RenderError;

use crate::handle::{ItemHandle, PlatformWindowId, WindowHandle};
use crate::resources::ResourceError;

/// The main error type for Quickport operations.
#[derive(Debug)]
pub enum ToolboxError {
    /// The window handle is unknown or the window was disposed.
    WindowNotFound(WindowHandle),
    /// The item handle is unknown or its window was disposed.
    ItemNotFound(ItemHandle),
    /// No window is registered for the native window id.
    PlatformWindowNotFound(PlatformWindowId),
    /// A 1-based item number past the end of the dialog's item list.
    ItemIndexOutOfRange {
        window: WindowHandle,
        item_no: i16,
        count: usize,
    },
    /// A dialog operation on a window that has no item list.
    NotADialog(WindowHandle),
    /// An item list longer than item numbers can address.
    TooManyItems(usize),
    /// No window is bound to the active port.
    NoActivePort,
    /// The handle counter is exhausted.
    HandlesExhausted,
    /// The windowing backend could not create a window.
    WindowCreation(String),
    /// Drawing or presentation failed.
    Render(RenderError),
    /// A resource could not be loaded.
    Resource(ResourceError),
    /// Configuration could not be loaded.
    Config(ConfigError),
}

impl ToolboxError {
    /// Whether this is a lookup miss rather than a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::WindowNotFound(_)
                | Self::ItemNotFound(_)
                | Self::PlatformWindowNotFound(_)
                | Self::ItemIndexOutOfRange { .. }
                | Self::NoActivePort
        )
    }
}

impl fmt::Display for ToolboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowNotFound(handle) => write!(f, "No window registered for {handle}"),
            Self::ItemNotFound(handle) => write!(f, "No dialog item registered for {handle}"),
            Self::PlatformWindowNotFound(id) => write!(f, "No window registered for {id}"),
            Self::ItemIndexOutOfRange {
                window,
                item_no,
                count,
            } => write!(
                f,
                "Item number {item_no} is out of range for {window}, which has {count} items"
            ),
            Self::NotADialog(handle) => write!(f, "{handle} has no dialog items"),
            Self::TooManyItems(count) => {
                write!(f, "Item list has {count} items, more than item numbers can address")
            }
            Self::NoActivePort => write!(f, "No window is bound to the active port"),
            Self::HandlesExhausted => write!(f, "Handle space exhausted"),
            Self::WindowCreation(msg) => write!(f, "Failed to create window: {msg}"),
            Self::Render(err) => write!(f, "Render error: {err}"),
            Self::Resource(err) => write!(f, "Resource error: {err}"),
            Self::Config(err) => write!(f, "Configuration error: {err}"),
        }
    }
}

impl std::error::Error for ToolboxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(err) => Some(err),
            Self::Resource(err) => Some(err),
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RenderError> for ToolboxError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

impl From<ResourceError> for ToolboxError {
    fn from(err: ResourceError) -> Self {
        Self::Resource(err)
    }
}

impl From<ConfigError> for ToolboxError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The document is not valid configuration TOML.
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "Failed to read {}: {source}", path.display()),
            Self::Parse(err) => write!(f, "Invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

/// A specialized Result type for Quickport operations.
pub type ToolboxResult<T> = std::result::Result<T, ToolboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(ToolboxError::WindowNotFound(WindowHandle::from_raw(3)).is_not_found());
        assert!(
            ToolboxError::ItemIndexOutOfRange {
                window: WindowHandle::from_raw(1),
                item_no: 5,
                count: 3
            }
            .is_not_found()
        );
        assert!(!ToolboxError::NotADialog(WindowHandle::from_raw(1)).is_not_found());
        assert!(!ToolboxError::TooManyItems(40_000).is_not_found());
        assert!(!ToolboxError::Render(RenderError::NotInitialized).is_not_found());
    }

    #[test]
    fn test_display() {
        let err = ToolboxError::ItemIndexOutOfRange {
            window: WindowHandle::from_raw(1),
            item_no: 5,
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "Item number 5 is out of range for window#1, which has 3 items"
        );
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err = ToolboxError::from(RenderError::NotInitialized);
        assert!(err.source().is_some());
    }
}
