//! Toolbox windows and the window registry.
//!
//! # Window kinds
//!
//! A template's `procID` picks the frame style:
//!
//! ```
//! use quickport::window::WindowKind;
//!
//! let kind = WindowKind::from_proc_id(2);
//! assert_eq!(kind, WindowKind::PlainDialogBox);
//! assert!(!kind.has_decorations());
//! ```
//!
//! # Window manager
//!
//! The [`WindowManager`] owns every [`Window`] and resolves window handles,
//! item handles and platform window ids. It is normally driven through
//! [`Toolbox`](crate::Toolbox), which also supplies the platform and the
//! rendering collaborators.

mod managed_window;
mod native_window;
mod window_config;
mod window_manager;
mod window_type;

pub use managed_window::Window;
pub use native_window::{NativeWindow, NativeWindowParts, Platform};
pub use window_config::WindowConfig;
pub use window_manager::WindowManager;
pub use window_type::WindowKind;
