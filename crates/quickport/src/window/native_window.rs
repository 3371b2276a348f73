//! The windowing backend seam.
//!
//! [`Platform`] creates native windows and delivers input; [`NativeWindow`]
//! is the handle a [`Window`](super::Window) keeps to its native
//! counterpart. The winit backend lives in [`crate::platform`], alongside a
//! headless backend for tests.

use std::time::Duration;

use quickport_core::{PlatformWindowId, ToolboxEvent, ToolboxResult};
use quickport_render::{PresentTarget, Rect, Size};

use super::window_config::WindowConfig;

/// A native window as the toolbox drives it.
pub trait NativeWindow {
    fn id(&self) -> PlatformWindowId;

    fn set_visible(&mut self, visible: bool);

    /// Move the content area's top-left corner to global `(h, v)`.
    fn set_position(&mut self, h: i32, v: i32);

    fn request_inner_size(&mut self, size: Size);

    fn set_title(&mut self, title: &str);

    /// Start routing composed text to this window, with the input method's
    /// candidate window placed near `area` (content coordinates).
    fn begin_text_input(&mut self, area: Rect);

    fn end_text_input(&mut self);
}

/// A freshly created native window plus the target its frames go to.
pub struct NativeWindowParts {
    pub window: Box<dyn NativeWindow>,
    pub target: Box<dyn PresentTarget>,
}

/// A windowing backend.
pub trait Platform {
    /// Create a hidden native window.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::WindowCreation`](quickport_core::ToolboxError::WindowCreation)
    /// if the backend refuses.
    fn create_window(&mut self, config: &WindowConfig) -> ToolboxResult<NativeWindowParts>;

    /// Size of the primary display, if the backend knows it.
    fn primary_display_size(&mut self) -> Option<Size>;

    /// Wait up to `timeout` for the next input event.
    fn poll_event(&mut self, timeout: Duration) -> Option<ToolboxEvent>;
}
