//! Windowing backends.
//!
//! Every backend implements [`Platform`](crate::window::Platform):
//!
//! - [`HeadlessPlatform`] keeps windows and frames in memory and takes its
//!   input from a queue. Always available.
//! - [`WinitPlatform`] opens real windows with winit and presents through
//!   softbuffer. Enabled by the `winit-backend` feature on desktop targets.
//!
//! ```ignore
//! use quickport::platform::WinitPlatform;
//!
//! let platform = WinitPlatform::new()?;
//! ```

mod headless;
#[cfg(all(
    feature = "winit-backend",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
mod winit_backend;

pub use headless::{HeadlessPlatform, NativeWindowState};
#[cfg(all(
    feature = "winit-backend",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
pub use winit_backend::WinitPlatform;
