//! Software drawing layer for Quickport.
//!
//! This crate owns everything that touches pixels: geometry and color types,
//! the per-window [`GraphicsPort`] state, the CPU [`Canvas`] that drawing
//! calls write into, text rasterization, and the [`PresentTarget`] seam that
//! hands finished frames to a native window.
//!
//! # Drawing into a canvas
//!
//! ```
//! use quickport_render::{Canvas, Point, Rect, RgbColor, Size};
//!
//! let mut canvas = Canvas::new_offscreen(Size::new(64, 32));
//! canvas.init()?;
//! canvas.fill_rect(Rect::new(0, 0, 16, 16), RgbColor::RED)?;
//! assert_eq!(canvas.pixel(Point::new(4, 4)).map(|p| p.0), Some([255, 0, 0, 255]));
//! # Ok::<(), quickport_render::RenderError>(())
//! ```
//!
//! # Compositing
//!
//! Offscreen canvases are composited into a parent with [`Canvas::render`];
//! an onscreen canvas shows its content only after [`Canvas::sync`].

mod bitmap;
mod canvas;
mod error;
mod port;
mod surface;
mod text;
mod types;

pub use bitmap::{Picture, PixelPattern};
pub use canvas::Canvas;
pub use error::{RenderError, RenderResult};
pub use port::{GraphicsPort, TextFace};
pub use surface::{FrameProbe, HeadlessTarget, PresentTarget};
pub use text::{
    BoxGlyphRasterizer, CosmicTextRasterizer, FontSpec, FontTable, TextRasterizer, TextStyle,
};
pub use types::{Point, Rect, RgbColor, Size};

// Re-export the pixel types that appear in the public API.
pub use image::{Rgba, RgbaImage};
