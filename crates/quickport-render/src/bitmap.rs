//! Decoded bitmap payloads handed to the canvas: pictures, color icons and
//! background pixel patterns.

use crate::error::{RenderError, RenderResult};
use crate::types::{Rect, RgbColor};

/// A decoded picture or color icon: RGBA32 pixels plus the frame they were
/// authored at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    /// The authored frame; its width and height describe `rgba`.
    pub frame: Rect,
    /// Row-major RGBA32 pixel data.
    pub rgba: Vec<u8>,
}

impl Picture {
    pub fn new(frame: Rect, rgba: Vec<u8>) -> Self {
        Self { frame, rgba }
    }

    /// A picture filled with a single opaque color, mostly useful in tests.
    pub fn solid(width: u32, height: u32, color: RgbColor) -> Self {
        let px = color.to_rgba8().0;
        let rgba = px
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::new(Rect::new(0, 0, height as i32, width as i32), rgba)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// Wrap the pixel data as an image, checking its length.
    pub fn to_image(&self) -> RenderResult<image::RgbaImage> {
        rgba_image(self.width(), self.height(), &self.rgba)
    }
}

/// A color pixel pattern (RGB24), tiled across a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelPattern {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB24 pixel data.
    pub rgb: Vec<u8>,
}

impl PixelPattern {
    pub fn new(width: u32, height: u32, rgb: Vec<u8>) -> Self {
        Self { width, height, rgb }
    }

    /// A 1x1 pattern of one color.
    pub fn solid(color: RgbColor) -> Self {
        let px = color.to_rgba8().0;
        Self::new(1, 1, vec![px[0], px[1], px[2]])
    }

    /// The color of the pattern's top-left pixel; line drawing uses it as the
    /// pen color.
    pub fn first_pixel(&self) -> Option<RgbColor> {
        match self.rgb.get(0..3) {
            Some(&[r, g, b]) => Some(RgbColor::from_rgb8(r, g, b)),
            _ => None,
        }
    }

    /// Expand to an opaque RGBA image.
    pub fn to_image(&self) -> RenderResult<image::RgbaImage> {
        let expected = self.width as usize * self.height as usize * 3;
        if self.width == 0 || self.height == 0 || self.rgb.len() != expected {
            return Err(RenderError::PictureData {
                width: self.width,
                height: self.height,
                expected,
                actual: self.rgb.len(),
            });
        }
        let rgba: Vec<u8> = self
            .rgb
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 0xFF])
            .collect();
        rgba_image(self.width, self.height, &rgba)
    }
}

pub(crate) fn rgba_image(width: u32, height: u32, rgba: &[u8]) -> RenderResult<image::RgbaImage> {
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || rgba.len() != expected {
        return Err(RenderError::PictureData {
            width,
            height,
            expected,
            actual: rgba.len(),
        });
    }
    image::RgbaImage::from_raw(width, height, rgba.to_vec()).ok_or(RenderError::PictureData {
        width,
        height,
        expected,
        actual: rgba.len(),
    })
}
