//! CPU drawing surfaces.
//!
//! A [`Canvas`] owns an RGBA buffer that every drawing call writes into.
//! Canvases come in two flavors:
//!
//! - **Offscreen** canvases are plain memory. Dialog items keep their cached
//!   rendering in one and composite it into their window with
//!   [`Canvas::render`].
//! - **Onscreen** canvases additionally own a [`PresentTarget`] and a
//!   backbuffer. Nothing reaches the target until [`Canvas::sync`] copies the
//!   buffer over and presents it, so half-drawn frames are never shown.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::{debug, trace};

use crate::bitmap::{Picture, PixelPattern};
use crate::error::{RenderError, RenderResult};
use crate::surface::PresentTarget;
use crate::text::{FontSpec, TextRasterizer, TextStyle};
use crate::types::{Point, Rect, RgbColor, Size};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const OPAQUE_WHITE: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);

/// Presentation state of an onscreen canvas.
struct Screen {
    target: Box<dyn PresentTarget>,
    backbuffer: Option<RgbaImage>,
    /// Buffer revision last copied to the target.
    presented: Option<u64>,
}

/// An owned drawing surface, optionally bound to an onscreen target.
pub struct Canvas {
    size: Size,
    clear_color: Rgba<u8>,
    buffer: Option<RgbaImage>,
    /// Bumped on every mutation of `buffer`.
    revision: u64,
    screen: Option<Screen>,
}

impl Canvas {
    /// A memory-only canvas. Clears to transparent.
    pub fn new_offscreen(size: Size) -> Self {
        Self {
            size,
            clear_color: TRANSPARENT,
            buffer: None,
            revision: 0,
            screen: None,
        }
    }

    /// A canvas that presents to `target`. Clears to opaque white.
    pub fn new_onscreen(size: Size, target: Box<dyn PresentTarget>) -> Self {
        Self {
            size,
            clear_color: OPAQUE_WHITE,
            buffer: None,
            revision: 0,
            screen: Some(Screen {
                target,
                backbuffer: None,
                presented: None,
            }),
        }
    }

    /// Allocate the backing buffer(s) at the canvas size.
    ///
    /// # Errors
    ///
    /// Fails on zero dimensions or when the target cannot be configured.
    /// Nothing is retried.
    pub fn init(&mut self) -> RenderResult<()> {
        if self.size.is_empty() {
            return Err(RenderError::InvalidDimensions {
                width: self.size.width,
                height: self.size.height,
            });
        }
        let blank = RgbaImage::from_pixel(self.size.width, self.size.height, self.clear_color);
        if let Some(screen) = &mut self.screen {
            screen.target.configure(self.size)?;
            screen.backbuffer = Some(blank.clone());
            screen.presented = None;
        }
        self.buffer = Some(blank);
        self.revision += 1;
        debug!(target: "quickport::canvas", width = self.size.width, height = self.size.height, onscreen = self.screen.is_some(), "canvas initialized");
        Ok(())
    }

    /// Reallocate at a new size. Previous content is discarded.
    ///
    /// On failure the canvas keeps its previous size and content.
    pub fn resize(&mut self, size: Size) -> RenderResult<()> {
        if size.is_empty() {
            return Err(RenderError::InvalidDimensions {
                width: size.width,
                height: size.height,
            });
        }
        let previous = std::mem::replace(&mut self.size, size);
        self.init().inspect_err(|_| self.size = previous)
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.buffer.is_some()
    }

    /// The drawing buffer.
    pub fn image(&self) -> Option<&RgbaImage> {
        self.buffer.as_ref()
    }

    /// The last frame handed to the target, for onscreen canvases.
    pub fn presented_image(&self) -> Option<&RgbaImage> {
        self.screen.as_ref().and_then(|s| s.backbuffer.as_ref())
    }

    /// Read one pixel of the drawing buffer.
    pub fn pixel(&self, point: Point) -> Option<Rgba<u8>> {
        let buffer = self.buffer.as_ref()?;
        if point.h < 0 || point.v < 0 {
            return None;
        }
        let (x, y) = (point.h as u32, point.v as u32);
        (x < buffer.width() && y < buffer.height()).then(|| *buffer.get_pixel(x, y))
    }

    fn buffer_mut(&mut self) -> RenderResult<&mut RgbaImage> {
        self.revision += 1;
        self.buffer.as_mut().ok_or(RenderError::NotInitialized)
    }

    /// Reset the drawing buffer to blank.
    pub fn clear(&mut self) -> RenderResult<()> {
        let clear_color = self.clear_color;
        for px in self.buffer_mut()?.pixels_mut() {
            *px = clear_color;
        }
        Ok(())
    }

    /// Reset the drawing buffer and the onscreen backbuffer.
    pub fn clear_window(&mut self) -> RenderResult<()> {
        self.clear()?;
        let clear_color = self.clear_color;
        if let Some(backbuffer) = self.screen.as_mut().and_then(|s| s.backbuffer.as_mut()) {
            for px in backbuffer.pixels_mut() {
                *px = clear_color;
            }
        }
        Ok(())
    }

    /// Fill a rectangle with a solid color.
    pub fn fill_rect(&mut self, rect: Rect, color: RgbColor) -> RenderResult<()> {
        let color = color.to_rgba8();
        let buffer = self.buffer_mut()?;
        let Some(clipped) = rect.intersect(&bounds_of(buffer)) else {
            return Ok(());
        };
        for y in clipped.top..clipped.bottom {
            for x in clipped.left..clipped.right {
                buffer.put_pixel(x as u32, y as u32, color);
            }
        }
        Ok(())
    }

    /// Frame a rectangle with a one pixel outline.
    pub fn draw_rect(&mut self, rect: Rect, color: RgbColor) -> RenderResult<()> {
        if rect.is_empty() {
            return Ok(());
        }
        let (right, bottom) = (rect.right - 1, rect.bottom - 1);
        self.draw_line(Point::new(rect.left, rect.top), Point::new(right, rect.top), color)?;
        self.draw_line(Point::new(right, rect.top), Point::new(right, bottom), color)?;
        self.draw_line(Point::new(right, bottom), Point::new(rect.left, bottom), color)?;
        self.draw_line(Point::new(rect.left, bottom), Point::new(rect.left, rect.top), color)
    }

    /// Draw a one pixel line between two points, both inclusive.
    pub fn draw_line(&mut self, start: Point, end: Point, color: RgbColor) -> RenderResult<()> {
        let color = color.to_rgba8();
        let buffer = self.buffer_mut()?;
        let (w, h) = (buffer.width() as i32, buffer.height() as i32);

        let (mut x, mut y) = (start.h, start.v);
        let dx = (end.h - start.h).abs();
        let dy = -(end.v - start.v).abs();
        let sx = if start.h < end.h { 1 } else { -1 };
        let sy = if start.v < end.v { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if x >= 0 && y >= 0 && x < w && y < h {
                buffer.put_pixel(x as u32, y as u32, color);
            }
            if x == end.h && y == end.v {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        Ok(())
    }

    /// Draw an RGBA bitmap scaled into `dest`.
    pub fn draw_rgba_picture(&mut self, picture: &Picture, dest: Rect) -> RenderResult<()> {
        let source = picture.to_image()?;
        self.blit(&source, dest);
        Ok(())
    }

    /// Tile a pixel pattern across the whole buffer.
    pub fn draw_background(&mut self, pattern: &PixelPattern) -> RenderResult<()> {
        let tile = pattern.to_image()?;
        let buffer = self.buffer_mut()?;
        let (tw, th) = tile.dimensions();
        for (x, y, px) in buffer.enumerate_pixels_mut() {
            *px = *tile.get_pixel(x % tw, y % th);
        }
        Ok(())
    }

    /// Draw text wrapped to the width of `rect` and clipped to it.
    pub fn draw_text(
        &mut self,
        raster: &mut dyn TextRasterizer,
        style: &TextStyle,
        text: &str,
        rect: Rect,
    ) -> RenderResult<()> {
        if text.is_empty() || rect.is_empty() {
            return Ok(());
        }
        let glyphs = raster.rasterize(text, style, Some(rect.width()))?;
        if glyphs.width() == 0 || glyphs.height() == 0 {
            return Ok(());
        }
        let visible = Rect::from_origin_size(
            rect.top_left(),
            Size::new(glyphs.width().min(rect.width()), glyphs.height().min(rect.height())),
        );
        let glyphs = imageops::crop_imm(&glyphs, 0, 0, visible.width(), visible.height()).to_image();
        self.blit(&glyphs, visible);
        Ok(())
    }

    /// Draw unwrapped text with its top-left corner at `origin`, returning
    /// the width drawn.
    pub fn draw_text_at(
        &mut self,
        raster: &mut dyn TextRasterizer,
        style: &TextStyle,
        text: &str,
        origin: Point,
    ) -> RenderResult<u32> {
        if text.is_empty() {
            return Ok(0);
        }
        let glyphs = raster.rasterize(text, style, None)?;
        let dest = Rect::from_origin_size(origin, Size::new(glyphs.width(), glyphs.height()));
        self.blit(&glyphs, dest);
        Ok(glyphs.width())
    }

    /// Width `text` would occupy if drawn with `font`, without drawing it.
    pub fn measure_text(&self, raster: &mut dyn TextRasterizer, font: &FontSpec, text: &str) -> u32 {
        raster.measure(text, font)
    }

    /// Composite this canvas over `parent` at `dest`, or over all of `parent`
    /// when `dest` is `None`. Transparent pixels let the parent show through.
    pub fn render(&self, parent: &mut Canvas, dest: Option<Rect>) -> RenderResult<()> {
        let source = self.buffer.as_ref().ok_or(RenderError::NotInitialized)?;
        let dest = match dest {
            Some(rect) => rect,
            None => Rect::from_size(parent.size),
        };
        parent.blit(source, dest);
        trace!(target: "quickport::canvas", ?dest, "composited canvas");
        Ok(())
    }

    /// Present the drawing buffer. Offscreen canvases and canvases with
    /// nothing new to show return without touching the target.
    pub fn sync(&mut self) -> RenderResult<()> {
        let revision = self.revision;
        let Some(buffer) = self.buffer.as_ref() else {
            return Err(RenderError::NotInitialized);
        };
        let Some(screen) = self.screen.as_mut() else {
            return Ok(());
        };
        if screen.presented == Some(revision) {
            return Ok(());
        }
        let backbuffer = screen.backbuffer.get_or_insert_with(|| buffer.clone());
        backbuffer.clone_from(buffer);
        screen.target.present(backbuffer)?;
        screen.presented = Some(revision);
        trace!(target: "quickport::canvas", revision, "presented frame");
        Ok(())
    }

    /// Alpha-blend `source` into the buffer, scaling it to `dest`. Drawing
    /// into an uninitialized canvas is silently dropped.
    fn blit(&mut self, source: &RgbaImage, dest: Rect) {
        if dest.is_empty() || source.width() == 0 || source.height() == 0 {
            return;
        }
        let Ok(buffer) = self.buffer_mut() else {
            debug!(target: "quickport::canvas", "draw into uninitialized canvas dropped");
            return;
        };
        if source.dimensions() == (dest.width(), dest.height()) {
            imageops::overlay(buffer, source, i64::from(dest.left), i64::from(dest.top));
        } else {
            let scaled = imageops::resize(source, dest.width(), dest.height(), FilterType::Nearest);
            imageops::overlay(buffer, &scaled, i64::from(dest.left), i64::from(dest.top));
        }
    }
}

fn bounds_of(image: &RgbaImage) -> Rect {
    Rect::from_size(Size::new(image.width(), image.height()))
}

/// Source-over blend of one pixel.
pub(crate) fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = u32::from(src.0[3]);
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = src;
        return;
    }
    let da = u32::from(dst.0[3]);
    let out_a = sa + da * (255 - sa) / 255;
    if out_a == 0 {
        *dst = TRANSPARENT;
        return;
    }
    for i in 0..3 {
        let s = u32::from(src.0[i]) * sa;
        let d = u32::from(dst.0[i]) * da * (255 - sa) / 255;
        dst.0[i] = ((s + d) / out_a).min(255) as u8;
    }
    dst.0[3] = out_a.min(255) as u8;
}
