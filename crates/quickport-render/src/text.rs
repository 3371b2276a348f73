//! Text rasterization.
//!
//! Both drawing and measuring go through a [`TextRasterizer`] and resolve
//! the font the same way ([`FontTable::resolve`]), so a measured width always
//! matches what [`Canvas::draw_text`](crate::Canvas::draw_text) produces.
//!
//! Two rasterizers are provided:
//!
//! - [`CosmicTextRasterizer`] shapes real fonts with cosmic-text.
//! - [`BoxGlyphRasterizer`] draws every glyph as a solid box. It needs no fonts
//!   and is fully deterministic, which makes it the rasterizer of choice for
//!   headless runs and tests.

use std::collections::HashMap;
use std::path::Path;

use cosmic_text::{Attrs, Buffer, Family, Metrics, Shaping, Style, SwashCache, Weight, Wrap};
use image::{Rgba, RgbaImage};

use crate::canvas::blend_pixel;
use crate::error::{RenderError, RenderResult};
use crate::port::{GraphicsPort, TextFace};
use crate::types::RgbColor;

/// Line height as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// A resolved font request.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Family name; empty selects the system sans-serif family.
    pub family: String,
    pub size: f32,
    pub face: TextFace,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            face: TextFace::NORMAL,
        }
    }

    #[inline]
    pub fn line_height(&self) -> f32 {
        (self.size * LINE_HEIGHT_FACTOR).ceil()
    }

    fn attrs(&self) -> Attrs<'_> {
        let family = if self.family.is_empty() {
            Family::SansSerif
        } else {
            Family::Name(&self.family)
        };
        let mut attrs = Attrs::new().family(family);
        if self.face.contains(TextFace::BOLD) {
            attrs = attrs.weight(Weight::BOLD);
        }
        if self.face.contains(TextFace::ITALIC) {
            attrs = attrs.style(Style::Italic);
        }
        attrs
    }
}

/// Maps legacy font ids to font families.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    families: HashMap<i16, String>,
    default_family: String,
    default_size: u16,
}

impl FontTable {
    pub fn new(default_family: impl Into<String>, default_size: u16) -> Self {
        Self {
            families: HashMap::new(),
            default_family: default_family.into(),
            default_size,
        }
    }

    /// Register the family used for a legacy font id.
    pub fn insert(&mut self, font_id: i16, family: impl Into<String>) {
        self.families.insert(font_id, family.into());
    }

    /// Resolve the port's font settings. Unknown ids use the default family;
    /// a zero text size uses the default size.
    pub fn resolve(&self, port: &GraphicsPort) -> FontSpec {
        let family = self
            .families
            .get(&port.text_font)
            .unwrap_or(&self.default_family)
            .clone();
        let size = if port.text_size == 0 {
            self.default_size
        } else {
            port.text_size
        };
        FontSpec {
            family,
            size: f32::from(size.max(1)),
            face: port.text_face,
        }
    }
}

/// Font plus color for one text draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: FontSpec,
    pub color: RgbColor,
}

impl TextStyle {
    /// The style a port's current settings describe.
    pub fn from_port(port: &GraphicsPort, fonts: &FontTable) -> Self {
        Self {
            font: fonts.resolve(port),
            color: port.fore_color,
        }
    }
}

/// Turns strings into pixels.
pub trait TextRasterizer {
    /// Rendered width of `text` in pixels, without wrapping.
    fn measure(&mut self, text: &str, font: &FontSpec) -> u32;

    /// Render `text` into a transparent image sized to fit it. With a wrap
    /// width the text breaks into lines no wider than that.
    fn rasterize(
        &mut self,
        text: &str,
        style: &TextStyle,
        wrap_width: Option<u32>,
    ) -> RenderResult<RgbaImage>;
}

/// Rasterizer backed by cosmic-text shaping and swash glyph rendering.
pub struct CosmicTextRasterizer {
    font_system: cosmic_text::FontSystem,
    swash_cache: SwashCache,
}

impl CosmicTextRasterizer {
    /// Create a rasterizer with the system fonts loaded.
    pub fn new() -> Self {
        Self {
            font_system: cosmic_text::FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    /// Load an additional font file, e.g. one shipped with the application.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        self.font_system
            .db_mut()
            .load_font_file(path)
            .map_err(|e| RenderError::Text(format!("{}: {e}", path.display())))
    }

    fn shape(&mut self, text: &str, font: &FontSpec, wrap_width: Option<u32>) -> Buffer {
        let metrics = Metrics::new(font.size, font.line_height());
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let wrap = if wrap_width.is_some() {
            Wrap::Word
        } else {
            Wrap::None
        };
        buffer.set_wrap(&mut self.font_system, wrap);
        buffer.set_size(&mut self.font_system, wrap_width.map(|w| w as f32), None);
        buffer.set_text(&mut self.font_system, text, font.attrs(), Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }
}

impl Default for CosmicTextRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRasterizer for CosmicTextRasterizer {
    fn measure(&mut self, text: &str, font: &FontSpec) -> u32 {
        let buffer = self.shape(text, font, None);
        buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0_f32, f32::max)
            .ceil() as u32
    }

    fn rasterize(
        &mut self,
        text: &str,
        style: &TextStyle,
        wrap_width: Option<u32>,
    ) -> RenderResult<RgbaImage> {
        let buffer = self.shape(text, &style.font, wrap_width);
        let (lines, widest) = buffer
            .layout_runs()
            .fold((0u32, 0.0_f32), |(n, w), run| (n + 1, w.max(run.line_w)));
        let width = wrap_width.unwrap_or(widest.ceil() as u32).max(1);
        let height = (lines as f32 * style.font.line_height()).ceil() as u32;
        if lines == 0 || height == 0 {
            return Ok(RgbaImage::new(0, 0));
        }

        let mut image = RgbaImage::new(width, height);
        let [r, g, b, _] = style.color.to_rgba8().0;
        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            cosmic_text::Color::rgb(r, g, b),
            |x, y, w, h, color| {
                let src = Rgba([color.r(), color.g(), color.b(), color.a()]);
                for py in y.max(0)..(y + h as i32).min(height as i32) {
                    for px in x.max(0)..(x + w as i32).min(width as i32) {
                        blend_pixel(image.get_pixel_mut(px as u32, py as u32), src);
                    }
                }
            },
        );
        Ok(image)
    }
}

/// Rasterizer that draws each non-space glyph as a solid box half as wide as
/// the font size and as tall as the font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxGlyphRasterizer;

impl BoxGlyphRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Horizontal advance of one glyph.
    pub fn advance(font: &FontSpec) -> u32 {
        ((font.size / 2.0).round() as u32).max(1)
    }
}

impl TextRasterizer for BoxGlyphRasterizer {
    fn measure(&mut self, text: &str, font: &FontSpec) -> u32 {
        text.chars().count() as u32 * Self::advance(font)
    }

    fn rasterize(
        &mut self,
        text: &str,
        style: &TextStyle,
        wrap_width: Option<u32>,
    ) -> RenderResult<RgbaImage> {
        let advance = Self::advance(&style.font);
        let glyph_height = (style.font.size.round() as u32).max(1);
        let line_height = style.font.line_height() as u32;

        // Lay glyphs out on lines, breaking when the next glyph would overflow.
        let mut placed = Vec::new();
        let (mut col, mut line, mut widest) = (0u32, 0u32, 0u32);
        for ch in text.chars() {
            if ch == '\n' || ch == '\r' {
                col = 0;
                line += 1;
                continue;
            }
            if let Some(limit) = wrap_width {
                if col > 0 && (col + 1) * advance > limit {
                    col = 0;
                    line += 1;
                }
            }
            if !ch.is_whitespace() {
                placed.push((col * advance, line * line_height));
            }
            col += 1;
            widest = widest.max(col * advance);
        }
        if widest == 0 {
            return Ok(RgbaImage::new(0, 0));
        }

        let width = wrap_width.unwrap_or(widest).max(1);
        let height = (line + 1) * line_height;
        let mut image = RgbaImage::new(width, height);
        let color = style.color.to_rgba8();
        for (x0, y0) in placed {
            for y in y0..(y0 + glyph_height).min(height) {
                for x in x0..(x0 + advance.saturating_sub(1).max(1)).min(width) {
                    image.put_pixel(x, y, color);
                }
            }
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(size: f32) -> TextStyle {
        TextStyle {
            font: FontSpec::new("", size),
            color: RgbColor::BLACK,
        }
    }

    #[test]
    fn test_font_table_resolution() {
        let mut fonts = FontTable::new("Geneva", 12);
        fonts.insert(1601, "Black Chancery");

        let mut port = GraphicsPort::default();
        port.text_font = 1601;
        port.text_size = 16;
        let spec = fonts.resolve(&port);
        assert_eq!(spec.family, "Black Chancery");
        assert_eq!(spec.size, 16.0);

        port.text_font = 42;
        port.text_size = 0;
        let spec = fonts.resolve(&port);
        assert_eq!(spec.family, "Geneva");
        assert_eq!(spec.size, 12.0);
    }

    #[test]
    fn test_box_glyph_measure_matches_rasterize() {
        let mut raster = BoxGlyphRasterizer::new();
        let s = style(12.0);
        let width = raster.measure("Hello", &s.font);
        let image = raster.rasterize("Hello", &s, None).unwrap();
        assert_eq!(width, 30);
        assert_eq!(image.width(), width);
    }

    #[test]
    fn test_box_glyph_pixels() {
        let mut raster = BoxGlyphRasterizer::new();
        let image = raster.rasterize("a b", &style(12.0), None).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
        // The space leaves its cell transparent.
        assert_eq!(image.get_pixel(7, 2).0[3], 0);
        assert_eq!(image.get_pixel(12, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_box_glyph_wraps() {
        let mut raster = BoxGlyphRasterizer::new();
        let s = style(10.0);
        let image = raster.rasterize("abcdef", &s, Some(16)).unwrap();
        assert_eq!(image.width(), 16);
        // 5px advance, 3 glyphs per line, 2 lines.
        assert_eq!(image.height(), 2 * s.font.line_height() as u32);
    }

    #[test]
    fn test_box_glyph_empty_text() {
        let mut raster = BoxGlyphRasterizer::new();
        let image = raster.rasterize("", &style(12.0), Some(50)).unwrap();
        assert_eq!(image.width(), 0);
    }
}
