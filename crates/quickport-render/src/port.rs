//! Graphics port state: the pen, colors, font and patterns that drawing
//! calls read.
//!
//! Every window owns one [`GraphicsPort`]. Drawing code takes the port as an
//! explicit argument instead of consulting a process-wide "current port";
//! the toolbox facade keeps a single active-port slot for the legacy calls
//! that draw into "whatever port is current".

use crate::bitmap::PixelPattern;
use crate::types::{Point, Rect, RgbColor};

/// Text style flags (`txFace`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextFace(pub u8);

impl TextFace {
    pub const NORMAL: Self = Self(0x00);
    pub const BOLD: Self = Self(0x01);
    pub const ITALIC: Self = Self(0x02);
    pub const UNDERLINE: Self = Self(0x04);
    pub const OUTLINE: Self = Self(0x08);
    pub const SHADOW: Self = Self(0x10);
    pub const CONDENSE: Self = Self(0x20);
    pub const EXTEND: Self = Self(0x40);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TextFace {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Drawing state for one port.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsPort {
    /// The port's bounds in local coordinates.
    pub port_rect: Rect,
    pub fore_color: RgbColor,
    pub back_color: RgbColor,
    /// Legacy font id; resolved to a family by the font table.
    pub text_font: i16,
    pub text_size: u16,
    pub text_face: TextFace,
    pub text_mode: i16,
    pub pen_location: Point,
    pub pen_pattern: Option<PixelPattern>,
    pub back_pattern: Option<PixelPattern>,
}

impl Default for GraphicsPort {
    fn default() -> Self {
        Self {
            port_rect: Rect::ZERO,
            fore_color: RgbColor::BLACK,
            back_color: RgbColor::WHITE,
            text_font: 0,
            text_size: 12,
            text_face: TextFace::NORMAL,
            text_mode: 0,
            pen_location: Point::ZERO,
            pen_pattern: None,
            back_pattern: None,
        }
    }
}

impl GraphicsPort {
    /// A default port covering `port_rect`.
    pub fn new(port_rect: Rect) -> Self {
        Self {
            port_rect,
            ..Self::default()
        }
    }

    /// Copy another port's drawing settings while keeping our own bounds and
    /// pen location. New windows inherit the default port this way.
    pub fn inherit_from(&mut self, other: &GraphicsPort) {
        let port_rect = self.port_rect;
        let pen_location = self.pen_location;
        *self = other.clone();
        self.port_rect = port_rect;
        self.pen_location = pen_location;
    }

    /// The color lines are drawn with: the pen pattern's first pixel if a
    /// pattern is set, the foreground color otherwise.
    pub fn pen_color(&self) -> RgbColor {
        self.pen_pattern
            .as_ref()
            .and_then(PixelPattern::first_pixel)
            .unwrap_or(self.fore_color)
    }

    /// Set the foreground color from a classic color constant. Unknown
    /// constants leave the color unchanged and return `false`.
    pub fn set_fore_color_constant(&mut self, constant: i32) -> bool {
        match RgbColor::from_classic_constant(constant) {
            Some(color) => {
                self.fore_color = color;
                true
            }
            None => {
                tracing::error!(target: "quickport::canvas", constant, "unrecognized color constant");
                false
            }
        }
    }

    /// Set the background color from a classic color constant.
    pub fn set_back_color_constant(&mut self, constant: i32) -> bool {
        match RgbColor::from_classic_constant(constant) {
            Some(color) => {
                self.back_color = color;
                true
            }
            None => {
                tracing::error!(target: "quickport::canvas", constant, "unrecognized color constant");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_color_prefers_pattern() {
        let mut port = GraphicsPort::default();
        port.fore_color = RgbColor::BLUE;
        assert_eq!(port.pen_color(), RgbColor::BLUE);
        port.pen_pattern = Some(PixelPattern::solid(RgbColor::RED));
        assert_eq!(port.pen_color(), RgbColor::RED);
    }

    #[test]
    fn test_inherit_keeps_bounds_and_pen() {
        let mut source = GraphicsPort::new(Rect::new(0, 0, 480, 640));
        source.text_font = 1601;
        source.text_size = 16;
        source.pen_location = Point::new(9, 9);

        let mut port = GraphicsPort::new(Rect::new(0, 0, 100, 200));
        port.pen_location = Point::new(3, 4);
        port.inherit_from(&source);

        assert_eq!(port.text_font, 1601);
        assert_eq!(port.text_size, 16);
        assert_eq!(port.port_rect, Rect::new(0, 0, 100, 200));
        assert_eq!(port.pen_location, Point::new(3, 4));
    }

    #[test]
    fn test_color_constants() {
        let mut port = GraphicsPort::default();
        assert!(port.set_fore_color_constant(205));
        assert_eq!(port.fore_color, RgbColor::RED);
        assert!(!port.set_back_color_constant(-1));
        assert_eq!(port.back_color, RgbColor::WHITE);
    }

    #[test]
    fn test_text_face_flags() {
        let face = TextFace::BOLD | TextFace::ITALIC;
        assert!(face.contains(TextFace::BOLD));
        assert!(!face.contains(TextFace::UNDERLINE));
    }
}
