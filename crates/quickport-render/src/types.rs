//! Geometry and color types shared by the drawing layer.
//!
//! Coordinates follow the classic toolbox conventions: integer pixels, a
//! [`Point`] carries horizontal (`h`) and vertical (`v`) components, and a
//! [`Rect`] is described by its four edges rather than origin plus size.

use serde::{Deserialize, Serialize};

/// A point in integer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub h: i32,
    pub v: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(h: i32, v: i32) -> Self {
        Self { h, v }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { h: 0, v: 0 };

    /// Translate the point by the given deltas.
    #[inline]
    pub const fn offset(self, dh: i32, dv: i32) -> Self {
        Self {
            h: self.h + dh,
            v: self.v + dv,
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((h, v): (i32, i32)) -> Self {
        Self { h, v }
    }
}

/// A size in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// A rectangle described by its edges.
///
/// The top and left edges are inside the rectangle, the bottom and right edges
/// are not. A rectangle whose bottom is not below its top (or whose right is
/// not right of its left) is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Rect {
    /// Create a rectangle from its edges, in toolbox order.
    #[inline]
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Create a rectangle at `origin` with the given size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            top: origin.v,
            left: origin.h,
            bottom: origin.v + size.height as i32,
            right: origin.h + size.width as i32,
        }
    }

    /// Create a rectangle anchored at (0, 0).
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::from_origin_size(Point::ZERO, size)
    }

    /// Empty rectangle at origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Width of the rectangle, zero if inverted.
    #[inline]
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    /// Height of the rectangle, zero if inverted.
    #[inline]
    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top || self.right <= self.left
    }

    /// Check whether a point lies inside the rectangle.
    ///
    /// Matches `PtInRect`: the top/left edges are inclusive and the
    /// bottom/right edges exclusive.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.v >= self.top && point.h >= self.left && point.v < self.bottom && point.h < self.right
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.top.max(other.top),
            self.left.max(other.left),
            self.bottom.min(other.bottom),
            self.right.min(other.right),
        );
        (!r.is_empty()).then_some(r)
    }

    /// Translate the rectangle.
    #[inline]
    pub fn offset(&self, dh: i32, dv: i32) -> Rect {
        Rect::new(self.top + dv, self.left + dh, self.bottom + dv, self.right + dh)
    }

    /// Shrink (positive) or grow (negative) the rectangle on each side.
    #[inline]
    pub fn inset(&self, dh: i32, dv: i32) -> Rect {
        Rect::new(self.top + dv, self.left + dh, self.bottom - dv, self.right - dh)
    }

    /// Move the rectangle so its top-left corner sits at `origin`.
    #[inline]
    pub fn moved_to(&self, origin: Point) -> Rect {
        Rect::from_origin_size(origin, self.size())
    }
}

/// A color with 16 bits per channel, as stored in a graphics port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RgbColor {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl RgbColor {
    pub const WHITE: Self = Self::new(0xFFFF, 0xFFFF, 0xFFFF);
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const RED: Self = Self::new(0xFFFF, 0, 0);
    pub const GREEN: Self = Self::new(0, 0xFFFF, 0);
    pub const BLUE: Self = Self::new(0, 0, 0xFFFF);
    pub const CYAN: Self = Self::new(0, 0xFFFF, 0xFFFF);
    pub const YELLOW: Self = Self::new(0xFFFF, 0xFFFF, 0);

    #[inline]
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    /// Widen 8-bit channels to 16 bits.
    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as u16 * 0x0101, g as u16 * 0x0101, b as u16 * 0x0101)
    }

    /// Resolve one of the eight classic color constants
    /// (`whiteColor`, `blackColor`, ...).
    pub fn from_classic_constant(constant: i32) -> Option<Self> {
        match constant {
            30 => Some(Self::WHITE),
            33 => Some(Self::BLACK),
            69 => Some(Self::YELLOW),
            205 => Some(Self::RED),
            273 => Some(Self::CYAN),
            341 => Some(Self::GREEN),
            409 => Some(Self::BLUE),
            _ => None,
        }
    }

    /// Narrow to an opaque 8-bit RGBA pixel.
    #[inline]
    pub fn to_rgba8(self) -> image::Rgba<u8> {
        image::Rgba([
            (self.red / 0x0101) as u8,
            (self.green / 0x0101) as u8,
            (self.blue / 0x0101) as u8,
            0xFF,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let r = Rect::new(10, 20, 30, 40);
        assert!(r.contains(Point::new(20, 10)));
        assert!(r.contains(Point::new(39, 29)));
        assert!(!r.contains(Point::new(40, 15)));
        assert!(!r.contains(Point::new(25, 30)));
    }

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(5, 5, 25, 45);
        assert_eq!(r.width(), 40);
        assert_eq!(r.height(), 20);
        assert_eq!(Rect::new(10, 10, 5, 5).width(), 0);
        assert!(Rect::new(10, 10, 5, 5).is_empty());
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 15, 15);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 10, 10)));
        assert_eq!(a.intersect(&Rect::new(20, 20, 30, 30)), None);
    }

    #[test]
    fn test_rect_moved_to_keeps_size() {
        let r = Rect::new(10, 10, 30, 60).moved_to(Point::new(100, 200));
        assert_eq!(r, Rect::new(200, 100, 220, 150));
    }

    #[test]
    fn test_classic_color_constants() {
        assert_eq!(RgbColor::from_classic_constant(33), Some(RgbColor::BLACK));
        assert_eq!(RgbColor::from_classic_constant(205), Some(RgbColor::RED));
        assert_eq!(RgbColor::from_classic_constant(7), None);
    }

    #[test]
    fn test_color_narrowing() {
        assert_eq!(RgbColor::WHITE.to_rgba8(), image::Rgba([255, 255, 255, 255]));
        assert_eq!(RgbColor::from_rgb8(12, 34, 56).to_rgba8(), image::Rgba([12, 34, 56, 255]));
    }
}
