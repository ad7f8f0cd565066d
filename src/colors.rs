//! ARGB8888 colors used by the drawing engine and widget color tables.
//!
//! The core works in 32-bit ARGB internally; conversion to the panel's native
//! format happens only when a framebuffer is flushed (see
//! [`FrameBuffer::flush_to`](crate::ll::framebuffer::FrameBuffer::flush_to)).
//!
//! An alpha of `0` is the transparent sentinel: every fill primitive treats it
//! as a no-op.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};

/// 32-bit ARGB color (`0xAARRGGBB`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Color(pub u32);

impl Color {
    /// Build a color from alpha and RGB channels.
    pub const fn argb(
        a: u8,
        r: u8,
        g: u8,
        b: u8,
    ) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Build an opaque color.
    pub const fn rgb(
        r: u8,
        g: u8,
        b: u8,
    ) -> Self {
        Self::argb(0xFF, r, g, b)
    }

    #[inline]
    pub const fn alpha(self) -> u8 { (self.0 >> 24) as u8 }

    #[inline]
    pub const fn red(self) -> u8 { (self.0 >> 16) as u8 }

    #[inline]
    pub const fn green(self) -> u8 { (self.0 >> 8) as u8 }

    #[inline]
    pub const fn blue(self) -> u8 { self.0 as u8 }

    /// Check for the transparent sentinel.
    #[inline]
    pub const fn is_transparent(self) -> bool { self.alpha() == 0 }

    /// Same RGB with a different alpha.
    pub const fn with_alpha(
        self,
        alpha: u8,
    ) -> Self {
        Self((self.0 & 0x00FF_FFFF) | (alpha as u32) << 24)
    }

    /// Blend `self` over `dst` with coverage `alpha` (0 = `dst`, 255 = `self`).
    ///
    /// The result keeps the destination alpha channel.
    pub const fn blend(
        self,
        dst: Self,
        alpha: u8,
    ) -> Self {
        const fn mix(
            fg: u8,
            bg: u8,
            a: u32,
        ) -> u8 {
            ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
        }
        let a = alpha as u32;
        Self::argb(
            dst.alpha(),
            mix(self.red(), dst.red(), a),
            mix(self.green(), dst.green(), a),
            mix(self.blue(), dst.blue(), a),
        )
    }
}

impl From<Color> for Rgb888 {
    fn from(c: Color) -> Self { Rgb888::new(c.red(), c.green(), c.blue()) }
}

impl From<Color> for Rgb565 {
    fn from(c: Color) -> Self { Rgb565::from(Rgb888::from(c)) }
}

impl From<Rgb888> for Color {
    fn from(c: Rgb888) -> Self {
        use embedded_graphics::pixelcolor::RgbColor;
        Color::rgb(c.r(), c.g(), c.b())
    }
}

// =============================================================================
// Standard Colors
// =============================================================================

/// Transparent sentinel, drawing with it is a no-op.
pub const TRANSPARENT: Color = Color(0x0000_0000);

pub const BLACK: Color = Color(0xFF00_0000);
pub const WHITE: Color = Color(0xFFFF_FFFF);
pub const RED: Color = Color(0xFFFF_0000);
pub const GREEN: Color = Color(0xFF00_FF00);
pub const BLUE: Color = Color(0xFF00_00FF);
pub const YELLOW: Color = Color(0xFFFF_FF00);
pub const CYAN: Color = Color(0xFF00_FFFF);
pub const ORANGE: Color = Color(0xFFFF_A500);
pub const GRAY: Color = Color(0xFF80_8080);

// =============================================================================
// Window Palette
// =============================================================================

/// Light bevel edge for raised 3D rectangles.
pub const BEVEL_LIGHT: Color = Color(0xFFAA_AAAA);

/// Dark bevel edge for raised 3D rectangles.
pub const BEVEL_DARK: Color = Color(0xFF55_5555);

/// Scrollbar track and arrow button fill.
pub const WIN_MIDDLEGRAY: Color = Color(0xFF99_9999);

/// Desktop window background.
pub const WIN_BACKGROUND: Color = Color(0xFFC0_C0C0);

/// Default text color on window backgrounds.
pub const WIN_TEXT: Color = Color(0xFF00_0000);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels() {
        let c = Color::argb(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.0, 0x1234_5678);
        assert_eq!((c.alpha(), c.red(), c.green(), c.blue()), (0x12, 0x34, 0x56, 0x78));
    }

    #[test]
    fn test_transparent_sentinel() {
        assert!(TRANSPARENT.is_transparent());
        assert!(!BLACK.is_transparent());
        assert!(WHITE.with_alpha(0).is_transparent());
    }

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(WHITE.blend(BLACK, 255), WHITE);
        assert_eq!(WHITE.blend(BLACK, 0), BLACK);
        let mid = WHITE.blend(BLACK, 0x80);
        assert_eq!(mid.red(), 0x80);
        assert_eq!(mid.alpha(), 0xFF, "Blend keeps destination alpha");
    }

    #[test]
    fn test_rgb565_conversion() {
        let c: Rgb565 = RED.into();
        assert_eq!(c, Rgb565::new(31, 0, 0));
    }
}
