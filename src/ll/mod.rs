//! Low-level display driver interface.
//!
//! The hardware collaborator implements [`LowLevel`]. Only pixel access and a
//! rectangle fill are required; every accelerated entry (lines, glyph copy,
//! image blits, blended copy) has a default implementation built on the
//! required ones, so a minimal driver still renders everything.
//!
//! All coordinates passed to a driver are layer-relative: the drawing engine
//! subtracts the [`Layer`] offsets before calling in and never passes pixels
//! outside the active clip.

pub mod framebuffer;

use crate::colors::Color;

/// Drawing layer: a (possibly virtual) sub-region of the framebuffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Layer {
    pub width: i32,
    pub height: i32,
    /// Screen X coordinate of the layer's first column.
    pub x_offset: i32,
    /// Screen Y coordinate of the layer's first row.
    pub y_offset: i32,
}

impl Layer {
    /// Full-screen layer.
    pub const fn screen(
        width: i32,
        height: i32,
    ) -> Self {
        Self {
            width,
            height,
            x_offset: 0,
            y_offset: 0,
        }
    }
}

/// Pixel format of an [`Image`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    /// 16 bpp RGB565, little endian.
    Rgb565,
    /// 24 bpp, bytes `B, G, R`.
    Rgb888,
    /// 32 bpp, bytes `B, G, R, A`; blended by alpha.
    Argb8888,
}

impl ImageFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb565 => 2,
            Self::Rgb888 => 3,
            Self::Argb8888 => 4,
        }
    }
}

/// Raw image descriptor.
#[derive(Clone, Copy, Debug)]
pub struct Image<'a> {
    pub width: i32,
    pub height: i32,
    pub format: ImageFormat,
    /// Rows top to bottom, `width * bytes_per_pixel` bytes each.
    pub data: &'a [u8],
}

impl Image<'_> {
    /// Decode the pixel at (`x`, `y`).
    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Color {
        let bpp = self.format.bytes_per_pixel();
        let idx = (y as usize * self.width as usize + x as usize) * bpp;
        let Some(px) = self.data.get(idx..idx + bpp) else {
            return Color(0);
        };
        match self.format {
            ImageFormat::Rgb565 => {
                let raw = u16::from_le_bytes([px[0], px[1]]);
                let r = ((raw >> 11) & 0x1F) as u8;
                let g = ((raw >> 5) & 0x3F) as u8;
                let b = (raw & 0x1F) as u8;
                Color::rgb(r << 3 | r >> 2, g << 2 | g >> 4, b << 3 | b >> 2)
            }
            ImageFormat::Rgb888 => Color::rgb(px[2], px[1], px[0]),
            ImageFormat::Argb8888 => Color::argb(px[3], px[2], px[1], px[0]),
        }
    }
}

/// Display driver implemented by the hardware layer.
pub trait LowLevel {
    /// Bring up the display. Returns `false` on failure.
    fn init(&mut self) -> bool { true }

    /// Poll whether the driver can accept drawing commands.
    fn is_ready(&self) -> bool { true }

    /// Screen width in pixels.
    fn width(&self) -> i32;

    /// Screen height in pixels.
    fn height(&self) -> i32;

    fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Color,
    );

    fn get_pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Color;

    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    );

    fn draw_hline(
        &mut self,
        x: i32,
        y: i32,
        length: i32,
        color: Color,
    ) {
        for i in 0..length {
            self.set_pixel(x + i, y, color);
        }
    }

    fn draw_vline(
        &mut self,
        x: i32,
        y: i32,
        length: i32,
        color: Color,
    ) {
        for i in 0..length {
            self.set_pixel(x, y + i, color);
        }
    }

    /// Whether [`copy_char`](Self::copy_char) should be used for glyphs.
    ///
    /// When `false` the drawing engine plots glyphs itself from the font bits.
    fn supports_copy_char(&self) -> bool { false }

    /// Blend an 8-bit alpha mask in `color` onto the layer.
    ///
    /// `alpha` holds `height` rows of `stride` bytes; `width` bytes of each row
    /// are used.
    fn copy_char(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        alpha: &[u8],
        stride: usize,
        color: Color,
    ) {
        for row in 0..height {
            for col in 0..width {
                let a = alpha.get(row as usize * stride + col as usize).copied().unwrap_or(0);
                match a {
                    0 => {}
                    0xFF => self.set_pixel(x + col, y + row, color),
                    _ => {
                        let under = self.get_pixel(x + col, y + row);
                        self.set_pixel(x + col, y + row, color.blend(under, a));
                    }
                }
            }
        }
    }

    /// Copy a 16 bpp region of `image`: `width` x `height` pixels starting
    /// at (`src_x`, `src_y`) in the image go to (`x`, `y`) on the layer.
    fn draw_image16(
        &mut self,
        x: i32,
        y: i32,
        image: &Image<'_>,
        src_x: i32,
        src_y: i32,
        width: i32,
        height: i32,
    ) {
        copy_image(self, x, y, image, src_x, src_y, width, height);
    }

    /// Copy a 24 bpp region of `image`, as [`draw_image16`](Self::draw_image16).
    fn draw_image24(
        &mut self,
        x: i32,
        y: i32,
        image: &Image<'_>,
        src_x: i32,
        src_y: i32,
        width: i32,
        height: i32,
    ) {
        copy_image(self, x, y, image, src_x, src_y, width, height);
    }

    /// Blend a 32 bpp region of `image` by its per-pixel alpha.
    fn draw_image32(
        &mut self,
        x: i32,
        y: i32,
        image: &Image<'_>,
        src_x: i32,
        src_y: i32,
        width: i32,
        height: i32,
    ) {
        for row in 0..height {
            for col in 0..width {
                let c = image.pixel(src_x + col, src_y + row);
                match c.alpha() {
                    0 => {}
                    0xFF => self.set_pixel(x + col, y + row, c),
                    a => {
                        let under = self.get_pixel(x + col, y + row);
                        self.set_pixel(x + col, y + row, c.with_alpha(0xFF).blend(under, a));
                    }
                }
            }
        }
    }

    /// Blend the current content of a rectangle with `under` (row-major,
    /// `width * height` pixels) by `alpha`: 255 keeps the current pixels,
    /// 0 restores `under`.
    fn copy_blend(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        under: &[Color],
        alpha: u8,
    ) {
        for row in 0..height {
            for col in 0..width {
                let Some(&bg) = under.get((row * width + col) as usize) else {
                    continue;
                };
                let fg = self.get_pixel(x + col, y + row);
                self.set_pixel(x + col, y + row, fg.blend(bg, alpha));
            }
        }
    }
}

/// Software image copy through `set_pixel`.
fn copy_image<L: LowLevel + ?Sized>(
    ll: &mut L,
    x: i32,
    y: i32,
    image: &Image<'_>,
    src_x: i32,
    src_y: i32,
    width: i32,
    height: i32,
) {
    for row in 0..height {
        for col in 0..width {
            ll.set_pixel(x + col, y + row, image.pixel(src_x + col, src_y + row));
        }
    }
}
