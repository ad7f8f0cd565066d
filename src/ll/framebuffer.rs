//! Software framebuffer driver.
//!
//! [`FrameBuffer`] keeps one ARGB pixel per screen position in RAM and
//! implements [`LowLevel`] with accelerated fills, lines and glyph copies. It is
//! the driver used by host tests and the desktop simulator, and a starting
//! point for SPI panels that are flushed from a RAM buffer.
//!
//! # Flushing
//!
//! The buffer implements `embedded_graphics::DrawTarget` (so plain
//! embedded-graphics drawables can be rendered into it) and can be flushed to
//! any other `DrawTarget`, either completely or limited to the region the last
//! redraw pass touched.

use alloc::vec;
use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::LowLevel;
use crate::colors::Color;
use crate::draw::Region;

/// RAM framebuffer with one [`Color`] per pixel.
pub struct FrameBuffer {
    width: i32,
    height: i32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a framebuffer cleared to black.
    pub fn new(
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            pixels: vec![crate::colors::BLACK; (width * height) as usize],
        }
    }

    /// Clear the framebuffer with a color.
    pub fn clear_buffer(
        &mut self,
        color: Color,
    ) {
        self.pixels.fill(color);
    }

    /// Read back a pixel, `None` outside the buffer.
    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Raw pixel storage, row-major.
    pub fn pixels(&self) -> &[Color] { &self.pixels }

    #[inline]
    fn index(
        &self,
        x: i32,
        y: i32,
    ) -> Option<usize> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Clip a rectangle to the buffer. Returns `(x, y, width, height)`.
    fn clip(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Option<(i32, i32, i32, i32)> {
        let x1 = x.max(0);
        let y1 = y.max(0);
        let x2 = (x + width).min(self.width);
        let y2 = (y + height).min(self.height);
        if x2 > x1 && y2 > y1 { Some((x1, y1, x2 - x1, y2 - y1)) } else { None }
    }

    /// Flush the whole buffer to a display.
    pub fn flush_to<D>(
        &self,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget,
        D::Color: From<Rgb888>,
    {
        let area = Rectangle::new(Point::zero(), Size::new(self.width as u32, self.height as u32));
        target.fill_contiguous(&area, self.pixels.iter().map(|c| D::Color::from(Rgb888::from(*c))))
    }

    /// Flush only `region` (clipped to the buffer) to a display.
    pub fn flush_region_to<D>(
        &self,
        region: Region,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget,
        D::Color: From<Rgb888>,
    {
        let Some((x, y, w, h)) = self.clip(region.x1, region.y1, region.width(), region.height()) else {
            return Ok(());
        };
        let area = Rectangle::new(Point::new(x, y), Size::new(w as u32, h as u32));
        let stride = self.width as usize;
        let colors = (y..y + h).flat_map(move |row| {
            let start = row as usize * stride + x as usize;
            self.pixels[start..start + w as usize]
                .iter()
                .map(|c| D::Color::from(Rgb888::from(*c)))
        });
        target.fill_contiguous(&area, colors)
    }
}

impl LowLevel for FrameBuffer {
    fn width(&self) -> i32 { self.width }

    fn height(&self) -> i32 { self.height }

    #[inline]
    fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Color,
    ) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    #[inline]
    fn get_pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Color {
        self.pixel(x, y).unwrap_or_default()
    }

    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    ) {
        let Some((x, y, w, h)) = self.clip(x, y, width, height) else {
            return;
        };
        let stride = self.width as usize;
        for row in y..y + h {
            let start = row as usize * stride + x as usize;
            self.pixels[start..start + w as usize].fill(color);
        }
    }

    fn draw_hline(
        &mut self,
        x: i32,
        y: i32,
        length: i32,
        color: Color,
    ) {
        self.fill_rect(x, y, length, 1, color);
    }

    fn draw_vline(
        &mut self,
        x: i32,
        y: i32,
        length: i32,
        color: Color,
    ) {
        self.fill_rect(x, y, 1, length, color);
    }

    fn supports_copy_char(&self) -> bool { true }

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
            let src = row as usize * stride;
            let Some(mask) = alpha.get(src..src + width as usize) else {
                break;
            };
            for (col, &a) in mask.iter().enumerate() {
                let Some(i) = self.index(x + col as i32, y + row) else {
                    continue;
                };
                self.pixels[i] = match a {
                    0 => continue,
                    0xFF => color,
                    _ => color.blend(self.pixels[i], a),
                };
            }
        }
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size { Size::new(self.width as u32, self.height as u32) }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            LowLevel::set_pixel(self, point.x, point.y, color.into());
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let drawable_area = area.intersection(&self.bounding_box());
        if drawable_area.size == Size::zero() {
            return Ok(());
        }
        self.fill_rect(
            drawable_area.top_left.x,
            drawable_area.top_left.y,
            drawable_area.size.width as i32,
            drawable_area.size.height as i32,
            color.into(),
        );
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.clear_buffer(color.into());
        Ok(())
    }
}
