//! ProFont converted into the core bitmap font format.
//!
//! Each printable ASCII character is rendered once through
//! `embedded-graphics` into a scratch bitmap and packed into 1 bpp rows. The
//! tables are leaked so the font lives for the rest of the program, as fonts
//! compiled into firmware do.

use std::convert::Infallible;

use easygui::text::{Font, FontChar};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

const FIRST: char = ' ';
const LAST: char = '~';

/// Scratch target recording lit pixels of one character cell.
struct Cell {
    size: Size,
    lit: Vec<bool>,
}

impl Cell {
    fn new(size: Size) -> Self {
        Self {
            size,
            lit: vec![false; (size.width * size.height) as usize],
        }
    }

    /// Pack rows MSB first, padded to whole bytes.
    fn pack(&self) -> Vec<u8> {
        let row_bytes = (self.size.width as usize).div_ceil(8);
        let mut data = vec![0u8; row_bytes * self.size.height as usize];
        for y in 0..self.size.height as usize {
            for x in 0..self.size.width as usize {
                if self.lit[y * self.size.width as usize + x] {
                    data[y * row_bytes + x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        data
    }
}

impl OriginDimensions for Cell {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for Cell {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            let inside = p.x >= 0 && p.y >= 0 && (p.x as u32) < self.size.width && (p.y as u32) < self.size.height;
            if inside && color.is_on() {
                self.lit[p.y as usize * self.size.width as usize + p.x as usize] = true;
            }
        }
        Ok(())
    }
}

/// Convert `mono` into a `'static` core font.
pub fn convert(mono: &MonoFont<'_>) -> &'static Font {
    let style = MonoTextStyle::new(mono, BinaryColor::On);
    let size = mono.character_size;
    let mut chars = Vec::new();
    for ch in FIRST..=LAST {
        let mut cell = Cell::new(size);
        let mut buf = [0u8; 4];
        let text = ch.encode_utf8(&mut buf);
        // Infallible
        let _ = Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut cell);
        chars.push(FontChar {
            width: size.width as u8,
            height: size.height as u8,
            y_pos: 0,
            x_margin: mono.character_spacing as u8,
            data: cell.pack().leak(),
        });
    }
    Box::leak(Box::new(Font {
        size: size.height as u8,
        first: FIRST as u32,
        last: LAST as u32,
        antialiased: false,
        chars: chars.leak(),
    }))
}

pub fn profont() -> &'static Font { convert(&profont::PROFONT_12_POINT) }
