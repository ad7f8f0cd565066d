//! Text rendering.
//!
//! [`Canvas::write_text`] lays text out with [`crate::text`] and plots each
//! glyph through one of three paths:
//!
//! 1. driver [`copy_char`](crate::ll::LowLevel::copy_char) of a cached alpha
//!    mask, when the driver supports it and the canvas has a glyph cache;
//! 2. software anti-aliased blend for 2 bpp fonts;
//! 3. plain pixel plot for 1 bpp fonts.
//!
//! All paths honour the two-color split at `area.x + area.color1_width`.

use super::{Canvas, Region};
use crate::text::{Font, FontChar, HAlign, TextArea, TextFlags, VAlign, measure_box, measure_line, right_aligned_start};

impl Canvas<'_> {
    /// Lay out and draw `text` inside `area`.
    ///
    /// Drawing is clipped to `area` in addition to the canvas clip.
    pub fn write_text(
        &mut self,
        font: &Font,
        text: &str,
        area: &TextArea,
    ) {
        let line_height = if area.line_height > 0 { area.line_height } else { font.size as i32 };
        let multiline = area.flags.contains(TextFlags::MULTILINE);
        let bounds = measure_box(font, text, area.width, area.flags, line_height);

        let mut start = 0;
        let mut x_origin = area.x;
        if bounds.width > area.width && area.flags.contains(TextFlags::RIGHT_ALIGN) {
            let (idx, shift) = right_aligned_start(font, text, area.width);
            start = idx;
            x_origin += shift;
        }

        let mut y = area.y
            + match area.valign {
                VAlign::Top => 0,
                VAlign::Center => (area.height - bounds.height) / 2,
                VAlign::Bottom => area.height - bounds.height,
            };
        y = y.max(area.y) - area.scroll_y;
        if multiline && area.flags.contains(TextFlags::EDIT_MODE) && bounds.height > area.height {
            // Keep the cursor line visible
            y = area.y + area.height - bounds.height;
        }

        let outer = self.clip;
        self.clip = outer.intersect(&Region::new(area.x, area.y, area.width, area.height));
        if self.clip.is_empty() {
            self.clip = outer;
            return;
        }

        let mut pos = start;
        loop {
            let line = measure_line(font, text, pos, area.width, area.flags);
            if line.advance() == 0 {
                break;
            }
            let mut x = x_origin
                + match area.halign {
                    HAlign::Left => 0,
                    HAlign::Center => (area.width - line.width) / 2,
                    HAlign::Right => area.width - line.width,
                };
            for ch in text.chars().skip(pos + line.skip).take(line.draw) {
                if x > self.clip.x2 {
                    break;
                }
                x += self.draw_char(font, ch, x, y, area);
            }
            pos += line.advance();
            y += line_height;
            if line.end || !multiline || y > self.clip.y2 {
                break;
            }
        }
        self.clip = outer;
    }

    /// Draw one character with its top-left corner at (`x`, `y`).
    ///
    /// Returns the advance, 0 when the font has no glyph for `ch`.
    pub fn draw_char(
        &mut self,
        font: &Font,
        ch: char,
        x: i32,
        y: i32,
        area: &TextArea,
    ) -> i32 {
        let Some((code, glyph)) = font.glyph(ch) else {
            return 0;
        };
        let y = y + glyph.y_pos as i32;
        let rect = Region::new(x, y, glyph.width as i32, glyph.height as i32);
        if rect.touches(&self.clip) {
            if self.ll.supports_copy_char() && self.glyphs.is_some() {
                self.copy_cached_glyph(font, code, glyph, rect, area);
            } else {
                self.plot_glyph(font, glyph, rect, area);
            }
        }
        glyph.advance()
    }

    fn copy_cached_glyph(
        &mut self,
        font: &Font,
        code: u32,
        glyph: &FontChar,
        rect: Region,
        area: &TextArea,
    ) {
        let vis = rect.intersect(&self.clip);
        let Some(cache) = self.glyphs.as_deref_mut() else {
            return;
        };
        if vis.is_empty() {
            return;
        }
        let entry = cache.get_or_insert(font, code, glyph);
        let stride = entry.width as usize;
        let offset = (vis.y1 - rect.y1) as usize * stride + (vis.x1 - rect.x1) as usize;
        let Some(mask) = entry.alpha.get(offset..) else {
            return;
        };

        let (lx, ly) = (vis.x1 - self.layer.x_offset, vis.y1 - self.layer.y_offset);
        let split = area.x + area.color1_width;
        if vis.x1 < split && vis.x2 > split {
            let first = split - vis.x1;
            self.ll
                .copy_char(lx, ly, first, vis.height(), mask, stride, area.color1);
            self.ll.copy_char(
                lx + first,
                ly,
                vis.width() - first,
                vis.height(),
                &mask[first as usize..],
                stride,
                area.color2,
            );
        } else {
            let color = if split > vis.x1 { area.color1 } else { area.color2 };
            self.ll
                .copy_char(lx, ly, vis.width(), vis.height(), mask, stride, color);
        }
    }

    fn plot_glyph(
        &mut self,
        font: &Font,
        glyph: &FontChar,
        rect: Region,
        area: &TextArea,
    ) {
        let split = area.x + area.color1_width;
        for row in 0..rect.height() {
            let py = rect.y1 + row;
            if py < self.clip.y1 || py >= self.clip.y2 {
                continue;
            }
            for col in 0..rect.width() {
                let coverage = glyph.coverage(font.antialiased, col as usize, row as usize);
                if coverage == 0 {
                    continue;
                }
                let px = rect.x1 + col;
                let color = if px < split { area.color1 } else { area.color2 };
                if coverage == 3 {
                    self.set_pixel(px, py, color);
                } else {
                    let under = self.get_pixel(px, py);
                    self.set_pixel(px, py, color.blend(under, coverage * 0x55));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, RED, WHITE};
    use crate::draw::tests::count;
    use crate::ll::LowLevel;
    use crate::ll::framebuffer::FrameBuffer;
    use crate::text::GlyphCache;
    use crate::text::tests::{AA_FONT, MONO};

    /// Framebuffer that plots glyphs itself.
    struct Plain(FrameBuffer);

    impl LowLevel for Plain {
        fn width(&self) -> i32 { self.0.width() }

        fn height(&self) -> i32 { self.0.height() }

        fn set_pixel(
            &mut self,
            x: i32,
            y: i32,
            color: crate::Color,
        ) {
            self.0.set_pixel(x, y, color);
        }

        fn get_pixel(
            &self,
            x: i32,
            y: i32,
        ) -> crate::Color {
            self.0.get_pixel(x, y)
        }

        fn fill_rect(
            &mut self,
            x: i32,
            y: i32,
            width: i32,
            height: i32,
            color: crate::Color,
        ) {
            self.0.fill_rect(x, y, width, height, color);
        }
    }

    #[test]
    fn test_single_line_left_aligned() {
        let mut fb = FrameBuffer::new(60, 10);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 60, 10));
        canvas.write_text(&MONO, "AB", &TextArea::new(0, 0, 60, 10, WHITE));
        assert_eq!(count(&fb, WHITE), 16, "Two 8 px glyph rows");
        assert_eq!(fb.pixel(7, 0), Some(WHITE));
        assert_eq!(fb.pixel(8, 0), Some(BLACK), "Margin left empty");
        assert_eq!(fb.pixel(10, 0), Some(WHITE));
    }

    #[test]
    fn test_text_clipped_to_area() {
        let mut fb = FrameBuffer::new(60, 10);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 60, 10));
        canvas.write_text(&MONO, "ABCDEF", &TextArea::new(0, 0, 25, 10, WHITE));
        assert!(count(&fb, WHITE) <= 25);
        assert_eq!(fb.pixel(25, 0), Some(BLACK));
    }

    #[test]
    fn test_center_alignment() {
        let mut fb = FrameBuffer::new(40, 10);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 40, 10));
        let area = TextArea::new(0, 0, 40, 10, WHITE).with_align(HAlign::Center, VAlign::Top);
        canvas.write_text(&MONO, "A", &area);
        assert_eq!(fb.pixel(15, 0), Some(WHITE));
        assert_eq!(fb.pixel(14, 0), Some(BLACK));
    }

    #[test]
    fn test_multiline_wraps_words() {
        let mut fb = FrameBuffer::new(60, 30);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 60, 30));
        let area = TextArea::new(0, 0, 50, 30, WHITE).with_flags(TextFlags::MULTILINE);
        canvas.write_text(&MONO, "AAAA BBBB", &area);
        assert_eq!(fb.pixel(0, 0), Some(WHITE));
        assert_eq!(fb.pixel(0, 10), Some(WHITE), "Second word on the second line");
        assert_eq!(fb.pixel(40, 0), Some(BLACK), "Space not drawn at line end");
    }

    #[test]
    fn test_two_color_split_cached_path() {
        let mut fb = FrameBuffer::new(30, 10);
        let mut cache = GlyphCache::new(8);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 30, 10)).with_glyph_cache(&mut cache);
        let area = TextArea::new(0, 0, 30, 10, WHITE).with_split_color(RED, 4);
        canvas.write_text(&MONO, "A", &area);
        assert_eq!(fb.pixel(3, 0), Some(WHITE));
        assert_eq!(fb.pixel(4, 0), Some(RED));
        assert_eq!(cache.len(), 1, "Glyph went through the cache");
    }

    #[test]
    fn test_two_color_split_software_path() {
        let mut fb = Plain(FrameBuffer::new(30, 10));
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 30, 10));
        let area = TextArea::new(0, 0, 30, 10, WHITE).with_split_color(RED, 4);
        canvas.write_text(&MONO, "A", &area);
        assert_eq!(fb.0.pixel(3, 0), Some(WHITE));
        assert_eq!(fb.0.pixel(4, 0), Some(RED));
    }

    #[test]
    fn test_antialiased_coverage_blends() {
        let mut fb = Plain(FrameBuffer::new(4, 1));
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 4, 1));
        canvas.write_text(&AA_FONT, "?", &TextArea::new(0, 0, 4, 1, WHITE));
        assert_eq!(fb.0.pixel(0, 0), Some(WHITE), "Full coverage");
        assert_eq!(fb.0.pixel(1, 0).map(|c| c.red()), Some(0xAA), "2/3 coverage");
        assert_eq!(fb.0.pixel(2, 0).map(|c| c.red()), Some(0x55), "1/3 coverage");
        assert_eq!(fb.0.pixel(3, 0), Some(BLACK));
    }

    #[test]
    fn test_right_align_shows_text_end() {
        let mut fb = FrameBuffer::new(40, 10);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 40, 10));
        let area = TextArea::new(0, 0, 25, 10, WHITE).with_flags(TextFlags::RIGHT_ALIGN);
        canvas.write_text(&MONO, "ABCDE", &area);
        assert_eq!(fb.pixel(24, 0), Some(BLACK), "Margin of the last glyph ends the box");
        assert_eq!(fb.pixel(22, 0), Some(WHITE));
    }
}
