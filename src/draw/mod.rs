//! Clipped drawing primitives.
//!
//! Every primitive runs on a [`Canvas`], which pairs a [`LowLevel`] driver
//! with the active clip [`Region`] and drawing [`Layer`]. Nothing is ever
//! drawn outside the clip: primitives either truncate to it or return early.
//! Coordinates are screen coordinates; the canvas translates them into
//! layer-relative ones before calling the driver.
//!
//! # Modules
//!
//! - [`shapes`] - rounded rectangles, circles, triangles, polygons
//! - [`glyph`] - text rendering on top of [`crate::text`] layout
//! - [`image`] - bitmap blits
//! - [`scrollbar`] - scrollbar widget part

pub mod glyph;
pub mod image;
pub mod scrollbar;
pub mod shapes;

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::colors::{BEVEL_DARK, BEVEL_LIGHT, BLACK, Color};
use crate::ll::{Layer, LowLevel};
use crate::text::GlyphCache;

pub use scrollbar::Scrollbar;
pub use shapes::Corners;

// =============================================================================
// Region
// =============================================================================

/// Rectangle with half-open bounds: `x1..x2`, `y1..y2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Region {
    /// Region covering nothing; the identity of [`union`](Self::union).
    pub const EMPTY: Self = Self {
        x1: i32::MAX,
        y1: i32::MAX,
        x2: i32::MIN,
        y2: i32::MIN,
    };

    /// Region from position and size.
    pub const fn new(
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool { self.x1 >= self.x2 || self.y1 >= self.y2 }

    #[inline]
    pub const fn width(&self) -> i32 {
        if self.is_empty() { 0 } else { self.x2 - self.x1 }
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        if self.is_empty() { 0 } else { self.y2 - self.y1 }
    }

    #[inline]
    pub const fn contains(
        &self,
        x: i32,
        y: i32,
    ) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }

    /// Smallest region covering both.
    pub fn union(
        &self,
        other: &Self,
    ) -> Self {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Self {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Common part, possibly empty.
    pub fn intersect(
        &self,
        other: &Self,
    ) -> Self {
        Self {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        }
    }

    /// Overlap test used for invalidation and redraw; touching edges count.
    pub const fn touches(
        &self,
        other: &Self,
    ) -> bool {
        !(self.is_empty()
            || other.is_empty()
            || self.x1 > other.x2
            || self.y1 > other.y2
            || other.x1 > self.x2
            || other.y1 > self.y2)
    }
}

impl From<Region> for Rectangle {
    fn from(r: Region) -> Self {
        Rectangle::new(Point::new(r.x1, r.y1), Size::new(r.width() as u32, r.height() as u32))
    }
}

impl From<Rectangle> for Region {
    fn from(r: Rectangle) -> Self {
        Region::new(r.top_left.x, r.top_left.y, r.size.width as i32, r.size.height as i32)
    }
}

/// Bevel style of [`Canvas::rect_3d`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bevel {
    Raised,
    Lowered,
}

// =============================================================================
// Canvas
// =============================================================================

/// Drawing context: driver, layer and clip.
pub struct Canvas<'a> {
    ll: &'a mut dyn LowLevel,
    layer: Layer,
    clip: Region,
    glyphs: Option<&'a mut GlyphCache>,
}

impl<'a> Canvas<'a> {
    /// Canvas over the full screen layer of `ll`.
    pub fn new(
        ll: &'a mut dyn LowLevel,
        clip: Region,
    ) -> Self {
        let layer = Layer::screen(ll.width(), ll.height());
        Self {
            ll,
            layer,
            clip,
            glyphs: None,
        }
    }

    /// Draw into a layer instead of the full screen.
    pub fn with_layer(
        mut self,
        layer: Layer,
    ) -> Self {
        self.layer = layer;
        self
    }

    /// Use `cache` for glyphs when the driver supports glyph copies.
    pub fn with_glyph_cache(
        mut self,
        cache: &'a mut GlyphCache,
    ) -> Self {
        self.glyphs = Some(cache);
        self
    }

    #[inline]
    pub const fn clip(&self) -> Region { self.clip }

    /// Replace the clip region, returning the previous one.
    pub fn set_clip(
        &mut self,
        clip: Region,
    ) -> Region {
        core::mem::replace(&mut self.clip, clip)
    }

    #[inline]
    pub const fn layer(&self) -> Layer { self.layer }

    /// Direct driver access for widget kinds with custom needs.
    pub fn driver(&mut self) -> &mut dyn LowLevel { &mut *self.ll }

    /// Fill the whole clip region.
    pub fn fill_screen(
        &mut self,
        color: Color,
    ) {
        let c = self.clip;
        self.fill_rect(c.x1, c.y1, c.width(), c.height(), color);
    }

    pub fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Color,
    ) {
        if self.clip.contains(x, y) && !color.is_transparent() {
            self.ll
                .set_pixel(x - self.layer.x_offset, y - self.layer.y_offset, color);
        }
    }

    /// Read back a pixel, transparent outside the clip.
    pub fn get_pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Color {
        if self.clip.contains(x, y) {
            self.ll.get_pixel(x - self.layer.x_offset, y - self.layer.y_offset)
        } else {
            crate::colors::TRANSPARENT
        }
    }

    /// Filled rectangle; each edge is clipped independently.
    pub fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    ) {
        if width <= 0 || height <= 0 || color.is_transparent() {
            return;
        }
        let r = Region::new(x, y, width, height).intersect(&self.clip);
        if r.is_empty() {
            return;
        }
        self.ll.fill_rect(
            r.x1 - self.layer.x_offset,
            r.y1 - self.layer.y_offset,
            r.width(),
            r.height(),
            color,
        );
    }

    pub fn hline(
        &mut self,
        x: i32,
        y: i32,
        length: i32,
        color: Color,
    ) {
        if length <= 0 || y < self.clip.y1 || y >= self.clip.y2 || color.is_transparent() {
            return;
        }
        let x1 = x.max(self.clip.x1);
        let x2 = (x + length).min(self.clip.x2);
        if x2 > x1 {
            self.ll
                .draw_hline(x1 - self.layer.x_offset, y - self.layer.y_offset, x2 - x1, color);
        }
    }

    pub fn vline(
        &mut self,
        x: i32,
        y: i32,
        length: i32,
        color: Color,
    ) {
        if length <= 0 || x < self.clip.x1 || x >= self.clip.x2 || color.is_transparent() {
            return;
        }
        let y1 = y.max(self.clip.y1);
        let y2 = (y + length).min(self.clip.y2);
        if y2 > y1 {
            self.ll
                .draw_vline(x - self.layer.x_offset, y1 - self.layer.y_offset, y2 - y1, color);
        }
    }

    /// Line between two points, both inclusive (Bresenham).
    pub fn line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) {
        let dx = (x2 - x1).abs();
        let dy = (y2 - y1).abs();
        if dx == 0 {
            self.vline(x1, y1.min(y2), dy + 1, color);
            return;
        }
        if dy == 0 {
            self.hline(x1.min(x2), y1, dx + 1, color);
            return;
        }

        let sx = if x2 >= x1 { 1 } else { -1 };
        let sy = if y2 >= y1 { 1 } else { -1 };
        // Step the major axis every pixel, the minor one on accumulator overflow
        let (den, add, pixels, major, minor) = if dx >= dy {
            (dx, dy, dx, (sx, 0), (0, sy))
        } else {
            (dy, dx, dy, (0, sy), (sx, 0))
        };
        let mut num = den / 2;
        let (mut x, mut y) = (x1, y1);
        for _ in 0..=pixels {
            self.set_pixel(x, y, color);
            num += add;
            if num >= den {
                num -= den;
                x += minor.0;
                y += minor.1;
            }
            x += major.0;
            y += major.1;
        }
    }

    /// Rectangle outline.
    pub fn rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }
        self.hline(x, y, width, color);
        self.vline(x, y, height, color);
        self.hline(x, y + height - 1, width, color);
        self.vline(x + width - 1, y, height, color);
    }

    /// Black outline with a light/dark bevel inside.
    pub fn rect_3d(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bevel: Bevel,
    ) {
        let (top_left, bottom_right) = match bevel {
            Bevel::Raised => (BEVEL_LIGHT, BEVEL_DARK),
            Bevel::Lowered => (BEVEL_DARK, BEVEL_LIGHT),
        };
        self.rect(x, y, width, height, BLACK);
        self.hline(x + 1, y + 1, width - 2, top_left);
        self.vline(x + 1, y + 1, height - 3, top_left);
        self.hline(x + 1, y + height - 2, width - 2, bottom_right);
        self.vline(x + width - 2, y + 2, height - 4, bottom_right);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::colors::{RED, TRANSPARENT, WHITE};
    use crate::ll::framebuffer::FrameBuffer;

    pub fn count(
        fb: &FrameBuffer,
        color: Color,
    ) -> usize {
        fb.pixels().iter().filter(|&&c| c == color).count()
    }

    #[test]
    fn test_region_union_is_monotonic() {
        let a = Region::new(0, 0, 10, 10);
        let b = Region::new(20, 5, 5, 5);
        let u = Region::EMPTY.union(&a).union(&b);
        assert_eq!(u, Region { x1: 0, y1: 0, x2: 25, y2: 10 });
        assert_eq!(u.union(&a), u, "Union is idempotent");
        assert_eq!(a.union(&b), b.union(&a), "Union is commutative");
        assert_eq!(u.union(&Region::EMPTY), u);
    }

    #[test]
    fn test_region_intersect_and_touch() {
        let a = Region::new(0, 0, 10, 10);
        assert!(a.intersect(&Region::new(10, 0, 5, 5)).is_empty());
        assert!(a.touches(&Region::new(10, 0, 5, 5)), "Adjacent regions touch");
        assert!(!a.touches(&Region::new(11, 0, 5, 5)));
        assert!(!a.touches(&Region::EMPTY));
        assert_eq!(a.intersect(&Region::new(5, 5, 10, 10)), Region::new(5, 5, 5, 5));
    }

    #[test]
    fn test_set_pixel_respects_clip() {
        let mut fb = FrameBuffer::new(10, 10);
        let mut canvas = Canvas::new(&mut fb, Region::new(2, 2, 3, 3));
        canvas.set_pixel(1, 2, WHITE);
        canvas.set_pixel(5, 2, WHITE);
        canvas.set_pixel(4, 4, WHITE);
        assert_eq!(count(&fb, WHITE), 1);
        assert_eq!(fb.pixel(4, 4), Some(WHITE));
    }

    #[test]
    fn test_fill_rect_clips_each_edge() {
        let mut fb = FrameBuffer::new(20, 20);
        let mut canvas = Canvas::new(&mut fb, Region::new(5, 5, 10, 10));
        canvas.fill_rect(0, 0, 20, 20, RED);
        assert_eq!(count(&fb, RED), 100);
        let mut canvas = Canvas::new(&mut fb, Region::new(5, 5, 10, 10));
        canvas.fill_rect(0, 0, 0, 20, WHITE);
        canvas.fill_rect(0, 0, 20, -1, WHITE);
        canvas.fill_rect(0, 0, 20, 20, TRANSPARENT);
        assert_eq!(count(&fb, RED), 100, "Zero size and transparent fills are no-ops");
    }

    #[test]
    fn test_layer_translation() {
        let mut fb = FrameBuffer::new(10, 10);
        let layer = Layer {
            width: 10,
            height: 10,
            x_offset: 100,
            y_offset: 50,
        };
        let mut canvas = Canvas::new(&mut fb, Region::new(100, 50, 10, 10)).with_layer(layer);
        canvas.set_pixel(101, 52, WHITE);
        assert_eq!(fb.pixel(1, 2), Some(WHITE));
    }

    #[test]
    fn test_line_fast_paths_and_diagonal() {
        let mut fb = FrameBuffer::new(10, 10);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 10, 10));
        canvas.line(2, 1, 2, 5, WHITE);
        assert_eq!(count(&fb, WHITE), 5, "Vertical line includes both ends");
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 10, 10));
        canvas.line(0, 0, 4, 4, RED);
        for i in 0..5 {
            assert_eq!(fb.pixel(i, i), Some(RED));
        }
    }

    #[test]
    fn test_line_clipped() {
        let mut fb = FrameBuffer::new(10, 10);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 5, 5));
        canvas.line(0, 0, 9, 3, WHITE);
        assert!(fb.pixels().iter().enumerate().all(|(i, &c)| c != WHITE || i % 10 < 5));
    }

    #[test]
    fn test_rect_outline() {
        let mut fb = FrameBuffer::new(10, 10);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 10, 10));
        canvas.rect(1, 1, 4, 3, WHITE);
        assert_eq!(count(&fb, WHITE), 10);
        assert_eq!(fb.pixel(2, 2), Some(crate::colors::BLACK));
    }

    #[test]
    fn test_rect_3d_bevel_colors() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.clear_buffer(WHITE);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 10, 10));
        canvas.rect_3d(0, 0, 6, 6, Bevel::Raised);
        assert_eq!(fb.pixel(0, 0), Some(BLACK));
        assert_eq!(fb.pixel(1, 1), Some(BEVEL_LIGHT));
        assert_eq!(fb.pixel(4, 4), Some(BEVEL_DARK));
    }
}
