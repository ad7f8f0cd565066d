//! Rounded rectangles, circles, triangles and polygons.

use bitflags::bitflags;
use embedded_graphics::prelude::Point;

use super::{Canvas, Region};
use crate::colors::Color;

bitflags! {
    /// Circle quadrants for [`Canvas::circle_corner`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Corners: u8 {
        const TOP_LEFT = 0x01;
        const TOP_RIGHT = 0x02;
        const BOTTOM_LEFT = 0x04;
        const BOTTOM_RIGHT = 0x08;
    }
}

/// Midpoint circle stepper over one octant.
///
/// Yields `(x, y)` offsets with `x` growing from 1; callers mirror them into
/// the quadrants they need.
struct Octant {
    f: i32,
    dd_x: i32,
    dd_y: i32,
    x: i32,
    y: i32,
}

impl Octant {
    const fn new(r: i32) -> Self {
        Self {
            f: 1 - r,
            dd_x: 1,
            dd_y: -2 * r,
            x: 0,
            y: r,
        }
    }
}

impl Iterator for Octant {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.y {
            return None;
        }
        if self.f >= 0 {
            self.y -= 1;
            self.dd_y += 2;
            self.f += self.dd_y;
        }
        self.x += 1;
        self.dd_x += 2;
        self.f += self.dd_x;
        Some((self.x, self.y))
    }
}

/// Largest usable corner radius for a `width` x `height` box.
fn clamp_radius(
    width: i32,
    height: i32,
    mut r: i32,
) -> i32 {
    if r >= height / 2 {
        r = height / 2 - 1;
    }
    if r >= width / 2 {
        r = width / 2 - 1;
    }
    r.max(0)
}

impl Canvas<'_> {
    /// Outline arcs of the selected quadrants around (`x0`, `y0`).
    pub fn circle_corner(
        &mut self,
        x0: i32,
        y0: i32,
        r: i32,
        corners: Corners,
        color: Color,
    ) {
        let bounds = Region { x1: x0 - r, y1: y0 - r, x2: x0 + r, y2: y0 + r };
        if r <= 0 || !bounds.touches(&self.clip) {
            return;
        }
        for (x, y) in Octant::new(r) {
            if corners.contains(Corners::TOP_LEFT) {
                self.set_pixel(x0 - y, y0 - x, color);
                self.set_pixel(x0 - x, y0 - y, color);
            }
            if corners.contains(Corners::TOP_RIGHT) {
                self.set_pixel(x0 + x, y0 - y, color);
                self.set_pixel(x0 + y, y0 - x, color);
            }
            if corners.contains(Corners::BOTTOM_RIGHT) {
                self.set_pixel(x0 + x, y0 + y, color);
                self.set_pixel(x0 + y, y0 + x, color);
            }
            if corners.contains(Corners::BOTTOM_LEFT) {
                self.set_pixel(x0 - x, y0 + y, color);
                self.set_pixel(x0 - y, y0 + x, color);
            }
        }
    }

    /// Filled quadrants around (`x0`, `y0`), drawn as horizontal spans.
    pub fn filled_circle_corner(
        &mut self,
        x0: i32,
        y0: i32,
        r: i32,
        corners: Corners,
        color: Color,
    ) {
        let bounds = Region { x1: x0 - r, y1: y0 - r, x2: x0 + r, y2: y0 + r };
        if r <= 0 || !bounds.touches(&self.clip) {
            return;
        }
        for (x, y) in Octant::new(r) {
            if corners.contains(Corners::TOP_LEFT) {
                self.hline(x0 - x, y0 - y, x, color);
                self.hline(x0 - y, y0 - x, y, color);
            }
            if corners.contains(Corners::TOP_RIGHT) {
                self.hline(x0, y0 - y, x, color);
                self.hline(x0, y0 - x, y, color);
            }
            if corners.contains(Corners::BOTTOM_LEFT) {
                self.hline(x0 - y, y0 + x, y, color);
                self.hline(x0 - x, y0 + y, x, color);
            }
            if corners.contains(Corners::BOTTOM_RIGHT) {
                self.hline(x0, y0 + x, y, color);
                self.hline(x0, y0 + y, x, color);
            }
        }
    }

    pub fn circle(
        &mut self,
        x: i32,
        y: i32,
        r: i32,
        color: Color,
    ) {
        self.circle_corner(x, y, r, Corners::TOP_LEFT, color);
        self.circle_corner(x - 1, y, r, Corners::TOP_RIGHT, color);
        self.circle_corner(x, y - 1, r, Corners::BOTTOM_LEFT, color);
        self.circle_corner(x - 1, y - 1, r, Corners::BOTTOM_RIGHT, color);
    }

    pub fn filled_circle(
        &mut self,
        x: i32,
        y: i32,
        r: i32,
        color: Color,
    ) {
        self.filled_circle_corner(x, y, r, Corners::TOP_LEFT | Corners::TOP_RIGHT, color);
        self.filled_circle_corner(x, y - 1, r, Corners::BOTTOM_LEFT | Corners::BOTTOM_RIGHT, color);
    }

    /// Rectangle outline with rounded corners. `r` is clamped to fit.
    pub fn rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        r: i32,
        color: Color,
    ) {
        let r = clamp_radius(width, height, r);
        if r == 0 {
            self.rect(x, y, width, height, color);
            return;
        }
        self.hline(x + r, y, width - 2 * r, color);
        self.vline(x + width - 1, y + r, height - 2 * r, color);
        self.hline(x + r, y + height - 1, width - 2 * r, color);
        self.vline(x, y + r, height - 2 * r, color);

        let (right, bottom) = (x + width - r - 1, y + height - r - 1);
        self.circle_corner(x + r, y + r, r, Corners::TOP_LEFT, color);
        self.circle_corner(right, y + r, r, Corners::TOP_RIGHT, color);
        self.circle_corner(x + r, bottom, r, Corners::BOTTOM_LEFT, color);
        self.circle_corner(right, bottom, r, Corners::BOTTOM_RIGHT, color);
    }

    /// Filled rectangle with rounded corners. `r` is clamped to fit.
    pub fn filled_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        r: i32,
        color: Color,
    ) {
        let r = clamp_radius(width, height, r);
        if r == 0 {
            self.fill_rect(x, y, width, height, color);
            return;
        }
        self.fill_rect(x + r, y, width - 2 * r, height, color);
        self.fill_rect(x, y + r, r, height - 2 * r, color);
        self.fill_rect(x + width - r, y + r, r, height - 2 * r, color);

        let (right, bottom) = (x + width - r - 1, y + height - r - 1);
        self.filled_circle_corner(x + r, y + r, r, Corners::TOP_LEFT, color);
        self.filled_circle_corner(right, y + r, r, Corners::TOP_RIGHT, color);
        self.filled_circle_corner(x + r, bottom, r, Corners::BOTTOM_LEFT, color);
        self.filled_circle_corner(right, bottom, r, Corners::BOTTOM_RIGHT, color);
    }

    pub fn triangle(
        &mut self,
        p1: Point,
        p2: Point,
        p3: Point,
        color: Color,
    ) {
        self.line(p1.x, p1.y, p2.x, p2.y, color);
        self.line(p1.x, p1.y, p3.x, p3.y, color);
        self.line(p2.x, p2.y, p3.x, p3.y, color);
    }

    /// Filled triangle: walks the `p1`-`p2` edge and draws a line from every
    /// point on it to `p3`.
    pub fn filled_triangle(
        &mut self,
        p1: Point,
        p2: Point,
        p3: Point,
        color: Color,
    ) {
        let dx = (p2.x - p1.x).abs();
        let dy = (p2.y - p1.y).abs();
        let sx = if p2.x >= p1.x { 1 } else { -1 };
        let sy = if p2.y >= p1.y { 1 } else { -1 };
        let (den, add, pixels, major, minor) = if dx >= dy {
            (dx, dy, dx, (sx, 0), (0, sy))
        } else {
            (dy, dx, dy, (0, sy), (sx, 0))
        };

        let mut num = den / 2;
        let (mut x, mut y) = (p1.x, p1.y);
        for _ in 0..=pixels {
            self.line(x, y, p3.x, p3.y, color);
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

    /// Closed polygon through `points`. Fewer than two points draw nothing.
    pub fn poly(
        &mut self,
        points: &[Point],
        color: Color,
    ) {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return;
        };
        if points.len() < 2 {
            return;
        }
        self.line(first.x, first.y, last.x, last.y, color);
        for pair in points.windows(2) {
            self.line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, RED, WHITE};
    use crate::draw::tests::count;
    use crate::ll::framebuffer::FrameBuffer;

    #[test]
    fn test_radius_clamped() {
        assert_eq!(clamp_radius(10, 10, 20), 4);
        assert_eq!(clamp_radius(20, 6, 5), 2);
        assert_eq!(clamp_radius(2, 2, 5), 0);
    }

    #[test]
    fn test_circle_corner_stays_in_quadrant() {
        let mut fb = FrameBuffer::new(20, 20);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 20, 20));
        canvas.circle_corner(10, 10, 5, Corners::TOP_LEFT, WHITE);
        assert!(count(&fb, WHITE) > 0);
        for (i, c) in fb.pixels().iter().enumerate() {
            if *c == WHITE {
                let (x, y) = ((i % 20) as i32, (i / 20) as i32);
                assert!(x <= 10 && y <= 10, "Pixel ({x}, {y}) outside top-left quadrant");
            }
        }
    }

    #[test]
    fn test_circle_corner_outside_clip_is_skipped() {
        let mut fb = FrameBuffer::new(20, 20);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 5, 5));
        canvas.circle_corner(15, 15, 3, Corners::all(), WHITE);
        assert_eq!(count(&fb, WHITE), 0);
    }

    #[test]
    fn test_filled_circle_is_symmetric() {
        let mut fb = FrameBuffer::new(21, 21);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 21, 21));
        canvas.filled_circle(10, 10, 6, RED);
        assert_eq!(fb.pixel(10, 6), Some(RED));
        assert_eq!(fb.pixel(7, 8), Some(RED));
        assert_eq!(fb.pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn test_rounded_rect_corners_empty() {
        let mut fb = FrameBuffer::new(20, 20);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 20, 20));
        canvas.filled_rounded_rect(0, 0, 20, 20, 5, WHITE);
        assert_eq!(fb.pixel(0, 0), Some(BLACK), "Corner pixel is cut off");
        assert_eq!(fb.pixel(10, 0), Some(WHITE));
        assert_eq!(fb.pixel(10, 10), Some(WHITE));
    }

    #[test]
    fn test_rounded_rect_zero_radius_is_rect() {
        let mut a = FrameBuffer::new(10, 10);
        let mut b = FrameBuffer::new(10, 10);
        Canvas::new(&mut a, Region::new(0, 0, 10, 10)).rounded_rect(1, 1, 6, 6, 0, WHITE);
        Canvas::new(&mut b, Region::new(0, 0, 10, 10)).rect(1, 1, 6, 6, WHITE);
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_filled_triangle_covers_vertices() {
        let mut fb = FrameBuffer::new(20, 20);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 20, 20));
        let (a, b, c) = (Point::new(1, 1), Point::new(15, 3), Point::new(5, 15));
        canvas.filled_triangle(a, b, c, WHITE);
        for p in [a, b, c] {
            assert_eq!(fb.pixel(p.x, p.y), Some(WHITE));
        }
        assert_eq!(fb.pixel(6, 11), Some(WHITE), "Interior is filled");
    }

    #[test]
    fn test_poly_closes_and_ignores_short_input() {
        let mut fb = FrameBuffer::new(10, 10);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 10, 10));
        canvas.poly(&[Point::new(1, 1)], WHITE);
        assert_eq!(count(&fb, WHITE), 0);
        let mut canvas = Canvas::new(&mut fb, Region::new(0, 0, 10, 10));
        canvas.poly(&[Point::new(1, 1), Point::new(5, 1), Point::new(5, 5)], WHITE);
        assert_eq!(fb.pixel(3, 3), Some(WHITE), "Closing edge drawn");
    }
}
