//! Bitmap blits.

use super::{Canvas, Region};
use crate::ll::{Image, ImageFormat};

impl Canvas<'_> {
    /// Draw `image` with its top-left corner at (`x`, `y`).
    ///
    /// The image is clipped on every edge; the driver only receives the
    /// visible part together with its offset inside the source image.
    pub fn image(
        &mut self,
        x: i32,
        y: i32,
        image: &Image<'_>,
    ) {
        let rect = Region::new(x, y, image.width, image.height);
        let vis = rect.intersect(&self.clip);
        if vis.is_empty() {
            return;
        }
        let (dx, dy) = (vis.x1 - self.layer.x_offset, vis.y1 - self.layer.y_offset);
        let (sx, sy) = (vis.x1 - x, vis.y1 - y);
        let (w, h) = (vis.width(), vis.height());
        match image.format {
            ImageFormat::Rgb565 => self.ll.draw_image16(dx, dy, image, sx, sy, w, h),
            ImageFormat::Rgb888 => self.ll.draw_image24(dx, dy, image, sx, sy, w, h),
            ImageFormat::Argb8888 => self.ll.draw_image32(dx, dy, image, sx, sy, w, h),
        }
    }
}
