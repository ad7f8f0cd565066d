//! Scrollbar part shared by list-like widgets.

use super::{Bevel, Canvas};
use crate::colors::WIN_MIDDLEGRAY;
use crate::config::SCROLLBAR_MIN_THUMB;

/// Vertical scrollbar geometry and scroll state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scrollbar {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub entries_total: i32,
    pub entries_visible: i32,
    /// Index of the first visible entry.
    pub entries_top: i32,
}

impl Scrollbar {
    /// Height of the up/down arrow buttons.
    #[inline]
    pub const fn button_height(&self) -> i32 { self.width * 2 / 3 }

    /// Thumb offset from the track top and thumb height.
    pub fn thumb(&self) -> (i32, i32) {
        let track = self.height - 2 * self.button_height();
        if self.entries_visible < self.entries_total {
            let hidden = self.entries_total - self.entries_visible;
            let size = (track * self.entries_visible / self.entries_total).max(SCROLLBAR_MIN_THUMB).min(track);
            let offset = (track - size) * self.entries_top.clamp(0, hidden) / hidden;
            (offset, size)
        } else {
            (0, track)
        }
    }
}

impl Canvas<'_> {
    /// Draw arrows, track and thumb of `sb`.
    pub fn scrollbar(
        &mut self,
        sb: &Scrollbar,
    ) {
        let btn = sb.button_height();

        self.rect_3d(sb.x, sb.y, sb.width, btn, Bevel::Raised);
        self.fill_rect(sb.x + 2, sb.y + 2, sb.width - 4, btn - 4, WIN_MIDDLEGRAY);

        let bottom = sb.y + sb.height - btn;
        self.rect_3d(sb.x, bottom, sb.width, btn, Bevel::Raised);
        self.fill_rect(sb.x + 2, bottom + 2, sb.width - 4, btn - 4, WIN_MIDDLEGRAY);

        self.fill_rect(sb.x, sb.y + btn, sb.width, sb.height - 2 * btn, WIN_MIDDLEGRAY);

        let (offset, size) = sb.thumb();
        self.rect_3d(sb.x, sb.y + btn + offset, sb.width, size, Bevel::Raised);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::BLACK;
    use crate::draw::Region;
    use crate::ll::framebuffer::FrameBuffer;

    fn bar(
        total: i32,
        visible: i32,
        top: i32,
    ) -> Scrollbar {
        Scrollbar {
            x: 0,
            y: 0,
            width: 15,
            height: 120,
            entries_total: total,
            entries_visible: visible,
            entries_top: top,
        }
    }

    #[test]
    fn test_thumb_proportional() {
        // 120 - 2 * 10 = 100 px track
        assert_eq!(bar(10, 5, 0).thumb(), (0, 50));
        assert_eq!(bar(10, 5, 5).thumb(), (50, 50));
    }

    #[test]
    fn test_thumb_minimum_size() {
        let (_, size) = bar(1000, 1, 0).thumb();
        assert_eq!(size, SCROLLBAR_MIN_THUMB);
        let (offset, _) = bar(1000, 1, 999).thumb();
        assert_eq!(offset, 100 - SCROLLBAR_MIN_THUMB, "Last entry puts the thumb at the track end");
    }

    #[test]
    fn test_thumb_stays_inside_track() {
        assert_eq!(bar(10, 5, 50).thumb(), (50, 50), "Top past the end pins the thumb to the bottom");
        assert_eq!(bar(10, 5, -3).thumb(), (0, 50));

        // 2 * 10 px buttons leave a 4 px track, shorter than the minimum thumb
        let short = Scrollbar { height: 24, ..bar(1000, 1, 500) };
        assert_eq!(short.thumb(), (0, 4));
    }

    #[test]
    fn test_thumb_fills_track_when_all_visible() {
        assert_eq!(bar(3, 5, 0).thumb(), (0, 100));
    }

    #[test]
    fn test_scrollbar_draws_track() {
        let mut fb = FrameBuffer::new(15, 120);
        Canvas::new(&mut fb, Region::new(0, 0, 15, 120)).scrollbar(&bar(10, 5, 0));
        assert_eq!(fb.pixel(7, 90), Some(WIN_MIDDLEGRAY));
        assert_eq!(fb.pixel(0, 0), Some(BLACK), "Button outline");
    }
}
