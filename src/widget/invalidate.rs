//! Invalidation: redraw flags and the pending redraw region.
//!
//! Invalidating a widget marks it for redraw and grows the pending region by
//! its visible rectangle. The region only ever grows until the redraw pass
//! consumes it. Widgets later in paint order that overlap a redrawn widget
//! are marked too, otherwise they would be painted over and show stale
//! pixels.

use super::{WidgetFlags, WidgetHandle};
use crate::Gui;

impl Gui {
    /// Core invalidation; `set_clip` grows the pending region.
    pub(crate) fn invalidate_widget(
        &mut self,
        h: WidgetHandle,
        set_clip: bool,
    ) {
        let flags = self.flags(h);
        if !self.contains(h) || flags.contains(WidgetFlags::IGNORE_INVALIDATE) {
            return;
        }
        if flags.contains(WidgetFlags::FIRST_INVALIDATE) {
            self.clear_flag(h, WidgetFlags::FIRST_INVALIDATE);
        } else if self.ancestors(h).any(|a| self.has_flag(a, WidgetFlags::HIDDEN)) {
            return;
        }

        self.set_flag(h, WidgetFlags::REDRAW);
        self.redraw_pending = true;
        if set_clip {
            let visible = self.visible_rect(h);
            self.pending = self.pending.union(&visible);
        }

        if self.is_transparent(h) {
            if let Some(p) = self.parent(h) {
                self.invalidate_widget(p, false);
            }
        }

        self.mark_covering(h);

        if let Some(p) = self.parent(h) {
            if self.next_sibling(p).is_some() {
                self.invalidate_widget(p, false);
            }
        }

        let transparent_ancestor = self.ancestors(h).find(|&a| self.is_transparent(a));
        if let Some(a) = transparent_ancestor {
            self.invalidate_widget(a, false);
        }
    }

    /// Mark later siblings overlapping a widget that will be redrawn.
    fn mark_covering(
        &mut self,
        h: WidgetHandle,
    ) {
        let mut h1 = Some(h);
        while let Some(a) = h1 {
            if self.has_flag(a, WidgetFlags::REDRAW) {
                let area = self.visible_rect(a);
                let mut h2 = self.next_sibling(a);
                while let Some(b) = h2 {
                    if !self.has_flag(b, WidgetFlags::REDRAW) && self.visible_rect(b).touches(&area) {
                        self.set_flag(b, WidgetFlags::REDRAW);
                    }
                    h2 = self.next_sibling(b);
                }
            }
            h1 = self.next_sibling(a);
        }
    }

    /// Mark `h` for redraw.
    ///
    /// The parent is invalidated as well when the widget has
    /// [`WidgetFlags::INVALIDATE_PARENT`] or is transparent.
    pub fn invalidate(
        &mut self,
        h: WidgetHandle,
    ) {
        self.invalidate_widget(h, true);
        if self.has_flag(h, WidgetFlags::INVALIDATE_PARENT) || self.is_transparent(h) {
            if let Some(p) = self.parent(h) {
                self.invalidate_widget(p, false);
            }
        }
    }

    /// Mark `h` and its parent for redraw.
    pub fn invalidate_with_parent(
        &mut self,
        h: WidgetHandle,
    ) {
        self.invalidate_widget(h, true);
        if let Some(p) = self.parent(h) {
            self.invalidate_widget(p, false);
        }
    }

    /// Invalidate the whole tree, e.g. after the display was cleared.
    pub fn invalidate_all(&mut self) {
        let mut node = self.root.first;
        while let Some(n) = node {
            self.invalidate(n);
            node = self.next_sibling(n);
        }
    }

    /// Parent chain of `h`, nearest first.
    pub fn ancestors(
        &self,
        h: WidgetHandle,
    ) -> impl Iterator<Item = WidgetHandle> + '_ {
        core::iter::successors(self.parent(h), move |&p| self.parent(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Region;
    use crate::widget::tests::{gui, plain, window};

    fn settle(gui: &mut Gui) {
        gui.pending = Region::EMPTY;
        for (_, w) in gui.widgets.iter_mut() {
            w.flags.remove(WidgetFlags::REDRAW);
        }
    }

    #[test]
    fn test_pending_region_grows_monotonically() {
        let mut gui = gui();
        let desk = gui.desktop();
        let a = plain(&mut gui, desk, 0.0, 0.0, 10.0, 10.0);
        let b = plain(&mut gui, desk, 50.0, 50.0, 10.0, 10.0);
        settle(&mut gui);

        gui.invalidate(a);
        let first = gui.pending;
        assert_eq!(first, Region::new(0, 0, 10, 10));
        gui.invalidate(b);
        let second = gui.pending;
        assert_eq!(second.union(&first), second, "Never shrinks");
        gui.invalidate(a);
        assert_eq!(gui.pending, second, "Repeated invalidation is idempotent");
    }

    #[test]
    fn test_overlapping_later_sibling_marked() {
        let mut gui = gui();
        let desk = gui.desktop();
        let below = plain(&mut gui, desk, 0.0, 0.0, 20.0, 20.0);
        let above = plain(&mut gui, desk, 10.0, 10.0, 20.0, 20.0);
        let apart = plain(&mut gui, desk, 60.0, 60.0, 5.0, 5.0);
        settle(&mut gui);

        gui.invalidate(below);
        assert!(gui.has_flag(above, WidgetFlags::REDRAW), "Covering widget repainted");
        assert!(!gui.has_flag(apart, WidgetFlags::REDRAW));

        settle(&mut gui);
        gui.invalidate(above);
        assert!(!gui.has_flag(below, WidgetFlags::REDRAW), "Widgets below are left alone");
    }

    #[test]
    fn test_hidden_ancestor_suppresses() {
        let mut gui = gui();
        let desk = gui.desktop();
        let win = window(&mut gui, desk, 0.0, 0.0, 50.0, 50.0);
        let child = plain(&mut gui, Some(win), 0.0, 0.0, 10.0, 10.0);
        gui.hide(win);
        settle(&mut gui);
        gui.invalidate(child);
        assert!(!gui.has_flag(child, WidgetFlags::REDRAW));
        assert!(gui.pending.is_empty());
    }

    #[test]
    fn test_first_invalidation_ignores_hidden_parent() {
        let mut gui = gui();
        let desk = gui.desktop();
        let win = window(&mut gui, desk, 0.0, 0.0, 50.0, 50.0);
        gui.hide(win);
        let child = plain(&mut gui, Some(win), 0.0, 0.0, 10.0, 10.0);
        assert!(gui.has_flag(child, WidgetFlags::REDRAW), "Created under a hidden parent");
    }

    #[test]
    fn test_transparent_widget_invalidates_parent() {
        let mut gui = gui();
        let desk = gui.desktop();
        let win = window(&mut gui, desk, 0.0, 0.0, 50.0, 50.0);
        let child = plain(&mut gui, Some(win), 0.0, 0.0, 10.0, 10.0);
        gui.set_alpha(child, 0x80);
        settle(&mut gui);
        gui.invalidate(child);
        assert!(gui.has_flag(win, WidgetFlags::REDRAW));
    }

    #[test]
    fn test_ignore_flag() {
        let mut gui = gui();
        let desk = gui.desktop();
        let a = plain(&mut gui, desk, 0.0, 0.0, 10.0, 10.0);
        settle(&mut gui);
        gui.set_flag(a, WidgetFlags::IGNORE_INVALIDATE);
        gui.invalidate(a);
        assert!(gui.pending.is_empty());
    }
}
