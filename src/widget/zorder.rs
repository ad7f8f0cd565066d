//! Sibling ordering.
//!
//! Ordering rules, applied one adjacent swap at a time:
//!
//! - dialog-base widgets sort after every other sibling;
//! - children-allowing widgets never pass a dialog-base widget and sort by
//!   z-index among themselves;
//! - plain widgets never pass a children-allowing widget toward the end and
//!   sort by z-index among themselves, so containers paint over plain
//!   siblings.
//!
//! Moving stops at the first position that already satisfies the rules, so the
//! list must be ordered before the move. Ties keep insertion order because
//! [`Gui::widget_add`] moves a new widget to the top first and then back down.

use super::{WidgetFlags, WidgetHandle};
use crate::Gui;
use crate::linkedlist;

impl Gui {
    #[inline]
    fn zindex_of(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        self.widgets.get(h).map_or(0, |w| w.zindex)
    }

    pub fn zindex(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        self.zindex_of(h)
    }

    /// Swap with the next sibling.
    fn swap_down(
        &mut self,
        h: WidgetHandle,
    ) -> bool {
        let parent = self.parent(h);
        self.with_list(parent, |nodes, root| linkedlist::move_down(nodes, root, h))
    }

    /// Swap with the previous sibling.
    fn swap_up(
        &mut self,
        h: WidgetHandle,
    ) -> bool {
        let parent = self.parent(h);
        self.with_list(parent, |nodes, root| linkedlist::move_up(nodes, root, h))
    }

    /// Move `h` toward the end of its list as far as the ordering allows.
    ///
    /// Returns `true` when at least one swap happened.
    pub fn move_to_bottom(
        &mut self,
        h: WidgetHandle,
    ) -> bool {
        let dialog = self.is_dialog_base(h);
        let children = self.allows_children(h);
        let z = self.zindex_of(h);
        let mut moved = false;
        while let Some(next) = self.next_sibling(h) {
            let allowed = if dialog {
                true
            } else if children {
                !self.is_dialog_base(next) && z >= self.zindex_of(next)
            } else {
                !self.allows_children(next) && z >= self.zindex_of(next)
            };
            if !allowed || !self.swap_down(h) {
                break;
            }
            moved = true;
        }
        moved
    }

    /// Move `h` toward the start of its list as far as the ordering allows.
    ///
    /// Returns `true` when at least one swap happened.
    pub fn move_to_top(
        &mut self,
        h: WidgetHandle,
    ) -> bool {
        let dialog = self.is_dialog_base(h);
        let children = self.allows_children(h);
        let z = self.zindex_of(h);
        let mut moved = false;
        while let Some(prev) = self.prev_sibling(h) {
            let allowed = if dialog {
                self.is_dialog_base(prev)
            } else if children {
                self.allows_children(prev) && z <= self.zindex_of(prev)
            } else {
                z <= self.zindex_of(prev)
            };
            if !allowed || !self.swap_up(h) {
                break;
            }
            moved = true;
        }
        moved
    }

    /// Append `h` to the children of `parent` and sort it into place.
    pub(crate) fn widget_add(
        &mut self,
        parent: Option<WidgetHandle>,
        h: WidgetHandle,
    ) {
        self.with_list(parent, |nodes, root| linkedlist::add(nodes, root, h));
        self.move_to_top(h);
        self.move_to_bottom(h);
    }

    /// Unlink `h` from its parent's children list.
    pub(crate) fn widget_unlink(
        &mut self,
        h: WidgetHandle,
    ) {
        let parent = self.parent(h);
        self.with_list(parent, |nodes, root| linkedlist::remove(nodes, root, h));
    }

    /// Set the z-index and re-sort among siblings.
    pub fn set_zindex(
        &mut self,
        h: WidgetHandle,
        zindex: i32,
    ) {
        let Some(w) = self.widgets.get_mut(h) else {
            return;
        };
        let old = w.zindex;
        if old == zindex {
            return;
        }
        w.zindex = zindex;
        let moved = if zindex < old { self.move_to_top(h) } else { self.move_to_bottom(h) };
        if moved {
            self.invalidate(h);
        }
    }

    /// Move `h` and every ancestor as far to the front as ordering allows.
    ///
    /// Returns `true` when anything moved.
    pub fn move_down_tree(
        &mut self,
        h: WidgetHandle,
    ) -> bool {
        let mut moved = false;
        let mut node = Some(h);
        while let Some(n) = node {
            if self.move_to_bottom(n) {
                self.invalidate(n);
                moved = true;
            }
            node = self.parent(n);
        }
        moved
    }

    /// Bring `h` in front of its siblings (and its ancestors in front of theirs).
    pub fn put_on_front(
        &mut self,
        h: WidgetHandle,
    ) -> bool {
        if self.has_flag(h, WidgetFlags::HIDDEN) {
            return false;
        }
        self.move_down_tree(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::tests::{gui, plain, window};
    use crate::widget::window::WINDOW;

    fn order(
        gui: &Gui,
        parent: Option<WidgetHandle>,
    ) -> Vec<WidgetHandle> {
        gui.children(parent).collect()
    }

    #[test]
    fn test_equal_zindex_keeps_insertion_order() {
        let mut gui = gui();
        let desk = gui.desktop();
        let a = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        let b = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        let c = gui
            .create_widget(&crate::widget::tests::PLAIN, 3, 0.0, 0.0, 5.0, 5.0, desk, None, WidgetFlags::empty())
            .unwrap_or_else(|e| panic!("{e}"));
        gui.set_zindex(c, 5);
        assert_eq!(order(&gui, desk), [a, b, c]);
    }

    #[test]
    fn test_higher_zindex_added_later_sorts_after() {
        let mut gui = gui();
        let desk = gui.desktop();
        let a = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        let b = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        gui.set_zindex(a, 5);
        assert_eq!(order(&gui, desk), [b, a], "Raised z-index moves toward the end");
        let c = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        assert_eq!(order(&gui, desk), [b, c, a], "New widget with lower z-index sorts below");
        gui.set_zindex(a, -1);
        assert_eq!(order(&gui, desk), [a, b, c]);
    }

    #[test]
    fn test_move_on_ordered_list_is_noop() {
        let mut gui = gui();
        let desk = gui.desktop();
        let a = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        let b = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        let c = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        gui.set_zindex(b, 1);
        gui.set_zindex(c, 2);
        let before = order(&gui, desk);
        for h in [a, b, c] {
            assert!(!gui.move_to_top(h), "No swap toward the start");
            assert!(!gui.move_to_bottom(h), "No swap toward the end");
        }
        assert_eq!(order(&gui, desk), before);
    }

    #[test]
    fn test_containers_paint_over_plain_widgets() {
        let mut gui = gui();
        let desk = gui.desktop();
        let win = window(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        let label = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        assert_eq!(order(&gui, desk), [label, win], "Plain widget never passes a container downwards");
        gui.set_zindex(label, 1);
        assert_eq!(order(&gui, desk), [label, win]);
    }

    #[test]
    fn test_dialog_stays_last() {
        let mut gui = gui();
        let desk = gui.desktop();
        let dialog = gui
            .create_widget(&WINDOW, 9, 0.0, 0.0, 5.0, 5.0, None, None, WidgetFlags::DIALOG_BASE)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(gui.parent(dialog), desk, "Dialogs live on the desktop");
        let win = window(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        gui.set_zindex(win, 100);
        let label = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        gui.set_zindex(label, 100);
        assert_eq!(order(&gui, desk).last(), Some(&dialog));
    }

    #[test]
    fn test_move_down_tree_raises_ancestors() {
        let mut gui = gui();
        let desk = gui.desktop();
        let first = window(&mut gui, desk, 0.0, 0.0, 20.0, 20.0);
        let inner = plain(&mut gui, Some(first), 0.0, 0.0, 5.0, 5.0);
        let second = window(&mut gui, desk, 0.0, 0.0, 20.0, 20.0);
        assert_eq!(order(&gui, desk), [first, second]);
        assert!(gui.put_on_front(inner));
        assert_eq!(order(&gui, desk), [second, first]);
    }
}
