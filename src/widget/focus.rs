//! Focus chain and active widget.
//!
//! The focused widget and each of its ancestors up to (not including) the
//! desktop carry [`WidgetFlags::FOCUS`]. Moving focus only touches the part of
//! the chain below the common ancestor of the old and new widget.

use super::{Event, WidgetFlags, WidgetHandle};
use crate::Gui;

impl Gui {
    #[inline]
    pub fn focused(&self) -> Option<WidgetHandle> { self.focused }

    #[inline]
    pub fn focused_prev(&self) -> Option<WidgetHandle> { self.focused_prev }

    #[inline]
    pub fn active(&self) -> Option<WidgetHandle> { self.active }

    #[inline]
    pub fn active_prev(&self) -> Option<WidgetHandle> { self.active_prev }

    /// `h` followed by its ancestors.
    fn chain(
        &self,
        h: WidgetHandle,
    ) -> impl Iterator<Item = WidgetHandle> + '_ {
        core::iter::successors(Some(h), move |&p| self.parent(p))
    }

    /// Nearest widget that is `a` or an ancestor of it and also `b` or an ancestor of `b`.
    pub fn common_parent(
        &self,
        a: WidgetHandle,
        b: WidgetHandle,
    ) -> Option<WidgetHandle> {
        self.chain(a).find(|&x| self.chain(b).any(|y| y == x))
    }

    /// Clear one focus flag and notify the widget.
    fn drop_focus(
        &mut self,
        h: WidgetHandle,
    ) {
        self.clear_flag(h, WidgetFlags::FOCUS);
        self.callback(h, &Event::FocusOut);
        self.invalidate(h);
    }

    /// Remove focus from the whole chain.
    pub fn focus_clear(&mut self) {
        let desktop = self.desktop();
        let mut node = self.focused;
        while let Some(h) = node {
            if Some(h) == desktop {
                break;
            }
            self.drop_focus(h);
            node = self.parent(h);
        }
        if self.focused.is_some() {
            self.focused_prev = self.focused;
        }
        self.focused = None;
    }

    /// Move focus to `h`; `None` clears it.
    pub fn focus_set(
        &mut self,
        h: Option<WidgetHandle>,
    ) {
        let Some(h) = h.filter(|&h| self.contains(h)) else {
            self.focus_clear();
            return;
        };
        if self.focused == Some(h) {
            return;
        }
        let common = self
            .focused
            .and_then(|old| self.common_parent(old, h))
            .or(self.desktop());

        let mut node = self.focused;
        while let Some(old) = node {
            if Some(old) == common {
                break;
            }
            self.drop_focus(old);
            node = self.parent(old);
        }

        self.focused_prev = self.focused;
        self.focused = Some(h);

        let desktop = self.desktop();
        let mut node = Some(h);
        while let Some(n) = node {
            if Some(n) == common || Some(n) == desktop {
                break;
            }
            self.set_flag(n, WidgetFlags::FOCUS);
            self.callback(n, &Event::FocusIn);
            self.invalidate(n);
            node = self.parent(n);
        }
    }

    /// Release the active widget.
    pub fn active_clear(&mut self) {
        if let Some(h) = self.active.take() {
            self.callback(h, &Event::ActiveOut);
            self.clear_flag(h, WidgetFlags::ACTIVE | WidgetFlags::TOUCH_MOVE);
            self.active_prev = Some(h);
        }
    }

    /// Make `h` the active widget; `None` clears it.
    pub fn active_set(
        &mut self,
        h: Option<WidgetHandle>,
    ) {
        self.active_clear();
        if let Some(h) = h.filter(|&h| self.contains(h)) {
            self.active = Some(h);
            self.set_flag(h, WidgetFlags::ACTIVE);
            self.callback(h, &Event::ActiveIn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::tests::{gui, plain, window};
    use crate::widget::window::WINDOW;

    fn has_focus(
        gui: &Gui,
        h: WidgetHandle,
    ) -> bool {
        gui.has_flag(h, WidgetFlags::FOCUS)
    }

    #[test]
    fn test_focus_marks_chain_below_desktop() {
        let mut gui = gui();
        let desk = gui.desktop();
        let win = window(&mut gui, desk, 0.0, 0.0, 50.0, 50.0);
        let child = plain(&mut gui, Some(win), 0.0, 0.0, 5.0, 5.0);
        gui.focus_set(Some(child));
        assert!(has_focus(&gui, child) && has_focus(&gui, win));
        assert!(!desk.is_some_and(|d| has_focus(&gui, d)), "Desktop never carries focus");

        gui.focus_clear();
        assert_eq!(gui.focused(), None);
        assert_eq!(gui.focused_prev(), Some(child));
        assert!(!has_focus(&gui, child) && !has_focus(&gui, win));
    }

    #[test]
    fn test_sibling_focus_keeps_common_parent() {
        let mut gui = gui();
        let desk = gui.desktop();
        let win = window(&mut gui, desk, 0.0, 0.0, 50.0, 50.0);
        let a = plain(&mut gui, Some(win), 0.0, 0.0, 5.0, 5.0);
        let b = plain(&mut gui, Some(win), 10.0, 0.0, 5.0, 5.0);
        assert_eq!(gui.common_parent(a, b), Some(win));
        gui.focus_set(Some(a));
        gui.focus_set(Some(b));
        assert!(!has_focus(&gui, a));
        assert!(has_focus(&gui, b) && has_focus(&gui, win));
        assert_eq!(gui.focused_prev(), Some(a));
    }

    #[test]
    fn test_nested_dialog_takes_and_returns_focus() {
        let mut gui = gui();
        let first = gui
            .create_widget(&WINDOW, 1, 0.0, 0.0, 60.0, 60.0, None, None, WidgetFlags::DIALOG_BASE)
            .unwrap_or_else(|e| panic!("{e}"));
        let button = plain(&mut gui, Some(first), 0.0, 0.0, 10.0, 10.0);
        gui.focus_set(Some(button));

        let second = gui
            .create_widget(&WINDOW, 2, 10.0, 10.0, 30.0, 30.0, Some(button), None, WidgetFlags::DIALOG_BASE)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(gui.parent(second), gui.desktop(), "Dialog created on the desktop");
        let inner = plain(&mut gui, Some(second), 0.0, 0.0, 10.0, 10.0);
        gui.focus_set(Some(inner));
        assert!(has_focus(&gui, inner) && has_focus(&gui, second));
        assert!(!has_focus(&gui, button) && !has_focus(&gui, first), "Old chain released");

        gui.remove(second).unwrap_or_else(|e| panic!("{e}"));
        gui.sweep();
        assert_eq!(gui.focused(), gui.desktop(), "Focus falls back once the dialog is gone");
        gui.focus_set(Some(button));
        assert!(has_focus(&gui, button) && has_focus(&gui, first));
    }

    #[test]
    fn test_active_set_and_clear() {
        let mut gui = gui();
        let desk = gui.desktop();
        let a = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        let b = plain(&mut gui, desk, 10.0, 0.0, 5.0, 5.0);
        gui.active_set(Some(a));
        gui.set_flag(a, WidgetFlags::TOUCH_MOVE);
        gui.active_set(Some(b));
        assert!(!gui.has_flag(a, WidgetFlags::ACTIVE | WidgetFlags::TOUCH_MOVE));
        assert!(gui.has_flag(b, WidgetFlags::ACTIVE));
        assert_eq!(gui.active_prev(), Some(a));
        gui.active_clear();
        assert_eq!(gui.active(), None);
    }
}
