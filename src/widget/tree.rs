//! Widget lifecycle and tree queries.
//!
//! Removal is two-phase. [`Gui::remove`] only flags the widget after every
//! widget in its subtree agreed; the sweep at the start of the next
//! [`Gui::process`] call frees flagged subtrees bottom-up. A widget can
//! therefore request its own removal from inside one of its hooks.

use super::{Callback, Event, GuiId, Widget, WidgetFlags, WidgetHandle, WidgetKind};
use crate::error::{GuiError, GuiResult};
use crate::Gui;

impl Gui {
    /// Bottom widget of the top-level list, created by [`Gui::new`].
    #[inline]
    pub fn desktop(&self) -> Option<WidgetHandle> { self.root.first }

    /// Create a widget of `kind`.
    ///
    /// Dialog-base kinds and [`WidgetFlags::CREATE_PARENT_DESKTOP`] place the
    /// widget on the desktop. Otherwise `parent` is used when it allows
    /// children, else the active window.
    pub fn create_widget(
        &mut self,
        kind: &'static dyn WidgetKind,
        id: GuiId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        parent: Option<WidgetHandle>,
        callback: Option<Callback>,
        flags: WidgetFlags,
    ) -> GuiResult<WidgetHandle> {
        let keep = (flags & WidgetFlags::CREATE_KEEP) | WidgetFlags::FIRST_INVALIDATE;
        let dialog = flags.contains(WidgetFlags::DIALOG_BASE) || kind.flags().contains(super::KindFlags::DIALOG_BASE);
        let parent = if dialog || flags.contains(WidgetFlags::CREATE_PARENT_DESKTOP) {
            self.desktop()
        } else {
            parent.filter(|&p| self.allows_children(p)).or(self.window_active)
        };

        let h = self.widgets.insert(Widget::new(kind, id, parent, callback, keep));
        if !self.callback(h, &Event::PreInit).allowed() {
            self.widgets.remove(h);
            gui_debug!(self.log, "{} {} vetoed", kind.name(), id);
            return Err(GuiError::Vetoed);
        }
        if let Some(w) = self.widgets.get_mut(h) {
            w.font = self.default_font;
        }

        self.set_flag(h, WidgetFlags::IGNORE_INVALIDATE);
        self.set_size(h, width, height);
        self.set_position(h, x, y);
        self.clear_flag(h, WidgetFlags::IGNORE_INVALIDATE);
        self.refresh_geometry(h);
        self.invalidate(h);

        self.widget_add(parent, h);
        self.callback(h, &Event::Init);
        self.invalidate(h);
        if let Some(p) = parent {
            self.callback(p, &Event::ChildCreated(h));
        }
        gui_debug!(self.log, "{} {} created", kind.name(), id);
        Ok(h)
    }

    /// Whether `h` and its whole subtree accept removal.
    fn can_remove(
        &mut self,
        h: WidgetHandle,
    ) -> bool {
        if self.desktop() == Some(h) {
            return false;
        }
        if !self.callback(h, &Event::Remove).allowed() {
            return false;
        }
        let mut child = self.list_root(Some(h)).first;
        while let Some(c) = child {
            if !self.can_remove(c) {
                return false;
            }
            child = self.next_sibling(c);
        }
        true
    }

    /// Flag `h` and its children for removal on the next sweep.
    pub fn remove(
        &mut self,
        h: WidgetHandle,
    ) -> GuiResult<()> {
        if !self.contains(h) {
            return Err(GuiError::InvalidHandle);
        }
        if !self.can_remove(h) {
            gui_warn!(self.log, "remove of {} refused", self.id(h).unwrap_or_default());
            return Err(GuiError::RemoveRefused);
        }
        self.set_flag(h, WidgetFlags::REMOVE);
        self.remove_pending = true;
        if self.has_flag(h, WidgetFlags::FOCUS) {
            let parent = self.parent(h);
            self.focus_set(parent);
        }
        Ok(())
    }

    /// Free every flagged subtree. Returns the number of freed widgets.
    pub(crate) fn sweep(&mut self) -> usize {
        if !self.remove_pending {
            return 0;
        }
        self.remove_pending = false;
        self.sweep_list(None)
    }

    fn sweep_list(
        &mut self,
        parent: Option<WidgetHandle>,
    ) -> usize {
        let mut freed = 0;
        let mut node = self.list_root(parent).first;
        while let Some(h) = node {
            node = self.next_sibling(h);
            if self.has_flag(h, WidgetFlags::REMOVE) {
                let mut child = self.list_root(Some(h)).first;
                while let Some(c) = child {
                    self.set_flag(c, WidgetFlags::REMOVE);
                    child = self.next_sibling(c);
                }
                freed += self.sweep_list(Some(h));
                self.free_widget(h);
                freed += 1;
            } else if self.allows_children(h) {
                freed += self.sweep_list(Some(h));
            }
        }
        freed
    }

    /// Repair references to `h`, then release it and its resources.
    fn free_widget(
        &mut self,
        h: WidgetHandle,
    ) {
        let parent = self.parent(h);
        if self.focused == Some(h) {
            if parent.is_some() {
                self.focused = parent;
            } else {
                self.focus_clear();
                self.focused = None;
            }
        }
        if self.focused_prev == Some(h) {
            self.focused_prev = None;
        }
        if self.active == Some(h) {
            self.active = None;
        }
        if self.active_prev == Some(h) {
            self.active_prev = parent;
        }
        if self.window_active == Some(h) {
            self.window_active = parent;
        }

        self.invalidate_with_parent(h);
        if let Some(timer) = self.widgets.get_mut(h).and_then(|w| w.timer.take()) {
            self.timers.remove(timer);
        }
        self.widget_unlink(h);
        if let Some(w) = self.widgets.remove(h) {
            gui_debug!(self.log, "{} {} removed", w.kind.name(), w.id);
        }
    }

    /// First widget with `id`, searching the whole tree depth-first.
    pub fn get_by_id(
        &self,
        id: GuiId,
    ) -> Option<WidgetHandle> {
        self.find_id(None, id)
    }

    fn find_id(
        &self,
        parent: Option<WidgetHandle>,
        id: GuiId,
    ) -> Option<WidgetHandle> {
        for h in self.children(parent) {
            if self.id(h) == Some(id) {
                return Some(h);
            }
            if self.allows_children(h) {
                if let Some(found) = self.find_id(Some(h), id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Whether `parent` is an ancestor of `h`.
    pub fn is_child_of(
        &self,
        h: WidgetHandle,
        parent: WidgetHandle,
    ) -> bool {
        self.contains(parent) && self.ancestors(h).any(|a| a == parent)
    }

    #[inline]
    pub fn is_hidden(
        &self,
        h: WidgetHandle,
    ) -> bool {
        self.has_flag(h, WidgetFlags::HIDDEN)
    }

    pub fn show(
        &mut self,
        h: WidgetHandle,
    ) {
        if self.is_hidden(h) {
            self.clear_flag(h, WidgetFlags::HIDDEN);
            self.invalidate_with_parent(h);
        }
    }

    /// Hide `h`, moving focus and active state out of its subtree.
    pub fn hide(
        &mut self,
        h: WidgetHandle,
    ) {
        if !self.contains(h) {
            return;
        }
        if !self.is_hidden(h) {
            self.set_flag(h, WidgetFlags::HIDDEN);
            self.invalidate_with_parent(h);
        }
        if let Some(f) = self.focused {
            if f == h || self.is_child_of(f, h) {
                let parent = self.parent(h);
                self.focus_set(parent);
            }
        }
        if let Some(a) = self.active {
            if a == h || self.is_child_of(a, h) {
                self.active_clear();
            }
        }
    }

    /// Hide every direct child of `h`.
    pub fn hide_children(
        &mut self,
        h: WidgetHandle,
    ) -> GuiResult<()> {
        if !self.allows_children(h) {
            return Err(GuiError::ChildrenNotAllowed);
        }
        let mut child = self.list_root(Some(h)).first;
        while let Some(c) = child {
            self.hide(c);
            child = self.next_sibling(c);
        }
        Ok(())
    }

    pub fn set_enabled(
        &mut self,
        h: WidgetHandle,
        enabled: bool,
    ) {
        if self.has_flag(h, WidgetFlags::DISABLED) == enabled {
            if enabled {
                self.clear_flag(h, WidgetFlags::DISABLED);
            } else {
                self.set_flag(h, WidgetFlags::DISABLED);
                if self.active == Some(h) {
                    self.active_clear();
                }
            }
            self.invalidate(h);
        }
    }

    #[inline]
    pub fn is_enabled(
        &self,
        h: WidgetHandle,
    ) -> bool {
        self.contains(h) && !self.has_flag(h, WidgetFlags::DISABLED)
    }
}
