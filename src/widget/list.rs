//! List helper shared by list-like widget kinds.
//!
//! A kind stores a [`ListData`] as its kind data and drives it through the
//! `list_*` methods on [`Gui`], which add the event and redraw side effects.

use core::any::Any;

use super::{Event, WidgetHandle};
use crate::linkedlist::{MultiKey, MultiList};
use crate::Gui;

/// Items of a list widget with selection and scroll state.
pub struct ListData<T> {
    items: MultiList<T>,
    /// Called once for every removed item.
    on_remove: Option<fn(T)>,
    /// Selected index, -1 for none.
    selected: i32,
    /// Index of the first visible item.
    visible_start: i32,
    /// Items that fit on one page, supplied by the widget.
    per_page: i32,
}

impl<T> ListData<T> {
    pub fn new(on_remove: Option<fn(T)>) -> Self {
        Self {
            items: MultiList::new(),
            on_remove,
            selected: -1,
            visible_start: 0,
            per_page: 1,
        }
    }

    #[inline]
    pub fn count(&self) -> i32 { self.items.len() as i32 }

    #[inline]
    pub const fn selected(&self) -> i32 { self.selected }

    #[inline]
    pub const fn visible_start(&self) -> i32 { self.visible_start }

    #[inline]
    pub const fn per_page(&self) -> i32 { self.per_page }

    pub fn set_per_page(
        &mut self,
        per_page: i32,
    ) {
        self.per_page = per_page.max(1);
        self.check_values();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ { self.items.iter() }

    /// Append an item.
    pub fn add_item(
        &mut self,
        item: T,
    ) -> MultiKey {
        let key = self.items.add(item);
        self.check_values();
        key
    }

    pub fn get_item(
        &self,
        index: usize,
    ) -> Option<&T> {
        self.items.get(self.items.key_at(index)?)
    }

    pub fn get_item_mut(
        &mut self,
        index: usize,
    ) -> Option<&mut T> {
        let key = self.items.key_at(index)?;
        self.items.get_mut(key)
    }

    /// Remove the item at `index`. Returns whether it existed.
    pub fn remove_item(
        &mut self,
        index: usize,
    ) -> bool {
        let Some(item) = self.items.key_at(index).and_then(|k| self.items.remove(k)) else {
            return false;
        };
        if let Some(hook) = self.on_remove {
            hook(item);
        }
        let index = index as i32;
        if self.selected == index {
            self.selected = -1;
        } else if self.selected > index {
            self.selected -= 1;
        }
        self.check_values();
        true
    }

    /// Remove every item, first to last.
    pub fn remove_items(&mut self) {
        while self.remove_item(0) {}
        self.selected = -1;
        self.visible_start = 0;
    }

    /// Clamp the first visible index so a full page stays in view.
    pub fn check_values(&mut self) {
        let count = self.count();
        if self.visible_start < 0 {
            self.visible_start = 0;
        } else if self.visible_start > 0 {
            if count > self.per_page {
                if self.visible_start + self.per_page >= count {
                    self.visible_start = count - self.per_page;
                }
            } else {
                self.visible_start = 0;
            }
        }
    }

    /// Scroll the page by `dir` items. Returns whether the start moved.
    pub fn slide(
        &mut self,
        dir: i32,
    ) -> bool {
        let old = self.visible_start;
        let count = self.count();
        if dir < 0 {
            self.visible_start = (self.visible_start + dir).max(0);
        } else if dir > 0 {
            if self.visible_start + dir > count - self.per_page - 1 {
                self.visible_start = (count - self.per_page).max(0);
            } else {
                self.visible_start += dir;
            }
        }
        self.visible_start != old
    }

    pub fn set_visible_start(
        &mut self,
        start: i32,
    ) -> bool {
        let old = self.visible_start;
        let count = self.count();
        let mut start = start.max(0);
        if start + self.per_page >= count {
            start = (count - self.per_page).max(0);
        }
        self.visible_start = start;
        self.visible_start != old
    }

    /// Select `index` (-1 clears). Returns whether the selection changed.
    pub fn select(
        &mut self,
        index: i32,
    ) -> bool {
        if index == self.selected || index < -1 || index >= self.count() {
            return false;
        }
        self.selected = index;
        true
    }

    /// Bring the selected item into the visible page.
    pub fn scroll_to_selection(&mut self) -> bool {
        if self.selected < 0 {
            return false;
        }
        if self.selected < self.visible_start {
            self.set_visible_start(self.selected)
        } else if self.selected >= self.visible_start + self.per_page {
            self.set_visible_start(self.selected - self.per_page + 1)
        } else {
            false
        }
    }
}

impl<T> Default for ListData<T> {
    fn default() -> Self { Self::new(None) }
}

impl Gui {
    /// Select `index` in the list of `h`, firing [`Event::SelectionChanged`].
    pub fn list_set_selection<T: Any>(
        &mut self,
        h: WidgetHandle,
        index: i32,
    ) -> bool {
        let Some(list) = self.kind_data_mut::<ListData<T>>(h) else {
            return false;
        };
        if !list.select(index) {
            return false;
        }
        list.scroll_to_selection();
        self.callback(h, &Event::SelectionChanged);
        self.invalidate(h);
        true
    }

    /// Move the selection by `dir`, clamped to the list.
    pub fn list_inc_selection<T: Any>(
        &mut self,
        h: WidgetHandle,
        dir: i16,
    ) -> bool {
        let Some(list) = self.kind_data::<ListData<T>>(h) else {
            return false;
        };
        let count = list.count();
        if count == 0 {
            return false;
        }
        let index = (list.selected() + i32::from(dir)).clamp(0, count - 1);
        self.list_set_selection::<T>(h, index)
    }

    pub fn list_slide<T: Any>(
        &mut self,
        h: WidgetHandle,
        dir: i32,
    ) -> bool {
        let moved = self.kind_data_mut::<ListData<T>>(h).is_some_and(|l| l.slide(dir));
        if moved {
            self.invalidate(h);
        }
        moved
    }

    pub fn list_set_visible_start<T: Any>(
        &mut self,
        h: WidgetHandle,
        start: i32,
    ) -> bool {
        let moved = self.kind_data_mut::<ListData<T>>(h).is_some_and(|l| l.set_visible_start(start));
        if moved {
            self.invalidate(h);
        }
        moved
    }

    pub fn list_add_item<T: Any>(
        &mut self,
        h: WidgetHandle,
        item: T,
    ) -> Option<MultiKey> {
        let key = self.kind_data_mut::<ListData<T>>(h)?.add_item(item);
        self.invalidate(h);
        Some(key)
    }

    pub fn list_remove_item<T: Any>(
        &mut self,
        h: WidgetHandle,
        index: usize,
    ) -> bool {
        let removed = self.kind_data_mut::<ListData<T>>(h).is_some_and(|l| l.remove_item(index));
        if removed {
            self.invalidate(h);
        }
        removed
    }

    pub fn list_remove_items<T: Any>(
        &mut self,
        h: WidgetHandle,
    ) {
        if let Some(list) = self.kind_data_mut::<ListData<T>>(h) {
            list.remove_items();
            self.invalidate(h);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::tests::{gui, plain};
    use crate::widget::{EventOutput, WidgetHandle};
    use std::cell::Cell;
    use std::rc::Rc;

    fn list_of(
        n: i32,
        per_page: i32,
    ) -> ListData<i32> {
        let mut list = ListData::new(None);
        list.set_per_page(per_page);
        for i in 0..n {
            list.add_item(i);
        }
        list
    }

    #[test]
    fn test_drain_calls_hook_once_per_item() {
        let removed = Rc::new(Cell::new(0));
        let mut list: ListData<Rc<Cell<i32>>> = ListData::new(Some(|c: Rc<Cell<i32>>| c.set(c.get() + 1)));
        for _ in 0..5 {
            list.add_item(Rc::clone(&removed));
        }
        list.remove_items();
        assert_eq!(removed.get(), 5, "One remove call per item");
        assert_eq!(list.count(), 0);
        assert_eq!(Rc::strong_count(&removed), 1, "Every item released");
    }

    #[test]
    fn test_remove_item_adjusts_selection() {
        let mut list = list_of(4, 2);
        assert!(list.select(2));
        assert!(list.remove_item(0));
        assert_eq!(list.selected(), 1, "Selection follows its item");
        assert_eq!(list.get_item(1), Some(&2));
        assert!(list.remove_item(1));
        assert_eq!(list.selected(), -1, "Selected item gone");
        assert!(!list.remove_item(10));
    }

    #[test]
    fn test_slide_clamps_to_last_page() {
        let mut list = list_of(10, 4);
        assert!(list.slide(3));
        assert_eq!(list.visible_start(), 3);
        assert!(list.slide(5));
        assert_eq!(list.visible_start(), 6, "Last page fully visible");
        assert!(!list.slide(1));
        assert!(list.slide(-10));
        assert_eq!(list.visible_start(), 0);
    }

    #[test]
    fn test_check_values_after_shrink() {
        let mut list = list_of(10, 4);
        list.set_visible_start(6);
        for _ in 0..5 {
            list.remove_item(0);
        }
        assert_eq!(list.count(), 5);
        assert_eq!(list.visible_start(), 1);
        list.remove_items();
        assert_eq!(list.visible_start(), 0);
    }

    #[test]
    fn test_select_bounds() {
        let mut list = list_of(3, 2);
        assert!(!list.select(3));
        assert!(!list.select(-2));
        assert!(list.select(2));
        assert!(!list.select(2), "Same selection is no change");
        assert!(list.scroll_to_selection());
        assert_eq!(list.visible_start(), 1);
        assert!(list.select(-1));
    }

    #[test]
    fn test_gui_selection_fires_event() {
        fn count_changes(
            gui: &mut Gui,
            h: WidgetHandle,
            event: &Event,
        ) -> Option<EventOutput> {
            if *event == Event::SelectionChanged {
                let n = gui.user_data::<u32>(h).copied().unwrap_or(0);
                let _ = gui.set_user_data(h, n + 1);
            }
            None
        }

        let mut gui = gui();
        let desk = gui.desktop();
        let h = plain(&mut gui, desk, 0.0, 0.0, 10.0, 10.0);
        gui.set_kind_data(h, list_of(5, 2)).unwrap_or_else(|e| panic!("{e}"));
        gui.set_callback(h, Some(count_changes));

        assert!(gui.list_inc_selection::<i32>(h, 1), "From none to the first item");
        assert!(gui.list_inc_selection::<i32>(h, 10));
        assert!(!gui.list_inc_selection::<i32>(h, 1), "Already on the last item");
        assert_eq!(gui.user_data::<u32>(h), Some(&2));
        let list = gui.kind_data::<ListData<i32>>(h).unwrap_or_else(|| panic!("no list"));
        assert_eq!(list.selected(), 4);
        assert_eq!(list.visible_start(), 3, "Selection scrolled into view");
    }
}
