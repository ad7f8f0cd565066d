//! Per-widget properties: text, font, colours, transparency and attached data.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use super::{Callback, Event, TextBuffer, WidgetHandle};
use crate::colors::Color;
use crate::error::{GuiError, GuiResult};
use crate::text::Font;
use crate::Gui;

const BACKSPACE: char = '\u{8}';
const DELETE: char = '\u{7f}';

impl Gui {
    // =========================================================================
    // Text
    // =========================================================================

    /// Widget text, empty for stale handles.
    pub fn text(
        &self,
        h: WidgetHandle,
    ) -> &str {
        self.widgets.get(h).map_or("", |w| w.text.as_str())
    }

    /// Set the widget text.
    ///
    /// With text memory allocated the text is copied into it (truncated to
    /// fit), otherwise the widget refers to `text` directly.
    pub fn set_text(
        &mut self,
        h: WidgetHandle,
        text: &'static str,
    ) -> GuiResult<()> {
        let w = self.widgets.get_mut(h).ok_or(GuiError::InvalidHandle)?;
        if w.text.is_owned() {
            return self.set_text_owned(h, text);
        }
        w.text = TextBuffer::Borrowed(text);
        self.text_changed(h);
        Ok(())
    }

    /// Copy `text` into the widget's text memory, keeping at most `capacity - 1` characters.
    pub fn set_text_owned(
        &mut self,
        h: WidgetHandle,
        text: &str,
    ) -> GuiResult<()> {
        let w = self.widgets.get_mut(h).ok_or(GuiError::InvalidHandle)?;
        let TextBuffer::Owned { text: buf, capacity, cursor } = &mut w.text else {
            return Err(GuiError::NoTextMemory);
        };
        buf.clear();
        buf.extend(text.chars().take(capacity.saturating_sub(1)));
        *cursor = buf.chars().count();
        self.text_changed(h);
        Ok(())
    }

    fn text_changed(
        &mut self,
        h: WidgetHandle,
    ) {
        self.invalidate(h);
        self.callback(h, &Event::TextChanged);
    }

    /// Give the widget its own text buffer of `capacity` characters including the terminator slot.
    pub fn alloc_text_memory(
        &mut self,
        h: WidgetHandle,
        capacity: usize,
    ) -> GuiResult<()> {
        let w = self.widgets.get_mut(h).ok_or(GuiError::InvalidHandle)?;
        w.text = TextBuffer::Owned {
            text: String::with_capacity(capacity),
            capacity,
            cursor: 0,
        };
        self.invalidate(h);
        Ok(())
    }

    pub fn free_text_memory(
        &mut self,
        h: WidgetHandle,
    ) -> GuiResult<()> {
        let w = self.widgets.get_mut(h).ok_or(GuiError::InvalidHandle)?;
        if !w.text.is_owned() {
            return Err(GuiError::NoTextMemory);
        }
        w.text = TextBuffer::Empty;
        self.invalidate(h);
        Ok(())
    }

    /// Edit the owned text at the cursor.
    ///
    /// Printable characters and `'\n'` are inserted while there is room,
    /// backspace and delete remove the character before the cursor. Returns
    /// whether the text changed.
    pub fn process_text_key(
        &mut self,
        h: WidgetHandle,
        ch: char,
    ) -> GuiResult<bool> {
        let w = self.widgets.get_mut(h).ok_or(GuiError::InvalidHandle)?;
        let TextBuffer::Owned { text, capacity, cursor } = &mut w.text else {
            return Err(GuiError::NoTextMemory);
        };
        let len = text.chars().count();
        let changed = if ch == BACKSPACE || ch == DELETE {
            if *cursor == 0 {
                false
            } else {
                let at = byte_offset(text, *cursor - 1);
                text.remove(at);
                *cursor -= 1;
                true
            }
        } else if (ch == '\n' || ch >= ' ') && len + 1 < *capacity {
            let at = byte_offset(text, *cursor);
            text.insert(at, ch);
            *cursor += 1;
            true
        } else {
            false
        };
        if changed {
            self.text_changed(h);
        }
        Ok(changed)
    }

    /// Edit cursor of the owned text, counted in characters.
    pub fn text_cursor(
        &self,
        h: WidgetHandle,
    ) -> Option<usize> {
        match self.widgets.get(h).map(|w| &w.text) {
            Some(TextBuffer::Owned { cursor, .. }) => Some(*cursor),
            _ => None,
        }
    }

    // =========================================================================
    // Font and colours
    // =========================================================================

    pub fn font(
        &self,
        h: WidgetHandle,
    ) -> Option<&'static Font> {
        self.widgets.get(h).and_then(|w| w.font)
    }

    pub fn set_font(
        &mut self,
        h: WidgetHandle,
        font: &'static Font,
    ) {
        if let Some(w) = self.widgets.get_mut(h) {
            w.font = Some(font);
            self.invalidate_with_parent(h);
        }
    }

    /// Font given to widgets created from now on.
    pub fn set_default_font(
        &mut self,
        font: &'static Font,
    ) {
        self.default_font = Some(font);
    }

    pub fn color(
        &self,
        h: WidgetHandle,
        index: usize,
    ) -> Color {
        self.widgets.get(h).map_or(crate::colors::TRANSPARENT, |w| w.color(index))
    }

    /// Override colour `index` of the kind's table for this widget only.
    pub fn set_color(
        &mut self,
        h: WidgetHandle,
        index: usize,
        color: Color,
    ) -> GuiResult<()> {
        let w = self.widgets.get_mut(h).ok_or(GuiError::InvalidHandle)?;
        let defaults = w.kind.default_colors();
        if index >= defaults.len() {
            return Err(GuiError::ColorIndex(index));
        }
        let table = w.colors.get_or_insert_with(|| Vec::from(defaults));
        if table[index] != color {
            table[index] = color;
            self.invalidate(h);
        }
        Ok(())
    }

    pub fn alpha(
        &self,
        h: WidgetHandle,
    ) -> u8 {
        self.widgets.get(h).map_or(0xFF, |w| w.alpha)
    }

    /// Whole-widget opacity; 255 is opaque.
    pub fn set_alpha(
        &mut self,
        h: WidgetHandle,
        alpha: u8,
    ) {
        if let Some(w) = self.widgets.get_mut(h) {
            if w.alpha != alpha {
                w.alpha = alpha;
                self.invalidate_with_parent(h);
            }
        }
    }

    // =========================================================================
    // Attached data
    // =========================================================================

    pub fn set_user_data<T: Any>(
        &mut self,
        h: WidgetHandle,
        data: T,
    ) -> GuiResult<()> {
        let w = self.widgets.get_mut(h).ok_or(GuiError::InvalidHandle)?;
        w.user_data = Some(Box::new(data));
        Ok(())
    }

    pub fn user_data<T: Any>(
        &self,
        h: WidgetHandle,
    ) -> Option<&T> {
        self.widgets.get(h)?.user_data.as_ref()?.downcast_ref()
    }

    /// Attach per-widget state owned by the widget kind.
    pub fn set_kind_data<T: Any>(
        &mut self,
        h: WidgetHandle,
        data: T,
    ) -> GuiResult<()> {
        let w = self.widgets.get_mut(h).ok_or(GuiError::InvalidHandle)?;
        w.data = Some(Box::new(data));
        Ok(())
    }

    pub fn kind_data<T: Any>(
        &self,
        h: WidgetHandle,
    ) -> Option<&T> {
        self.widgets.get(h)?.data.as_ref()?.downcast_ref()
    }

    pub fn kind_data_mut<T: Any>(
        &mut self,
        h: WidgetHandle,
    ) -> Option<&mut T> {
        self.widgets.get_mut(h)?.data.as_mut()?.downcast_mut()
    }

    /// Replace the user event override.
    pub fn set_callback(
        &mut self,
        h: WidgetHandle,
        callback: Option<Callback>,
    ) {
        if let Some(w) = self.widgets.get_mut(h) {
            w.callback = callback;
        }
    }

    /// Ask the widget to move its selection by `dir` entries.
    pub fn inc_selection(
        &mut self,
        h: WidgetHandle,
        dir: i16,
    ) -> bool {
        self.callback(h, &Event::IncSelection(dir)).handled()
    }
}

fn byte_offset(
    text: &str,
    chars: usize,
) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use crate::widget::tests::{gui, plain};

    #[test]
    fn test_borrowed_text() {
        let mut gui = gui();
        let desk = gui.desktop();
        let a = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        assert_eq!(gui.set_text(a, "hello"), Ok(()));
        assert_eq!(gui.text(a), "hello");
        assert_eq!(gui.text_cursor(a), None);
        assert_eq!(gui.process_text_key(a, 'x'), Err(GuiError::NoTextMemory));
    }

    #[test]
    fn test_owned_text_truncates_to_capacity() {
        let mut gui = gui();
        let desk = gui.desktop();
        let a = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        gui.alloc_text_memory(a, 4).unwrap_or_else(|e| panic!("{e}"));
        gui.set_text(a, "abcdef").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(gui.text(a), "abc", "One slot kept for the terminator");
        assert_eq!(gui.text_cursor(a), Some(3));
        assert_eq!(gui.process_text_key(a, 'z'), Ok(false), "Buffer full");
    }

    #[test]
    fn test_text_editing_at_cursor() {
        let mut gui = gui();
        let desk = gui.desktop();
        let a = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        gui.alloc_text_memory(a, 16).unwrap_or_else(|e| panic!("{e}"));
        for ch in "héllo".chars() {
            assert_eq!(gui.process_text_key(a, ch), Ok(true));
        }
        assert_eq!(gui.process_text_key(a, '\u{1}'), Ok(false), "Control characters ignored");
        assert_eq!(gui.process_text_key(a, BACKSPACE), Ok(true));
        assert_eq!(gui.process_text_key(a, '\n'), Ok(true));
        assert_eq!(gui.text(a), "héll\n");
        for _ in 0..10 {
            let _ = gui.process_text_key(a, DELETE);
        }
        assert_eq!(gui.text(a), "");
        assert_eq!(gui.text_cursor(a), Some(0));
        assert_eq!(gui.free_text_memory(a), Ok(()));
        assert_eq!(gui.free_text_memory(a), Err(GuiError::NoTextMemory));
    }

    #[test]
    fn test_color_copy_on_write() {
        let mut gui = gui();
        let desk = gui.desktop();
        let a = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        let b = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        assert_eq!(gui.color(a, 1), colors::BLACK);
        gui.set_color(a, 1, colors::RED).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(gui.color(a, 1), colors::RED);
        assert_eq!(gui.color(a, 0), colors::WHITE, "Other entries copied from the kind");
        assert_eq!(gui.color(b, 1), colors::BLACK, "Kind table untouched");
        assert_eq!(gui.set_color(a, 2, colors::RED), Err(GuiError::ColorIndex(2)));
    }

    #[test]
    fn test_kind_and_user_data() {
        let mut gui = gui();
        let desk = gui.desktop();
        let a = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        gui.set_user_data(a, 7_u32).unwrap_or_else(|e| panic!("{e}"));
        gui.set_kind_data(a, [1_u8, 2]).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(gui.user_data::<u32>(a), Some(&7));
        assert_eq!(gui.user_data::<i64>(a), None, "Wrong type yields nothing");
        if let Some(data) = gui.kind_data_mut::<[u8; 2]>(a) {
            data[0] = 9;
        }
        assert_eq!(gui.kind_data::<[u8; 2]>(a), Some(&[9, 2]));
    }
}
