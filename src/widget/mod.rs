//! Widget tree core.
//!
//! Widgets live in one generation-checked arena owned by [`Gui`]. Each widget
//! embeds its sibling [`Link`]; children-allowing widgets also store the root
//! of their children list. List order is paint order: first is drawn first
//! (bottom), last is drawn on top.
//!
//! Operations are `impl Gui` blocks spread over the submodules:
//!
//! - [`tree`] - create, remove and sweep, lookup, show/hide
//! - [`geometry`] - absolute position, size, visible rectangle, cache
//! - [`invalidate`] - dirty flags and pending redraw region
//! - [`zorder`] - sibling ordering by z-index and dialog rules
//! - [`focus`] - focus chain and active widget
//! - [`props`] - text, font, colours, transparency, user data
//!
//! [`kind`] holds the per-kind hook trait, [`list`] the list helper shared by
//! list-like kinds and [`window`] the window kind used for the desktop.

pub mod geometry;
pub mod kind;
pub mod list;
pub mod window;

mod focus;
mod invalidate;
mod props;
mod tree;
mod zorder;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::Gui;
use crate::colors::Color;
use crate::input::{KeyData, TouchData};
use crate::linkedlist::{Link, Linked, ListRoot};
use crate::text::Font;
use crate::timer::TimerHandle;

pub use geometry::Padding;
pub use kind::{KindFlags, WidgetKind};

new_key_type! {
    /// Generation-checked widget handle. Stale handles are detected, never dereferenced.
    pub struct WidgetHandle;
}

/// Numeric user ID of a widget.
pub type GuiId = u32;

/// User event override.
///
/// Returning `None` falls through to the widget kind's hook.
pub type Callback = fn(&mut Gui, WidgetHandle, &Event) -> Option<EventOutput>;

bitflags! {
    /// Per-widget state and creation flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct WidgetFlags: u32 {
        const HIDDEN = 1 << 0;
        const DISABLED = 1 << 1;
        /// Widget is the active (pressed) one.
        const ACTIVE = 1 << 2;
        /// Widget is part of the focus chain.
        const FOCUS = 1 << 3;
        /// Widget is drawn on the next redraw pass.
        const REDRAW = 1 << 4;
        /// Widget is freed on the next sweep.
        const REMOVE = 1 << 5;
        const XPOS_PERCENT = 1 << 6;
        const YPOS_PERCENT = 1 << 7;
        const WIDTH_PERCENT = 1 << 8;
        const HEIGHT_PERCENT = 1 << 9;
        /// Width runs to the parent's inner right edge.
        const WIDTH_FILL = 1 << 10;
        /// Height runs to the parent's inner bottom edge.
        const HEIGHT_FILL = 1 << 11;
        /// Widget covers its parent's inner box.
        const EXPANDED = 1 << 12;
        /// Next invalidation skips the hidden-ancestor check.
        const FIRST_INVALIDATE = 1 << 13;
        const IGNORE_INVALIDATE = 1 << 14;
        /// Touch moved since the widget became active.
        const TOUCH_MOVE = 1 << 15;
        /// Every invalidation also invalidates the parent.
        const INVALIDATE_PARENT = 1 << 16;
        /// Widget sorts after its siblings and captures input.
        const DIALOG_BASE = 1 << 17;
        /// Create the widget on the desktop regardless of the given parent.
        const CREATE_PARENT_DESKTOP = 1 << 18;
    }
}

impl WidgetFlags {
    /// Flags a caller may pass to [`Gui::create_widget`] that stay on the widget.
    pub const CREATE_KEEP: Self = Self::DIALOG_BASE.union(Self::INVALIDATE_PARENT).union(Self::HIDDEN);
}

// =============================================================================
// Events
// =============================================================================

/// Touch handling result of a widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchStatus {
    /// Handled; widget takes focus and becomes active.
    Handled,
    /// Handled; focus and active widget are cleared.
    HandledNoFocus,
    /// Not handled; the event continues to the widget below or the parent.
    Continue,
}

/// Key handling result of a widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyStatus {
    Handled,
    Continue,
}

/// Event delivered to a widget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Before the widget joins the tree; `Allow(false)` vetoes creation.
    PreInit,
    Init,
    ChildCreated(WidgetHandle),
    /// Removal request; `Allow(false)` refuses it.
    Remove,
    TouchStart(TouchData),
    TouchMove(TouchData),
    TouchEnd(TouchData),
    Click(TouchData),
    LongClick(TouchData),
    DoubleClick(TouchData),
    KeyPress(KeyData),
    FocusIn,
    FocusOut,
    ActiveIn,
    ActiveOut,
    SelectionChanged,
    ValueChanged,
    TextChanged,
    IncSelection(i16),
    Timer,
    Dismiss(i32),
}

/// Result of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutput {
    Unhandled,
    Handled,
    Allow(bool),
    Touch(TouchStatus),
    Key(KeyStatus),
}

impl EventOutput {
    /// Permission carried by the output; anything but `Allow(false)` allows.
    #[inline]
    pub const fn allowed(self) -> bool { !matches!(self, Self::Allow(false)) }

    pub const fn touch(self) -> TouchStatus {
        match self {
            Self::Touch(status) => status,
            Self::Handled => TouchStatus::Handled,
            _ => TouchStatus::Continue,
        }
    }

    pub const fn key(self) -> KeyStatus {
        match self {
            Self::Key(status) => status,
            Self::Handled => KeyStatus::Handled,
            _ => KeyStatus::Continue,
        }
    }

    /// Whether a click-like event was consumed.
    #[inline]
    pub const fn handled(self) -> bool {
        matches!(self, Self::Handled | Self::Allow(true) | Self::Touch(TouchStatus::Handled) | Self::Key(KeyStatus::Handled))
    }
}

// =============================================================================
// Text Buffer
// =============================================================================

/// Widget text: borrowed static text or an owned, bounded edit buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TextBuffer {
    #[default]
    Empty,
    Borrowed(&'static str),
    /// Owned text of at most `capacity - 1` characters with an edit cursor
    /// counted in characters.
    Owned {
        text: String,
        capacity: usize,
        cursor: usize,
    },
}

impl TextBuffer {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Borrowed(s) => s,
            Self::Owned { text, .. } => text.as_str(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool { self.as_str().is_empty() }

    #[inline]
    pub const fn is_owned(&self) -> bool { matches!(self, Self::Owned { .. }) }
}

// =============================================================================
// Widget
// =============================================================================

/// Absolute geometry kept per widget when the position cache is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CachedGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub visible: crate::Region,
}

impl Default for CachedGeometry {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            visible: crate::Region::EMPTY,
        }
    }
}

/// One node of the widget tree.
pub struct Widget {
    pub(crate) link: Link<WidgetHandle>,
    pub(crate) parent: Option<WidgetHandle>,
    pub(crate) children: ListRoot<WidgetHandle>,
    pub(crate) id: GuiId,
    pub(crate) kind: &'static dyn WidgetKind,
    pub(crate) callback: Option<Callback>,
    pub(crate) flags: WidgetFlags,
    // Relative geometry, pixels or percent per the *_PERCENT flags
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) padding: Padding,
    pub(crate) scroll_x: i32,
    pub(crate) scroll_y: i32,
    pub(crate) zindex: i32,
    /// 255 is opaque; anything lower blends with what is below.
    pub(crate) alpha: u8,
    pub(crate) font: Option<&'static Font>,
    pub(crate) text: TextBuffer,
    pub(crate) timer: Option<TimerHandle>,
    pub(crate) colors: Option<Vec<Color>>,
    pub(crate) data: Option<Box<dyn Any>>,
    pub(crate) user_data: Option<Box<dyn Any>>,
    pub(crate) geometry: CachedGeometry,
}

impl Widget {
    pub(crate) fn new(
        kind: &'static dyn WidgetKind,
        id: GuiId,
        parent: Option<WidgetHandle>,
        callback: Option<Callback>,
        flags: WidgetFlags,
    ) -> Self {
        Self {
            link: Link::default(),
            parent,
            children: ListRoot::default(),
            id,
            kind,
            callback,
            flags,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            padding: Padding::default(),
            scroll_x: 0,
            scroll_y: 0,
            zindex: 0,
            alpha: 0xFF,
            font: None,
            text: TextBuffer::Empty,
            timer: None,
            colors: None,
            data: None,
            user_data: None,
            geometry: CachedGeometry::default(),
        }
    }

    #[inline]
    pub const fn id(&self) -> GuiId { self.id }

    #[inline]
    pub fn kind(&self) -> &'static dyn WidgetKind { self.kind }

    #[inline]
    pub const fn flags(&self) -> WidgetFlags { self.flags }

    #[inline]
    pub const fn parent(&self) -> Option<WidgetHandle> { self.parent }

    #[inline]
    pub const fn zindex(&self) -> i32 { self.zindex }

    #[inline]
    pub const fn alpha(&self) -> u8 { self.alpha }

    #[inline]
    pub const fn padding(&self) -> Padding { self.padding }

    #[inline]
    pub const fn font(&self) -> Option<&'static Font> { self.font }

    #[inline]
    pub fn text(&self) -> &str { self.text.as_str() }

    #[inline]
    pub const fn is_transparent(&self) -> bool { self.alpha < 0xFF }

    pub fn allows_children(&self) -> bool { self.kind.flags().contains(KindFlags::ALLOW_CHILDREN) }

    pub fn is_dialog_base(&self) -> bool {
        self.flags.contains(WidgetFlags::DIALOG_BASE) || self.kind.flags().contains(KindFlags::DIALOG_BASE)
    }

    /// Colour at `index`: the custom table if one was written, else the kind default.
    pub fn color(
        &self,
        index: usize,
    ) -> Color {
        let table = self.colors.as_deref().unwrap_or(self.kind.default_colors());
        table.get(index).copied().unwrap_or(crate::colors::TRANSPARENT)
    }
}

impl Linked<WidgetHandle> for Widget {
    fn link(&self) -> &Link<WidgetHandle> { &self.link }

    fn link_mut(&mut self) -> &mut Link<WidgetHandle> { &mut self.link }
}

// =============================================================================
// Dispatch
// =============================================================================

impl Gui {
    /// Deliver `event` to `h`: the user callback first, then the kind hook.
    pub fn callback(
        &mut self,
        h: WidgetHandle,
        event: &Event,
    ) -> EventOutput {
        let Some(w) = self.widgets.get(h) else {
            return EventOutput::Unhandled;
        };
        let (kind, callback) = (w.kind, w.callback);
        if let Some(callback) = callback {
            if let Some(out) = callback(self, h, event) {
                return out;
            }
        }
        kind.handle(self, h, event)
    }

    #[inline]
    pub fn widget(
        &self,
        h: WidgetHandle,
    ) -> Option<&Widget> {
        self.widgets.get(h)
    }

    #[inline]
    pub fn contains(
        &self,
        h: WidgetHandle,
    ) -> bool {
        self.widgets.contains_key(h)
    }

    #[inline]
    pub fn flags(
        &self,
        h: WidgetHandle,
    ) -> WidgetFlags {
        self.widgets.get(h).map_or(WidgetFlags::empty(), |w| w.flags)
    }

    #[inline]
    pub(crate) fn has_flag(
        &self,
        h: WidgetHandle,
        flag: WidgetFlags,
    ) -> bool {
        self.flags(h).intersects(flag)
    }

    pub(crate) fn set_flag(
        &mut self,
        h: WidgetHandle,
        flag: WidgetFlags,
    ) {
        if let Some(w) = self.widgets.get_mut(h) {
            w.flags.insert(flag);
        }
    }

    pub(crate) fn clear_flag(
        &mut self,
        h: WidgetHandle,
        flag: WidgetFlags,
    ) {
        if let Some(w) = self.widgets.get_mut(h) {
            w.flags.remove(flag);
        }
    }

    #[inline]
    pub fn parent(
        &self,
        h: WidgetHandle,
    ) -> Option<WidgetHandle> {
        self.widgets.get(h).and_then(|w| w.parent)
    }

    #[inline]
    pub fn id(
        &self,
        h: WidgetHandle,
    ) -> Option<GuiId> {
        self.widgets.get(h).map(|w| w.id)
    }

    pub fn allows_children(
        &self,
        h: WidgetHandle,
    ) -> bool {
        self.widgets.get(h).is_some_and(Widget::allows_children)
    }

    pub fn is_dialog_base(
        &self,
        h: WidgetHandle,
    ) -> bool {
        self.widgets.get(h).is_some_and(Widget::is_dialog_base)
    }

    pub fn is_transparent(
        &self,
        h: WidgetHandle,
    ) -> bool {
        self.widgets.get(h).is_some_and(Widget::is_transparent)
    }

    /// Sibling after `h` in paint order.
    #[inline]
    pub fn next_sibling(
        &self,
        h: WidgetHandle,
    ) -> Option<WidgetHandle> {
        self.widgets.get(h).and_then(|w| w.link.next)
    }

    #[inline]
    pub fn prev_sibling(
        &self,
        h: WidgetHandle,
    ) -> Option<WidgetHandle> {
        self.widgets.get(h).and_then(|w| w.link.prev)
    }

    /// Root of the list holding the children of `parent`, or the top-level list.
    pub(crate) fn list_root(
        &self,
        parent: Option<WidgetHandle>,
    ) -> ListRoot<WidgetHandle> {
        match parent {
            None => self.root,
            Some(p) => self.widgets.get(p).map(|w| w.children).unwrap_or_default(),
        }
    }

    /// Children of `parent` in paint order (top-level widgets for `None`).
    pub fn children(
        &self,
        parent: Option<WidgetHandle>,
    ) -> impl Iterator<Item = WidgetHandle> + '_ {
        crate::linkedlist::iter(&self.widgets, &self.list_root(parent))
    }

    /// Run `f` on the arena and the list that holds the children of `parent`.
    pub(crate) fn with_list<R>(
        &mut self,
        parent: Option<WidgetHandle>,
        f: impl FnOnce(&mut slotmap::SlotMap<WidgetHandle, Widget>, &mut ListRoot<WidgetHandle>) -> R,
    ) -> R {
        match parent {
            None => f(&mut self.widgets, &mut self.root),
            Some(p) => {
                let mut root = self.list_root(Some(p));
                let out = f(&mut self.widgets, &mut root);
                if let Some(w) = self.widgets.get_mut(p) {
                    w.children = root;
                }
                out
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::GuiConfig;
    use crate::widget::window::WINDOW;

    /// Plain kind without children, used throughout the widget tests.
    pub struct Plain;

    pub static PLAIN: Plain = Plain;

    impl WidgetKind for Plain {
        fn name(&self) -> &'static str { "plain" }

        fn default_colors(&self) -> &'static [Color] { &[crate::colors::WHITE, crate::colors::BLACK] }
    }

    pub fn gui() -> Gui { Gui::new(GuiConfig::new().with_size(100, 100)) }

    pub fn plain(
        gui: &mut Gui,
        parent: Option<WidgetHandle>,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> WidgetHandle {
        gui.create_widget(&PLAIN, 100, x, y, w, h, parent, None, WidgetFlags::empty())
            .unwrap_or_else(|e| panic!("create failed: {e}"))
    }

    pub fn window(
        gui: &mut Gui,
        parent: Option<WidgetHandle>,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> WidgetHandle {
        gui.create_widget(&WINDOW, 200, x, y, w, h, parent, None, WidgetFlags::empty())
            .unwrap_or_else(|e| panic!("create failed: {e}"))
    }

    #[test]
    fn test_event_output_defaults() {
        assert!(EventOutput::Unhandled.allowed());
        assert!(!EventOutput::Allow(false).allowed());
        assert_eq!(EventOutput::Handled.touch(), TouchStatus::Handled);
        assert_eq!(EventOutput::Unhandled.key(), KeyStatus::Continue);
    }

    #[test]
    fn test_user_callback_overrides_kind() {
        fn veto_remove(
            _: &mut Gui,
            _: WidgetHandle,
            event: &Event,
        ) -> Option<EventOutput> {
            match event {
                Event::Remove => Some(EventOutput::Allow(false)),
                _ => None,
            }
        }
        let mut gui = gui();
        let h = plain(&mut gui, None, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(gui.callback(h, &Event::Remove), EventOutput::Allow(true));
        gui.set_callback(h, Some(veto_remove));
        assert_eq!(gui.callback(h, &Event::Remove), EventOutput::Allow(false));
        assert_eq!(gui.callback(h, &Event::Init), EventOutput::Handled, "Other events fall through");
    }

    #[test]
    fn test_text_buffer_views() {
        assert_eq!(TextBuffer::Borrowed("abc").as_str(), "abc");
        assert!(TextBuffer::Empty.is_empty());
        let owned = TextBuffer::Owned {
            text: String::from("x"),
            capacity: 4,
            cursor: 1,
        };
        assert!(owned.is_owned());
    }
}
