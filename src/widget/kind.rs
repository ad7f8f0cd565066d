//! Widget kind descriptor.
//!
//! A kind is a stateless `'static` value describing one class of widget: its
//! name, capabilities, default colours and event hooks. Every hook has a
//! default, so a kind only implements what it reacts to. Per-widget state a
//! kind needs goes into the widget's kind data (see [`Gui::set_kind_data`]).

use bitflags::bitflags;

use super::{Event, EventOutput, KeyStatus, TouchStatus, WidgetHandle};
use crate::colors::Color;
use crate::draw::Canvas;
use crate::input::{KeyData, TouchData};
use crate::Gui;

bitflags! {
    /// Capabilities of a widget kind.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct KindFlags: u8 {
        /// Widgets of this kind own a children list.
        const ALLOW_CHILDREN = 1 << 0;
        /// Widgets of this kind are dialogs: created on the desktop, painted
        /// above their siblings and capturing touch input.
        const DIALOG_BASE = 1 << 1;
    }
}

/// Event hooks of a widget kind.
pub trait WidgetKind: Sync {
    fn name(&self) -> &'static str;

    fn flags(&self) -> KindFlags { KindFlags::empty() }

    /// Colour table indexed by the kind's colour constants.
    fn default_colors(&self) -> &'static [Color] { &[] }

    /// Paint the widget. The canvas clip is already the widget's visible part
    /// of the pending region.
    fn draw(
        &self,
        _gui: &Gui,
        _h: WidgetHandle,
        _canvas: &mut Canvas<'_>,
    ) {
    }

    /// Called before the widget joins the tree; `false` vetoes creation.
    fn pre_init(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
    ) -> bool {
        true
    }

    fn init(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
    ) {
    }

    /// `false` refuses removal of the widget (and so of every ancestor).
    fn can_remove(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
    ) -> bool {
        true
    }

    fn child_created(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
        _child: WidgetHandle,
    ) {
    }

    fn touch_start(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
        _touch: &TouchData,
    ) -> TouchStatus {
        TouchStatus::Handled
    }

    fn touch_move(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
        _touch: &TouchData,
    ) -> TouchStatus {
        TouchStatus::Continue
    }

    fn touch_end(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
        _touch: &TouchData,
    ) {
    }

    /// Returns whether the click was consumed.
    fn click(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
        _touch: &TouchData,
    ) -> bool {
        false
    }

    fn long_click(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
        _touch: &TouchData,
    ) -> bool {
        false
    }

    /// Unconsumed double clicks are delivered as a second click.
    fn double_click(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
        _touch: &TouchData,
    ) -> bool {
        false
    }

    fn key_press(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
        _key: &KeyData,
    ) -> KeyStatus {
        KeyStatus::Continue
    }

    fn focus_in(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
    ) {
    }

    fn focus_out(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
    ) {
    }

    fn active_in(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
    ) {
    }

    fn active_out(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
    ) {
    }

    fn selection_changed(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
    ) {
    }

    fn value_changed(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
    ) {
    }

    fn text_changed(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
    ) {
    }

    /// Move the selection by `dir` entries. Returns whether the kind has a selection.
    fn inc_selection(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
        _dir: i16,
    ) -> bool {
        false
    }

    fn timer(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
    ) {
    }

    fn dismiss(
        &self,
        _gui: &mut Gui,
        _h: WidgetHandle,
        _result: i32,
    ) {
    }

    /// Route `event` to its hook.
    fn handle(
        &self,
        gui: &mut Gui,
        h: WidgetHandle,
        event: &Event,
    ) -> EventOutput {
        match *event {
            Event::PreInit => EventOutput::Allow(self.pre_init(gui, h)),
            Event::Init => {
                self.init(gui, h);
                EventOutput::Handled
            }
            Event::ChildCreated(child) => {
                self.child_created(gui, h, child);
                EventOutput::Handled
            }
            Event::Remove => EventOutput::Allow(self.can_remove(gui, h)),
            Event::TouchStart(ref t) => EventOutput::Touch(self.touch_start(gui, h, t)),
            Event::TouchMove(ref t) => EventOutput::Touch(self.touch_move(gui, h, t)),
            Event::TouchEnd(ref t) => {
                self.touch_end(gui, h, t);
                EventOutput::Handled
            }
            Event::Click(ref t) => consumed(self.click(gui, h, t)),
            Event::LongClick(ref t) => consumed(self.long_click(gui, h, t)),
            Event::DoubleClick(ref t) => consumed(self.double_click(gui, h, t)),
            Event::KeyPress(ref k) => EventOutput::Key(self.key_press(gui, h, k)),
            Event::FocusIn => {
                self.focus_in(gui, h);
                EventOutput::Handled
            }
            Event::FocusOut => {
                self.focus_out(gui, h);
                EventOutput::Handled
            }
            Event::ActiveIn => {
                self.active_in(gui, h);
                EventOutput::Handled
            }
            Event::ActiveOut => {
                self.active_out(gui, h);
                EventOutput::Handled
            }
            Event::SelectionChanged => {
                self.selection_changed(gui, h);
                EventOutput::Handled
            }
            Event::ValueChanged => {
                self.value_changed(gui, h);
                EventOutput::Handled
            }
            Event::TextChanged => {
                self.text_changed(gui, h);
                EventOutput::Handled
            }
            Event::IncSelection(dir) => consumed(self.inc_selection(gui, h, dir)),
            Event::Timer => {
                self.timer(gui, h);
                EventOutput::Handled
            }
            Event::Dismiss(result) => {
                self.dismiss(gui, h, result);
                EventOutput::Handled
            }
        }
    }
}

#[inline]
const fn consumed(handled: bool) -> EventOutput {
    if handled { EventOutput::Handled } else { EventOutput::Unhandled }
}
