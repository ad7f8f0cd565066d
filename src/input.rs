//! Touch and keyboard input.
//!
//! Input is queued from anywhere with [`Gui::input_touch`] and
//! [`Gui::input_key`] and dispatched from [`Gui::process`].
//!
//! # Touch
//!
//! A press hit-tests the tree from the top of the paint order down, children
//! before their parent. Hidden and disabled widgets are skipped, and once a
//! dialog is found among the desktop's children only dialogs are tested. The
//! hit widget is raised with its ancestors and, unless it answers
//! [`TouchStatus::HandledNoFocus`], becomes focused and active.
//!
//! Moves go to the active widget and bubble to its parents while they answer
//! [`TouchStatus::Continue`]. Release ends the touch on the active widget.
//!
//! Clicks are detected on the active widget:
//!
//! | Gesture | Event |
//! |---------|-------|
//! | press, release inside | `Click` |
//! | second press within [`DOUBLE_CLICK_MS`] and [`DOUBLE_CLICK_DISTANCE`] | `DoubleClick` |
//! | press held for [`LONG_CLICK_MS`] | `LongClick` |
//!
//! A move the widget handled cancels the click.
//!
//! # Keys
//!
//! Keys go to the focused widget. Unhandled keys edit the widget's owned
//! text, and an unhandled tab moves focus to the next visible sibling.

use heapless::Deque;

use crate::config::{DOUBLE_CLICK_DISTANCE, DOUBLE_CLICK_MS, INPUT_QUEUE_SIZE, LONG_CLICK_MS};
use crate::widget::{Event, KeyStatus, TouchStatus, WidgetFlags, WidgetHandle};
use crate::Gui;

pub const KEY_TAB: char = '\t';

/// Touch point as delivered to a widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchData {
    /// Screen coordinates.
    pub x: i32,
    pub y: i32,
    /// Coordinates relative to the receiving widget.
    pub rel_x: i32,
    pub rel_y: i32,
    pub pressed: bool,
    pub time_ms: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyData {
    pub ch: char,
    pub time_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Touch(TouchData),
    Key(KeyData),
}

/// Click detection progress on the active widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum ClickState {
    #[default]
    Idle,
    Pressed {
        since_ms: u32,
        x: i32,
        y: i32,
        /// Position of the first click when this press may be a double click.
        first: Option<(i32, i32)>,
    },
    Released {
        at_ms: u32,
        x: i32,
        y: i32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gesture {
    Click,
    DoubleClick,
    LongClick,
}

/// Input queue and touch tracking owned by the GUI.
pub(crate) struct InputState {
    pub queue: Deque<InputEvent, INPUT_QUEUE_SIZE>,
    pub pressed: bool,
    pub click: ClickState,
}

impl InputState {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            pressed: false,
            click: ClickState::Idle,
        }
    }
}

impl Gui {
    /// Queue a touch sample. Returns `false` when the queue is full.
    pub fn input_touch(
        &mut self,
        x: i32,
        y: i32,
        pressed: bool,
    ) -> bool {
        let touch = TouchData {
            x,
            y,
            rel_x: 0,
            rel_y: 0,
            pressed,
            time_ms: self.now_ms,
        };
        let ok = self.input.queue.push_back(InputEvent::Touch(touch)).is_ok();
        if !ok {
            gui_warn!(self.log, "touch queue full");
        }
        ok
    }

    /// Queue a key press. Returns `false` when the queue is full.
    pub fn input_key(
        &mut self,
        ch: char,
    ) -> bool {
        let key = KeyData { ch, time_ms: self.now_ms };
        let ok = self.input.queue.push_back(InputEvent::Key(key)).is_ok();
        if !ok {
            gui_warn!(self.log, "key queue full");
        }
        ok
    }

    /// Dispatch all queued input. Returns the number of processed entries.
    pub(crate) fn process_input(&mut self) -> usize {
        let mut processed = 0;
        let mut touched = false;
        while let Some(event) = self.input.queue.pop_front() {
            match event {
                InputEvent::Touch(touch) => {
                    self.process_touch(touch);
                    touched = true;
                }
                InputEvent::Key(key) => self.process_key(key),
            }
            processed += 1;
        }
        if !touched {
            if let Some(gesture) = self.click_timeout(self.now_ms) {
                self.deliver(gesture, None);
            }
        }
        processed
    }

    /// `touch` with coordinates relative to `h`.
    fn relative(
        &self,
        touch: TouchData,
        h: WidgetHandle,
    ) -> TouchData {
        TouchData {
            rel_x: touch.x - self.abs_x(h),
            rel_y: touch.y - self.abs_y(h),
            ..touch
        }
    }

    fn process_touch(
        &mut self,
        touch: TouchData,
    ) {
        let was_pressed = self.input.pressed;

        if touch.pressed && was_pressed {
            if let Some(active) = self.active {
                self.touch_move(active, touch);
            }
        }

        if touch.pressed && !was_pressed {
            self.hit_test(None, 0, touch);
            if self.active != self.active_prev {
                self.input.click = ClickState::Idle;
            }
        }

        if let Some(active) = self.active {
            let rel = self.relative(touch, active);
            if let Some(gesture) = self.click_input(active, &rel, was_pressed) {
                self.deliver(gesture, Some(rel));
            }
        }

        if !touch.pressed && was_pressed {
            if let Some(active) = self.active {
                let rel = self.relative(touch, active);
                self.callback(active, &Event::TouchEnd(rel));
                self.active_clear();
            }
        }

        self.input.pressed = touch.pressed;
    }

    /// Forward a move to the active widget, then up its parents.
    fn touch_move(
        &mut self,
        active: WidgetHandle,
        touch: TouchData,
    ) {
        let mut node = Some(active);
        while let Some(h) = node {
            let rel = self.relative(touch, h);
            let status = self.callback(h, &Event::TouchMove(rel)).touch();
            if status != TouchStatus::Continue {
                self.set_flag(h, WidgetFlags::TOUCH_MOVE);
                if h != active {
                    self.active_set(Some(h));
                    self.set_flag(h, WidgetFlags::TOUCH_MOVE);
                }
                return;
            }
            self.clear_flag(h, WidgetFlags::TOUCH_MOVE);
            node = self.parent(h);
        }
    }

    /// Find the widget under a press. Top-level widgets have `depth` 0.
    fn hit_test(
        &mut self,
        parent: Option<WidgetHandle>,
        depth: u32,
        touch: TouchData,
    ) -> TouchStatus {
        let mut dialog_only = false;
        let mut node = self.list_root(parent).last;
        while let Some(h) = node {
            node = self.prev_sibling(h);
            if self.has_flag(h, WidgetFlags::HIDDEN | WidgetFlags::DISABLED) {
                continue;
            }
            if depth == 1 && self.is_dialog_base(h) {
                dialog_only = true;
            }
            if dialog_only && !self.is_dialog_base(h) {
                break;
            }

            let mut status = TouchStatus::Continue;
            if self.allows_children(h) {
                status = self.hit_test(Some(h), depth + 1, touch);
            }
            if status == TouchStatus::Continue {
                let r = self.visible_rect(h);
                let inside = !r.is_empty() && touch.x >= r.x1 && touch.x <= r.x2 && touch.y >= r.y1 && touch.y <= r.y2;
                if !inside {
                    continue;
                }
                let rel = self.relative(touch, h);
                status = match self.callback(h, &Event::TouchStart(rel)).touch() {
                    TouchStatus::Continue => TouchStatus::Handled,
                    other => other,
                };
                self.move_down_tree(h);
                if status == TouchStatus::Handled {
                    self.focus_set(Some(h));
                    self.active_set(Some(h));
                } else {
                    self.focus_clear();
                    self.active_clear();
                }
            }
            return status;
        }
        TouchStatus::Continue
    }

    /// Advance click detection with a touch sample on `active`.
    fn click_input(
        &mut self,
        active: WidgetHandle,
        touch: &TouchData,
        was_pressed: bool,
    ) -> Option<Gesture> {
        let (x, y, t) = (touch.rel_x, touch.rel_y, touch.time_ms);
        let (state, gesture) = match (self.input.click, touch.pressed) {
            (ClickState::Idle, true) if !was_pressed => (ClickState::Pressed { since_ms: t, x, y, first: None }, None),
            (ClickState::Released { at_ms, x: fx, y: fy }, true) if !was_pressed => {
                let first = (t.wrapping_sub(at_ms) <= DOUBLE_CLICK_MS).then_some((fx, fy));
                (ClickState::Pressed { since_ms: t, x, y, first }, None)
            }
            (ClickState::Pressed { first, .. }, true) => {
                if self.has_flag(active, WidgetFlags::TOUCH_MOVE) {
                    (ClickState::Idle, None)
                } else {
                    (ClickState::Pressed { since_ms: t, x, y, first }, None)
                }
            }
            (ClickState::Pressed { first, .. }, false) => {
                let first = first.filter(|&(fx, fy)| (fx - x).abs() <= DOUBLE_CLICK_DISTANCE && (fy - y).abs() <= DOUBLE_CLICK_DISTANCE);
                let (w, h) = (self.width(active), self.height(active));
                let inside = |(px, py): (i32, i32)| px >= 0 && px <= w && py >= 0 && py <= h;
                if !inside((x, y)) || !first.is_none_or(inside) {
                    (ClickState::Idle, None)
                } else if first.is_some() {
                    (ClickState::Idle, Some(Gesture::DoubleClick))
                } else {
                    (ClickState::Released { at_ms: t, x, y }, Some(Gesture::Click))
                }
            }
            (state, _) => (state, None),
        };
        self.input.click = state;
        gesture
    }

    /// Expire click detection without new touch samples.
    fn click_timeout(
        &mut self,
        now_ms: u32,
    ) -> Option<Gesture> {
        match self.input.click {
            ClickState::Pressed { since_ms, first, .. } if now_ms.wrapping_sub(since_ms) > LONG_CLICK_MS => {
                self.input.click = ClickState::Idle;
                first.is_none().then_some(Gesture::LongClick)
            }
            ClickState::Released { at_ms, .. } if now_ms.wrapping_sub(at_ms) > DOUBLE_CLICK_MS => {
                self.input.click = ClickState::Idle;
                None
            }
            _ => None,
        }
    }

    /// Send a detected gesture to the active widget.
    fn deliver(
        &mut self,
        gesture: Gesture,
        touch: Option<TouchData>,
    ) {
        let Some(active) = self.active else {
            return;
        };
        let touch = touch.unwrap_or(TouchData {
            pressed: true,
            time_ms: self.now_ms,
            ..TouchData::default()
        });
        match gesture {
            Gesture::Click => {
                self.callback(active, &Event::Click(touch));
            }
            Gesture::LongClick => {
                self.callback(active, &Event::LongClick(touch));
            }
            Gesture::DoubleClick => {
                if !self.callback(active, &Event::DoubleClick(touch)).handled() {
                    self.callback(active, &Event::Click(touch));
                }
            }
        }
    }

    fn process_key(
        &mut self,
        key: KeyData,
    ) {
        let Some(focused) = self.focused else {
            return;
        };
        if self.callback(focused, &Event::KeyPress(key)).key() == KeyStatus::Handled {
            return;
        }
        if key.ch == KEY_TAB {
            self.focus_next(focused);
        } else if self.widgets.get(focused).is_some_and(|w| w.text.is_owned()) {
            let _ = self.process_text_key(focused, key.ch);
        }
    }

    /// Focus the next visible sibling of `h`, wrapping to the first one.
    fn focus_next(
        &mut self,
        h: WidgetHandle,
    ) {
        let next = self.next_sibling(h).filter(|&n| !self.is_hidden(n)).or_else(|| {
            let parent = self.parent(h);
            self.children(parent).find(|&c| !self.is_hidden(c))
        });
        if let Some(next) = next {
            self.move_to_bottom(next);
            self.focus_set(Some(next));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::tests::{gui, plain, window};
    use crate::widget::EventOutput;

    /// Counts clicks in the user data: (click, double, long).
    fn record(
        gui: &mut Gui,
        h: WidgetHandle,
        event: &Event,
    ) -> Option<EventOutput> {
        let (mut c, mut d, mut l) = gui.user_data::<(u32, u32, u32)>(h).copied().unwrap_or_default();
        match event {
            Event::Click(_) => c += 1,
            Event::DoubleClick(_) => d += 1,
            Event::LongClick(_) => l += 1,
            _ => return None,
        }
        let _ = gui.set_user_data(h, (c, d, l));
        Some(EventOutput::Handled)
    }

    fn tap(
        gui: &mut Gui,
        x: i32,
        y: i32,
    ) {
        gui.input_touch(x, y, true);
        gui.input_touch(x, y, false);
        gui.process_input();
    }

    fn counts(
        gui: &Gui,
        h: WidgetHandle,
    ) -> (u32, u32, u32) {
        gui.user_data::<(u32, u32, u32)>(h).copied().unwrap_or_default()
    }

    #[test]
    fn test_press_focuses_topmost_widget() {
        let mut gui = gui();
        let desk = gui.desktop();
        let below = plain(&mut gui, desk, 0.0, 0.0, 30.0, 30.0);
        let above = plain(&mut gui, desk, 10.0, 10.0, 30.0, 30.0);
        gui.input_touch(15, 15, true);
        gui.process_input();
        assert_eq!(gui.focused(), Some(above));
        assert_eq!(gui.active(), Some(above));
        assert!(!gui.has_flag(below, WidgetFlags::FOCUS));
        gui.input_touch(15, 15, false);
        gui.process_input();
        assert_eq!(gui.active(), None, "Release clears the active widget");
        assert_eq!(gui.focused(), Some(above), "Focus stays");
    }

    #[test]
    fn test_hidden_and_disabled_are_skipped() {
        let mut gui = gui();
        let desk = gui.desktop();
        let below = plain(&mut gui, desk, 0.0, 0.0, 30.0, 30.0);
        let hidden = plain(&mut gui, desk, 0.0, 0.0, 30.0, 30.0);
        let disabled = plain(&mut gui, desk, 0.0, 0.0, 30.0, 30.0);
        gui.hide(hidden);
        gui.set_enabled(disabled, false);
        tap(&mut gui, 5, 5);
        assert_eq!(gui.focused(), Some(below));
    }

    #[test]
    fn test_dialog_captures_touch() {
        let mut gui = gui();
        let desk = gui.desktop();
        let win = window(&mut gui, desk, 0.0, 0.0, 50.0, 50.0);
        gui.create_widget(&crate::widget::window::WINDOW, 9, 60.0, 60.0, 20.0, 20.0, None, None, WidgetFlags::DIALOG_BASE)
            .unwrap_or_else(|e| panic!("{e}"));
        tap(&mut gui, 10, 10);
        assert_ne!(gui.focused(), Some(win), "Widgets below a dialog ignore touch");
    }

    #[test]
    fn test_click_and_double_click() {
        let mut gui = gui();
        let desk = gui.desktop();
        let h = plain(&mut gui, desk, 0.0, 0.0, 30.0, 30.0);
        gui.set_callback(h, Some(record));
        tap(&mut gui, 5, 5);
        assert_eq!(counts(&gui, h), (1, 0, 0));
        gui.tick(100);
        tap(&mut gui, 8, 8);
        assert_eq!(counts(&gui, h), (1, 1, 0), "Second tap in time is a double click");
        gui.tick(DOUBLE_CLICK_MS + 100);
        tap(&mut gui, 5, 5);
        assert_eq!(counts(&gui, h), (2, 1, 0));
        gui.tick(DOUBLE_CLICK_MS + 1);
        gui.process_input();
        tap(&mut gui, 5, 5);
        assert_eq!(counts(&gui, h), (3, 1, 0), "Late second tap is a new click");
    }

    #[test]
    fn test_long_click() {
        let mut gui = gui();
        let desk = gui.desktop();
        let h = plain(&mut gui, desk, 0.0, 0.0, 30.0, 30.0);
        gui.set_callback(h, Some(record));
        gui.input_touch(5, 5, true);
        gui.process_input();
        gui.tick(LONG_CLICK_MS + 1);
        gui.process_input();
        assert_eq!(counts(&gui, h), (0, 0, 1));
        gui.input_touch(5, 5, false);
        gui.process_input();
        assert_eq!(counts(&gui, h), (0, 0, 1), "No click after a long click");
    }

    #[test]
    fn test_release_outside_is_no_click() {
        let mut gui = gui();
        let desk = gui.desktop();
        let h = plain(&mut gui, desk, 0.0, 0.0, 30.0, 30.0);
        gui.set_callback(h, Some(record));
        gui.input_touch(5, 5, true);
        gui.input_touch(80, 80, true);
        gui.input_touch(80, 80, false);
        gui.process_input();
        assert_eq!(counts(&gui, h), (0, 0, 0));
    }

    #[test]
    fn test_tab_moves_focus_and_keys_edit_text() {
        let mut gui = gui();
        let desk = gui.desktop();
        let win = window(&mut gui, desk, 0.0, 0.0, 80.0, 80.0);
        let a = plain(&mut gui, Some(win), 0.0, 0.0, 10.0, 10.0);
        let b = plain(&mut gui, Some(win), 20.0, 0.0, 10.0, 10.0);
        gui.alloc_text_memory(b, 8).unwrap_or_else(|e| panic!("{e}"));
        gui.focus_set(Some(a));
        gui.input_key(KEY_TAB);
        gui.input_key('o');
        gui.input_key('k');
        gui.process_input();
        assert_eq!(gui.focused(), Some(b));
        assert_eq!(gui.text(b), "ok");
        gui.input_key(KEY_TAB);
        gui.process_input();
        assert_eq!(gui.focused(), Some(a), "Wraps to the first sibling");
    }

    #[test]
    fn test_queue_full() {
        let mut gui = gui();
        for _ in 0..INPUT_QUEUE_SIZE {
            assert!(gui.input_key('x'));
        }
        assert!(!gui.input_key('x'));
    }
}
