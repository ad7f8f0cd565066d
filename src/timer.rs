//! Software timers owned by widgets.
//!
//! Timers count down in milliseconds as [`Gui::tick`] advances time and fire
//! [`Event::Timer`](crate::Event::Timer) on their widget from
//! [`Gui::process`]. A timer is freed together with its widget.

use slotmap::new_key_type;

use crate::error::{GuiError, GuiResult};
use crate::widget::{Event, WidgetHandle};
use crate::Gui;

new_key_type! {
    pub struct TimerHandle;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoftTimer {
    pub period_ms: u32,
    pub remaining_ms: u32,
    /// Restart after firing instead of stopping.
    pub repeat: bool,
    pub running: bool,
    pub widget: WidgetHandle,
}

impl Gui {
    /// Create a stopped timer for `h`, replacing any timer the widget had.
    pub fn timer_create(
        &mut self,
        h: WidgetHandle,
        period_ms: u32,
        repeat: bool,
    ) -> GuiResult<TimerHandle> {
        if !self.contains(h) {
            return Err(GuiError::InvalidHandle);
        }
        let timer = self.timers.insert(SoftTimer {
            period_ms,
            remaining_ms: period_ms,
            repeat,
            running: false,
            widget: h,
        });
        if let Some(old) = self.widgets.get_mut(h).and_then(|w| w.timer.replace(timer)) {
            self.timers.remove(old);
        }
        Ok(timer)
    }

    pub fn timer_start(
        &mut self,
        timer: TimerHandle,
    ) -> GuiResult<()> {
        let t = self.timers.get_mut(timer).ok_or(GuiError::InvalidHandle)?;
        t.remaining_ms = t.period_ms;
        t.running = true;
        Ok(())
    }

    pub fn timer_stop(
        &mut self,
        timer: TimerHandle,
    ) -> GuiResult<()> {
        let t = self.timers.get_mut(timer).ok_or(GuiError::InvalidHandle)?;
        t.running = false;
        Ok(())
    }

    pub fn timer_remove(
        &mut self,
        timer: TimerHandle,
    ) -> GuiResult<()> {
        let t = self.timers.remove(timer).ok_or(GuiError::InvalidHandle)?;
        if let Some(w) = self.widgets.get_mut(t.widget) {
            w.timer = None;
        }
        Ok(())
    }

    pub fn timer(
        &self,
        timer: TimerHandle,
    ) -> Option<&SoftTimer> {
        self.timers.get(timer)
    }

    /// Timer attached to widget `h`.
    pub fn widget_timer(
        &self,
        h: WidgetHandle,
    ) -> Option<TimerHandle> {
        self.widgets.get(h).and_then(|w| w.timer)
    }

    /// Count running timers down by `elapsed_ms`; expired ones fire. Returns
    /// the number of timer events delivered.
    pub(crate) fn run_timers(
        &mut self,
        elapsed_ms: u32,
    ) -> usize {
        let mut expired: heapless::Vec<WidgetHandle, 16> = heapless::Vec::new();
        let mut fired = 0;
        for (_, t) in self.timers.iter_mut() {
            if !t.running {
                continue;
            }
            if t.remaining_ms > elapsed_ms {
                t.remaining_ms -= elapsed_ms;
                continue;
            }
            if t.repeat {
                t.remaining_ms = t.period_ms.max(1);
            } else {
                t.running = false;
            }
            if expired.push(t.widget).is_err() {
                // Delivered on the next pass
                t.remaining_ms = 0;
                t.running = true;
            }
        }
        for h in expired {
            self.callback(h, &Event::Timer);
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::tests::{gui, plain};
    use crate::widget::EventOutput;

    fn count_timer(
        gui: &mut Gui,
        h: WidgetHandle,
        event: &Event,
    ) -> Option<EventOutput> {
        if *event == Event::Timer {
            let n = gui.user_data::<u32>(h).copied().unwrap_or(0);
            let _ = gui.set_user_data(h, n + 1);
            return Some(EventOutput::Handled);
        }
        None
    }

    #[test]
    fn test_one_shot_timer_fires_once() {
        let mut gui = gui();
        let desk = gui.desktop();
        let h = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        gui.set_callback(h, Some(count_timer));
        let t = gui.timer_create(h, 50, false).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(gui.run_timers(100), 0, "Created stopped");
        gui.timer_start(t).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(gui.run_timers(30), 0);
        assert_eq!(gui.run_timers(30), 1);
        assert_eq!(gui.run_timers(100), 0);
        assert_eq!(gui.user_data::<u32>(h), Some(&1));
    }

    #[test]
    fn test_repeating_timer_and_stop() {
        let mut gui = gui();
        let desk = gui.desktop();
        let h = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        gui.set_callback(h, Some(count_timer));
        let t = gui.timer_create(h, 10, true).unwrap_or_else(|e| panic!("{e}"));
        gui.timer_start(t).unwrap_or_else(|e| panic!("{e}"));
        for _ in 0..3 {
            gui.run_timers(10);
        }
        gui.timer_stop(t).unwrap_or_else(|e| panic!("{e}"));
        gui.run_timers(10);
        assert_eq!(gui.user_data::<u32>(h), Some(&3));
    }

    #[test]
    fn test_timer_freed_with_widget() {
        let mut gui = gui();
        let desk = gui.desktop();
        let h = plain(&mut gui, desk, 0.0, 0.0, 5.0, 5.0);
        let t = gui.timer_create(h, 10, true).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(gui.widget_timer(h), Some(t));
        gui.remove(h).unwrap_or_else(|e| panic!("{e}"));
        gui.sweep();
        assert!(gui.timer(t).is_none());
        assert_eq!(gui.timer_start(t), Err(GuiError::InvalidHandle));
    }
}
