//! GUI context and process loop.
//!
//! [`Gui`] owns everything: the widget arena, focus and active state, the
//! pending redraw region, timers, input and the glyph cache. It is a plain
//! value driven through `&mut`, so only one context can touch the tree at a
//! time.
//!
//! One [`Gui::process`] call runs, in order:
//!
//! 1. the removal sweep,
//! 2. expired software timers,
//! 3. queued input,
//! 4. the redraw pass over the pending region.

use alloc::vec::Vec;

use slotmap::SlotMap;

use crate::config::GuiConfig;
use crate::draw::{Canvas, Region};
use crate::input::InputState;
use crate::linkedlist::ListRoot;
use crate::ll::LowLevel;
use crate::log_buffer::LogBuffer;
use crate::text::{Font, cache::GlyphCache};
use crate::timer::{SoftTimer, TimerHandle};
use crate::widget::{Widget, WidgetFlags, WidgetHandle};

/// Work done by one [`Gui::process`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessStats {
    /// Widgets painted.
    pub drawn: usize,
    /// Widgets freed by the sweep.
    pub removed: usize,
    /// Timer and input events dispatched.
    pub events: usize,
}

/// The GUI context.
pub struct Gui {
    pub(crate) widgets: SlotMap<WidgetHandle, Widget>,
    /// Top-level list; its first entry is the desktop.
    pub(crate) root: ListRoot<WidgetHandle>,
    pub(crate) focused: Option<WidgetHandle>,
    pub(crate) focused_prev: Option<WidgetHandle>,
    pub(crate) active: Option<WidgetHandle>,
    pub(crate) active_prev: Option<WidgetHandle>,
    pub(crate) window_active: Option<WidgetHandle>,
    /// Screen area to repaint on the next redraw pass.
    pub(crate) pending: Region,
    pub(crate) redraw_pending: bool,
    pub(crate) remove_pending: bool,
    pub(crate) glyphs: GlyphCache,
    pub(crate) timers: SlotMap<TimerHandle, SoftTimer>,
    pub(crate) input: InputState,
    pub(crate) now_ms: u32,
    last_process_ms: u32,
    protect: u32,
    pub(crate) config: GuiConfig,
    pub(crate) screen: Region,
    pub(crate) default_font: Option<&'static Font>,
    pub log: LogBuffer,
}

impl Gui {
    /// Create a context with a full-screen desktop window.
    pub fn new(config: GuiConfig) -> Self {
        let mut gui = Self {
            widgets: SlotMap::with_key(),
            root: ListRoot::default(),
            focused: None,
            focused_prev: None,
            active: None,
            active_prev: None,
            window_active: None,
            pending: Region::EMPTY,
            redraw_pending: false,
            remove_pending: false,
            glyphs: GlyphCache::default(),
            timers: SlotMap::with_key(),
            input: InputState::new(),
            now_ms: 0,
            last_process_ms: 0,
            protect: 0,
            config,
            screen: Region::new(0, 0, config.width as i32, config.height as i32),
            default_font: None,
            log: LogBuffer::new(config.log_level),
        };
        let (w, h) = (config.width as f32, config.height as f32);
        if gui.create_window(0, 0.0, 0.0, w, h, None, WidgetFlags::empty()).is_err() {
            gui_error!(gui.log, "desktop creation failed");
        }
        gui_info!(gui.log, "gui {}x{} ready", config.width, config.height);
        gui
    }

    #[inline]
    pub const fn config(&self) -> &GuiConfig { &self.config }

    /// Current GUI time in milliseconds.
    #[inline]
    pub const fn now_ms(&self) -> u32 { self.now_ms }

    /// Advance GUI time.
    pub fn tick(
        &mut self,
        elapsed_ms: u32,
    ) {
        self.now_ms = self.now_ms.wrapping_add(elapsed_ms);
        self.log.set_time(self.now_ms);
    }

    /// Number of live widgets, the desktop included.
    #[inline]
    pub fn widget_count(&self) -> usize { self.widgets.len() }

    /// Glyph cache shared by every text draw.
    #[inline]
    pub const fn glyph_cache(&self) -> &GlyphCache { &self.glyphs }

    /// Area waiting for the next redraw pass.
    #[inline]
    pub const fn pending_region(&self) -> Region { self.pending }

    /// Suspend redrawing. Calls nest; each needs a matching [`Gui::unprotect`].
    pub fn protect(&mut self) { self.protect += 1; }

    pub fn unprotect(&mut self) { self.protect = self.protect.saturating_sub(1); }

    #[inline]
    pub const fn is_protected(&self) -> bool { self.protect > 0 }

    /// Run one iteration of the GUI: removals, timers, input, redraw.
    pub fn process(
        &mut self,
        ll: &mut dyn LowLevel,
    ) -> ProcessStats {
        let mut stats = ProcessStats {
            removed: self.sweep(),
            ..ProcessStats::default()
        };

        let elapsed = self.now_ms.wrapping_sub(self.last_process_ms);
        self.last_process_ms = self.now_ms;
        stats.events += self.run_timers(elapsed);
        stats.events += self.process_input();

        // Widgets removed from event handlers go before anything is painted
        stats.removed += self.sweep();

        if !self.is_protected() && ll.is_ready() {
            stats.drawn = self.redraw(ll);
        }
        if stats.removed > 0 {
            gui_debug!(self.log, "swept {} widgets", stats.removed);
        }
        stats
    }

    /// Paint everything marked for redraw inside the pending region.
    fn redraw(
        &mut self,
        ll: &mut dyn LowLevel,
    ) -> usize {
        if !self.redraw_pending {
            return 0;
        }
        self.redraw_pending = false;
        let mut glyphs = core::mem::take(&mut self.glyphs);
        let drawn = self.redraw_list(ll, &mut glyphs, None);
        self.glyphs = glyphs;
        self.pending = Region::EMPTY;
        gui_trace!(self.log, "redraw {} widgets", drawn);
        drawn
    }

    fn redraw_list(
        &mut self,
        ll: &mut dyn LowLevel,
        glyphs: &mut GlyphCache,
        parent: Option<WidgetHandle>,
    ) -> usize {
        let mut drawn = 0;
        let mut node = self.list_root(parent).first;
        while let Some(h) = node {
            node = self.next_sibling(h);
            if self.is_hidden(h) {
                self.clear_flag(h, WidgetFlags::REDRAW);
                continue;
            }
            let visible = self.visible_rect(h);
            if !visible.touches(&self.pending) {
                continue;
            }
            if !self.has_flag(h, WidgetFlags::REDRAW) {
                if self.allows_children(h) {
                    drawn += self.redraw_list(ll, glyphs, Some(h));
                }
                continue;
            }

            self.clear_flag(h, WidgetFlags::REDRAW);
            let clip = self.pending.intersect(&visible);
            let alpha = self.alpha(h);
            let under = (alpha < 0xFF && !clip.is_empty()).then(|| snapshot(&*ll, &clip));

            if let Some(kind) = self.widgets.get(h).map(|w| w.kind) {
                let mut canvas = Canvas::new(ll, clip).with_glyph_cache(glyphs);
                kind.draw(self, h, &mut canvas);
            }
            if self.allows_children(h) {
                let mut child = self.list_root(Some(h)).first;
                while let Some(c) = child {
                    self.set_flag(c, WidgetFlags::REDRAW);
                    child = self.next_sibling(c);
                }
                drawn += self.redraw_list(ll, glyphs, Some(h));
            }

            if let Some(under) = under {
                ll.copy_blend(clip.x1, clip.y1, clip.width(), clip.height(), &under, alpha);
            }
            drawn += 1;
        }
        drawn
    }
}

/// Copy of the pixels currently inside `clip`, row by row.
fn snapshot(
    ll: &dyn LowLevel,
    clip: &Region,
) -> Vec<crate::Color> {
    let mut pixels = Vec::with_capacity((clip.width() * clip.height()) as usize);
    for y in clip.y1..clip.y2 {
        for x in clip.x1..clip.x2 {
            pixels.push(ll.get_pixel(x, y));
        }
    }
    pixels
}
