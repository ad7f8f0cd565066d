//! Window kind.
//!
//! A plain container filling its rectangle with the background colour. The
//! desktop is a window, and every created window becomes the active window,
//! the default parent for widgets created without a usable one.

use super::{KindFlags, WidgetHandle, WidgetKind};
use crate::colors::{self, Color};
use crate::draw::Canvas;
use crate::error::GuiResult;
use crate::{Gui, GuiId, WidgetFlags};

pub const COLOR_BACKGROUND: usize = 0;
pub const COLOR_TEXT: usize = 1;

static COLORS: [Color; 2] = [colors::WIN_BACKGROUND, colors::WIN_TEXT];

pub struct Window;

pub static WINDOW: Window = Window;

impl WidgetKind for Window {
    fn name(&self) -> &'static str { "window" }

    fn flags(&self) -> KindFlags { KindFlags::ALLOW_CHILDREN }

    fn default_colors(&self) -> &'static [Color] { &COLORS }

    fn draw(
        &self,
        gui: &Gui,
        h: WidgetHandle,
        canvas: &mut Canvas<'_>,
    ) {
        canvas.fill_rect(
            gui.abs_x(h),
            gui.abs_y(h),
            gui.width(h),
            gui.height(h),
            gui.color(h, COLOR_BACKGROUND),
        );
    }

    fn pre_init(
        &self,
        gui: &mut Gui,
        h: WidgetHandle,
    ) -> bool {
        gui.window_active = Some(h);
        true
    }
}

impl Gui {
    /// Create a window; it becomes the active window.
    pub fn create_window(
        &mut self,
        id: GuiId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        parent: Option<WidgetHandle>,
        flags: WidgetFlags,
    ) -> GuiResult<WidgetHandle> {
        self.create_widget(&WINDOW, id, x, y, width, height, parent, None, flags)
    }

    /// Window new widgets are placed in when their parent cannot hold children.
    #[inline]
    pub fn active_window(&self) -> Option<WidgetHandle> { self.window_active }

    pub fn set_active_window(
        &mut self,
        h: WidgetHandle,
    ) {
        if self.allows_children(h) {
            self.window_active = Some(h);
        }
    }
}
