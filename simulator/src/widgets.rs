//! Demo widget kinds: label, push button and text edit.

use easygui::colors::{self, Color};
use easygui::draw::Bevel;
use easygui::text::{HAlign, TextArea, TextFlags, VAlign};
use easygui::{Canvas, Gui, WidgetFlags, WidgetHandle, WidgetKind};

pub const COLOR_BACKGROUND: usize = 0;
pub const COLOR_TEXT: usize = 1;
pub const COLOR_PRESSED: usize = 2;

/// Paint the widget text inside its box.
fn draw_text(
    gui: &Gui,
    h: WidgetHandle,
    canvas: &mut Canvas<'_>,
    area: TextArea,
) {
    if let Some(font) = gui.font(h) {
        canvas.write_text(font, gui.text(h), &area);
    }
}

fn bounds(
    gui: &Gui,
    h: WidgetHandle,
) -> (i32, i32, i32, i32) {
    (gui.abs_x(h), gui.abs_y(h), gui.width(h), gui.height(h))
}

// =============================================================================
// Label
// =============================================================================

static LABEL_COLORS: [Color; 2] = [colors::WIN_BACKGROUND, colors::BLACK];

pub struct Label;

pub static LABEL: Label = Label;

impl WidgetKind for Label {
    fn name(&self) -> &'static str { "label" }

    fn default_colors(&self) -> &'static [Color] { &LABEL_COLORS }

    fn draw(
        &self,
        gui: &Gui,
        h: WidgetHandle,
        canvas: &mut Canvas<'_>,
    ) {
        let (x, y, w, hh) = bounds(gui, h);
        canvas.fill_rect(x, y, w, hh, gui.color(h, COLOR_BACKGROUND));
        let area = TextArea::new(x, y, w, hh, gui.color(h, COLOR_TEXT))
            .with_align(HAlign::Left, VAlign::Center)
            .with_flags(TextFlags::MULTILINE);
        draw_text(gui, h, canvas, area);
    }
}

// =============================================================================
// Button
// =============================================================================

static BUTTON_COLORS: [Color; 3] = [colors::WIN_MIDDLEGRAY, colors::BLACK, colors::GRAY];

pub struct Button;

pub static BUTTON: Button = Button;

impl WidgetKind for Button {
    fn name(&self) -> &'static str { "button" }

    fn default_colors(&self) -> &'static [Color] { &BUTTON_COLORS }

    fn draw(
        &self,
        gui: &Gui,
        h: WidgetHandle,
        canvas: &mut Canvas<'_>,
    ) {
        let (x, y, w, hh) = bounds(gui, h);
        let pressed = gui.flags(h).contains(WidgetFlags::ACTIVE);
        let (bg, bevel) = if pressed {
            (gui.color(h, COLOR_PRESSED), Bevel::Lowered)
        } else {
            (gui.color(h, COLOR_BACKGROUND), Bevel::Raised)
        };
        canvas.fill_rect(x, y, w, hh, bg);
        canvas.rect_3d(x, y, w, hh, bevel);
        let area = TextArea::new(x, y, w, hh, gui.color(h, COLOR_TEXT)).with_align(HAlign::Center, VAlign::Center);
        draw_text(gui, h, canvas, area);
    }

    fn active_in(
        &self,
        gui: &mut Gui,
        h: WidgetHandle,
    ) {
        gui.invalidate(h);
    }

    fn active_out(
        &self,
        gui: &mut Gui,
        h: WidgetHandle,
    ) {
        gui.invalidate(h);
    }
}

// =============================================================================
// Edit
// =============================================================================

const EDIT_CAPACITY: usize = 64;

static EDIT_COLORS: [Color; 2] = [colors::WHITE, colors::BLACK];

/// Multiline text box; typing is handled by the core's default key editing.
pub struct Edit;

pub static EDIT: Edit = Edit;

impl WidgetKind for Edit {
    fn name(&self) -> &'static str { "edit" }

    fn default_colors(&self) -> &'static [Color] { &EDIT_COLORS }

    fn init(
        &self,
        gui: &mut Gui,
        h: WidgetHandle,
    ) {
        let _ = gui.alloc_text_memory(h, EDIT_CAPACITY);
    }

    fn draw(
        &self,
        gui: &Gui,
        h: WidgetHandle,
        canvas: &mut Canvas<'_>,
    ) {
        let (x, y, w, hh) = bounds(gui, h);
        canvas.fill_rect(x, y, w, hh, gui.color(h, COLOR_BACKGROUND));
        let bevel = if gui.flags(h).contains(WidgetFlags::FOCUS) { Bevel::Lowered } else { Bevel::Raised };
        canvas.rect_3d(x, y, w, hh, bevel);
        let area = TextArea::new(x + 3, y + 3, w - 6, hh - 6, gui.color(h, COLOR_TEXT))
            .with_flags(TextFlags::MULTILINE | TextFlags::EDIT_MODE);
        draw_text(gui, h, canvas, area);
    }

    fn focus_in(
        &self,
        gui: &mut Gui,
        h: WidgetHandle,
    ) {
        gui.invalidate(h);
    }

    fn focus_out(
        &self,
        gui: &mut Gui,
        h: WidgetHandle,
    ) {
        gui.invalidate(h);
    }
}
