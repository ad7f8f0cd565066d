//! EasyGUI desktop simulator.
//!
//! Runs the GUI core against a RAM framebuffer and mirrors it into an SDL
//! window through `embedded-graphics-simulator`. Mouse drives touch input and
//! the keyboard feeds key input.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]

mod font;
mod timing;
mod widgets;

use std::fmt::Write;
use std::thread;
use std::time::Instant;

use easygui::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use easygui::input::KEY_TAB;
use easygui::ll::framebuffer::FrameBuffer;
use easygui::log_buffer::LogLevel;
use easygui::widget::geometry::Unit;
use easygui::widget::EventOutput;
use easygui::{Event, Gui, GuiConfig, GuiResult, WidgetFlags, WidgetHandle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::{Keycode, Mod};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

use crate::timing::{FRAME_TIME, UPTIME_PERIOD_MS};
use crate::widgets::{BUTTON, EDIT, LABEL};

// =============================================================================
// Widget IDs
// =============================================================================

const ID_MAIN: u32 = 1;
const ID_TITLE: u32 = 2;
const ID_COUNTER: u32 = 3;
const ID_CLICK: u32 = 4;
const ID_EDIT: u32 = 5;
const ID_OPEN_DIALOG: u32 = 6;
const ID_UPTIME: u32 = 7;
const ID_DIALOG: u32 = 10;
const ID_DIALOG_CLOSE: u32 = 11;

const LABEL_CAPACITY: usize = 32;

// =============================================================================
// Callbacks
// =============================================================================

fn on_click_me(
    gui: &mut Gui,
    h: WidgetHandle,
    event: &Event,
) -> Option<EventOutput> {
    let Event::Click(_) = event else {
        return None;
    };
    let count = gui.user_data::<u32>(h).copied().unwrap_or(0) + 1;
    let _ = gui.set_user_data(h, count);
    if let Some(label) = gui.get_by_id(ID_COUNTER) {
        let mut text = String::new();
        let _ = write!(text, "Clicked {count} times");
        let _ = gui.set_text_owned(label, &text);
    }
    Some(EventOutput::Handled)
}

fn on_open_dialog(
    gui: &mut Gui,
    _h: WidgetHandle,
    event: &Event,
) -> Option<EventOutput> {
    let Event::Click(_) = event else {
        return None;
    };
    if gui.get_by_id(ID_DIALOG).is_none() {
        if let Err(e) = build_dialog(gui) {
            warn(gui, &format!("dialog failed: {e}"));
        }
    }
    Some(EventOutput::Handled)
}

fn on_dialog_close(
    gui: &mut Gui,
    h: WidgetHandle,
    event: &Event,
) -> Option<EventOutput> {
    let Event::Click(_) = event else {
        return None;
    };
    if let Some(dialog) = gui.parent(h) {
        let _ = gui.remove(dialog);
    }
    Some(EventOutput::Handled)
}

fn on_uptime(
    gui: &mut Gui,
    h: WidgetHandle,
    event: &Event,
) -> Option<EventOutput> {
    if *event != Event::Timer {
        return None;
    }
    let secs = gui.now_ms() / 1000;
    let mut text = String::new();
    let _ = write!(text, "Uptime {:02}:{:02}", secs / 60, secs % 60);
    let _ = gui.set_text_owned(h, &text);
    Some(EventOutput::Handled)
}

fn warn(
    gui: &mut Gui,
    message: &str,
) {
    gui.log.push_message(LogLevel::Warn, message);
}

// =============================================================================
// Screens
// =============================================================================

fn build_demo(gui: &mut Gui) -> GuiResult<()> {
    let win = gui.create_window(ID_MAIN, 10.0, 10.0, 300.0, 220.0, None, WidgetFlags::empty())?;

    let title = gui.create_widget(&LABEL, ID_TITLE, 0.0, 0.0, 100.0, 20.0, Some(win), None, WidgetFlags::empty())?;
    gui.set_width(title, 100.0, Unit::Percent);
    gui.set_text(title, "EasyGUI demo")?;

    let counter = gui.create_widget(&LABEL, ID_COUNTER, 10.0, 30.0, 180.0, 20.0, Some(win), None, WidgetFlags::empty())?;
    gui.alloc_text_memory(counter, LABEL_CAPACITY)?;
    gui.set_text(counter, "Not clicked yet")?;

    let click = gui.create_widget(
        &BUTTON,
        ID_CLICK,
        200.0,
        28.0,
        90.0,
        24.0,
        Some(win),
        Some(on_click_me),
        WidgetFlags::empty(),
    )?;
    gui.set_text(click, "Click me")?;

    let edit = gui.create_widget(&EDIT, ID_EDIT, 10.0, 60.0, 280.0, 80.0, Some(win), None, WidgetFlags::empty())?;
    gui.set_text(edit, "Type here")?;

    let open = gui.create_widget(
        &BUTTON,
        ID_OPEN_DIALOG,
        10.0,
        150.0,
        120.0,
        24.0,
        Some(win),
        Some(on_open_dialog),
        WidgetFlags::empty(),
    )?;
    gui.set_text(open, "Open dialog")?;

    let uptime = gui.create_widget(
        &LABEL,
        ID_UPTIME,
        10.0,
        190.0,
        180.0,
        20.0,
        Some(win),
        Some(on_uptime),
        WidgetFlags::empty(),
    )?;
    gui.alloc_text_memory(uptime, LABEL_CAPACITY)?;
    gui.set_text(uptime, "Uptime 00:00")?;
    let timer = gui.timer_create(uptime, UPTIME_PERIOD_MS, true)?;
    gui.timer_start(timer)?;

    gui.focus_set(Some(edit));
    Ok(())
}

fn build_dialog(gui: &mut Gui) -> GuiResult<()> {
    let dialog = gui.create_window(ID_DIALOG, 70.0, 70.0, 180.0, 100.0, None, WidgetFlags::DIALOG_BASE)?;
    let text = gui.create_widget(&LABEL, 0, 10.0, 10.0, 160.0, 40.0, Some(dialog), None, WidgetFlags::empty())?;
    gui.set_text(text, "Dialog on top of\nthe main window")?;
    let close = gui.create_widget(
        &BUTTON,
        ID_DIALOG_CLOSE,
        50.0,
        60.0,
        80.0,
        24.0,
        Some(dialog),
        Some(on_dialog_close),
        WidgetFlags::empty(),
    )?;
    gui.set_text(close, "Close")?;
    Ok(())
}

// =============================================================================
// Input
// =============================================================================

/// Map a key press to the character fed to the GUI.
fn key_char(
    keycode: Keycode,
    keymod: Mod,
) -> Option<char> {
    let shift = keymod.intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD);
    let name = keycode.name();
    match name.as_str() {
        "Tab" => Some(KEY_TAB),
        "Backspace" => Some('\u{8}'),
        "Delete" => Some('\u{7f}'),
        "Return" => Some('\n'),
        "Space" => Some(' '),
        _ => {
            let mut chars = name.chars();
            let ch = chars.next()?;
            if chars.next().is_some() || !ch.is_ascii_graphic() {
                return None;
            }
            Some(if shift { ch.to_ascii_uppercase() } else { ch.to_ascii_lowercase() })
        }
    }
}

fn main() {
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("EasyGUI Simulator", &output_settings);

    let mut fb = FrameBuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    let mut gui = Gui::new(GuiConfig::new().with_log_level(LogLevel::Debug));
    gui.set_default_font(font::profont());
    if let Err(e) = build_demo(&mut gui) {
        eprintln!("demo setup failed: {e}");
        return;
    }

    display.clear(Rgb565::BLACK).ok();
    window.update(&display);

    let mut pressed = false;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::MouseButtonDown { point, .. } => {
                    pressed = true;
                    gui.input_touch(point.x, point.y, true);
                }
                SimulatorEvent::MouseMove { point } if pressed => {
                    gui.input_touch(point.x, point.y, true);
                }
                SimulatorEvent::MouseButtonUp { point, .. } => {
                    pressed = false;
                    gui.input_touch(point.x, point.y, false);
                }
                SimulatorEvent::KeyDown {
                    keycode,
                    keymod,
                    repeat: false,
                } => {
                    if let Some(ch) = key_char(keycode, keymod) {
                        gui.input_key(ch);
                    }
                }
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed().as_millis() as u32;
        if elapsed > 0 {
            gui.tick(elapsed);
            last_tick = Instant::now();
        }

        let stats = gui.process(&mut fb);
        if stats.drawn > 0 {
            fb.flush_to(&mut display).ok();
        }
        window.update(&display);

        for entry in gui.log.iter() {
            println!("[{:>8}] {} {}", entry.timestamp_ms, entry.level.prefix(), entry.message);
        }
        gui.log.clear();

        if let Some(remaining) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }
}
