//! EasyGUI core - retained-mode widget toolkit for embedded displays.
//!
//! The crate owns the widget tree, invalidation and redraw engine, z-ordering,
//! clipping, text layout and glyph rasterisation. Hardware is reached only
//! through the [`ll::LowLevel`] trait; a software [`ll::framebuffer::FrameBuffer`]
//! is provided for host tests and the desktop simulator.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test --lib
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while firmware builds stay `no_std` + `alloc`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_arguments)]

extern crate alloc;

// Ambient
pub mod colors;
pub mod config;
pub mod error;
#[macro_use]
pub mod log_buffer;

// Containers
pub mod linkedlist;

// Rendering
pub mod draw;
pub mod ll;
pub mod text;

// Widget core
pub mod gui;
pub mod input;
pub mod timer;
pub mod widget;

pub use colors::Color;
pub use config::GuiConfig;
pub use draw::{Canvas, Region};
pub use error::{GuiError, GuiResult};
pub use gui::{Gui, ProcessStats};
pub use widget::{Event, EventOutput, GuiId, Widget, WidgetFlags, WidgetHandle, WidgetKind};
