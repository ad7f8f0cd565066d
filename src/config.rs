//! Configuration constants and runtime options for the GUI core.
//!
//! Compile-time sizes (queues, caches, log ring) live here as constants so
//! firmware builds can tune memory without touching the core. Options that a
//! host application may want to toggle per instance go through [`GuiConfig`].

use crate::log_buffer::LogLevel;

// =============================================================================
// Display
// =============================================================================

/// Default display width in pixels.
pub const SCREEN_WIDTH: u32 = 320;

/// Default display height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

// =============================================================================
// Memory Bounds
// =============================================================================

/// Maximum rasterised glyphs kept by the glyph cache before LRU eviction.
pub const GLYPH_CACHE_SIZE: usize = 64;

/// Pending touch and key events kept by the input queue.
pub const INPUT_QUEUE_SIZE: usize = 16;

/// Maximum number of log entries to keep.
pub const LOG_ENTRIES: usize = 32;

/// Maximum characters per log message.
pub const LOG_MSG_LEN: usize = 64;

// =============================================================================
// Drawing
// =============================================================================

/// Minimum scrollbar thumb height in pixels.
pub const SCROLLBAR_MIN_THUMB: i32 = 6;

// =============================================================================
// Input Timing
// =============================================================================

/// Two releases within this window form a double click.
pub const DOUBLE_CLICK_MS: u32 = 300;

/// Press held this long without release fires a long click.
pub const LONG_CLICK_MS: u32 = 2000;

/// Maximum distance between the two presses of a double click.
pub const DOUBLE_CLICK_DISTANCE: i32 = 30;

/// Runtime configuration for one [`Gui`](crate::Gui) instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuiConfig {
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
    /// Keep absolute position/size/visible rect cached per widget.
    pub position_cache: bool,
    /// Lowest level recorded in the log buffer.
    pub log_level: LogLevel,
}

impl GuiConfig {
    pub const fn new() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            position_cache: true,
            log_level: LogLevel::Info,
        }
    }

    /// Set the display size.
    pub const fn with_size(
        mut self,
        width: u32,
        height: u32,
    ) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enable or disable the absolute geometry cache.
    pub const fn with_position_cache(
        mut self,
        enabled: bool,
    ) -> Self {
        self.position_cache = enabled;
        self
    }

    pub const fn with_log_level(
        mut self,
        level: LogLevel,
    ) -> Self {
        self.log_level = level;
        self
    }
}

impl Default for GuiConfig {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = GuiConfig::default();
        assert_eq!((cfg.width, cfg.height), (SCREEN_WIDTH, SCREEN_HEIGHT));
        assert!(cfg.position_cache);
        assert_eq!(cfg.log_level, LogLevel::Info);
    }

    #[test]
    fn test_builder_chain() {
        let cfg = GuiConfig::new()
            .with_size(480, 272)
            .with_position_cache(false)
            .with_log_level(LogLevel::Trace);
        assert_eq!((cfg.width, cfg.height), (480, 272));
        assert!(!cfg.position_cache);
        assert_eq!(cfg.log_level, LogLevel::Trace);
    }
}
