//! Log buffer with levels and timestamps for on-device log viewing.
//!
//! Each [`Gui`](crate::Gui) owns a circular buffer of log entries so the host
//! application can show recent core activity (widget creation, removals,
//! refused operations) on screen. With the `defmt` feature enabled every
//! message is forwarded to `defmt` as well.
//!
//! # Usage
//!
//! ```ignore
//! gui_info!(self.log, "widget {} created", id);
//! gui_warn!(self.log, "remove refused for {}", id);
//! ```

use heapless::String;

use crate::config::{LOG_ENTRIES, LOG_MSG_LEN};

/// Formatted log line, used by the logging macros.
pub type LogLine = String<LOG_MSG_LEN>;

/// Log severity level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[repr(u8)]
pub enum LogLevel {
    /// Verbose debugging
    Trace = 0,
    /// Debug information
    Debug = 1,
    /// Normal operation
    #[default]
    Info = 2,
    /// Warnings
    Warn = 3,
    /// Errors
    Error = 4,
}

impl LogLevel {
    /// Get the single-character prefix for this level.
    pub const fn prefix(self) -> char {
        match self {
            Self::Trace => 'T',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }
}

/// A single log entry with level, message, and timestamp.
#[derive(Clone)]
pub struct LogEntry {
    /// Log severity level.
    pub level: LogLevel,
    /// Log message (truncated to LOG_MSG_LEN).
    pub message: String<LOG_MSG_LEN>,
    /// GUI time in milliseconds when the entry was pushed.
    pub timestamp_ms: u32,
}

impl LogEntry {
    const EMPTY: Self = Self {
        level: LogLevel::Info,
        message: String::new(),
        timestamp_ms: 0,
    };

    /// Create a new log entry.
    pub fn new(
        level: LogLevel,
        message: &str,
        timestamp_ms: u32,
    ) -> Self {
        let mut msg: String<LOG_MSG_LEN> = String::new();
        for (i, c) in message.chars().enumerate() {
            if i >= LOG_MSG_LEN - 1 {
                break;
            }
            msg.push(c).ok();
        }
        Self {
            level,
            message: msg,
            timestamp_ms,
        }
    }
}

impl Default for LogEntry {
    fn default() -> Self { Self::EMPTY }
}

/// Circular buffer of log entries.
pub struct LogBuffer {
    entries: [LogEntry; LOG_ENTRIES],
    head: usize, // Next write position
    count: usize,
    min_level: LogLevel,
    now_ms: u32,
}

impl LogBuffer {
    /// Create a new empty log buffer.
    pub const fn new(min_level: LogLevel) -> Self {
        Self {
            entries: [const { LogEntry::EMPTY }; LOG_ENTRIES],
            head: 0,
            count: 0,
            min_level,
            now_ms: 0,
        }
    }

    /// Check if a level passes the filter.
    #[inline]
    pub fn enabled(
        &self,
        level: LogLevel,
    ) -> bool {
        level >= self.min_level
    }

    /// Change the level filter.
    pub fn set_min_level(
        &mut self,
        level: LogLevel,
    ) {
        self.min_level = level;
    }

    /// Update the timestamp used for new entries.
    pub(crate) fn set_time(
        &mut self,
        now_ms: u32,
    ) {
        self.now_ms = now_ms;
    }

    /// Push a new log entry. Oldest entry is dropped if buffer is full.
    pub fn push(
        &mut self,
        entry: LogEntry,
    ) {
        self.entries[self.head] = entry;
        self.head = (self.head + 1) % LOG_ENTRIES;
        if self.count < LOG_ENTRIES {
            self.count += 1;
        }
    }

    /// Push a message stamped with the current GUI time.
    pub fn push_message(
        &mut self,
        level: LogLevel,
        message: &str,
    ) {
        if self.enabled(level) {
            let entry = LogEntry::new(level, message, self.now_ms);
            self.push(entry);
        }
    }

    /// Get the number of entries in the buffer.
    #[inline]
    pub const fn len(&self) -> usize { self.count }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool { self.count == 0 }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }

    /// Iterate over entries from oldest to newest.
    pub fn iter(&self) -> LogBufferIter<'_> {
        let start = if self.count < LOG_ENTRIES { 0 } else { self.head };
        LogBufferIter {
            buffer: self,
            pos: start,
            remaining: self.count,
        }
    }
}

impl Default for LogBuffer {
    fn default() -> Self { Self::new(LogLevel::Info) }
}

/// Iterator over log buffer entries (oldest to newest).
pub struct LogBufferIter<'a> {
    buffer: &'a LogBuffer,
    pos: usize,
    remaining: usize,
}

impl<'a> Iterator for LogBufferIter<'a> {
    type Item = &'a LogEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = &self.buffer.entries[self.pos];
        self.pos = (self.pos + 1) % LOG_ENTRIES;
        self.remaining -= 1;
        Some(entry)
    }
}

/// Forward a formatted message to defmt.
#[cfg(feature = "defmt")]
#[inline]
pub fn forward(
    level: LogLevel,
    message: &str,
) {
    match level {
        LogLevel::Trace => defmt::trace!("{=str}", message),
        LogLevel::Debug => defmt::debug!("{=str}", message),
        LogLevel::Info => defmt::info!("{=str}", message),
        LogLevel::Warn => defmt::warn!("{=str}", message),
        LogLevel::Error => defmt::error!("{=str}", message),
    }
}

/// Forward a formatted message to defmt (disabled).
#[cfg(not(feature = "defmt"))]
#[inline]
pub fn forward(
    _level: LogLevel,
    _message: &str,
) {
}

#[doc(hidden)]
#[macro_export]
macro_rules! gui_log {
    ($log:expr, $level:expr, $($arg:tt)*) => {{
        let level = $level;
        if $log.enabled(level) {
            use core::fmt::Write;
            let mut buf: $crate::log_buffer::LogLine = $crate::log_buffer::LogLine::new();
            let _ = write!(buf, $($arg)*);
            $crate::log_buffer::forward(level, buf.as_str());
            $log.push_message(level, buf.as_str());
        }
    }};
}

/// Log a message at Trace level.
#[macro_export]
macro_rules! gui_trace {
    ($log:expr, $($arg:tt)*) => {
        $crate::gui_log!($log, $crate::log_buffer::LogLevel::Trace, $($arg)*)
    };
}

/// Log a message at Debug level.
#[macro_export]
macro_rules! gui_debug {
    ($log:expr, $($arg:tt)*) => {
        $crate::gui_log!($log, $crate::log_buffer::LogLevel::Debug, $($arg)*)
    };
}

/// Log a message at Info level.
#[macro_export]
macro_rules! gui_info {
    ($log:expr, $($arg:tt)*) => {
        $crate::gui_log!($log, $crate::log_buffer::LogLevel::Info, $($arg)*)
    };
}

/// Log a message at Warn level.
#[macro_export]
macro_rules! gui_warn {
    ($log:expr, $($arg:tt)*) => {
        $crate::gui_log!($log, $crate::log_buffer::LogLevel::Warn, $($arg)*)
    };
}

/// Log a message at Error level.
#[macro_export]
macro_rules! gui_error {
    ($log:expr, $($arg:tt)*) => {
        $crate::gui_log!($log, $crate::log_buffer::LogLevel::Error, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_iter_order() {
        let mut log = LogBuffer::new(LogLevel::Trace);
        log.push_message(LogLevel::Info, "first");
        log.push_message(LogLevel::Warn, "second");
        let msgs: Vec<&str> = log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(msgs, ["first", "second"]);
    }

    #[test]
    fn test_wraps_oldest_out() {
        let mut log = LogBuffer::new(LogLevel::Trace);
        for i in 0..LOG_ENTRIES + 3 {
            gui_info!(log, "entry {}", i);
        }
        assert_eq!(log.len(), LOG_ENTRIES);
        let first = log.iter().next().map(|e| e.message.clone());
        assert_eq!(first.as_deref(), Some("entry 3"));
    }

    #[test]
    fn test_level_filter() {
        let mut log = LogBuffer::new(LogLevel::Warn);
        gui_debug!(log, "hidden");
        gui_error!(log, "shown");
        assert_eq!(log.len(), 1);
        assert_eq!(log.iter().next().map(|e| e.level), Some(LogLevel::Error));
    }

    #[test]
    fn test_message_truncated() {
        let long = "x".repeat(LOG_MSG_LEN * 2);
        let entry = LogEntry::new(LogLevel::Info, &long, 5);
        assert_eq!(entry.message.len(), LOG_MSG_LEN - 1);
        assert_eq!(entry.timestamp_ms, 5);
    }

    #[test]
    fn test_timestamp_from_gui_time() {
        let mut log = LogBuffer::default();
        log.set_time(1234);
        gui_info!(log, "tick");
        assert_eq!(log.iter().next().map(|e| e.timestamp_ms), Some(1234));
    }
}
