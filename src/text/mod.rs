//! Font format and text layout.
//!
//! # Font Format
//!
//! A [`Font`] covers a contiguous character range. Each [`FontChar`] carries
//! its bitmap size, a vertical draw offset, a right margin and packed rows:
//! 1 bit per pixel (MSB first) or, for anti-aliased fonts, 2 bits per pixel
//! (four levels of coverage, first pixel in the top bits). Rows are padded to
//! whole bytes.
//!
//! # Line Measurement
//!
//! [`measure_line`] answers "how much of the text starting at this position
//! goes on one line of this width". Because whitespace at line ends is
//! collapsed, it returns separate counts:
//!
//! | Field   | Meaning                                               |
//! |---------|-------------------------------------------------------|
//! | `skip`  | leading whitespace dropped before the line            |
//! | `read`  | characters after `skip` consumed by this line         |
//! | `draw`  | characters after `skip` actually rendered             |
//! | `width` | pixel width of the rendered characters                |
//!
//! The next line starts at `start + skip + read`. Positions are character
//! indices, not byte offsets.

pub mod cache;

use bitflags::bitflags;

pub use cache::{CacheStats, CachedGlyph, GlyphCache};

// =============================================================================
// Font
// =============================================================================

/// One character of a [`Font`].
#[derive(Clone, Copy, Debug)]
pub struct FontChar {
    /// Bitmap width in pixels.
    pub width: u8,
    /// Bitmap height in pixels.
    pub height: u8,
    /// Offset from the line top to the first bitmap row.
    pub y_pos: u8,
    /// Spacing after the bitmap.
    pub x_margin: u8,
    /// Packed rows.
    pub data: &'static [u8],
}

impl FontChar {
    /// Horizontal advance in pixels.
    #[inline]
    pub const fn advance(&self) -> i32 { self.width as i32 + self.x_margin as i32 }

    /// Bytes per packed bitmap row.
    #[inline]
    pub const fn row_bytes(
        &self,
        antialiased: bool,
    ) -> usize {
        let per_byte = if antialiased { 4 } else { 8 };
        (self.width as usize).div_ceil(per_byte)
    }

    /// Coverage of a pixel in `0..=3` (1 bpp fonts give 0 or 3).
    pub fn coverage(
        &self,
        antialiased: bool,
        x: usize,
        y: usize,
    ) -> u8 {
        let row = y * self.row_bytes(antialiased);
        if antialiased {
            let byte = self.data.get(row + x / 4).copied().unwrap_or(0);
            (byte >> (6 - 2 * (x % 4))) & 0x03
        } else {
            let byte = self.data.get(row + x / 8).copied().unwrap_or(0);
            if byte & (0x80 >> (x % 8)) != 0 { 3 } else { 0 }
        }
    }
}

/// Bitmap font covering characters `first..=last`.
#[derive(Debug)]
pub struct Font {
    /// Nominal pixel size, the default line height.
    pub size: u8,
    pub first: u32,
    pub last: u32,
    /// 2 bpp rows when set, 1 bpp otherwise.
    pub antialiased: bool,
    pub chars: &'static [FontChar],
}

impl Font {
    /// Identity used as glyph cache key.
    #[inline]
    pub fn id(&self) -> usize { self as *const Self as usize }

    fn lookup(
        &self,
        code: u32,
    ) -> Option<(u32, &FontChar)> {
        if code >= self.first && code <= self.last {
            self.chars.get((code - self.first) as usize).map(|c| (code, c))
        } else {
            None
        }
    }

    /// Glyph for `ch` and the code it resolved to.
    ///
    /// CR and LF map to space; unknown characters fall back to `?`.
    pub fn glyph(
        &self,
        ch: char,
    ) -> Option<(u32, &FontChar)> {
        let ch = if is_line_break(ch) { ' ' } else { ch };
        self.lookup(ch as u32).or_else(|| self.lookup('?' as u32))
    }

    /// Advance of `ch`, 0 when the font has neither it nor `?`.
    #[inline]
    pub fn char_width(
        &self,
        ch: char,
    ) -> i32 {
        self.glyph(ch).map_or(0, |(_, c)| c.advance())
    }

    /// Sum of advances of a string.
    pub fn string_width(
        &self,
        text: &str,
    ) -> i32 {
        text.chars().map(|c| self.char_width(c)).sum()
    }
}

#[inline]
const fn is_line_break(ch: char) -> bool { ch == '\r' || ch == '\n' }

#[inline]
const fn is_space(ch: char) -> bool { ch == ' ' || is_line_break(ch) }

// =============================================================================
// Text Area
// =============================================================================

bitflags! {
    /// Text layout options.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct TextFlags: u8 {
        /// Wrap into multiple lines.
        const MULTILINE = 1 << 0;
        /// Keep whitespace as typed and pin overflowing text to the bottom.
        const EDIT_MODE = 1 << 1;
        /// Show the end of a too-long text instead of its beginning.
        const RIGHT_ALIGN = 1 << 2;
    }
}

/// Horizontal alignment of each line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment of the text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Where and how [`Canvas::write_text`](crate::draw::Canvas::write_text) lays out text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub halign: HAlign,
    pub valign: VAlign,
    pub flags: TextFlags,
    /// Pixels between line tops, 0 uses the font size.
    pub line_height: i32,
    /// Color left of `x + color1_width`.
    pub color1: crate::Color,
    /// Color right of `x + color1_width`.
    pub color2: crate::Color,
    pub color1_width: i32,
    pub scroll_y: i32,
}

impl TextArea {
    /// Single-color, top-left aligned area.
    pub const fn new(
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: crate::Color,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            halign: HAlign::Left,
            valign: VAlign::Top,
            flags: TextFlags::empty(),
            line_height: 0,
            color1: color,
            color2: color,
            color1_width: width,
            scroll_y: 0,
        }
    }

    pub const fn with_align(
        mut self,
        halign: HAlign,
        valign: VAlign,
    ) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    pub const fn with_flags(
        mut self,
        flags: TextFlags,
    ) -> Self {
        self.flags = flags;
        self
    }

    /// Draw the first `color1_width` pixels in `color1` and the rest in `color2`.
    pub const fn with_split_color(
        mut self,
        color2: crate::Color,
        color1_width: i32,
    ) -> Self {
        self.color2 = color2;
        self.color1_width = color1_width;
        self
    }
}

// =============================================================================
// Measurement
// =============================================================================

/// Result of measuring one visual line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LineMeasure {
    pub skip: usize,
    pub read: usize,
    pub draw: usize,
    pub width: i32,
    /// The line was closed by the end of the text.
    pub end: bool,
}

impl LineMeasure {
    /// Characters to advance past this line.
    #[inline]
    pub const fn advance(&self) -> usize { self.skip + self.read }
}

/// Size of a laid-out text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TextBounds {
    /// Widest line.
    pub width: i32,
    /// `line_height * lines`.
    pub height: i32,
    pub lines: usize,
}

/// Whitespace and word runs at the end of the line being measured.
#[derive(Default)]
struct LineScan {
    cnt: usize,
    width: i32,
    space_index: usize,
    space_count: usize,
    space_width: i32,
    chars_index: usize,
    chars_count: usize,
    chars_width: i32,
    line_feed: bool,
}

impl LineScan {
    /// Apply the line-closing policy.
    fn close(
        mut self,
        skip: usize,
        edit: bool,
        end: bool,
    ) -> LineMeasure {
        let mut draw = self.cnt;
        let mut read = self.cnt;
        if edit {
            if self.line_feed {
                draw = draw.saturating_sub(1);
            }
            // Overlong trailing word moves to the next line
            if self.chars_index > self.space_index && !end {
                self.width -= self.chars_width;
                draw = draw.saturating_sub(self.chars_count);
                read = read.saturating_sub(self.chars_count);
            }
            return LineMeasure {
                skip,
                read,
                draw,
                width: self.width,
                end,
            };
        }
        if self.space_index > self.chars_index {
            // Trailing whitespace is read but neither drawn nor measured
            self.width -= self.space_width;
            draw = draw.saturating_sub(self.space_count);
        } else if self.chars_index > self.space_index && !end {
            // Partial word and the whitespace before it go to the next line
            self.cnt -= self.chars_count;
            self.width -= self.chars_width;
            draw = draw.saturating_sub(self.chars_count);
            if self.space_index + self.space_count == self.chars_index {
                self.width -= self.space_width;
                draw = draw.saturating_sub(self.space_count);
            }
            read = self.cnt;
        }
        LineMeasure {
            skip,
            read,
            draw,
            width: self.width,
            end,
        }
    }
}

/// Measure the line of `text` starting at character `start` in a box `width`
/// pixels wide.
pub fn measure_line(
    font: &Font,
    text: &str,
    start: usize,
    width: i32,
    flags: TextFlags,
) -> LineMeasure {
    if !flags.contains(TextFlags::MULTILINE) {
        return measure_single_line(font, text, start, width, flags);
    }
    let edit = flags.contains(TextFlags::EDIT_MODE);
    let mut scan = LineScan::default();
    let mut skip = 0;
    let mut last_space = false;

    for ch in text.chars().skip(start) {
        let line_feed = ch == '\n';
        let space = is_space(ch);
        scan.line_feed = line_feed;

        if space {
            if !last_space {
                scan.space_index = scan.cnt;
                scan.space_count = 0;
                scan.space_width = 0;
            }
            if scan.space_index == 0 && !edit && !line_feed {
                skip += 1;
                last_space = true;
                continue;
            }
        } else if last_space {
            scan.chars_index = scan.cnt;
            scan.chars_count = 0;
            scan.chars_width = 0;
        }

        if line_feed {
            scan.cnt += 1;
            scan.space_count += 1;
            return scan.close(skip, edit, false);
        }
        let w = font.char_width(ch);
        if scan.width + w >= width {
            return scan.close(skip, edit, false);
        }
        scan.width += w;
        if space {
            scan.space_count += 1;
            scan.space_width += w;
        } else {
            scan.chars_count += 1;
            scan.chars_width += w;
        }
        scan.cnt += 1;
        last_space = space;
    }
    scan.line_feed = false;
    scan.close(skip, edit, true)
}

fn measure_single_line(
    font: &Font,
    text: &str,
    start: usize,
    width: i32,
    flags: TextFlags,
) -> LineMeasure {
    let right = flags.contains(TextFlags::RIGHT_ALIGN);
    let mut cnt = 0;
    let mut total = 0;
    let mut end = true;
    for ch in text.chars().skip(start) {
        let w = font.char_width(ch);
        if !right && total + w > width {
            end = false;
            break;
        }
        if !is_line_break(ch) {
            total += w;
        }
        cnt += 1;
    }
    LineMeasure {
        skip: 0,
        read: cnt,
        draw: cnt,
        width: total,
        end,
    }
}

/// Measure the whole text block.
pub fn measure_box(
    font: &Font,
    text: &str,
    width: i32,
    flags: TextFlags,
    line_height: i32,
) -> TextBounds {
    let mut bounds = TextBounds::default();
    let mut pos = 0;
    loop {
        let line = measure_line(font, text, pos, width, flags);
        bounds.lines += 1;
        bounds.width = bounds.width.max(line.width);
        pos += line.advance();
        if line.end || line.advance() == 0 || !flags.contains(TextFlags::MULTILINE) {
            break;
        }
    }
    bounds.height = line_height * bounds.lines as i32;
    bounds
}

/// Start position and X shift that show the end of `text` in `width` pixels.
///
/// Scans back from the last character while the accumulated advance stays
/// below `width`.
pub fn right_aligned_start(
    font: &Font,
    text: &str,
    width: i32,
) -> (usize, i32) {
    let count = text.chars().count();
    let mut total = 0;
    for (i, ch) in text.chars().rev().enumerate() {
        let w = font.char_width(ch);
        if total + w < width {
            total += w;
        } else {
            return (count - i, width - total);
        }
    }
    (0, 0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 8x1 solid block, 1 bpp.
    static SOLID: [u8; 1] = [0xFF];
    /// 2 bpp row: full, 2/3, 1/3, empty.
    static AA_ROW: [u8; 1] = [0b11_10_01_00];

    /// Monospace test font: every glyph 8 px wide plus 2 px margin (10 px advance).
    static MONO_CHARS: [FontChar; 95] = [FontChar {
        width: 8,
        height: 1,
        y_pos: 0,
        x_margin: 2,
        data: &SOLID,
    }; 95];

    pub static MONO: Font = Font {
        size: 10,
        first: ' ' as u32,
        last: '~' as u32,
        antialiased: false,
        chars: &MONO_CHARS,
    };

    static AA_CHARS: [FontChar; 1] = [FontChar {
        width: 4,
        height: 1,
        y_pos: 0,
        x_margin: 0,
        data: &AA_ROW,
    }];

    pub static AA_FONT: Font = Font {
        size: 1,
        first: '?' as u32,
        last: '?' as u32,
        antialiased: true,
        chars: &AA_CHARS,
    };

    fn ml() -> TextFlags { TextFlags::MULTILINE }

    #[test]
    fn test_glyph_lookup_and_fallback() {
        assert_eq!(MONO.glyph('A').map(|(c, _)| c), Some('A' as u32));
        assert_eq!(MONO.glyph('\n').map(|(c, _)| c), Some(' ' as u32), "LF maps to space");
        assert_eq!(MONO.glyph('\u{e9}').map(|(c, _)| c), Some('?' as u32), "Unknown falls back to '?'");
        assert_eq!(AA_FONT.char_width('x'), 4);
        assert_eq!(MONO.string_width("abc"), 30);
    }

    #[test]
    fn test_coverage_decoding() {
        let (_, g) = AA_FONT.glyph('?').unwrap();
        let levels: Vec<u8> = (0..4).map(|x| g.coverage(true, x, 0)).collect();
        assert_eq!(levels, [3, 2, 1, 0]);
        let (_, m) = MONO.glyph('A').unwrap();
        assert_eq!(m.coverage(false, 7, 0), 3);
        assert_eq!(m.row_bytes(false), 1);
    }

    #[test]
    fn test_wrap_excludes_space_before_next_word() {
        let line = measure_line(&MONO, "AAAA BBBB", 0, 50, ml());
        assert_eq!(line.read, 4);
        assert_eq!(line.draw, 4);
        assert_eq!(line.width, 40);
        assert!(!line.end);

        let next = measure_line(&MONO, "AAAA BBBB", line.advance(), 50, ml());
        assert_eq!(next.skip, 1, "Leading space of the second line is skipped");
        assert_eq!((next.read, next.draw, next.width), (4, 4, 40));
        assert!(next.end);
    }

    #[test]
    fn test_partial_word_deferred_with_its_space() {
        let line = measure_line(&MONO, "AA BBBBB", 0, 50, ml());
        assert_eq!(line.read, 3, "Space is consumed by the first line");
        assert_eq!(line.draw, 2);
        assert_eq!(line.width, 20);
        let next = measure_line(&MONO, "AA BBBBB", line.advance(), 50, ml());
        assert_eq!(next.skip, 0);
        assert_eq!(next.read, 4, "Overlong word is split where it overflows");
    }

    #[test]
    fn test_line_feed_forces_break() {
        let line = measure_line(&MONO, "AB\nCD", 0, 200, ml());
        assert_eq!((line.read, line.draw, line.width), (3, 2, 20));
        let next = measure_line(&MONO, "AB\nCD", 3, 200, ml());
        assert_eq!((next.read, next.draw), (2, 2));
        assert!(next.end);
    }

    #[test]
    fn test_edit_mode_keeps_spaces() {
        let flags = TextFlags::MULTILINE | TextFlags::EDIT_MODE;
        let line = measure_line(&MONO, "  AB", 0, 200, flags);
        assert_eq!((line.skip, line.read, line.draw), (0, 4, 4));
        let lf = measure_line(&MONO, "AB\n", 0, 200, flags);
        assert_eq!((lf.read, lf.draw), (3, 2), "Forced break is not drawn");
    }

    #[test]
    fn test_edit_mode_pushes_trailing_word() {
        let flags = TextFlags::MULTILINE | TextFlags::EDIT_MODE;
        let line = measure_line(&MONO, "AA BBBBB", 0, 50, flags);
        assert_eq!((line.read, line.draw, line.width), (3, 3, 30));
    }

    #[test]
    fn test_measure_idempotent() {
        let text = "The quick brown fox jumps";
        let mut pos = 0;
        while pos < text.chars().count() {
            let first = measure_line(&MONO, text, pos, 70, ml());
            let again = measure_line(&MONO, text, pos, 70, ml());
            assert_eq!(first, again);
            if first.advance() == 0 {
                break;
            }
            pos += first.advance();
        }
    }

    #[test]
    fn test_single_line_stops_at_width() {
        let line = measure_line(&MONO, "ABCDEFG", 0, 50, TextFlags::empty());
        assert_eq!((line.read, line.width), (5, 50));
        assert!(!line.end);
        let right = measure_line(&MONO, "ABCDEFG", 0, 50, TextFlags::RIGHT_ALIGN);
        assert_eq!(right.read, 7, "Right aligned text is not cut");
    }

    #[test]
    fn test_measure_box() {
        let b = measure_box(&MONO, "AAAA BBBB", 50, ml(), 12);
        assert_eq!(b, TextBounds { width: 40, height: 24, lines: 2 });
        let empty = measure_box(&MONO, "", 50, ml(), 12);
        assert_eq!((empty.lines, empty.height, empty.width), (1, 12, 0));
        let trailing = measure_box(&MONO, "AB\n", 100, ml(), 10);
        assert_eq!(trailing.lines, 2, "Trailing line feed opens an empty line");
    }

    #[test]
    fn test_right_aligned_start() {
        // 7 chars of 10 px in 45 px: last 4 fit (40 < 45)
        let (start, shift) = right_aligned_start(&MONO, "ABCDEFG", 45);
        assert_eq!(start, 3);
        assert_eq!(shift, 5);
    }
}
