//! Text measurement and cursor arithmetic for the reply box.
//!
//! Everything here works on `&str` plus a byte offset, so it can be tested
//! without a terminal.

use unicode_width::UnicodeWidthStr;

/// Left + right border of the reply box.
pub(super) const HORIZONTAL_OVERHEAD: u16 = 2;
/// Top + bottom border of the reply box.
pub(super) const VERTICAL_OVERHEAD: u16 = 2;

/// Wrapping that matches what the box renders.
pub(super) fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width.max(1) as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

pub(super) fn inner_width(outer_width: u16) -> u16 {
    outer_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrapped lines in `text`, never less than one.
pub(super) fn line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }
    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }
    count
}

/// Column and row of the cursor inside the wrapped text.
pub(super) fn cursor_offset(text: &str, cursor: usize, width: u16) -> (u16, u16) {
    let before = &text[..cursor.min(text.len())];
    if before.is_empty() || width == 0 {
        return (0, 0);
    }
    if before.ends_with('\n') {
        return (0, line_count(before, width).saturating_sub(1));
    }

    let lines = textwrap::wrap(before, wrap_options(width));
    let row = lines.len().saturating_sub(1) as u16;
    let col = lines.last().map(|l| l.width() as u16).unwrap_or(0);
    if col >= width {
        // cursor sits past a full line; it belongs at the start of the next one
        (0, row + 1)
    } else {
        (col, row)
    }
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

pub(super) fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

pub(super) fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len())
}
