// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Helpers shared by the language lexers: fold level and line state packing,
//! task markers, brace and comment line lookups.

use crate::accessor::Accessor;
use crate::charclass::{is_identifier_char, is_space_char, is_space_or_tab, is_upper};
use crate::context::StyleContext;

pub const FOLD_LEVEL_BASE: i32 = 0x400;
pub const FOLD_LEVEL_NUMBER_MASK: u32 = 0x0fff;
pub const FOLD_LEVEL_WHITE_FLAG: u32 = 0x1000;
pub const FOLD_LEVEL_HEADER_FLAG: u32 = 0x2000;

/// The fold information of one line: its own level and the level of the line after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoldLevel {
    pub current: i32,
    pub next: i32,
    pub header: bool,
    /// A blank line, for hosts that hide trailing blank lines of a fold.
    pub white: bool,
}

impl Default for FoldLevel {
    fn default() -> Self {
        Self { current: FOLD_LEVEL_BASE, next: FOLD_LEVEL_BASE, header: false, white: false }
    }
}

impl FoldLevel {
    /// A line at `current` whose successor is at `next`. It's a header if it opens a level.
    pub fn new(current: i32, next: i32) -> Self {
        Self { current, next, header: current < next, white: false }
    }

    /// Levels are clamped to `0..=FOLD_LEVEL_NUMBER_MASK`. A header whose
    /// levels clamp to the same number is packed as a plain line.
    pub fn pack(&self) -> u32 {
        let clamp = |level: i32| (level.max(0) as u32).min(FOLD_LEVEL_NUMBER_MASK);
        let (current, next) = (clamp(self.current), clamp(self.next));
        let mut packed = current | (next << 16);
        if self.header && current < next {
            packed |= FOLD_LEVEL_HEADER_FLAG;
        }
        if self.white {
            packed |= FOLD_LEVEL_WHITE_FLAG;
        }
        packed
    }

    pub fn unpack(packed: u32) -> Self {
        Self {
            current: (packed & FOLD_LEVEL_NUMBER_MASK) as i32,
            next: ((packed >> 16) & FOLD_LEVEL_NUMBER_MASK) as i32,
            header: packed & FOLD_LEVEL_HEADER_FLAG != 0,
            white: packed & FOLD_LEVEL_WHITE_FLAG != 0,
        }
    }
}

/// The level the line after `line` starts at, as recorded by a previous fold pass.
pub fn level_after(styler: &dyn Accessor, line: usize) -> i32 {
    FoldLevel::unpack(styler.level_at(line)).next
}

const NESTED_COUNT_BITS: u32 = 3;
const NESTED_VALUE_BITS: u32 = 3;
pub const MAX_NESTED_STATES: usize = (1 << NESTED_COUNT_BITS) - 1;

/// Packs a stack of small state codes (0..8) into 24 bits: a 3-bit count
/// followed by 3 bits per entry, outermost first. Only the innermost
/// [`MAX_NESTED_STATES`] entries survive.
pub fn pack_nested_states(codes: &[u8]) -> u32 {
    let skip = codes.len().saturating_sub(MAX_NESTED_STATES);
    let codes = &codes[skip..];
    let mut packed = codes.len() as u32;
    for (i, &code) in codes.iter().enumerate() {
        let shift = NESTED_COUNT_BITS + i as u32 * NESTED_VALUE_BITS;
        packed |= (code as u32 & ((1 << NESTED_VALUE_BITS) - 1)) << shift;
    }
    packed
}

pub fn unpack_nested_states(packed: u32) -> Vec<u8> {
    let count = (packed & ((1 << NESTED_COUNT_BITS) - 1)) as usize;
    (0..count)
        .map(|i| {
            let shift = NESTED_COUNT_BITS + i as u32 * NESTED_VALUE_BITS;
            ((packed >> shift) & ((1 << NESTED_VALUE_BITS) - 1)) as u8
        })
        .collect()
}

/// Highlights an upper case marker like `TODO:` or `FIXME` near the start of a comment.
///
/// `visible_chars` counts the visible characters on the line so far and
/// `visible_chars_before` the count when the comment started. Returns true if
/// the cursor was moved past a marker.
pub fn highlight_task_marker(
    sc: &mut StyleContext,
    visible_chars: usize,
    visible_chars_before: usize,
    marker_style: u8,
) -> bool {
    if visible_chars > visible_chars_before + 3 || !is_upper(sc.ch) || is_identifier_char(sc.ch_prev) {
        return false;
    }

    let mut len = 1;
    while is_upper(sc.relative(len)) {
        len += 1;
    }
    let end = sc.relative(len);
    if len < 3 || !(end == b':' || end == b'(' || end == 0 || is_space_char(end)) {
        return false;
    }

    let state = sc.state;
    sc.set_state(marker_style);
    sc.forward_by(len);
    sc.set_state(state);
    true
}

/// For `header\n{`, returns the position of the brace on the line after `line`,
/// so that the fold can start at the header line.
pub fn check_brace_on_next_line(
    styler: &dyn Accessor,
    line: usize,
    operator_style: u8,
    is_space_equiv: impl Fn(u8) -> bool,
) -> Option<usize> {
    let next_start = styler.line_start(line + 1);
    if next_start >= styler.len() {
        return None;
    }

    let mut brace_pos = next_start;
    while is_space_or_tab(styler.char_at(brace_pos)) {
        brace_pos += 1;
    }
    if styler.char_at(brace_pos) != b'{' || styler.style_at(brace_pos) != operator_style {
        return None;
    }

    // Find the last significant character on the current line.
    let start = styler.line_start(line);
    let mut pos = next_start;
    let (ch, style) = loop {
        if pos <= start {
            // Empty or comment-only line.
            return None;
        }
        pos -= 1;
        let ch = styler.char_at(pos);
        let style = styler.style_at(pos);
        if !is_space_char(ch) && !is_space_equiv(style) {
            break (ch, style);
        }
    };

    if style == operator_style && !matches!(ch, b')' | b']' | b'>') {
        return None;
    }
    Some(brace_pos)
}

/// Whether the first visible character on `line` has one of `styles`.
pub fn is_comment_line(styler: &dyn Accessor, line: usize, styles: &[u8]) -> bool {
    let start = styler.line_start(line);
    let end = styler.line_start(line + 1);
    (start..end)
        .find(|&pos| !is_space_char(styler.char_at(pos)))
        .is_some_and(|pos| styles.contains(&styler.style_at(pos)))
}

/// Number of consecutive `delimiter` bytes starting at `pos`.
pub fn matched_delimiter_count(styler: &dyn Accessor, pos: usize, delimiter: u8) -> usize {
    let mut count = 0;
    while styler.char_at(pos + count) == delimiter {
        count += 1;
    }
    count
}

/// Moves the start of a pass back to the first line of a construct that
/// spans the preceding lines, as flagged by `mask` in their line states.
///
/// Returns the new `(start, len, init_style)`.
pub fn backtrack_to_start(
    styler: &dyn Accessor,
    mask: u32,
    start: usize,
    len: usize,
    init_style: u8,
) -> (usize, usize, u8) {
    let current_line = styler.line_of(start);
    if current_line == 0 {
        return (start, len, init_style);
    }

    let mut line = current_line - 1;
    while line > 0 && styler.line_state(line) & mask != 0 {
        line -= 1;
    }
    if styler.line_state(line) & mask == 0 {
        line += 1;
    }
    if line == current_line {
        return (start, len, init_style);
    }

    let end = start + len;
    let start = styler.line_start(line);
    let init_style = if start == 0 { 0 } else { styler.style_at(start - 1) };
    (start, end - start, init_style)
}

/// Indentation after a tab, with tab stops every 4 columns.
pub const fn tab_indent_count(indent: u32) -> u32 {
    (indent & !3) + 4
}

/// Line state layout for indentation based folding.
///
/// Bits 0..8 hold flags, bits 8..16 are free for the language, bits 16.. hold the indentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndentLineState {
    pub empty_line: bool,
    pub comment_line: bool,
    /// The line ends inside a multi-line string or comment.
    pub multiline: bool,
    /// The line starts with a closing token (`end`, `)`, ...).
    pub close_brace: bool,
    /// The line ends inside an interpolated expression.
    pub interpolation: bool,
    pub extra: u8,
    pub indent: u16,
}

impl IndentLineState {
    pub const INTERPOLATION_MASK: u32 = 1 << 4;

    pub fn pack(&self) -> u32 {
        (self.empty_line as u32)
            | (self.comment_line as u32) << 1
            | (self.multiline as u32) << 2
            | (self.close_brace as u32) << 3
            | (self.interpolation as u32) << 4
            | (self.extra as u32) << 8
            | (self.indent as u32) << 16
    }

    pub fn unpack(packed: u32) -> Self {
        Self {
            empty_line: packed & 1 != 0,
            comment_line: packed & (1 << 1) != 0,
            multiline: packed & (1 << 2) != 0,
            close_brace: packed & (1 << 3) != 0,
            interpolation: packed & (1 << 4) != 0,
            extra: (packed >> 8) as u8,
            indent: (packed >> 16) as u16,
        }
    }
}

enum IndentLine {
    /// Starts inside a construct begun on an earlier line.
    Continuation,
    /// Empty or comment only.
    Blank,
    Code { indent: i32, close_brace: bool },
}

fn classify_indent_line(styler: &dyn Accessor, line: usize) -> IndentLine {
    if line > 0 && IndentLineState::unpack(styler.line_state(line - 1)).multiline {
        return IndentLine::Continuation;
    }
    let state = IndentLineState::unpack(styler.line_state(line));
    if state.empty_line || state.comment_line {
        IndentLine::Blank
    } else {
        IndentLine::Code { indent: state.indent as i32, close_brace: state.close_brace }
    }
}

fn code_level(indent: i32, close_brace: bool, prev_code: i32) -> i32 {
    let own = FOLD_LEVEL_BASE + indent;
    // A closing line belongs to the block it closes, but not to anything nested deeper.
    if close_brace && prev_code > own { prev_code.min(own + 1) } else { own }
}

/// Indentation based folding for languages whose colouriser records [`IndentLineState`]s.
///
/// Code lines fold by indentation. Blank and comment lines take the deeper of
/// the surrounding code levels and lines inside a multi-line string sit one
/// level below the line that opened it.
pub fn fold_indent(start: usize, len: usize, styler: &mut dyn Accessor) {
    let line_count = styler.line_count();
    let last = if len == 0 { styler.line_of(start) } else { styler.line_of(start + len - 1) };
    // Blank lines right before the range take their level from the code in it,
    // and the line before them may become a header.
    let mut first = styler.line_of(start);
    while first > 0 && matches!(classify_indent_line(styler, first - 1), IndentLine::Blank) {
        first -= 1;
    }
    let first = first.saturating_sub(1);

    let mut prev_code = FOLD_LEVEL_BASE;
    for line in (0..first).rev() {
        if let IndentLine::Code { .. } = classify_indent_line(styler, line) {
            prev_code = FoldLevel::unpack(styler.level_at(line)).current;
            break;
        }
    }

    let mut next_code: Option<(usize, i32)> = None;
    let mut levels = Vec::with_capacity(last - first + 2);
    for line in first..(last + 2).min(line_count) {
        let level = match classify_indent_line(styler, line) {
            IndentLine::Continuation => prev_code + 1,
            IndentLine::Blank => {
                if next_code.is_none_or(|(l, _)| l < line) {
                    let mut found = (line_count, FOLD_LEVEL_BASE);
                    for l in line + 1..line_count {
                        if let IndentLine::Code { indent, close_brace } = classify_indent_line(styler, l) {
                            found = (l, code_level(indent, close_brace, prev_code));
                            break;
                        }
                    }
                    next_code = Some(found);
                }
                let next = next_code.map_or(FOLD_LEVEL_BASE, |(_, level)| level);
                prev_code.max(next)
            }
            IndentLine::Code { indent, close_brace } => {
                prev_code = code_level(indent, close_brace, prev_code);
                prev_code
            }
        };
        levels.push(level);
    }

    for (i, line) in (first..=last.min(line_count.saturating_sub(1))).enumerate() {
        let current = levels[i];
        let next = levels.get(i + 1).copied().unwrap_or(current);
        styler.set_level(line, FoldLevel::new(current, next).pack());
    }
}
