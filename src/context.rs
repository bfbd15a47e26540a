// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The forward-only cursor every colouriser is written against.

use crate::accessor::Accessor;
use crate::charclass::{is_space_char, is_space_or_tab};

/// Longest token text handed out by [`StyleContext::get_current`].
/// Keywords are all shorter, so truncation never produces a false match.
pub const MAX_TOKEN_LEN: usize = 128;

/// Walks a range of the document one byte at a time and commits style runs.
///
/// The current run starts where the last `set_state` happened and is written
/// to the accessor on the next `set_state` or on `complete`. `change_state`
/// only relabels the pending run.
pub struct StyleContext<'a> {
    styler: &'a mut dyn Accessor,
    doc_len: usize,
    end_pos: usize,
    run_start: usize,
    line_count: usize,
    line_start_next: usize,
    /// Last line whose state was set while on a real byte.
    line_state_written: Option<usize>,

    pub current_pos: usize,
    pub current_line: usize,
    pub state: u8,
    pub ch_prev: u8,
    pub ch: u8,
    pub ch_next: u8,
    pub at_line_start: bool,
    pub at_line_end: bool,
}

impl<'a> StyleContext<'a> {
    pub fn new(start: usize, len: usize, init_style: u8, styler: &'a mut dyn Accessor) -> Self {
        let doc_len = styler.len();
        let start = start.min(doc_len);
        let mut end_pos = start.saturating_add(len).min(doc_len);
        if end_pos == doc_len {
            // One virtual position past the end, so that a token ending
            // with the document still sees its terminating character (0).
            end_pos += 1;
        }
        let current_line = styler.line_of(start);
        let line_count = styler.line_count();
        let line_start_next = styler.line_start(current_line + 1);
        let at_line_start = styler.line_start(current_line) == start;
        let ch_prev = if start > 0 { styler.char_at(start - 1) } else { 0 };
        let ch = styler.char_at(start);
        let ch_next = styler.char_at(start + 1);

        let mut sc = Self {
            styler,
            doc_len,
            end_pos,
            run_start: start,
            line_count,
            line_start_next,
            line_state_written: None,

            current_pos: start,
            current_line,
            state: init_style,
            ch_prev,
            ch,
            ch_next,
            at_line_start,
            at_line_end: false,
        };
        sc.update_line_end();
        sc
    }

    fn update_line_end(&mut self) {
        self.at_line_end = self.current_pos + 1 >= self.line_start_next;
    }

    #[inline]
    pub fn more(&self) -> bool {
        self.current_pos < self.end_pos
    }

    pub fn end_pos(&self) -> usize {
        self.end_pos.min(self.doc_len)
    }

    pub fn forward(&mut self) {
        if self.current_pos < self.end_pos {
            // Past the last byte of a document without a final line end,
            // the virtual position still belongs to the last line.
            self.at_line_start = self.at_line_end && self.current_line + 1 < self.line_count;
            if self.at_line_start {
                self.current_line += 1;
                self.line_start_next = self.styler.line_start(self.current_line + 1);
            }
            self.ch_prev = self.ch;
            self.current_pos += 1;
            self.ch = self.ch_next;
            self.ch_next = self.styler.char_at(self.current_pos + 1);
            self.update_line_end();
        } else {
            self.at_line_start = false;
            self.ch_prev = b' ';
            self.ch = b' ';
            self.ch_next = b' ';
            self.at_line_end = true;
        }
    }

    pub fn forward_by(&mut self, n: usize) {
        for _ in 0..n {
            self.forward();
        }
    }

    /// Closes the current run with the current state and starts a new one.
    pub fn set_state(&mut self, state: u8) {
        let end = self.current_pos.min(self.doc_len);
        if end > self.run_start {
            self.styler.set_styles(self.run_start..end, self.state);
            self.run_start = end;
        }
        self.state = state;
    }

    pub fn forward_set_state(&mut self, state: u8) {
        self.forward();
        self.set_state(state);
    }

    /// Relabels the pending run without committing anything.
    #[inline]
    pub fn change_state(&mut self, state: u8) {
        self.state = state;
    }

    /// Commits the final run. Must be called once at the end of a pass.
    pub fn complete(&mut self) {
        let end = self.current_pos.min(self.doc_len);
        if end > self.run_start {
            self.styler.set_styles(self.run_start..end, self.state);
            self.run_start = end;
        }
    }

    #[inline]
    pub fn matches(&self, ch: u8) -> bool {
        self.ch == ch
    }

    #[inline]
    pub fn match2(&self, ch: u8, ch_next: u8) -> bool {
        self.ch == ch && self.ch_next == ch_next
    }

    pub fn match3(&self, ch: u8, ch_next: u8, ch_after: u8) -> bool {
        self.match2(ch, ch_next) && self.relative(2) == ch_after
    }

    /// Whether the next character repeats the current one, as in `''` or `//`.
    #[inline]
    pub fn match_next(&self) -> bool {
        self.ch_next == self.ch
    }

    pub fn match_next2(&self, ch_next: u8, ch_after: u8) -> bool {
        self.ch_next == ch_next && self.relative(2) == ch_after
    }

    pub fn match_str(&self, s: &str) -> bool {
        s.bytes().enumerate().all(|(i, b)| self.relative(i) == b)
    }

    pub fn match_ignore_case(&self, s: &str) -> bool {
        s.bytes().enumerate().all(|(i, b)| self.relative(i).to_ascii_lowercase() == b)
    }

    /// The character `n` bytes ahead of the cursor, or 0 past the end of the document.
    #[inline]
    pub fn relative(&self, n: usize) -> u8 {
        match n {
            0 => self.ch,
            1 => self.ch_next,
            _ => self.styler.char_at(self.current_pos + n),
        }
    }

    #[inline]
    pub fn char_after_next(&self) -> u8 {
        self.relative(2)
    }

    pub fn length_current(&self) -> usize {
        self.current_pos - self.run_start
    }

    pub fn run_start(&self) -> usize {
        self.run_start
    }

    /// The text of the pending run, truncated to [`MAX_TOKEN_LEN`] bytes.
    pub fn get_current(&self) -> String {
        let end = self.current_pos.min(self.run_start + MAX_TOKEN_LEN);
        let bytes: Vec<u8> = (self.run_start..end).map(|pos| self.styler.char_at(pos)).collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn get_current_lowered(&self) -> String {
        let mut s = self.get_current();
        s.make_ascii_lowercase();
        s
    }

    /// The next character on this line that isn't a space or tab, or 0.
    pub fn line_next_char(&self, skip_current: bool) -> u8 {
        if !skip_current && !is_space_or_tab(self.ch) {
            return if self.at_line_end_char() { 0 } else { self.ch };
        }
        let line_end = self.styler.line_end(self.current_line);
        let mut pos = self.current_pos + 1;
        while pos < line_end {
            let ch = self.styler.char_at(pos);
            if !is_space_or_tab(ch) {
                return ch;
            }
            pos += 1;
        }
        0
    }

    fn at_line_end_char(&self) -> bool {
        self.ch == b'\r' || self.ch == b'\n' || self.current_pos >= self.doc_len
    }

    /// The next non-whitespace character in the document, or 0.
    pub fn doc_next_char(&self, skip_current: bool) -> u8 {
        if !skip_current && !is_space_char(self.ch) {
            return self.ch;
        }
        let mut pos = self.current_pos + 1;
        while pos < self.doc_len {
            let ch = self.styler.char_at(pos);
            if !is_space_char(ch) {
                return ch;
            }
            pos += 1;
        }
        0
    }

    /// The closest preceding non-whitespace character whose style isn't space-equivalent.
    ///
    /// Bytes of the pending run count with the current state. Everything before
    /// it is read back from the committed styles, which makes the result
    /// independent of where the pass started.
    pub fn prev_non_white(&self, is_space_equiv: impl Fn(u8) -> bool) -> u8 {
        let mut pos = self.current_pos;
        while pos > 0 {
            pos -= 1;
            let ch = self.styler.char_at(pos);
            if is_space_char(ch) {
                continue;
            }
            let style = if pos >= self.run_start { self.state } else { self.styler.style_at(pos) };
            if !is_space_equiv(style) {
                return ch;
            }
        }
        0
    }

    pub fn char_at(&self, pos: usize) -> u8 {
        self.styler.char_at(pos)
    }

    pub fn style_at(&self, pos: usize) -> u8 {
        self.styler.style_at(pos)
    }

    pub fn line_state(&self, line: usize) -> u32 {
        self.styler.line_state(line)
    }

    /// Records the state of `line`. At the virtual end position this only
    /// happens if the line didn't get its state on its last real byte.
    pub fn set_line_state(&mut self, line: usize, state: u32) {
        if self.current_pos < self.doc_len {
            self.line_state_written = Some(line);
        } else if self.line_state_written == Some(line) {
            return;
        }
        self.styler.set_line_state(line, state);
    }

    pub fn property_int(&self, key: &str, default: i32) -> i32 {
        self.styler.property_int(key, default)
    }

    pub fn styler(&self) -> &dyn Accessor {
        &*self.styler
    }
}
