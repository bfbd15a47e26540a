// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A simple in-memory host for the lexers.

use std::fmt::Debug;
use std::ops::Range;

use crate::accessor::{Accessor, PropertySet};
use crate::lexutil::FoldLevel;

/// A run of bytes sharing one style. It extends up to the start of the next run.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StyleRun {
    pub start: usize,
    pub style: u8,
}

impl Debug for StyleRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.start, self.style)
    }
}

/// Text plus everything the lexers write back: styles, line states and fold levels.
#[derive(Clone, Default)]
pub struct Document {
    text: Vec<u8>,
    styles: Vec<u8>,
    line_starts: Vec<usize>,
    line_states: Vec<u32>,
    levels: Vec<u32>,
    properties: PropertySet,
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    pub fn from_bytes(text: &[u8]) -> Self {
        let mut doc = Self { text: text.to_vec(), ..Default::default() };
        doc.styles = vec![0; text.len()];
        doc.line_starts = compute_line_starts(text);
        doc.line_states = vec![0; doc.line_starts.len()];
        doc.levels = vec![FoldLevel::default().pack(); doc.line_starts.len()];
        doc
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn styles(&self) -> &[u8] {
        &self.styles
    }

    pub fn line_states(&self) -> &[u32] {
        &self.line_states
    }

    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    /// The committed styles as contiguous runs.
    pub fn style_runs(&self) -> Vec<StyleRun> {
        let mut runs: Vec<StyleRun> = Vec::new();
        for (start, &style) in self.styles.iter().enumerate() {
            if runs.last().is_none_or(|r| r.style != style) {
                runs.push(StyleRun { start, style });
            }
        }
        runs
    }

    /// Replaces `range` with `text` and returns the lines whose lexing results are stale.
    ///
    /// Styles of the new text are reset to 0. Line states and fold levels of
    /// untouched lines are kept (and shifted), so that a re-lex can detect
    /// when it has caught up with the previous results.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Range<usize> {
        let beg = range.start.min(self.text.len());
        let end = range.end.clamp(beg, self.text.len());

        let mut first_line = self.line_of(beg);
        let last_line = self.line_of(end);
        if beg > 0 && beg == self.line_starts[first_line] && self.text[beg - 1] == b'\r' {
            // Inserting a LF after a CR changes the preceding line.
            first_line -= 1;
        }
        let old_count = self.line_starts.len();

        self.text.splice(beg..end, text.bytes());
        self.styles.splice(beg..end, std::iter::repeat_n(0, text.len()));
        self.line_starts = compute_line_starts(&self.text);

        let removed = last_line + 1 - first_line;
        let kept = old_count - removed;
        let inserted = self.line_starts.len().saturating_sub(kept);
        let level = FoldLevel::default().pack();
        self.line_states.splice(first_line..=last_line, std::iter::repeat_n(0, inserted));
        self.levels.splice(first_line..=last_line, std::iter::repeat_n(level, inserted));
        self.line_states.resize(self.line_starts.len(), 0);
        self.levels.resize(self.line_starts.len(), level);

        first_line..first_line + inserted
    }
}

fn compute_line_starts(text: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    let mut i = 0;
    while i < text.len() {
        match text[i] {
            b'\n' => starts.push(i + 1),
            b'\r' if text.get(i + 1) != Some(&b'\n') => starts.push(i + 1),
            _ => {}
        }
        i += 1;
    }
    starts
}

impl Accessor for Document {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn char_at(&self, pos: usize) -> u8 {
        self.text.get(pos).copied().unwrap_or(0)
    }

    fn style_at(&self, pos: usize) -> u8 {
        self.styles.get(pos).copied().unwrap_or(0)
    }

    fn set_styles(&mut self, range: Range<usize>, style: u8) {
        let end = range.end.min(self.styles.len());
        let beg = range.start.min(end);
        self.styles[beg..end].fill(style);
    }

    fn line_of(&self, pos: usize) -> usize {
        self.line_starts.partition_point(|&s| s <= pos).saturating_sub(1)
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_starts.get(line).copied().unwrap_or(self.text.len())
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_state(&self, line: usize) -> u32 {
        self.line_states.get(line).copied().unwrap_or(0)
    }

    fn set_line_state(&mut self, line: usize, state: u32) {
        if let Some(s) = self.line_states.get_mut(line) {
            *s = state;
        }
    }

    fn level_at(&self, line: usize) -> u32 {
        self.levels.get(line).copied().unwrap_or(FoldLevel::default().pack())
    }

    fn set_level(&mut self, line: usize, level: u32) {
        if let Some(l) = self.levels.get_mut(line) {
            *l = level;
        }
    }

    fn property_int(&self, key: &str, default: i32) -> i32 {
        self.properties.get_int(key, default)
    }
}
