// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Drives a lexer over a document, including the incremental re-lex after an edit.

use std::ops::Range;

use crate::accessor::Accessor;
use crate::charclass::is_space_char;
use crate::registry::LexerModule;
use crate::wordlist::WordList;

/// A lexer together with the keyword lists it runs with.
pub struct Highlighter {
    lexer: &'static LexerModule,
    keywords: Vec<WordList>,
}

impl Highlighter {
    pub fn new(lexer: &'static LexerModule) -> Self {
        Self { lexer, keywords: lexer.default_keywords() }
    }

    pub fn with_keywords(lexer: &'static LexerModule, keywords: Vec<WordList>) -> Self {
        Self { lexer, keywords }
    }

    pub fn lexer(&self) -> &'static LexerModule {
        self.lexer
    }

    pub fn keywords(&self) -> &[WordList] {
        &self.keywords
    }

    /// Styles `range`, widened to start at a line start.
    /// The lexer resumes in the style of the byte before that.
    pub fn colourise(&self, doc: &mut dyn Accessor, range: Range<usize>) {
        let (start, len, init_style) = Self::expand(doc, range);
        (self.lexer.colourise)(start, len, init_style, &self.keywords, doc);
    }

    /// Assigns fold levels to the lines of `range`. Styles must be current.
    pub fn fold(&self, doc: &mut dyn Accessor, range: Range<usize>) {
        let (start, len, init_style) = Self::expand(doc, range);
        (self.lexer.fold)(start, len, init_style, &self.keywords, doc);
    }

    pub fn lex_all(&self, doc: &mut dyn Accessor) {
        let len = doc.len();
        self.colourise(doc, 0..len);
        self.fold(doc, 0..len);
    }

    /// Brings styles, line states and fold levels up to date after the text
    /// of the `dirty` lines changed.
    ///
    /// Lexers may look ahead across blank lines, so the re-lex starts at the
    /// last non-blank line before `dirty`. Lines past `dirty` are re-lexed one
    /// by one until one of them ends with the same line state and style as
    /// before the edit. Everything after it would come out unchanged.
    /// Returns the lines whose styles were rewritten.
    pub fn relex_after_edit(&self, doc: &mut dyn Accessor, dirty: Range<usize>) -> Range<usize> {
        let line_count = doc.line_count();
        let mut first = dirty.start.min(line_count.saturating_sub(1));
        while first > 0 {
            first -= 1;
            if !Self::is_blank_line(doc, first) {
                break;
            }
        }
        let mut line = first;

        while line < line_count {
            let start = doc.line_start(line);
            let end = doc.line_start(line + 1);
            let before = (doc.line_state(line), Self::last_style(doc, start, end));

            self.colourise(doc, start..end);
            line += 1;

            let after = (doc.line_state(line - 1), Self::last_style(doc, start, end));
            if line > dirty.end && before == after {
                break;
            }
        }

        log::trace!("{}: relexed lines {first}..{line} of {line_count}", self.lexer.name);

        // The line after the relexed ones may change its comment-line fold.
        let fold_start = doc.line_start(first.saturating_sub(1));
        let fold_end = doc.line_start(line + 1);
        self.fold(doc, fold_start..fold_end);

        // Levels propagate down the document until one comes out as before
        // and the next line's fold reads nothing from the relexed lines.
        // The empty line after a final line end has no level of its own.
        let unchanged_from = doc.line_start(line);
        let mut fold_line = line + 1;
        while fold_line < line_count {
            let old = doc.level_at(fold_line);
            let start = doc.line_start(fold_line);
            let end = doc.line_start(fold_line + 1);
            if start >= end {
                break;
            }
            self.fold(doc, start..end);
            if doc.level_at(fold_line) == old && self.fold_context_from(doc, end) >= unchanged_from {
                break;
            }
            fold_line += 1;
        }

        if fold_line > line + 1 {
            log::trace!("{}: refolded up to line {fold_line}", self.lexer.name);
        }

        first..line
    }

    fn expand(doc: &dyn Accessor, range: Range<usize>) -> (usize, usize, u8) {
        let end = range.end.min(doc.len());
        let start = doc.line_start(doc.line_of(range.start.min(end)));
        let init_style = if start > 0 { doc.style_at(start - 1) } else { 0 };
        (start, end - start, init_style)
    }

    /// Start of the text a fold pass resuming at `pos` reads.
    fn fold_context_from(&self, doc: &dyn Accessor, pos: usize) -> usize {
        match self.lexer.fold_context {
            Some(context) => context(&self.keywords, doc, pos),
            None => pos,
        }
    }

    fn is_blank_line(doc: &dyn Accessor, line: usize) -> bool {
        (doc.line_start(line)..doc.line_end(line)).all(|pos| is_space_char(doc.char_at(pos)))
    }

    fn last_style(doc: &dyn Accessor, start: usize, end: usize) -> u8 {
        if end > start { doc.style_at(end - 1) } else { 0 }
    }
}
