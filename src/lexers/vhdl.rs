// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! VHDL. Everything is case-insensitive, so identifiers are looked up lowered.
//! Folding is keyword driven: the fold word list decides which words open
//! and close a block, and the last fold word seen before a pass decides
//! whether e.g. `process` opens one or ends an `end process`.

use crate::accessor::Accessor;
use crate::charclass::*;
use crate::context::StyleContext;
use crate::lexutil::*;
use crate::registry::LexerModule;
use crate::wordlist::{WordList, keyword_list};

pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const COMMENT: u8 = 1;
    pub const COMMENTLINEBANG: u8 = 2;
    pub const BLOCK_COMMENT: u8 = 3;
    pub const NUMBER: u8 = 4;
    pub const STRING: u8 = 5;
    pub const OPERATOR: u8 = 6;
    pub const IDENTIFIER: u8 = 7;
    pub const STRINGEOL: u8 = 8;
    pub const KEYWORD: u8 = 9;
    pub const STDOPERATOR: u8 = 10;
    pub const ATTRIBUTE: u8 = 11;
    pub const STDFUNCTION: u8 = 12;
    pub const STDPACKAGE: u8 = 13;
    pub const STDTYPE: u8 = 14;
    pub const USERWORD: u8 = 15;
}

use style::*;

pub const KEYWORD_INDEX_KEYWORD: usize = 0;
pub const KEYWORD_INDEX_OPERATOR: usize = 1;
pub const KEYWORD_INDEX_ATTRIBUTE: usize = 2;
pub const KEYWORD_INDEX_FUNCTION: usize = 3;
pub const KEYWORD_INDEX_PACKAGE: usize = 4;
pub const KEYWORD_INDEX_TYPE: usize = 5;
pub const KEYWORD_INDEX_USER: usize = 6;
pub const KEYWORD_INDEX_FOLD: usize = 8;

const KEYWORDS: &str = "access after alias all architecture array assert attribute begin block body buffer bus case \
    component configuration constant disconnect downto else elsif end entity exit file for function generate generic \
    group guarded if impure in inertial inout is label library linkage literal loop map new next null of on open \
    others out package port postponed procedure process pure range record register reject report return select \
    severity shared signal subtype then to transport type unaffected units until use variable wait when while with";
const OPERATORS: &str = "abs and mod nand nor not or rem rol ror sla sll sra srl xnor xor";
const ATTRIBUTES: &str = "active ascending base delayed driving driving_value event high image instance_name \
    last_active last_event last_value left leftof length low path_name pos pred quiet reverse_range right rightof \
    simple_name stable succ transaction val value";
const FUNCTIONS: &str = "endfile falling_edge is_x now read readline resize resolved rising_edge rotate_left \
    rotate_right shift_left shift_right std_match to_01 to_bit to_bitvector to_integer to_signed to_stdlogicvector \
    to_stdulogic to_stdulogicvector to_unsigned to_ux01 to_x01 to_x01z write writeline";
const PACKAGES: &str = "ieee math_complex math_real numeric_bit numeric_std std standard std_logic_1164 \
    std_logic_arith std_logic_misc std_logic_signed std_logic_textio std_logic_unsigned textio vital_primitives \
    vital_timing work";
const TYPES: &str = "bit bit_vector boolean character delay_length file_open_kind file_open_status integer line \
    natural positive real severity_level side signed std_logic std_logic_vector std_ulogic std_ulogic_vector string \
    text time unsigned ux01 ux01z width x01 x01z";
const FOLD_WORDS: &str = "architecture begin block case component configuration else elsif end entity function \
    generate loop package procedure process record then units when";

pub static LEXER: LexerModule = LexerModule {
    name: "vhdl",
    extensions: &["vhd", "vhdl"],
    word_list_names: &[
        "keywords",
        "operators",
        "attributes",
        "functions",
        "packages",
        "types",
        "user",
        "user2",
        "fold",
    ],
    default_keywords: &[KEYWORDS, OPERATORS, ATTRIBUTES, FUNCTIONS, PACKAGES, TYPES, "", "", FOLD_WORDS],
    colourise,
    fold,
    fold_context: Some(fold_context),
};

pub fn colourise(start: usize, len: usize, init_style: u8, keywords: &[WordList], styler: &mut dyn Accessor) {
    let mut sc = StyleContext::new(start, len, init_style, styler);

    while sc.more() {
        match sc.state {
            OPERATOR => sc.set_state(DEFAULT),

            NUMBER => {
                // Based literals like `16#FF#`.
                if !is_word_char(sc.ch) && sc.ch != b'#' {
                    sc.set_state(DEFAULT);
                }
            }

            IDENTIFIER => {
                if !is_word_start(sc.ch) {
                    let s = sc.get_current_lowered();
                    const CLASSES: [(usize, u8); 7] = [
                        (KEYWORD_INDEX_KEYWORD, KEYWORD),
                        (KEYWORD_INDEX_OPERATOR, STDOPERATOR),
                        (KEYWORD_INDEX_ATTRIBUTE, ATTRIBUTE),
                        (KEYWORD_INDEX_FUNCTION, STDFUNCTION),
                        (KEYWORD_INDEX_PACKAGE, STDPACKAGE),
                        (KEYWORD_INDEX_TYPE, STDTYPE),
                        (KEYWORD_INDEX_USER, USERWORD),
                    ];
                    if let Some(&(_, style)) =
                        CLASSES.iter().find(|&&(index, _)| keyword_list(keywords, index).contains(&s))
                    {
                        sc.change_state(style);
                    }
                    sc.set_state(DEFAULT);
                }
            }

            COMMENT | COMMENTLINEBANG => {
                if sc.at_line_start {
                    sc.set_state(DEFAULT);
                }
            }

            STRING => {
                if sc.ch == b'\\' {
                    if matches!(sc.ch_next, b'"' | b'\'' | b'\\') {
                        sc.forward();
                    }
                } else if sc.ch == b'"' {
                    sc.forward_set_state(DEFAULT);
                } else if sc.at_line_end {
                    sc.change_state(STRINGEOL);
                    sc.forward_set_state(DEFAULT);
                }
            }

            BLOCK_COMMENT => {
                if sc.match2(b'*', b'/') {
                    sc.forward();
                    sc.forward_set_state(DEFAULT);
                }
            }

            // An unterminated string never carries over to the next line.
            STRINGEOL => sc.set_state(DEFAULT),

            _ => {}
        }

        if sc.state == DEFAULT {
            if is_number_start(sc.ch, sc.ch_next) {
                sc.set_state(NUMBER);
            } else if is_word_start(sc.ch) {
                sc.set_state(IDENTIFIER);
            } else if sc.match2(b'-', b'-') {
                sc.set_state(if sc.relative(2) == b'!' { COMMENTLINEBANG } else { COMMENT });
            } else if sc.match2(b'/', b'*') {
                sc.set_state(BLOCK_COMMENT);
            } else if sc.ch == b'"' {
                sc.set_state(STRING);
            } else if is_operator(sc.ch) {
                sc.set_state(OPERATOR);
            }
        }

        sc.forward();
    }

    sc.complete();
}

const fn is_comment_style(style: u8) -> bool {
    matches!(style, COMMENT | COMMENTLINEBANG | BLOCK_COMMENT)
}

/// Neither a comment nor a string: fold words and `;` only count here.
const fn is_code_style(style: u8) -> bool {
    !is_comment_style(style) && style != STRING
}

const MAX_FOLD_WORD_LEN: usize = 31;

fn comment_line(styler: &dyn Accessor, line: usize) -> i32 {
    is_comment_line(styler, line, &[COMMENT, COMMENTLINEBANG]) as i32
}

fn lowered_word(styler: &dyn Accessor, start: usize, end: usize) -> String {
    (start..end.min(start + MAX_FOLD_WORD_LEN)).map(|pos| styler.char_at(pos).to_ascii_lowercase() as char).collect()
}

/// The last fold word before `start` and where it begins, or an empty word at 0.
/// An `end` already closed by a `;` reads as `;`.
fn previous_fold_word(styler: &dyn Accessor, start: usize, fold_words: &WordList) -> (String, usize) {
    let candidate = |word_start: usize, word_end: usize| {
        if !is_word_start(styler.char_at(word_start)) {
            return None;
        }
        let word = lowered_word(styler, word_start, word_end);
        fold_words.contains(&word).then_some((word, word_start, word_end))
    };

    let mut found = None;
    let mut word_end = None;
    let mut pos = start;
    while pos > 0 && found.is_none() {
        pos -= 1;
        let in_word = is_code_style(styler.style_at(pos)) && is_word_char(styler.char_at(pos));
        match (in_word, word_end) {
            (true, None) => word_end = Some(pos + 1),
            (false, Some(end)) => {
                found = candidate(pos + 1, end);
                word_end = None;
            }
            _ => {}
        }
    }
    if found.is_none() {
        found = word_end.and_then(|end| candidate(0, end));
    }

    let Some((word, word_start, end)) = found else {
        return (String::new(), 0);
    };
    if word == "end" && (end..start).any(|pos| styler.char_at(pos) == b';' && is_code_style(styler.style_at(pos))) {
        return (";".to_string(), word_start);
    }
    (word, word_start)
}

/// `fold` at `pos` reads back to the previous fold word.
pub fn fold_context(keywords: &[WordList], styler: &dyn Accessor, pos: usize) -> usize {
    previous_fold_word(styler, pos, keyword_list(keywords, KEYWORD_INDEX_FOLD)).1
}

/// Whether the word at `pos` follows a `:`, ignoring whitespace and comments.
/// That's an instantiation like `u1 : entity work.foo`, not a declaration.
fn follows_colon(styler: &dyn Accessor, pos: usize) -> bool {
    let mut pos = pos;
    while pos > 0 {
        pos -= 1;
        let ch = styler.char_at(pos);
        if !is_space_char(ch) && !is_comment_style(styler.style_at(pos)) {
            return ch == b':';
        }
    }
    false
}

/// Whether the subprogram header after `pos` has an `is` before its `;`,
/// making it a body rather than a declaration.
fn has_body(styler: &dyn Accessor, pos: usize) -> bool {
    let mut depth = 0i32;
    for pos in pos..styler.len() {
        let ch = styler.char_at(pos);
        match ch {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {}
        }
        if depth != 0 {
            continue;
        }
        if ch == b';' {
            return false;
        }
        if is_code_style(styler.style_at(pos))
            && ch.eq_ignore_ascii_case(&b'i')
            && styler.char_at(pos + 1).eq_ignore_ascii_case(&b's')
            && (pos == 0 || !is_word_char(styler.char_at(pos - 1)))
            && !is_word_char(styler.char_at(pos + 2))
        {
            return true;
        }
    }
    false
}

pub fn fold(start: usize, len: usize, init_style: u8, keywords: &[WordList], styler: &mut dyn Accessor) {
    let fold_words = keyword_list(keywords, KEYWORD_INDEX_FOLD);
    let fold_comment = styler.property_bool("fold.comment", true);
    let fold_compact = styler.property_bool("fold.compact", true);
    let fold_at_else = styler.property_bool("fold.at.else", false);
    let fold_at_begin = styler.property_bool("fold.at.Begin", true);
    let fold_at_parenthesis = styler.property_bool("fold.at.Parenthese", true);

    let end_pos = (start + len).min(styler.len());
    let mut line = styler.line_of(start);

    let mut level_current = if line > 0 { level_after(styler, line - 1) } else { FOLD_LEVEL_BASE };
    let mut level_next = level_current;
    let mut level_min_begin = level_current;
    let mut level_min_else = level_current;
    let mut line_end_pos = styler.line_start(line + 1).min(end_pos).saturating_sub(1);
    let mut comment_line_current = comment_line(styler, line);
    let mut visible_chars = 0;

    let (mut prev_word, _) = previous_fold_word(styler, start, fold_words);
    let mut word_start = start;

    let mut ch = 0;
    let mut ch_next = styler.char_at(start);
    let mut style = init_style;
    let mut style_next = styler.style_at(start);

    for pos in start..end_pos {
        let ch_prev = ch;
        ch = ch_next;
        ch_next = styler.char_at(pos + 1);
        let style_prev = style;
        style = style_next;
        style_next = styler.style_at(pos + 1);
        let at_eol = pos == line_end_pos;

        if fold_comment && style == BLOCK_COMMENT && comment_line_current == 0 {
            if style_prev != BLOCK_COMMENT {
                level_next += 1;
            } else if style_next != BLOCK_COMMENT && !at_eol {
                level_next -= 1;
            }
        }

        if fold_at_parenthesis && style == OPERATOR {
            match ch {
                b'(' => level_next += 1,
                b')' => level_next -= 1,
                _ => {}
            }
        }

        if is_code_style(style) {
            if ch == b';' && prev_word == "end" {
                prev_word = ";".to_string();
            }
            if !is_word_char(ch_prev) && is_word_start(ch) {
                word_start = pos;
            }
            if is_word_char(ch) && !is_word_char(ch_next) {
                let word = lowered_word(styler, word_start, pos + 1);
                if fold_words.contains(&word) {
                    let after_end = prev_word == "end";
                    match word.as_str() {
                        "architecture" | "block" | "case" | "generate" | "loop" | "package" | "process"
                        | "record" | "then" | "units" => {
                            if !after_end {
                                level_next += 1;
                            }
                        }
                        "component" | "configuration" | "entity" => {
                            if !after_end && !follows_colon(styler, word_start) {
                                level_next += 1;
                            }
                        }
                        "function" | "procedure" => {
                            if !after_end && has_body(styler, pos + 1) {
                                level_next += 1;
                            }
                        }
                        // `elsif` is followed by a `then` that reopens the block.
                        "end" | "elsif" => level_next -= 1,
                        "begin" if matches!(prev_word.as_str(), "architecture" | "function" | "procedure") => {
                            level_min_begin = level_next - 1;
                        }
                        "else" if fold_at_else => level_min_else = level_next - 1,
                        _ => {}
                    }
                    prev_word = word;
                }
            }
        }

        if !is_space_char(ch) {
            visible_chars += 1;
        }

        if at_eol {
            let comment_line_next = comment_line(styler, line + 1);
            if fold_comment && comment_line_current != 0 {
                let comment_line_prev = if line > 0 { comment_line(styler, line - 1) } else { 0 };
                level_next += comment_line_next - comment_line_prev;
            }

            let mut level_use = level_current;
            if fold_at_begin {
                level_use = level_use.min(level_min_begin);
            }
            if fold_at_else {
                level_use = level_use.min(level_min_else);
            }
            let mut level = FoldLevel::new(level_use, level_next);
            level.white = fold_compact && visible_chars == 0;
            styler.set_level(line, level.pack());

            line += 1;
            line_end_pos = styler.line_start(line + 1).min(end_pos).saturating_sub(1);
            level_current = level_next;
            level_min_begin = level_current;
            level_min_else = level_current;
            comment_line_current = comment_line_next;
            visible_chars = 0;
        }
    }
}
