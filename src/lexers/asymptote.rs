// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::accessor::Accessor;
use crate::charclass::*;
use crate::context::StyleContext;
use crate::escape::{EscapeRules, EscapeSequence};
use crate::lexutil::*;
use crate::registry::LexerModule;
use crate::wordlist::{WordList, keyword_list};

pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const COMMENTLINE: u8 = 1;
    pub const COMMENTBLOCK: u8 = 2;
    pub const TASKMARKER: u8 = 3;
    pub const OPERATOR: u8 = 4;
    pub const NUMBER: u8 = 5;
    pub const IDENTIFIER: u8 = 6;
    pub const WORD: u8 = 7;
    pub const TYPE: u8 = 8;
    pub const STRUCT: u8 = 9;
    pub const CONSTANT: u8 = 10;
    pub const FUNCTION: u8 = 11;
    pub const FUNCTION_DEFINITION: u8 = 12;
    pub const STRING_DQ: u8 = 13;
    pub const STRING_SQ: u8 = 14;
    pub const ESCAPECHAR: u8 = 15;
}

use style::*;

pub const KEYWORD_INDEX_KEYWORD: usize = 0;
pub const KEYWORD_INDEX_TYPE: usize = 1;
pub const KEYWORD_INDEX_STRUCT: usize = 2;
pub const KEYWORD_INDEX_CONSTANT: usize = 3;

const KEYWORDS: &str = "access and as assert break case continue controls cycle default delete do else explicit \
    for from if import include literal new operator private public quote restricted return static struct switch \
    tension this typedef unravel using var while";
const TYPES: &str = "bool bool3 code file guide guide3 int pair path path3 pen real string transform transform3 triple void";
const STRUCTS: &str = "Label Legend align arrowbar bounds frame marginT marker object picture position side";
const CONSTANTS: &str = "black blue currentpen currentpicture defaultpen false green inf intMax nullpath pi \
    realEpsilon realMax red true white";

pub static LEXER: LexerModule = LexerModule {
    name: "asymptote",
    extensions: &["asy"],
    word_list_names: &["keywords", "types", "structs", "constants"],
    default_keywords: &[KEYWORDS, TYPES, STRUCTS, CONSTANTS],
    colourise,
    fold,
    fold_context: None,
};

const LINE_STATE_LINE_COMMENT: u32 = 1;
const LINE_STATE_IMPORT: u32 = 1 << 1;

#[derive(Clone, Copy, PartialEq, Eq)]
enum KeywordType {
    None,
    Struct,
    Return,
}

const fn is_space_equiv(state: u8) -> bool {
    state <= TASKMARKER
}

pub fn colourise(start: usize, len: usize, init_style: u8, keywords: &[WordList], styler: &mut dyn Accessor) {
    let mut line_state = 0;
    let mut kw_type = KeywordType::None;

    let mut visible_chars = 0;
    let mut visible_chars_before = 0;
    let mut ch_before = 0;
    let mut esc = EscapeSequence::default();

    let mut sc = StyleContext::new(start, len, init_style, styler);

    while sc.more() {
        match sc.state {
            OPERATOR => sc.set_state(DEFAULT),

            NUMBER => {
                if !is_number_start(sc.ch, sc.ch_next) {
                    sc.set_state(DEFAULT);
                }
            }

            IDENTIFIER => {
                if !is_identifier_char(sc.ch) {
                    let s = sc.get_current();
                    if keyword_list(keywords, KEYWORD_INDEX_KEYWORD).contains(&s) {
                        sc.change_state(WORD);
                        match s.as_str() {
                            "import" | "include" => line_state = LINE_STATE_IMPORT,
                            "new" | "struct" => kw_type = KeywordType::Struct,
                            "return" => kw_type = KeywordType::Return,
                            _ => {}
                        }
                    } else if keyword_list(keywords, KEYWORD_INDEX_TYPE).contains(&s) {
                        sc.change_state(TYPE);
                    } else if kw_type == KeywordType::Struct || keyword_list(keywords, KEYWORD_INDEX_STRUCT).contains(&s) {
                        sc.change_state(STRUCT);
                    } else if keyword_list(keywords, KEYWORD_INDEX_CONSTANT).contains(&s) {
                        sc.change_state(CONSTANT);
                    } else if sc.ch != b'.' {
                        let ch_next = sc.doc_next_char(false);
                        if ch_next == b'(' {
                            // type function()
                            // type[] function()
                            if kw_type != KeywordType::Return && (is_identifier_char(ch_before) || ch_before == b']') {
                                sc.change_state(FUNCTION_DEFINITION);
                            } else {
                                sc.change_state(FUNCTION);
                            }
                        } else if sc.match2(b'[', b']') || is_identifier_start(ch_next) {
                            // type[]
                            // type identifier
                            sc.change_state(STRUCT);
                        }
                    }
                    if sc.state != WORD {
                        kw_type = KeywordType::None;
                    }
                    sc.set_state(DEFAULT);
                }
            }

            COMMENTLINE => {
                if sc.at_line_start {
                    sc.set_state(DEFAULT);
                } else {
                    highlight_task_marker(&mut sc, visible_chars, visible_chars_before, TASKMARKER);
                }
            }

            COMMENTBLOCK => {
                if sc.match2(b'*', b'/') {
                    sc.forward();
                    sc.forward_set_state(DEFAULT);
                } else if highlight_task_marker(&mut sc, visible_chars, visible_chars_before, TASKMARKER) {
                    continue;
                }
            }

            STRING_DQ => {
                if sc.ch == b'\\' {
                    // Only `\\` and `\"` are escapes in double quoted strings.
                    if sc.ch_next == b'\\' || sc.ch_next == b'"' {
                        esc.outer_state = STRING_DQ;
                        esc.digits_left = 1;
                        sc.set_state(ESCAPECHAR);
                        sc.forward();
                    }
                } else if sc.ch == b'"' {
                    sc.forward_set_state(DEFAULT);
                }
            }

            STRING_SQ => {
                if sc.ch == b'\\' {
                    if esc.reset_with(STRING_SQ, sc.ch_next, EscapeRules::ASYMPTOTE) {
                        sc.set_state(ESCAPECHAR);
                        sc.forward();
                    }
                } else if sc.ch == b'\'' {
                    sc.forward_set_state(DEFAULT);
                }
            }

            ESCAPECHAR => {
                if esc.at_escape_end(sc.ch) {
                    sc.set_state(esc.outer_state);
                    continue;
                }
            }

            _ => {}
        }

        if sc.state == DEFAULT {
            if sc.match2(b'/', b'/') {
                if visible_chars == 0 {
                    line_state = LINE_STATE_LINE_COMMENT;
                }
                visible_chars_before = visible_chars;
                sc.set_state(COMMENTLINE);
                sc.forward_by(2);
                continue;
            } else if sc.match2(b'/', b'*') {
                visible_chars_before = visible_chars;
                sc.set_state(COMMENTBLOCK);
                sc.forward_by(2);
                continue;
            } else if sc.ch == b'"' {
                sc.set_state(STRING_DQ);
            } else if sc.ch == b'\'' {
                sc.set_state(STRING_SQ);
            } else if is_digit(sc.ch) {
                sc.set_state(NUMBER);
            } else if is_identifier_start(sc.ch) {
                ch_before = sc.prev_non_white(is_space_equiv);
                sc.set_state(IDENTIFIER);
            } else if is_graphic(sc.ch) && sc.ch != b'\\' && sc.ch != b'`' {
                sc.set_state(OPERATOR);
            }
        }

        if !is_space_char(sc.ch) {
            visible_chars += 1;
        }
        if sc.at_line_end {
            sc.set_line_state(sc.current_line, line_state);
            line_state = 0;
            visible_chars = 0;
            visible_chars_before = 0;
            kw_type = KeywordType::None;
        }
        sc.forward();
    }

    sc.complete();
}

#[derive(Clone, Copy, Default)]
struct FoldLineState {
    line_comment: i32,
    import: i32,
}

impl FoldLineState {
    fn new(line_state: u32) -> Self {
        Self {
            line_comment: (line_state & LINE_STATE_LINE_COMMENT != 0) as i32,
            import: (line_state & LINE_STATE_IMPORT != 0) as i32,
        }
    }
}

const fn is_multiline_string_style(style: u8) -> bool {
    matches!(style, STRING_SQ | STRING_DQ | ESCAPECHAR)
}

pub fn fold(start: usize, len: usize, init_style: u8, _keywords: &[WordList], styler: &mut dyn Accessor) {
    let end_pos = (start + len).min(styler.len());
    let mut pos = start;
    let mut line = styler.line_of(start);
    let mut style = init_style;

    let mut fold_prev = FoldLineState::default();
    let mut level_current = FOLD_LEVEL_BASE;
    if line > 0 {
        level_current = level_after(styler, line - 1);
        fold_prev = FoldLineState::new(styler.line_state(line - 1));
        if let Some(brace) = check_brace_on_next_line(styler, line - 1, OPERATOR, is_space_equiv) {
            pos = brace + 1;
            style = OPERATOR;
        }
    }

    let mut level_next = level_current;
    let mut fold_current = FoldLineState::new(styler.line_state(line));
    let mut line_end_pos = styler.line_start(line + 1).min(end_pos).saturating_sub(1);
    let mut style_next = styler.style_at(pos);
    let mut visible_chars = 0;

    while pos < end_pos {
        let style_prev = style;
        style = style_next;
        style_next = styler.style_at(pos + 1);

        match style {
            COMMENTBLOCK => {
                if style != style_prev {
                    level_next += 1;
                } else if style != style_next {
                    level_next -= 1;
                }
            }
            STRING_SQ | STRING_DQ => {
                if !is_multiline_string_style(style_prev) {
                    level_next += 1;
                } else if !is_multiline_string_style(style_next) {
                    level_next -= 1;
                }
            }
            OPERATOR => match styler.char_at(pos) {
                b'{' | b'[' | b'(' => level_next += 1,
                b'}' | b']' | b')' => level_next -= 1,
                _ => {}
            },
            _ => {}
        }

        if visible_chars == 0 && !is_space_equiv(style) {
            visible_chars += 1;
        }
        if pos == line_end_pos {
            let fold_next = FoldLineState::new(styler.line_state(line + 1));
            if fold_current.line_comment != 0 {
                level_next += fold_next.line_comment - fold_prev.line_comment;
            } else if fold_current.import != 0 {
                level_next += fold_next.import - fold_prev.import;
            } else if visible_chars != 0 {
                if let Some(brace) = check_brace_on_next_line(styler, line, OPERATOR, is_space_equiv) {
                    level_next += 1;
                    pos = brace;
                    style = OPERATOR;
                    style_next = styler.style_at(pos + 1);
                }
            }

            styler.set_level(line, FoldLevel::new(level_current, level_next).pack());

            line += 1;
            line_end_pos = styler.line_start(line + 1).min(end_pos).saturating_sub(1);
            level_current = level_next;
            fold_prev = fold_current;
            fold_current = fold_next;
            visible_chars = 0;
        }
        pos += 1;
    }
}
