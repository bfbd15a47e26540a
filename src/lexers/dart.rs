// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Dart: nested comments, raw and triple-quoted strings with `$name` and
//! `${expr}` interpolation, metadata and symbols.

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
    pub const COMMENTLINEDOC: u8 = 2;
    pub const COMMENTBLOCK: u8 = 3;
    pub const COMMENTBLOCKDOC: u8 = 4;
    pub const TASKMARKER: u8 = 5;
    pub const OPERATOR: u8 = 6;
    /// Interpolation delimiters and operators inside `${...}`.
    pub const OPERATOR2: u8 = 7;
    pub const NUMBER: u8 = 8;
    pub const IDENTIFIER: u8 = 9;
    /// `$name` inside a string.
    pub const SIMPLE_IDENTIFIER: u8 = 10;
    pub const METADATA: u8 = 11;
    pub const SYMBOL_IDENTIFIER: u8 = 12;
    pub const SYMBOL_OPERATOR: u8 = 13;
    pub const WORD: u8 = 14;
    pub const WORD2: u8 = 15;
    pub const CLASS: u8 = 16;
    pub const ENUM: u8 = 17;
    pub const FUNCTION: u8 = 18;
    pub const FUNCTION_DEFINITION: u8 = 19;
    pub const KEY: u8 = 20;
    pub const LABEL: u8 = 21;
    pub const STRING_SQ: u8 = 22;
    pub const STRING_DQ: u8 = 23;
    pub const TRIPLE_STRING_SQ: u8 = 24;
    pub const TRIPLE_STRING_DQ: u8 = 25;
    pub const RAWSTRING_SQ: u8 = 26;
    pub const RAWSTRING_DQ: u8 = 27;
    pub const TRIPLE_RAWSTRING_SQ: u8 = 28;
    pub const TRIPLE_RAWSTRING_DQ: u8 = 29;
    pub const ESCAPECHAR: u8 = 30;
}

use style::*;

pub const KEYWORD_INDEX_KEYWORD: usize = 0;
pub const KEYWORD_INDEX_TYPE: usize = 1;
pub const KEYWORD_INDEX_CLASS: usize = 2;
pub const KEYWORD_INDEX_ENUMERATION: usize = 3;

const KEYWORDS: &str = "abstract as assert async await base break case catch class const continue covariant \
    default deferred do dynamic else enum export extends extension external factory false final finally for \
    get hide if implements import in interface is late library mixin new null of on operator part required \
    rethrow return sealed set show static super switch sync this throw true try typedef var when while with yield";
const TYPES: &str = "bool double int num void Function Never Null Object String Symbol Type Record dynamic";
const CLASSES: &str = "BigInt Comparable DateTime Duration Error Exception Expando Future Iterable Iterator List \
    Map MapEntry Match Pattern RegExp Runes Set Sink Stopwatch Stream StringBuffer Uri WeakReference";
const ENUMERATIONS: &str = "ProcessStartMode SocketDirection";

pub static LEXER: LexerModule = LexerModule {
    name: "dart",
    extensions: &["dart"],
    word_list_names: &["keywords", "types", "classes", "enumerations"],
    default_keywords: &[KEYWORDS, TYPES, CLASSES, ENUMERATIONS],
    colourise,
    fold,
    fold_context: None,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum KeywordType {
    None,
    Label,
    Class,
    Enum,
    Return,
}

impl KeywordType {
    /// The style given to the identifier that follows the keyword, if any.
    fn style(self) -> Option<u8> {
        match self {
            Self::Label => Some(LABEL),
            Self::Class => Some(CLASS),
            Self::Enum => Some(ENUM),
            _ => None,
        }
    }
}

const LINE_TYPE_COMMENT: u32 = 1;
const LINE_TYPE_IMPORT: u32 = 2;
const MAX_COMMENT_LEVEL: u32 = 0x3f;

/// Bits 0..2 line type, 2..8 block comment depth, 8.. the interpolation stack.
#[derive(Default)]
struct LineState {
    line_type: u32,
    comment_level: u32,
    nested: Vec<u8>,
}

impl LineState {
    fn pack(&self) -> u32 {
        let codes: Vec<u8> = self.nested.iter().map(|&s| nested_code(s)).collect();
        self.line_type | (self.comment_level.min(MAX_COMMENT_LEVEL) << 2) | (pack_nested_states(&codes) << 8)
    }

    fn unpack(packed: u32) -> Self {
        Self {
            line_type: packed & 3,
            comment_level: (packed >> 2) & MAX_COMMENT_LEVEL,
            nested: unpack_nested_states(packed >> 8).into_iter().map(nested_style).collect(),
        }
    }
}

fn nested_code(state: u8) -> u8 {
    match state {
        STRING_SQ => 1,
        STRING_DQ => 2,
        TRIPLE_STRING_SQ => 3,
        TRIPLE_STRING_DQ => 4,
        _ => 0,
    }
}

fn nested_style(code: u8) -> u8 {
    match code {
        1 => STRING_SQ,
        2 => STRING_DQ,
        3 => TRIPLE_STRING_SQ,
        4 => TRIPLE_STRING_DQ,
        _ => DEFAULT,
    }
}

const fn is_dart_identifier_start(ch: u8) -> bool {
    is_identifier_start(ch) || ch == b'$'
}

const fn is_dart_identifier_char(ch: u8) -> bool {
    is_identifier_char(ch) || ch == b'$'
}

const fn is_definable_operator(ch: u8) -> bool {
    matches!(ch, b'+' | b'-' | b'*' | b'/' | b'%' | b'~' | b'&' | b'|' | b'^' | b'<' | b'>' | b'=' | b'[' | b']')
}

const fn is_space_equiv(state: u8) -> bool {
    state <= TASKMARKER
}

const fn is_triple_string(state: u8) -> bool {
    matches!(state, TRIPLE_STRING_SQ | TRIPLE_STRING_DQ | TRIPLE_RAWSTRING_SQ | TRIPLE_RAWSTRING_DQ)
}

const fn is_raw_string(state: u8) -> bool {
    state >= RAWSTRING_SQ && state <= TRIPLE_RAWSTRING_DQ
}

const fn string_quote(state: u8) -> u8 {
    match state {
        STRING_SQ | TRIPLE_STRING_SQ | RAWSTRING_SQ | TRIPLE_RAWSTRING_SQ => b'\'',
        _ => b'"',
    }
}

pub fn colourise(start: usize, len: usize, init_style: u8, keywords: &[WordList], styler: &mut dyn Accessor) {
    let mut line_type = 0;
    let mut comment_level = 0;
    let mut kw_type = KeywordType::None;
    let mut ch_before_identifier = 0;
    let mut nested: Vec<u8> = Vec::new();

    let mut visible_chars = 0;
    let mut visible_chars_before = 0;
    let mut ch_before = 0;
    let mut esc = EscapeSequence::default();

    let mut sc = StyleContext::new(start, len, init_style, styler);
    if sc.current_line > 0 {
        let state = LineState::unpack(sc.line_state(sc.current_line - 1));
        comment_level = state.comment_level;
        nested = state.nested;
    }
    if start == 0 && sc.match2(b'#', b'!') {
        // Shebang
        sc.set_state(COMMENTLINE);
        sc.forward();
        line_type = LINE_TYPE_COMMENT;
    }

    while sc.more() {
        match sc.state {
            OPERATOR | OPERATOR2 => sc.set_state(DEFAULT),

            NUMBER => {
                if !is_decimal_number(sc.ch_prev, sc.ch, sc.ch_next) {
                    sc.set_state(DEFAULT);
                }
            }

            SIMPLE_IDENTIFIER | IDENTIFIER | METADATA | SYMBOL_IDENTIFIER => {
                let state = sc.state;
                if !is_dart_identifier_char(sc.ch) || (sc.ch == b'$' && state == SIMPLE_IDENTIFIER) {
                    if state == METADATA || state == SYMBOL_IDENTIFIER {
                        if sc.ch == b'.' {
                            sc.set_state(OPERATOR);
                            sc.forward_set_state(state);
                            continue;
                        }
                    } else {
                        let s = sc.get_current();
                        if keyword_list(keywords, KEYWORD_INDEX_KEYWORD).contains(&s) {
                            sc.change_state(WORD);
                            if state == SIMPLE_IDENTIFIER {
                                kw_type = KeywordType::None;
                            } else if s == "import" || s == "part" {
                                if visible_chars == sc.length_current() {
                                    line_type = LINE_TYPE_IMPORT;
                                }
                            } else if matches!(
                                s.as_str(),
                                "class" | "extends" | "implements" | "new" | "throw" | "with" | "as" | "is" | "on"
                            ) {
                                kw_type = KeywordType::Class;
                            } else if s == "enum" {
                                kw_type = KeywordType::Enum;
                            } else if s == "break" || s == "continue" {
                                kw_type = KeywordType::Label;
                            } else if matches!(s.as_str(), "return" | "await" | "yield") {
                                kw_type = KeywordType::Return;
                            }
                            if kw_type.style().is_some() && !is_dart_identifier_start(sc.line_next_char(false)) {
                                kw_type = KeywordType::None;
                            }
                        } else if keyword_list(keywords, KEYWORD_INDEX_TYPE).contains(&s) {
                            sc.change_state(WORD2);
                        } else if keyword_list(keywords, KEYWORD_INDEX_CLASS).contains(&s) {
                            sc.change_state(CLASS);
                        } else if keyword_list(keywords, KEYWORD_INDEX_ENUMERATION).contains(&s) {
                            sc.change_state(ENUM);
                        } else if state == IDENTIFIER && sc.ch == b':' {
                            if matches!(ch_before, b',' | b'{' | b'(') {
                                // Map key, record field or named argument.
                                sc.change_state(KEY);
                            } else if is_jump_label_prev_char(ch_before) {
                                sc.change_state(LABEL);
                            }
                        } else if state == IDENTIFIER && sc.ch != b'.' {
                            if let Some(style) = kw_type.style() {
                                sc.change_state(style);
                            } else {
                                let ch_next = sc.line_next_char(sc.ch == b'?');
                                if ch_next == b'(' {
                                    // type method()
                                    // type[] method()
                                    // type<type> method()
                                    if kw_type != KeywordType::Return
                                        && (is_dart_identifier_char(ch_before) || ch_before == b']')
                                    {
                                        sc.change_state(FUNCTION_DEFINITION);
                                    } else {
                                        sc.change_state(FUNCTION);
                                    }
                                } else if (ch_before_identifier == b'<' && (ch_next == b'>' || ch_next == b'<'))
                                    || is_dart_identifier_start(ch_next)
                                {
                                    // type<type>
                                    // type<type<type>>
                                    // type identifier
                                    // type? identifier
                                    sc.change_state(CLASS);
                                }
                            }
                        }
                        if sc.state != WORD && sc.ch != b'.' {
                            kw_type = KeywordType::None;
                        }
                        if state == SIMPLE_IDENTIFIER {
                            sc.set_state(esc.outer_state);
                            continue;
                        }
                    }
                    sc.set_state(DEFAULT);
                }
            }

            SYMBOL_OPERATOR => {
                if !is_definable_operator(sc.ch) {
                    sc.set_state(DEFAULT);
                }
            }

            COMMENTLINE | COMMENTLINEDOC => {
                if sc.at_line_start {
                    sc.set_state(DEFAULT);
                } else {
                    highlight_task_marker(&mut sc, visible_chars, visible_chars_before, TASKMARKER);
                }
            }

            COMMENTBLOCK | COMMENTBLOCKDOC => {
                if sc.match2(b'*', b'/') {
                    sc.forward();
                    comment_level = comment_level.saturating_sub(1);
                    if comment_level == 0 {
                        sc.forward_set_state(DEFAULT);
                    }
                } else if sc.match2(b'/', b'*') {
                    sc.forward();
                    comment_level += 1;
                } else if highlight_task_marker(&mut sc, visible_chars, visible_chars_before, TASKMARKER) {
                    continue;
                }
            }

            STRING_SQ | STRING_DQ | TRIPLE_STRING_SQ | TRIPLE_STRING_DQ | RAWSTRING_SQ | RAWSTRING_DQ
            | TRIPLE_RAWSTRING_SQ | TRIPLE_RAWSTRING_DQ => {
                let state = sc.state;
                let quote = string_quote(state);
                if sc.at_line_start && !is_triple_string(state) {
                    sc.set_state(DEFAULT);
                } else if sc.ch == b'\\' && !is_raw_string(state) {
                    if esc.reset_with(state, sc.ch_next, EscapeRules::DART) {
                        sc.set_state(ESCAPECHAR);
                        sc.forward();
                        if sc.match2(b'u', b'{') {
                            esc.enter_brace();
                            sc.forward();
                        }
                    }
                } else if sc.ch == b'$' && !is_raw_string(state) {
                    esc.outer_state = state;
                    sc.set_state(OPERATOR2);
                    sc.forward();
                    if sc.ch == b'{' {
                        nested.push(state);
                    } else if sc.ch != b'$' && is_dart_identifier_start(sc.ch) {
                        sc.set_state(SIMPLE_IDENTIFIER);
                    } else {
                        sc.set_state(state);
                        continue;
                    }
                } else if sc.ch == quote && (!is_triple_string(state) || sc.match_next2(quote, quote)) {
                    if is_triple_string(state) {
                        sc.forward_by(2);
                    }
                    sc.forward();
                    if (state == STRING_SQ || state == STRING_DQ)
                        && (ch_before == b',' || ch_before == b'{')
                        && sc.line_next_char(false) == b':'
                    {
                        sc.change_state(KEY);
                    }
                    sc.set_state(DEFAULT);
                }
            }

            ESCAPECHAR => {
                if esc.at_escape_end(sc.ch) {
                    if esc.brace && sc.ch == b'}' {
                        sc.forward();
                    }
                    sc.set_state(esc.outer_state);
                    continue;
                }
            }

            _ => {}
        }

        if sc.state == DEFAULT {
            if sc.ch == b'/' && (sc.ch_next == b'/' || sc.ch_next == b'*') {
                visible_chars_before = visible_chars;
                let ch_next = sc.ch_next;
                sc.set_state(if ch_next == b'/' { COMMENTLINE } else { COMMENTBLOCK });
                sc.forward_by(2);
                if sc.ch == ch_next && sc.ch_next != ch_next {
                    sc.change_state(if ch_next == b'/' { COMMENTLINEDOC } else { COMMENTBLOCKDOC });
                }
                if ch_next == b'/' {
                    if visible_chars == 0 {
                        line_type = LINE_TYPE_COMMENT;
                    }
                } else {
                    comment_level = 1;
                }
                continue;
            }

            if sc.ch == b'r' && (sc.ch_next == b'\'' || sc.ch_next == b'"') {
                let quote = sc.ch_next;
                sc.set_state(if quote == b'\'' { RAWSTRING_SQ } else { RAWSTRING_DQ });
                sc.forward();
                if sc.match_next2(quote, quote) {
                    sc.change_state(if quote == b'\'' { TRIPLE_RAWSTRING_SQ } else { TRIPLE_RAWSTRING_DQ });
                    sc.forward_by(2);
                }
            } else if sc.ch == b'\'' || sc.ch == b'"' {
                let quote = sc.ch;
                ch_before = sc.prev_non_white(is_space_equiv);
                sc.set_state(if quote == b'\'' { STRING_SQ } else { STRING_DQ });
                if sc.match_next2(quote, quote) {
                    sc.change_state(if quote == b'\'' { TRIPLE_STRING_SQ } else { TRIPLE_STRING_DQ });
                    sc.forward_by(2);
                }
            } else if is_number_start(sc.ch, sc.ch_next) {
                sc.set_state(NUMBER);
            } else if (sc.ch == b'@' || sc.ch == b'#') && is_dart_identifier_start(sc.ch_next) {
                sc.set_state(if sc.ch == b'@' { METADATA } else { SYMBOL_IDENTIFIER });
            } else if is_dart_identifier_start(sc.ch) {
                ch_before = sc.prev_non_white(is_space_equiv);
                if ch_before != b'.' {
                    ch_before_identifier = ch_before;
                }
                sc.set_state(IDENTIFIER);
            } else if sc.ch == b'#' && is_definable_operator(sc.ch_next) {
                sc.set_state(SYMBOL_OPERATOR);
            } else if is_graphic(sc.ch) {
                sc.set_state(OPERATOR);
                if !nested.is_empty() {
                    sc.change_state(OPERATOR2);
                    if sc.ch == b'{' {
                        nested.push(DEFAULT);
                    } else if sc.ch == b'}' {
                        let outer = nested.pop().unwrap_or(DEFAULT);
                        sc.forward_set_state(outer);
                        continue;
                    }
                }
            }
        }

        if !is_space_char(sc.ch) {
            visible_chars += 1;
        }
        if sc.at_line_end {
            let state = LineState { line_type, comment_level, nested: nested.clone() };
            sc.set_line_state(sc.current_line, state.pack());
            line_type = 0;
            visible_chars = 0;
            visible_chars_before = 0;
            kw_type = KeywordType::None;
            ch_before_identifier = 0;
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
        let line_type = line_state & 3;
        Self { line_comment: (line_type == LINE_TYPE_COMMENT) as i32, import: (line_type == LINE_TYPE_IMPORT) as i32 }
    }
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
            // Already counted by the previous line.
            pos = brace + 1;
            style = OPERATOR;
        }
    }

    let mut level_next = level_current;
    let mut fold_current = FoldLineState::new(styler.line_state(line));
    let mut line_start_next = styler.line_start(line + 1).min(end_pos);
    let mut ch_next = styler.char_at(pos);
    let mut style_next = styler.style_at(pos);
    let mut visible_chars = 0;

    while pos < end_pos {
        let ch = ch_next;
        let style_prev = style;
        style = style_next;
        pos += 1;
        ch_next = styler.char_at(pos);
        style_next = styler.style_at(pos);

        match style {
            COMMENTBLOCK | COMMENTBLOCKDOC => {
                let delta = match (ch, ch_next) {
                    (b'/', b'*') => 1,
                    (b'*', b'/') => -1,
                    _ => 0,
                };
                if delta != 0 {
                    level_next += delta;
                    pos += 1;
                    ch_next = styler.char_at(pos);
                    style_next = styler.style_at(pos);
                }
            }
            TRIPLE_STRING_SQ | TRIPLE_STRING_DQ | TRIPLE_RAWSTRING_SQ | TRIPLE_RAWSTRING_DQ => {
                if style != style_prev {
                    level_next += 1;
                }
                if style != style_next {
                    level_next -= 1;
                }
            }
            OPERATOR | OPERATOR2 => match ch {
                b'{' | b'[' | b'(' => level_next += 1,
                b'}' | b']' | b')' => level_next -= 1,
                _ => {}
            },
            _ => {}
        }

        if visible_chars == 0 && !is_space_equiv(style) {
            visible_chars += 1;
        }
        if pos >= line_start_next {
            let fold_next = FoldLineState::new(styler.line_state(line + 1));
            level_next = level_next.max(FOLD_LEVEL_BASE);
            if fold_current.line_comment != 0 {
                level_next += fold_next.line_comment - fold_prev.line_comment;
            } else if fold_current.import != 0 {
                level_next += fold_next.import - fold_prev.import;
            } else if visible_chars != 0 {
                if let Some(brace) = check_brace_on_next_line(styler, line, OPERATOR, is_space_equiv) {
                    level_next += 1;
                    pos = brace + 1;
                    style = OPERATOR;
                    ch_next = styler.char_at(pos);
                    style_next = styler.style_at(pos);
                }
            }

            styler.set_level(line, FoldLevel::new(level_current, level_next).pack());

            line += 1;
            line_start_next = styler.line_start(line + 1).min(end_pos);
            level_current = level_next;
            fold_prev = fold_current;
            fold_current = fold_next;
            visible_chars = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexers::testing::*;

    #[test]
    fn test_line_comment_then_code() {
        let doc = lex(&LEXER, "// comment\nvar x = 1;");
        assert_eq!(
            tokens(&doc),
            vec![
                ("// comment\n", COMMENTLINE),
                ("var", WORD),
                (" ", DEFAULT),
                ("x", IDENTIFIER),
                (" ", DEFAULT),
                ("=", OPERATOR),
                (" ", DEFAULT),
                ("1", NUMBER),
                (";", OPERATOR),
            ]
        );
        assert_eq!(doc.line_states()[0] & 3, LINE_TYPE_COMMENT);
        assert_eq!(doc.line_states()[1] & 3, 0);
    }

    #[test]
    fn test_nested_block_comment() {
        let doc = lex(&LEXER, "/* a\n/* b */\nc */ x");
        assert_eq!(tokens(&doc), vec![("/* a\n/* b */\nc */", COMMENTBLOCK), (" ", DEFAULT), ("x", IDENTIFIER)]);
        let levels: Vec<u32> = doc.line_states().iter().map(|&s| LineState::unpack(s).comment_level).collect();
        assert_eq!(levels, vec![1, 1, 0]);

        let doc = lex(&LEXER, "/* a /* b\n*/ c */");
        assert_eq!(LineState::unpack(doc.line_states()[0]).comment_level, 2);
        assert_eq!(LineState::unpack(doc.line_states()[1]).comment_level, 0);
    }

    #[test]
    fn test_interpolation() {
        let doc = lex(&LEXER, "\"sum=${a+b}\"");
        assert_eq!(
            tokens(&doc),
            vec![
                ("\"sum=", STRING_DQ),
                ("${", OPERATOR2),
                ("a", IDENTIFIER),
                ("+", OPERATOR2),
                ("b", IDENTIFIER),
                ("}", OPERATOR2),
                ("\"", STRING_DQ),
            ]
        );
        assert!(LineState::unpack(doc.line_states()[0]).nested.is_empty());

        let doc = lex(&LEXER, "'a $b c'");
        assert_eq!(
            tokens(&doc),
            vec![("'a ", STRING_SQ), ("$", OPERATOR2), ("b", SIMPLE_IDENTIFIER), (" c'", STRING_SQ)]
        );
    }

    #[test]
    fn test_interpolation_across_lines() {
        let doc = lex(&LEXER, "'''x ${f(\n{1: 2}\n)} y'''");
        let states: Vec<Vec<u8>> = doc.line_states().iter().map(|&s| LineState::unpack(s).nested).collect();
        assert_eq!(states, vec![vec![TRIPLE_STRING_SQ], vec![TRIPLE_STRING_SQ], vec![]]);
        let toks = tokens(&doc);
        assert_eq!(toks.last(), Some(&(" y'''", TRIPLE_STRING_SQ)));
        assert!(toks.contains(&("f", FUNCTION)));
    }

    #[test]
    fn test_escapes() {
        let doc = lex(&LEXER, r"'\n\x41\u{1F600}' r'\n'");
        assert_eq!(
            tokens(&doc),
            vec![
                ("'", STRING_SQ),
                ("\\n\\x41\\u{1F600}", ESCAPECHAR),
                ("'", STRING_SQ),
                (" ", DEFAULT),
                ("r'\\n'", RAWSTRING_SQ),
            ]
        );
    }

    #[test]
    fn test_identifier_heuristics() {
        let doc = lex(&LEXER, "class Foo extends Bar {\n  int add(int a) { return call(a); }\n  Widget w;\n}");
        let toks = tokens(&doc);
        assert!(toks.contains(&("class", WORD)));
        assert!(toks.contains(&("Foo", CLASS)));
        assert!(toks.contains(&("Bar", CLASS)));
        assert!(toks.contains(&("int", WORD2)));
        assert!(toks.contains(&("add", FUNCTION_DEFINITION)));
        assert!(toks.contains(&("call", FUNCTION)));
        assert!(toks.contains(&("Widget", CLASS)));
        assert!(toks.contains(&("w", IDENTIFIER)));
    }

    #[test]
    fn test_keys_and_labels() {
        let doc = lex(&LEXER, "f({a: 1, 'b': 2});\nouter: for (;;) { break outer; }");
        let toks = tokens(&doc);
        assert!(toks.contains(&("a", KEY)));
        assert!(toks.contains(&("'b'", KEY)));
        assert!(toks.contains(&("outer", LABEL)));
        assert_eq!(toks.iter().filter(|t| t.1 == LABEL).count(), 2);
    }

    #[test]
    fn test_metadata_and_symbols() {
        let doc = lex(&LEXER, "@pkg.Annotation #foo.bar #+ #!x");
        assert_eq!(
            tokens(&doc),
            vec![
                ("@pkg", METADATA),
                (".", OPERATOR),
                ("Annotation", METADATA),
                (" ", DEFAULT),
                ("#foo", SYMBOL_IDENTIFIER),
                (".", OPERATOR),
                ("bar", SYMBOL_IDENTIFIER),
                (" ", DEFAULT),
                ("#+", SYMBOL_OPERATOR),
                (" ", DEFAULT),
                ("#!", OPERATOR),
                ("x", IDENTIFIER),
            ]
        );
    }

    #[test]
    fn test_shebang_and_task_marker() {
        let doc = lex(&LEXER, "#!/usr/bin/env dart\n// TODO: fix\n");
        assert_eq!(
            tokens(&doc),
            vec![
                ("#!/usr/bin/env dart\n// ", COMMENTLINE),
                ("TODO", TASKMARKER),
                (": fix\n", COMMENTLINE),
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let doc = lex(&LEXER, "x = \"abc\ny");
        assert_eq!(tokens(&doc)[4], ("\"abc\n", STRING_DQ));
        assert_eq!(tokens(&doc)[5], ("y", IDENTIFIER));
    }

    #[test]
    fn test_fold() {
        let doc = lex(&LEXER, "import 'a.dart';\nimport 'b.dart';\nvoid main()\n{\n  /* x\n  */\n}\n");
        let levels = fold_levels(&doc);
        let base = FOLD_LEVEL_BASE;
        assert_eq!(levels[0], FoldLevel::new(base, base + 1));
        assert_eq!(levels[1], FoldLevel::new(base + 1, base));
        assert_eq!(levels[2], FoldLevel::new(base, base + 1));
        assert_eq!(levels[3], FoldLevel::new(base + 1, base + 1));
        assert_eq!(levels[4], FoldLevel::new(base + 1, base + 2));
        assert_eq!(levels[5], FoldLevel::new(base + 2, base + 1));
        assert_eq!(levels[6], FoldLevel::new(base + 1, base));
    }
}
