// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! F#: nested `(* *)` comments, verbatim, triple-quoted and interpolated
//! strings (including `$$"""` with multi-brace holes), printf format
//! specifiers, quotations and indentation based folding.

use crate::accessor::Accessor;
use crate::charclass::*;
use crate::context::StyleContext;
use crate::escape::{EscapeRules, EscapeSequence};
use crate::lexutil::*;
use crate::registry::LexerModule;
use crate::wordlist::{WordList, keyword_list};

pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const COMMENT: u8 = 1;
    pub const COMMENTLINE: u8 = 2;
    pub const COMMENTLINEDOC: u8 = 3;
    pub const PREPROCESSOR: u8 = 4;
    pub const OPERATOR: u8 = 5;
    /// Interpolation holes and the operators inside them.
    pub const OPERATOR2: u8 = 6;
    pub const NUMBER: u8 = 7;
    pub const IDENTIFIER: u8 = 8;
    pub const KEYWORD: u8 = 9;
    pub const TYPE: u8 = 10;
    pub const ATTRIBUTE: u8 = 11;
    pub const BACKTICK: u8 = 12;
    pub const QUOTATION: u8 = 13;
    pub const CHARACTER: u8 = 14;
    pub const STRING: u8 = 15;
    pub const INTERPOLATED_STRING: u8 = 16;
    pub const VERBATIM_STRING: u8 = 17;
    pub const INTERPOLATED_VERBATIM_STRING: u8 = 18;
    pub const TRIPLE_STRING: u8 = 19;
    pub const INTERPOLATED_TRIPLE_STRING: u8 = 20;
    pub const ESCAPECHAR: u8 = 21;
    pub const FORMAT_SPECIFIER: u8 = 22;
}

use style::*;

pub const KEYWORD_INDEX_KEYWORD: usize = 0;
pub const KEYWORD_INDEX_TYPE: usize = 1;

const KEYWORDS: &str = "abstract and as assert base begin class default delegate do done downcast downto elif else \
    end exception extern false finally fixed for fun function global if in inherit inline interface internal lazy \
    let match member module mutable namespace new not null of open or override private public rec return select \
    sig static struct then to true try type upcast use val void when while with yield const";
const TYPES: &str = "array bigint bool byte char decimal double exn float float32 int int16 int32 int64 int8 list \
    nativeint obj option sbyte seq single string uint uint16 uint32 uint64 uint8 unativeint unit voption \
    Async Result Task";

pub static LEXER: LexerModule = LexerModule {
    name: "fsharp",
    extensions: &["fs", "fsi", "fsx", "fsscript"],
    word_list_names: &["keywords", "types"],
    default_keywords: &[KEYWORDS, TYPES],
    colourise,
    fold,
    fold_context: None,
};

/// The deepest `(*` nesting and the most `$` an interpolated string keeps across lines.
const MAX_LINE_COUNTER: usize = 0xf;

const fn is_fsharp_identifier_char(ch: u8) -> bool {
    is_identifier_char_ex(ch) || ch == b'\''
}

const fn is_plain_string(state: u8) -> bool {
    matches!(state, CHARACTER | STRING | INTERPOLATED_STRING | VERBATIM_STRING | INTERPOLATED_VERBATIM_STRING)
}

const fn is_verbatim_string(state: u8) -> bool {
    state == VERBATIM_STRING || state == INTERPOLATED_VERBATIM_STRING
}

const fn is_interpolated_string(state: u8) -> bool {
    matches!(state, INTERPOLATED_STRING | INTERPOLATED_VERBATIM_STRING | INTERPOLATED_TRIPLE_STRING)
}

const fn has_backslash_escapes(state: u8) -> bool {
    matches!(state, CHARACTER | STRING | INTERPOLATED_STRING)
}

const fn is_multiline_style(state: u8) -> bool {
    (state >= STRING && state <= INTERPOLATED_TRIPLE_STRING) || state == QUOTATION
}

/// Characters a .NET composite format (`{x:N2}`) can't contain.
const fn is_invalid_format_specifier(ch: u8) -> bool {
    ch < b' ' || ch == b'"' || ch == b'{' || ch == b'}'
}

const fn is_percent_format_specifier(ch: u8) -> bool {
    matches!(
        ch,
        b'a' | b'A'
            | b'b'
            | b'B'
            | b'c'
            | b'd'
            | b'e'
            | b'E'
            | b'f'
            | b'F'
            | b'g'
            | b'G'
            | b'i'
            | b'M'
            | b'o'
            | b'O'
            | b'P'
            | b's'
            | b't'
            | b'u'
            | b'x'
            | b'X'
    )
}

/// Length of the `%[flags][width][.precision]type` at the cursor, or 0.
fn percent_format_len(sc: &StyleContext, inside_url: bool) -> usize {
    if sc.ch_next == b'%' {
        return 2;
    }
    if inside_url && is_hex_digit(sc.ch_next) {
        // %20 in a URL
        return 0;
    }
    if is_space_or_tab(sc.ch_next) && is_digit(sc.ch_prev) {
        // "5% off"
        return 0;
    }

    let mut pos = sc.current_pos + 1;
    let mut ch = sc.char_at(pos);
    let next = |pos: &mut usize| {
        *pos += 1;
        sc.char_at(*pos)
    };
    while matches!(ch, b'-' | b'+' | b' ' | b'0') {
        ch = next(&mut pos);
    }
    if ch == b'*' {
        ch = next(&mut pos);
    } else {
        while is_digit(ch) {
            ch = next(&mut pos);
        }
    }
    if ch == b'.' {
        ch = next(&mut pos);
        if ch == b'*' {
            ch = next(&mut pos);
        } else {
            while is_digit(ch) {
                ch = next(&mut pos);
            }
        }
    }
    if is_percent_format_specifier(ch) { pos + 1 - sc.current_pos } else { 0 }
}

/// Whether an operator inside a hole ends the expression: `}`, a format `:`
/// or an alignment `,` followed by a number.
fn is_interpolation_end(sc: &StyleContext) -> bool {
    sc.ch == b'}'
        || sc.ch == b':'
        || (sc.ch == b',' && (is_digit(sc.ch_next) || (sc.ch_next == b'-' && is_digit(sc.char_after_next()))))
}

/// A string waiting for its interpolation hole to close.
struct Interpolation {
    state: u8,
    paren_count: i32,
    interpolator_count: usize,
}

pub fn colourise(start: usize, len: usize, init_style: u8, keywords: &[WordList], styler: &mut dyn Accessor) {
    let mut comment_level = 0;
    let mut visible_chars = 0;
    let mut indent_count = 0;
    let mut line_state = IndentLineState::default();
    let mut interpolator_count = 0;
    let mut inside_url = false;
    let mut inside_attribute = false;
    let mut esc = EscapeSequence::default();
    let mut nested: Vec<Interpolation> = Vec::new();

    // A hole can span lines. Restart at the line where its string began.
    let (start, len, init_style) = if start != 0 {
        backtrack_to_start(&*styler, IndentLineState::INTERPOLATION_MASK, start, len, init_style)
    } else {
        (start, len, init_style)
    };

    let mut sc = StyleContext::new(start, len, init_style, styler);
    if sc.current_line > 0 {
        let prev = IndentLineState::unpack(sc.line_state(sc.current_line - 1));
        interpolator_count = (prev.extra & 0xf) as usize;
        comment_level = (prev.extra >> 4) as usize;
    }

    if start == 0 && sc.match2(b'#', b'!') {
        // Shebang
        line_state.comment_line = true;
        sc.set_state(COMMENTLINE);
        sc.forward();
    }

    while sc.more() {
        match sc.state {
            OPERATOR | OPERATOR2 => sc.set_state(DEFAULT),

            NUMBER => {
                if !is_decimal_number(sc.ch_prev, sc.ch, sc.ch_next) {
                    sc.set_state(DEFAULT);
                }
            }

            IDENTIFIER | PREPROCESSOR => {
                if !is_fsharp_identifier_char(sc.ch) {
                    if sc.state == IDENTIFIER {
                        let s = sc.get_current();
                        if keyword_list(keywords, KEYWORD_INDEX_KEYWORD).contains(&s) {
                            sc.change_state(KEYWORD);
                            if (visible_chars == 3 && s == "end") || (visible_chars == 4 && s == "done") {
                                line_state.close_brace = true;
                            }
                        } else if keyword_list(keywords, KEYWORD_INDEX_TYPE).contains(&s) {
                            sc.change_state(TYPE);
                        } else if inside_attribute && matches!(sc.line_next_char(false), b':' | b'(' | b'>') {
                            sc.change_state(ATTRIBUTE);
                        }
                    }
                    sc.set_state(DEFAULT);
                }
            }

            COMMENT => {
                if sc.at_line_start {
                    line_state.comment_line = true;
                }
                if sc.match2(b'(', b'*') {
                    comment_level = (comment_level + 1).min(MAX_LINE_COUNTER);
                    sc.forward();
                } else if sc.match2(b'*', b')') {
                    sc.forward();
                    comment_level = comment_level.saturating_sub(1);
                    if comment_level == 0 {
                        sc.forward_set_state(DEFAULT);
                        if line_state.comment_line && sc.line_next_char(false) != 0 {
                            // Code follows the comment.
                            line_state.comment_line = false;
                        }
                    }
                }
            }

            COMMENTLINE | COMMENTLINEDOC => {
                if sc.at_line_start {
                    sc.set_state(DEFAULT);
                }
            }

            BACKTICK => {
                if sc.match2(b'`', b'`') {
                    sc.forward();
                    sc.forward_set_state(DEFAULT);
                }
            }

            QUOTATION => {
                if sc.match2(b'@', b'>') {
                    sc.forward();
                    sc.forward_set_state(DEFAULT);
                }
            }

            CHARACTER | STRING | INTERPOLATED_STRING | VERBATIM_STRING | INTERPOLATED_VERBATIM_STRING
            | TRIPLE_STRING | INTERPOLATED_TRIPLE_STRING => {
                let state = sc.state;
                let quote = if state == CHARACTER { b'\'' } else { b'"' };
                if state == CHARACTER && sc.at_line_start {
                    sc.set_state(DEFAULT);
                } else if sc.ch == b'\\' {
                    if has_backslash_escapes(state) && esc.reset_with(state, sc.ch_next, EscapeRules::FSHARP) {
                        sc.set_state(ESCAPECHAR);
                        sc.forward();
                    }
                } else if sc.ch == quote {
                    if sc.ch_next == b'"' && is_verbatim_string(state) {
                        esc.reset_doubled(state);
                        sc.set_state(ESCAPECHAR);
                        sc.forward();
                    } else if is_plain_string(state) || sc.match_next2(b'"', b'"') {
                        if !is_plain_string(state) {
                            sc.forward_by(2);
                        }
                        if sc.ch_next == b'B' {
                            // byte array
                            sc.forward();
                        }
                        interpolator_count = 0;
                        sc.forward_set_state(DEFAULT);
                    }
                } else if state != CHARACTER {
                    if sc.match3(b':', b'/', b'/') && is_lower(sc.ch_prev) {
                        inside_url = true;
                    } else if inside_url && is_invalid_url_char(sc.ch) {
                        inside_url = false;
                    } else if sc.ch == b'%' {
                        if state == INTERPOLATED_TRIPLE_STRING && interpolator_count > 1 {
                            // $$"""...%%d...""" takes as many percent signs as dollars.
                            let count = matched_delimiter_count(sc.styler(), sc.current_pos, b'%');
                            if count == interpolator_count {
                                inside_url = false;
                                sc.set_state(FORMAT_SPECIFIER);
                                sc.forward_by(count - 1);
                            } else {
                                sc.forward_by(count);
                                continue;
                            }
                        }
                        let length = percent_format_len(&sc, inside_url);
                        if length != 0 || sc.state == FORMAT_SPECIFIER {
                            sc.set_state(FORMAT_SPECIFIER);
                            sc.forward_by(length);
                            sc.set_state(state);
                            continue;
                        }
                    }

                    if is_interpolated_string(state) {
                        if sc.ch == b'{' {
                            if sc.ch_next == b'{' && is_plain_string(state) {
                                esc.reset_doubled(state);
                                sc.set_state(ESCAPECHAR);
                                sc.forward();
                            } else {
                                let count = matched_delimiter_count(sc.styler(), sc.current_pos, b'{');
                                if is_plain_string(state) || count >= interpolator_count {
                                    nested.push(Interpolation { state, paren_count: 0, interpolator_count });
                                    // Extra braces before the hole are content.
                                    sc.forward_by(count.saturating_sub(interpolator_count));
                                    sc.set_state(OPERATOR2);
                                    sc.forward_by(interpolator_count.saturating_sub(1));
                                    sc.forward_set_state(DEFAULT);
                                    interpolator_count = 0;
                                }
                            }
                        } else if sc.ch == b'}' {
                            let count = if is_plain_string(state) {
                                1
                            } else {
                                matched_delimiter_count(sc.styler(), sc.current_pos, b'}')
                            };
                            let interpolating = !nested.is_empty() && count >= interpolator_count;
                            if interpolating {
                                nested.pop();
                            }
                            if interpolating || (sc.ch_next != b'}' && is_plain_string(state)) {
                                sc.set_state(OPERATOR2);
                                sc.forward_by(interpolator_count.saturating_sub(1));
                                sc.forward_set_state(state);
                                sc.forward_by(count.saturating_sub(interpolator_count));
                                continue;
                            }
                            if sc.ch_next == b'}' && is_plain_string(state) {
                                esc.reset_doubled(state);
                                sc.set_state(ESCAPECHAR);
                                sc.forward();
                            }
                        }
                    }
                }
            }

            ESCAPECHAR => {
                if esc.at_escape_end(sc.ch) {
                    sc.set_state(esc.outer_state);
                    continue;
                }
            }

            FORMAT_SPECIFIER => {
                if is_invalid_format_specifier(sc.ch) {
                    sc.set_state(esc.outer_state);
                    continue;
                }
            }

            _ => {}
        }

        if sc.state == DEFAULT {
            if sc.match2(b'(', b'*') {
                sc.set_state(COMMENT);
                sc.forward();
                if sc.ch_next == b')' {
                    // let (*) x y = x * y
                    sc.change_state(OPERATOR);
                } else {
                    comment_level = 1;
                    if visible_chars == 0 {
                        line_state.comment_line = true;
                    }
                }
            } else if sc.match2(b'/', b'/') {
                if visible_chars == 0 {
                    line_state.comment_line = true;
                }
                sc.set_state(COMMENTLINE);
                sc.forward();
                if sc.ch_next == b'/' {
                    sc.change_state(COMMENTLINEDOC);
                }
            } else if sc.ch == b'"' {
                inside_url = false;
                sc.set_state(STRING);
                if sc.match_next2(b'"', b'"') {
                    sc.change_state(TRIPLE_STRING);
                    sc.forward_by(2);
                }
            } else if sc.ch == b'$' || sc.ch == b'@' {
                inside_url = false;
                sc.set_state(OPERATOR);
                if sc.ch != sc.ch_next && (sc.ch_next == b'$' || sc.ch_next == b'@') {
                    sc.forward();
                    if sc.ch_next == b'"' {
                        interpolator_count = 1;
                        sc.change_state(INTERPOLATED_VERBATIM_STRING);
                        sc.forward();
                    }
                } else if sc.ch_next == b'"' {
                    let interpolated = sc.ch == b'$';
                    interpolator_count = interpolated as usize;
                    sc.change_state(if interpolated { INTERPOLATED_STRING } else { VERBATIM_STRING });
                    sc.forward();
                    if interpolated && sc.match_next2(b'"', b'"') {
                        sc.change_state(INTERPOLATED_TRIPLE_STRING);
                        sc.forward_by(2);
                    }
                } else if sc.ch_next == b'$' {
                    let count = matched_delimiter_count(sc.styler(), sc.current_pos + 1, b'$') + 1;
                    sc.forward_by(count);
                    if sc.match3(b'"', b'"', b'"') {
                        interpolator_count = count.min(MAX_LINE_COUNTER);
                        sc.change_state(INTERPOLATED_TRIPLE_STRING);
                        sc.forward_by(2);
                    }
                }
            } else if sc.ch == b'\'' {
                // 'c' is a character, 'T a type parameter.
                let mut state = CHARACTER;
                if is_eol(sc.ch_next) {
                    state = OPERATOR;
                } else if sc.ch_next != b'\\' && sc.char_after_next() != b'\'' {
                    state = if is_identifier_start_ex(sc.ch_next) { IDENTIFIER } else { OPERATOR };
                }
                sc.set_state(state);
            } else if sc.match2(b'`', b'`') {
                sc.set_state(BACKTICK);
                sc.forward();
            } else if sc.match2(b'<', b'@') {
                sc.set_state(QUOTATION);
                sc.forward();
            } else if is_number_start_ex(sc.ch_prev, sc.ch, sc.ch_next) {
                sc.set_state(NUMBER);
            } else if sc.ch == b'#' && visible_chars == 0 {
                sc.set_state(PREPROCESSOR);
            } else if is_identifier_start_ex(sc.ch) {
                sc.set_state(IDENTIFIER);
            } else if is_graphic(sc.ch) {
                sc.set_state(OPERATOR);
                if visible_chars == 0 && matches!(sc.ch, b'}' | b']' | b')') {
                    line_state.close_brace = true;
                } else if sc.match2(b'[', b'<') {
                    inside_attribute = true;
                } else if sc.match2(b'>', b']') {
                    inside_attribute = false;
                }
                if let Some(hole) = nested.last_mut() {
                    sc.change_state(OPERATOR2);
                    match sc.ch {
                        b'[' | b'(' => hole.paren_count += 1,
                        b']' | b')' => hole.paren_count -= 1,
                        _ => {}
                    }
                    if hole.paren_count <= 0 && is_interpolation_end(&sc) {
                        // The string pops the hole when it sees the closing brace.
                        esc.outer_state = hole.state;
                        interpolator_count = hole.interpolator_count;
                        sc.change_state(if sc.ch == b'}' { hole.state } else { FORMAT_SPECIFIER });
                        continue;
                    }
                }
            }
        }

        if visible_chars == 0 {
            if sc.ch == b' ' {
                indent_count += 1;
            } else if sc.ch == b'\t' {
                indent_count = tab_indent_count(indent_count);
            }
        }
        if !is_space_char(sc.ch) {
            visible_chars += 1;
        }
        if sc.at_line_end {
            if !nested.is_empty() {
                line_state = IndentLineState { interpolation: true, multiline: true, ..Default::default() };
            } else if is_multiline_style(sc.state) {
                line_state = IndentLineState { multiline: true, ..Default::default() };
            } else if line_state == IndentLineState::default() && visible_chars == 0 {
                line_state.empty_line = true;
            }
            line_state.indent = indent_count.min(u16::MAX as u32) as u16;
            line_state.extra = (interpolator_count.min(MAX_LINE_COUNTER) | (comment_level << 4)) as u8;
            sc.set_line_state(sc.current_line, line_state.pack());
            line_state = IndentLineState::default();
            visible_chars = 0;
            indent_count = 0;
            inside_url = false;
            inside_attribute = false;
        }
        sc.forward();
    }

    sc.complete();
}

pub fn fold(start: usize, len: usize, _init_style: u8, _keywords: &[WordList], styler: &mut dyn Accessor) {
    fold_indent(start, len, styler);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexers::testing::*;

    #[test]
    fn test_basic() {
        let doc = lex(&LEXER, "let x = 1 // c");
        assert_eq!(
            tokens(&doc),
            vec![
                ("let", KEYWORD),
                (" ", DEFAULT),
                ("x", IDENTIFIER),
                (" ", DEFAULT),
                ("=", OPERATOR),
                (" ", DEFAULT),
                ("1", NUMBER),
                (" ", DEFAULT),
                ("// c", COMMENTLINE),
            ]
        );
    }

    #[test]
    fn test_nested_comment() {
        let doc = lex(&LEXER, "(* a (* b *) c *) x\n(* x\n*)\n");
        let toks = tokens(&doc);
        assert_eq!(toks[0], ("(* a (* b *) c *)", COMMENT));
        assert_eq!(toks[2], ("x", IDENTIFIER));
        let states: Vec<IndentLineState> = doc.line_states().iter().map(|&s| IndentLineState::unpack(s)).collect();
        assert!(!states[0].comment_line);
        assert!(states[1].comment_line);
        assert_eq!(states[1].extra >> 4, 1);
        assert!(states[2].comment_line);

        let doc = lex(&LEXER, "let (*) a b = a");
        assert_eq!(tokens(&doc)[2], ("(*)", OPERATOR));
    }

    #[test]
    fn test_interpolated_string() {
        let doc = lex(&LEXER, "$\"a {x + 1:N2} b\"");
        assert_eq!(
            tokens(&doc),
            vec![
                ("$\"a ", INTERPOLATED_STRING),
                ("{", OPERATOR2),
                ("x", IDENTIFIER),
                (" ", DEFAULT),
                ("+", OPERATOR2),
                (" ", DEFAULT),
                ("1", NUMBER),
                (":N2", FORMAT_SPECIFIER),
                ("}", OPERATOR2),
                (" b\"", INTERPOLATED_STRING),
            ]
        );
    }

    #[test]
    fn test_multi_dollar_string() {
        let doc = lex(&LEXER, "$$\"\"\"{x} {{y}}\"\"\"");
        assert_eq!(
            tokens(&doc),
            vec![
                ("$$\"\"\"{x} ", INTERPOLATED_TRIPLE_STRING),
                ("{{", OPERATOR2),
                ("y", IDENTIFIER),
                ("}}", OPERATOR2),
                ("\"\"\"", INTERPOLATED_TRIPLE_STRING),
            ]
        );
    }

    #[test]
    fn test_escapes() {
        let doc = lex(&LEXER, r#"@"a""b" "\n\065""#);
        assert_eq!(
            tokens(&doc),
            vec![
                ("@\"a", VERBATIM_STRING),
                ("\"\"", ESCAPECHAR),
                ("b\"", VERBATIM_STRING),
                (" ", DEFAULT),
                ("\"", STRING),
                ("\\n\\065", ESCAPECHAR),
                ("\"", STRING),
            ]
        );
    }

    #[test]
    fn test_format_specifiers() {
        let doc = lex(&LEXER, "printfn \"%d items %-5.2f 5% off\"");
        assert_eq!(
            tokens(&doc),
            vec![
                ("printfn", IDENTIFIER),
                (" ", DEFAULT),
                ("\"", STRING),
                ("%d", FORMAT_SPECIFIER),
                (" items ", STRING),
                ("%-5.2f", FORMAT_SPECIFIER),
                (" 5% off\"", STRING),
            ]
        );
    }

    #[test]
    fn test_character_and_type_parameter() {
        let doc = lex(&LEXER, "let f<'a> (c: char) = 'x'");
        let toks = tokens(&doc);
        assert!(toks.contains(&("'a", IDENTIFIER)));
        assert!(toks.contains(&("char", TYPE)));
        assert_eq!(toks.last(), Some(&("'x'", CHARACTER)));
    }

    #[test]
    fn test_preprocessor_attribute_quotation() {
        let doc = lex(&LEXER, "#if DEBUG\n[<Literal>]\nlet q = <@ 1 + 1 @> ``my name``\n#endif");
        let toks = tokens(&doc);
        assert_eq!(toks[0], ("#if", PREPROCESSOR));
        assert!(toks.contains(&("Literal", ATTRIBUTE)));
        assert!(toks.contains(&("<@ 1 + 1 @>", QUOTATION)));
        assert!(toks.contains(&("``my name``", BACKTICK)));
        assert_eq!(toks.last(), Some(&("#endif", PREPROCESSOR)));
    }

    #[test]
    fn test_interpolation_across_lines() {
        let text = "let s = $\"\"\"a {\n  x\n} b\"\"\"\nlet y = 2";
        let mut doc = lex(&LEXER, text);
        let states: Vec<IndentLineState> = doc.line_states().iter().map(|&s| IndentLineState::unpack(s)).collect();
        assert!(states[0].interpolation);
        assert!(states[1].interpolation);
        assert!(!states[2].interpolation);
        assert!(tokens(&doc).contains(&(" b\"\"\"", INTERPOLATED_TRIPLE_STRING)));

        // Restarting inside the hole gives the same result.
        let expected = doc.styles().to_vec();
        let start = doc.line_start(1);
        let init = doc.style_at(start - 1);
        let len = doc.len() - start;
        colourise(start, len, init, &LEXER.default_keywords(), &mut doc);
        assert_eq!(doc.styles(), &expected[..]);
    }

    #[test]
    fn test_fold() {
        let doc = lex(&LEXER, "module M\n\nlet f x =\n    // c\n    x + 1\nlet y = 2");
        let base = FOLD_LEVEL_BASE;
        let levels = fold_levels(&doc);
        assert_eq!(levels[2], FoldLevel::new(base, base + 4));
        assert_eq!(levels[3].current, base + 4);
        assert_eq!(levels[4], FoldLevel::new(base + 4, base));
        assert_eq!(levels[5].current, base);

        let states: Vec<IndentLineState> = doc.line_states().iter().map(|&s| IndentLineState::unpack(s)).collect();
        assert!(states[1].empty_line);
        assert!(states[3].comment_line);
        assert_eq!(states[4].indent, 4);
    }
}
