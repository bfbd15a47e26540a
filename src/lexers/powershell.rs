// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! PowerShell: case-insensitive keywords, cmdlets and aliases, `<# #>`
//! block comments, here-strings and variables inside expandable strings.

use crate::accessor::Accessor;
use crate::charclass::*;
use crate::context::StyleContext;
use crate::lexutil::*;
use crate::registry::LexerModule;
use crate::wordlist::{WordList, keyword_list};

pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const COMMENT: u8 = 1;
    pub const COMMENTSTREAM: u8 = 2;
    pub const STRING_DQ: u8 = 3;
    pub const STRING_SQ: u8 = 4;
    pub const HERE_STRING_DQ: u8 = 5;
    pub const HERE_STRING_SQ: u8 = 6;
    pub const ESCAPECHAR: u8 = 7;
    pub const NUMBER: u8 = 8;
    pub const VARIABLE: u8 = 9;
    pub const OPERATOR: u8 = 10;
    pub const IDENTIFIER: u8 = 11;
    pub const KEYWORD: u8 = 12;
    pub const CMDLET: u8 = 13;
    pub const ALIAS: u8 = 14;
    pub const FUNCTION: u8 = 15;
    pub const USER1: u8 = 16;
}

use style::*;

pub const KEYWORD_INDEX_KEYWORD: usize = 0;
pub const KEYWORD_INDEX_CMDLET: usize = 1;
pub const KEYWORD_INDEX_ALIAS: usize = 2;
pub const KEYWORD_INDEX_FUNCTION: usize = 3;
pub const KEYWORD_INDEX_USER1: usize = 4;

const KEYWORDS: &str = "begin break catch class continue data default define do dynamicparam else elseif end enum \
    exit filter finally for foreach from function hidden if in inlinescript parallel param process return sequence \
    static switch throw trap try until using var where while workflow";
const CMDLETS: &str = "add-content copy-item export-csv foreach-object get-childitem get-command get-content get-date \
    get-help get-item get-location get-member get-process get-service import-csv import-module invoke-command \
    invoke-webrequest measure-object new-item new-object out-file out-null out-string remove-item rename-item \
    select-object select-string set-content set-item set-location sort-object start-process stop-process test-path \
    where-object write-error write-host write-output write-verbose write-warning";
const ALIASES: &str = "cat cd cls copy cp del dir echo gci gcm gi gps gsv iex iwr ls mv ps pwd rm sleep sort tee type";
const FUNCTIONS: &str = "clear-host get-verb help mkdir more oss prompt tabexpansion2";

pub static LEXER: LexerModule = LexerModule {
    name: "powershell",
    extensions: &["ps1", "psd1", "psm1"],
    word_list_names: &["keywords", "cmdlets", "aliases", "functions", "user1"],
    default_keywords: &[KEYWORDS, CMDLETS, ALIASES, FUNCTIONS, ""],
    colourise,
    fold,
    fold_context: None,
};

/// Letters, digits, `-`, `_` and any non-ASCII byte.
const fn is_ps_word_char(ch: u8) -> bool {
    ch >= 0x80 || is_alphanumeric(ch) || ch == b'-' || ch == b'_'
}

const fn is_expandable(state: u8) -> bool {
    state == STRING_DQ || state == HERE_STRING_DQ
}

/// Whether a `$` at the cursor starts a variable reference.
fn at_variable_start(sc: &StyleContext) -> bool {
    sc.ch == b'$' && (is_ps_word_char(sc.ch_next) || matches!(sc.ch_next, b'{' | b'$' | b'?' | b'^'))
}

pub fn colourise(start: usize, len: usize, init_style: u8, keywords: &[WordList], styler: &mut dyn Accessor) {
    // The string a `$variable` is embedded in. Variables end with their line.
    let mut var_outer = DEFAULT;
    let mut braced = false;

    let mut sc = StyleContext::new(start, len, init_style, styler);

    while sc.more() {
        match sc.state {
            COMMENT => {
                if sc.at_line_start {
                    sc.set_state(DEFAULT);
                }
            }

            COMMENTSTREAM => {
                if sc.match2(b'#', b'>') {
                    sc.forward();
                    sc.forward_set_state(DEFAULT);
                }
            }

            STRING_DQ | STRING_SQ | HERE_STRING_DQ | HERE_STRING_SQ => {
                let state = sc.state;
                let quote = if state == STRING_SQ || state == HERE_STRING_SQ { b'\'' } else { b'"' };
                if state == HERE_STRING_DQ || state == HERE_STRING_SQ {
                    // The terminator must start a line.
                    if sc.at_line_start && sc.match2(quote, b'@') {
                        sc.forward();
                        sc.forward_set_state(DEFAULT);
                    }
                } else if sc.ch == quote {
                    if sc.ch_next == quote {
                        sc.set_state(ESCAPECHAR);
                        sc.forward();
                        sc.forward_set_state(state);
                        continue;
                    }
                    sc.forward_set_state(DEFAULT);
                }

                if sc.state == state && is_expandable(state) {
                    if sc.ch == b'`' && !is_eol(sc.ch_next) {
                        sc.set_state(ESCAPECHAR);
                        sc.forward();
                        sc.forward_set_state(state);
                        continue;
                    }
                    if at_variable_start(&sc) {
                        var_outer = state;
                        sc.set_state(VARIABLE);
                        braced = sc.ch_next == b'{';
                        sc.forward();
                    }
                }
            }

            NUMBER => {
                if !is_decimal_number(sc.ch_prev, sc.ch, sc.ch_next) {
                    sc.set_state(DEFAULT);
                }
            }

            VARIABLE => {
                let end = if braced {
                    if sc.ch == b'}' {
                        sc.forward();
                        true
                    } else {
                        is_eol(sc.ch)
                    }
                } else if sc.ch == b':' && is_ps_word_char(sc.ch_next) {
                    // $env:PATH
                    false
                } else {
                    !is_ps_word_char(sc.ch) || (matches!(sc.ch_prev, b'$' | b'?' | b'^') && sc.length_current() == 2)
                };
                if end {
                    braced = false;
                    sc.set_state(var_outer);
                    if var_outer != DEFAULT {
                        var_outer = DEFAULT;
                        continue;
                    }
                }
            }

            OPERATOR => {
                if !is_operator(sc.ch) || sc.match2(b'<', b'#') {
                    sc.set_state(DEFAULT);
                }
            }

            IDENTIFIER => {
                if !is_ps_word_char(sc.ch) {
                    let s = sc.get_current_lowered();
                    if keyword_list(keywords, KEYWORD_INDEX_KEYWORD).contains(&s) {
                        sc.change_state(KEYWORD);
                    } else if keyword_list(keywords, KEYWORD_INDEX_CMDLET).contains(&s) {
                        sc.change_state(CMDLET);
                    } else if keyword_list(keywords, KEYWORD_INDEX_ALIAS).contains(&s) {
                        sc.change_state(ALIAS);
                    } else if keyword_list(keywords, KEYWORD_INDEX_FUNCTION).contains(&s) {
                        sc.change_state(FUNCTION);
                    } else if keyword_list(keywords, KEYWORD_INDEX_USER1).contains(&s) {
                        sc.change_state(USER1);
                    }
                    sc.set_state(DEFAULT);
                }
            }

            _ => {}
        }

        if sc.state == DEFAULT {
            if sc.ch == b'#' {
                sc.set_state(COMMENT);
            } else if sc.match2(b'<', b'#') {
                sc.set_state(COMMENTSTREAM);
                sc.forward();
            } else if sc.ch == b'@' && (sc.ch_next == b'"' || sc.ch_next == b'\'') && is_eol(sc.char_after_next()) {
                sc.set_state(if sc.ch_next == b'"' { HERE_STRING_DQ } else { HERE_STRING_SQ });
                sc.forward();
            } else if sc.ch == b'"' {
                sc.set_state(STRING_DQ);
            } else if sc.ch == b'\'' {
                sc.set_state(STRING_SQ);
            } else if at_variable_start(&sc) {
                var_outer = DEFAULT;
                sc.set_state(VARIABLE);
                braced = sc.ch_next == b'{';
                sc.forward();
            } else if sc.ch == b'-' && is_alpha(sc.ch_next) {
                // -Path, -eq
                sc.set_state(IDENTIFIER);
            } else if is_number_start(sc.ch, sc.ch_next) {
                sc.set_state(NUMBER);
            } else if is_operator(sc.ch) {
                sc.set_state(OPERATOR);
            } else if is_ps_word_char(sc.ch) {
                sc.set_state(IDENTIFIER);
            }
        }

        sc.forward();
    }

    sc.complete();
}

const fn is_multiline_block(style: u8) -> bool {
    matches!(style, COMMENTSTREAM | HERE_STRING_DQ | HERE_STRING_SQ)
}

pub fn fold(start: usize, len: usize, init_style: u8, _keywords: &[WordList], styler: &mut dyn Accessor) {
    let end_pos = (start + len).min(styler.len());
    let mut line = styler.line_of(start);
    let mut level_current = if line > 0 { level_after(styler, line - 1) } else { FOLD_LEVEL_BASE };
    let mut level_next = level_current;
    let mut line_end_pos = styler.line_start(line + 1).min(end_pos).saturating_sub(1);

    let mut style = init_style;
    let mut style_next = styler.style_at(start);
    for pos in start..end_pos {
        let style_prev = style;
        style = style_next;
        style_next = styler.style_at(pos + 1);

        if style == OPERATOR {
            match styler.char_at(pos) {
                b'{' => level_next += 1,
                b'}' => level_next -= 1,
                _ => {}
            }
        } else if is_multiline_block(style) {
            // Variables and escapes interrupt a here-string only within a line.
            if style_prev != style && !(style_prev == VARIABLE || style_prev == ESCAPECHAR) {
                level_next += 1;
            } else if style_next != style && !(style_next == VARIABLE || style_next == ESCAPECHAR) {
                level_next -= 1;
            }
        }

        if pos == line_end_pos {
            styler.set_level(line, FoldLevel::new(level_current, level_next).pack());
            line += 1;
            line_end_pos = styler.line_start(line + 1).min(end_pos).saturating_sub(1);
            level_current = level_next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexers::testing::*;

    #[test]
    fn test_pipeline() {
        let doc = lex(&LEXER, "Get-ChildItem -Path $env:TEMP | Where-Object { $_.Length -gt 1kb } # big");
        assert_eq!(
            tokens(&doc),
            vec![
                ("Get-ChildItem", CMDLET),
                (" ", DEFAULT),
                ("-Path", IDENTIFIER),
                (" ", DEFAULT),
                ("$env:TEMP", VARIABLE),
                (" ", DEFAULT),
                ("|", OPERATOR),
                (" ", DEFAULT),
                ("Where-Object", CMDLET),
                (" ", DEFAULT),
                ("{", OPERATOR),
                (" ", DEFAULT),
                ("$_", VARIABLE),
                (".", OPERATOR),
                ("Length", IDENTIFIER),
                (" ", DEFAULT),
                ("-gt", IDENTIFIER),
                (" ", DEFAULT),
                ("1kb", NUMBER),
                (" ", DEFAULT),
                ("}", OPERATOR),
                (" ", DEFAULT),
                ("# big", COMMENT),
            ]
        );
    }

    #[test]
    fn test_keywords_ignore_case() {
        let doc = lex(&LEXER, "FOREACH ($i in $list) { ls; Prompt }");
        let toks = tokens(&doc);
        assert_eq!(toks[0], ("FOREACH", KEYWORD));
        assert!(toks.contains(&("in", KEYWORD)));
        assert!(toks.contains(&("ls", ALIAS)));
        assert!(toks.contains(&("Prompt", FUNCTION)));
    }

    #[test]
    fn test_strings() {
        let doc = lex(&LEXER, "\"a `\"b`\" $x \"\"q\"\" \" + 'it''s $y'");
        assert_eq!(
            tokens(&doc),
            vec![
                ("\"a ", STRING_DQ),
                ("`\"", ESCAPECHAR),
                ("b", STRING_DQ),
                ("`\"", ESCAPECHAR),
                (" ", STRING_DQ),
                ("$x", VARIABLE),
                (" ", STRING_DQ),
                ("\"\"", ESCAPECHAR),
                ("q", STRING_DQ),
                ("\"\"", ESCAPECHAR),
                (" \"", STRING_DQ),
                (" ", DEFAULT),
                ("+", OPERATOR),
                (" ", DEFAULT),
                ("'it", STRING_SQ),
                ("''", ESCAPECHAR),
                ("s $y'", STRING_SQ),
            ]
        );
    }

    #[test]
    fn test_braced_variable() {
        let doc = lex(&LEXER, "${my var} = $?");
        assert_eq!(
            tokens(&doc),
            vec![("${my var}", VARIABLE), (" ", DEFAULT), ("=", OPERATOR), (" ", DEFAULT), ("$?", VARIABLE)]
        );
    }

    #[test]
    fn test_here_strings() {
        let doc = lex(&LEXER, "$s = @\"\nline $x\n\"@\n$t = @'\nraw $y\n'@");
        assert_eq!(
            tokens(&doc),
            vec![
                ("$s", VARIABLE),
                (" ", DEFAULT),
                ("=", OPERATOR),
                (" ", DEFAULT),
                ("@\"\nline ", HERE_STRING_DQ),
                ("$x", VARIABLE),
                ("\n\"@", HERE_STRING_DQ),
                ("\n", DEFAULT),
                ("$t", VARIABLE),
                (" ", DEFAULT),
                ("=", OPERATOR),
                (" ", DEFAULT),
                ("@'\nraw $y\n'@", HERE_STRING_SQ),
            ]
        );

        let base = FOLD_LEVEL_BASE;
        let levels = fold_levels(&doc);
        assert_eq!(levels[0], FoldLevel::new(base, base + 1));
        assert_eq!(levels[1], FoldLevel::new(base + 1, base + 1));
        assert_eq!(levels[2], FoldLevel::new(base + 1, base));
    }

    #[test]
    fn test_fold() {
        let doc = lex(&LEXER, "function f {\n  <# c\n  #>\n}");
        assert_eq!(tokens(&doc)[6], ("<# c\n  #>", COMMENTSTREAM));
        let base = FOLD_LEVEL_BASE;
        let levels = fold_levels(&doc);
        assert_eq!(levels[0], FoldLevel::new(base, base + 1));
        assert_eq!(levels[1], FoldLevel::new(base + 1, base + 2));
        assert_eq!(levels[2], FoldLevel::new(base + 2, base + 1));
        assert_eq!(levels[3], FoldLevel::new(base + 1, base));
    }
}
