// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CMake: commands, bracket arguments and comments, variable references
//! and generator expressions inside quoted arguments.

use crate::accessor::Accessor;
use crate::charclass::*;
use crate::context::StyleContext;
use crate::lexutil::*;
use crate::registry::LexerModule;
use crate::wordlist::{WordList, keyword_list};

pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const COMMENT: u8 = 1;
    pub const BLOCK_COMMENT: u8 = 2;
    pub const OPERATOR: u8 = 3;
    pub const NUMBER: u8 = 4;
    pub const IDENTIFIER: u8 = 5;
    pub const WORD: u8 = 6;
    pub const COMMANDS: u8 = 7;
    pub const FUNCTION: u8 = 8;
    pub const MACRO: u8 = 9;
    pub const PARAMETERS: u8 = 10;
    pub const PROPERTIES: u8 = 11;
    pub const VARIABLE: u8 = 12;
    pub const VALUES: u8 = 13;
    pub const VARIABLE_DOLLAR: u8 = 14;
    pub const VARIABLE_AT: u8 = 15;
    pub const STRING: u8 = 16;
    pub const ESCAPE_SEQUENCE: u8 = 17;
    pub const LINE_CONTINUE: u8 = 18;
    pub const BRACKET_ARGUMENT: u8 = 19;
}

use style::*;

pub const KEYWORD_INDEX_KEYWORD: usize = 0;
pub const KEYWORD_INDEX_COMMAND: usize = 1;
pub const KEYWORD_INDEX_PARAMETER: usize = 2;
pub const KEYWORD_INDEX_PROPERTY: usize = 3;
pub const KEYWORD_INDEX_VARIABLE: usize = 4;
pub const KEYWORD_INDEX_VALUE: usize = 5;

const KEYWORDS: &str = "block( break( continue( else( elseif( endblock( endforeach( endfunction( endif( endmacro( \
    endwhile( foreach( function( if( macro( return( while(";
const COMMAND_WORDS: &str = "add_compile_definitions( add_compile_options( add_custom_command( add_custom_target( \
    add_definitions( add_dependencies( add_executable( add_library( add_subdirectory( add_test( \
    cmake_minimum_required( cmake_parse_arguments( cmake_policy( configure_file( enable_testing( execute_process( \
    file( find_library( find_package( find_path( find_program( get_filename_component( get_property( include( \
    include_directories( install( link_directories( list( math( message( option( project( set( set_property( \
    set_target_properties( string( target_compile_definitions( target_compile_features( target_compile_options( \
    target_include_directories( target_link_libraries( target_sources( unset(";
const PARAMETER_WORDS: &str = "ALIAS AND APPEND BOOL CACHE COMMAND COMPONENTS CONFIGURE_DEPENDS DEFINED DEPENDS DESTINATION \
    DIRECTORY EQUAL EXISTS FATAL_ERROR FILEPATH FORCE GLOB GLOB_RECURSE GREATER IMPORTED INTERFACE INTERNAL IN_LIST \
    LESS MATCHES MODULE NOT OBJECT OR OUTPUT PARENT_SCOPE PATH PRIVATE PROPERTIES PUBLIC REQUIRED SEND_ERROR SHARED \
    STATIC STATUS STREQUAL STRING TARGET TARGETS VERSION VERSION_GREATER_EQUAL VERSION_LESS WARNING WORKING_DIRECTORY";
const PROPERTY_WORDS: &str = "COMPILE_DEFINITIONS COMPILE_FLAGS COMPILE_OPTIONS CXX_EXTENSIONS CXX_STANDARD \
    CXX_STANDARD_REQUIRED FOLDER IMPORTED_LOCATION INCLUDE_DIRECTORIES LINK_FLAGS LINK_LIBRARIES OUTPUT_NAME \
    POSITION_INDEPENDENT_CODE RUNTIME_OUTPUT_DIRECTORY SOURCES SOVERSION";
const VARIABLE_WORDS: &str = "APPLE CMAKE_BINARY_DIR CMAKE_BUILD_TYPE CMAKE_CURRENT_BINARY_DIR CMAKE_CURRENT_LIST_DIR \
    CMAKE_CURRENT_SOURCE_DIR CMAKE_CXX_COMPILER CMAKE_CXX_FLAGS CMAKE_CXX_STANDARD CMAKE_C_COMPILER CMAKE_C_FLAGS \
    CMAKE_INSTALL_PREFIX CMAKE_MODULE_PATH CMAKE_SOURCE_DIR CMAKE_SYSTEM_NAME MSVC PROJECT_BINARY_DIR PROJECT_NAME \
    PROJECT_SOURCE_DIR PROJECT_VERSION UNIX WIN32";
const VALUE_WORDS: &str = "FALSE IGNORE N NO NOTFOUND OFF ON TRUE Y YES";

pub static LEXER: LexerModule = LexerModule {
    name: "cmake",
    extensions: &["cmake", "ctest"],
    word_list_names: &["keywords", "commands", "parameters", "properties", "variables", "values"],
    default_keywords: &[KEYWORDS, COMMAND_WORDS, PARAMETER_WORDS, PROPERTY_WORDS, VARIABLE_WORDS, VALUE_WORDS],
    colourise,
    fold,
    fold_context: None,
};

const fn is_cmake_operator(ch: u8) -> bool {
    // `$ < > ,` belong to generator expressions.
    matches!(ch, b'(' | b')' | b'=' | b':' | b';' | b'$' | b'<' | b'>' | b',')
}

const fn is_cmake_char(ch: u8) -> bool {
    is_identifier_char(ch) || ch == b'.' || ch == b'-' || ch == b'+'
}

/// Counts the `=` after the bracket at `pos` and returns the count with the character that follows them.
fn bracket_equals(styler: &dyn Accessor, pos: usize) -> (u32, u8) {
    let mut count = 0;
    let mut pos = pos + 1;
    while styler.char_at(pos) == b'=' {
        count += 1;
        pos += 1;
    }
    (count, styler.char_at(pos))
}

/// Returns the level of a `[==[` opening at `pos`.
fn bracket_open(styler: &dyn Accessor, pos: usize) -> Option<u32> {
    match bracket_equals(styler, pos) {
        (count, b'[') => Some(count),
        _ => None,
    }
}

/// Whether a `]==]` of the given level closes at `pos`.
fn bracket_close(styler: &dyn Accessor, pos: usize, level: u32) -> bool {
    bracket_equals(styler, pos) == (level, b']')
}

/// The style pending for the next identifier after `function(` or `macro(`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UserDefined {
    None,
    Function,
    Macro,
}

const LINE_STATE_LINE_COMMENT: u32 = 1;
const MAX_NESTING: u32 = 0x3f;

/// Everything that survives a line break:
/// 1 bit line comment, 7 bits outer style, 8 bits bracket level,
/// 6 bits `${` depth, 6 bits `$<` depth and 2 bits pending user definition.
#[derive(Clone, Copy)]
struct LineState {
    line_comment: bool,
    outer_style: u8,
    bracket_number: u32,
    var_nested_level: u32,
    generator_expr: u32,
    user_defined: UserDefined,
}

impl LineState {
    fn pack(&self) -> u32 {
        let user_defined = match self.user_defined {
            UserDefined::None => 0,
            UserDefined::Function => 1,
            UserDefined::Macro => 2,
        };
        (self.line_comment as u32)
            | ((self.outer_style as u32 & 0x7f) << 1)
            | ((self.bracket_number & 0xff) << 8)
            | (self.var_nested_level.min(MAX_NESTING) << 16)
            | (self.generator_expr.min(MAX_NESTING) << 22)
            | (user_defined << 28)
    }

    fn unpack(packed: u32) -> Self {
        Self {
            line_comment: packed & LINE_STATE_LINE_COMMENT != 0,
            outer_style: ((packed >> 1) & 0x7f) as u8,
            bracket_number: (packed >> 8) & 0xff,
            var_nested_level: (packed >> 16) & MAX_NESTING,
            generator_expr: (packed >> 22) & MAX_NESTING,
            user_defined: match (packed >> 28) & 3 {
                1 => UserDefined::Function,
                2 => UserDefined::Macro,
                _ => UserDefined::None,
            },
        }
    }
}

pub fn colourise(start: usize, len: usize, init_style: u8, keywords: &[WordList], styler: &mut dyn Accessor) {
    let mut line_comment = false;
    let mut outer_style = DEFAULT;
    let mut var_nested_level = 0;
    let mut generator_expr = 0;
    let mut bracket_number = 0;
    let mut user_defined = UserDefined::None;

    let mut ch_before_number = 0;
    let mut ch_identifier_start = 0;
    let mut visible_chars = 0;

    let mut sc = StyleContext::new(start, len, init_style, styler);
    if sc.current_line > 0 {
        let state = LineState::unpack(sc.line_state(sc.current_line - 1));
        outer_style = state.outer_style;
        bracket_number = state.bracket_number;
        var_nested_level = state.var_nested_level;
        generator_expr = state.generator_expr;
        user_defined = state.user_defined;
    }

    while sc.more() {
        match sc.state {
            OPERATOR => sc.set_state(DEFAULT),

            NUMBER => {
                if !is_number_start(sc.ch, sc.ch_next) {
                    // Part of a version string or an unquoted argument like `1.2.3-rc`.
                    if is_cmake_char(sc.ch) || is_cmake_char(ch_before_number) {
                        sc.change_state(DEFAULT);
                    }
                    sc.set_state(DEFAULT);
                }
            }

            IDENTIFIER => {
                if !(is_identifier_char(sc.ch) || sc.ch == b'-') {
                    if sc.doc_next_char(false) == b'(' {
                        // Command invocations are case-insensitive.
                        let s = sc.get_current_lowered();
                        user_defined = UserDefined::None;
                        if keyword_list(keywords, KEYWORD_INDEX_KEYWORD).contains_prefixed(&s, b'(') {
                            sc.change_state(WORD);
                            match s.as_str() {
                                "function" => user_defined = UserDefined::Function,
                                "macro" => user_defined = UserDefined::Macro,
                                _ => {}
                            }
                        } else if keyword_list(keywords, KEYWORD_INDEX_COMMAND).contains_prefixed(&s, b'(') {
                            sc.change_state(COMMANDS);
                        } else {
                            sc.change_state(FUNCTION);
                        }
                    } else if user_defined != UserDefined::None {
                        sc.change_state(if user_defined == UserDefined::Function { FUNCTION } else { MACRO });
                        user_defined = UserDefined::None;
                    } else if is_upper(ch_identifier_start) {
                        let s = sc.get_current();
                        if keyword_list(keywords, KEYWORD_INDEX_PARAMETER).contains(&s) {
                            sc.change_state(PARAMETERS);
                        } else if keyword_list(keywords, KEYWORD_INDEX_PROPERTY).contains(&s) {
                            sc.change_state(PROPERTIES);
                        } else if keyword_list(keywords, KEYWORD_INDEX_VARIABLE).contains(&s) {
                            sc.change_state(VARIABLE);
                        } else if keyword_list(keywords, KEYWORD_INDEX_VALUE).contains(&s) {
                            sc.change_state(VALUES);
                        }
                    }
                    sc.set_state(DEFAULT);
                }
            }

            COMMENT => {
                if sc.at_line_start {
                    sc.set_state(DEFAULT);
                }
            }

            BLOCK_COMMENT | BRACKET_ARGUMENT => {
                if sc.ch == b']'
                    && (sc.ch_next == b'=' || sc.ch_next == b']')
                    && bracket_close(sc.styler(), sc.current_pos, bracket_number)
                {
                    sc.forward_by(1 + bracket_number as usize);
                    sc.forward_set_state(DEFAULT);
                    bracket_number = 0;
                }
            }

            STRING => {
                if sc.ch == b'\\' {
                    if is_eol(sc.ch_next) {
                        sc.set_state(LINE_CONTINUE);
                        sc.forward_set_state(STRING);
                    } else {
                        sc.set_state(ESCAPE_SEQUENCE);
                        sc.forward();
                    }
                } else if sc.match2(b'$', b'{') {
                    var_nested_level = 1;
                    sc.set_state(VARIABLE);
                } else if sc.match2(b'$', b'<') {
                    generator_expr = 1;
                    sc.set_state(OPERATOR);
                } else if (sc.ch == b'$' || sc.ch == b'@') && is_identifier_start(sc.ch_next) {
                    sc.set_state(if sc.ch == b'$' { VARIABLE_DOLLAR } else { VARIABLE_AT });
                } else if generator_expr != 0 && is_cmake_operator(sc.ch) {
                    if sc.ch == b'>' {
                        generator_expr -= 1;
                    }
                    sc.set_state(OPERATOR);
                    sc.forward_set_state(STRING);
                    continue;
                } else if sc.ch == b'"' {
                    sc.forward_set_state(DEFAULT);
                    outer_style = DEFAULT;
                }
            }

            ESCAPE_SEQUENCE => {
                if sc.ch == b'\\' {
                    if is_eol(sc.ch_next) {
                        sc.set_state(LINE_CONTINUE);
                        sc.forward_set_state(outer_style);
                    } else {
                        sc.forward();
                    }
                } else {
                    sc.set_state(outer_style);
                    if outer_style != DEFAULT {
                        continue;
                    }
                }
            }

            LINE_CONTINUE => sc.set_state(outer_style),

            VARIABLE => {
                if sc.ch == b'}' {
                    var_nested_level = var_nested_level.saturating_sub(1);
                    if var_nested_level == 0 {
                        sc.forward_set_state(outer_style);
                        if outer_style != DEFAULT {
                            continue;
                        }
                    }
                } else if sc.match2(b'$', b'{') {
                    var_nested_level += 1;
                }
            }

            VARIABLE_DOLLAR | VARIABLE_AT => {
                if !is_identifier_char(sc.ch) {
                    let mut done = false;
                    if sc.state == VARIABLE_AT {
                        if sc.ch == b'@' {
                            sc.forward();
                        }
                    } else if sc.ch == b'{' {
                        let s = sc.get_current();
                        if s == "$ENV" || s == "$CACHE" {
                            sc.change_state(VARIABLE);
                            var_nested_level = 1;
                            done = true;
                        }
                    }
                    if !done {
                        sc.set_state(outer_style);
                        if outer_style != DEFAULT {
                            continue;
                        }
                    }
                }
            }

            _ => {}
        }

        if sc.state == DEFAULT {
            if sc.ch == b'#' {
                let bracket = if sc.ch_next == b'[' { bracket_open(sc.styler(), sc.current_pos + 1) } else { None };
                if let Some(level) = bracket {
                    bracket_number = level;
                    sc.set_state(BLOCK_COMMENT);
                    sc.forward_by(2 + level as usize);
                } else {
                    sc.set_state(COMMENT);
                    if visible_chars == 0 {
                        line_comment = true;
                    }
                }
            } else if sc.ch == b'[' && (sc.ch_next == b'=' || sc.ch_next == b'[') {
                if let Some(level) = bracket_open(sc.styler(), sc.current_pos) {
                    bracket_number = level;
                    sc.set_state(BRACKET_ARGUMENT);
                    sc.forward_by(1 + level as usize);
                }
            } else if sc.match2(b'/', b'/') {
                // CMakeCache.txt
                sc.set_state(COMMENT);
                if visible_chars == 0 {
                    line_comment = true;
                }
            } else if sc.ch == b'"' {
                outer_style = STRING;
                sc.set_state(STRING);
            } else if sc.match2(b'$', b'{') {
                var_nested_level = 1;
                if generator_expr == 0 {
                    outer_style = DEFAULT;
                }
                sc.set_state(VARIABLE);
            } else if (sc.ch == b'$' || sc.ch == b'@') && is_identifier_start(sc.ch_next) {
                if generator_expr == 0 {
                    outer_style = DEFAULT;
                }
                sc.set_state(if sc.ch == b'$' { VARIABLE_DOLLAR } else { VARIABLE_AT });
                sc.forward();
            } else if sc.ch == b'\\' {
                sc.set_state(ESCAPE_SEQUENCE);
                sc.forward();
            } else if is_identifier_start(sc.ch) {
                ch_identifier_start = sc.ch;
                sc.set_state(IDENTIFIER);
            } else if is_digit(sc.ch) || (sc.ch == b'-' && is_digit(sc.ch_next)) {
                ch_before_number = sc.ch_prev;
                sc.set_state(NUMBER);
            } else if is_cmake_operator(sc.ch) {
                sc.set_state(OPERATOR);
                if generator_expr != 0 {
                    if sc.match2(b'$', b'<') {
                        generator_expr += 1;
                    } else if sc.ch == b'>' {
                        generator_expr -= 1;
                        sc.forward_set_state(if generator_expr != 0 { DEFAULT } else { outer_style });
                        continue;
                    }
                }
            }
        }

        if visible_chars == 0 && !is_space_char(sc.ch) {
            visible_chars += 1;
        }
        if sc.at_line_end {
            let state =
                LineState { line_comment, outer_style, bracket_number, var_nested_level, generator_expr, user_defined };
            sc.set_line_state(sc.current_line, state.pack());
            line_comment = false;
            visible_chars = 0;
        }
        sc.forward();
    }

    sc.complete();
}

const MAX_FOLD_WORD_LEN: usize = 15;

pub fn fold(start: usize, len: usize, init_style: u8, _keywords: &[WordList], styler: &mut dyn Accessor) {
    let end_pos = (start + len).min(styler.len());
    let mut line = styler.line_of(start);
    let line_comment_of = |state: u32| (state & LINE_STATE_LINE_COMMENT) as i32;

    let mut level_current = FOLD_LEVEL_BASE;
    let mut line_comment_prev = 0;
    if line > 0 {
        level_current = level_after(styler, line - 1);
        line_comment_prev = line_comment_of(styler.line_state(line - 1));
    }

    let mut level_next = level_current;
    let mut line_comment_current = line_comment_of(styler.line_state(line));
    let mut line_end_pos = styler.line_start(line + 1).min(end_pos).saturating_sub(1);

    let mut style_next = styler.style_at(start);
    let mut style = init_style;
    let mut word = [0u8; MAX_FOLD_WORD_LEN];
    let mut word_len = 0;

    for pos in start..end_pos {
        let style_prev = style;
        style = style_next;
        style_next = styler.style_at(pos + 1);

        match style {
            BLOCK_COMMENT | BRACKET_ARGUMENT => {
                if style != style_prev {
                    level_next += 1;
                } else if style != style_next {
                    level_next -= 1;
                }
            }
            OPERATOR => match styler.char_at(pos) {
                b'(' => level_next += 1,
                b')' => level_next -= 1,
                _ => {}
            },
            WORD => {
                if word_len < MAX_FOLD_WORD_LEN {
                    word[word_len] = styler.char_at(pos).to_ascii_lowercase();
                    word_len += 1;
                }
                if style_next != WORD {
                    let w = &word[..word_len];
                    word_len = 0;
                    if w.starts_with(b"end") {
                        level_next -= 1;
                    } else if matches!(w, b"if" | b"function" | b"macro" | b"foreach" | b"while" | b"block") {
                        level_next += 1;
                    }
                }
            }
            _ => {}
        }

        if pos == line_end_pos {
            let line_comment_next = line_comment_of(styler.line_state(line + 1));
            if line_comment_current != 0 {
                level_next += line_comment_next - line_comment_prev;
            }

            styler.set_level(line, FoldLevel::new(level_current, level_next).pack());

            line += 1;
            line_end_pos = styler.line_start(line + 1).min(end_pos).saturating_sub(1);
            level_current = level_next;
            line_comment_prev = line_comment_current;
            line_comment_current = line_comment_next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexers::testing::*;

    #[test]
    fn test_commands() {
        let doc = lex(&LEXER, "add_library(foo STATIC a.c)\nmy_helper (ON)\nfunction(build_it)\nendfunction()");
        let toks = tokens(&doc);
        assert_eq!(toks[0], ("add_library", COMMANDS));
        assert_eq!(toks[1], ("(", OPERATOR));
        assert!(toks.contains(&("STATIC", PARAMETERS)));
        assert!(toks.contains(&("my_helper", FUNCTION)));
        assert!(toks.contains(&("ON", VALUES)));
        assert!(toks.contains(&("function", WORD)));
        assert!(toks.contains(&("build_it", FUNCTION)));
        assert!(toks.contains(&("endfunction", WORD)));
    }

    #[test]
    fn test_user_defined_name_on_next_line() {
        let doc = lex(&LEXER, "macro(\n  do_thing arg)\nendmacro()");
        let toks = tokens(&doc);
        assert!(toks.contains(&("do_thing", MACRO)));
        assert!(toks.contains(&("arg", IDENTIFIER)));
        assert_eq!(LineState::unpack(doc.line_states()[0]).user_defined, UserDefined::Macro);
    }

    #[test]
    fn test_string_variables() {
        let doc = lex(&LEXER, r#"message("${A_${B}} $ENV{HOME} @X@ $<$<CONFIG:Debug>:d> \n")"#);
        assert_eq!(
            tokens(&doc),
            vec![
                ("message", COMMANDS),
                ("(", OPERATOR),
                ("\"", STRING),
                ("${A_${B}}", VARIABLE),
                (" ", STRING),
                ("$ENV{HOME}", VARIABLE),
                (" ", STRING),
                ("@X@", VARIABLE_AT),
                (" ", STRING),
                ("$<$<", OPERATOR),
                ("CONFIG", IDENTIFIER),
                (":", OPERATOR),
                ("Debug", IDENTIFIER),
                (">:", OPERATOR),
                ("d", IDENTIFIER),
                (">", OPERATOR),
                (" ", STRING),
                ("\\n", ESCAPE_SEQUENCE),
                ("\"", STRING),
                (")", OPERATOR),
            ]
        );
    }

    #[test]
    fn test_multiline_string() {
        let doc = lex(&LEXER, "set(X \"a ${Y\n}b\\\nc\")");
        let toks = tokens(&doc);
        assert!(toks.contains(&("${Y\n}", VARIABLE)));
        assert!(toks.contains(&("\\", LINE_CONTINUE)));
        assert_eq!(toks.last(), Some(&(")", OPERATOR)));
        let state = LineState::unpack(doc.line_states()[0]);
        assert_eq!(state.outer_style, STRING);
        assert_eq!(state.var_nested_level, 1);
    }

    #[test]
    fn test_brackets() {
        let doc = lex(&LEXER, "#[==[ a\n]] ]==] x [[b]] # c");
        assert_eq!(
            tokens(&doc),
            vec![
                ("#[==[ a\n]] ]==]", BLOCK_COMMENT),
                (" ", DEFAULT),
                ("x", IDENTIFIER),
                (" ", DEFAULT),
                ("[[b]]", BRACKET_ARGUMENT),
                (" ", DEFAULT),
                ("# c", COMMENT),
            ]
        );
        assert_eq!(LineState::unpack(doc.line_states()[0]).bracket_number, 2);
    }

    #[test]
    fn test_numbers() {
        let doc = lex(&LEXER, "x(1 -2 1.2.3-rc v2)");
        let toks = tokens(&doc);
        assert!(toks.contains(&("1", NUMBER)));
        assert!(toks.contains(&("-2", NUMBER)));
        assert!(!toks.iter().any(|t| t.1 == NUMBER && t.0.contains('3')));
    }

    #[test]
    fn test_fold() {
        let doc = lex(&LEXER, "# a\n# b\nif(X)\n  foreach(i a b)\n  endforeach()\nendif()\n");
        let base = FOLD_LEVEL_BASE;
        let levels = fold_levels(&doc);
        assert_eq!(levels[0], FoldLevel::new(base, base + 1));
        assert_eq!(levels[1], FoldLevel::new(base + 1, base));
        assert_eq!(levels[2], FoldLevel::new(base, base + 1));
        assert_eq!(levels[3], FoldLevel::new(base + 1, base + 2));
        assert_eq!(levels[4], FoldLevel::new(base + 2, base + 1));
        assert_eq!(levels[5], FoldLevel::new(base + 1, base));
    }
}
