// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ffi::OsStr;
use std::fmt::{self, Debug};
use std::path::Path;

use crate::accessor::Accessor;
use crate::lexers;
use crate::wordlist::WordList;

/// Styles `start..start + len`, starting in `init_style`, and records a state word per line.
pub type ColouriseFn = fn(start: usize, len: usize, init_style: u8, keywords: &[WordList], styler: &mut dyn Accessor);
/// Assigns fold levels to the lines in `start..start + len` from the styles and line states.
pub type FoldFn = fn(start: usize, len: usize, init_style: u8, keywords: &[WordList], styler: &mut dyn Accessor);
/// Start of the text before `pos` that a fold pass resuming at `pos` reads,
/// besides the level of the line before.
pub type FoldContextFn = fn(keywords: &[WordList], styler: &dyn Accessor, pos: usize) -> usize;

/// The immutable binding of a language to its colouriser and folder.
pub struct LexerModule {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    /// Names of the positional keyword lists, used by the configuration loader.
    pub word_list_names: &'static [&'static str],
    /// Whitespace separated defaults for each positional list.
    pub default_keywords: &'static [&'static str],
    pub colourise: ColouriseFn,
    pub fold: FoldFn,
    /// Set when a line's fold depends on more than the level of the line before it.
    pub fold_context: Option<FoldContextFn>,
}

impl LexerModule {
    pub fn default_keywords(&self) -> Vec<WordList> {
        self.default_keywords.iter().map(|text| WordList::from_text(text)).collect()
    }

    /// Index of the keyword list called `name`, ignoring case.
    pub fn word_list_index(&self, name: &str) -> Option<usize> {
        self.word_list_names.iter().position(|n| n.eq_ignore_ascii_case(name))
    }
}

impl PartialEq for LexerModule {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for LexerModule {}

impl Debug for LexerModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexerModule").field("name", &self.name).finish_non_exhaustive()
    }
}

pub static LEXERS: &[&LexerModule] = &[
    &lexers::asymptote::LEXER,
    &lexers::cmake::LEXER,
    &lexers::dart::LEXER,
    &lexers::fsharp::LEXER,
    &lexers::powershell::LEXER,
    &lexers::vhdl::LEXER,
];

pub fn find_lexer(name: &str) -> Option<&'static LexerModule> {
    LEXERS.iter().copied().find(|lexer| lexer.name.eq_ignore_ascii_case(name))
}

pub fn lexer_from_path(path: &Path) -> Option<&'static LexerModule> {
    let name = path.file_name()?;
    if name.eq_ignore_ascii_case("CMakeLists.txt") {
        return find_lexer("cmake");
    }
    let ext = path.extension()?;
    LEXERS.iter().copied().find(|lexer| lexer.extensions.iter().any(|&e| OsStr::new(e).eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_lexer() {
        assert_eq!(find_lexer("Dart").map(|l| l.name), Some("dart"));
        assert_eq!(find_lexer("VHDL").map(|l| l.name), Some("vhdl"));
        assert!(find_lexer("cobol").is_none());
    }

    #[test]
    fn test_lexer_from_path() {
        let name = |p: &str| lexer_from_path(Path::new(p)).map(|l| l.name);
        assert_eq!(name("/src/main.dart"), Some("dart"));
        assert_eq!(name("build/CMakeLists.txt"), Some("cmake"));
        assert_eq!(name("toolchain.cmake"), Some("cmake"));
        assert_eq!(name("script.PS1"), Some("powershell"));
        assert_eq!(name("Program.fs"), Some("fsharp"));
        assert_eq!(name("top.vhd"), Some("vhdl"));
        assert_eq!(name("plot.asy"), Some("asymptote"));
        assert_eq!(name("notes.txt"), None);
        assert_eq!(name("Makefile"), None);
    }

    #[test]
    fn test_identity() {
        let dart = find_lexer("dart").unwrap();
        assert_eq!(dart, &lexers::dart::LEXER);
        assert_ne!(dart, &lexers::cmake::LEXER);
    }

    #[test]
    fn test_default_keywords() {
        for lexer in LEXERS {
            assert_eq!(lexer.default_keywords.len(), lexer.word_list_names.len(), "{}", lexer.name);
            assert!(!lexer.default_keywords()[0].is_empty(), "{}", lexer.name);
        }
    }
}
