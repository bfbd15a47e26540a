// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! One module per language. Each exposes its style numbers in `style`,
//! a `colourise` and a `fold` function and the `LEXER` binding tying them together.

pub mod asymptote;
pub mod cmake;
pub mod dart;
pub mod fsharp;
pub mod powershell;
pub mod vhdl;

#[cfg(test)]
pub(crate) mod testing {
    use crate::accessor::Accessor;
    use crate::document::Document;
    use crate::lexutil::FoldLevel;
    use crate::registry::LexerModule;

    /// Colourises and folds `text` in one pass with the default keywords.
    pub fn lex(lexer: &LexerModule, text: &str) -> Document {
        let mut doc = Document::new(text);
        let keywords = lexer.default_keywords();
        let len = doc.len();
        (lexer.colourise)(0, len, 0, &keywords, &mut doc);
        (lexer.fold)(0, len, 0, &keywords, &mut doc);
        doc
    }

    /// The text of each style run paired with its style.
    pub fn tokens(doc: &Document) -> Vec<(&str, u8)> {
        let runs = doc.style_runs();
        let text = std::str::from_utf8(doc.text()).unwrap();
        runs.iter()
            .enumerate()
            .map(|(i, run)| {
                let end = runs.get(i + 1).map_or(text.len(), |r| r.start);
                (&text[run.start..end], run.style)
            })
            .collect()
    }

    pub fn fold_levels(doc: &Document) -> Vec<FoldLevel> {
        doc.levels().iter().map(|&l| FoldLevel::unpack(l)).collect()
    }
}
