// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use lexers::accessor::Accessor;
use lexers::document::Document;
use lexers::highlighter::Highlighter;
use lexers::lexutil::FoldLevel;
use lexers::registry::{LEXERS, LexerModule};
use proptest::prelude::*;
use proptest::sample::Index;

const PROPTEST_CASES: u32 = 64;

const ASYMPTOTE: &[&str] = &[
    "import graph;\n",
    "// FIXME later\n",
    "real f(real x) { return g(x); }\n",
    "struct Foo {\n  int a;\n}\n",
    "s = \"abc\ndef\";\n",
    "/* a\nb */ x;\n",
    "void f()\n{\n  draw((0,0)--(1,1));\n}\n",
    "label('c\\101d', (1, 2.5e3));\n",
];

const CMAKE: &[&str] = &[
    "cmake_minimum_required(VERSION 3.20)\n",
    "add_library(foo STATIC a.c)\n",
    "function(build_it)\n  message(STATUS \"${A_${B}} $ENV{HOME}\")\nendfunction()\n",
    "#[==[ a\n]] ]==]\n",
    "set(X \"a ${Y\n}b\\\nc\")\n",
    "if(WIN32)\n  set(S [[raw\n]])\nendif()\n",
    "# comment\n",
    "target_link_libraries(foo PRIVATE $<$<CONFIG:Debug>:d>)\n",
];

const DART: &[&str] = &[
    "import 'a.dart';\n",
    "// comment\nvar x = 1;\n",
    "/* a\n/* b */\nc */ x;\n",
    "var s = \"sum=${a+b}\";\n",
    "var t = '''x ${f(\n{1: 2}\n)} y''';\n",
    "class Foo extends Bar {\n  int add(int a) { return call(a); }\n}\n",
    "@pkg.Annotation\nvoid main()\n{\n  print(r'\\n');\n}\n",
    "f({a: 1, 'b': 2});\n",
];

const FSHARP: &[&str] = &[
    "let x = 1 // c\n",
    "(* a (* b *) c *) x\n",
    "let s = $\"a {x + 1:N2} b\"\n",
    "let t = $\"\"\"a {\n  x\n} b\"\"\"\n",
    "let f<'a> (c: char) = 'x'\n",
    "#if DEBUG\n[<Literal>]\nlet q = <@ 1 + 1 @>\n#endif\n",
    "let g x =\n    // c\n    x + 1\n",
    "printfn \"%d items %-5.2f\" 3 1.0\n",
];

const POWERSHELL: &[&str] = &[
    "Get-ChildItem -Path $env:TEMP | Where-Object { $_.Length -gt 1kb } # big\n",
    "FOREACH ($i in $list) { ls; Prompt }\n",
    "$s = @\"\nline $x\n\"@\n",
    "$t = @'\nraw $y\n'@\n",
    "<# block\ncomment #>\n",
    "function f {\n  param($a)\n  \"a `\"b`\" $a\"\n}\n",
    "${my var} = $?\n",
    "'it''s'\n",
];

const VHDL: &[&str] = &[
    "library ieee;\nuse ieee.std_logic_1164.all;\n",
    "entity e is\n  port (a : in bit);\nend entity;\n",
    "architecture rtl of e is\nbegin\n  p : process (a)\n  begin\n  end process;\nend architecture;\n",
    "-- comment\n",
    "--! doc\n",
    "/* a\nb */\n",
    "x <= 16#FF# + \"ab\";\n",
    "if rising_edge(clk) and clk'event then\n  y <= '1';\nend if;\n",
];

// Edits that open or close the constructs lexers carry across lines.
const EDITS: &[&str] = &[
    "", " ", "x", "\n", "\"", "'", "(", ")", "{", "}", "[[", "]]", "/*", "*/", "(*", "*)", "//", "--", "#", "$",
    "${", "@\"", "\"@", "<#", "#>", "\"\"\"", "\\",
];

fn samples(lexer: &LexerModule) -> &'static [&'static str] {
    match lexer.name {
        "asymptote" => ASYMPTOTE,
        "cmake" => CMAKE,
        "dart" => DART,
        "fsharp" => FSHARP,
        "powershell" => POWERSHELL,
        "vhdl" => VHDL,
        _ => &[],
    }
}

fn document(lexer: &LexerModule, picks: &[usize]) -> String {
    let samples = samples(lexer);
    picks.iter().map(|&i| samples[i % samples.len()]).collect()
}

fn lexed(hl: &Highlighter, text: &str) -> Document {
    let mut doc = Document::new(text);
    hl.lex_all(&mut doc);
    doc
}

#[test]
fn every_lexer_has_samples() {
    for lexer in LEXERS {
        assert!(!samples(lexer).is_empty(), "{}", lexer.name);
    }
}

#[test]
fn resumes_mid_string() {
    // `"abc` in one pass, `def"` in the next, starting from the recorded style.
    let text = "\"abcdef\"\n";
    for &lexer in LEXERS {
        let expected = lexed(&Highlighter::new(lexer), text);
        let keywords = lexer.default_keywords();
        let mut doc = Document::new(text);
        let len = doc.len();

        (lexer.colourise)(0, 4, 0, &keywords, &mut doc);
        let init_style = doc.style_at(3);
        assert_ne!(init_style, 0, "{}", lexer.name);
        (lexer.colourise)(4, len - 4, init_style, &keywords, &mut doc);

        assert_eq!(doc.styles(), expected.styles(), "{}", lexer.name);
        assert_eq!(doc.line_states(), expected.line_states(), "{}", lexer.name);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn resumes_at_any_line(lexer in 0..LEXERS.len(), picks in prop::collection::vec(0..16usize, 1..8), split in any::<Index>()) {
        let hl = Highlighter::new(LEXERS[lexer]);
        let text = document(hl.lexer(), &picks);
        let expected = lexed(&hl, &text);

        // Forget everything from the split line on, then lex only that part.
        let mut doc = expected.clone();
        let line = split.index(doc.line_count());
        let start = doc.line_start(line);
        let len = doc.len();
        doc.set_styles(start..len, 0);
        for l in line..doc.line_count() {
            doc.set_line_state(l, 0);
        }
        hl.colourise(&mut doc, start..len);

        prop_assert_eq!(doc.styles(), expected.styles());
        prop_assert_eq!(doc.line_states(), expected.line_states());
    }

    #[test]
    fn refolds_from_any_line(lexer in 0..LEXERS.len(), picks in prop::collection::vec(0..16usize, 1..8), split in any::<Index>()) {
        let hl = Highlighter::new(LEXERS[lexer]);
        let expected = lexed(&hl, &document(hl.lexer(), &picks));

        // The last line is the empty one after the final newline. No pass folds it.
        let mut doc = expected.clone();
        let last = doc.line_count() - 1;
        let line = split.index(last);
        for l in line..last {
            doc.set_level(l, 0);
        }
        let start = doc.line_start(line);
        let len = doc.len();
        hl.fold(&mut doc, start..len);

        prop_assert_eq!(doc.levels(), expected.levels());
    }

    #[test]
    fn relex_matches_full_lex(
        lexer in 0..LEXERS.len(),
        picks in prop::collection::vec(0..16usize, 1..8),
        at in any::<Index>(),
        removed in 0..4usize,
        inserted in prop::sample::select(EDITS),
    ) {
        let hl = Highlighter::new(LEXERS[lexer]);
        let mut text = document(hl.lexer(), &picks);
        let mut doc = lexed(&hl, &text);

        let beg = at.index(text.len() + 1);
        let end = (beg + removed).min(text.len());
        let dirty = doc.replace(beg..end, inserted);
        hl.relex_after_edit(&mut doc, dirty);

        text.replace_range(beg..end, inserted);
        let expected = lexed(&hl, &text);
        prop_assert_eq!(doc.text(), expected.text());
        prop_assert_eq!(doc.styles(), expected.styles());
        prop_assert_eq!(doc.line_states(), expected.line_states());
        prop_assert_eq!(doc.levels(), expected.levels());
    }

    #[test]
    fn runs_are_contiguous(lexer in 0..LEXERS.len(), picks in prop::collection::vec(0..16usize, 1..8)) {
        let hl = Highlighter::new(LEXERS[lexer]);
        let doc = lexed(&hl, &document(hl.lexer(), &picks));
        let runs = doc.style_runs();

        prop_assert_eq!(runs.first().map(|r| r.start), Some(0));
        for pair in runs.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
            prop_assert_ne!(pair[0].style, pair[1].style);
            for pos in pair[0].start..pair[1].start {
                prop_assert_eq!(doc.style_at(pos), pair[0].style);
            }
        }
    }

    #[test]
    fn relexing_is_idempotent(lexer in 0..LEXERS.len(), picks in prop::collection::vec(0..16usize, 1..8)) {
        let hl = Highlighter::new(LEXERS[lexer]);
        let first = lexed(&hl, &document(hl.lexer(), &picks));
        let mut second = first.clone();
        hl.lex_all(&mut second);

        prop_assert_eq!(second.styles(), first.styles());
        prop_assert_eq!(second.line_states(), first.line_states());
        prop_assert_eq!(second.levels(), first.levels());
    }

    #[test]
    fn fold_levels_are_adjacent(lexer in 0..LEXERS.len(), picks in prop::collection::vec(0..16usize, 1..8)) {
        let hl = Highlighter::new(LEXERS[lexer]);
        let doc = lexed(&hl, &document(hl.lexer(), &picks));
        let levels: Vec<FoldLevel> = doc.levels().iter().map(|&l| FoldLevel::unpack(l)).collect();

        // The last line is the empty one after the final newline.
        let folded = &levels[..levels.len() - 1];
        for level in folded {
            prop_assert_eq!(level.header, level.current < level.next);
        }
        for pair in folded.windows(2) {
            // A line may sit below the level it inherits (`begin`, `else`), never above it.
            prop_assert!(pair[1].current <= pair[0].next);
        }
    }
}
