// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lexers::accessor::Accessor;
use lexers::document::Document;
use lexers::highlighter::Highlighter;
use lexers::registry::find_lexer;

const SOURCES: &[(&str, &str)] = &[
    (
        "asymptote",
        "import graph;\n\
         size(200);\n\
         // Axes\n\
         real f(real x) { return x^2 - 1.5e-1; }\n\
         draw(graph(f, -1, 1), blue);\n\
         label(\"$y=x^2$\", (0.5, f(0.5)), NE);\n\
         /* done */\n",
    ),
    (
        "cmake",
        "cmake_minimum_required(VERSION 3.20)\n\
         project(demo VERSION 1.2.3 LANGUAGES C CXX)\n\
         # Sources\n\
         add_library(core STATIC src/a.c src/b.c)\n\
         target_include_directories(core PUBLIC \"${CMAKE_CURRENT_SOURCE_DIR}/include\")\n\
         if(WIN32)\n  target_compile_definitions(core PRIVATE $<$<CONFIG:Debug>:DEBUG=1>)\nendif()\n",
    ),
    (
        "dart",
        "import 'package:flutter/material.dart';\n\
         // Entry point.\n\
         class Counter extends StatelessWidget {\n\
         \x20 final int value;\n\
         \x20 const Counter({required this.value});\n\
         \x20 String describe() => 'value: ${value + 1} of $value';\n\
         \x20 /* nested /* comment */ here */\n\
         }\n",
    ),
    (
        "fsharp",
        "module Demo\n\n\
         let square x = x * x // inline\n\
         (* block (* nested *) *)\n\
         let describe (n: int) =\n\
         \x20   printfn \"%d squared is %d\" n (square n)\n\
         \x20   $\"{n} -> {square n:N0}\"\n",
    ),
    (
        "powershell",
        "# Cleanup\n\
         $files = Get-ChildItem -Path $env:TEMP -Filter *.log\n\
         foreach ($f in $files) {\n\
         \x20   if ($f.Length -gt 1mb) { Remove-Item $f.FullName }\n\
         }\n\
         $msg = @\"\nRemoved $($files.Count) files\n\"@\n",
    ),
    (
        "vhdl",
        "library ieee;\nuse ieee.std_logic_1164.all;\n\
         entity counter is\n  port (clk : in std_logic; q : out natural);\nend entity;\n\
         architecture rtl of counter is\nbegin\n\
         \x20 process (clk)\n  begin\n    if rising_edge(clk) then -- count\n      q <= q + 1;\n    end if;\n\
         \x20 end process;\nend architecture;\n",
    ),
];

fn bench_lex_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("lex_all");

    for &(name, source) in SOURCES {
        let Some(lexer) = find_lexer(name) else {
            continue;
        };
        let hl = Highlighter::new(lexer);
        let text = source.repeat(200);
        let mut doc = Document::new(&text);

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| {
                hl.lex_all(black_box(&mut doc));
            })
        });
    }

    group.finish();
}

fn bench_relex(c: &mut Criterion) {
    let mut group = c.benchmark_group("relex_after_edit");

    for &(name, source) in SOURCES {
        let Some(lexer) = find_lexer(name) else {
            continue;
        };
        let hl = Highlighter::new(lexer);
        let text = source.repeat(200);
        let mut doc = Document::new(&text);
        hl.lex_all(&mut doc);
        let mid = doc.line_start(doc.line_count() / 2);

        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| {
                let dirty = doc.replace(mid..mid, " ");
                hl.relex_after_edit(&mut doc, dirty);
                let dirty = doc.replace(mid..mid + 1, "");
                hl.relex_after_edit(black_box(&mut doc), dirty);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lex_all, bench_relex);
criterion_main!(benches);
