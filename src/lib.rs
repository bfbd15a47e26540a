// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Incremental, resumable lexers for a text editor.
//!
//! A lexer turns a range of a document into one style byte per character,
//! one state word per line and one fold level per line. It can be restarted
//! at any line start from the style of the previous character and the state
//! of the previous line, which is what makes re-lexing after an edit cheap.

#![allow(clippy::new_without_default)]

pub mod accessor;
pub mod charclass;
pub mod charset;
pub mod config;
pub mod context;
pub mod document;
pub mod escape;
pub mod highlighter;
pub mod lexers;
pub mod lexutil;
pub mod registry;
pub mod wordlist;
