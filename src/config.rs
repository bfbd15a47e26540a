// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Lexer configuration files.
//!
//! ```toml
//! [properties]
//! fold.compact = false
//! "fold.at.else" = 1
//!
//! [keywords.cmake]
//! values = ["ON", "OFF"]
//! commands = "add_library( my_helper("
//! ```
//!
//! Properties may be strings, integers or booleans. Dotted keys are joined
//! back into one property name. Keyword lists are named after the lexer's
//! `word_list_names` and replace the default list wholesale.

use std::fmt;

use toml_span::Value;

use crate::accessor::PropertySet;
use crate::registry::{LexerModule, find_lexer};
use crate::wordlist::WordList;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub struct ConfigError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}:{}: {}", self.line, self.column, self.message)
    }
}

struct KeywordOverride {
    lexer: &'static LexerModule,
    index: usize,
    words: String,
}

#[derive(Default)]
pub struct LexerConfig {
    properties: Vec<(String, String)>,
    keywords: Vec<KeywordOverride>,
}

impl LexerConfig {
    pub fn parse(src: &str) -> ConfigResult<Self> {
        let root = toml_span::parse(src).map_err(|err| error_at(src, err.span.start, err.to_string()))?;
        let Some(root) = root.as_table() else {
            return Ok(Self::default());
        };

        let mut config = Self::default();
        for (key, value) in root {
            match key.name.as_ref() {
                "properties" => {
                    let table = value.as_table().ok_or_else(|| error_at(src, value.span.start, "expected a table"))?;
                    for (key, value) in table {
                        config.read_property(src, key.name.to_string(), value)?;
                    }
                }
                "keywords" => {
                    let table = value.as_table().ok_or_else(|| error_at(src, value.span.start, "expected a table"))?;
                    for (key, value) in table {
                        config.read_keywords(src, &key.name, value)?;
                    }
                }
                name => log::debug!("ignoring unknown configuration section `{name}`"),
            }
        }
        Ok(config)
    }

    fn read_property(&mut self, src: &str, name: String, value: &Value<'_>) -> ConfigResult<()> {
        if let Some(table) = value.as_table() {
            for (key, value) in table {
                self.read_property(src, format!("{name}.{}", key.name), value)?;
            }
            return Ok(());
        }

        let value = if let Some(s) = value.as_str() {
            s.to_string()
        } else if let Some(i) = value.as_integer() {
            i.to_string()
        } else if let Some(b) = value.as_bool() {
            (b as i32).to_string()
        } else {
            return Err(error_at(src, value.span.start, "expected a string, integer or boolean"));
        };
        self.properties.push((name, value));
        Ok(())
    }

    fn read_keywords(&mut self, src: &str, lexer_name: &str, value: &Value<'_>) -> ConfigResult<()> {
        let table = value.as_table().ok_or_else(|| error_at(src, value.span.start, "expected a table"))?;
        let Some(lexer) = find_lexer(lexer_name) else {
            log::debug!("ignoring keywords for unknown lexer `{lexer_name}`");
            return Ok(());
        };

        for (key, value) in table {
            let Some(index) = lexer.word_list_index(&key.name) else {
                log::debug!("ignoring unknown keyword list `{}` of lexer `{}`", key.name, lexer.name);
                continue;
            };

            let words = if let Some(s) = value.as_str() {
                s.to_string()
            } else if let Some(array) = value.as_array() {
                let mut words = String::new();
                for item in array {
                    let word = item.as_str().ok_or_else(|| error_at(src, item.span.start, "expected a string"))?;
                    if !words.is_empty() {
                        words.push(' ');
                    }
                    words.push_str(word);
                }
                words
            } else {
                return Err(error_at(src, value.span.start, "expected a string or an array of strings"));
            };

            self.keywords.push(KeywordOverride { lexer, index, words });
        }
        Ok(())
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn apply_properties(&self, properties: &mut PropertySet) {
        for (key, value) in self.properties() {
            properties.set(key, value);
        }
    }

    /// The lexer's keyword lists with the configured ones swapped in.
    pub fn keywords_for(&self, lexer: &LexerModule) -> Vec<WordList> {
        let mut lists = lexer.default_keywords();
        for o in self.keywords.iter().filter(|o| o.lexer == lexer) {
            if let Some(list) = lists.get_mut(o.index) {
                *list = WordList::from_text(&o.words);
            }
        }
        lists
    }
}

fn error_at(src: &str, offset: usize, message: impl Into<String>) -> ConfigError {
    let before = &src.as_bytes()[..offset.min(src.len())];
    let line_start = before.iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
    ConfigError {
        line: before.iter().filter(|&&b| b == b'\n').count() + 1,
        column: before.len() - line_start + 1,
        message: message.into(),
    }
}
