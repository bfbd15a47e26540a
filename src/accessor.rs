// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The contract between a lexer and the document that hosts it.

use std::collections::HashMap;
use std::ops::Range;

/// Everything a colouriser or folder may read from or write to the host.
///
/// Out-of-range reads never fail: `char_at` and `style_at` return 0 past the
/// end of the document, and line queries clamp to the last line.
pub trait Accessor {
    /// Length of the document in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn char_at(&self, pos: usize) -> u8;
    fn style_at(&self, pos: usize) -> u8;
    /// Commits `style` for every byte in `range`.
    fn set_styles(&mut self, range: Range<usize>, style: u8);

    fn line_of(&self, pos: usize) -> usize;
    /// Start of `line`. Lines past the end start at `len()`.
    fn line_start(&self, line: usize) -> usize;
    fn line_count(&self) -> usize;

    fn line_state(&self, line: usize) -> u32;
    fn set_line_state(&mut self, line: usize, state: u32);

    fn level_at(&self, line: usize) -> u32;
    fn set_level(&mut self, line: usize, level: u32);

    fn property_int(&self, key: &str, default: i32) -> i32;

    /// Position of the first EOL byte of `line`, or the start of the next line.
    fn line_end(&self, line: usize) -> usize {
        let start = self.line_start(line);
        let mut pos = self.line_start(line + 1);
        while pos > start && matches!(self.char_at(pos - 1), b'\r' | b'\n') {
            pos -= 1;
        }
        pos
    }

    fn property_bool(&self, key: &str, default: bool) -> bool {
        self.property_int(key, default as i32) != 0
    }
}

/// A basic string to string map of lexer properties.
#[derive(Clone, Default, Debug)]
pub struct PropertySet {
    map: HashMap<String, String>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the value changed.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match self.map.get(key) {
            Some(v) if v == value => false,
            _ => {
                self.map.insert(key.to_string(), value.to_string());
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    /// Parses the leading integer of the value. Missing or empty values yield `default`.
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        let Some(value) = self.get(key) else {
            return default;
        };
        let value = value.trim();
        if value.is_empty() {
            return default;
        }

        let (neg, digits) = match value.as_bytes()[0] {
            b'-' => (true, &value[1..]),
            b'+' => (false, &value[1..]),
            _ => (false, value),
        };
        let mut n: i32 = 0;
        for &b in digits.as_bytes().iter().take_while(|b| b.is_ascii_digit()) {
            n = n.wrapping_mul(10).wrapping_add((b - b'0') as i32);
        }
        if neg { n.wrapping_neg() } else { n }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_set() {
        let mut props = PropertySet::new();
        assert!(props.set("fold", "1"));
        assert!(!props.set("fold", "1"));
        assert_eq!(props.get_int("fold", 0), 1);
        assert_eq!(props.get_int("missing", 7), 7);

        props.set("tab.size", " -8abc");
        assert_eq!(props.get_int("tab.size", 0), -8);

        props.set("empty", "");
        assert_eq!(props.get_int("empty", 3), 3);

        props.set("word", "yes");
        assert_eq!(props.get_int("word", 3), 0);
    }
}
