// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

/// A sorted, read-only set of words.
///
/// Lists are compared byte-wise. Languages that are case-insensitive lowercase
/// the token before the lookup and are expected to be given lowercase lists.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<Box<str>>,
}

static EMPTY: WordList = WordList::new();

impl WordList {
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Builds a list from whitespace separated words.
    pub fn from_text(text: &str) -> Self {
        Self::from_words(text.split_ascii_whitespace())
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut words: Vec<Box<str>> = words.into_iter().filter(|w| !w.is_empty()).map(Box::from).collect();
        words.sort_unstable();
        words.dedup();
        Self { words }
    }

    pub fn empty() -> &'static WordList {
        &EMPTY
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| &**w)
    }

    pub fn contains(&self, s: &str) -> bool {
        self.words.binary_search_by(|w| (**w).cmp(s)).is_ok()
    }

    /// Returns true if `s` is in the list, or if an entry consists of `s`
    /// immediately followed by `marker` (e.g. `add_library(` matches `add_library`).
    pub fn contains_prefixed(&self, s: &str, marker: u8) -> bool {
        if s.is_empty() {
            return false;
        }

        let beg = self.words.partition_point(|w| &**w < s);
        for w in &self.words[beg..] {
            if !w.starts_with(s) {
                break;
            }
            let rest = &w.as_bytes()[s.len()..];
            if rest.is_empty() || rest[0] == marker {
                return true;
            }
        }
        false
    }
}

impl fmt::Debug for WordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.words()).finish()
    }
}

/// Returns the list at `index`, or an empty list if the host supplied fewer lists.
pub fn keyword_list(lists: &[WordList], index: usize) -> &WordList {
    lists.get(index).unwrap_or(WordList::empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let wl = WordList::from_text("while  if\nelse\tif");
        assert_eq!(wl.len(), 3);
        assert!(wl.contains("if"));
        assert!(wl.contains("else"));
        assert!(!wl.contains("If"));
        assert!(!wl.contains("whil"));
        assert!(!wl.contains(""));
    }

    #[test]
    fn test_contains_prefixed() {
        let wl = WordList::from_text("add_library( add_executable( project message");
        assert!(wl.contains_prefixed("add_library", b'('));
        assert!(wl.contains_prefixed("message", b'('));
        assert!(!wl.contains_prefixed("add_", b'('));
        assert!(!wl.contains_prefixed("add_library", b'['));
        assert!(!wl.contains_prefixed("", b'('));
    }

    #[test]
    fn test_missing_list() {
        let lists = vec![WordList::from_text("a")];
        assert!(keyword_list(&lists, 0).contains("a"));
        assert!(keyword_list(&lists, 3).is_empty());
    }
}
