// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Character classification shared by all lexers.
//!
//! Everything here works on bytes. Multi-byte UTF-8 sequences are treated as
//! opaque bytes >= 0x80, which the `_ex` predicates accept as identifier bytes.

use crate::charset::Charset;

const IDENTIFIER_START: Charset = Charset::with_ranges(&[b'a'..=b'z', b'A'..=b'Z', b'_'..=b'_']);
const IDENTIFIER_CHAR: Charset = IDENTIFIER_START.union(&Charset::with_ranges(&[b'0'..=b'9']));
const HIGH_BYTES: Charset = Charset::with_ranges(&[0x80..=0xff]);
const IDENTIFIER_START_EX: Charset = IDENTIFIER_START.union(&HIGH_BYTES);
const IDENTIFIER_CHAR_EX: Charset = IDENTIFIER_CHAR.union(&HIGH_BYTES);
const OPERATOR: Charset = Charset::with_bytes(b"%^&*()-+=|{}[]:;<>,/?!.~");
const INVALID_URL: Charset =
    Charset::with_ranges(&[0x00..=0x20, 0x7f..=0x7f]).union(&Charset::with_bytes(b"\"<>\\^`{|}"));

#[inline]
pub const fn is_eol(ch: u8) -> bool {
    ch == b'\r' || ch == b'\n'
}

/// Space, tab and the vertical whitespace characters.
#[inline]
pub const fn is_space_char(ch: u8) -> bool {
    ch == b' ' || (ch >= 0x09 && ch <= 0x0d)
}

#[inline]
pub const fn is_space_or_tab(ch: u8) -> bool {
    ch == b' ' || ch == b'\t'
}

/// Printable, non-space ASCII.
#[inline]
pub const fn is_graphic(ch: u8) -> bool {
    ch > 0x20 && ch < 0x7f
}

#[inline]
pub const fn is_digit(ch: u8) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub const fn is_hex_digit(ch: u8) -> bool {
    ch.is_ascii_hexdigit()
}

#[inline]
pub const fn is_octal_digit(ch: u8) -> bool {
    ch >= b'0' && ch <= b'7'
}

pub const fn is_digit_in_base(ch: u8, base: u32) -> bool {
    match base {
        8 => is_octal_digit(ch),
        10 => is_digit(ch),
        16 => is_hex_digit(ch),
        _ => false,
    }
}

#[inline]
pub const fn is_alpha(ch: u8) -> bool {
    ch.is_ascii_alphabetic()
}

#[inline]
pub const fn is_alphanumeric(ch: u8) -> bool {
    ch.is_ascii_alphanumeric()
}

#[inline]
pub const fn is_upper(ch: u8) -> bool {
    ch.is_ascii_uppercase()
}

#[inline]
pub const fn is_lower(ch: u8) -> bool {
    ch.is_ascii_lowercase()
}

#[inline]
pub const fn is_identifier_start(ch: u8) -> bool {
    IDENTIFIER_START.contains(ch)
}

#[inline]
pub const fn is_identifier_char(ch: u8) -> bool {
    IDENTIFIER_CHAR.contains(ch)
}

#[inline]
pub const fn is_identifier_start_ex(ch: u8) -> bool {
    IDENTIFIER_START_EX.contains(ch)
}

#[inline]
pub const fn is_identifier_char_ex(ch: u8) -> bool {
    IDENTIFIER_CHAR_EX.contains(ch)
}

/// Classic word start: letters, digits and underscore.
#[inline]
pub const fn is_word_start(ch: u8) -> bool {
    IDENTIFIER_CHAR.contains(ch)
}

/// Classic word character: a word start or a dot.
#[inline]
pub const fn is_word_char(ch: u8) -> bool {
    IDENTIFIER_CHAR.contains(ch) || ch == b'.'
}

#[inline]
pub const fn is_operator(ch: u8) -> bool {
    OPERATOR.contains(ch)
}

#[inline]
pub const fn is_number_start(ch: u8, ch_next: u8) -> bool {
    is_digit(ch) || (ch == b'.' && is_digit(ch_next))
}

/// Like [`is_number_start`], but rejects digits glued to a preceding identifier.
#[inline]
pub const fn is_number_start_ex(ch_prev: u8, ch: u8, ch_next: u8) -> bool {
    is_number_start(ch, ch_next) && !is_identifier_char(ch_prev)
}

/// Whether `ch` continues a number literal, given its neighbours.
pub const fn is_decimal_number(ch_prev: u8, ch: u8, ch_next: u8) -> bool {
    is_identifier_char(ch)
        || (ch == b'.' && ch_next != b'.')
        || ((ch == b'+' || ch == b'-')
            && (ch_prev == b'e' || ch_prev == b'E' || ch_prev == b'p' || ch_prev == b'P'))
}

/// Characters after which `ident:` reads as a jump label rather than a key.
#[inline]
pub const fn is_jump_label_prev_char(ch: u8) -> bool {
    ch == b';' || ch == b'{' || ch == b'}' || ch == 0
}

#[inline]
pub const fn is_invalid_url_char(ch: u8) -> bool {
    INVALID_URL.contains(ch)
}

pub const fn is_dbcs_code_page(code_page: u32) -> bool {
    matches!(code_page, 932 | 936 | 949 | 950 | 1361)
}

pub const fn is_dbcs_valid_single_byte(code_page: u32, ch: u8) -> bool {
    match code_page {
        932 => ch == 0x80 || (ch >= 0xa0 && ch <= 0xdf) || ch >= 0xfd,
        _ => false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterClass {
    Space,
    NewLine,
    Word,
    Punctuation,
    CjkWord,
}

/// Per-document byte classification used for word navigation.
#[derive(Clone)]
pub struct CharClassify {
    classes: [CharacterClass; 256],
}

impl Default for CharClassify {
    fn default() -> Self {
        Self::new()
    }
}

impl CharClassify {
    pub fn new() -> Self {
        let mut cc = Self { classes: [CharacterClass::Space; 256] };
        cc.set_default_char_classes(true);
        cc
    }

    pub fn set_default_char_classes(&mut self, include_word_class: bool) {
        for (ch, class) in self.classes.iter_mut().enumerate() {
            let ch = ch as u8;
            *class = if is_eol(ch) {
                CharacterClass::NewLine
            } else if ch < 0x20 || ch == b' ' {
                CharacterClass::Space
            } else if include_word_class && (ch >= 0x80 || is_identifier_char(ch)) {
                CharacterClass::Word
            } else {
                CharacterClass::Punctuation
            };
        }
    }

    pub fn set_char_classes(&mut self, chars: &[u8], class: CharacterClass) {
        for &ch in chars {
            self.classes[ch as usize] = class;
        }
    }

    pub fn chars_of_class(&self, class: CharacterClass) -> Vec<u8> {
        (0..=255u8).filter(|&ch| self.classes[ch as usize] == class).collect()
    }

    #[inline]
    pub fn class_of(&self, ch: u8) -> CharacterClass {
        self.classes[ch as usize]
    }

    #[inline]
    pub fn is_word(&self, ch: u8) -> bool {
        self.classes[ch as usize] == CharacterClass::Word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier_start(b'_'));
        assert!(!is_identifier_start(b'1'));
        assert!(is_identifier_char(b'1'));
        assert!(!is_identifier_char(0xc3));
        assert!(is_identifier_char_ex(0xc3));
        assert!(is_word_char(b'.'));
        assert!(!is_word_start(b'.'));
    }

    #[test]
    fn test_numbers() {
        assert!(is_number_start(b'.', b'5'));
        assert!(!is_number_start(b'.', b'x'));
        assert!(!is_number_start_ex(b'x', b'1', b' '));
        assert!(is_decimal_number(b'e', b'+', b'1'));
        assert!(!is_decimal_number(b'1', b'+', b'1'));
        assert!(!is_decimal_number(b'1', b'.', b'.'));
        assert!(is_digit_in_base(b'f', 16));
        assert!(!is_digit_in_base(b'8', 8));
    }

    #[test]
    fn test_operators() {
        for &ch in b"%^&*()-+=|{}[]:;<>,/?!.~" {
            assert!(is_operator(ch), "{}", ch as char);
        }
        assert!(!is_operator(b'#'));
        assert!(!is_operator(b'a'));
        assert!(is_invalid_url_char(b' '));
        assert!(!is_invalid_url_char(b'/'));
    }

    #[test]
    fn test_char_classify() {
        let mut cc = CharClassify::new();
        assert_eq!(cc.class_of(b'\n'), CharacterClass::NewLine);
        assert_eq!(cc.class_of(b'\t'), CharacterClass::Space);
        assert!(cc.is_word(b'a'));
        assert_eq!(cc.class_of(b'-'), CharacterClass::Punctuation);

        cc.set_char_classes(b"-", CharacterClass::Word);
        assert!(cc.is_word(b'-'));

        cc.set_default_char_classes(false);
        assert_eq!(cc.class_of(b'a'), CharacterClass::Punctuation);
        assert_eq!(cc.chars_of_class(CharacterClass::NewLine), vec![b'\n', b'\r']);
    }

    #[test]
    fn test_dbcs() {
        assert!(is_dbcs_code_page(936));
        assert!(!is_dbcs_code_page(65001));
        assert!(is_dbcs_valid_single_byte(932, 0xa5));
        assert!(!is_dbcs_valid_single_byte(936, 0xa5));
    }
}
