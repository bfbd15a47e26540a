// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Bounded escape sequences inside string literals.

use crate::charclass::{is_digit, is_digit_in_base, is_eol, is_octal_digit};

/// Longest code point in `\u{...}`.
pub const MAX_BRACED_DIGITS: u32 = 6;

/// How many digits the numeric escapes of a language take.
///
/// A count of 0 means the language has no such escape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscapeRules {
    /// Digits after `\x`.
    pub hex: u32,
    /// Whether `\X` is an alias of `\x`.
    pub hex_upper: bool,
    /// Digits after `\u`.
    pub unicode: u32,
    /// Digits after `\U`.
    pub long_unicode: u32,
    /// `\123` takes up to 3 octal digits.
    pub octal: bool,
    /// `\123` takes up to 3 decimal digits.
    pub decimal: bool,
}

impl EscapeRules {
    pub const C_LIKE: Self =
        Self { hex: 2, hex_upper: false, unicode: 4, long_unicode: 0, octal: false, decimal: false };
    pub const DART: Self = Self::C_LIKE;
    pub const ASYMPTOTE: Self =
        Self { hex: 2, hex_upper: true, unicode: 0, long_unicode: 0, octal: true, decimal: false };
    pub const FSHARP: Self =
        Self { hex: 2, hex_upper: false, unicode: 4, long_unicode: 8, octal: false, decimal: true };
}

impl Default for EscapeRules {
    fn default() -> Self {
        Self::C_LIKE
    }
}

/// The state of one escape sequence, from the backslash to its last character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EscapeSequence {
    /// The string state to return to.
    pub outer_state: u8,
    /// Characters left, including the one after the backslash.
    pub digits_left: u32,
    pub base: u32,
    /// Inside `\u{...}`.
    pub brace: bool,
}

impl EscapeSequence {
    /// Starts an escape with the default C-like rules. See [`EscapeSequence::reset_with`].
    pub fn reset(&mut self, state: u8, ch_next: u8) -> bool {
        self.reset_with(state, ch_next, EscapeRules::C_LIKE)
    }

    /// Starts an escape at a backslash followed by `ch_next`.
    ///
    /// Returns false if `ch_next` ends the line, in which case the caller
    /// must stay in `state`.
    pub fn reset_with(&mut self, state: u8, ch_next: u8, rules: EscapeRules) -> bool {
        if is_eol(ch_next) {
            return false;
        }

        self.outer_state = state;
        self.brace = false;
        self.base = 16;
        self.digits_left = match ch_next {
            b'x' if rules.hex != 0 => rules.hex + 1,
            b'X' if rules.hex != 0 && rules.hex_upper => rules.hex + 1,
            b'u' if rules.unicode != 0 => rules.unicode + 1,
            b'U' if rules.long_unicode != 0 => rules.long_unicode + 1,
            _ if rules.octal && is_octal_digit(ch_next) => {
                self.base = 8;
                3
            }
            _ if rules.decimal && is_digit(ch_next) => {
                self.base = 10;
                3
            }
            _ => 1,
        };
        true
    }

    /// Starts a one character escape made of a doubled delimiter, like `""` or `{{`.
    pub fn reset_doubled(&mut self, state: u8) {
        self.outer_state = state;
        self.brace = false;
        self.base = 16;
        self.digits_left = 1;
    }

    /// Switches a `\u` escape to the braced `\u{XXXXXX}` form.
    /// The caller is expected to move past the `{`.
    pub fn enter_brace(&mut self) {
        self.brace = true;
        self.digits_left = MAX_BRACED_DIGITS + 1;
    }

    /// Consumes `ch` and returns true if the escape ends before it.
    pub fn at_escape_end(&mut self, ch: u8) -> bool {
        self.digits_left = self.digits_left.saturating_sub(1);
        self.digits_left == 0 || !is_digit_in_base(ch, self.base)
    }
}
